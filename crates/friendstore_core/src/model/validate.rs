//! Request body validation.
//!
//! # Responsibility
//! - Check a weakly-typed JSON body field by field.
//! - Produce a normalized `Record` only after every check passes.
//!
//! # Invariants
//! - Checks run in a fixed order and stop at the first failure.
//! - Every error message names the offending field or the body.
//! - `name` must contain at least one non-whitespace character; a
//!   whitespace-only name is rejected as malformed.
//! - `age` fits in a signed 64-bit column, so every accepted record is
//!   storable by every backend.
//! - No store access; friend ids are checked separately by the resolver.

use crate::model::record::{Record, RecordId};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Largest accepted age, the range of an SQLite `INTEGER`.
pub const MAX_AGE: u64 = i64::MAX as u64;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("valid email regex"));

/// Body fields checked by the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Body,
    Name,
    Email,
    Age,
    Friends,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Body => "body",
            Self::Name => "name",
            Self::Email => "email",
            Self::Age => "age",
            Self::Friends => "friends",
        }
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation failure for a candidate record body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// No body was supplied at all (or it was `null`).
    MissingBody,
    /// A required field is absent.
    MissingField(Field),
    /// A field is present but has the wrong type or format.
    MalformedField(Field),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingBody => write!(f, "request body is missing"),
            Self::MissingField(field) => write!(f, "{field} is not in the body"),
            Self::MalformedField(Field::Body) => write!(f, "body is not a JSON object"),
            Self::MalformedField(Field::Name) => write!(f, "name must be non-blank text"),
            Self::MalformedField(Field::Email) => write!(f, "email is in incorrect form"),
            Self::MalformedField(Field::Age) => {
                write!(f, "age is not an integer between 0 and {MAX_AGE}")
            }
            Self::MalformedField(Field::Friends) => {
                write!(f, "friends is not a list of identifiers")
            }
        }
    }
}

impl Error for ValidationError {}

/// Validates a request body and builds the normalized record.
///
/// Check order:
/// 1. body present and an object
/// 2. `name` present and non-blank text
/// 3. `email` present
/// 4. `friends` present and an array of strings (may be empty)
/// 5. `email` matches `local@domain.tld`
/// 6. `age`, when present and non-null, is an integer in `0..=MAX_AGE`
///
/// Unknown keys are dropped from the result.
pub fn validate(body: Option<&Value>) -> Result<Record, ValidationError> {
    let fields = match body {
        None | Some(Value::Null) => return Err(ValidationError::MissingBody),
        Some(Value::Object(fields)) => fields,
        Some(_) => return Err(ValidationError::MalformedField(Field::Body)),
    };

    let name = match required(fields, Field::Name)? {
        Value::String(name) if !name.trim().is_empty() => name.clone(),
        _ => return Err(ValidationError::MalformedField(Field::Name)),
    };
    let email = required(fields, Field::Email)?;
    let friends = parse_friends(required(fields, Field::Friends)?)?;

    let email = match email {
        Value::String(email) if is_valid_email(email) => email.clone(),
        _ => return Err(ValidationError::MalformedField(Field::Email)),
    };

    let age = match fields.get(Field::Age.as_str()) {
        None | Some(Value::Null) => None,
        Some(value) => Some(
            value
                .as_u64()
                .filter(|age| *age <= MAX_AGE)
                .ok_or(ValidationError::MalformedField(Field::Age))?,
        ),
    };

    Ok(Record {
        name,
        email,
        age,
        friends,
    })
}

/// Returns whether `email` matches the accepted address form.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

impl Record {
    /// Re-checks the format rules on an already typed record.
    ///
    /// Used on read paths where records arrive without a JSON body.
    pub fn check_format(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MalformedField(Field::Name));
        }
        if !is_valid_email(&self.email) {
            return Err(ValidationError::MalformedField(Field::Email));
        }
        if self.age.is_some_and(|age| age > MAX_AGE) {
            return Err(ValidationError::MalformedField(Field::Age));
        }
        Ok(())
    }
}

fn required(fields: &Map<String, Value>, field: Field) -> Result<&Value, ValidationError> {
    fields
        .get(field.as_str())
        .ok_or(ValidationError::MissingField(field))
}

fn parse_friends(value: &Value) -> Result<Vec<RecordId>, ValidationError> {
    let Value::Array(items) = value else {
        return Err(ValidationError::MalformedField(Field::Friends));
    };

    items
        .iter()
        .map(|item| match item {
            Value::String(id) => Ok(RecordId::new(id.as_str())),
            _ => Err(ValidationError::MalformedField(Field::Friends)),
        })
        .collect()
}
