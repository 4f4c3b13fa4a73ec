//! Response envelope returned by handlers.

use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt::Display;

/// Status codes used by the handler contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Ok,
    Created,
    NoContent,
    BadRequest,
    NotFound,
    InternalError,
}

impl StatusCode {
    pub fn as_u16(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::Created => 201,
            Self::NoContent => 204,
            Self::BadRequest => 400,
            Self::NotFound => 404,
            Self::InternalError => 500,
        }
    }

    pub fn is_success(self) -> bool {
        self.as_u16() < 300
    }
}

impl Serialize for StatusCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.as_u16())
    }
}

/// Handler response: a status code plus a JSON payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub payload: Value,
}

impl ApiResponse {
    pub fn new(status: StatusCode, payload: Value) -> Self {
        Self { status, payload }
    }

    /// Success response without a payload.
    pub fn empty(status: StatusCode) -> Self {
        Self::new(status, Value::Null)
    }

    /// Serializes `data` as the payload; serialization failure becomes a 500.
    pub fn data<T: Serialize + ?Sized>(status: StatusCode, data: &T) -> Self {
        match serde_json::to_value(data) {
            Ok(payload) => Self::new(status, payload),
            Err(err) => Self::error(StatusCode::InternalError, err),
        }
    }

    pub fn error(status: StatusCode, message: impl Display) -> Self {
        Self::new(status, Value::String(format!("Error: {message}")))
    }

    /// Error message text, when the payload is an error string.
    pub fn message(&self) -> Option<&str> {
        match (&self.payload, self.status.is_success()) {
            (Value::String(message), false) => Some(message.as_str()),
            _ => None,
        }
    }
}
