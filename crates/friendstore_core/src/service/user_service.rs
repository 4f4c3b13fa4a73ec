//! User record use-case service.
//!
//! # Responsibility
//! - Provide create/read/update/delete and graph search entry points.
//! - Run every mutation as validate -> resolve -> store -> persist.
//!
//! # Invariants
//! - Validation and resolution errors win over not-found on update.
//! - A failed save restores the store to its pre-mutation state.
//! - The service owns its store; there is no process-wide instance.

use crate::graph::traversal::{traverse, Neighbor};
use crate::model::record::{Record, RecordId};
use crate::model::validate::{validate, ValidationError};
use crate::persist::{PersistError, RecordSource};
use crate::store::document_store::{DocumentStore, RecordMap, StoreError};
use crate::store::resolver::{resolve, ResolveError};
use log::{error, info, warn};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced by user service operations.
#[derive(Debug)]
pub enum ServiceError {
    Validation(ValidationError),
    Resolve(ResolveError),
    Store(StoreError),
    Persist(PersistError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Resolve(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Persist(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Resolve(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::Persist(err) => Some(err),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<ResolveError> for ServiceError {
    fn from(value: ResolveError) -> Self {
        Self::Resolve(value)
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<PersistError> for ServiceError {
    fn from(value: PersistError) -> Self {
        Self::Persist(value)
    }
}

/// Use-case service over one document store and its record source.
pub struct UserService<S: RecordSource> {
    store: DocumentStore,
    source: S,
}

impl<S: RecordSource> UserService<S> {
    /// Loads every record from `source` and builds the store.
    ///
    /// Dangling friend edges in loaded data are logged, not rejected.
    pub fn open(mut source: S) -> ServiceResult<Self> {
        let records = source.load_all()?;
        let store = DocumentStore::from_records(records);

        let dangling = store.dangling_references();
        for edge in &dangling {
            warn!(
                "event=store_load module=service status=dangling_edge owner={} missing={}",
                edge.owner, edge.missing
            );
        }
        info!(
            "event=store_load module=service status=ok backend={} records={} dangling_edges={}",
            source.backend(),
            store.len(),
            dangling.len()
        );

        Ok(Self { store, source })
    }

    /// Read-only access to the underlying store.
    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Returns an owned copy of every record.
    pub fn list(&self) -> RecordMap {
        self.store.get_all()
    }

    pub fn get(&self, id: &str) -> ServiceResult<Record> {
        Ok(self.store.get_one(id)?.clone())
    }

    /// Validates `body`, checks its friends, and stores it under a new id.
    pub fn create(&mut self, body: Option<&Value>) -> ServiceResult<RecordId> {
        let record = validate(body)?;
        resolve(&record.friends, &self.store)?;

        let id = self.commit("user_create", |store| Ok(store.insert(record)))?;
        info!("event=user_create module=service status=ok id={id}");
        Ok(id)
    }

    /// Replaces the record at `id` with the validated `body`.
    pub fn update(&mut self, id: &str, body: Option<&Value>) -> ServiceResult<()> {
        let record = validate(body)?;
        resolve(&record.friends, &self.store)?;

        self.commit("user_update", |store| Ok(store.replace(id, record)?))?;
        info!("event=user_update module=service status=ok id={id}");
        Ok(())
    }

    /// Deletes `id` and unlinks it from every friends list.
    ///
    /// Returns the number of friend edges removed.
    pub fn delete(&mut self, id: &str) -> ServiceResult<usize> {
        let unlinked = self.commit("user_delete", |store| Ok(store.delete(id)?))?;
        info!("event=user_delete module=service status=ok id={id} unlinked_edges={unlinked}");
        Ok(unlinked)
    }

    /// Lists records within `degrees` hops of `id`.
    pub fn graph_search(&self, id: &str, degrees: i64) -> ServiceResult<Vec<Neighbor>> {
        let found = traverse(&self.store, id, degrees)?;
        info!(
            "event=graph_search module=service status=ok id={id} degrees={degrees} hits={}",
            found.len()
        );
        Ok(found)
    }

    /// Applies `mutate` and persists the result, rolling back on save failure.
    fn commit<T>(
        &mut self,
        event: &str,
        mutate: impl FnOnce(&mut DocumentStore) -> ServiceResult<T>,
    ) -> ServiceResult<T> {
        let snapshot = self.store.clone();
        let value = mutate(&mut self.store)?;

        if let Err(err) = self.source.save_all(self.store.as_map()) {
            self.store = snapshot;
            error!(
                "event={event} module=service status=error backend={} error_code=save_failed error={err}",
                self.source.backend()
            );
            return Err(err.into());
        }

        Ok(value)
    }
}
