//! Request handlers.
//!
//! | Operation    | Success      | Failure                                  |
//! |--------------|--------------|------------------------------------------|
//! | get_all      | mapping, 200 | -                                        |
//! | get_one      | record, 200  | 404                                      |
//! | post         | new id, 201  | 400 (invalid body / unknown friend)      |
//! | put          | null, 204    | 400, 404                                 |
//! | delete       | null, 204    | 404                                      |
//! | graph_search | records, 201 | 404                                      |
//!
//! Persistence failures map to 500 on every mutating handler.

use crate::api::response::{ApiResponse, StatusCode};
use crate::model::record::Record;
use crate::persist::RecordSource;
use crate::service::user_service::{ServiceError, UserService};
use serde_json::Value;

/// Maps a service error to its response status.
pub fn status_for(err: &ServiceError) -> StatusCode {
    match err {
        ServiceError::Validation(_) | ServiceError::Resolve(_) => StatusCode::BadRequest,
        ServiceError::Store(_) => StatusCode::NotFound,
        ServiceError::Persist(_) => StatusCode::InternalError,
    }
}

fn failure(err: &ServiceError) -> ApiResponse {
    ApiResponse::error(status_for(err), err)
}

pub fn get_all<S: RecordSource>(service: &UserService<S>) -> ApiResponse {
    ApiResponse::data(StatusCode::Ok, &service.list())
}

pub fn get_one<S: RecordSource>(service: &UserService<S>, id: &str) -> ApiResponse {
    match service.get(id) {
        Ok(record) => ApiResponse::data(StatusCode::Ok, &record),
        Err(err) => failure(&err),
    }
}

/// Creates a record; the payload is the new identifier.
pub fn post<S: RecordSource>(service: &mut UserService<S>, body: Option<&Value>) -> ApiResponse {
    match service.create(body) {
        Ok(id) => ApiResponse::data(StatusCode::Created, &id),
        Err(err) => failure(&err),
    }
}

pub fn put<S: RecordSource>(
    service: &mut UserService<S>,
    id: &str,
    body: Option<&Value>,
) -> ApiResponse {
    match service.update(id, body) {
        Ok(()) => ApiResponse::empty(StatusCode::NoContent),
        Err(err) => failure(&err),
    }
}

pub fn delete<S: RecordSource>(service: &mut UserService<S>, id: &str) -> ApiResponse {
    match service.delete(id) {
        Ok(_) => ApiResponse::empty(StatusCode::NoContent),
        Err(err) => failure(&err),
    }
}

/// Lists records within `degrees` hops of `id`.
///
/// Answers with 201 on success, as the published contract does for this
/// read-only query.
pub fn graph_search<S: RecordSource>(
    service: &UserService<S>,
    id: &str,
    degrees: i64,
) -> ApiResponse {
    match service.graph_search(id, degrees) {
        Ok(found) => {
            let records: Vec<Record> = found.into_iter().map(|neighbor| neighbor.record).collect();
            ApiResponse::data(StatusCode::Created, &records)
        }
        Err(err) => failure(&err),
    }
}
