//! Generic CRUD service contract.

use std::future::Future;

use thiserror::Error;

use crate::response::BaseResponse;

/// Failure a service could not express as a `BaseResponse::failure`.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Storage backend failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Create, update, delete and query operations over one entity type.
///
/// Implementations own their storage; the trait only fixes the call shape.
pub trait GenericService<T>: Send + Sync
where
    T: Send,
{
    fn create(&self, entity: T)
    -> impl Future<Output = Result<BaseResponse<T>, ServiceError>> + Send;

    fn update(&self, entity: T)
    -> impl Future<Output = Result<BaseResponse<T>, ServiceError>> + Send;

    fn delete(&self, entity: T)
    -> impl Future<Output = Result<BaseResponse<T>, ServiceError>> + Send;

    fn get_all(&self) -> impl Future<Output = Result<BaseResponse<Vec<T>>, ServiceError>> + Send;

    fn get_by_id(&self, id: i32)
    -> impl Future<Output = Result<BaseResponse<T>, ServiceError>> + Send;

    /// Every entity for which `predicate` returns `true`.
    fn get_by<P>(
        &self,
        predicate: P,
    ) -> impl Future<Output = Result<BaseResponse<Vec<T>>, ServiceError>> + Send
    where
        P: Fn(&T) -> bool + Send + Sync;
}
