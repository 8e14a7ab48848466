//! Service-layer error type
//!
//! `ServiceError` bridges store errors (`StoreError`, `sqlx::Error`, timeouts)
//! and the API-layer error (`AppError`), so handlers can use `?` without
//! mapping and logging by hand.

use axum::response::IntoResponse;
use shared::error::{AppError, ErrorCode};

use crate::db::StoreError;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// - `Db`: storage/infrastructure errors (logged, mapped to InternalError)
/// - `App`: business-rule errors (passed through to the client)
#[derive(Debug)]
pub enum ServiceError {
    Db(BoxError),
    App(AppError),
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        ServiceError::Db(e.into())
    }
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        ServiceError::Db(e.into())
    }
}

impl From<tokio::time::error::Elapsed> for ServiceError {
    fn from(e: tokio::time::error::Elapsed) -> Self {
        ServiceError::Db(format!("store call timed out: {e}").into())
    }
}

impl From<AppError> for ServiceError {
    fn from(e: AppError) -> Self {
        ServiceError::App(e)
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(app_err) => app_err,
            ServiceError::Db(db_err) => {
                tracing::error!(error = %db_err, "Service storage error");
                AppError::new(ErrorCode::InternalError)
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_errors_become_internal() {
        let err: AppError = ServiceError::from(StoreError::Corrupt("idea 1: column x".into())).into();
        assert_eq!(err.code, ErrorCode::InternalError);
        assert_eq!(err.message, ErrorCode::InternalError.message());
    }

    #[test]
    fn app_errors_pass_through() {
        let err: AppError = ServiceError::from(AppError::idea_not_found(3)).into();
        assert_eq!(err.code, ErrorCode::IdeaNotFound);
    }
}
