//! Handler error type mapping library errors onto problem-details responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use shopkit_io_xlsx::ExportError;
use thiserror::Error;

use crate::auth::AuthError;
use crate::problem::ProblemDetails;
use crate::service::ServiceError;

/// Error returned by route handlers built on this library.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Export(err) if err.is_invalid_argument() => StatusCode::BAD_REQUEST,
            Self::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Service(ServiceError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Service(ServiceError::Conflict(_)) => StatusCode::CONFLICT,
            Self::Service(ServiceError::Validation(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Service(ServiceError::Storage(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(_) => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request error");
            return ProblemDetails::internal().into_response();
        }

        // Statuses the global exception middleware owns get its canonical body.
        if let Some(problem) = ProblemDetails::for_rewritten_status(status) {
            return problem.into_response();
        }

        let title = status
            .canonical_reason()
            .map_or_else(|| "Error".to_string(), |reason| format!("Error: {reason}"));
        let detail = match &self {
            Self::Service(
                ServiceError::NotFound(msg)
                | ServiceError::Conflict(msg)
                | ServiceError::Validation(msg),
            ) => msg.clone(),
            _ => self.to_string(),
        };
        ProblemDetails::new(status, title, detail).into_response()
    }
}
