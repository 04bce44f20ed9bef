//! Problem-details response body shared by every error path.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

/// `{title, detail, status}` error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemDetails {
    pub title: String,
    pub detail: String,
    pub status: u16,
}

impl ProblemDetails {
    pub fn new(status: StatusCode, title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            detail: detail.into(),
            status: status.as_u16(),
        }
    }

    /// Canonical body for a status the global exception middleware rewrites.
    ///
    /// Returns `None` for statuses that pass through untouched.
    pub fn for_rewritten_status(status: StatusCode) -> Option<Self> {
        let (title, detail) = match status {
            StatusCode::TOO_MANY_REQUESTS => (
                "Error: Too Many Requests",
                "Too many request, please avoid this behavior next time",
            ),
            StatusCode::BAD_REQUEST => (
                "Error: Bad Request",
                "Please check the sent parameters, url syntax or file size if sent",
            ),
            StatusCode::UNAUTHORIZED => (
                "Error: Unauthorized",
                "You are not recognized as a user in this system",
            ),
            StatusCode::FORBIDDEN => (
                "Error: Forbidden",
                "You are not allowed to perform this action",
            ),
            StatusCode::REQUEST_TIMEOUT => {
                ("Error: Time Out", "Request time out, please try again")
            }
            _ => return None,
        };
        Some(Self::new(status, title, detail))
    }

    /// Body for an unhandled failure.
    pub fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Error",
            "Sorry, internal server error occurred. Kindly try again",
        )
    }

    /// Body for a request that did not come through the API gateway.
    pub fn gateway_rejected() -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "Not api gateway request",
            "Not allowed request, api gateway guard is here",
        )
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for ProblemDetails {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}
