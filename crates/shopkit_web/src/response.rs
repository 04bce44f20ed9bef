//! Typed response envelope and the workbook download response.

use axum::Json;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use shopkit_io_xlsx::{C_XLSX_CONTENT_TYPE, SpecExportArtifact};

/// Success flag, message and optional payload returned by every service call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseResponse<T> {
    pub is_success: bool,
    pub message: String,
    pub data: Option<T>,
}

impl<T> BaseResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            is_success: true,
            message: message.into(),
            data: Some(data),
        }
    }

    /// Successful call without a payload.
    pub fn done(message: impl Into<String>) -> Self {
        Self {
            is_success: true,
            message: message.into(),
            data: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            is_success: false,
            message: message.into(),
            data: None,
        }
    }

    /// Transform the payload, keeping flag and message.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> BaseResponse<U> {
        BaseResponse {
            is_success: self.is_success,
            message: self.message,
            data: self.data.map(f),
        }
    }
}

// Failures use 422 so the envelope is not replaced by the 400 problem body.
impl<T: Serialize> IntoResponse for BaseResponse<T> {
    fn into_response(self) -> Response {
        let status = if self.is_success {
            StatusCode::OK
        } else {
            StatusCode::UNPROCESSABLE_ENTITY
        };
        (status, Json(self)).into_response()
    }
}

/// Workbook bytes served as a file attachment.
#[derive(Debug, Clone)]
pub struct XlsxDownload(pub SpecExportArtifact);

impl IntoResponse for XlsxDownload {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(C_XLSX_CONTENT_TYPE));
        let c_disposition = format!(
            "attachment; filename=\"{}\"",
            sanitize_header_file_name(&self.0.file_name)
        );
        if let Ok(value) = HeaderValue::from_str(&c_disposition) {
            headers.insert(CONTENT_DISPOSITION, value);
        }
        (StatusCode::OK, headers, self.0.bytes).into_response()
    }
}

/// Keep printable ASCII except quotes and backslashes.
fn sanitize_header_file_name(file_name: &str) -> String {
    file_name
        .chars()
        .map(|chr| match chr {
            '"' | '\\' => '_',
            ' '..='~' => chr,
            _ => '_',
        })
        .collect()
}
