//! Response envelope.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

/// Envelope wrapping every JSON response.
///
/// ```json
/// { "success": true, "message": "...", "responseObject": {...}, "statusCode": 200 }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceResponse<T> {
    pub success: bool,
    pub message: String,
    pub response_object: Option<T>,
    pub status_code: u16,
}

impl<T> ServiceResponse<T> {
    pub fn success(message: impl Into<String>, response_object: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            response_object: Some(response_object),
            status_code: StatusCode::OK.as_u16(),
        }
    }

    pub fn failure(message: impl Into<String>, response_object: T, status: StatusCode) -> Self {
        Self {
            success: false,
            message: message.into(),
            response_object: Some(response_object),
            status_code: status.as_u16(),
        }
    }
}

impl<T: Serialize> IntoResponse for ServiceResponse<T> {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}
