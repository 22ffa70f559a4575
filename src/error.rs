//! HTTP-facing error type shared by every handler.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

pub const CREATE_PRODUCT_FAILED: &str = "Ошибка при создании товара";

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing, malformed or too-short input. HTTP 400.
    #[error("{0}")]
    Validation(String),

    /// Non-success reply from the nomenclature endpoint, relayed as-is.
    #[error("upstream returned {status}: {body}")]
    Upstream { status: StatusCode, body: String },

    /// Anything unexpected. HTTP 500.
    #[error("{message}: {cause:#}")]
    Internal {
        message: &'static str,
        cause: anyhow::Error,
    },
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::Validation(msg.into())
    }

    pub fn internal(message: &'static str, cause: impl Into<anyhow::Error>) -> Self {
        ApiError::Internal {
            message,
            cause: cause.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream { status, .. } => *status,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(format!("Некорректный JSON: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(format!(
            "Некорректные параметры запроса: {}",
            rejection.body_text()
        ))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            ApiError::Validation(message) => json!({ "message": message }),
            ApiError::Upstream { body, .. } => json!({
                "message": CREATE_PRODUCT_FAILED,
                "details": body,
            }),
            ApiError::Internal { message, cause } => {
                error!(error = ?cause, "{}", message);
                json!({
                    "message": message,
                    "error": format!("{:#}", cause),
                })
            }
        };
        (status, Json(body)).into_response()
    }
}
