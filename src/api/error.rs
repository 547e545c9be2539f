use crate::errors::Error;
use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

// Extractor rejections become validation errors so every failure has the JSON error shape.

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidInput {
            message: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Self::InvalidInput {
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Self::InvalidInput {
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            Self::InvalidAmount { .. } | Self::InvalidInput { .. } => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", self.to_string())
            }
            Self::MissingUser => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Missing X-User-Id header".to_string(),
            ),
            Self::AccountNotFound { .. } => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", self.to_string())
            }
            Self::InsufficientFunds { .. } => {
                (StatusCode::CONFLICT, "INSUFFICIENT_FUNDS", self.to_string())
            }
            _ => {
                tracing::error!(error = %self, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, Json(body)).into_response()
    }
}
