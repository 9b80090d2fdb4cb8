//! Request-level errors of the gateway endpoints.

use crate::media::UnsupportedMediaType;
use crate::services::providers::ProviderError;
use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Message returned for provider failures when passthrough is disabled.
pub const HIDDEN_GENERATION_ERROR: &str = "Generation failed";

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    UnsupportedMediaType(#[from] UnsupportedMediaType),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("{message}")]
    InvalidMultipart { status: StatusCode, message: String },

    /// Provider failure; `message` is what the client sees.
    #[error("{message}")]
    Generation { message: String },
}

impl GatewayError {
    /// Wrap a provider failure, hiding its text unless `expose` is set.
    pub fn generation(err: &ProviderError, expose: bool) -> Self {
        let message = if expose {
            err.to_string()
        } else {
            HIDDEN_GENERATION_ERROR.to_string()
        };
        GatewayError::Generation { message }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::UnsupportedMediaType(_) => StatusCode::BAD_REQUEST,
            GatewayError::MissingField(_) => StatusCode::UNPROCESSABLE_ENTITY,
            GatewayError::InvalidMultipart { status, .. } => *status,
            GatewayError::Generation { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<MultipartError> for GatewayError {
    fn from(err: MultipartError) -> Self {
        // Body-limit rejections keep their 413; anything else is the client's
        // malformed body.
        let status = match err.status() {
            status if status.is_client_error() => status,
            _ => StatusCode::BAD_REQUEST,
        };
        GatewayError::InvalidMultipart {
            status,
            message: err.body_text(),
        }
    }
}

impl From<MultipartRejection> for GatewayError {
    fn from(rejection: MultipartRejection) -> Self {
        GatewayError::InvalidMultipart {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MediaKind;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn unsupported_media_type_is_400() {
        let err = GatewayError::from(UnsupportedMediaType {
            kind: MediaKind::Audio,
            media_type: Some("text/plain".into()),
        });
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Unsupported audio format: text/plain" })
        );
    }

    #[tokio::test]
    async fn missing_field_is_422() {
        let response = GatewayError::MissingField("text").into_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Missing required field: text" })
        );
    }

    #[tokio::test]
    async fn generation_error_passes_message_through() {
        let err = GatewayError::generation(&ProviderError::Api("quota exceeded".into()), true);
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "API error: quota exceeded" })
        );
    }

    #[tokio::test]
    async fn generation_error_can_be_hidden() {
        let err = GatewayError::generation(&ProviderError::Network("dns".into()), false);
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({ "error": HIDDEN_GENERATION_ERROR })
        );
    }
}
