use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use pricegate_core::{ConfigError, GatewayError, GatewayErrorKind, PriceLookupError, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{error, warn};

/// Wire shape of every rejected request: `{"error": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// Request-level failure rendered as an [`ErrorEnvelope`].
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("Too many requests, please try again later")]
    RateLimited { retry_after_secs: u64 },

    #[error("Resource not found")]
    NotFound,

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("An unexpected error occurred")]
    Internal,
}

impl From<PriceLookupError> for ApiError {
    fn from(value: PriceLookupError) -> Self {
        match value {
            PriceLookupError::Validation(error) => Self::Validation(error),
            PriceLookupError::Gateway(error) => Self::Gateway(error),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Gateway(error) => match error.kind() {
                GatewayErrorKind::Upstream => StatusCode::BAD_GATEWAY,
                GatewayErrorKind::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            },
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Gateway(error) => error.code(),
            Self::RateLimited { .. } => "RATE_LIMIT_ERROR",
            Self::NotFound => "NOT_FOUND",
            Self::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            Self::Internal => "INTERNAL_SERVER_ERROR",
        }
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        let (message, details) = match self {
            Self::Validation(error) => (error.to_string(), error.details()),
            Self::Gateway(error) => (error.message().to_owned(), error.details()),
            other => (other.to_string(), None),
        };

        ErrorEnvelope {
            error: ErrorBody {
                code: self.code().to_owned(),
                message,
                details,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(code = self.code(), status = status.as_u16(), "request failed: {}", self);
        } else {
            warn!(code = self.code(), status = status.as_u16(), "request rejected: {}", self);
        }

        let mut response = (status, Json(self.envelope())).into_response();
        if let Self::RateLimited { retry_after_secs } = self {
            if let Ok(value) = HeaderValue::from_str(&retry_after_secs.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }
        response
    }
}

/// Startup failures mapped to process exit codes.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("rate limit must allow at least one request per minute")]
    ZeroRateLimit,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ServerError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) | Self::ZeroRateLimit => 2,
            Self::Io(_) => 10,
        }
    }
}
