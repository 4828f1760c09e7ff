use std::fmt::{Display, Formatter};

use serde_json::{json, Value};
use thiserror::Error;

use crate::Symbol;

/// Validation errors raised before any upstream call is made.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol must be a non-empty string")]
    EmptySymbol,
    #[error("symbol must contain only letters and numbers: invalid character '{ch}' at index {index}")]
    SymbolInvalidChar {
        symbol: String,
        ch: char,
        index: usize,
    },
    #[error("symbol must be between {min} and {max} characters, got {len}")]
    SymbolLength {
        symbol: String,
        len: usize,
        min: usize,
        max: usize,
    },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },

    #[error("request body must be valid JSON: {reason}")]
    MalformedBody { reason: String },
    #[error("request path is malformed: {reason}")]
    MalformedPath { reason: String },
    #[error("symbols field is required")]
    MissingSymbols,
    #[error("symbols must be an array")]
    BatchNotArray,
    #[error("symbols array cannot be empty")]
    EmptyBatch,
    #[error("cannot request more than {max} symbols at once, got {provided}")]
    BatchTooLarge { provided: usize, max: usize },
    #[error("invalid symbol at index {index} ({value}): symbol must be a string")]
    BatchItemNotString { index: usize, value: String },
    #[error("invalid symbol at index {index} ('{value}'): {reason}")]
    InvalidBatchItem {
        index: usize,
        value: String,
        reason: Box<ValidationError>,
    },
    #[error("duplicate symbols are not allowed: '{symbol}' appears more than once")]
    DuplicateSymbol {
        symbol: String,
        provided: usize,
        unique: usize,
    },
}

impl ValidationError {
    /// Structured context for error envelopes.
    pub fn details(&self) -> Option<Value> {
        match self {
            Self::EmptySymbol
            | Self::MissingSymbols
            | Self::BatchNotArray
            | Self::EmptyBatch => None,
            Self::SymbolInvalidChar { symbol, .. } | Self::SymbolLength { symbol, .. } => {
                Some(json!({ "symbol": symbol }))
            }
            Self::NonFiniteValue { field } | Self::NegativeValue { field } => {
                Some(json!({ "field": field }))
            }
            Self::MalformedBody { reason } | Self::MalformedPath { reason } => {
                Some(json!({ "reason": reason }))
            }
            Self::BatchTooLarge { provided, max } => {
                Some(json!({ "provided": provided, "max": max }))
            }
            Self::BatchItemNotString { index, value } => {
                Some(json!({ "index": index, "symbol": value }))
            }
            Self::InvalidBatchItem {
                index,
                value,
                reason,
            } => Some(json!({
                "index": index,
                "symbol": value,
                "reason": reason.to_string(),
            })),
            Self::DuplicateSymbol {
                symbol,
                provided,
                unique,
            } => Some(json!({
                "symbol": symbol,
                "provided": provided,
                "unique": unique,
            })),
        }
    }
}

/// Configuration errors detected at startup.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("upstream base url must start with http:// or https://: '{value}'")]
    InvalidBaseUrl { value: String },
    #[error("request timeout must be greater than zero")]
    ZeroTimeout,
    #[error("maximum batch size must be greater than zero")]
    ZeroBatchSize,
}

/// Classification of a failed upstream lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayErrorKind {
    /// Upstream answered, but the payload was unusable, or the failure was unclassified.
    Upstream,
    /// Upstream could not be reached or timed out.
    ServiceUnavailable,
}

/// Structured error returned by [`PriceGateway`](crate::PriceGateway) lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayError {
    kind: GatewayErrorKind,
    message: String,
    symbol: Option<Symbol>,
    cause: Option<String>,
}

impl GatewayError {
    pub fn upstream(message: impl Into<String>) -> Self {
        Self {
            kind: GatewayErrorKind::Upstream,
            message: message.into(),
            symbol: None,
            cause: None,
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: GatewayErrorKind::ServiceUnavailable,
            message: message.into(),
            symbol: None,
            cause: None,
        }
    }

    pub fn with_symbol(mut self, symbol: Symbol) -> Self {
        self.symbol = Some(symbol);
        self
    }

    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    pub const fn kind(&self) -> GatewayErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn symbol(&self) -> Option<&Symbol> {
        self.symbol.as_ref()
    }

    /// Original transport or decode message, kept for diagnostics.
    pub fn cause(&self) -> Option<&str> {
        self.cause.as_deref()
    }

    pub const fn retryable(&self) -> bool {
        matches!(self.kind, GatewayErrorKind::ServiceUnavailable)
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            GatewayErrorKind::Upstream => "UPSTREAM_ERROR",
            GatewayErrorKind::ServiceUnavailable => "SERVICE_UNAVAILABLE",
        }
    }

    pub fn details(&self) -> Option<Value> {
        if self.symbol.is_none() && self.cause.is_none() {
            return None;
        }

        let mut details = serde_json::Map::new();
        if let Some(symbol) = &self.symbol {
            details.insert(String::from("symbol"), Value::from(symbol.as_str()));
        }
        if let Some(cause) = &self.cause {
            details.insert(String::from("originalError"), Value::from(cause.as_str()));
        }
        Some(Value::Object(details))
    }
}

impl Display for GatewayError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for GatewayError {}
