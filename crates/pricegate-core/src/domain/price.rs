use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Symbol, ValidationError};

/// Single price observation for a symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub symbol: Symbol,
    pub price: f64,
    /// Epoch milliseconds.
    pub timestamp: i64,
}

impl PricePoint {
    pub fn new(symbol: Symbol, price: f64, timestamp: i64) -> Result<Self, ValidationError> {
        if !price.is_finite() {
            return Err(ValidationError::NonFiniteValue { field: "price" });
        }
        if price < 0.0 {
            return Err(ValidationError::NegativeValue { field: "price" });
        }

        Ok(Self {
            symbol,
            price,
            timestamp,
        })
    }
}

/// Result slot for one symbol of a batch lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceOutcome {
    Price(PricePoint),
    Failed { symbol: Symbol, error: String },
}

impl PriceOutcome {
    pub fn symbol(&self) -> &Symbol {
        match self {
            Self::Price(point) => &point.symbol,
            Self::Failed { symbol, .. } => symbol,
        }
    }

    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Price(_))
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Price(_) => None,
            Self::Failed { error, .. } => Some(error),
        }
    }
}

/// Ordered per-symbol outcomes; one entry per requested symbol.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchOutcome {
    results: Vec<PriceOutcome>,
}

impl BatchOutcome {
    pub fn new(results: Vec<PriceOutcome>) -> Self {
        Self { results }
    }

    pub fn results(&self) -> &[PriceOutcome] {
        &self.results
    }

    pub fn into_results(self) -> Vec<PriceOutcome> {
        self.results
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn successful(&self) -> usize {
        self.results.iter().filter(|outcome| outcome.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.successful()
    }
}

/// Aggregate service health.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthState {
    Healthy,
    Degraded,
}

/// Health snapshot computed on every check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: HealthState,
    pub upstream_connected: bool,
    /// Epoch milliseconds.
    pub timestamp: i64,
}

impl HealthStatus {
    pub fn from_probe(upstream_connected: bool) -> Self {
        let status = if upstream_connected {
            HealthState::Healthy
        } else {
            HealthState::Degraded
        };

        Self {
            status,
            upstream_connected,
            timestamp: now_millis(),
        }
    }
}

/// Current wall clock in epoch milliseconds.
pub fn now_millis() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}
