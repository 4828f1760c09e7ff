use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::Json;
use pricegate_core::{
    validate_batch_value, BatchOutcome, HealthStatus, PriceOutcome, PricePoint, ValidationError,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::app::AppState;
use crate::error::ApiError;

/// Response body of `POST /api/v1/prices/batch`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchPriceResponse {
    pub results: Vec<PriceOutcome>,
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
}

impl From<BatchOutcome> for BatchPriceResponse {
    fn from(outcome: BatchOutcome) -> Self {
        let total = outcome.total();
        let successful = outcome.successful();
        let failed = outcome.failed();
        Self {
            results: outcome.into_results(),
            total,
            successful,
            failed,
        }
    }
}

/// `GET /`
pub async fn index() -> Json<Value> {
    Json(json!({
        "name": "pricegate",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/api/v1/health",
            "singlePrice": "/api/v1/prices/:symbol",
            "batchPrice": "/api/v1/prices/batch",
        },
    }))
}

/// `GET /api/v1/health`. Always 200; a failing probe reports `degraded`.
pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(state.gateway().check_health().await)
}

/// `GET /api/v1/prices/:symbol`
pub async fn price(
    State(state): State<AppState>,
    symbol: Result<Path<String>, PathRejection>,
) -> Result<Json<PricePoint>, ApiError> {
    let Path(symbol) = symbol.map_err(|rejection| ValidationError::MalformedPath {
        reason: rejection.body_text(),
    })?;
    info!(%symbol, "GET /prices/:symbol request");
    let point = state.gateway().get_price(&symbol).await?;
    Ok(Json(point))
}

/// `POST /api/v1/prices/batch`
pub async fn batch_prices(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<BatchPriceResponse>, ApiError> {
    let Json(body) = body.map_err(|rejection| ValidationError::MalformedBody {
        reason: rejection.body_text(),
    })?;

    let symbols = match body.get("symbols") {
        None | Some(Value::Null) => {
            warn!("POST /prices/batch request missing symbols field");
            return Err(ValidationError::MissingSymbols.into());
        }
        Some(symbols) => symbols,
    };

    let gateway = state.gateway();
    let symbols = validate_batch_value(symbols, gateway.max_batch_symbols())?;
    info!(count = symbols.len(), "POST /prices/batch request");

    let outcome = gateway.fetch_batch(&symbols).await;
    Ok(Json(BatchPriceResponse::from(outcome)))
}

/// Fallback for unknown routes.
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

/// Fallback for known routes hit with an unsupported method.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
