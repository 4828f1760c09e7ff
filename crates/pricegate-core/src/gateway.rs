//! Price gateway: single and batch lookups plus upstream health.
//!
//! # Error mapping
//!
//! | Upstream condition | Result |
//! |--------------------|--------|
//! | timeout, connection refused/DNS failure | [`GatewayErrorKind::ServiceUnavailable`] |
//! | missing, unparsable or negative `price` | [`GatewayErrorKind::Upstream`] |
//! | non-2xx status, undecodable body, anything else | [`GatewayErrorKind::Upstream`] with the original message as cause |
//!
//! Batch lookups never fail as a whole: each symbol's error lands in its own
//! slot of the [`BatchOutcome`].
//!
//! [`GatewayErrorKind::ServiceUnavailable`]: crate::GatewayErrorKind::ServiceUnavailable
//! [`GatewayErrorKind::Upstream`]: crate::GatewayErrorKind::Upstream

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::config::GatewayConfig;
use crate::domain::now_millis;
use crate::http_client::{HttpError, HttpErrorKind};
use crate::upstream::{BinanceTickerApi, RawPrice, TickerApi, TickerPrice};
use crate::validation::{validate_batch, validate_symbol};
use crate::{
    BatchOutcome, GatewayError, HealthStatus, PriceOutcome, PricePoint, Symbol, ValidationError,
};

/// Orchestrates upstream ticker calls for the HTTP layer.
#[derive(Clone)]
pub struct PriceGateway {
    api: Arc<dyn TickerApi>,
    max_batch_symbols: usize,
}

impl PriceGateway {
    pub fn new(api: Arc<dyn TickerApi>, max_batch_symbols: usize) -> Self {
        Self {
            api,
            max_batch_symbols,
        }
    }

    /// Gateway backed by the real exchange over reqwest.
    pub fn from_config(config: &GatewayConfig) -> Self {
        info!(?config, "price gateway initialized");
        Self::new(
            Arc::new(BinanceTickerApi::new(config)),
            config.max_batch_symbols,
        )
    }

    pub const fn max_batch_symbols(&self) -> usize {
        self.max_batch_symbols
    }

    /// Fetches the current price for one symbol.
    pub async fn fetch_one(&self, symbol: &Symbol) -> Result<PricePoint, GatewayError> {
        debug!(%symbol, "fetching price");

        let result = match self.api.ticker_price(symbol).await {
            Ok(ticker) => normalize_ticker(symbol, ticker),
            Err(transport) => Err(map_transport_error(symbol, transport)),
        };

        match &result {
            Ok(point) => debug!(%symbol, price = point.price, "price fetched"),
            Err(err) => error!(
                %symbol,
                code = err.code(),
                cause = err.cause().unwrap_or_default(),
                "error fetching price: {}",
                err.message()
            ),
        }
        result
    }

    /// Fetches every symbol concurrently and collects each outcome in input order.
    pub async fn fetch_batch(&self, symbols: &[Symbol]) -> BatchOutcome {
        debug!(count = symbols.len(), "fetching batch prices");

        let handles: Vec<_> = symbols
            .iter()
            .cloned()
            .map(|symbol| {
                let gateway = self.clone();
                tokio::spawn(async move { gateway.fetch_one(&symbol).await })
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for (symbol, handle) in symbols.iter().zip(handles) {
            let outcome = match handle.await {
                Ok(Ok(point)) => PriceOutcome::Price(point),
                Ok(Err(err)) => {
                    warn!(%symbol, error = err.message(), "failed to fetch price in batch");
                    PriceOutcome::Failed {
                        symbol: symbol.clone(),
                        error: err.message().to_owned(),
                    }
                }
                Err(join_error) => {
                    warn!(%symbol, error = %join_error, "batch lookup task aborted");
                    PriceOutcome::Failed {
                        symbol: symbol.clone(),
                        error: format!("Failed to fetch price for {symbol}"),
                    }
                }
            };
            results.push(outcome);
        }

        let outcome = BatchOutcome::new(results);
        debug!(
            total = outcome.total(),
            successful = outcome.successful(),
            failed = outcome.failed(),
            "batch price fetch completed"
        );
        outcome
    }

    /// Probes upstream reachability. Never fails: probe errors report as degraded.
    pub async fn check_health(&self) -> HealthStatus {
        let connected = match self.api.ping().await {
            Ok(()) => {
                debug!("upstream connection check succeeded");
                true
            }
            Err(err) => {
                error!(error = err.message(), "upstream connection check failed");
                false
            }
        };
        HealthStatus::from_probe(connected)
    }

    /// Validates `input` and fetches its price.
    pub async fn get_price(&self, input: &str) -> Result<PricePoint, PriceLookupError> {
        let symbol = validate_symbol(input)?;
        info!(%symbol, "fetching price for symbol");
        Ok(self.fetch_one(&symbol).await?)
    }

    /// Validates `inputs` as a batch and fetches every price.
    pub async fn get_batch_prices<S: AsRef<str>>(
        &self,
        inputs: &[S],
    ) -> Result<BatchOutcome, ValidationError> {
        let symbols = validate_batch(inputs, self.max_batch_symbols)?;
        info!(count = symbols.len(), "fetching batch prices");
        Ok(self.fetch_batch(&symbols).await)
    }
}

/// Failure of a validated single lookup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PriceLookupError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

fn normalize_ticker(symbol: &Symbol, ticker: TickerPrice) -> Result<PricePoint, GatewayError> {
    let price = match ticker.price {
        Some(RawPrice::Text(text)) => text.trim().parse::<f64>().map_err(|_| {
            GatewayError::upstream(format!("Malformed price data returned for symbol: {symbol}"))
                .with_symbol(symbol.clone())
                .with_cause(format!("unparsable price '{text}'"))
        })?,
        Some(RawPrice::Number(value)) => value,
        None => {
            return Err(GatewayError::upstream(format!(
                "No price data returned for symbol: {symbol}"
            ))
            .with_symbol(symbol.clone()));
        }
    };

    let timestamp = ticker.time.unwrap_or_else(now_millis);
    PricePoint::new(symbol.clone(), price, timestamp).map_err(|invalid| {
        GatewayError::upstream(format!("Malformed price data returned for symbol: {symbol}"))
            .with_symbol(symbol.clone())
            .with_cause(invalid.to_string())
    })
}

fn map_transport_error(symbol: &Symbol, transport: HttpError) -> GatewayError {
    let error = match transport.kind() {
        HttpErrorKind::Timeout => GatewayError::unavailable("Request to upstream API timed out"),
        HttpErrorKind::Connect => GatewayError::unavailable("Unable to connect to upstream API"),
        // The exchange message (e.g. "Invalid symbol.") is what callers need to see.
        HttpErrorKind::Status(_) => GatewayError::upstream(transport.message()),
        HttpErrorKind::Decode | HttpErrorKind::Other => {
            GatewayError::upstream(format!("Failed to fetch price for {symbol}"))
        }
    };

    error
        .with_symbol(symbol.clone())
        .with_cause(transport.message())
}
