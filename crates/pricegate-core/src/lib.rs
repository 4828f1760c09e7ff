//! # Pricegate Core
//!
//! Symbol validation, upstream ticker access and the price gateway behind the
//! pricegate HTTP facade.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Upstream endpoint, credentials and limits |
//! | [`domain`] | Domain models (Symbol, PricePoint, BatchOutcome, HealthStatus) |
//! | [`error`] | Validation, configuration and gateway errors |
//! | [`gateway`] | Single/batch lookups and health checks |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`upstream`] | Exchange ticker API contract and Binance implementation |
//! | [`validation`] | Single and batch symbol validation |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pricegate_core::{GatewayConfig, PriceGateway};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let gateway = PriceGateway::from_config(&GatewayConfig::default());
//!
//!     let point = gateway.get_price("btcusdt").await?;
//!     println!("{}: {}", point.symbol, point.price);
//!
//!     let batch = gateway.get_batch_prices(&["BTCUSDT", "ETHUSDT"]).await?;
//!     println!("{} of {} succeeded", batch.successful(), batch.total());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  HTTP boundary  │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │   Validation    │  (fail fast, no I/O)
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │  PriceGateway   │────▶│ TickerApi        │
//! │ (fan-out/join)  │     │ (Binance/stub)   │
//! └─────────────────┘     └────────┬─────────┘
//!                                  │
//!                                  ▼
//!                         ┌──────────────────┐
//!                         │ HttpClient       │
//!                         │ (reqwest)        │
//!                         └──────────────────┘
//! ```
//!
//! ## Security
//!
//! - The API key is sent only as the `X-MBX-APIKEY` header and never logged
//! - Symbols are restricted to ASCII alphanumerics before any URL is built

pub mod config;
pub mod domain;
pub mod error;
pub mod gateway;
pub mod http_client;
pub mod upstream;
pub mod validation;

pub use config::GatewayConfig;

pub use domain::{
    BatchOutcome, HealthState, HealthStatus, PriceOutcome, PricePoint, Symbol, MAX_SYMBOL_LEN,
    MIN_SYMBOL_LEN,
};

pub use error::{ConfigError, GatewayError, GatewayErrorKind, ValidationError};

pub use gateway::{PriceGateway, PriceLookupError};

pub use http_client::{
    HttpClient, HttpError, HttpErrorKind, HttpRequest, HttpResponse, ReqwestHttpClient,
};

pub use upstream::{BinanceTickerApi, RawPrice, TickerApi, TickerPrice};

pub use validation::{
    validate_batch, validate_batch_value, validate_symbol, DEFAULT_MAX_BATCH_SYMBOLS,
};
