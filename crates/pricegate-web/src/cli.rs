//! Server options for `pricegate`.
//!
//! Every option can also be supplied through the environment, which is how
//! the service is normally configured in containers.
//!
//! | Option | Env | Default |
//! |--------|-----|---------|
//! | `--host` | `HOST` | `0.0.0.0` |
//! | `--port` | `PORT` | `3000` |
//! | `--log-level` | `LOG_LEVEL` | `info` |
//! | `--api-key` | `BINANCE_API_KEY` | empty |
//! | `--base-url` | `BINANCE_BASE_URL` | `https://fapi.binance.com` |
//! | `--testnet` | `BINANCE_TESTNET` | `false` |
//! | `--rate-limit-max-requests` | `RATE_LIMIT_MAX_REQUESTS` | `100` |
//! | `--max-batch-symbols` | `MAX_BATCH_SYMBOLS` | `20` |
//! | `--request-timeout-ms` | `REQUEST_TIMEOUT_MS` | `5000` |
//!
//! ```bash
//! BINANCE_TESTNET=true pricegate --port 8080 --log-level debug
//! ```

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use clap::{Parser, ValueEnum};
use pricegate_core::{config, GatewayConfig, DEFAULT_MAX_BATCH_SYMBOLS};

/// Price gateway HTTP service for perpetual futures tickers.
#[derive(Debug, Clone, Parser)]
#[command(name = "pricegate", author, version, about)]
pub struct Cli {
    /// Interface to bind.
    #[arg(long, env = "HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Minimum log level; `RUST_LOG` takes precedence when set.
    #[arg(long, env = "LOG_LEVEL", value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Exchange API key, sent as `X-MBX-APIKEY` when non-empty.
    #[arg(long, env = "BINANCE_API_KEY", default_value = "", hide_env_values = true)]
    pub api_key: String,

    /// Exchange REST base URL; ignored with `--testnet`.
    #[arg(long, env = "BINANCE_BASE_URL", default_value = config::DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Use the exchange testnet instead of `--base-url`.
    #[arg(long, env = "BINANCE_TESTNET", default_value_t = false)]
    pub testnet: bool,

    /// Requests allowed per client IP per minute.
    #[arg(long, env = "RATE_LIMIT_MAX_REQUESTS", default_value_t = 100)]
    pub rate_limit_max_requests: u32,

    /// Maximum symbols accepted by one batch request.
    #[arg(long, env = "MAX_BATCH_SYMBOLS", default_value_t = DEFAULT_MAX_BATCH_SYMBOLS)]
    pub max_batch_symbols: usize,

    /// Upstream request timeout in milliseconds.
    #[arg(long, env = "REQUEST_TIMEOUT_MS", default_value_t = config::DEFAULT_TIMEOUT_MS)]
    pub request_timeout_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
}

impl LogLevel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        }
    }
}

impl Cli {
    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig {
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            testnet: self.testnet,
            timeout_ms: self.request_timeout_ms,
            max_batch_symbols: self.max_batch_symbols,
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
