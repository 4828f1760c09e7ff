use crate::error::ConfigError;
use crate::validation::DEFAULT_MAX_BATCH_SYMBOLS;

pub const DEFAULT_BASE_URL: &str = "https://fapi.binance.com";
pub const TESTNET_BASE_URL: &str = "https://testnet.binancefuture.com";
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

/// Upstream endpoint, credentials and request limits consumed by the gateway.
#[derive(Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub base_url: String,
    pub api_key: String,
    pub testnet: bool,
    pub timeout_ms: u64,
    pub max_batch_symbols: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: String::from(DEFAULT_BASE_URL),
            api_key: String::new(),
            testnet: false,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_batch_symbols: DEFAULT_MAX_BATCH_SYMBOLS,
        }
    }
}

impl GatewayConfig {
    /// Base URL actually used for upstream calls; testnet overrides `base_url`.
    pub fn effective_base_url(&self) -> &str {
        if self.testnet {
            TESTNET_BASE_URL
        } else {
            self.base_url.trim_end_matches('/')
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.effective_base_url();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl {
                value: self.base_url.clone(),
            });
        }
        if self.timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.max_batch_symbols == 0 {
            return Err(ConfigError::ZeroBatchSize);
        }
        Ok(())
    }
}

// Credentials stay out of logs.
impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("base_url", &self.effective_base_url())
            .field("api_key_set", &!self.api_key.is_empty())
            .field("testnet", &self.testnet)
            .field("timeout_ms", &self.timeout_ms)
            .field("max_batch_symbols", &self.max_batch_symbols)
            .finish()
    }
}
