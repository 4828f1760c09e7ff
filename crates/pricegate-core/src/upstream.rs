//! Upstream exchange ticker API.
//!
//! [`TickerApi`] is the seam between the gateway and the exchange: the gateway
//! only sees raw payloads and classified transport errors, and tests swap in a
//! stub implementation instead of patching a global client.
//!
//! | Call | Upstream endpoint |
//! |------|-------------------|
//! | [`TickerApi::ticker_price`] | `GET /fapi/v1/ticker/price?symbol=X` |
//! | [`TickerApi::ping`] | `GET /fapi/v1/ping` |

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use crate::config::GatewayConfig;
use crate::http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};
use crate::Symbol;

const API_KEY_HEADER: &str = "X-MBX-APIKEY";
const TICKER_PRICE_PATH: &str = "/fapi/v1/ticker/price";
const PING_PATH: &str = "/fapi/v1/ping";

/// Raw ticker payload. Every field is optional so that gaps surface as
/// gateway errors instead of decode failures.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TickerPrice {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub price: Option<RawPrice>,
    /// Epoch milliseconds.
    #[serde(default)]
    pub time: Option<i64>,
}

impl TickerPrice {
    pub fn new(symbol: impl Into<String>, price: impl Into<String>, time: Option<i64>) -> Self {
        Self {
            symbol: Some(symbol.into()),
            price: Some(RawPrice::Text(price.into())),
            time,
        }
    }
}

/// Price as sent upstream: normally a decimal string, occasionally a number.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawPrice {
    Text(String),
    Number(f64),
}

/// Error body returned by the exchange on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ExchangeErrorBody {
    code: Option<i64>,
    msg: Option<String>,
}

/// Exchange calls needed by the gateway.
pub trait TickerApi: Send + Sync {
    /// Fetch the latest price for one symbol.
    fn ticker_price<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> Pin<Box<dyn Future<Output = Result<TickerPrice, HttpError>> + Send + 'a>>;

    /// Lightweight reachability probe with no business payload.
    fn ping<'a>(&'a self) -> Pin<Box<dyn Future<Output = Result<(), HttpError>> + Send + 'a>>;
}

/// Binance USD-M futures ticker over any [`HttpClient`].
#[derive(Clone)]
pub struct BinanceTickerApi {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    api_key: String,
    timeout_ms: u64,
}

impl BinanceTickerApi {
    pub fn new(config: &GatewayConfig) -> Self {
        Self::with_http_client(Arc::new(ReqwestHttpClient::new()), config)
    }

    pub fn with_http_client(http_client: Arc<dyn HttpClient>, config: &GatewayConfig) -> Self {
        Self {
            http_client,
            base_url: config.effective_base_url().to_owned(),
            api_key: config.api_key.clone(),
            timeout_ms: config.timeout_ms,
        }
    }

    fn request(&self, path_and_query: &str) -> HttpRequest {
        let request = HttpRequest::get(format!("{}{path_and_query}", self.base_url))
            .with_timeout_ms(self.timeout_ms);

        if self.api_key.is_empty() {
            request
        } else {
            request.with_header(API_KEY_HEADER, &self.api_key)
        }
    }

    async fn call(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        debug!(url = %request.url, "calling upstream");
        let response = self.http_client.execute(request).await?;

        if !response.is_success() {
            return Err(status_error(&response));
        }
        Ok(response)
    }
}

impl TickerApi for BinanceTickerApi {
    fn ticker_price<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> Pin<Box<dyn Future<Output = Result<TickerPrice, HttpError>> + Send + 'a>> {
        Box::pin(async move {
            // Symbols are ASCII alphanumeric, so no query encoding is needed.
            let request = self.request(&format!("{TICKER_PRICE_PATH}?symbol={symbol}"));
            let response = self.call(request).await?;

            serde_json::from_str(&response.body)
                .map_err(|e| HttpError::decode(format!("invalid ticker payload: {e}")))
        })
    }

    fn ping<'a>(&'a self) -> Pin<Box<dyn Future<Output = Result<(), HttpError>> + Send + 'a>> {
        Box::pin(async move {
            self.call(self.request(PING_PATH)).await?;
            Ok(())
        })
    }
}

fn status_error(response: &HttpResponse) -> HttpError {
    let message = match serde_json::from_str::<ExchangeErrorBody>(&response.body) {
        Ok(ExchangeErrorBody {
            msg: Some(msg),
            code,
        }) => match code {
            Some(code) => format!("{msg} (upstream code {code})"),
            None => msg,
        },
        _ => format!("upstream returned status {}", response.status),
    };
    HttpError::status(response.status, message)
}
