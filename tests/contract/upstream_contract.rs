//! Contract tests for the Binance ticker client wired into the gateway.
//!
//! The HTTP transport is scripted, so these run the full stack from
//! `PriceGateway` down to request building and payload decoding offline.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use pricegate_core::{
    BinanceTickerApi, GatewayConfig, GatewayErrorKind, HealthState, HttpClient, HttpError,
    HttpRequest, HttpResponse, PriceGateway, Symbol,
};

/// Transport that answers by URL and records every request it sees.
#[derive(Default)]
struct ScriptedTransport {
    routes: HashMap<String, Result<HttpResponse, HttpError>>,
    seen: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    fn route(mut self, url: &str, response: Result<HttpResponse, HttpError>) -> Self {
        self.routes.insert(url.to_owned(), response);
        self
    }

    fn seen(&self) -> Vec<String> {
        self.seen.lock().expect("lock").clone()
    }
}

impl HttpClient for ScriptedTransport {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        self.seen.lock().expect("lock").push(request.url.clone());
        let response = self
            .routes
            .get(&request.url)
            .cloned()
            .unwrap_or_else(|| Err(HttpError::connect("connection refused")));
        Box::pin(async move { response })
    }
}

const BASE: &str = "http://exchange.test";

fn ticker_url(symbol: &str) -> String {
    format!("{BASE}/fapi/v1/ticker/price?symbol={symbol}")
}

fn gateway_over(transport: Arc<ScriptedTransport>) -> PriceGateway {
    let config = GatewayConfig {
        base_url: String::from(BASE),
        ..GatewayConfig::default()
    };
    let api = BinanceTickerApi::with_http_client(transport, &config);
    PriceGateway::new(Arc::new(api), config.max_batch_symbols)
}

#[tokio::test]
async fn ticker_payload_is_normalized_into_price_point() {
    let transport = Arc::new(ScriptedTransport::default().route(
        &ticker_url("BTCUSDT"),
        Ok(HttpResponse::ok_json(
            r#"{"symbol":"BTCUSDT","price":"45000.50","time":1705612800000}"#,
        )),
    ));
    let gateway = gateway_over(transport.clone());

    let point = gateway.get_price("btcusdt").await.expect("price");

    assert_eq!(point.symbol.as_str(), "BTCUSDT");
    assert_eq!(point.price, 45000.5);
    assert_eq!(point.timestamp, 1_705_612_800_000);
    assert_eq!(transport.seen(), vec![ticker_url("BTCUSDT")]);
}

#[tokio::test]
async fn exchange_rejection_becomes_upstream_error_with_exchange_message() {
    let transport = Arc::new(ScriptedTransport::default().route(
        &ticker_url("INVALIDXXX"),
        Ok(HttpResponse {
            status: 400,
            body: String::from(r#"{"code":-1121,"msg":"Invalid symbol."}"#),
        }),
    ));
    let gateway = gateway_over(transport);
    let symbol = Symbol::parse("INVALIDXXX").expect("valid");

    let error = gateway.fetch_one(&symbol).await.expect_err("should fail");

    assert_eq!(error.kind(), GatewayErrorKind::Upstream);
    assert!(error.message().contains("Invalid symbol."));
}

#[tokio::test]
async fn unreachable_exchange_becomes_service_unavailable() {
    let gateway = gateway_over(Arc::new(ScriptedTransport::default()));
    let symbol = Symbol::parse("BTCUSDT").expect("valid");

    let error = gateway.fetch_one(&symbol).await.expect_err("should fail");

    assert_eq!(error.kind(), GatewayErrorKind::ServiceUnavailable);
}

#[tokio::test]
async fn html_error_page_becomes_upstream_error() {
    let transport = Arc::new(ScriptedTransport::default().route(
        &ticker_url("BTCUSDT"),
        Ok(HttpResponse::ok_json("<html>maintenance</html>")),
    ));
    let gateway = gateway_over(transport);
    let symbol = Symbol::parse("BTCUSDT").expect("valid");

    let error = gateway.fetch_one(&symbol).await.expect_err("should fail");

    assert_eq!(error.kind(), GatewayErrorKind::Upstream);
    assert!(error.cause().is_some_and(|cause| cause.contains("invalid ticker payload")));
}

#[tokio::test]
async fn batch_issues_one_request_per_symbol() {
    let transport = Arc::new(
        ScriptedTransport::default()
            .route(
                &ticker_url("BTCUSDT"),
                Ok(HttpResponse::ok_json(r#"{"symbol":"BTCUSDT","price":"45000.50"}"#)),
            )
            .route(
                &ticker_url("ETHUSDT"),
                Ok(HttpResponse::ok_json(r#"{"symbol":"ETHUSDT","price":"2500.75"}"#)),
            ),
    );
    let gateway = gateway_over(transport.clone());

    let outcome = gateway
        .get_batch_prices(&["BTCUSDT", "ETHUSDT"])
        .await
        .expect("valid batch");

    assert_eq!(outcome.successful(), 2);
    let mut seen = transport.seen();
    seen.sort();
    assert_eq!(seen, vec![ticker_url("BTCUSDT"), ticker_url("ETHUSDT")]);
}

#[tokio::test]
async fn health_probe_hits_ping_endpoint() {
    let transport = Arc::new(
        ScriptedTransport::default()
            .route(&format!("{BASE}/fapi/v1/ping"), Ok(HttpResponse::ok_json("{}"))),
    );
    let gateway = gateway_over(transport.clone());

    let health = gateway.check_health().await;

    assert_eq!(health.status, HealthState::Healthy);
    assert_eq!(transport.seen(), vec![format!("{BASE}/fapi/v1/ping")]);
}

#[tokio::test]
async fn failing_ping_reports_degraded() {
    let transport = Arc::new(ScriptedTransport::default().route(
        &format!("{BASE}/fapi/v1/ping"),
        Ok(HttpResponse {
            status: 503,
            body: String::new(),
        }),
    ));
    let gateway = gateway_over(transport);

    let health = gateway.check_health().await;

    assert_eq!(health.status, HealthState::Degraded);
    assert!(!health.upstream_connected);
}
