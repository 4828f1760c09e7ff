//! Stub upstream shared by behaviour tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use pricegate_core::{HttpError, PriceGateway, Symbol, TickerApi, TickerPrice};

pub const BTC_TIME: i64 = 1_705_612_800_000;

#[derive(Clone)]
struct Scripted {
    response: Result<TickerPrice, HttpError>,
    delay: Duration,
}

/// Ticker stub with per-symbol scripted responses.
///
/// Unscripted symbols answer with an upstream `Invalid symbol.` status error.
#[derive(Default)]
pub struct StubTicker {
    scripted: HashMap<String, Scripted>,
    panicking: HashSet<String>,
    ping: Option<HttpError>,
    price_calls: AtomicUsize,
    ping_calls: AtomicUsize,
}

impl StubTicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_price(self, symbol: &str, price: &str, time: i64) -> Self {
        self.with_response(symbol, Ok(TickerPrice::new(symbol, price, Some(time))))
    }

    pub fn with_response(self, symbol: &str, response: Result<TickerPrice, HttpError>) -> Self {
        self.with_delayed_response(symbol, response, Duration::ZERO)
    }

    pub fn with_delayed_response(
        mut self,
        symbol: &str,
        response: Result<TickerPrice, HttpError>,
        delay: Duration,
    ) -> Self {
        self.scripted
            .insert(symbol.to_owned(), Scripted { response, delay });
        self
    }

    /// Makes lookups of `symbol` panic inside the spawned task.
    pub fn with_panic(mut self, symbol: &str) -> Self {
        self.panicking.insert(symbol.to_owned());
        self
    }

    pub fn with_failing_ping(mut self, error: HttpError) -> Self {
        self.ping = Some(error);
        self
    }

    pub fn price_calls(&self) -> usize {
        self.price_calls.load(Ordering::SeqCst)
    }

    pub fn ping_calls(&self) -> usize {
        self.ping_calls.load(Ordering::SeqCst)
    }
}

impl TickerApi for StubTicker {
    fn ticker_price<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> Pin<Box<dyn Future<Output = Result<TickerPrice, HttpError>> + Send + 'a>> {
        self.price_calls.fetch_add(1, Ordering::SeqCst);
        let scripted = self.scripted.get(symbol.as_str()).cloned();
        let panics = self.panicking.contains(symbol.as_str());

        Box::pin(async move {
            if panics {
                panic!("ticker stub blew up for {symbol}");
            }
            match scripted {
                Some(Scripted { response, delay }) => {
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    response
                }
                None => Err(HttpError::status(400, "Invalid symbol.")),
            }
        })
    }

    fn ping<'a>(&'a self) -> Pin<Box<dyn Future<Output = Result<(), HttpError>> + Send + 'a>> {
        self.ping_calls.fetch_add(1, Ordering::SeqCst);
        let result = match &self.ping {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        };
        Box::pin(async move { result })
    }
}

pub fn gateway(stub: StubTicker) -> (PriceGateway, Arc<StubTicker>) {
    let stub = Arc::new(stub);
    (PriceGateway::new(stub.clone(), 20), stub)
}

pub fn symbol(value: &str) -> Symbol {
    Symbol::parse(value).expect("valid symbol")
}
