use std::any::Any;

use axum::body::Body;
use axum::http::{header, HeaderValue, Method, Request};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{middleware, Router};
use pricegate_core::PriceGateway;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tower_http::LatencyUnit;
use tracing::{error, info_span, Level};

use crate::error::{ApiError, ServerError};
use crate::rate_limit::{self, ClientRateLimiter};
use crate::routes;

/// Shared handler state; cheap to clone.
#[derive(Clone)]
pub struct AppState {
    gateway: PriceGateway,
    rate_limiter: ClientRateLimiter,
}

impl AppState {
    pub fn new(gateway: PriceGateway, rate_limit_per_minute: u32) -> Result<Self, ServerError> {
        Ok(Self {
            gateway,
            rate_limiter: ClientRateLimiter::per_minute(rate_limit_per_minute)?,
        })
    }

    pub fn gateway(&self) -> &PriceGateway {
        &self.gateway
    }

    pub fn rate_limiter(&self) -> &ClientRateLimiter {
        &self.rate_limiter
    }
}

/// Builds the full application router with middleware.
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/health",
            get(routes::health).fallback(routes::method_not_allowed),
        )
        .route(
            "/prices/batch",
            post(routes::batch_prices).fallback(routes::method_not_allowed),
        )
        .route(
            "/prices/:symbol",
            get(routes::price).fallback(routes::method_not_allowed),
        );

    let layers = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = request
                        .headers()
                        .get("x-request-id")
                        .and_then(|value| value.to_str().ok())
                        .unwrap_or("-");
                    info_span!(
                        "request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id,
                    )
                })
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(LatencyUnit::Millis),
                ),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors())
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_DNS_PREFETCH_CONTROL,
            HeaderValue::from_static("off"),
        ));

    Router::new()
        .route("/", get(routes::index).fallback(routes::method_not_allowed))
        .nest("/api/v1", api)
        .fallback(routes::not_found)
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit::enforce))
        .layer(layers)
        .with_state(state)
}

// Mirrors the caller's origin so browser clients with credentials work.
fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(panic = detail, "handler panicked");
    ApiError::Internal.into_response()
}
