//! HTTP surface of the price gateway.
//!
//! Routes live under `/api/v1`; see [`app::build_router`] for the full
//! middleware stack (request ids, tracing, CORS, security headers, per-IP
//! rate limiting).

pub mod app;
pub mod cli;
pub mod error;
pub mod rate_limit;
pub mod routes;

pub use app::{build_router, AppState};
pub use error::{ApiError, ErrorBody, ErrorEnvelope, ServerError};
pub use routes::BatchPriceResponse;
