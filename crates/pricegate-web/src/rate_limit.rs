use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use governor::clock::{Clock, DefaultClock};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use crate::app::AppState;
use crate::error::{ApiError, ServerError};

/// How often idle client entries are pruned by [`ClientRateLimiter::spawn_cleanup`].
pub const CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

/// Per-client request budget over a one minute window.
#[derive(Clone)]
pub struct ClientRateLimiter {
    limiter: Arc<DefaultKeyedRateLimiter<IpAddr>>,
    clock: DefaultClock,
}

impl ClientRateLimiter {
    pub fn per_minute(max_requests: u32) -> Result<Self, ServerError> {
        let burst = NonZeroU32::new(max_requests).ok_or(ServerError::ZeroRateLimit)?;
        Ok(Self::from_quota(Quota::per_minute(burst)))
    }

    fn from_quota(quota: Quota) -> Self {
        Self {
            limiter: Arc::new(RateLimiter::keyed(quota)),
            clock: DefaultClock::default(),
        }
    }

    /// Number of clients currently holding state.
    pub fn tracked_clients(&self) -> usize {
        self.limiter.len()
    }

    /// Forgets clients whose budget has fully replenished.
    pub fn retain_recent(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
        debug!(tracked = self.limiter.len(), "pruned idle rate limit entries");
    }

    /// Prunes idle clients every `every` until the runtime shuts down.
    pub fn spawn_cleanup(&self, every: Duration) -> JoinHandle<()> {
        let limiter = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                limiter.retain_recent();
            }
        })
    }

    /// Consumes one unit of budget for `client`, or returns seconds until the next one frees up.
    pub fn check(&self, client: IpAddr) -> Result<(), u64> {
        self.limiter.check_key(&client).map_err(|not_until| {
            let wait = not_until.wait_time_from(self.clock.now());
            wait.as_secs() + u64::from(wait.subsec_nanos() > 0)
        })
    }
}

/// Middleware rejecting clients that exceed their budget with `RATE_LIMIT_ERROR`.
pub async fn enforce(State(state): State<AppState>, request: Request, next: Next) -> Response {
    // Requests without connection info (in-process callers) share one bucket.
    let client = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

    match state.rate_limiter().check(client) {
        Ok(()) => next.run(request).await,
        Err(retry_after_secs) => ApiError::RateLimited { retry_after_secs }.into_response(),
    }
}
