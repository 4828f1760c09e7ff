//! # Domain Models
//!
//! Canonical types that flow between the HTTP boundary and the upstream ticker.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Validated, uppercase exchange symbol |
//! | [`PricePoint`] | Price observation with epoch-millisecond timestamp |
//! | [`PriceOutcome`] | One batch slot: a price or a per-symbol error |
//! | [`BatchOutcome`] | Ordered batch slots, partial failures allowed |
//! | [`HealthStatus`] | Upstream connectivity snapshot |
//!
//! All types validate their invariants at construction time, so a value that
//! exists is always well-formed.

mod price;
mod symbol;

pub use price::{now_millis, BatchOutcome, HealthState, HealthStatus, PriceOutcome, PricePoint};
pub use symbol::{Symbol, MAX_SYMBOL_LEN, MIN_SYMBOL_LEN};
