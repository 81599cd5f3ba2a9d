//! Rate limiting for the Binance API.
//!
//! Binance publishes its rate limit rules in the `exchangeInfo` metadata and
//! enforces them server-side with 429 responses (and IP bans for repeat
//! offenders). This module turns the published rules into local admission
//! control so a client never has to find out the hard way.
//!
//! ## Rule Kinds
//!
//! - **REQUEST_WEIGHT**: every REST endpoint declares a weight; the sum of
//!   admitted weights within a rule's window must stay under its limit. Each
//!   such rule becomes one [`RateGate`], and the [`AdmissionController`]
//!   requires every gate to admit a request simultaneously.
//! - **RAW_REQUESTS**: plain request count, weight-independent, enforced with
//!   a [`governor`] limiter.
//! - **ORDERS**: order-count rules are decoded and surfaced but build no local
//!   gate.
//!
//! ## Example
//!
//! ```rust
//! use binance_api_client::rate_limit::{
//!     AdmissionController, RateLimitDescriptor, RateLimitInterval, RateLimitKind,
//! };
//!
//! # async fn example() -> Result<(), binance_api_client::BinanceError> {
//! // Compose a per-minute budget with a short burst gate.
//! let controller = AdmissionController::from_descriptors(&[
//!     RateLimitDescriptor::new(RateLimitKind::RequestWeight, RateLimitInterval::Minute, 1, 6000),
//!     RateLimitDescriptor::new(RateLimitKind::RequestWeight, RateLimitInterval::Second, 10, 50),
//! ]);
//!
//! // Suspends until both gates can supply 20 tokens, then deducts from both.
//! controller.admit(20).await?;
//! # Ok(())
//! # }
//! ```

mod admission;
mod descriptor;
mod gate;

pub use admission::AdmissionController;
pub use descriptor::{decode_rate_limits, RateLimitDescriptor, RateLimitInterval, RateLimitKind};
pub use gate::RateGate;
