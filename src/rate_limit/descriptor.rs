//! Rate limit rules published by the exchange.
//!
//! Binance publishes its current limits in the `exchangeInfo` response as a
//! `rateLimits` array. Each entry names a rule kind, an interval, and a
//! capacity, e.g.:
//!
//! ```json
//! {"rateLimitType": "REQUEST_WEIGHT", "interval": "MINUTE", "intervalNum": 1, "limit": 6000}
//! ```
//!
//! Rules are decoded leniently: entries with unrecognized kinds or intervals
//! are dropped with a warning instead of failing client construction, since a
//! missing local rule only means the server-side 429 becomes the safety net
//! for it.

use std::time::Duration;

use serde::Deserialize;

/// Kind of a published rate limit rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RateLimitKind {
    /// Weighted request budget; each endpoint consumes its declared weight.
    RequestWeight,
    /// Order placement count.
    Orders,
    /// Raw request count, independent of weight.
    RawRequests,
    /// A rule kind this client does not recognize.
    #[serde(other)]
    Unknown,
}

/// Interval unit of a published rate limit rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RateLimitInterval {
    /// One-second unit.
    Second,
    /// One-minute unit.
    Minute,
    /// One-day unit.
    Day,
    /// An interval unit this client does not recognize.
    #[serde(other)]
    Unknown,
}

impl RateLimitInterval {
    /// Duration of one interval unit, or `None` for unrecognized units.
    pub fn unit_duration(&self) -> Option<Duration> {
        match self {
            RateLimitInterval::Second => Some(Duration::from_secs(1)),
            RateLimitInterval::Minute => Some(Duration::from_secs(60)),
            RateLimitInterval::Day => Some(Duration::from_secs(86_400)),
            RateLimitInterval::Unknown => None,
        }
    }
}

/// One published rate limit rule.
///
/// Immutable: created once from the fetched metadata at client construction
/// and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitDescriptor {
    /// Rule kind.
    #[serde(rename = "rateLimitType")]
    pub kind: RateLimitKind,
    /// Interval unit.
    pub interval: RateLimitInterval,
    /// Number of interval units per window.
    pub interval_num: u32,
    /// Capacity within one window.
    pub limit: u32,
}

impl RateLimitDescriptor {
    /// Create a descriptor directly, bypassing the metadata fetch.
    ///
    /// Used by tests and by callers that cache `exchangeInfo` themselves.
    pub fn new(
        kind: RateLimitKind,
        interval: RateLimitInterval,
        interval_num: u32,
        limit: u32,
    ) -> Self {
        Self {
            kind,
            interval,
            interval_num,
            limit,
        }
    }

    /// The full window duration covered by this rule.
    ///
    /// Returns `None` when the interval unit is unrecognized.
    pub fn window(&self) -> Option<Duration> {
        self.interval
            .unit_duration()
            .map(|unit| unit * self.interval_num)
    }

    /// Whether this rule carries enough information to enforce locally.
    pub fn is_enforceable(&self) -> bool {
        self.kind != RateLimitKind::Unknown
            && self.interval_num > 0
            && self.limit > 0
            && self.window().is_some()
    }
}

/// Decode the `rateLimits` array from `exchangeInfo`, dropping entries that
/// do not parse or that name rules this client cannot enforce.
pub fn decode_rate_limits(raw: &[serde_json::Value]) -> Vec<RateLimitDescriptor> {
    let mut descriptors = Vec::with_capacity(raw.len());
    for value in raw {
        match serde_json::from_value::<RateLimitDescriptor>(value.clone()) {
            Ok(descriptor) if descriptor.is_enforceable() => descriptors.push(descriptor),
            Ok(descriptor) => {
                tracing::warn!(?descriptor, "dropping unenforceable rate limit rule");
            }
            Err(error) => {
                tracing::warn!(%error, "dropping malformed rate limit rule");
            }
        }
    }
    descriptors
}
