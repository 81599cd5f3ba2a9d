//! All-or-nothing admission across the full set of published limits.

use std::num::NonZeroU32;

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use tokio::time::Instant;

use crate::error::BinanceError;
use crate::rate_limit::{RateGate, RateLimitDescriptor, RateLimitKind};

/// Admission controller composing every locally enforceable rate limit rule.
///
/// One [`RateGate`] is built per `REQUEST_WEIGHT` rule; a request is admitted
/// only when every gate can supply its weight simultaneously, and the deduction
/// across gates is atomic: either all gates are decremented or none are.
/// `RAW_REQUESTS` rules are unweighted and admit one cell per request through a
/// [`governor`] limiter once the weight gates have passed. `ORDERS` rules build
/// no local gate; they are still surfaced to callers via
/// [`SpotRestClient::rate_limits`](crate::spot::rest::SpotRestClient::rate_limits).
///
/// The controller is shared state injected into every transport call. It never
/// raises business errors, it only delays, with one exception: a weight that
/// exceeds some gate's total capacity can never be admitted and fails
/// immediately with a configuration error instead of blocking forever.
///
/// Abandoning a pending [`admit`](AdmissionController::admit) call (timeout,
/// stream dropped, shutdown) consumes no tokens: deduction only happens
/// synchronously once every gate has passed the check.
pub struct AdmissionController {
    /// Weight gates, locked in this fixed order to avoid deadlock.
    gates: Vec<RateGate>,
    /// Unweighted raw-request limiters.
    raw: Vec<DefaultDirectRateLimiter>,
}

impl AdmissionController {
    /// Build a controller from the published limit rules.
    ///
    /// Rules that cannot be enforced locally are skipped; the exchange's own
    /// 429 responses remain the safety net for those.
    pub fn from_descriptors(descriptors: &[RateLimitDescriptor]) -> Self {
        let gates = descriptors
            .iter()
            .filter(|d| d.kind == RateLimitKind::RequestWeight)
            .filter_map(RateGate::new)
            .collect();

        let raw = descriptors
            .iter()
            .filter(|d| d.kind == RateLimitKind::RawRequests)
            .filter_map(|d| {
                let window = d.window()?;
                let limit = NonZeroU32::new(d.limit)?;
                let quota = Quota::with_period(window / d.limit)?.allow_burst(limit);
                Some(RateLimiter::direct(quota))
            })
            .collect();

        Self { gates, raw }
    }

    /// Number of weight gates currently composed.
    pub fn gate_count(&self) -> usize {
        self.gates.len()
    }

    /// The composed weight gates, in admission order.
    pub fn gates(&self) -> &[RateGate] {
        &self.gates
    }

    /// Acquire admission for a request of the given weight.
    ///
    /// Suspends until every gate can supply `weight` tokens at the same
    /// instant, then deducts from all of them together. Returns a
    /// configuration error without waiting when `weight` exceeds any gate's
    /// total capacity.
    pub async fn admit(&self, weight: u32) -> Result<(), BinanceError> {
        if let Some(gate) = self.gates.iter().find(|g| weight > g.capacity()) {
            return Err(BinanceError::Config(format!(
                "request weight {weight} exceeds rate limit capacity {} per {:?}",
                gate.capacity(),
                gate.window(),
            )));
        }

        loop {
            match self.try_admit(weight).await {
                None => break,
                Some(deadline) => {
                    tracing::debug!(weight, "admission delayed until next rate limit window");
                    tokio::time::sleep_until(deadline).await;
                }
            }
        }

        for limiter in &self.raw {
            limiter.until_ready().await;
        }

        Ok(())
    }

    /// Test-and-set across all gates.
    ///
    /// Locks every gate in construction order, checks that each can supply
    /// `weight`, and deducts from all of them only if every check passed.
    /// Returns `None` on success, or the deadline after which every currently
    /// blocking gate will have refilled.
    async fn try_admit(&self, weight: u32) -> Option<Instant> {
        let now = Instant::now();

        let mut guards = Vec::with_capacity(self.gates.len());
        for gate in &self.gates {
            guards.push(gate.lock().await);
        }

        let mut wait_until: Option<Instant> = None;
        for (gate, guard) in self.gates.iter().zip(guards.iter_mut()) {
            guard.refill(gate.capacity(), gate.window(), now);
            if !guard.can_supply(weight) {
                let deadline = guard.window_end();
                wait_until = Some(wait_until.map_or(deadline, |d| d.max(deadline)));
            }
        }

        if wait_until.is_none() {
            for guard in guards.iter_mut() {
                guard.deduct(weight);
            }
        }

        wait_until
    }
}

impl std::fmt::Debug for AdmissionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdmissionController")
            .field("gates", &self.gates)
            .field("raw_limiters", &self.raw.len())
            .finish()
    }
}
