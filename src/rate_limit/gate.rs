//! Weighted admission gate for a single published rate limit rule.

use std::time::Duration;

use tokio::time::Instant;

use crate::rate_limit::RateLimitDescriptor;

/// Token bucket bound to one `REQUEST_WEIGHT` rule.
///
/// The gate holds `capacity` tokens per window and restores to full capacity
/// at each window boundary, so the weight admitted within any window of the
/// rule's interval never exceeds its limit. Admitted requests consume their
/// declared weight; a request that cannot be admitted is told when the next
/// window opens.
///
/// Gates are independent: composing several of them is the job of
/// [`AdmissionController`](crate::rate_limit::AdmissionController), which
/// locks gates in a fixed order and deducts from all of them atomically.
#[derive(Debug)]
pub struct RateGate {
    capacity: u32,
    window: Duration,
    state: tokio::sync::Mutex<GateState>,
}

#[derive(Debug)]
pub(crate) struct GateState {
    available: u32,
    window_end: Instant,
}

impl RateGate {
    /// Build a gate from a descriptor.
    ///
    /// Returns `None` when the descriptor's interval is unrecognized or its
    /// capacity is zero; such rules cannot be enforced locally.
    pub fn new(descriptor: &RateLimitDescriptor) -> Option<Self> {
        let window = descriptor.window()?;
        if descriptor.limit == 0 || window.is_zero() {
            return None;
        }
        Some(Self {
            capacity: descriptor.limit,
            window,
            state: tokio::sync::Mutex::new(GateState {
                available: descriptor.limit,
                window_end: Instant::now() + window,
            }),
        })
    }

    /// Total token capacity per window.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Window duration of the underlying rule.
    pub fn window(&self) -> Duration {
        self.window
    }

    pub(crate) async fn lock(&self) -> tokio::sync::MutexGuard<'_, GateState> {
        self.state.lock().await
    }

    /// Try to consume `weight` tokens right now.
    ///
    /// Returns `Ok(())` if admitted, or `Err(deadline)` with the instant at
    /// which the next window opens.
    pub async fn try_consume(&self, weight: u32) -> Result<(), Instant> {
        let now = Instant::now();
        let mut state = self.state.lock().await;
        state.refill(self.capacity, self.window, now);
        if state.try_deduct(weight) {
            Ok(())
        } else {
            Err(state.window_end)
        }
    }

    /// Tokens currently available, after accounting for elapsed windows.
    pub async fn available(&self) -> u32 {
        let now = Instant::now();
        let mut state = self.state.lock().await;
        state.refill(self.capacity, self.window, now);
        state.available
    }
}

impl GateState {
    /// Advance past any elapsed window boundaries, restoring full capacity.
    pub(crate) fn refill(&mut self, capacity: u32, window: Duration, now: Instant) {
        if now >= self.window_end {
            // Fast-forward over idle windows instead of stepping each one.
            let behind = now.duration_since(self.window_end);
            let elapsed_windows = (behind.as_nanos() / window.as_nanos()) as u32 + 1;
            self.window_end += window * elapsed_windows;
            self.available = capacity;
        }
    }

    pub(crate) fn can_supply(&self, weight: u32) -> bool {
        self.available >= weight
    }

    pub(crate) fn try_deduct(&mut self, weight: u32) -> bool {
        if self.available >= weight {
            self.available -= weight;
            true
        } else {
            false
        }
    }

    pub(crate) fn deduct(&mut self, weight: u32) {
        debug_assert!(self.available >= weight);
        self.available = self.available.saturating_sub(weight);
    }

    pub(crate) fn window_end(&self) -> Instant {
        self.window_end
    }
}
