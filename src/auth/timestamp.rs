//! Timestamp generation for Binance API authentication.
//!
//! Binance SIGNED endpoints carry a `timestamp` parameter (milliseconds since
//! UNIX epoch) that the server checks against its own clock within the
//! request's `recvWindow`. The timestamp is captured when the signed query is
//! constructed, not when the request is finally dispatched.

use std::time::{SystemTime, UNIX_EPOCH};

/// Trait for providing request timestamps.
///
/// Injectable so tests can sign requests deterministically against a fixed
/// clock.
pub trait TimestampProvider: Send + Sync {
    /// Current wall-clock time in milliseconds since UNIX epoch.
    fn timestamp_millis(&self) -> u64;
}

/// Timestamp provider backed by the system wall clock.
#[derive(Debug, Default)]
pub struct SystemTimestamp;

impl SystemTimestamp {
    /// Create a new system-clock timestamp provider.
    pub fn new() -> Self {
        Self
    }
}

impl TimestampProvider for SystemTimestamp {
    fn timestamp_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

/// Timestamp provider that always returns the same instant.
///
/// Useful for tests that assert on exact signed query strings.
#[derive(Debug, Clone, Copy)]
pub struct FixedTimestamp(pub u64);

impl TimestampProvider for FixedTimestamp {
    fn timestamp_millis(&self) -> u64 {
        self.0
    }
}
