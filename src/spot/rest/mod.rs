//! Binance spot REST API client.
//!
//! Provides the weighted, rate-governed transport plus typed wrappers for the
//! public and signed endpoints.
//!
//! # Pagination seam
//!
//! Kline retrieval over an arbitrary time range goes through the
//! [`KlineSource`] trait, which abstracts one page fetch. [`SpotRestClient`]
//! implements it against the real API; tests drive
//! [`stream_klines`](klines::stream_klines) with synthetic sources.

mod client;
mod endpoints;
mod klines;
pub mod private;
pub mod public;

pub use client::{SpotRestClient, SpotRestClientBuilder};
pub use endpoints::*;
pub use klines::{KlineSource, stream_klines};
