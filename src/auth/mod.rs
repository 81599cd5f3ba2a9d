//! Authentication module for Binance API.
//!
//! This module provides:
//! - Credential management with secure secret storage
//! - Request timestamp generation for the SIGNED endpoint replay window
//! - HMAC-SHA256 signature generation for authenticated requests

mod credentials;
mod signature;
mod timestamp;

pub use credentials::{Credentials, CredentialsProvider, EnvCredentials, StaticCredentials};
pub use signature::sign_query;
pub use timestamp::{FixedTimestamp, SystemTimestamp, TimestampProvider};
