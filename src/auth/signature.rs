//! HMAC-SHA256 signature generation for Binance API authentication.
//!
//! Binance SIGNED endpoints require a signature computed as:
//! ```text
//! hex(HMAC-SHA256(query_string, api_secret))
//! ```
//!
//! The query string is signed exactly as it will be sent, including the
//! `recvWindow` and `timestamp` parameters; the hex-encoded signature is
//! appended as the final `signature` parameter. Any deviation from the sent
//! bytes is rejected by the exchange.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::auth::Credentials;

type HmacSha256 = Hmac<Sha256>;

/// Sign a canonical query string for Binance's SIGNED endpoints.
///
/// Pure and deterministic: the same secret and payload always produce the
/// same signature. HMAC accepts keys of any length, so signing itself cannot
/// fail; credential presence is checked by the transport before this point.
///
/// # Arguments
///
/// * `credentials` - API credentials containing the secret
/// * `query_string` - The exact URL-encoded query string to be sent
///
/// # Returns
///
/// Lowercase hex-encoded HMAC-SHA256 signature.
///
/// # Example
///
/// ```rust
/// use binance_api_client::auth::{Credentials, sign_query};
///
/// let credentials = Credentials::new("api_key", "api_secret");
/// let signature = sign_query(&credentials, "symbol=BTCUSDT&timestamp=1499827319559");
/// assert_eq!(signature.len(), 64);
/// ```
pub fn sign_query(credentials: &Credentials, query_string: &str) -> String {
    let mut hmac = HmacSha256::new_from_slice(credentials.expose_secret().as_bytes())
        .expect("HMAC accepts keys of any length");
    hmac.update(query_string.as_bytes());
    hex::encode(hmac.finalize().into_bytes())
}
