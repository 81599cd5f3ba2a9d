//! Error types for the Binance client library.

use thiserror::Error;

/// The main error type for all Binance client operations.
#[derive(Error, Debug)]
pub enum BinanceError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP request with middleware failed
    #[error("HTTP request failed: {0}")]
    HttpMiddleware(#[from] reqwest_middleware::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Binance API rejected the request
    #[error("Binance API error: {0}")]
    Api(ApiError),

    /// Client-side configuration is invalid (bad interval, unsatisfiable
    /// request weight, malformed builder input)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid response from the API
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Missing required credentials
    #[error("Missing credentials: API key and secret required for signed endpoints")]
    MissingCredentials,
}

/// Coarse classification of a [`BinanceError`] for retry-policy decisions.
///
/// The client never retries on its own; callers branch on the kind:
///
/// - [`ErrorKind::Connectivity`] - transient transport failure, safe to retry
///   with backoff.
/// - [`ErrorKind::Exchange`] - the server understood and rejected the request;
///   retrying unchanged input is pointless.
/// - [`ErrorKind::Protocol`] - the server sent a shape this client does not
///   understand; fatal to that call.
/// - [`ErrorKind::Configuration`] - client-side misconfiguration; never retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Client-side configuration error.
    Configuration,
    /// Transport-level failure.
    Connectivity,
    /// Server rejected the semantic request.
    Exchange,
    /// Response shape mismatch.
    Protocol,
}

impl BinanceError {
    /// Classify this error into one of the four retry-policy kinds.
    pub fn kind(&self) -> ErrorKind {
        match self {
            BinanceError::Http(_) | BinanceError::HttpMiddleware(_) => ErrorKind::Connectivity,
            BinanceError::Api(_) => ErrorKind::Exchange,
            BinanceError::Json(_) | BinanceError::InvalidResponse(_) => ErrorKind::Protocol,
            BinanceError::Config(_) | BinanceError::MissingCredentials => ErrorKind::Configuration,
        }
    }
}

/// Binance API error code and message.
///
/// Returned by the API in the response body as `{"code": -1121, "msg": "Invalid symbol."}`.
/// Both fields are surfaced verbatim.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct ApiError {
    /// The numeric error code from Binance (e.g., -1121)
    pub code: i64,
    /// Human-readable error message
    #[serde(rename = "msg")]
    pub message: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl ApiError {
    /// Create a new API error from code and message.
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Check if this is a rate limit rejection (the server-side safety net).
    pub fn is_rate_limit(&self) -> bool {
        self.code == error_codes::TOO_MANY_REQUESTS || self.code == error_codes::IP_BANNED
    }

    /// Check if this is an invalid timestamp error (request outside recvWindow).
    pub fn is_invalid_timestamp(&self) -> bool {
        self.code == error_codes::INVALID_TIMESTAMP
    }

    /// Check if this is a signature rejection.
    pub fn is_invalid_signature(&self) -> bool {
        self.code == error_codes::INVALID_SIGNATURE
    }

    /// Check if this is an unknown symbol error.
    pub fn is_unknown_symbol(&self) -> bool {
        self.code == error_codes::BAD_SYMBOL
    }
}

/// Known Binance error codes for pattern matching.
pub mod error_codes {
    /// Request weight or request count limit exceeded (HTTP 429).
    pub const TOO_MANY_REQUESTS: i64 = -1003;
    /// IP auto-banned for continuing to send after 429s (HTTP 418).
    pub const IP_BANNED: i64 = -1015;
    /// Timestamp outside of the recvWindow.
    pub const INVALID_TIMESTAMP: i64 = -1021;
    /// Signature for this request is not valid.
    pub const INVALID_SIGNATURE: i64 = -1022;
    /// Mandatory parameter missing, empty, or malformed.
    pub const BAD_PARAMETER: i64 = -1102;
    /// Invalid interval token.
    pub const BAD_INTERVAL: i64 = -1120;
    /// Invalid symbol.
    pub const BAD_SYMBOL: i64 = -1121;
    /// New order rejected.
    pub const NEW_ORDER_REJECTED: i64 = -2010;
    /// API key format invalid or missing.
    pub const BAD_API_KEY: i64 = -2014;
    /// Insufficient balance for the requested action.
    pub const INSUFFICIENT_BALANCE: i64 = -2019;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_deserialize() {
        let error: ApiError =
            serde_json::from_str(r#"{"code":-1121,"msg":"Invalid symbol."}"#).unwrap();
        assert_eq!(error.code, -1121);
        assert_eq!(error.message, "Invalid symbol.");
        assert!(error.is_unknown_symbol());
    }

    #[test]
    fn test_api_error_display() {
        let error = ApiError::new(-2019, "Margin is insufficient.");
        assert_eq!(error.to_string(), "-2019: Margin is insufficient.");
    }

    #[test]
    fn test_error_kind_classification() {
        assert_eq!(
            BinanceError::Api(ApiError::new(-1003, "Too many requests.")).kind(),
            ErrorKind::Exchange
        );
        assert_eq!(
            BinanceError::Config("weight exceeds capacity".to_string()).kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            BinanceError::InvalidResponse("truncated body".to_string()).kind(),
            ErrorKind::Protocol
        );
        assert_eq!(BinanceError::MissingCredentials.kind(), ErrorKind::Configuration);
    }
}
