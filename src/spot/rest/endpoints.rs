//! Binance spot REST API endpoint constants.

/// Base URL for the Binance spot REST API.
pub const BINANCE_BASE_URL: &str = "https://api.binance.com";

/// Public endpoints (no authentication required).
pub mod public {
    /// Test connectivity.
    pub const PING: &str = "/api/v3/ping";
    /// Get server time.
    pub const TIME: &str = "/api/v3/time";
    /// Get exchange metadata, including the published rate limit rules.
    pub const EXCHANGE_INFO: &str = "/api/v3/exchangeInfo";
    /// Get the latest price for a symbol.
    pub const TICKER_PRICE: &str = "/api/v3/ticker/price";
    /// Get kline (candlestick) data.
    pub const KLINES: &str = "/api/v3/klines";
}

/// Signed endpoints (authentication required).
pub mod private {
    /// Get account information and balances.
    pub const ACCOUNT: &str = "/api/v3/account";
    /// Place a new order.
    pub const ORDER: &str = "/api/v3/order";
}

/// Declared request weights, charged against the `REQUEST_WEIGHT` rules.
pub mod weights {
    /// Weight of a ping request.
    pub const PING: u32 = 1;
    /// Weight of a server time request.
    pub const TIME: u32 = 1;
    /// Weight of an exchange info request.
    pub const EXCHANGE_INFO: u32 = 20;
    /// Weight of a single-symbol price ticker request.
    pub const TICKER_PRICE: u32 = 2;
    /// Weight of a klines request.
    pub const KLINES: u32 = 2;
    /// Weight of an account information request.
    pub const ACCOUNT: u32 = 20;
    /// Weight of an order placement request.
    pub const ORDER: u32 = 1;
}
