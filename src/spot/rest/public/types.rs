//! Types for public REST API endpoints.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::rate_limit::{RateLimitDescriptor, decode_rate_limits};
use crate::types::Interval;

/// Server time response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerTime {
    /// Server time in milliseconds since UNIX epoch.
    pub server_time: u64,
}

/// Exchange metadata returned by `exchangeInfo`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeInfo {
    /// Exchange timezone (always "UTC").
    pub timezone: String,
    /// Server time in milliseconds since UNIX epoch.
    pub server_time: u64,
    /// Published rate limit rules, kept raw so that individual rules this
    /// client does not recognize can be dropped without failing the response.
    #[serde(default)]
    pub rate_limits: Vec<serde_json::Value>,
    /// Listed symbols.
    #[serde(default)]
    pub symbols: Vec<SymbolInfo>,
}

impl ExchangeInfo {
    /// Decode the published rules, dropping any this client cannot enforce.
    pub fn rate_limit_descriptors(&self) -> Vec<RateLimitDescriptor> {
        decode_rate_limits(&self.rate_limits)
    }
}

/// One listed symbol from `exchangeInfo`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolInfo {
    /// Symbol name (e.g., "BTCUSDT").
    pub symbol: String,
    /// Trading status (e.g., "TRADING").
    pub status: String,
    /// Base asset.
    pub base_asset: String,
    /// Quote asset.
    pub quote_asset: String,
}

/// Latest price for a symbol.
#[derive(Debug, Clone, Deserialize)]
pub struct SymbolPrice {
    /// Symbol name.
    pub symbol: String,
    /// Latest traded price.
    pub price: Decimal,
}

/// Request parameters for kline (candlestick) data.
///
/// Immutable page request: the paginator never mutates one, it constructs the
/// continuation request with the start time advanced to the open time of the
/// last record of the prior page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KlinesRequest {
    /// Symbol to query (e.g., "BTCUSDT").
    pub symbol: String,
    /// Kline interval granularity.
    pub interval: Interval,
    /// Inclusive range start, milliseconds since UNIX epoch.
    pub start_time: u64,
    /// Range end, milliseconds since UNIX epoch.
    pub end_time: u64,
    /// Maximum records per page.
    pub limit: u32,
}

impl KlinesRequest {
    /// Default page size limit.
    pub const DEFAULT_LIMIT: u32 = 500;

    /// Create a new klines request over a bounded time range.
    pub fn new(
        symbol: impl Into<String>,
        interval: Interval,
        start_time: u64,
        end_time: u64,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            interval,
            start_time,
            end_time,
            limit: Self::DEFAULT_LIMIT,
        }
    }

    /// Set the page size limit.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// The continuation of this request from a given open time.
    pub(crate) fn continue_from(&self, open_time: u64) -> Self {
        Self {
            start_time: open_time,
            ..self.clone()
        }
    }
}

/// One kline (candlestick) record.
///
/// The API returns klines as heterogeneous JSON arrays; decoding goes through
/// a positional row. Open times are strictly increasing within a page.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "KlineRow")]
pub struct Kline {
    /// Open time, milliseconds since UNIX epoch.
    pub open_time: u64,
    /// Open price.
    pub open: Decimal,
    /// High price.
    pub high: Decimal,
    /// Low price.
    pub low: Decimal,
    /// Close price.
    pub close: Decimal,
    /// Base asset volume.
    pub volume: Decimal,
    /// Close time, milliseconds since UNIX epoch.
    pub close_time: u64,
    /// Quote asset volume.
    pub quote_volume: Decimal,
    /// Number of trades.
    pub trades: u64,
    /// Taker buy base asset volume.
    pub taker_buy_base_volume: Decimal,
    /// Taker buy quote asset volume.
    pub taker_buy_quote_volume: Decimal,
}

/// Positional kline array as sent by the exchange. The final element is
/// unused and ignored per the API documentation.
#[derive(Deserialize)]
struct KlineRow(
    u64,
    Decimal,
    Decimal,
    Decimal,
    Decimal,
    Decimal,
    u64,
    Decimal,
    u64,
    Decimal,
    Decimal,
    #[serde(default)] serde_json::Value,
);

impl From<KlineRow> for Kline {
    fn from(row: KlineRow) -> Self {
        Self {
            open_time: row.0,
            open: row.1,
            high: row.2,
            low: row.3,
            close: row.4,
            volume: row.5,
            close_time: row.6,
            quote_volume: row.7,
            trades: row.8,
            taker_buy_base_volume: row.9,
            taker_buy_quote_volume: row.10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kline_decodes_from_array() {
        let json = r#"[
            1499040000000,
            "0.01634790",
            "0.80000000",
            "0.01575800",
            "0.01577100",
            "148976.11427815",
            1499644799999,
            "2434.19055334",
            308,
            "1756.87402397",
            "28.46694368",
            "17928899.62484339"
        ]"#;

        let kline: Kline = serde_json::from_str(json).unwrap();
        assert_eq!(kline.open_time, 1_499_040_000_000);
        assert_eq!(kline.open, "0.01634790".parse().unwrap());
        assert_eq!(kline.close_time, 1_499_644_799_999);
        assert_eq!(kline.trades, 308);
    }

    #[test]
    fn test_klines_request_query_serialization() {
        let request = KlinesRequest::new("BTCUSDT", Interval::OneMinute, 1_000, 2_000).with_limit(2);
        let query = serde_urlencoded::to_string(&request).unwrap();
        assert_eq!(
            query,
            "symbol=BTCUSDT&interval=1m&startTime=1000&endTime=2000&limit=2"
        );
    }

    #[test]
    fn test_continuation_advances_start_only() {
        let request = KlinesRequest::new("ETHUSDT", Interval::OneHour, 0, 10_000_000);
        let next = request.continue_from(7_200_000);
        assert_eq!(next.start_time, 7_200_000);
        assert_eq!(next.end_time, request.end_time);
        assert_eq!(next.symbol, request.symbol);
        assert_eq!(next.limit, request.limit);
    }

    #[test]
    fn test_exchange_info_decodes_with_unknown_rules() {
        let json = r#"{
            "timezone": "UTC",
            "serverTime": 1565246363776,
            "rateLimits": [
                {"rateLimitType": "REQUEST_WEIGHT", "interval": "MINUTE", "intervalNum": 1, "limit": 6000},
                {"rateLimitType": "CONNECTIONS", "interval": "MINUTE", "intervalNum": 5, "limit": 300}
            ],
            "symbols": [
                {"symbol": "ETHBTC", "status": "TRADING", "baseAsset": "ETH", "quoteAsset": "BTC"}
            ]
        }"#;

        let info: ExchangeInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.symbols.len(), 1);
        assert_eq!(info.rate_limits.len(), 2);
        // The unknown rule is dropped at descriptor decode, not at parse.
        assert_eq!(info.rate_limit_descriptors().len(), 1);
    }
}
