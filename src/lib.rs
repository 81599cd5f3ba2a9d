//! # Binance Client
//!
//! An async Rust client library for the Binance spot exchange REST API.
//!
//! ## Features
//!
//! - Automatic rate limiting composed from the exchange's own published limits
//! - Weighted request admission that suspends instead of triggering 429s
//! - HMAC-SHA256 request signing for authenticated endpoints
//! - Lazy auto-pagination of kline (candlestick) history
//! - Strong typing for all request/response types
//! - Financial precision with `rust_decimal`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use binance_api_client::spot::rest::SpotRestClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SpotRestClient::connect().await?;
//!     let price = client.get_price("BTCUSDT").await?;
//!     println!("BTCUSDT: {}", price.price);
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod error;
pub mod rate_limit;
pub mod spot;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{BinanceError, ErrorKind};
pub use types::common::{Interval, OrderSide, OrderStatus, OrderType, TimeInForce};

/// Result type alias using BinanceError
pub type Result<T> = std::result::Result<T, BinanceError>;
