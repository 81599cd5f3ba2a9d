//! Public REST API endpoints (no authentication required).

mod types;

pub use types::*;

use crate::error::BinanceError;
use crate::spot::rest::SpotRestClient;
use crate::spot::rest::endpoints::{public, weights};

impl SpotRestClient {
    /// Test connectivity to the REST API.
    pub async fn ping(&self) -> Result<(), BinanceError> {
        #[derive(serde::Deserialize)]
        struct Empty {}
        let _: Empty = self.public_get(public::PING, weights::PING).await?;
        Ok(())
    }

    /// Get the server time.
    ///
    /// This is useful for checking API availability and for measuring the
    /// local clock offset before sending signed requests.
    pub async fn get_server_time(&self) -> Result<ServerTime, BinanceError> {
        self.public_get(public::TIME, weights::TIME).await
    }

    /// Get exchange metadata, including the published rate limit rules and
    /// listed symbols.
    ///
    /// [`connect`](crate::spot::rest::SpotRestClientBuilder::connect) calls
    /// this once to compose the local admission gates.
    pub async fn get_exchange_info(&self) -> Result<ExchangeInfo, BinanceError> {
        self.public_get(public::EXCHANGE_INFO, weights::EXCHANGE_INFO)
            .await
    }

    /// Get the latest price for a symbol.
    ///
    /// # Arguments
    ///
    /// * `symbol` - Symbol name (e.g., "BTCUSDT").
    pub async fn get_price(&self, symbol: &str) -> Result<SymbolPrice, BinanceError> {
        #[derive(serde::Serialize)]
        struct Params<'a> {
            symbol: &'a str,
        }
        self.public_get_with_params(
            public::TICKER_PRICE,
            &Params { symbol },
            weights::TICKER_PRICE,
        )
        .await
    }

    /// Get a single page of kline (candlestick) data.
    ///
    /// Returns at most `request.limit` records; the exchange truncates longer
    /// ranges. For a stream spanning the whole requested range regardless of
    /// page limits, use
    /// [`stream_klines`](crate::spot::rest::SpotRestClient::stream_klines).
    pub async fn get_klines(&self, request: &KlinesRequest) -> Result<Vec<Kline>, BinanceError> {
        self.public_get_with_params(public::KLINES, request, weights::KLINES)
            .await
    }
}
