//! Signed REST API endpoints (authentication required).

mod types;

pub use types::*;

use crate::error::BinanceError;
use crate::spot::rest::SpotRestClient;
use crate::spot::rest::client::NoParams;
use crate::spot::rest::endpoints::{private, weights};

impl SpotRestClient {
    /// Get account information and balances.
    pub async fn get_account(&self) -> Result<AccountInfo, BinanceError> {
        self.signed_get(private::ACCOUNT, &NoParams {}, weights::ACCOUNT)
            .await
    }

    /// Place a new order.
    ///
    /// The exchange's response is surfaced as-is; a rejected order arrives as
    /// an API error with the rejection code and message preserved verbatim.
    pub async fn new_order(
        &self,
        request: &NewOrderRequest,
    ) -> Result<NewOrderResponse, BinanceError> {
        self.signed_post(private::ORDER, request, weights::ORDER).await
    }
}
