//! Types for signed REST API endpoints.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{OrderSide, OrderStatus, OrderType, TimeInForce};

/// Account information and balances.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    /// Maker commission rate, basis points.
    pub maker_commission: u32,
    /// Taker commission rate, basis points.
    pub taker_commission: u32,
    /// Whether the account can trade.
    pub can_trade: bool,
    /// Whether the account can withdraw.
    pub can_withdraw: bool,
    /// Whether the account can deposit.
    pub can_deposit: bool,
    /// Last update time, milliseconds since UNIX epoch.
    pub update_time: u64,
    /// Per-asset balances.
    #[serde(default)]
    pub balances: Vec<Balance>,
}

impl AccountInfo {
    /// Balance for a specific asset, if the account holds it.
    pub fn balance(&self, asset: &str) -> Option<&Balance> {
        self.balances.iter().find(|b| b.asset == asset)
    }
}

/// Balance of a single asset.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Balance {
    /// Asset name (e.g., "BTC").
    pub asset: String,
    /// Amount available for trading.
    pub free: Decimal,
    /// Amount locked in open orders.
    pub locked: Decimal,
}

impl Balance {
    /// Total balance, free plus locked.
    pub fn total(&self) -> Decimal {
        self.free + self.locked
    }
}

/// Request parameters for placing a new order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderRequest {
    /// Symbol to trade (e.g., "BTCUSDT").
    pub symbol: String,
    /// Buy or sell.
    pub side: OrderSide,
    /// Order type.
    #[serde(rename = "type")]
    pub order_type: OrderType,
    /// Time in force; required for limit orders.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_in_force: Option<TimeInForce>,
    /// Order quantity in the base asset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Decimal>,
    /// Limit price.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    /// Client-assigned order id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_client_order_id: Option<String>,
}

impl NewOrderRequest {
    /// Create a limit order request (good til canceled).
    pub fn limit(
        symbol: impl Into<String>,
        side: OrderSide,
        quantity: Decimal,
        price: Decimal,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            order_type: OrderType::Limit,
            time_in_force: Some(TimeInForce::GoodTilCanceled),
            quantity: Some(quantity),
            price: Some(price),
            new_client_order_id: None,
        }
    }

    /// Create a market order request.
    pub fn market(symbol: impl Into<String>, side: OrderSide, quantity: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            order_type: OrderType::Market,
            time_in_force: None,
            quantity: Some(quantity),
            price: None,
            new_client_order_id: None,
        }
    }

    /// Set a client-assigned order id.
    pub fn with_client_order_id(mut self, id: impl Into<String>) -> Self {
        self.new_client_order_id = Some(id.into());
        self
    }
}

/// Response to a placed order.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderResponse {
    /// Symbol the order was placed on.
    pub symbol: String,
    /// Exchange-assigned order id.
    pub order_id: u64,
    /// Client-assigned order id.
    pub client_order_id: String,
    /// Transaction time, milliseconds since UNIX epoch.
    pub transact_time: u64,
    /// Order price.
    #[serde(default)]
    pub price: Option<Decimal>,
    /// Original order quantity.
    #[serde(default)]
    pub orig_qty: Option<Decimal>,
    /// Quantity executed so far.
    #[serde(default)]
    pub executed_qty: Option<Decimal>,
    /// Current order status.
    #[serde(default)]
    pub status: Option<OrderStatus>,
    /// Time in force.
    #[serde(default)]
    pub time_in_force: Option<TimeInForce>,
    /// Order type.
    #[serde(rename = "type", default)]
    pub order_type: Option<OrderType>,
    /// Buy or sell.
    #[serde(default)]
    pub side: Option<OrderSide>,
    /// Individual fills, present for FULL responses.
    #[serde(default)]
    pub fills: Vec<OrderFill>,
}

/// One fill of an executed order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderFill {
    /// Fill price.
    pub price: Decimal,
    /// Fill quantity.
    pub qty: Decimal,
    /// Commission charged.
    pub commission: Decimal,
    /// Asset the commission was charged in.
    pub commission_asset: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_order_request_serialization() {
        let request = NewOrderRequest::limit(
            "BTCUSDT",
            OrderSide::Buy,
            "0.5".parse().unwrap(),
            "42000.1".parse().unwrap(),
        );
        let query = serde_urlencoded::to_string(&request).unwrap();
        assert_eq!(
            query,
            "symbol=BTCUSDT&side=BUY&type=LIMIT&timeInForce=GTC&quantity=0.5&price=42000.1"
        );
    }

    #[test]
    fn test_market_order_skips_absent_fields() {
        let request = NewOrderRequest::market("ETHUSDT", OrderSide::Sell, "2".parse().unwrap());
        let query = serde_urlencoded::to_string(&request).unwrap();
        assert!(!query.contains("price"));
        assert!(!query.contains("timeInForce"));
    }

    #[test]
    fn test_balance_total() {
        let balance: Balance =
            serde_json::from_str(r#"{"asset":"BTC","free":"1.5","locked":"0.25"}"#).unwrap();
        assert_eq!(balance.total(), "1.75".parse().unwrap());
    }
}
