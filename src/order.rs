// structures and routines related to orders on the exchange.
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSide::Buy => "buy",
            OrderSide::Sell => "sell",
        }
    }
}

/// A limit order to be submitted. Market orders are never used, the
/// strategy always prices at the observed last price.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    pub side: OrderSide,
    pub market: String,
    pub price_per_unit: f64,
    pub total_quantity: f64,
    pub client_order_id: String,
}

impl OrderRequest {
    // Body for the order create endpoint, exchange field names.
    pub fn to_payload(&self) -> serde_json::Value {
        json!({
            "side": self.side.as_str(),
            "order_type": "limit_order",
            "market": self.market,
            "price_per_unit": self.price_per_unit,
            "total_quantity": self.total_quantity,
            "client_order_id": self.client_order_id,
        })
    }
}

/// The order as acknowledged by the exchange. Only the id is ever used
/// afterwards, to poll status.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct OrderAck {
    pub id: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct OrderStatus {
    pub id: String,
    pub status: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OrderState {
    Open,
    PartiallyFilled,
    Filled,
    Cancelled,
    Rejected,
}

impl OrderState {
    // Unknown strings are treated as still-working orders so the loop
    // keeps polling rather than forgetting the reference.
    pub fn from_exchange(status: &str) -> OrderState {
        match status {
            "filled" => OrderState::Filled,
            "partially_filled" => OrderState::PartiallyFilled,
            "cancelled" | "partially_cancelled" => OrderState::Cancelled,
            "rejected" => OrderState::Rejected,
            "open" | "init" => OrderState::Open,
            other => {
                warn!("unknown order status {:?}, treating as open", other);
                OrderState::Open
            }
        }
    }
}

impl OrderStatus {
    pub fn state(&self) -> OrderState {
        OrderState::from_exchange(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_mapping() {
        assert_eq!(OrderState::from_exchange("open"), OrderState::Open);
        assert_eq!(OrderState::from_exchange("init"), OrderState::Open);
        assert_eq!(
            OrderState::from_exchange("partially_filled"),
            OrderState::PartiallyFilled
        );
        assert_eq!(OrderState::from_exchange("filled"), OrderState::Filled);
        assert_eq!(OrderState::from_exchange("cancelled"), OrderState::Cancelled);
        assert_eq!(
            OrderState::from_exchange("partially_cancelled"),
            OrderState::Cancelled
        );
        assert_eq!(OrderState::from_exchange("rejected"), OrderState::Rejected);
        assert_eq!(OrderState::from_exchange("???"), OrderState::Open);
    }

    #[test]
    fn payload_fields() {
        let req = OrderRequest {
            side: OrderSide::Buy,
            market: "ELYINR".to_string(),
            price_per_unit: 0.64,
            total_quantity: 1484.375,
            client_order_id: "1700000000000".to_string(),
        };

        let p = req.to_payload();
        assert_eq!(p["side"], "buy");
        assert_eq!(p["order_type"], "limit_order");
        assert_eq!(p["market"], "ELYINR");
        assert_eq!(p["price_per_unit"], 0.64);
        assert_eq!(p["total_quantity"], 1484.375);
        assert_eq!(p["client_order_id"], "1700000000000");
    }

    #[test]
    fn status_parse() {
        let st: OrderStatus =
            serde_json::from_str(r#"{"id":"8a5f-11","status":"partially_filled"}"#).unwrap();
        assert_eq!(st.state(), OrderState::PartiallyFilled);
    }
}
