use crate::balance::Balance;
use crate::error::Result;
use crate::order::{OrderAck, OrderRequest, OrderStatus};
use crate::price::Ticker;

use log::error;

/// The seam between the polling loop and the exchange's REST API.
pub trait Exchange {
    fn get_ticker(&self, market: &str) -> Result<Ticker>;

    fn get_balances(&self) -> Result<Vec<Balance>>;

    fn place_order(&self, req: &OrderRequest) -> Result<OrderAck>;

    fn order_status(&self, order_ref: &str) -> Result<OrderStatus>;

    fn cancel_order(&self, order_ref: &str) -> Result<()>;

    // A ticker fetch doubles as the connectivity check.
    fn test_connectivity(&self, market: &str) -> bool {
        match self.get_ticker(market) {
            Ok(_) => true,
            Err(e) => {
                error!("connectivity test failed: {:?}", e);
                false
            }
        }
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use crate::error::Error;

    use std::cell::RefCell;

    /// Scripted exchange double for the state machine tests.
    pub struct MockExchange {
        pub ticker: RefCell<Option<Ticker>>,
        pub balances: RefCell<Vec<Balance>>,
        pub status: RefCell<Option<OrderStatus>>,
        pub placed: RefCell<Vec<OrderRequest>>,
        pub cancelled: RefCell<Vec<String>>,
        pub next_order_id: String,
    }

    impl MockExchange {
        pub fn new() -> MockExchange {
            MockExchange {
                ticker: RefCell::new(None),
                balances: RefCell::new(Vec::new()),
                status: RefCell::new(None),
                placed: RefCell::new(Vec::new()),
                cancelled: RefCell::new(Vec::new()),
                next_order_id: "order-1".to_string(),
            }
        }
    }

    impl Exchange for MockExchange {
        fn get_ticker(&self, market: &str) -> Result<Ticker> {
            self.ticker
                .borrow()
                .clone()
                .ok_or_else(|| Error::MarketNotFound(market.to_string()))
        }

        fn get_balances(&self) -> Result<Vec<Balance>> {
            Ok(self.balances.borrow().clone())
        }

        fn place_order(&self, req: &OrderRequest) -> Result<OrderAck> {
            self.placed.borrow_mut().push(req.clone());
            Ok(OrderAck {
                id: self.next_order_id.clone(),
                status: "open".to_string(),
            })
        }

        fn order_status(&self, order_ref: &str) -> Result<OrderStatus> {
            self.status
                .borrow()
                .clone()
                .ok_or_else(|| Error::MarketNotFound(order_ref.to_string()))
        }

        fn cancel_order(&self, order_ref: &str) -> Result<()> {
            self.cancelled.borrow_mut().push(order_ref.to_string());
            Ok(())
        }
    }
}
