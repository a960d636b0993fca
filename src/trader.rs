use crate::balance::PairBalances;
use crate::discord::Notifier;
use crate::error::Result;
use crate::exchange::Exchange;
use crate::order::{OrderAck, OrderRequest, OrderSide, OrderStatus};
use crate::tradingpair::TradingPair;
use crate::utils;

use chrono::Utc;
use log::info;

// The exchange accepts at most 8 decimal places on quantities.
const QTY_DPS: i8 = 8;

/// Order placement and balance helper on top of the Exchange seam. Owns
/// no state, every call hits the exchange fresh.
pub struct Trader<'a> {
    exchange: &'a dyn Exchange,
    notifier: &'a dyn Notifier,
    pair: &'a TradingPair,
}

impl<'a> Trader<'a> {
    pub fn new(
        exchange: &'a dyn Exchange,
        notifier: &'a dyn Notifier,
        pair: &'a TradingPair,
    ) -> Trader<'a> {
        Trader {
            exchange,
            notifier,
            pair,
        }
    }

    pub fn pair_balances(&self) -> Result<PairBalances> {
        let balances = self.exchange.get_balances()?;
        Ok(PairBalances::from_balances(&balances, self.pair))
    }

    // Buy a fiat amount's worth at the given price. The quantity is
    // truncated rather than rounded so the order never overspends.
    pub fn place_buy_order(&self, price: f64, total_amount: f64) -> Result<OrderAck> {
        let quantity = utils::round_down(total_amount / price, QTY_DPS);
        self.place(OrderSide::Buy, price, quantity)
    }

    pub fn place_sell_order(&self, price: f64, quantity: f64) -> Result<OrderAck> {
        self.place(OrderSide::Sell, price, quantity)
    }

    fn place(&self, side: OrderSide, price: f64, quantity: f64) -> Result<OrderAck> {
        let req = OrderRequest {
            side,
            market: self.pair.symbol().to_string(),
            price_per_unit: price,
            total_quantity: quantity,
            client_order_id: Utc::now().timestamp_millis().to_string(),
        };

        let ack = self.exchange.place_order(&req)?;
        info!(
            "{} order placed: {} {} at {} (id {})",
            side.as_str(),
            quantity,
            self.pair.symbol(),
            price,
            ack.id
        );

        self.notifier.send_trade_notification(
            side,
            self.pair.symbol(),
            price,
            quantity,
            price * quantity,
            &ack.id,
        );

        Ok(ack)
    }

    pub fn order_status(&self, order_ref: &str) -> Result<OrderStatus> {
        self.exchange.order_status(order_ref)
    }

    pub fn cancel_order(&self, order_ref: &str) -> Result<()> {
        self.exchange.cancel_order(order_ref)?;
        info!("order cancelled: {:?}", order_ref);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balance::Balance;
    use crate::discord::mock::RecordingNotifier;
    use crate::exchange::mock::MockExchange;

    fn wallet(currency: &str, balance: &str) -> Balance {
        Balance {
            currency: currency.to_string(),
            balance: balance.to_string(),
            locked_balance: "0".to_string(),
        }
    }

    #[test]
    fn buy_quantity_derived_from_total() {
        let ex = MockExchange::new();
        let notifier = RecordingNotifier::new();
        let tp = TradingPair::new("ELY/INR");
        let trader = Trader::new(&ex, &notifier, &tp);

        let ack = trader.place_buy_order(0.64, 950.0).unwrap();
        assert_eq!(ack.id, "order-1");

        let placed = ex.placed.borrow();
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].side, OrderSide::Buy);
        assert_eq!(placed[0].market, "ELYINR");
        assert_eq!(placed[0].price_per_unit, 0.64);
        assert_eq!(placed[0].total_quantity, utils::round_down(950.0 / 0.64, 8));
        assert!(!placed[0].client_order_id.is_empty());

        // The trade embed went out too.
        assert_eq!(notifier.messages.borrow().len(), 1);
        assert!(notifier.messages.borrow()[0].starts_with("trade/buy"));
    }

    #[test]
    fn sell_uses_exact_quantity() {
        let ex = MockExchange::new();
        let notifier = RecordingNotifier::new();
        let tp = TradingPair::new("ELY/INR");
        let trader = Trader::new(&ex, &notifier, &tp);

        trader.place_sell_order(0.70, 100.0).unwrap();

        let placed = ex.placed.borrow();
        assert_eq!(placed[0].side, OrderSide::Sell);
        assert_eq!(placed[0].total_quantity, 100.0);
        assert_eq!(placed[0].price_per_unit, 0.70);
    }

    #[test]
    fn balances_are_split_by_pair() {
        let ex = MockExchange::new();
        ex.balances
            .replace(vec![wallet("INR", "1000"), wallet("ELY", "42")]);
        let notifier = RecordingNotifier::new();
        let tp = TradingPair::new("ELY/INR");
        let trader = Trader::new(&ex, &notifier, &tp);

        let pb = trader.pair_balances().unwrap();
        assert_eq!(pb.fiat.available, 1000.0);
        assert_eq!(pb.crypto.available, 42.0);
    }
}
