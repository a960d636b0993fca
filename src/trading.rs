use crate::config::TradingConfig;
use crate::discord::Notifier;
use crate::error::Result;
use crate::order::OrderState;
use crate::trader::Trader;
use crate::utils;

use log::{error, info, warn};

// Taker fee assumed when reporting realized P/L.
const FEE_PCT: f64 = 0.1;

#[derive(Debug, Clone)]
pub struct TradeParams {
    pub buy_price: f64,
    pub sell_price: f64,
    pub max_trade_amount: f64,
    pub min_trade_amount: f64,
    pub balance_pct: f64,
    pub dryrun: bool,
}

impl TradeParams {
    pub fn from_config(trading: &TradingConfig, dryrun: bool) -> TradeParams {
        TradeParams {
            buy_price: trading.buy_price,
            sell_price: trading.sell_price,
            max_trade_amount: trading.max_trade_amount,
            min_trade_amount: trading.min_trade_amount,
            balance_pct: trading.balance_pct,
            dryrun,
        }
    }
}

/// The buy-low/sell-high state machine. The state is the cross product
/// of `in_position` and `order_ref`: at most one order is outstanding at
/// any time, and nothing survives a restart.
pub struct AutoTrader<'a> {
    trader: Trader<'a>,
    notifier: &'a dyn Notifier,
    params: TradeParams,

    in_position: bool,
    order_ref: Option<String>,
    // Retained for notifications only.
    last_buy_price: Option<f64>,
    last_sell: Option<(f64, f64)>, // (price, quantity).
}

impl<'a> AutoTrader<'a> {
    pub fn new(trader: Trader<'a>, notifier: &'a dyn Notifier, params: TradeParams) -> AutoTrader<'a> {
        AutoTrader {
            trader,
            notifier,
            params,
            in_position: false,
            order_ref: None,
            last_buy_price: None,
            last_sell: None,
        }
    }

    /// One state machine step, called once per poll cycle with the price
    /// fetched for this cycle.
    pub fn check_price_and_trade(&mut self, price: f64) -> Result<()> {
        info!(
            "current price: {}, buy price: {}, sell price: {}",
            price, self.params.buy_price, self.params.sell_price
        );

        if let Some(order_ref) = self.order_ref.clone() {
            let status = self.trader.order_status(&order_ref)?;
            match status.state() {
                OrderState::Filled => self.on_filled(&order_ref),
                OrderState::Cancelled | OrderState::Rejected => {
                    info!("order {:?} was cancelled", order_ref);
                    self.order_ref = None;
                }
                OrderState::Open | OrderState::PartiallyFilled => {
                    // Still working, nothing else to do this cycle.
                    return Ok(());
                }
            }
        }

        if !self.in_position && self.order_ref.is_none() {
            if price <= self.params.buy_price {
                self.try_buy(price)?;
            }
        } else if self.in_position && self.order_ref.is_none() {
            if price >= self.params.sell_price {
                self.try_sell(price)?;
            }
        }

        Ok(())
    }

    // A fill flips the position flag exactly once and forgets the
    // reference; the fill direction is implied by the current position.
    fn on_filled(&mut self, order_ref: &str) {
        if !self.in_position {
            let at = self.last_buy_price.unwrap_or(self.params.buy_price);
            info!("buy order {:?} filled at {}", order_ref, at);
            self.in_position = true;
            self.notifier
                .send_message(&format!("🟢 Buy order filled at {}!", at));
        } else {
            self.in_position = false;
            if let (Some(buy), Some((sell, qty))) = (self.last_buy_price, self.last_sell) {
                let pl = utils::profit_loss(buy, sell, qty, FEE_PCT);
                info!(
                    "sell order {:?} filled at {}, net profit {:.4} ({:.2}%)",
                    order_ref, sell, pl.net_profit, pl.profit_pct
                );
                self.notifier.send_message(&format!(
                    "🔴 Sell order filled at {}! Net P/L: {:.4} ({:.2}%)",
                    sell, pl.net_profit, pl.profit_pct
                ));
            } else {
                info!("sell order {:?} filled", order_ref);
                self.notifier.send_message("🔴 Sell order filled!");
            }
        }
        self.order_ref = None;
    }

    fn try_buy(&mut self, price: f64) -> Result<()> {
        let balances = self.trader.pair_balances()?;
        let available_fiat = balances.fiat.available;

        // Commit most of the fiat balance (the rest covers fees), capped
        // per trade.
        let total_amount =
            (available_fiat * (self.params.balance_pct / 100.0)).min(self.params.max_trade_amount);

        if total_amount <= self.params.min_trade_amount {
            warn!(
                "insufficient {} balance for buy order: {}",
                balances.fiat.currency, available_fiat
            );
            return Ok(());
        }

        if self.params.dryrun {
            info!(
                "dryrun: would place buy order at {} for {} {}",
                price, total_amount, balances.fiat.currency
            );
            self.notifier
                .send_message(&format!("📈 [dryrun] Would place buy order at {}!", price));
            return Ok(());
        }

        let ack = self.trader.place_buy_order(price, total_amount)?;
        self.order_ref = Some(ack.id);
        self.last_buy_price = Some(price);
        self.notifier
            .send_message(&format!("📈 Placed buy order at {}!", price));
        Ok(())
    }

    fn try_sell(&mut self, price: f64) -> Result<()> {
        let balances = self.trader.pair_balances()?;
        let available_crypto = balances.crypto.available;

        if available_crypto <= 0.0 {
            warn!(
                "no {} available for sell order",
                balances.crypto.currency
            );
            return Ok(());
        }

        if self.params.dryrun {
            info!(
                "dryrun: would place sell order at {} for {} {}",
                price, available_crypto, balances.crypto.currency
            );
            self.notifier
                .send_message(&format!("📉 [dryrun] Would place sell order at {}!", price));
            return Ok(());
        }

        let ack = self.trader.place_sell_order(price, available_crypto)?;
        self.order_ref = Some(ack.id);
        self.last_sell = Some((price, available_crypto));
        self.notifier
            .send_message(&format!("📉 Placed sell order at {}!", price));
        Ok(())
    }

    /// Cancel whatever is outstanding before the process exits.
    pub fn shutdown(&mut self) {
        if let Some(order_ref) = self.order_ref.take() {
            match self.trader.cancel_order(&order_ref) {
                Ok(()) => {
                    self.notifier.send_message(&format!(
                        "⚠️ Cancelled outstanding order {} on shutdown",
                        order_ref
                    ));
                }
                Err(e) => {
                    error!("failed to cancel order {:?} on shutdown: {}", order_ref, e);
                }
            }
        }
    }
}
