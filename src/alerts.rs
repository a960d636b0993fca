use crate::discord::Notifier;

use log::info;
use std::collections::HashSet;

// A fired alert re-arms once the price pulls back 2% beyond its
// threshold, so a price hovering on the line fires once, not every cycle.
const REARM_PCT: f64 = 0.02;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertKind {
    Low,
    High,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TriggeredAlert {
    pub kind: AlertKind,
    pub threshold: f64,
    pub price: f64,
}

pub struct AlertSystem {
    low: f64,
    high: f64,
    triggered: HashSet<AlertKind>,
}

impl AlertSystem {
    pub fn new(low: f64, high: f64) -> AlertSystem {
        AlertSystem {
            low,
            high,
            triggered: HashSet::new(),
        }
    }

    pub fn check(&mut self, price: f64) -> Vec<TriggeredAlert> {
        let mut fired = Vec::new();

        if price >= self.high {
            if self.triggered.insert(AlertKind::High) {
                fired.push(TriggeredAlert {
                    kind: AlertKind::High,
                    threshold: self.high,
                    price,
                });
            }
        } else if price < self.high * (1.0 - REARM_PCT) {
            self.triggered.remove(&AlertKind::High);
        }

        if price <= self.low {
            if self.triggered.insert(AlertKind::Low) {
                fired.push(TriggeredAlert {
                    kind: AlertKind::Low,
                    threshold: self.low,
                    price,
                });
            }
        } else if price > self.low * (1.0 + REARM_PCT) {
            self.triggered.remove(&AlertKind::Low);
        }

        fired
    }

    pub fn process(&mut self, market: &str, price: f64, notifier: &dyn Notifier) {
        for alert in self.check(price) {
            info!(
                "price alert triggered: {:?} at {} (threshold {})",
                alert.kind, alert.price, alert.threshold
            );
            notifier.send_price_alert(market, alert.price, alert.kind, alert.threshold);
        }
    }
}
