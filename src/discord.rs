// Discord webhook notifier. Every send is best effort: failures are
// logged and reported as false, they never stop the trading loop.
use crate::alerts::AlertKind;
use crate::error::{Error, Result};
use crate::order::OrderSide;

use chrono::Utc;
use log::{debug, error};
use serde_json::{json, Value};
use std::env;

const COLOR_GREEN: u32 = 0x00ff00;
const COLOR_RED: u32 = 0xff0000;

pub trait Notifier {
    fn send_message(&self, content: &str) -> bool;

    fn send_price_alert(&self, market: &str, price: f64, kind: AlertKind, threshold: f64) -> bool;

    fn send_trade_notification(
        &self,
        side: OrderSide,
        market: &str,
        price: f64,
        quantity: f64,
        total: f64,
        order_ref: &str,
    ) -> bool;
}

pub struct DiscordWebhook {
    webhook_url: String,
    client: reqwest::blocking::Client,
}

impl DiscordWebhook {
    pub fn from_env() -> Result<DiscordWebhook> {
        let webhook_url = env::var("DISCORD_WEBHOOK_URL")
            .map_err(|_| Error::MissingCredential("DISCORD_WEBHOOK_URL"))?;
        if webhook_url.is_empty() {
            return Err(Error::MissingCredential("DISCORD_WEBHOOK_URL"));
        }

        Ok(DiscordWebhook {
            webhook_url,
            client: reqwest::blocking::Client::new(),
        })
    }

    fn post(&self, payload: &Value) -> bool {
        match self.client.post(&self.webhook_url).json(payload).send() {
            Ok(resp) if resp.status().is_success() => {
                debug!("discord notification sent");
                true
            }
            Ok(resp) => {
                error!(
                    "discord webhook rejected notification: http {}",
                    resp.status()
                );
                false
            }
            Err(e) => {
                error!("failed to send discord notification: {:?}", e);
                false
            }
        }
    }
}

pub fn message_payload(content: &str) -> Value {
    json!({ "content": content })
}

pub fn embed_payload(
    title: &str,
    description: &str,
    color: u32,
    fields: Vec<Value>,
    footer: &str,
) -> Value {
    json!({
        "embeds": [{
            "title": title,
            "description": description,
            "color": color,
            "timestamp": Utc::now().to_rfc3339(),
            "fields": fields,
            "footer": { "text": footer },
        }]
    })
}

pub fn price_alert_payload(market: &str, price: f64, kind: AlertKind, threshold: f64) -> Value {
    let (color, direction) = match kind {
        AlertKind::High => (COLOR_GREEN, "⬆️ Price Above Threshold"),
        AlertKind::Low => (COLOR_RED, "⬇️ Price Below Threshold"),
    };

    embed_payload(
        &format!("🚨 PRICE ALERT: {}", market),
        &format!("**Current Price**: {}\n**Threshold**: {}", price, threshold),
        color,
        vec![
            json!({ "name": "Alert Type", "value": direction, "inline": true }),
            json!({
                "name": "Time",
                "value": Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
                "inline": true,
            }),
        ],
        "Crypto Manager Alert System",
    )
}

pub fn trade_payload(
    side: OrderSide,
    market: &str,
    price: f64,
    quantity: f64,
    total: f64,
    order_ref: &str,
) -> Value {
    let (color, title) = match side {
        OrderSide::Buy => (COLOR_GREEN, format!("🟢 BUY ORDER: {}", market)),
        OrderSide::Sell => (COLOR_RED, format!("🔴 SELL ORDER: {}", market)),
    };

    embed_payload(
        &title,
        &format!(
            "**Price**: {}\n**Quantity**: {}\n**Total**: {}",
            price, quantity, total
        ),
        color,
        vec![
            json!({ "name": "Order ID", "value": order_ref, "inline": false }),
            json!({
                "name": "Time",
                "value": Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
                "inline": true,
            }),
        ],
        "Crypto Manager Trading System",
    )
}

impl Notifier for DiscordWebhook {
    fn send_message(&self, content: &str) -> bool {
        self.post(&message_payload(content))
    }

    fn send_price_alert(&self, market: &str, price: f64, kind: AlertKind, threshold: f64) -> bool {
        self.post(&price_alert_payload(market, price, kind, threshold))
    }

    fn send_trade_notification(
        &self,
        side: OrderSide,
        market: &str,
        price: f64,
        quantity: f64,
        total: f64,
        order_ref: &str,
    ) -> bool {
        self.post(&trade_payload(side, market, price, quantity, total, order_ref))
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;

    use std::cell::RefCell;

    /// Records every notification instead of POSTing it anywhere.
    pub struct RecordingNotifier {
        pub messages: RefCell<Vec<String>>,
    }

    impl RecordingNotifier {
        pub fn new() -> RecordingNotifier {
            RecordingNotifier {
                messages: RefCell::new(Vec::new()),
            }
        }
    }

    impl Notifier for RecordingNotifier {
        fn send_message(&self, content: &str) -> bool {
            self.messages.borrow_mut().push(content.to_string());
            true
        }

        fn send_price_alert(
            &self,
            market: &str,
            price: f64,
            kind: AlertKind,
            threshold: f64,
        ) -> bool {
            self.messages.borrow_mut().push(format!(
                "alert/{:?}: {} at {} (threshold {})",
                kind, market, price, threshold
            ));
            true
        }

        fn send_trade_notification(
            &self,
            side: OrderSide,
            market: &str,
            price: f64,
            quantity: f64,
            _total: f64,
            order_ref: &str,
        ) -> bool {
            self.messages.borrow_mut().push(format!(
                "trade/{}: {} {} at {} (id {})",
                side.as_str(),
                quantity,
                market,
                price,
                order_ref
            ));
            true
        }
    }
}
