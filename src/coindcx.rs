use crate::balance::Balance;
use crate::config::{Credentials, ExchangeConfig};
use crate::error::{Error, Result};
use crate::exchange::Exchange;
use crate::order::{OrderAck, OrderRequest, OrderStatus};
use crate::price::Ticker;
use crate::utils;

use log::{debug, error, info, warn};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::{thread, time::Duration};

// Fixed-count, flat-delay retry. The polling loop adds no retry of its
// own on top of this.
const MAX_RETRIES: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug)]
pub struct CoinDcx {
    pub config: ExchangeConfig,
    creds: Credentials,
    client: reqwest::blocking::Client,
}

impl CoinDcx {
    pub fn new(config: ExchangeConfig, creds: Credentials) -> CoinDcx {
        CoinDcx {
            config,
            creds,
            client: reqwest::blocking::Client::new(),
        }
    }

    fn endpoint(&self, name: &str) -> &str {
        match self.config.endpoints_map.get(name) {
            Some(ep) => ep,
            None => {
                panic!(
                    "no {:?} endpoint configured for exchange {:?}",
                    name, self.config.name
                );
            }
        }
    }

    fn uri(&self, ep: &str) -> String {
        format!("{}{}", self.config.uri, ep)
    }

    fn send_with_retry<F>(&self, what: &str, build: F) -> Result<reqwest::blocking::Response>
    where
        F: Fn() -> reqwest::blocking::RequestBuilder,
    {
        let mut attempt = 1;
        loop {
            let err = match build().send() {
                Ok(resp) if resp.status().is_success() => return Ok(resp),
                Ok(resp) => Error::Api {
                    status: resp.status().as_u16(),
                    body: resp.text().unwrap_or_default(),
                },
                Err(e) => Error::Http(e),
            };

            if attempt >= MAX_RETRIES {
                error!("{} failed (attempt {}/{}): {}", what, attempt, MAX_RETRIES, err);
                return Err(err);
            }

            warn!(
                "{} failed (attempt {}/{}), retrying: {}",
                what, attempt, MAX_RETRIES, err
            );
            thread::sleep(RETRY_DELAY);
            attempt += 1;
        }
    }

    fn get_public<T: DeserializeOwned>(&self, what: &str, ep: &str) -> Result<T> {
        let uri = self.uri(ep);
        let resp = self.send_with_retry(what, || self.client.get(&uri))?;
        Ok(resp.json()?)
    }

    // Authenticated POST: a millisecond timestamp is injected into the
    // payload and the serialized body is HMAC signed.
    fn post_signed<T: DeserializeOwned>(&self, what: &str, ep: &str, mut payload: Value) -> Result<T> {
        let uri = self.uri(ep);
        payload["timestamp"] = json!(chrono::Utc::now().timestamp_millis());
        let body = serde_json::to_string(&payload)?;
        let signature = utils::sign_body(&self.creds.api_secret, &body);

        let resp = self.send_with_retry(what, || {
            self.client
                .post(&uri)
                .header("Content-Type", "application/json")
                .header("X-AUTH-APIKEY", &self.creds.api_key)
                .header("X-AUTH-SIGNATURE", &signature)
                .body(body.clone())
        })?;

        Ok(resp.json()?)
    }
}

impl Exchange for CoinDcx {
    fn get_ticker(&self, market: &str) -> Result<Ticker> {
        debug!("fetching ticker for {:?}", market);

        // The ticker endpoint returns every market, scan for ours.
        let tickers: Vec<Ticker> = self.get_public("get_ticker", self.endpoint("TICKER"))?;
        tickers
            .into_iter()
            .find(|t| t.market == market)
            .ok_or_else(|| Error::MarketNotFound(market.to_string()))
    }

    fn get_balances(&self) -> Result<Vec<Balance>> {
        self.post_signed("get_balances", self.endpoint("BALANCES"), json!({}))
    }

    fn place_order(&self, req: &OrderRequest) -> Result<OrderAck> {
        info!(
            "placing {} order on {:?}: {} @ {}",
            req.side.as_str(),
            req.market,
            req.total_quantity,
            req.price_per_unit
        );

        let resp: Value = self.post_signed("place_order", self.endpoint("CREATE"), req.to_payload())?;

        // Create responses wrap the order in an "orders" array.
        let order = match resp.get("orders").and_then(|o| o.get(0)) {
            Some(o) => o.clone(),
            None => resp,
        };

        let ack: OrderAck = serde_json::from_value(order)?;
        info!("order acknowledged: id {:?} status {:?}", ack.id, ack.status);
        Ok(ack)
    }

    fn order_status(&self, order_ref: &str) -> Result<OrderStatus> {
        self.post_signed(
            "order_status",
            self.endpoint("STATUS"),
            json!({ "id": order_ref }),
        )
    }

    fn cancel_order(&self, order_ref: &str) -> Result<()> {
        let _: Value = self.post_signed(
            "cancel_order",
            self.endpoint("CANCEL"),
            json!({ "id": order_ref }),
        )?;
        info!("order cancelled: {:?}", order_ref);
        Ok(())
    }
}
