use crate::error::Result;
use crate::exchange::Exchange;
use crate::tradingpair::TradingPair;

use log::debug;

/// Fetches the pair's price once per cycle; the one fetch is shared by
/// the trader step and the alert checks.
pub struct PriceTracker<'a> {
    exchange: &'a dyn Exchange,
    pair: &'a TradingPair,
    current_price: Option<f64>,
}

#[derive(Debug)]
pub struct MarketSummary {
    pub last_price: f64,
    pub change_24h: Option<String>,
    pub high_24h: Option<String>,
    pub low_24h: Option<String>,
    pub volume_24h: Option<String>,
}

impl<'a> PriceTracker<'a> {
    pub fn new(exchange: &'a dyn Exchange, pair: &'a TradingPair) -> PriceTracker<'a> {
        PriceTracker {
            exchange,
            pair,
            current_price: None,
        }
    }

    pub fn poll(&mut self) -> Result<f64> {
        let ticker = self.exchange.get_ticker(self.pair.symbol())?;
        let price = ticker.get_last_price()?;
        self.current_price = Some(price);
        debug!("{} last price: {}", self.pair.name(), price);
        Ok(price)
    }

    pub fn current_price(&self) -> Option<f64> {
        self.current_price
    }

    pub fn summary(&self) -> Result<MarketSummary> {
        let t = self.exchange.get_ticker(self.pair.symbol())?;
        Ok(MarketSummary {
            last_price: t.get_last_price()?,
            change_24h: t.change_24h,
            high_24h: t.high_24h,
            low_24h: t.low_24h,
            volume_24h: t.volume_24h,
        })
    }
}
