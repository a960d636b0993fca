use crate::error::{Error, Result};

use serde::{Deserialize, Serialize};

/// One entry of the exchange's ticker list. Numeric values come over the
/// wire as strings.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Ticker {
    pub market: String,
    pub last_price: String,
    pub change_24h: Option<String>,
    pub high_24h: Option<String>,
    pub low_24h: Option<String>,
    pub volume_24h: Option<String>,
}

impl Ticker {
    pub fn get_last_price(&self) -> Result<f64> {
        self.last_price.parse::<f64>().map_err(|_| Error::BadNumber {
            field: "last_price",
            value: self.last_price.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_ticker() {
        let t: Ticker = serde_json::from_str(
            r#"{"market":"ELYINR","last_price":"0.6512","change_24h":"-1.2",
                "high_24h":"0.71","low_24h":"0.63","volume_24h":"120000"}"#,
        )
        .unwrap();
        assert_eq!(t.market, "ELYINR");
        assert_eq!(t.get_last_price().unwrap(), 0.6512);
    }

    #[test]
    fn missing_24h_fields() {
        let t: Ticker =
            serde_json::from_str(r#"{"market":"ELYINR","last_price":"0.65"}"#).unwrap();
        assert!(t.high_24h.is_none());
        assert_eq!(t.get_last_price().unwrap(), 0.65);
    }

    #[test]
    fn garbage_price_is_an_error() {
        let t: Ticker =
            serde_json::from_str(r#"{"market":"ELYINR","last_price":"n/a"}"#).unwrap();
        assert!(t.get_last_price().is_err());
    }
}
