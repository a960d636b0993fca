use hmac::{Hmac, Mac, NewMac};
use math::round;
use sha2::Sha256;

use flexi_logger::{detailed_format, Age, Cleanup, Criterion, Duplicate, Logger, Naming};

// Hex encoded HMAC-SHA256 of the serialized request body, the exchange
// authenticates POSTs by signing the exact bytes sent.
pub fn sign_body(secret: &str, body: &str) -> String {
    type HmacSha256 = Hmac<Sha256>;

    let mut mac = HmacSha256::new_varkey(secret.as_bytes()).unwrap();
    mac.update(body.as_bytes());
    let hash_msg = mac.finalize().into_bytes();
    hex::encode(&hash_msg)
}

pub fn init_logging(logdir: &str, logspec: &str) {
    Logger::with_str(logspec)
        .log_to_file()
        .directory(logdir)
        .format(detailed_format)
        .duplicate_to_stdout(Duplicate::Info)
        .create_symlink("current.log")
        .rotate(
            Criterion::Age(Age::Day),
            Naming::Timestamps,
            Cleanup::KeepLogFiles(7),
        )
        .start()
        .unwrap();
}

// Truncate towards zero at the exchange's allowed decimal places.
pub fn round_down(value: f64, dps: i8) -> f64 {
    round::floor(value, dps)
}

#[derive(Debug, PartialEq)]
pub struct ProfitLoss {
    pub gross_profit: f64,
    pub net_profit: f64,
    pub profit_pct: f64,
}

// Realized profit of a buy/sell round trip, net of taker fees on both legs.
// fee_pct is a percentage, e.g. 0.1 for 0.1%.
pub fn profit_loss(buy_price: f64, sell_price: f64, qty: f64, fee_pct: f64) -> ProfitLoss {
    let buy_total = buy_price * qty;
    let sell_total = sell_price * qty;
    let buy_fee = buy_total * (fee_pct / 100.0);
    let sell_fee = sell_total * (fee_pct / 100.0);
    let gross_profit = sell_total - buy_total;
    let net_profit = gross_profit - buy_fee - sell_fee;

    ProfitLoss {
        gross_profit,
        net_profit,
        profit_pct: (net_profit / buy_total) * 100.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_shape() {
        let sig = sign_body("topsecret", r#"{"timestamp":1700000000000}"#);
        assert_eq!(sig.len(), 64);
        assert!(sig.chars().all(|c| c.is_ascii_hexdigit()));

        // Deterministic for the same inputs, different for a different key.
        assert_eq!(sig, sign_body("topsecret", r#"{"timestamp":1700000000000}"#));
        assert_ne!(sig, sign_body("othersecret", r#"{"timestamp":1700000000000}"#));
    }

    #[test]
    fn rounding_truncates() {
        assert!((round_down(1.23456789123, 8) - 1.23456789).abs() < 1e-12);
        assert!((round_down(0.999999999, 8) - 0.99999999).abs() < 1e-12);
        assert_eq!(round_down(42.0, 8), 42.0);
    }

    #[test]
    fn round_trip_profit() {
        let pl = profit_loss(0.65, 0.70, 100.0, 0.1);
        assert!((pl.gross_profit - 5.0).abs() < 1e-9);
        assert!((pl.net_profit - 4.865).abs() < 1e-9);
        assert!((pl.profit_pct - (4.865 / 65.0) * 100.0).abs() < 1e-6);
    }

    #[test]
    fn losing_round_trip() {
        let pl = profit_loss(0.70, 0.65, 100.0, 0.1);
        assert!(pl.gross_profit < 0.0);
        assert!(pl.net_profit < pl.gross_profit);
        assert!(pl.profit_pct < 0.0);
    }
}
