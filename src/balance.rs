// structures and routines related to account balance information.
use crate::tradingpair::TradingPair;

use serde::{Deserialize, Serialize};

/// One wallet entry from the balances endpoint.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Balance {
    pub currency: String,
    pub balance: String,
    pub locked_balance: String,
}

impl Balance {
    pub fn get_available(&self) -> f64 {
        self.balance.parse::<f64>().unwrap_or(0.0)
    }

    pub fn get_locked(&self) -> f64 {
        self.locked_balance.parse::<f64>().unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct AssetBalance {
    pub currency: String,
    pub available: f64,
    pub locked: f64,
}

/// The two sides of the traded pair, split out of the full wallet list.
/// Fetched fresh at every decision point, never cached across cycles.
#[derive(Debug, Clone)]
pub struct PairBalances {
    pub crypto: AssetBalance,
    pub fiat: AssetBalance,
}

impl PairBalances {
    // The exchange omits wallets that were never funded, those read as zero.
    pub fn from_balances(balances: &[Balance], tp: &TradingPair) -> PairBalances {
        let mut crypto = AssetBalance {
            currency: tp.crypto_currency().to_string(),
            ..Default::default()
        };
        let mut fiat = AssetBalance {
            currency: tp.fiat_currency().to_string(),
            ..Default::default()
        };

        for b in balances {
            if b.currency == crypto.currency {
                crypto.available = b.get_available();
                crypto.locked = b.get_locked();
            } else if b.currency == fiat.currency {
                fiat.available = b.get_available();
                fiat.locked = b.get_locked();
            }
        }

        PairBalances { crypto, fiat }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wallet(currency: &str, balance: &str, locked: &str) -> Balance {
        Balance {
            currency: currency.to_string(),
            balance: balance.to_string(),
            locked_balance: locked.to_string(),
        }
    }

    #[test]
    fn splits_pair_sides() {
        let tp = TradingPair::new("ELY/INR");
        let balances = vec![
            wallet("BTC", "0.5", "0"),
            wallet("ELY", "100", "25"),
            wallet("INR", "1000", "0"),
        ];

        let pb = PairBalances::from_balances(&balances, &tp);
        assert_eq!(pb.crypto.currency, "ELY");
        assert_eq!(pb.crypto.available, 100.0);
        assert_eq!(pb.crypto.locked, 25.0);
        assert_eq!(pb.fiat.currency, "INR");
        assert_eq!(pb.fiat.available, 1000.0);
    }

    #[test]
    fn missing_wallets_read_zero() {
        let tp = TradingPair::new("ELY/INR");
        let pb = PairBalances::from_balances(&[], &tp);
        assert_eq!(pb.crypto.available, 0.0);
        assert_eq!(pb.fiat.available, 0.0);
    }

    #[test]
    fn unparsable_amount_reads_zero() {
        let tp = TradingPair::new("ELY/INR");
        let pb = PairBalances::from_balances(&[wallet("INR", "oops", "0")], &tp);
        assert_eq!(pb.fiat.available, 0.0);
    }
}
