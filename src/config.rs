use crate::error::{Error, Result};

use ini::{Ini, Properties};
use log::{debug, log_enabled, Level::Debug};
use std::collections::HashMap;
use std::env;

#[derive(Debug, Clone)]
pub struct ExchangeConfig {
    pub name: String,
    pub uri: String,
    pub endpoints_map: HashMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct TradingConfig {
    pub pair: String, // CRYPTO/FIAT, e.g. ELY/INR.
    pub buy_price: f64,
    pub sell_price: f64,
    pub max_trade_amount: f64, // Fiat ceiling committed per buy.
    pub min_trade_amount: f64, // Buys at or below this are skipped.
    pub balance_pct: f64,      // Share of available fiat to commit.
}

#[derive(Debug, Clone)]
pub struct AlertConfig {
    pub low: f64,
    pub high: f64,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub exchange: ExchangeConfig,
    pub trading: TradingConfig,
    pub alerts: AlertConfig,
    pub poll_interval: u64, // Seconds between cycles.
    pub dryrun: bool,
}

fn required<'a>(section: &'a Properties, section_name: &str, key: &str) -> &'a str {
    match section.get(key) {
        Some(v) => v,
        None => panic!(
            "section {:?} missing required {:?} entry",
            section_name, key
        ),
    }
}

fn required_f64(section: &Properties, section_name: &str, key: &str) -> f64 {
    let v = required(section, section_name, key);
    match v.parse::<f64>() {
        Ok(f) => {
            if f <= 0.0 {
                panic!(
                    "section {:?} entry {:?} must be positive, got {:?}",
                    section_name, key, v
                );
            }
            f
        }
        Err(_) => panic!(
            "section {:?} entry {:?} is not a number: {:?}",
            section_name, key, v
        ),
    }
}

pub fn new(cfg_file_path: &str) -> Config {
    let inifile = match Ini::load_from_file(cfg_file_path) {
        Ok(ini) => ini,

        Err(e) => {
            panic!("failed to load config file {:?}: {:?}", cfg_file_path, e);
        }
    };

    if log_enabled!(Debug) {
        debug!("configuration file: ");
        for (section, prop) in inifile.iter() {
            debug!("[{:?}]", section);
            for (k, v) in prop.iter() {
                debug!("{:?}={:?}", k, v);
            }
        }
    }

    let manager_section = match inifile.section(Some("Manager")) {
        Some(s) => s,
        None => panic!("required section \"Manager\" not found!"),
    };

    let exchange_section = match inifile.section(Some("Exchange")) {
        Some(s) => s,
        None => panic!("required section \"Exchange\" not found!"),
    };

    let trading_section = match inifile.section(Some("Trading")) {
        Some(s) => s,
        None => panic!("required section \"Trading\" not found!"),
    };

    let alerts_section = match inifile.section(Some("Alerts")) {
        Some(s) => s,
        None => panic!("required section \"Alerts\" not found!"),
    };

    let exchange_name = required(exchange_section, "Exchange", "Name");
    let uri = required(exchange_section, "Exchange", "URI");

    // The Endpoints entry looks like EP0=ep0,EP1=ep1, EP0 is the name of
    // the endpoint and ep0 the rest path to append to the api uri.
    let eps = required(exchange_section, "Exchange", "Endpoints");
    let mut endpoints_map: HashMap<String, String> = HashMap::new();
    for ep in eps.split(',') {
        let kvvec: Vec<&str> = ep.split('=').collect();
        if kvvec.len() != 2 {
            panic!("malformed endpoint entry {:?}", ep);
        }
        endpoints_map.insert(kvvec[0].trim().to_string(), kvvec[1].trim().to_string());
    }

    // Parse [Manager] section, these are global options.
    //
    // dryrun indicates whether we actually trade or not.
    let dryrun = match manager_section.get("Dryrun") {
        Some(v) => v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("yes"),
        None => false,
    };

    let poll_interval = match manager_section.get("PollInterval") {
        Some(v) => match v.parse::<u64>() {
            Ok(n) if n > 0 => n,
            _ => panic!("section \"Manager\" entry \"PollInterval\" is not a positive integer"),
        },
        None => 60,
    };

    let balance_pct = match trading_section.get("BalancePct") {
        Some(v) => match v.parse::<f64>() {
            Ok(p) if p > 0.0 && p <= 100.0 => p,
            _ => panic!("section \"Trading\" entry \"BalancePct\" must be in (0, 100]"),
        },
        None => 95.0,
    };

    Config {
        exchange: ExchangeConfig {
            name: exchange_name.to_string(),
            uri: uri.to_string(),
            endpoints_map,
        },

        trading: TradingConfig {
            pair: required(trading_section, "Trading", "Pair").to_string(),
            buy_price: required_f64(trading_section, "Trading", "BuyPrice"),
            sell_price: required_f64(trading_section, "Trading", "SellPrice"),
            max_trade_amount: required_f64(trading_section, "Trading", "MaxTradeAmount"),
            min_trade_amount: required_f64(trading_section, "Trading", "MinTradeAmount"),
            balance_pct,
        },

        alerts: AlertConfig {
            low: required_f64(alerts_section, "Alerts", "Low"),
            high: required_f64(alerts_section, "Alerts", "High"),
        },

        poll_interval,
        dryrun,
    }
}

/// Exchange API credentials, environment provided and never written to
/// the config file.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
}

impl Credentials {
    pub fn from_env() -> Result<Credentials> {
        let api_key = env::var("COINDCX_API_KEY")
            .map_err(|_| Error::MissingCredential("COINDCX_API_KEY"))?;
        let api_secret = env::var("COINDCX_API_SECRET")
            .map_err(|_| Error::MissingCredential("COINDCX_API_SECRET"))?;

        if api_key.is_empty() {
            return Err(Error::MissingCredential("COINDCX_API_KEY"));
        }
        if api_secret.is_empty() {
            return Err(Error::MissingCredential("COINDCX_API_SECRET"));
        }

        Ok(Credentials {
            api_key,
            api_secret,
        })
    }
}
