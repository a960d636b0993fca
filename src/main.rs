mod alerts;
mod balance;
mod coindcx;
mod config;
mod discord;
mod error;
mod exchange;
mod mode;
mod order;
mod price;
mod tracker;
mod trader;
mod trading;
mod tradingpair;
mod utils;

use clap::Parser;
use log::{error, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::{thread, time::Duration};

use alerts::AlertSystem;
use coindcx::CoinDcx;
use config::{Config, Credentials};
use discord::{DiscordWebhook, Notifier};
use exchange::Exchange;
use mode::{components_for, Components, Mode};
use tracker::PriceTracker;
use trader::Trader;
use trading::{AutoTrader, TradeParams};
use tradingpair::TradingPair;

#[derive(Parser, Debug)]
#[command(name = "cm", about = "Threshold trader and price alerts for a single CoinDCX pair")]
struct Args {
    /// Operation mode.
    #[arg(long, value_enum, default_value = "all")]
    mode: Mode,

    /// Buy price threshold, overrides the config file.
    #[arg(long)]
    buy_price: Option<f64>,

    /// Sell price threshold, overrides the config file.
    #[arg(long)]
    sell_price: Option<f64>,

    /// High price alert threshold, overrides the config file.
    #[arg(long)]
    high_alert: Option<f64>,

    /// Low price alert threshold, overrides the config file.
    #[arg(long)]
    low_alert: Option<f64>,

    /// Configuration file path.
    #[arg(long, default_value = "conf/cm.ini")]
    config: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    utils::init_logging("logs", "info");
    info!("starting up...");

    let mut cfg = config::new(&args.config);
    info!("loaded configuration from {:?}.", args.config);

    // Command line thresholds win over the config file.
    if let Some(p) = args.buy_price {
        cfg.trading.buy_price = p;
    }
    if let Some(p) = args.sell_price {
        cfg.trading.sell_price = p;
    }
    if let Some(p) = args.high_alert {
        cfg.alerts.high = p;
    }
    if let Some(p) = args.low_alert {
        cfg.alerts.low = p;
    }

    match args.mode {
        Mode::Info => run_info(&cfg)?,
        m => run_loop(&cfg, components_for(m))?,
    }

    Ok(())
}

// The shared poll loop: one price fetch per cycle feeds the trader step
// and/or the alert check, then a fixed sleep. Everything runs on this
// one thread.
fn run_loop(cfg: &Config, components: Components) -> error::Result<()> {
    let creds = Credentials::from_env()?;
    let bex = CoinDcx::new(cfg.exchange.clone(), creds);
    let tp = TradingPair::new(&cfg.trading.pair);

    if !bex.test_connectivity(tp.symbol()) {
        error!("failed to connect to {:?}, exiting...", cfg.exchange.name);
        return Err(error::Error::Connectivity(cfg.exchange.name.clone()));
    }

    let discord = DiscordWebhook::from_env()?;
    if !discord.send_message("🔄 Crypto manager started") {
        warn!("discord webhook unreachable, continuing without notifications");
    }

    let running = Arc::new(AtomicBool::new(true));
    {
        let running = running.clone();
        ctrlc::set_handler(move || {
            info!("interrupt received, shutting down...");
            running.store(false, Ordering::SeqCst);
        })
        .expect("failed to install interrupt handler");
    }

    let trader = Trader::new(&bex, &discord, &tp);
    let mut auto = AutoTrader::new(
        trader,
        &discord,
        TradeParams::from_config(&cfg.trading, cfg.dryrun),
    );
    let mut alert_system = AlertSystem::new(cfg.alerts.low, cfg.alerts.high);
    let mut tracker = PriceTracker::new(&bex, &tp);

    info!(
        "running for {} every {}s: buy at {}, sell at {}, alerts low {} high {}{}",
        tp.name(),
        cfg.poll_interval,
        cfg.trading.buy_price,
        cfg.trading.sell_price,
        cfg.alerts.low,
        cfg.alerts.high,
        if cfg.dryrun { " (dryrun)" } else { "" }
    );

    while running.load(Ordering::SeqCst) {
        match tracker.poll() {
            Ok(price) => {
                if components.contains(Components::Trader) {
                    if let Err(e) = auto.check_price_and_trade(price) {
                        error!("error in trading cycle: {}", e);
                        discord.send_message(&format!("⚠️ Trading cycle error: {}", e));
                    }
                }

                if components.contains(Components::Alerts) {
                    alert_system.process(tp.symbol(), price, &discord);
                }
            }

            Err(e) => {
                error!("error fetching current price: {}", e);
                discord.send_message(&format!("⚠️ Price fetch error: {}", e));
            }
        }

        sleep_interruptible(cfg.poll_interval, &running);
    }

    info!(
        "stopping, last observed price: {:?}",
        tracker.current_price()
    );
    auto.shutdown();
    discord.send_message("🛑 Crypto manager shutting down");

    Ok(())
}

// Sleep in one second slices so an interrupt is honoured promptly.
fn sleep_interruptible(secs: u64, running: &AtomicBool) {
    for _ in 0..secs {
        if !running.load(Ordering::SeqCst) {
            return;
        }
        thread::sleep(Duration::from_secs(1));
    }
}

// One-shot report of the market, the configured strategy and the account
// balances.
fn run_info(cfg: &Config) -> error::Result<()> {
    let creds = Credentials::from_env()?;
    let bex = CoinDcx::new(cfg.exchange.clone(), creds);
    let tp = TradingPair::new(&cfg.trading.pair);
    let tracker = PriceTracker::new(&bex, &tp);

    let summary = tracker.summary()?;

    println!("\n===== {} Market Information =====", tp.name());
    println!("Current Price: {}", summary.last_price);
    println!("24h High: {}", summary.high_24h.as_deref().unwrap_or("-"));
    println!("24h Low: {}", summary.low_24h.as_deref().unwrap_or("-"));
    println!(
        "24h Volume: {}",
        summary.volume_24h.as_deref().unwrap_or("-")
    );
    println!(
        "24h Change: {}%",
        summary.change_24h.as_deref().unwrap_or("-")
    );

    println!("\n===== Trading Strategy =====");
    println!("Buy Price: {}", cfg.trading.buy_price);
    println!("Sell Price: {}", cfg.trading.sell_price);
    println!(
        "Alert Thresholds: low {} high {}",
        cfg.alerts.low, cfg.alerts.high
    );

    match bex.get_balances() {
        Ok(balances) => {
            let pb = balance::PairBalances::from_balances(&balances, &tp);
            println!("\n===== Account Balance =====");
            println!(
                "Crypto ({}): {} (Available) + {} (Locked)",
                pb.crypto.currency, pb.crypto.available, pb.crypto.locked
            );
            println!(
                "Fiat ({}): {} (Available) + {} (Locked)",
                pb.fiat.currency, pb.fiat.available, pb.fiat.locked
            );
        }

        Err(e) => {
            println!("\nCould not retrieve account balance: {}", e);
        }
    }

    Ok(())
}
