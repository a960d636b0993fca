use bitmask_enum::bitmask;
use clap::ValueEnum;

/// What the process should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    All,
    Trader,
    Alerts,
    Info,
}

/// Which pieces of work the shared poll loop performs each cycle.
#[bitmask]
#[derive(Debug)]
pub enum Components {
    Trader,
    Alerts,
}

pub fn components_for(mode: Mode) -> Components {
    match mode {
        Mode::All => Components::Trader.or(Components::Alerts),
        Mode::Trader => Components::Trader,
        Mode::Alerts => Components::Alerts,
        Mode::Info => panic!("info mode does not run loop components"),
    }
}
