//! Run economy and upgrade progression for HOLDOUT.
//!
//! The treasury and passive income feed the shop; the upgrade aggregator
//! turns the purchased-upgrade ledger into the global multipliers the
//! combat resolver reads every tick.

pub use holdout_core as core;

pub mod economy;
pub mod upgrades;

pub use economy::{PassiveIncome, Treasury};
pub use upgrades::{UpgradeEffectAggregator, UpgradeLedgerEntry};
