//! Recoverable failure taxonomy.
//!
//! Every public operation validates before it mutates, so returning one of
//! these always means no state changed.

use thiserror::Error;

use crate::enums::UnitKind;

/// Content that could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigKey {
    #[error("unit type {0:?}")]
    Unit(UnitKind),
    #[error("weapon '{0}'")]
    Weapon(String),
    #[error("upgrade '{0}'")]
    Upgrade(String),
}

/// Operation refused in the current state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidOperation {
    #[error("a spawn sequence is already in progress")]
    SpawnBusy,
    #[error("upgrade '{0}' is at max stacks")]
    UpgradeMaxed(String),
    #[error("upgrade '{id}' unlocks at wave {required_wave}")]
    WaveLocked { id: String, required_wave: u32 },
    #[error("upgrade '{id}' requires '{missing}'")]
    PrerequisiteMissing { id: String, missing: String },
    #[error("weapon is on cooldown")]
    OnCooldown,
    #[error("weapon has no target")]
    NoTarget,
    #[error("all {0} weapon slots are in use")]
    ArmoryFull(usize),
    #[error("weapon '{0}' cannot be equipped twice")]
    NotStackable(String),
    #[error("no weapon in slot {0}")]
    EmptySlot(usize),
    #[error("command not allowed while {0}")]
    WrongPhase(&'static str),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("configuration missing: {0}")]
    ConfigurationMissing(ConfigKey),
    #[error("invalid operation: {0}")]
    InvalidOperation(InvalidOperation),
    #[error("insufficient funds: need {cost}, have {balance}")]
    InsufficientFunds { cost: f64, balance: f64 },
}

impl From<InvalidOperation> for SimError {
    fn from(op: InvalidOperation) -> Self {
        SimError::InvalidOperation(op)
    }
}

impl From<ConfigKey> for SimError {
    fn from(key: ConfigKey) -> Self {
        SimError::ConfigurationMissing(key)
    }
}
