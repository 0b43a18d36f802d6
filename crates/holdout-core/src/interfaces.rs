//! Collaborator traits the simulation is wired with at construction.
//!
//! Concrete implementations live in other crates (`holdout-campaign` for the
//! economy, `holdout-terrain` for ground probes, `holdout-sim` for the tower),
//! and tests substitute their own.

use std::sync::Arc;

use crate::config::{UnitTypeConfig, UpgradeConfig, WeaponConfig};
use crate::enums::UnitKind;
use crate::types::Position;

/// Currency store. Notification of changes is carried by simulation events.
pub trait Economy {
    fn can_afford(&self, amount: f64) -> bool;
    /// Debit `amount`. Returns false and leaves the balance untouched when unaffordable.
    fn spend(&mut self, amount: f64) -> bool;
    fn add(&mut self, amount: f64);
    fn balance(&self) -> f64;
    /// Replace the balance outright, e.g. with the starting gold of a new run.
    fn reset(&mut self, balance: f64);
}

/// The single structure hostile units advance on.
pub trait DefendedStructure {
    fn position(&self) -> Position;
    fn take_damage(&mut self, amount: f64);
    fn heal(&mut self, amount: f64);
    fn is_destroyed(&self) -> bool;
    fn health(&self) -> f64;
    fn max_health(&self) -> f64;
    /// Change max health, keeping the current health fraction.
    fn set_max_health(&mut self, max_health: f64);
    /// Bring the structure back to full health for a new run.
    fn restore(&mut self);
}

/// Downward ground query used to snap spawn points to the terrain.
pub trait GroundProbe {
    /// Cast down from `origin` for at most `reach` meters. Returns the ground
    /// height at `(origin.x, origin.y)` if it lies within the cast.
    fn probe_down(&self, origin: Position, reach: f64) -> Option<f64>;
}

/// Read-only lookup of content by identity.
pub trait ConfigSource {
    fn unit_type(&self, kind: UnitKind) -> Option<Arc<UnitTypeConfig>>;
    fn weapon(&self, id: &str) -> Option<Arc<WeaponConfig>>;
    fn upgrade(&self, id: &str) -> Option<Arc<UpgradeConfig>>;
    /// Every known upgrade id, in a stable order.
    fn upgrade_ids(&self) -> Vec<String>;
}
