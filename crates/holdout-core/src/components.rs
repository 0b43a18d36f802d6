//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems, not components.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::UnitTypeConfig;
use crate::enums::UnitKind;

/// Marker for units hostile to the structure.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hostile;

/// Marker for the boss unit of a boss wave.
#[derive(Debug, Clone, Copy, Default)]
pub struct Boss;

/// Archetype of a live unit. The config is shared, never copied.
#[derive(Debug, Clone)]
pub struct UnitProfile {
    pub kind: UnitKind,
    pub config: Arc<UnitTypeConfig>,
}

/// Current and max health of a unit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Vitals {
    pub health: f64,
    /// Scaled max health, fixed at spawn.
    pub max_health: f64,
    /// Set once health reaches zero; the entity is despawned at end of tick.
    pub dead: bool,
}

/// Strike timing against the structure.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AttackState {
    pub last_attack_secs: Option<f64>,
}

/// Horizontal orientation (radians, 0 = North, clockwise).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Facing {
    pub yaw: f64,
}

/// A weapon's traveling shot.
#[derive(Debug, Clone)]
pub struct ProjectileState {
    /// Armory slot of the weapon that fired it.
    pub slot: usize,
    /// Damage per hit, multipliers already applied.
    pub damage: f64,
    /// Contact radius (meters).
    pub radius: f64,
    /// Remaining hits before the projectile detonates.
    pub hits_remaining: u32,
    pub area_radius: Option<f64>,
    /// Entity bits of units already struck.
    pub already_hit: Vec<u64>,
    pub spawn_secs: f64,
    pub lifetime: f64,
}
