//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Hostile unit archetype. Ordering is the spawn order within a wave.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum UnitKind {
    #[default]
    Basic,
    Fast,
    Tank,
    Ranged,
    Boss,
}

impl UnitKind {
    /// Kinds that can appear in a regular wave.
    pub const REGULAR: [UnitKind; 4] = [
        UnitKind::Basic,
        UnitKind::Fast,
        UnitKind::Tank,
        UnitKind::Ranged,
    ];
}

/// Wave scheduler phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WavePhase {
    /// Counting down toward the next wave.
    #[default]
    Idle,
    /// Units for the current wave are still being created.
    Spawning,
    /// Everything is spawned; waiting for the live-unit count to reach zero.
    WaitingForClear,
    /// Wave cleared. Transient: the scheduler re-enters `Idle` in the same step.
    Completed,
}

/// Top-level game phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    MainMenu,
    Playing,
    Paused,
    GameOver,
}

/// Shop rarity of a weapon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeaponRarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Epic,
}

/// Primary damage delivery of a weapon, derived from its config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryMode {
    /// Damage lands the moment the weapon fires.
    InstantHit,
    /// A traveling entity carries the damage.
    Projectile,
    /// Damage hops from unit to unit with falloff.
    Chain,
}

/// What a purchased upgrade affects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeKind {
    /// Flat bonus to the structure's max health.
    #[default]
    MaxHealth,
    /// Structure health restored per second.
    HealthRegeneration,
    /// Extra passive gold per second.
    GoldGeneration,
    /// Global weapon damage multiplier.
    DamageMultiplier,
    /// Global weapon fire-rate multiplier.
    AttackSpeedMultiplier,
    /// Global weapon range multiplier.
    Range,
}
