//! Game state snapshot: the complete visible state handed out after each tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::SimEvent;
use crate::types::{CachedMultipliers, Position, SimTime};

/// Complete game state published after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub wave: WaveView,
    pub units: Vec<UnitView>,
    pub weapons: Vec<WeaponView>,
    pub projectiles: Vec<ProjectileView>,
    pub tower: TowerView,
    pub gold: f64,
    pub passive_gold_per_sec: f64,
    pub multipliers: CachedMultipliers,
    pub stats: RunStatsView,
    pub events: Vec<SimEvent>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaveView {
    pub number: u32,
    pub phase: WavePhase,
    pub is_boss_wave: bool,
    /// Seconds until the next wave starts; zero outside `Idle`.
    pub time_to_next_wave: f64,
    pub live_units: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitView {
    pub id: u64,
    pub kind: UnitKind,
    pub position: Position,
    pub health: f64,
    pub max_health: f64,
    pub is_boss: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponView {
    pub slot: usize,
    pub weapon_id: String,
    pub position: Position,
    pub target_id: Option<u64>,
    /// Effective range including every multiplier.
    pub range: f64,
    /// Seconds until the weapon may fire again.
    pub cooldown_remaining: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub id: u64,
    /// Armory slot of the weapon that fired it.
    pub slot: usize,
    pub position: Position,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TowerView {
    pub position: Position,
    pub health: f64,
    pub max_health: f64,
    pub destroyed: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunStatsView {
    pub survival_secs: f64,
    pub waves_reached: u32,
    pub units_killed: u32,
    pub bosses_killed: u32,
    /// Sum of every gold gain this run.
    pub gold_earned: f64,
}
