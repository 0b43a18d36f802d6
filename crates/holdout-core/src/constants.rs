//! Simulation constants and tuning defaults.
//!
//! Config structs fall back to these values when a field is omitted.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 30;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

// --- Enemy scaling ---

/// Health increase per wave (10%).
pub const HEALTH_SCALE_PER_WAVE: f64 = 0.10;

/// Damage increase per wave (5%).
pub const DAMAGE_SCALE_PER_WAVE: f64 = 0.05;

/// Speed increase per wave (2%).
pub const SPEED_SCALE_PER_WAVE: f64 = 0.02;

/// Gold drop increase per wave (5%).
pub const GOLD_SCALE_PER_WAVE: f64 = 0.05;

/// Health multiplier cap, as an increase over 1.0.
pub const MAX_HEALTH_SCALE: f64 = 2.0;

/// Damage multiplier cap, as an increase over 1.0.
pub const MAX_DAMAGE_SCALE: f64 = 1.0;

/// Speed multiplier cap, as an increase over 1.0.
pub const MAX_SPEED_SCALE: f64 = 0.5;

/// Gold multiplier cap, as an increase over 1.0.
pub const MAX_GOLD_SCALE: f64 = 1.0;

// --- Enemy count ---

/// Enemy count on wave 1.
pub const BASE_ENEMY_COUNT: u32 = 5;

/// Factor for the logarithmic count formula.
pub const COUNT_SCALING_FACTOR: f64 = 0.5;

// --- Wave timing ---

/// Seconds between waves on wave 1.
pub const BASE_WAVE_INTERVAL: f64 = 30.0;

/// Interval reduction per wave (seconds).
pub const WAVE_INTERVAL_REDUCTION: f64 = 0.5;

/// Floor for the wave interval (seconds).
pub const MIN_WAVE_INTERVAL: f64 = 15.0;

/// How long before the full interval the first wave arrives after start (seconds).
pub const FIRST_WAVE_LEAD_IN: f64 = 5.0;

// --- Unit type unlocks ---

pub const FIRST_FAST_WAVE: u32 = 3;
pub const FIRST_TANK_WAVE: u32 = 5;
pub const FIRST_RANGED_WAVE: u32 = 7;

/// Share of a wave claimed by fast units once unlocked.
pub const FAST_SHARE: f64 = 0.15;

/// Share of a wave claimed by tank units once unlocked.
pub const TANK_SHARE: f64 = 0.30;

/// Share of a wave claimed by ranged units once unlocked.
pub const RANGED_SHARE: f64 = 0.20;

// --- Boss waves ---

/// A boss appears every N waves.
pub const BOSS_WAVE_INTERVAL: u32 = 10;

pub const BOSS_HEALTH_MULTIPLIER: f64 = 5.0;
pub const BOSS_DAMAGE_MULTIPLIER: f64 = 2.0;
pub const BOSS_GOLD_MULTIPLIER: f64 = 10.0;

/// Base of the boss-only exponential growth term.
pub const BOSS_SCALING_FACTOR: f64 = 1.5;

/// Bosses move at 80% of the scaled speed.
pub const BOSS_SPEED_FACTOR: f64 = 0.8;

/// Health/gold added per boss appearance, relative to `BOSS_REFERENCE_VALUE`.
pub const BOSS_APPEARANCE_INCREMENT: f64 = 500.0;

/// Reference value the appearance increment is normalized against.
pub const BOSS_REFERENCE_VALUE: f64 = 1000.0;

/// Delay between the boss-incoming warning and the regular contingent (seconds).
pub const BOSS_WARNING_DELAY: f64 = 3.0;

/// Delay between the regular contingent and the boss itself (seconds).
pub const BOSS_SPAWN_DELAY: f64 = 2.0;

/// Minimum size of the regular contingent on a boss wave.
pub const BOSS_MIN_CONTINGENT: u32 = 2;

// --- Spawning ---

/// Radius of the spawn ring around the defended point (meters).
pub const SPAWN_RADIUS: f64 = 30.0;

/// Delay between consecutive unit spawns (seconds).
pub const SPAWN_DELAY_BETWEEN_UNITS: f64 = 0.5;

/// Height above the sampled point the ground probe starts from (meters).
pub const GROUND_PROBE_HEIGHT: f64 = 10.0;

/// Reach of the downward ground probe (meters).
pub const GROUND_PROBE_REACH: f64 = 20.0;

// --- Weapons ---

/// Fire rates below this are clamped when computing the cooldown.
pub const MIN_FIRE_RATE: f64 = 0.1;

/// Maximum number of equipped weapons.
pub const MAX_WEAPONS: usize = 8;

/// Distance from the structure at which weapons are mounted (meters).
pub const WEAPON_MOUNT_RADIUS: f64 = 2.0;

/// Contact radius of a projectile (meters).
pub const PROJECTILE_RADIUS: f64 = 0.25;

/// Default hit radius of a unit (meters).
pub const UNIT_HIT_RADIUS: f64 = 0.5;

// --- Economy ---

/// Gold at the start of a run.
pub const STARTING_GOLD: f64 = 50.0;

/// Passive gold per second at the start of a run.
pub const BASE_PASSIVE_GOLD_PER_SEC: f64 = 1.0;

/// Passive gold per second added on every wave start.
pub const PASSIVE_GOLD_INCREASE_PER_WAVE: f64 = 1.0;

// --- Structure ---

/// Base max health of the defended structure.
pub const TOWER_MAX_HEALTH: f64 = 100.0;
