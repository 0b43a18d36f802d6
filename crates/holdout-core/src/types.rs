//! Fundamental geometric and simulation types.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// 3D position in simulation space (meters, Cartesian).
/// x = East, y = North, z = Up (height above datum).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// 3D velocity in simulation space (m/s).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

/// Wave scaling applied to a unit at spawn time. Never modified afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnScaling {
    pub health: f64,
    pub damage: f64,
    pub speed: f64,
    pub gold: f64,
}

impl Default for SpawnScaling {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl SpawnScaling {
    /// No scaling at all.
    pub const IDENTITY: SpawnScaling = SpawnScaling {
        health: 1.0,
        damage: 1.0,
        speed: 1.0,
        gold: 1.0,
    };
}

/// Global effects derived from the purchased-upgrade ledger.
///
/// Always rebuilt from scratch by the upgrade aggregator; never patched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CachedMultipliers {
    pub damage: f64,
    pub fire_rate: f64,
    pub range: f64,
    /// Structure health restored per second.
    pub health_regen_per_sec: f64,
    /// Extra passive gold per second.
    pub gold_gen_per_sec: f64,
    /// Flat bonus added to the structure's base max health.
    pub max_health_bonus: f64,
}

impl Default for CachedMultipliers {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl CachedMultipliers {
    pub const IDENTITY: CachedMultipliers = CachedMultipliers {
        damage: 1.0,
        fire_rate: 1.0,
        range: 1.0,
        health_regen_per_sec: 0.0,
        gold_gen_per_sec: 0.0,
        max_health_bonus: 0.0,
    };
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Range to another position in meters (3D distance).
    pub fn range_to(&self, other: &Position) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Horizontal range (ignoring height).
    pub fn horizontal_range_to(&self, other: &Position) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Bearing to another position in radians (0 = North, clockwise).
    pub fn bearing_to(&self, other: &Position) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx.atan2(dy).rem_euclid(std::f64::consts::TAU)
    }

    /// Same horizontal coordinates, different height.
    pub fn with_z(&self, z: f64) -> Position {
        Position::new(self.x, self.y, z)
    }

    pub fn to_dvec3(self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }

    pub fn from_dvec3(v: DVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl Velocity {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Velocity of magnitude `speed` pointing from `from` to `to`.
    /// Zero when the two positions coincide.
    pub fn toward(from: &Position, to: &Position, speed: f64) -> Self {
        let dir = (to.to_dvec3() - from.to_dvec3()).normalize_or_zero() * speed;
        Self::new(dir.x, dir.y, dir.z)
    }

    /// Speed magnitude (m/s).
    pub fn speed(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Heading in radians (0 = North, clockwise).
    pub fn heading(&self) -> f64 {
        self.x.atan2(self.y).rem_euclid(std::f64::consts::TAU)
    }

    pub fn to_dvec3(self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }
}

impl SimTime {
    /// Seconds per tick at the default tick rate.
    pub fn dt(&self) -> f64 {
        1.0 / crate::constants::TICK_RATE as f64
    }

    /// Advance by one tick.
    pub fn advance(&mut self) {
        self.tick += 1;
        self.elapsed_secs += self.dt();
    }
}
