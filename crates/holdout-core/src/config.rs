//! Data-driven configuration: unit archetypes, weapons, upgrades and tuning.
//!
//! Every struct deserializes from JSON with `#[serde(default)]` fallbacks to
//! the values in [`crate::constants`], so a catalog file only has to list the
//! fields it changes.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::{DeliveryMode, UnitKind, UpgradeKind, WeaponRarity};
use crate::interfaces::ConfigSource;

// --- Units ---

/// Immutable, shared description of a hostile unit archetype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitTypeConfig {
    pub name: String,
    pub max_health: f64,
    /// Base move speed (m/s).
    pub move_speed: f64,
    /// Damage dealt to the structure per strike.
    pub contact_damage: f64,
    /// Distance from the structure at which strikes land (meters).
    pub attack_range: f64,
    /// Seconds between strikes.
    pub attack_cooldown: f64,
    pub gold_value: f64,
    /// Units stop advancing at this distance from the structure (meters).
    pub stopping_distance: f64,
    /// Radius used for pierce-line and projectile contact tests (meters).
    pub hit_radius: f64,
}

impl Default for UnitTypeConfig {
    fn default() -> Self {
        Self {
            name: "Basic".into(),
            max_health: 20.0,
            move_speed: 5.0,
            contact_damage: 10.0,
            attack_range: 2.5,
            attack_cooldown: 1.0,
            gold_value: 5.0,
            stopping_distance: 2.0,
            hit_radius: UNIT_HIT_RADIUS,
        }
    }
}

// --- Weapons ---

/// Parameters of a traveling projectile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileParams {
    /// Flight speed (m/s).
    pub speed: f64,
    /// Seconds before an unspent projectile expires.
    pub lifetime: f64,
}

impl Default for ProjectileParams {
    fn default() -> Self {
        Self {
            speed: 20.0,
            lifetime: 5.0,
        }
    }
}

/// Splash damage around the point of impact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AreaParams {
    pub radius: f64,
}

impl Default for AreaParams {
    fn default() -> Self {
        Self { radius: 2.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PierceParams {
    /// Additional units a single attack may pass through.
    pub max_targets: u32,
}

impl Default for PierceParams {
    fn default() -> Self {
        Self { max_targets: 3 }
    }
}

/// Chained damage that hops between nearby units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainParams {
    /// Total hits including the primary target.
    pub targets: u32,
    /// Maximum hop distance from the last unit hit (meters).
    pub range: f64,
    /// Damage multiplier applied per hop (compounding).
    pub falloff: f64,
}

impl Default for ChainParams {
    fn default() -> Self {
        Self {
            targets: 3,
            range: 5.0,
            falloff: 0.75,
        }
    }
}

/// Immutable description of a weapon type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponConfig {
    pub name: String,
    pub damage: f64,
    /// Shots per second.
    pub fire_rate: f64,
    /// Engagement range (meters).
    pub range: f64,
    pub projectile: Option<ProjectileParams>,
    pub area: Option<AreaParams>,
    pub pierce: Option<PierceParams>,
    pub chain: Option<ChainParams>,
    pub cost: f64,
    pub rarity: WeaponRarity,
    /// Whether more than one copy can be equipped.
    pub allow_multiple: bool,
}

impl Default for WeaponConfig {
    fn default() -> Self {
        Self {
            name: "Weapon".into(),
            damage: 10.0,
            fire_rate: 1.0,
            range: 15.0,
            projectile: None,
            area: None,
            pierce: None,
            chain: None,
            cost: 100.0,
            rarity: WeaponRarity::Common,
            allow_multiple: true,
        }
    }
}

impl WeaponConfig {
    /// Seconds between shots, before any multipliers.
    pub fn cooldown(&self) -> f64 {
        1.0 / self.fire_rate.max(MIN_FIRE_RATE)
    }

    /// Chain is an alternative primary mode and wins over projectiles.
    pub fn delivery(&self) -> DeliveryMode {
        if self.chain.is_some() {
            DeliveryMode::Chain
        } else if self.projectile.is_some() {
            DeliveryMode::Projectile
        } else {
            DeliveryMode::InstantHit
        }
    }
}

// --- Upgrades ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpgradeConfig {
    pub name: String,
    pub kind: UpgradeKind,
    /// Effect of the first stack.
    pub effect: f64,
    /// Effect added by each stack after the first.
    pub effect_per_stack: f64,
    /// Percentage upgrades compound multiplicatively; flat ones add.
    pub is_percentage: bool,
    pub base_cost: f64,
    pub cost_multiplier: f64,
    pub max_stacks: u32,
    pub unlimited_stacks: bool,
    /// Minimum wave number before the upgrade can be bought.
    pub required_wave: u32,
    /// Upgrade ids that must each have at least one stack.
    pub prerequisites: Vec<String>,
}

impl Default for UpgradeConfig {
    fn default() -> Self {
        Self {
            name: "Upgrade".into(),
            kind: UpgradeKind::MaxHealth,
            effect: 1.0,
            effect_per_stack: 1.0,
            is_percentage: false,
            base_cost: 100.0,
            cost_multiplier: 1.5,
            max_stacks: 10,
            unlimited_stacks: false,
            required_wave: 1,
            prerequisites: Vec::new(),
        }
    }
}

impl UpgradeConfig {
    /// Total effect at `stacks` purchased stacks. Zero stacks means no effect.
    pub fn total_effect(&self, stacks: u32) -> f64 {
        if stacks == 0 {
            return 0.0;
        }
        self.effect + self.effect_per_stack * f64::from(stacks - 1)
    }

    /// Cost of the next stack when `stacks` are already owned.
    pub fn cost_at(&self, stacks: u32) -> f64 {
        (self.base_cost * self.cost_multiplier.powi(stacks as i32)).round()
    }

    pub fn is_maxed(&self, stacks: u32) -> bool {
        !self.unlimited_stacks && stacks >= self.max_stacks
    }
}

// --- Wave tuning ---

/// How the regular enemy count grows with the wave number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode")]
pub enum EnemyCountModel {
    /// `base + floor(ln(wave + 1) × factor × (wave − 1))`.
    Logarithmic { factor: f64 },
    /// Piecewise-linear curve through `(wave, count)` points, floored.
    /// Points must be sorted by wave and non-decreasing in count.
    Curve { points: Vec<(f64, f64)> },
}

impl Default for EnemyCountModel {
    fn default() -> Self {
        EnemyCountModel::Logarithmic {
            factor: COUNT_SCALING_FACTOR,
        }
    }
}

/// Per-wave scaling, timing, unlock and boss parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveTuning {
    pub health_rate: f64,
    pub damage_rate: f64,
    pub speed_rate: f64,
    pub gold_rate: f64,
    pub max_health_scale: f64,
    pub max_damage_scale: f64,
    pub max_speed_scale: f64,
    pub max_gold_scale: f64,

    pub base_enemy_count: u32,
    pub count_model: EnemyCountModel,

    pub base_interval: f64,
    pub interval_reduction: f64,
    pub min_interval: f64,
    pub first_wave_lead_in: f64,

    pub first_fast_wave: u32,
    pub first_tank_wave: u32,
    pub first_ranged_wave: u32,
    pub fast_share: f64,
    pub tank_share: f64,
    pub ranged_share: f64,

    pub boss_interval: u32,
    pub boss_health_multiplier: f64,
    pub boss_damage_multiplier: f64,
    pub boss_gold_multiplier: f64,
    pub boss_scaling_factor: f64,
    pub boss_speed_factor: f64,
    pub boss_appearance_increment: f64,
    pub boss_reference_value: f64,
    pub boss_warning_delay: f64,
    pub boss_spawn_delay: f64,
    pub boss_min_contingent: u32,
}

impl Default for WaveTuning {
    fn default() -> Self {
        Self {
            health_rate: HEALTH_SCALE_PER_WAVE,
            damage_rate: DAMAGE_SCALE_PER_WAVE,
            speed_rate: SPEED_SCALE_PER_WAVE,
            gold_rate: GOLD_SCALE_PER_WAVE,
            max_health_scale: MAX_HEALTH_SCALE,
            max_damage_scale: MAX_DAMAGE_SCALE,
            max_speed_scale: MAX_SPEED_SCALE,
            max_gold_scale: MAX_GOLD_SCALE,
            base_enemy_count: BASE_ENEMY_COUNT,
            count_model: EnemyCountModel::default(),
            base_interval: BASE_WAVE_INTERVAL,
            interval_reduction: WAVE_INTERVAL_REDUCTION,
            min_interval: MIN_WAVE_INTERVAL,
            first_wave_lead_in: FIRST_WAVE_LEAD_IN,
            first_fast_wave: FIRST_FAST_WAVE,
            first_tank_wave: FIRST_TANK_WAVE,
            first_ranged_wave: FIRST_RANGED_WAVE,
            fast_share: FAST_SHARE,
            tank_share: TANK_SHARE,
            ranged_share: RANGED_SHARE,
            boss_interval: BOSS_WAVE_INTERVAL,
            boss_health_multiplier: BOSS_HEALTH_MULTIPLIER,
            boss_damage_multiplier: BOSS_DAMAGE_MULTIPLIER,
            boss_gold_multiplier: BOSS_GOLD_MULTIPLIER,
            boss_scaling_factor: BOSS_SCALING_FACTOR,
            boss_speed_factor: BOSS_SPEED_FACTOR,
            boss_appearance_increment: BOSS_APPEARANCE_INCREMENT,
            boss_reference_value: BOSS_REFERENCE_VALUE,
            boss_warning_delay: BOSS_WARNING_DELAY,
            boss_spawn_delay: BOSS_SPAWN_DELAY,
            boss_min_contingent: BOSS_MIN_CONTINGENT,
        }
    }
}

/// Spawn ring geometry and stagger.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    pub radius: f64,
    pub delay_between_units: f64,
    pub probe_height: f64,
    pub probe_reach: f64,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            radius: SPAWN_RADIUS,
            delay_between_units: SPAWN_DELAY_BETWEEN_UNITS,
            probe_height: GROUND_PROBE_HEIGHT,
            probe_reach: GROUND_PROBE_REACH,
        }
    }
}

/// Economy and structure starting values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunTuning {
    pub starting_gold: f64,
    pub base_passive_gold_per_sec: f64,
    pub passive_gold_increase_per_wave: f64,
    pub tower_max_health: f64,
    pub max_weapons: usize,
    pub weapon_mount_radius: f64,
}

impl Default for RunTuning {
    fn default() -> Self {
        Self {
            starting_gold: STARTING_GOLD,
            base_passive_gold_per_sec: BASE_PASSIVE_GOLD_PER_SEC,
            passive_gold_increase_per_wave: PASSIVE_GOLD_INCREASE_PER_WAVE,
            tower_max_health: TOWER_MAX_HEALTH,
            max_weapons: MAX_WEAPONS,
            weapon_mount_radius: WEAPON_MOUNT_RADIUS,
        }
    }
}

/// Top-level simulation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for spawn placement.
    pub seed: u64,
    pub waves: WaveTuning,
    pub spawn: SpawnTuning,
    pub run: RunTuning,
    /// Weapon id equipped when a run starts, if any.
    pub starting_weapon: Option<String>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            waves: WaveTuning::default(),
            spawn: SpawnTuning::default(),
            run: RunTuning::default(),
            starting_weapon: Some("cannon".into()),
        }
    }
}

// --- Catalog ---

/// In-memory content catalog keyed by unit kind and string ids.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    pub units: BTreeMap<UnitKind, Arc<UnitTypeConfig>>,
    pub weapons: BTreeMap<String, Arc<WeaponConfig>>,
    pub upgrades: BTreeMap<String, Arc<UpgradeConfig>>,
}

impl Catalog {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Default content: five unit archetypes, four weapons and the six upgrades.
    pub fn standard() -> Self {
        let mut units = BTreeMap::new();
        units.insert(UnitKind::Basic, Arc::new(UnitTypeConfig::default()));
        units.insert(
            UnitKind::Fast,
            Arc::new(UnitTypeConfig {
                name: "Fast".into(),
                max_health: 12.0,
                move_speed: 8.0,
                contact_damage: 6.0,
                gold_value: 6.0,
                ..UnitTypeConfig::default()
            }),
        );
        units.insert(
            UnitKind::Tank,
            Arc::new(UnitTypeConfig {
                name: "Tank".into(),
                max_health: 60.0,
                move_speed: 3.0,
                contact_damage: 20.0,
                attack_cooldown: 1.5,
                gold_value: 12.0,
                hit_radius: 0.9,
                ..UnitTypeConfig::default()
            }),
        );
        units.insert(
            UnitKind::Ranged,
            Arc::new(UnitTypeConfig {
                name: "Ranged".into(),
                max_health: 15.0,
                move_speed: 4.0,
                contact_damage: 8.0,
                attack_range: 12.0,
                attack_cooldown: 2.0,
                gold_value: 8.0,
                stopping_distance: 10.0,
                ..UnitTypeConfig::default()
            }),
        );
        units.insert(
            UnitKind::Boss,
            Arc::new(UnitTypeConfig {
                name: "Boss".into(),
                max_health: 100.0,
                move_speed: 3.0,
                contact_damage: 15.0,
                attack_range: 3.5,
                attack_cooldown: 2.0,
                gold_value: 5.0,
                stopping_distance: 3.0,
                hit_radius: 1.5,
            }),
        );

        let mut weapons = BTreeMap::new();
        weapons.insert(
            "cannon".to_string(),
            Arc::new(WeaponConfig {
                name: "Cannon".into(),
                cost: 50.0,
                ..WeaponConfig::default()
            }),
        );
        weapons.insert(
            "mortar".to_string(),
            Arc::new(WeaponConfig {
                name: "Mortar".into(),
                damage: 15.0,
                fire_rate: 0.5,
                range: 20.0,
                projectile: Some(ProjectileParams::default()),
                area: Some(AreaParams { radius: 3.0 }),
                cost: 150.0,
                rarity: WeaponRarity::Uncommon,
                ..WeaponConfig::default()
            }),
        );
        weapons.insert(
            "railgun".to_string(),
            Arc::new(WeaponConfig {
                name: "Railgun".into(),
                damage: 25.0,
                fire_rate: 0.4,
                range: 25.0,
                pierce: Some(PierceParams::default()),
                cost: 250.0,
                rarity: WeaponRarity::Rare,
                allow_multiple: false,
                ..WeaponConfig::default()
            }),
        );
        weapons.insert(
            "tesla".to_string(),
            Arc::new(WeaponConfig {
                name: "Tesla Coil".into(),
                damage: 12.0,
                fire_rate: 0.8,
                range: 12.0,
                chain: Some(ChainParams::default()),
                cost: 300.0,
                rarity: WeaponRarity::Epic,
                allow_multiple: false,
                ..WeaponConfig::default()
            }),
        );

        let mut upgrades = BTreeMap::new();
        let entries = [
            ("max_health", UpgradeKind::MaxHealth, 25.0, 25.0, false, 75.0),
            ("regen", UpgradeKind::HealthRegeneration, 0.5, 0.5, false, 100.0),
            ("gold_gen", UpgradeKind::GoldGeneration, 1.0, 1.0, false, 120.0),
            ("damage", UpgradeKind::DamageMultiplier, 0.1, 0.1, true, 100.0),
            ("attack_speed", UpgradeKind::AttackSpeedMultiplier, 0.1, 0.1, true, 100.0),
            ("range", UpgradeKind::Range, 0.1, 0.05, true, 80.0),
        ];
        for (id, kind, effect, per_stack, pct, cost) in entries {
            upgrades.insert(
                id.to_string(),
                Arc::new(UpgradeConfig {
                    name: id.replace('_', " "),
                    kind,
                    effect,
                    effect_per_stack: per_stack,
                    is_percentage: pct,
                    base_cost: cost,
                    ..UpgradeConfig::default()
                }),
            );
        }

        Self {
            units,
            weapons,
            upgrades,
        }
    }
}

impl ConfigSource for Catalog {
    fn unit_type(&self, kind: UnitKind) -> Option<Arc<UnitTypeConfig>> {
        self.units.get(&kind).cloned()
    }

    fn weapon(&self, id: &str) -> Option<Arc<WeaponConfig>> {
        self.weapons.get(id).cloned()
    }

    fn upgrade(&self, id: &str) -> Option<Arc<UpgradeConfig>> {
        self.upgrades.get(id).cloned()
    }

    fn upgrade_ids(&self) -> Vec<String> {
        self.upgrades.keys().cloned().collect()
    }
}
