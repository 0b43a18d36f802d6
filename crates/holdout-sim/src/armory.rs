//! Equipped weapons and their mount layout around the structure.

use std::f64::consts::TAU;
use std::sync::Arc;

use hecs::Entity;
use tracing::info;

use holdout_core::config::{RunTuning, WeaponConfig};
use holdout_core::error::{InvalidOperation, SimError};
use holdout_core::types::{CachedMultipliers, Position};

/// One equipped weapon.
#[derive(Debug, Clone)]
pub struct WeaponInstance {
    pub weapon_id: String,
    config: Arc<WeaponConfig>,
    pub position: Position,
    /// Weak handle; revalidated against the world every tick.
    pub target: Option<Entity>,
    pub last_fire_secs: Option<f64>,
    pub damage_multiplier: f64,
    pub fire_rate_multiplier: f64,
    pub range_multiplier: f64,
}

impl WeaponInstance {
    pub fn new(weapon_id: impl Into<String>, config: Arc<WeaponConfig>, position: Position) -> Self {
        Self {
            weapon_id: weapon_id.into(),
            config,
            position,
            target: None,
            last_fire_secs: None,
            damage_multiplier: 1.0,
            fire_rate_multiplier: 1.0,
            range_multiplier: 1.0,
        }
    }

    pub fn config(&self) -> &WeaponConfig {
        &self.config
    }

    pub fn apply_damage_upgrade(&mut self, multiplier: f64) {
        self.damage_multiplier *= multiplier;
    }

    pub fn apply_fire_rate_upgrade(&mut self, multiplier: f64) {
        self.fire_rate_multiplier *= multiplier;
    }

    pub fn apply_range_upgrade(&mut self, multiplier: f64) {
        self.range_multiplier *= multiplier;
    }

    pub fn reset_upgrades(&mut self) {
        self.damage_multiplier = 1.0;
        self.fire_rate_multiplier = 1.0;
        self.range_multiplier = 1.0;
    }

    pub fn effective_damage(&self, global: &CachedMultipliers) -> f64 {
        self.config.damage * self.damage_multiplier * global.damage
    }

    pub fn effective_range(&self, global: &CachedMultipliers) -> f64 {
        self.config.range * self.range_multiplier * global.range
    }

    /// Seconds between shots after fire-rate multipliers.
    pub fn effective_cooldown(&self, global: &CachedMultipliers) -> f64 {
        let rate = (self.fire_rate_multiplier * global.fire_rate).max(f64::EPSILON);
        self.config.cooldown() / rate
    }

    pub fn is_ready(&self, now: f64, global: &CachedMultipliers) -> bool {
        self.last_fire_secs
            .map_or(true, |last| now >= last + self.effective_cooldown(global))
    }

    pub fn cooldown_remaining(&self, now: f64, global: &CachedMultipliers) -> f64 {
        self.last_fire_secs.map_or(0.0, |last| {
            (last + self.effective_cooldown(global) - now).max(0.0)
        })
    }
}

/// Weapon manager: slot capacity, stacking rules and mount layout.
#[derive(Debug, Clone)]
pub struct Armory {
    weapons: Vec<WeaponInstance>,
    max_weapons: usize,
    mount_radius: f64,
    center: Position,
}

impl Armory {
    pub fn new(center: Position, max_weapons: usize, mount_radius: f64) -> Self {
        Self {
            weapons: Vec::new(),
            max_weapons,
            mount_radius,
            center,
        }
    }

    pub fn from_tuning(center: Position, tuning: &RunTuning) -> Self {
        Self::new(center, tuning.max_weapons, tuning.weapon_mount_radius)
    }

    pub fn weapons(&self) -> &[WeaponInstance] {
        &self.weapons
    }

    pub fn weapons_mut(&mut self) -> &mut [WeaponInstance] {
        &mut self.weapons
    }

    pub fn len(&self) -> usize {
        self.weapons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weapons.is_empty()
    }

    pub fn has_weapon(&self, weapon_id: &str) -> bool {
        self.weapons.iter().any(|w| w.weapon_id == weapon_id)
    }

    /// Check slot capacity and the allow-multiple rule without changing anything.
    pub fn can_add(&self, weapon_id: &str, config: &WeaponConfig) -> Result<(), SimError> {
        if self.weapons.len() >= self.max_weapons {
            return Err(InvalidOperation::ArmoryFull(self.max_weapons).into());
        }
        if !config.allow_multiple && self.has_weapon(weapon_id) {
            return Err(InvalidOperation::NotStackable(weapon_id.to_string()).into());
        }
        Ok(())
    }

    /// Equip a weapon and return the slot it landed in.
    pub fn add_weapon(
        &mut self,
        weapon_id: &str,
        config: Arc<WeaponConfig>,
    ) -> Result<usize, SimError> {
        self.can_add(weapon_id, &config)?;
        self.weapons
            .push(WeaponInstance::new(weapon_id, config, self.center));
        self.arrange();
        info!(weapon = weapon_id, slots = self.weapons.len(), "Weapon equipped");
        Ok(self.weapons.len() - 1)
    }

    pub fn remove_weapon(&mut self, slot: usize) -> Result<WeaponInstance, SimError> {
        if slot >= self.weapons.len() {
            return Err(InvalidOperation::EmptySlot(slot).into());
        }
        let removed = self.weapons.remove(slot);
        self.arrange();
        Ok(removed)
    }

    /// Unequip everything.
    pub fn reset(&mut self) {
        self.weapons.clear();
    }

    /// Forget every target handle, e.g. after units were cleared.
    pub fn clear_targets(&mut self) {
        for w in &mut self.weapons {
            w.target = None;
        }
    }

    /// Spread weapons evenly on the mount circle. A single weapon sits at the centre.
    fn arrange(&mut self) {
        let n = self.weapons.len();
        if n == 1 {
            self.weapons[0].position = self.center;
            return;
        }
        for (i, w) in self.weapons.iter_mut().enumerate() {
            let angle = TAU * i as f64 / n as f64;
            w.position = Position::new(
                self.center.x + self.mount_radius * angle.sin(),
                self.center.y + self.mount_radius * angle.cos(),
                self.center.z,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cannon() -> Arc<WeaponConfig> {
        Arc::new(WeaponConfig::default())
    }

    fn unique() -> Arc<WeaponConfig> {
        Arc::new(WeaponConfig {
            allow_multiple: false,
            ..WeaponConfig::default()
        })
    }

    #[test]
    fn upgrades_multiply_and_reset() {
        let mut w = WeaponInstance::new("cannon", cannon(), Position::default());
        w.apply_damage_upgrade(1.5);
        w.apply_damage_upgrade(2.0);
        assert_eq!(w.damage_multiplier, 3.0);
        let global = CachedMultipliers {
            damage: 2.0,
            ..CachedMultipliers::IDENTITY
        };
        assert_eq!(w.effective_damage(&global), 60.0);
        w.reset_upgrades();
        assert_eq!(w.damage_multiplier, 1.0);
    }

    #[test]
    fn cooldown_scales_with_fire_rate() {
        let mut w = WeaponInstance::new("cannon", cannon(), Position::default());
        let global = CachedMultipliers::IDENTITY;
        assert!(w.is_ready(0.0, &global));
        w.last_fire_secs = Some(1.0);
        assert!(!w.is_ready(1.5, &global));
        assert!(w.is_ready(2.0, &global));
        w.apply_fire_rate_upgrade(2.0);
        assert!(w.is_ready(1.5, &global));
        assert!((w.cooldown_remaining(1.25, &global) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn armory_respects_capacity_and_stacking() {
        let mut armory = Armory::new(Position::default(), 2, 2.0);
        assert_eq!(armory.add_weapon("tesla", unique()), Ok(0));
        assert_eq!(
            armory.add_weapon("tesla", unique()),
            Err(SimError::InvalidOperation(InvalidOperation::NotStackable(
                "tesla".into()
            )))
        );
        assert_eq!(armory.add_weapon("cannon", cannon()), Ok(1));
        assert_eq!(
            armory.add_weapon("cannon", cannon()),
            Err(SimError::InvalidOperation(InvalidOperation::ArmoryFull(2)))
        );
    }

    #[test]
    fn slot_upgrades_stay_on_their_weapon() {
        let mut armory = Armory::new(Position::default(), 8, 2.0);
        armory.add_weapon("cannon", cannon()).unwrap();
        armory.weapons_mut()[0].apply_range_upgrade(1.5);
        armory.add_weapon("cannon", cannon()).unwrap();
        assert_eq!(armory.weapons()[0].range_multiplier, 1.5);
        assert_eq!(armory.weapons()[1].range_multiplier, 1.0);
        armory.remove_weapon(0).unwrap();
        assert_eq!(armory.weapons()[0].range_multiplier, 1.0);
        armory.reset();
        assert!(armory.is_empty());
    }

    #[test]
    fn weapons_arranged_on_circle() {
        let center = Position::new(10.0, 10.0, 1.0);
        let mut armory = Armory::new(center, 8, 2.0);
        armory.add_weapon("cannon", cannon()).unwrap();
        assert_eq!(armory.weapons()[0].position, center);
        for _ in 0..3 {
            armory.add_weapon("cannon", cannon()).unwrap();
        }
        for w in armory.weapons() {
            assert!((w.position.horizontal_range_to(&center) - 2.0).abs() < 1e-9);
        }
        let removed = armory.remove_weapon(1).unwrap();
        assert_eq!(removed.weapon_id, "cannon");
        assert_eq!(armory.len(), 3);
        assert!(armory.remove_weapon(5).is_err());
    }
}
