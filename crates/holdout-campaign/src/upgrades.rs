use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info};

use holdout_core::config::UpgradeConfig;
use holdout_core::enums::UpgradeKind;
use holdout_core::error::{ConfigKey, InvalidOperation, SimError};
use holdout_core::interfaces::{ConfigSource, Economy};
use holdout_core::types::CachedMultipliers;

/// One purchased upgrade and how many times it was bought.
#[derive(Debug, Clone)]
pub struct UpgradeLedgerEntry {
    pub config: Arc<UpgradeConfig>,
    pub stacks: u32,
}

/// Purchased-upgrade ledger plus the global effects derived from it.
///
/// The cached multipliers are never patched incrementally: every mutation
/// ends with [`recompute`](Self::recompute), which rebuilds them from the
/// ledger.
#[derive(Debug, Clone, Default)]
pub struct UpgradeEffectAggregator {
    /// Keyed by upgrade id; ordered so the fold is deterministic.
    ledger: BTreeMap<String, UpgradeLedgerEntry>,
    cached: CachedMultipliers,
    total_spent: f64,
}

impl UpgradeEffectAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn multipliers(&self) -> &CachedMultipliers {
        &self.cached
    }

    pub fn stack_count(&self, id: &str) -> u32 {
        self.ledger.get(id).map_or(0, |e| e.stacks)
    }

    pub fn has_upgrade(&self, id: &str) -> bool {
        self.stack_count(id) > 0
    }

    /// Total stacks bought across all upgrades.
    pub fn total_purchased(&self) -> u32 {
        self.ledger.values().map(|e| e.stacks).sum()
    }

    pub fn total_spent(&self) -> f64 {
        self.total_spent
    }

    /// Price of the next stack, or None if the upgrade is unknown or maxed.
    pub fn cost_for_next(&self, source: &dyn ConfigSource, id: &str) -> Option<f64> {
        let config = source.upgrade(id)?;
        let stacks = self.stack_count(id);
        if config.is_maxed(stacks) {
            return None;
        }
        Some(config.cost_at(stacks))
    }

    /// Ids that pass every gate at `wave`, ignoring affordability.
    pub fn available_upgrades(&self, source: &dyn ConfigSource, wave: u32) -> Vec<String> {
        source
            .upgrade_ids()
            .into_iter()
            .filter(|id| {
                source
                    .upgrade(id)
                    .is_some_and(|cfg| self.check_gates(id, &cfg, wave).is_ok())
            })
            .collect()
    }

    fn check_gates(&self, id: &str, config: &UpgradeConfig, wave: u32) -> Result<(), SimError> {
        if wave < config.required_wave {
            return Err(InvalidOperation::WaveLocked {
                id: id.to_string(),
                required_wave: config.required_wave,
            }
            .into());
        }
        if config.is_maxed(self.stack_count(id)) {
            return Err(InvalidOperation::UpgradeMaxed(id.to_string()).into());
        }
        if let Some(missing) = config.prerequisites.iter().find(|p| !self.has_upgrade(p)) {
            return Err(InvalidOperation::PrerequisiteMissing {
                id: id.to_string(),
                missing: missing.clone(),
            }
            .into());
        }
        Ok(())
    }

    /// Buy one stack of `id` at the given wave.
    ///
    /// Validates the wave gate, stack limit, prerequisites and funds before
    /// touching anything. Returns the new stack count.
    pub fn purchase(
        &mut self,
        source: &dyn ConfigSource,
        id: &str,
        wave: u32,
        economy: &mut dyn Economy,
    ) -> Result<u32, SimError> {
        let config = source
            .upgrade(id)
            .ok_or_else(|| ConfigKey::Upgrade(id.to_string()))?;
        self.check_gates(id, &config, wave)?;

        let cost = config.cost_at(self.stack_count(id));
        if !economy.spend(cost) {
            return Err(SimError::InsufficientFunds {
                cost,
                balance: economy.balance(),
            });
        }

        let entry = self
            .ledger
            .entry(id.to_string())
            .or_insert_with(|| UpgradeLedgerEntry {
                config: Arc::clone(&config),
                stacks: 0,
            });
        entry.stacks += 1;
        let stacks = entry.stacks;
        self.total_spent += cost;
        self.recompute();

        info!(upgrade = id, stacks, cost, "Upgrade purchased");
        Ok(stacks)
    }

    /// Rebuild the cached effects from the ledger.
    ///
    /// Percentage multipliers compound as `× (1 + effect)`; flat multipliers
    /// and the regen, gold and health bonuses add.
    pub fn recompute(&mut self) {
        let mut m = CachedMultipliers::IDENTITY;
        for entry in self.ledger.values().filter(|e| e.stacks > 0) {
            let cfg = &entry.config;
            let effect = cfg.total_effect(entry.stacks);
            let combine = |current: f64| {
                if cfg.is_percentage {
                    current * (1.0 + effect)
                } else {
                    current + effect
                }
            };
            match cfg.kind {
                UpgradeKind::DamageMultiplier => m.damage = combine(m.damage),
                UpgradeKind::AttackSpeedMultiplier => m.fire_rate = combine(m.fire_rate),
                UpgradeKind::Range => m.range = combine(m.range),
                UpgradeKind::HealthRegeneration => m.health_regen_per_sec += effect,
                UpgradeKind::GoldGeneration => m.gold_gen_per_sec += effect,
                UpgradeKind::MaxHealth => m.max_health_bonus += effect,
            }
        }
        self.cached = m;
        debug!(?m, "Upgrade effects recomputed");
    }

    /// Clear the ledger for a new game.
    pub fn reset(&mut self) {
        self.ledger.clear();
        self.total_spent = 0.0;
        self.recompute();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::economy::Treasury;
    use holdout_core::config::Catalog;

    fn catalog() -> Catalog {
        let mut c = Catalog::default();
        c.upgrades.insert(
            "damage".into(),
            Arc::new(UpgradeConfig {
                kind: UpgradeKind::DamageMultiplier,
                effect: 0.1,
                effect_per_stack: 0.1,
                is_percentage: true,
                base_cost: 100.0,
                max_stacks: 2,
                ..UpgradeConfig::default()
            }),
        );
        c.upgrades.insert(
            "flat_range".into(),
            Arc::new(UpgradeConfig {
                kind: UpgradeKind::Range,
                effect: 0.25,
                effect_per_stack: 0.25,
                base_cost: 10.0,
                ..UpgradeConfig::default()
            }),
        );
        c.upgrades.insert(
            "regen".into(),
            Arc::new(UpgradeConfig {
                kind: UpgradeKind::HealthRegeneration,
                effect: 1.0,
                effect_per_stack: 0.5,
                base_cost: 10.0,
                unlimited_stacks: true,
                max_stacks: 1,
                ..UpgradeConfig::default()
            }),
        );
        c.upgrades.insert(
            "fortress".into(),
            Arc::new(UpgradeConfig {
                kind: UpgradeKind::MaxHealth,
                effect: 50.0,
                base_cost: 10.0,
                required_wave: 5,
                prerequisites: vec!["regen".into()],
                ..UpgradeConfig::default()
            }),
        );
        c
    }

    #[test]
    fn purchase_debits_and_recomputes() {
        let cat = catalog();
        let mut agg = UpgradeEffectAggregator::new();
        let mut gold = Treasury::new(1000.0);

        assert_eq!(agg.purchase(&cat, "damage", 1, &mut gold), Ok(1));
        assert_eq!(gold.balance(), 900.0);
        assert!((agg.multipliers().damage - 1.1).abs() < 1e-12);

        // Second stack costs 150 and the effect grows to 0.2
        assert_eq!(agg.purchase(&cat, "damage", 1, &mut gold), Ok(2));
        assert_eq!(gold.balance(), 750.0);
        assert!((agg.multipliers().damage - 1.2).abs() < 1e-12);
        assert_eq!(agg.total_spent(), 250.0);
    }

    #[test]
    fn maxed_purchase_leaves_ledger_unchanged() {
        let cat = catalog();
        let mut agg = UpgradeEffectAggregator::new();
        let mut gold = Treasury::new(1000.0);
        agg.purchase(&cat, "damage", 1, &mut gold).unwrap();
        agg.purchase(&cat, "damage", 1, &mut gold).unwrap();
        let before = gold.balance();
        let cached = *agg.multipliers();

        let err = agg.purchase(&cat, "damage", 1, &mut gold).unwrap_err();
        assert_eq!(
            err,
            SimError::InvalidOperation(InvalidOperation::UpgradeMaxed("damage".into()))
        );
        assert_eq!(agg.stack_count("damage"), 2);
        assert_eq!(gold.balance(), before);
        assert_eq!(*agg.multipliers(), cached);
        assert_eq!(agg.cost_for_next(&cat, "damage"), None);
    }

    #[test]
    fn unaffordable_purchase_has_no_partial_debit() {
        let cat = catalog();
        let mut agg = UpgradeEffectAggregator::new();
        let mut gold = Treasury::new(50.0);
        let err = agg.purchase(&cat, "damage", 1, &mut gold).unwrap_err();
        assert!(matches!(err, SimError::InsufficientFunds { .. }));
        assert_eq!(gold.balance(), 50.0);
        assert!(!agg.has_upgrade("damage"));
    }

    #[test]
    fn wave_gate_and_prerequisites() {
        let cat = catalog();
        let mut agg = UpgradeEffectAggregator::new();
        let mut gold = Treasury::new(1000.0);

        let err = agg.purchase(&cat, "fortress", 3, &mut gold).unwrap_err();
        assert!(matches!(
            err,
            SimError::InvalidOperation(InvalidOperation::WaveLocked { required_wave: 5, .. })
        ));

        let err = agg.purchase(&cat, "fortress", 5, &mut gold).unwrap_err();
        assert!(matches!(
            err,
            SimError::InvalidOperation(InvalidOperation::PrerequisiteMissing { .. })
        ));

        agg.purchase(&cat, "regen", 5, &mut gold).unwrap();
        assert_eq!(agg.purchase(&cat, "fortress", 5, &mut gold), Ok(1));
        assert_eq!(agg.multipliers().max_health_bonus, 50.0);
    }

    #[test]
    fn unknown_upgrade_is_configuration_missing() {
        let cat = catalog();
        let mut agg = UpgradeEffectAggregator::new();
        let mut gold = Treasury::new(1000.0);
        let err = agg.purchase(&cat, "nope", 1, &mut gold).unwrap_err();
        assert_eq!(
            err,
            SimError::ConfigurationMissing(ConfigKey::Upgrade("nope".into()))
        );
    }

    #[test]
    fn flat_multipliers_add_and_bonuses_accumulate() {
        let cat = catalog();
        let mut agg = UpgradeEffectAggregator::new();
        let mut gold = Treasury::new(10_000.0);
        agg.purchase(&cat, "flat_range", 1, &mut gold).unwrap();
        agg.purchase(&cat, "flat_range", 1, &mut gold).unwrap();
        // 1.0 + (0.25 + 0.25)
        assert!((agg.multipliers().range - 1.5).abs() < 1e-12);

        for _ in 0..3 {
            agg.purchase(&cat, "regen", 1, &mut gold).unwrap();
        }
        // Unlimited stacks ignore max_stacks; 1.0 + 0.5 × 2
        assert_eq!(agg.stack_count("regen"), 3);
        assert!((agg.multipliers().health_regen_per_sec - 2.0).abs() < 1e-12);
    }

    #[test]
    fn recompute_is_idempotent() {
        let cat = catalog();
        let mut agg = UpgradeEffectAggregator::new();
        let mut gold = Treasury::new(10_000.0);
        agg.purchase(&cat, "damage", 1, &mut gold).unwrap();
        agg.purchase(&cat, "regen", 1, &mut gold).unwrap();
        agg.recompute();
        let first = *agg.multipliers();
        agg.recompute();
        assert_eq!(*agg.multipliers(), first);
    }

    #[test]
    fn reset_restores_identity() {
        let cat = catalog();
        let mut agg = UpgradeEffectAggregator::new();
        let mut gold = Treasury::new(10_000.0);
        agg.purchase(&cat, "damage", 1, &mut gold).unwrap();
        agg.reset();
        assert_eq!(*agg.multipliers(), CachedMultipliers::IDENTITY);
        assert_eq!(agg.total_purchased(), 0);
        assert_eq!(agg.total_spent(), 0.0);
    }

    #[test]
    fn available_upgrades_respects_gates() {
        let cat = catalog();
        let agg = UpgradeEffectAggregator::new();
        let at_wave_1 = agg.available_upgrades(&cat, 1);
        assert!(at_wave_1.contains(&"damage".to_string()));
        assert!(!at_wave_1.contains(&"fortress".to_string()));
        assert_eq!(agg.cost_for_next(&cat, "damage"), Some(100.0));
    }
}
