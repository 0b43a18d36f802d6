#[cfg(test)]
mod tests {
    use crate::commands::PlayerCommand;
    use crate::config::*;
    use crate::enums::*;
    use crate::error::{InvalidOperation, SimError};
    use crate::events::SimEvent;
    use crate::interfaces::ConfigSource;
    use crate::state::GameStateSnapshot;
    use crate::types::{CachedMultipliers, Position, SimTime, SpawnScaling, Velocity};

    // ---- Serde ----

    #[test]
    fn test_unit_kind_serde() {
        for v in [
            UnitKind::Basic,
            UnitKind::Fast,
            UnitKind::Tank,
            UnitKind::Ranged,
            UnitKind::Boss,
        ] {
            let json = serde_json::to_string(&v).unwrap();
            let back: UnitKind = serde_json::from_str(&json).unwrap();
            assert_eq!(v, back);
        }
    }

    #[test]
    fn test_command_serde() {
        let cmd = PlayerCommand::PurchaseUpgrade {
            id: "damage".into(),
        };
        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains("\"type\":\"PurchaseUpgrade\""));
        let back: PlayerCommand = serde_json::from_str(&json).unwrap();
        assert_eq!(cmd, back);
    }

    #[test]
    fn test_event_tagged() {
        let event = SimEvent::UnitDied {
            unit_id: 7,
            kind: UnitKind::Tank,
            gold: 12.5,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"UnitDied\""));
        let back: SimEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, back);
    }

    #[test]
    fn test_snapshot_default_serializes() {
        let snap = GameStateSnapshot::default();
        let json = serde_json::to_string(&snap).unwrap();
        let back: GameStateSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.phase, GamePhase::MainMenu);
        assert_eq!(back.multipliers, CachedMultipliers::IDENTITY);
    }

    // ---- Geometry ----

    #[test]
    fn test_position_range() {
        let a = Position::new(0.0, 0.0, 0.0);
        let b = Position::new(3.0, 4.0, 12.0);
        assert!((a.range_to(&b) - 13.0).abs() < 1e-9);
        assert!((a.horizontal_range_to(&b) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_bearing_north_and_east() {
        let origin = Position::default();
        let north = Position::new(0.0, 10.0, 0.0);
        let east = Position::new(10.0, 0.0, 0.0);
        assert!(origin.bearing_to(&north).abs() < 1e-9);
        assert!((origin.bearing_to(&east) - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn test_velocity_toward() {
        let v = Velocity::toward(
            &Position::new(0.0, 0.0, 0.0),
            &Position::new(10.0, 0.0, 0.0),
            4.0,
        );
        assert!((v.speed() - 4.0).abs() < 1e-9);
        assert!((v.x - 4.0).abs() < 1e-9);

        let same = Position::new(1.0, 1.0, 1.0);
        assert_eq!(Velocity::toward(&same, &same, 4.0).speed(), 0.0);
    }

    #[test]
    fn test_sim_time_advance() {
        let mut t = SimTime::default();
        for _ in 0..30 {
            t.advance();
        }
        assert_eq!(t.tick, 30);
        assert!((t.elapsed_secs - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_identity_defaults() {
        assert_eq!(SpawnScaling::default(), SpawnScaling::IDENTITY);
        assert_eq!(CachedMultipliers::default().damage, 1.0);
        assert_eq!(CachedMultipliers::default().max_health_bonus, 0.0);
    }

    // ---- Config ----

    #[test]
    fn test_weapon_cooldown_clamps_fire_rate() {
        let slow = WeaponConfig {
            fire_rate: 0.0,
            ..WeaponConfig::default()
        };
        assert!((slow.cooldown() - 10.0).abs() < 1e-9);
        assert!((WeaponConfig::default().cooldown() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_delivery_priority() {
        let mut w = WeaponConfig::default();
        assert_eq!(w.delivery(), DeliveryMode::InstantHit);
        w.projectile = Some(ProjectileParams::default());
        assert_eq!(w.delivery(), DeliveryMode::Projectile);
        w.chain = Some(ChainParams::default());
        assert_eq!(w.delivery(), DeliveryMode::Chain);
    }

    #[test]
    fn test_upgrade_effect_and_cost() {
        let up = UpgradeConfig {
            effect: 0.1,
            effect_per_stack: 0.05,
            base_cost: 100.0,
            cost_multiplier: 1.5,
            ..UpgradeConfig::default()
        };
        assert_eq!(up.total_effect(0), 0.0);
        assert!((up.total_effect(1) - 0.1).abs() < 1e-12);
        assert!((up.total_effect(3) - 0.2).abs() < 1e-12);
        assert_eq!(up.cost_at(0), 100.0);
        assert_eq!(up.cost_at(1), 150.0);
        assert_eq!(up.cost_at(2), 225.0);
        assert_eq!(up.cost_at(3), 338.0);
    }

    #[test]
    fn test_upgrade_maxed() {
        let capped = UpgradeConfig {
            max_stacks: 2,
            ..UpgradeConfig::default()
        };
        assert!(!capped.is_maxed(1));
        assert!(capped.is_maxed(2));
        let unlimited = UpgradeConfig {
            max_stacks: 2,
            unlimited_stacks: true,
            ..UpgradeConfig::default()
        };
        assert!(!unlimited.is_maxed(50));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{ "units": { "Basic": { "max_health": 40.0 } } }"#;
        let catalog = Catalog::from_json(json).unwrap();
        let basic = catalog.unit_type(UnitKind::Basic).unwrap();
        assert_eq!(basic.max_health, 40.0);
        assert_eq!(basic.move_speed, 5.0);
        assert!(catalog.unit_type(UnitKind::Boss).is_none());
    }

    #[test]
    fn test_wave_tuning_curve_json() {
        let json = r#"{ "count_model": { "mode": "Curve", "points": [[1.0, 5.0], [30.0, 50.0]] } }"#;
        let tuning: WaveTuning = serde_json::from_str(json).unwrap();
        assert_eq!(
            tuning.count_model,
            EnemyCountModel::Curve {
                points: vec![(1.0, 5.0), (30.0, 50.0)]
            }
        );
        assert_eq!(tuning.boss_interval, 10);
    }

    #[test]
    fn test_standard_catalog_complete() {
        let catalog = Catalog::standard();
        for kind in UnitKind::REGULAR {
            assert!(catalog.unit_type(kind).is_some());
        }
        assert!(catalog.unit_type(UnitKind::Boss).is_some());
        assert!(catalog.weapon("cannon").is_some());
        assert_eq!(catalog.upgrade_ids().len(), 6);
    }

    // ---- Errors ----

    #[test]
    fn test_error_messages() {
        let err: SimError = InvalidOperation::UpgradeMaxed("regen".into()).into();
        assert_eq!(
            err.to_string(),
            "invalid operation: upgrade 'regen' is at max stacks"
        );
        let funds = SimError::InsufficientFunds {
            cost: 100.0,
            balance: 40.0,
        };
        assert!(funds.to_string().contains("need 100"));
    }
}
