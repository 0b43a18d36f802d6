//! Entity spawn factories.
//!
//! Creates hostile units and projectiles with their component bundles.

use std::sync::Arc;

use hecs::{Entity, World};

use holdout_core::components::*;
use holdout_core::config::UnitTypeConfig;
use holdout_core::enums::UnitKind;
use holdout_core::types::{Position, SpawnScaling, Velocity};

/// Spawn a hostile unit at `position`, facing `face_toward`.
///
/// Health is the archetype's max health scaled by `scaling.health`; the
/// scaling itself is stored on the entity and never changes afterwards.
pub fn spawn_unit(
    world: &mut World,
    kind: UnitKind,
    config: Arc<UnitTypeConfig>,
    position: Position,
    face_toward: Position,
    scaling: SpawnScaling,
) -> Entity {
    let max_health = config.max_health * scaling.health;
    let facing = Facing {
        yaw: position.bearing_to(&face_toward),
    };
    let entity = world.spawn((
        Hostile,
        UnitProfile { kind, config },
        position,
        Velocity::default(),
        facing,
        Vitals {
            health: max_health,
            max_health,
            dead: false,
        },
        AttackState::default(),
        scaling,
    ));
    if kind == UnitKind::Boss {
        let _ = world.insert_one(entity, Boss);
    }
    entity
}

/// Spawn a projectile at `origin` flying toward `aim_point` (not led).
pub fn spawn_projectile(
    world: &mut World,
    origin: Position,
    aim_point: Position,
    speed: f64,
    state: ProjectileState,
) -> Entity {
    let velocity = Velocity::toward(&origin, &aim_point, speed);
    world.spawn((origin, velocity, state))
}

/// Stable external id of an entity, as carried by events and snapshots.
pub fn entity_id(entity: Entity) -> u64 {
    entity.to_bits().get()
}
