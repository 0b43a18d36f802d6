//! Cleanup system: removes dead units and spent projectiles.

use hecs::{Entity, World};

use holdout_core::components::{ProjectileState, Vitals};

/// Despawn dead units plus anything already queued in `despawn_buffer`.
pub fn run(world: &mut World, despawn_buffer: &mut Vec<Entity>) {
    for (entity, vitals) in world.query_mut::<&Vitals>() {
        if vitals.dead {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}

/// Remove every projectile in flight.
pub fn clear_projectiles(world: &mut World) {
    let projectiles: Vec<Entity> = world
        .query_mut::<&ProjectileState>()
        .into_iter()
        .map(|(e, _)| e)
        .collect();
    for entity in projectiles {
        let _ = world.despawn(entity);
    }
}
