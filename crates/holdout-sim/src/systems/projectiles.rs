//! Projectile flight and contact.
//!
//! Projectiles move in a straight line. Each tick the swept segment is
//! tested against unit hit radii; contacts are resolved nearest-first while
//! the hit budget lasts. The contact that spends the last hit detonates any
//! area damage and destroys the projectile.

use hecs::{Entity, World};

use holdout_core::components::{ProjectileState, UnitProfile};
use holdout_core::constants::DT;
use holdout_core::events::SimEvent;
use holdout_core::types::{Position, Velocity};

use crate::systems::combat::{apply_damage, is_alive, position_of, resolve_area};
use crate::world_setup;

/// Advance every projectile one tick.
pub fn run(
    world: &mut World,
    live: &[Entity],
    now: f64,
    events: &mut Vec<SimEvent>,
    despawn_buffer: &mut Vec<Entity>,
) {
    let projectiles: Vec<(Entity, Position, Velocity)> = world
        .query::<(&ProjectileState, &Position, &Velocity)>()
        .iter()
        .map(|(e, (_, p, v))| (e, *p, *v))
        .collect();

    for (entity, pos, vel) in projectiles {
        let expired = world
            .get::<&ProjectileState>(entity)
            .map(|s| now - s.spawn_secs >= s.lifetime)
            .unwrap_or(true);
        if expired {
            despawn_buffer.push(entity);
            continue;
        }

        let next = Position::from_dvec3(pos.to_dvec3() + vel.to_dvec3() * DT);
        if resolve_contacts(world, entity, &pos, &next, live, events) {
            despawn_buffer.push(entity);
            continue;
        }
        if let Ok(mut p) = world.get::<&mut Position>(entity) {
            *p = next;
        }
    }
}

/// Apply hits along the segment `from → to`. Returns true when the
/// projectile is spent.
fn resolve_contacts(
    world: &mut World,
    projectile: Entity,
    from: &Position,
    to: &Position,
    live: &[Entity],
    events: &mut Vec<SimEvent>,
) -> bool {
    let Ok(state) = world.get::<&ProjectileState>(projectile).map(|s| (*s).clone()) else {
        return true;
    };
    let mut state = state;

    let contacts = swept_contacts(world, live, from, to, state.radius, &state.already_hit);
    let mut spent = false;
    for (unit, _) in contacts {
        if state.hits_remaining == 0 {
            break;
        }
        let impact = position_of(world, unit).unwrap_or(*to);
        if !apply_damage(world, unit, state.damage, events) {
            continue;
        }
        state.already_hit.push(world_setup::entity_id(unit));
        state.hits_remaining -= 1;

        if state.hits_remaining == 0 {
            if let Some(radius) = state.area_radius {
                let exclude: Vec<Entity> = state
                    .already_hit
                    .iter()
                    .filter_map(|&bits| Entity::from_bits(bits))
                    .collect();
                resolve_area(world, live, &impact, state.damage, radius, &exclude, events);
            }
            spent = true;
        }
    }

    if let Ok(mut s) = world.get::<&mut ProjectileState>(projectile) {
        *s = state;
    }
    spent
}

/// Live units whose hit radius the swept segment touches, nearest first.
fn swept_contacts(
    world: &World,
    live: &[Entity],
    from: &Position,
    to: &Position,
    projectile_radius: f64,
    already_hit: &[u64],
) -> Vec<(Entity, f64)> {
    let a = from.to_dvec3();
    let seg = to.to_dvec3() - a;
    let len_sq = seg.length_squared();

    let mut contacts = Vec::new();
    for &unit in live {
        if already_hit.contains(&world_setup::entity_id(unit)) || !is_alive(world, unit) {
            continue;
        }
        let (Some(pos), Ok(profile)) = (position_of(world, unit), world.get::<&UnitProfile>(unit))
        else {
            continue;
        };
        let p = pos.to_dvec3();
        let t = if len_sq > 0.0 {
            ((p - a).dot(seg) / len_sq).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let closest = a + seg * t;
        if closest.distance(p) <= projectile_radius + profile.config.hit_radius {
            contacts.push((unit, t));
        }
    }
    contacts.sort_by(|x, y| x.1.total_cmp(&y.1));
    contacts
}
