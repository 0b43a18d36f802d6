//! Combat resolver: per-weapon targeting and damage delivery.
//!
//! Each tick every weapon (1) gathers live units within its effective range,
//! (2) drops a target that died or left range, (3) acquires the nearest unit
//! if it has none, and (4) fires once its cooldown has elapsed. Delivery is
//! instant-hit (with optional pierce and area), projectile, or chain.
//!
//! Damage always goes through [`apply_damage`], which re-checks the death
//! flag before every individual application.

use hecs::{Entity, World};
use tracing::debug;

use holdout_core::components::{ProjectileState, UnitProfile, Vitals};
use holdout_core::config::{ChainParams, WeaponConfig};
use holdout_core::constants::PROJECTILE_RADIUS;
use holdout_core::enums::DeliveryMode;
use holdout_core::error::{InvalidOperation, SimError};
use holdout_core::events::SimEvent;
use holdout_core::types::{CachedMultipliers, Position, SpawnScaling};

use crate::armory::{Armory, WeaponInstance};
use crate::world_setup;

/// Run targeting and firing for every equipped weapon.
pub fn run(
    world: &mut World,
    armory: &mut Armory,
    live: &[Entity],
    global: &CachedMultipliers,
    now: f64,
    events: &mut Vec<SimEvent>,
) {
    for (slot, weapon) in armory.weapons_mut().iter_mut().enumerate() {
        let range = weapon.effective_range(global);
        let in_range = units_within(world, live, &weapon.position, range);

        // Stale or out-of-range target: forget it.
        if let Some(target) = weapon.target {
            if !in_range.iter().any(|&(e, _, _)| e == target) {
                weapon.target = None;
            }
        }

        if weapon.target.is_none() {
            if let Some((entity, _, _)) = nearest(&in_range) {
                weapon.target = Some(entity);
                events.push(SimEvent::TargetAcquired {
                    slot,
                    target_id: world_setup::entity_id(entity),
                });
            }
        }

        if weapon.target.is_some() && weapon.is_ready(now, global) {
            if let Err(err) = fire_weapon(world, weapon, slot, live, global, now, events) {
                debug!(slot, %err, "Weapon did not fire");
            }
        }
    }
}

/// Fire `weapon` at its current target.
///
/// Fails without side effects when the target is missing or dead, or the
/// weapon is still cooling down.
pub fn fire_weapon(
    world: &mut World,
    weapon: &mut WeaponInstance,
    slot: usize,
    live: &[Entity],
    global: &CachedMultipliers,
    now: f64,
    events: &mut Vec<SimEvent>,
) -> Result<(), SimError> {
    let target = weapon
        .target
        .filter(|&t| is_alive(world, t))
        .ok_or(InvalidOperation::NoTarget)?;
    if !weapon.is_ready(now, global) {
        return Err(InvalidOperation::OnCooldown.into());
    }
    let target_pos = position_of(world, target).ok_or(InvalidOperation::NoTarget)?;

    weapon.last_fire_secs = Some(now);
    events.push(SimEvent::WeaponFired {
        slot,
        weapon_id: weapon.weapon_id.clone(),
        target_id: world_setup::entity_id(target),
    });

    let damage = weapon.effective_damage(global);
    let range = weapon.effective_range(global);
    let config: &WeaponConfig = weapon.config();

    match config.delivery() {
        DeliveryMode::Chain => {
            let params = config.chain.unwrap_or_default();
            resolve_chain(world, live, target, damage, &params, events);
        }
        DeliveryMode::Projectile => {
            let params = config.projectile.unwrap_or_default();
            // The pierce limit counts every hit, the first included.
            let budget = config.pierce.map_or(1, |p| p.max_targets.max(1));
            let state = ProjectileState {
                slot,
                damage,
                radius: PROJECTILE_RADIUS,
                hits_remaining: budget,
                area_radius: config.area.map(|a| a.radius),
                already_hit: Vec::new(),
                spawn_secs: now,
                lifetime: params.lifetime,
            };
            world_setup::spawn_projectile(world, weapon.position, target_pos, params.speed, state);
        }
        DeliveryMode::InstantHit => {
            apply_damage(world, target, damage, events);
            if let Some(pierce) = config.pierce {
                resolve_pierce(
                    world,
                    live,
                    &weapon.position,
                    &target_pos,
                    range,
                    damage,
                    pierce.max_targets,
                    &[target],
                    events,
                );
            }
            if let Some(area) = config.area {
                resolve_area(world, live, &target_pos, damage, area.radius, &[target], events);
            }
        }
    }
    Ok(())
}

/// Apply `amount` to a unit unless it is already dead or gone.
///
/// Returns true if damage landed. Emits `UnitDied` exactly once, on the
/// application that takes health to zero.
pub fn apply_damage(
    world: &mut World,
    entity: Entity,
    amount: f64,
    events: &mut Vec<SimEvent>,
) -> bool {
    let Ok((vitals, profile, scaling)) =
        world.query_one_mut::<(&mut Vitals, &UnitProfile, &SpawnScaling)>(entity)
    else {
        return false;
    };
    if vitals.dead {
        return false;
    }
    vitals.health -= amount;
    if vitals.health <= 0.0 {
        vitals.health = 0.0;
        vitals.dead = true;
        let gold = profile.config.gold_value * scaling.gold;
        debug!(kind = ?profile.kind, gold, "Unit destroyed");
        events.push(SimEvent::UnitDied {
            unit_id: world_setup::entity_id(entity),
            kind: profile.kind,
            gold,
        });
    }
    true
}

/// Chain: full damage to the primary, then hop to the nearest unhit unit
/// within `chain.range` of the last unit hit, compounding the falloff each
/// hop. Returns `(unit, damage)` for every hit in order.
pub fn resolve_chain(
    world: &mut World,
    live: &[Entity],
    primary: Entity,
    damage: f64,
    chain: &ChainParams,
    events: &mut Vec<SimEvent>,
) -> Vec<(Entity, f64)> {
    let mut hits = Vec::new();
    let Some(mut last_pos) = position_of(world, primary) else {
        return hits;
    };
    if chain.targets == 0 || !apply_damage(world, primary, damage, events) {
        return hits;
    }
    hits.push((primary, damage));

    let mut running = damage;
    while hits.len() < chain.targets as usize {
        let candidates: Vec<_> = units_within(world, live, &last_pos, chain.range)
            .into_iter()
            .filter(|(e, _, _)| !hits.iter().any(|(h, _)| h == e))
            .collect();
        let Some((next, next_pos, _)) = nearest(&candidates) else {
            break;
        };
        running *= chain.falloff;
        if !apply_damage(world, next, running, events) {
            break;
        }
        hits.push((next, running));
        last_pos = next_pos;
    }
    hits
}

/// Pierce: damage up to `max_targets` additional units whose hit radius
/// crosses the ray from `origin` through `through`, out to `max_range`.
/// Units are taken in order of distance along the ray.
#[allow(clippy::too_many_arguments)]
pub fn resolve_pierce(
    world: &mut World,
    live: &[Entity],
    origin: &Position,
    through: &Position,
    max_range: f64,
    damage: f64,
    max_targets: u32,
    exclude: &[Entity],
    events: &mut Vec<SimEvent>,
) -> Vec<Entity> {
    let start = origin.to_dvec3();
    let dir = (through.to_dvec3() - start).normalize_or_zero();
    if dir == glam::DVec3::ZERO || max_targets == 0 {
        return Vec::new();
    }

    let mut crossing: Vec<(Entity, f64)> = Vec::new();
    for &entity in live {
        if exclude.contains(&entity) || !is_alive(world, entity) {
            continue;
        }
        let (Some(pos), Some(radius)) = (position_of(world, entity), hit_radius(world, entity))
        else {
            continue;
        };
        let rel = pos.to_dvec3() - start;
        let along = rel.dot(dir);
        if along <= 0.0 || along > max_range {
            continue;
        }
        let off_axis = (rel - dir * along).length();
        if off_axis <= radius {
            crossing.push((entity, along));
        }
    }
    crossing.sort_by(|a, b| a.1.total_cmp(&b.1));

    let mut hit = Vec::new();
    for (entity, _) in crossing {
        if hit.len() >= max_targets as usize {
            break;
        }
        if apply_damage(world, entity, damage, events) {
            hit.push(entity);
        }
    }
    hit
}

/// Area: `damage × clamp01(1 − d / radius)` to every unit within `radius`
/// of `center`, skipping `exclude`. Returns `(unit, damage)` per hit.
pub fn resolve_area(
    world: &mut World,
    live: &[Entity],
    center: &Position,
    damage: f64,
    radius: f64,
    exclude: &[Entity],
    events: &mut Vec<SimEvent>,
) -> Vec<(Entity, f64)> {
    let mut hits = Vec::new();
    if radius <= 0.0 {
        return hits;
    }
    for (entity, _, distance) in units_within(world, live, center, radius) {
        if exclude.contains(&entity) {
            continue;
        }
        let falloff = (1.0 - distance / radius).clamp(0.0, 1.0);
        let amount = damage * falloff;
        if amount > 0.0 && apply_damage(world, entity, amount, events) {
            hits.push((entity, amount));
        }
    }
    hits
}

// --- Queries ---

/// Live units within `range` of `from`, in live-set order, with distances.
pub fn units_within(
    world: &World,
    live: &[Entity],
    from: &Position,
    range: f64,
) -> Vec<(Entity, Position, f64)> {
    live.iter()
        .filter_map(|&e| {
            if !is_alive(world, e) {
                return None;
            }
            let pos = position_of(world, e)?;
            let d = from.range_to(&pos);
            (d <= range).then_some((e, pos, d))
        })
        .collect()
}

/// First entry at the minimum distance.
fn nearest(candidates: &[(Entity, Position, f64)]) -> Option<(Entity, Position, f64)> {
    let mut best: Option<(Entity, Position, f64)> = None;
    for &c in candidates {
        if best.map_or(true, |b| c.2 < b.2) {
            best = Some(c);
        }
    }
    best
}

pub fn is_alive(world: &World, entity: Entity) -> bool {
    world
        .get::<&Vitals>(entity)
        .map(|v| !v.dead)
        .unwrap_or(false)
}

pub fn position_of(world: &World, entity: Entity) -> Option<Position> {
    world.get::<&Position>(entity).ok().map(|p| *p)
}

fn hit_radius(world: &World, entity: Entity) -> Option<f64> {
    world
        .get::<&UnitProfile>(entity)
        .ok()
        .map(|p| p.config.hit_radius)
}
