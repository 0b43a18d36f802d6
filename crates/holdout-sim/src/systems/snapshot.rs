//! Snapshot system: reads the world and engine state into a
//! `GameStateSnapshot`. Never modifies anything.

use hecs::World;

use holdout_core::components::*;
use holdout_core::enums::GamePhase;
use holdout_core::events::SimEvent;
use holdout_core::interfaces::DefendedStructure;
use holdout_core::state::*;
use holdout_core::types::{CachedMultipliers, Position, SimTime};

use crate::armory::Armory;
use crate::stats::RunStats;
use crate::world_setup;

/// Build a complete snapshot from the current world and engine state.
#[allow(clippy::too_many_arguments)]
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    phase: GamePhase,
    wave: WaveView,
    armory: &Armory,
    structure: &dyn DefendedStructure,
    gold: f64,
    passive_gold_per_sec: f64,
    multipliers: CachedMultipliers,
    stats: &RunStats,
    events: Vec<SimEvent>,
) -> GameStateSnapshot {
    GameStateSnapshot {
        time: *time,
        phase,
        wave,
        units: build_units(world),
        weapons: build_weapons(armory, &multipliers, time.elapsed_secs),
        projectiles: build_projectiles(world),
        tower: TowerView {
            position: structure.position(),
            health: structure.health(),
            max_health: structure.max_health(),
            destroyed: structure.is_destroyed(),
        },
        gold,
        passive_gold_per_sec,
        multipliers,
        stats: stats.view(),
        events,
    }
}

/// Living units, ordered by id.
fn build_units(world: &World) -> Vec<UnitView> {
    let mut units: Vec<UnitView> = world
        .query::<(&Hostile, &UnitProfile, &Position, &Vitals)>()
        .iter()
        .filter(|(_, (_, _, _, vitals))| !vitals.dead)
        .map(|(entity, (_, profile, pos, vitals))| UnitView {
            id: world_setup::entity_id(entity),
            kind: profile.kind,
            position: *pos,
            health: vitals.health,
            max_health: vitals.max_health,
            is_boss: world.get::<&Boss>(entity).is_ok(),
        })
        .collect();
    units.sort_by_key(|u| u.id);
    units
}

fn build_weapons(armory: &Armory, global: &CachedMultipliers, now: f64) -> Vec<WeaponView> {
    armory
        .weapons()
        .iter()
        .enumerate()
        .map(|(slot, w)| WeaponView {
            slot,
            weapon_id: w.weapon_id.clone(),
            position: w.position,
            target_id: w.target.map(world_setup::entity_id),
            range: w.effective_range(global),
            cooldown_remaining: w.cooldown_remaining(now, global),
        })
        .collect()
}

fn build_projectiles(world: &World) -> Vec<ProjectileView> {
    let mut projectiles: Vec<ProjectileView> = world
        .query::<(&ProjectileState, &Position)>()
        .iter()
        .map(|(entity, (state, pos))| ProjectileView {
            id: world_setup::entity_id(entity),
            slot: state.slot,
            position: *pos,
        })
        .collect();
    projectiles.sort_by_key(|p| p.id);
    projectiles
}
