//! Units strike the defended structure once in range.
//!
//! Ranged units use the same rule with their longer attack range; the hit
//! lands instantly.

use hecs::World;
use tracing::debug;

use holdout_core::components::{AttackState, Hostile, UnitProfile, Vitals};
use holdout_core::events::SimEvent;
use holdout_core::interfaces::DefendedStructure;
use holdout_core::types::{Position, SpawnScaling};

/// Apply every due strike. Returns the total damage dealt this tick.
pub fn run(
    world: &mut World,
    structure: &mut dyn DefendedStructure,
    now: f64,
    events: &mut Vec<SimEvent>,
) -> f64 {
    if structure.is_destroyed() {
        return 0.0;
    }
    let target = structure.position();
    let mut dealt = 0.0;

    for (_entity, (_hostile, profile, scaling, vitals, pos, attack)) in world.query_mut::<(
        &Hostile,
        &UnitProfile,
        &SpawnScaling,
        &Vitals,
        &Position,
        &mut AttackState,
    )>() {
        if vitals.dead || pos.horizontal_range_to(&target) > profile.config.attack_range {
            continue;
        }
        let due = attack
            .last_attack_secs
            .map_or(true, |last| now - last >= profile.config.attack_cooldown);
        if !due {
            continue;
        }
        attack.last_attack_secs = Some(now);

        let amount = profile.config.contact_damage * scaling.damage;
        structure.take_damage(amount);
        dealt += amount;
        debug!(kind = ?profile.kind, amount, "Structure hit");
        events.push(SimEvent::StructureDamaged {
            amount,
            health: structure.health(),
        });
        if structure.is_destroyed() {
            break;
        }
    }
    dealt
}
