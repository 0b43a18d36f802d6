//! Unit steering and kinematic integration.
//!
//! Units walk straight at the structure and halt at their stopping
//! distance. Position integrates from Velocity: position += velocity * dt.

use hecs::World;

use holdout_core::components::{Facing, Hostile, UnitProfile, Vitals};
use holdout_core::constants::DT;
use holdout_core::types::{Position, SpawnScaling, Velocity};

/// Steer every live unit toward `target` and integrate one tick.
pub fn run(world: &mut World, target: Position) {
    for (_entity, (_hostile, profile, scaling, vitals, pos, vel, facing)) in world.query_mut::<(
        &Hostile,
        &UnitProfile,
        &SpawnScaling,
        &Vitals,
        &mut Position,
        &mut Velocity,
        &mut Facing,
    )>() {
        if vitals.dead {
            *vel = Velocity::default();
            continue;
        }

        let goal = target.with_z(pos.z);
        let distance = pos.horizontal_range_to(&goal);
        let stop_at = profile.config.stopping_distance;
        if distance <= stop_at {
            *vel = Velocity::default();
        } else {
            let speed = profile.config.move_speed * scaling.speed;
            // Never step past the stopping distance.
            let capped = speed.min((distance - stop_at) / DT);
            *vel = Velocity::toward(pos, &goal, capped);
        }
        facing.yaw = pos.bearing_to(&goal);

        pos.x += vel.x * DT;
        pos.y += vel.y * DT;
        pos.z += vel.z * DT;
    }
}
