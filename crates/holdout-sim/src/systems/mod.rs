//! ECS systems that operate on the simulation world each tick.
//!
//! Stateless systems are free functions taking `&mut World`. The wave
//! scheduler and spawn coordinator are small resumable records owned by the
//! engine and advanced once per tick; entity state still lives in components.

pub mod cleanup;
pub mod combat;
pub mod movement;
pub mod projectiles;
pub mod snapshot;
pub mod spawn_coordinator;
pub mod unit_attack;
pub mod wave_scheduler;
