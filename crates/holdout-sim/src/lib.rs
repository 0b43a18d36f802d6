//! Simulation engine for HOLDOUT.
//!
//! Owns the hecs ECS world, runs the wave, spawn and combat systems at a
//! fixed tick rate, and produces GameStateSnapshots after every tick.

pub mod armory;
pub mod engine;
pub mod scaling;
pub mod stats;
pub mod systems;
pub mod tower;
pub mod world_setup;

pub use holdout_core as core;
pub use engine::SimulationEngine;
