//! Core types and definitions for the HOLDOUT simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! components, configuration, commands, state snapshots, events, errors,
//! constants, and the collaborator traits the simulation is wired with.
//! It has no dependency on the ECS or any runtime framework.

pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod interfaces;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;
