//! Events published by the simulation step.
//!
//! Systems push events into a per-tick buffer; the engine hands the buffer
//! out with the snapshot so presentation layers can react after mutation.

use serde::{Deserialize, Serialize};

use crate::enums::{GamePhase, UnitKind};
use crate::types::Position;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    WaveStarted {
        wave: u32,
    },
    WaveCompleted {
        wave: u32,
    },
    /// A boss wave is about to begin.
    BossIncoming {
        appearance: u32,
    },
    UnitSpawned {
        unit_id: u64,
        kind: UnitKind,
        position: Position,
    },
    UnitDied {
        unit_id: u64,
        kind: UnitKind,
        gold: f64,
    },
    /// Every unit of the current request has been created.
    SpawnSequenceComplete {
        spawned: u32,
    },
    UpgradePurchased {
        id: String,
        stacks: u32,
    },
    WeaponFired {
        slot: usize,
        weapon_id: String,
        target_id: u64,
    },
    TargetAcquired {
        slot: usize,
        target_id: u64,
    },
    WeaponAdded {
        slot: usize,
        weapon_id: String,
    },
    WeaponRemoved {
        slot: usize,
        weapon_id: String,
    },
    StructureDamaged {
        amount: f64,
        health: f64,
    },
    StructureDestroyed,
    GoldChanged {
        balance: f64,
    },
    GoldAdded {
        amount: f64,
    },
    CommandRejected {
        reason: String,
    },
    GamePhaseChanged {
        phase: GamePhase,
    },
}
