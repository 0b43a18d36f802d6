//! Player commands queued into the simulation.

use serde::{Deserialize, Serialize};

/// Commands are applied at the start of the next tick, in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    /// Begin a fresh run from the main menu or game-over screen.
    StartGame,
    Pause,
    Resume,
    /// Start the next wave now instead of waiting for the idle timer.
    ForceNextWave,
    /// Stop wave progression; live units remain.
    StopWaves,
    PurchaseUpgrade { id: String },
    BuyWeapon { id: String },
    RemoveWeapon { slot: usize },
    ReturnToMenu,
}
