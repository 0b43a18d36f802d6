//! Per-run statistics tracked by the engine.

use holdout_core::enums::UnitKind;
use holdout_core::state::RunStatsView;

#[derive(Debug, Clone, Default)]
pub struct RunStats {
    pub survival_secs: f64,
    pub waves_reached: u32,
    pub units_killed: u32,
    pub bosses_killed: u32,
    /// Sum of every gold gain, independent of spending.
    pub gold_earned: f64,
}

impl RunStats {
    pub fn record_kill(&mut self, kind: UnitKind) {
        self.units_killed += 1;
        if kind == UnitKind::Boss {
            self.bosses_killed += 1;
        }
    }

    pub fn record_gold(&mut self, amount: f64) {
        if amount > 0.0 {
            self.gold_earned += amount;
        }
    }

    pub fn view(&self) -> RunStatsView {
        RunStatsView {
            survival_secs: self.survival_secs,
            waves_reached: self.waves_reached,
            units_killed: self.units_killed,
            bosses_killed: self.bosses_killed,
            gold_earned: self.gold_earned,
        }
    }
}
