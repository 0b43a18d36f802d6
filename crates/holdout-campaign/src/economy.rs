use serde::{Deserialize, Serialize};

use holdout_core::config::RunTuning;
use holdout_core::interfaces::Economy;

/// In-memory gold store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Treasury {
    balance: f64,
}

impl Treasury {
    pub fn new(starting_gold: f64) -> Self {
        Self {
            balance: starting_gold.max(0.0),
        }
    }
}

impl Default for Treasury {
    fn default() -> Self {
        Self::new(RunTuning::default().starting_gold)
    }
}

impl Economy for Treasury {
    fn can_afford(&self, amount: f64) -> bool {
        self.balance >= amount
    }

    fn spend(&mut self, amount: f64) -> bool {
        if amount < 0.0 || !self.can_afford(amount) {
            return false;
        }
        self.balance -= amount;
        true
    }

    fn add(&mut self, amount: f64) {
        if amount > 0.0 {
            self.balance += amount;
        }
    }

    fn balance(&self) -> f64 {
        self.balance
    }

    fn reset(&mut self, balance: f64) {
        self.balance = balance.max(0.0);
    }
}

/// Gold paid out once per full second of play.
///
/// The rate grows by a fixed step on every wave start; the gold-generation
/// upgrade bonus is added on top at payout time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassiveIncome {
    base_rate: f64,
    increase_per_wave: f64,
    rate: f64,
    timer: f64,
}

impl PassiveIncome {
    pub fn new(base_rate: f64, increase_per_wave: f64) -> Self {
        Self {
            base_rate: base_rate.max(0.0),
            increase_per_wave: increase_per_wave.max(0.0),
            rate: base_rate.max(0.0),
            timer: 0.0,
        }
    }

    pub fn from_tuning(tuning: &RunTuning) -> Self {
        Self::new(
            tuning.base_passive_gold_per_sec,
            tuning.passive_gold_increase_per_wave,
        )
    }

    /// Gold per second before upgrade bonuses.
    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn on_wave_started(&mut self) {
        self.rate += self.increase_per_wave;
    }

    pub fn reset(&mut self) {
        self.rate = self.base_rate;
        self.timer = 0.0;
    }

    /// Advance by `dt` seconds. Returns the payout if a full second elapsed.
    pub fn advance(&mut self, dt: f64, bonus_per_sec: f64) -> Option<f64> {
        let per_sec = self.rate + bonus_per_sec;
        if per_sec <= 0.0 {
            return None;
        }
        self.timer += dt;
        if self.timer < 1.0 {
            return None;
        }
        let whole = self.timer.floor();
        self.timer -= whole;
        Some(per_sec * whole)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spend_rejects_without_partial_debit() {
        let mut t = Treasury::new(50.0);
        assert!(!t.spend(60.0));
        assert_eq!(t.balance(), 50.0);
        assert!(t.spend(20.0));
        assert_eq!(t.balance(), 30.0);
    }

    #[test]
    fn add_ignores_non_positive() {
        let mut t = Treasury::new(10.0);
        t.add(-5.0);
        t.add(0.0);
        assert_eq!(t.balance(), 10.0);
        t.add(2.5);
        assert_eq!(t.balance(), 12.5);
    }

    #[test]
    fn reset_replaces_balance() {
        let mut t = Treasury::new(10.0);
        t.add(90.0);
        t.reset(50.0);
        assert_eq!(t.balance(), 50.0);
        t.reset(-1.0);
        assert_eq!(t.balance(), 0.0);
    }

    #[test]
    fn passive_pays_each_full_second() {
        let mut p = PassiveIncome::new(1.0, 1.0);
        let dt = 1.0 / 30.0;
        let mut paid = 0.0;
        let mut payouts = 0;
        for _ in 0..90 {
            if let Some(g) = p.advance(dt, 0.0) {
                paid += g;
                payouts += 1;
            }
        }
        // 90 ticks at 30 Hz is three seconds, give or take float drift
        assert!((2..=3).contains(&payouts), "got {payouts} payouts");
        assert!((paid - payouts as f64).abs() < 1e-9);
    }

    #[test]
    fn passive_rate_grows_per_wave_and_resets() {
        let mut p = PassiveIncome::new(1.0, 1.0);
        p.on_wave_started();
        p.on_wave_started();
        assert_eq!(p.rate(), 3.0);
        assert_eq!(p.advance(1.0, 0.5), Some(3.5));
        p.reset();
        assert_eq!(p.rate(), 1.0);
    }

    #[test]
    fn passive_zero_rate_pays_nothing() {
        let mut p = PassiveIncome::new(0.0, 0.0);
        assert_eq!(p.advance(5.0, 0.0), None);
    }
}
