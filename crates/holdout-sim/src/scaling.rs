//! Wave-number driven scaling: multipliers, enemy counts, intervals and
//! unit-type composition. Every function here is pure.

use std::collections::BTreeMap;

use holdout_core::config::{EnemyCountModel, WaveTuning};
use holdout_core::enums::UnitKind;
use holdout_core::types::SpawnScaling;

#[derive(Debug, Clone, Default)]
pub struct ScalingModel {
    tuning: WaveTuning,
}

impl ScalingModel {
    pub fn new(tuning: WaveTuning) -> Self {
        Self { tuning }
    }

    pub fn tuning(&self) -> &WaveTuning {
        &self.tuning
    }

    /// `1 + rate × (wave − 1)`; wave 0 is treated as wave 1.
    fn linear(rate: f64, wave: u32) -> f64 {
        1.0 + rate * f64::from(wave.saturating_sub(1))
    }

    /// Boss-only exponential term.
    fn boss_growth(&self, wave: u32) -> f64 {
        self.tuning
            .boss_scaling_factor
            .powf(f64::from(wave.saturating_sub(1)) * 0.1)
    }

    pub fn health_multiplier(&self, wave: u32, is_boss: bool) -> f64 {
        let t = &self.tuning;
        let mut m = Self::linear(t.health_rate, wave);
        if is_boss {
            m *= t.boss_health_multiplier * self.boss_growth(wave);
        }
        m.min(1.0 + t.max_health_scale)
    }

    pub fn damage_multiplier(&self, wave: u32, is_boss: bool) -> f64 {
        let t = &self.tuning;
        let mut m = Self::linear(t.damage_rate, wave);
        if is_boss {
            m *= t.boss_damage_multiplier * self.boss_growth(wave);
        }
        m.min(1.0 + t.max_damage_scale)
    }

    /// Bosses are slower, not faster: their case applies a fixed factor.
    pub fn speed_multiplier(&self, wave: u32, is_boss: bool) -> f64 {
        let t = &self.tuning;
        let mut m = Self::linear(t.speed_rate, wave);
        if is_boss {
            m *= t.boss_speed_factor;
        }
        m.min(1.0 + t.max_speed_scale)
    }

    pub fn gold_multiplier(&self, wave: u32, is_boss: bool) -> f64 {
        let t = &self.tuning;
        let mut m = Self::linear(t.gold_rate, wave);
        if is_boss {
            m *= t.boss_gold_multiplier;
        }
        m.min(1.0 + t.max_gold_scale)
    }

    /// All four multipliers for one spawn.
    pub fn spawn_scaling(&self, wave: u32, is_boss: bool) -> SpawnScaling {
        SpawnScaling {
            health: self.health_multiplier(wave, is_boss),
            damage: self.damage_multiplier(wave, is_boss),
            speed: self.speed_multiplier(wave, is_boss),
            gold: self.gold_multiplier(wave, is_boss),
        }
    }

    pub fn is_boss_wave(&self, wave: u32) -> bool {
        let interval = self.tuning.boss_interval;
        interval > 0 && wave > 0 && wave % interval == 0
    }

    /// 1 for the first boss wave, 2 for the second, and so on.
    pub fn boss_appearance_index(&self, wave: u32) -> Option<u32> {
        self.is_boss_wave(wave)
            .then(|| wave / self.tuning.boss_interval)
    }

    /// Extra health and gold factor for the n-th boss appearance.
    pub fn boss_appearance_factor(&self, appearance: u32) -> f64 {
        let t = &self.tuning;
        if t.boss_reference_value <= 0.0 {
            return 1.0;
        }
        1.0 + f64::from(appearance.saturating_sub(1)) * t.boss_appearance_increment
            / t.boss_reference_value
    }

    /// Regular contingent spawned ahead of a boss.
    pub fn boss_contingent(&self) -> u32 {
        self.tuning
            .boss_min_contingent
            .max(self.tuning.base_enemy_count / 2)
    }

    /// Units in a wave. Boss waves count only the boss.
    pub fn enemy_count(&self, wave: u32) -> u32 {
        if self.is_boss_wave(wave) {
            return 1;
        }
        let wave = wave.max(1);
        match &self.tuning.count_model {
            EnemyCountModel::Logarithmic { factor } => {
                let w = f64::from(wave);
                let extra = ((w + 1.0).ln() * factor * (w - 1.0)).floor().max(0.0);
                self.tuning.base_enemy_count + extra as u32
            }
            EnemyCountModel::Curve { points } => match evaluate_curve(points, f64::from(wave)) {
                Some(v) => v.floor().max(0.0) as u32,
                None => self.tuning.base_enemy_count,
            },
        }
    }

    pub fn wave_interval(&self, wave: u32) -> f64 {
        let t = &self.tuning;
        let reduced = t.base_interval - t.interval_reduction * f64::from(wave.saturating_sub(1));
        reduced.max(t.min_interval)
    }

    /// Basic always, then each kind from its unlock wave on.
    pub fn available_unit_kinds(&self, wave: u32) -> Vec<UnitKind> {
        let mut kinds = vec![UnitKind::Basic];
        kinds.extend(
            self.unlock_table()
                .into_iter()
                .filter(|&(_, unlock, _)| wave >= unlock)
                .map(|(kind, _, _)| kind),
        );
        kinds
    }

    /// Split `total` units across the unlocked kinds.
    ///
    /// Fast, tank and ranged each claim a fixed share of the total in that
    /// order, taken from a running basic remainder that never drops below 1.
    /// The counts always sum to `total`; an empty wave is all basic, zero.
    pub fn unit_type_distribution(&self, wave: u32, total: u32) -> BTreeMap<UnitKind, u32> {
        let mut out = BTreeMap::new();
        if total == 0 {
            out.insert(UnitKind::Basic, 0);
            return out;
        }
        let mut basic = total;
        for (kind, unlock, share) in self.unlock_table() {
            if wave < unlock {
                continue;
            }
            let wanted = (f64::from(total) * share).floor().max(0.0) as u32;
            let claim = wanted.min(basic - 1);
            if claim > 0 {
                out.insert(kind, claim);
                basic -= claim;
            }
        }
        out.insert(UnitKind::Basic, basic);
        out
    }

    fn unlock_table(&self) -> [(UnitKind, u32, f64); 3] {
        let t = &self.tuning;
        [
            (UnitKind::Fast, t.first_fast_wave, t.fast_share),
            (UnitKind::Tank, t.first_tank_wave, t.tank_share),
            (UnitKind::Ranged, t.first_ranged_wave, t.ranged_share),
        ]
    }
}

/// Piecewise-linear interpolation, clamped to the end points.
fn evaluate_curve(points: &[(f64, f64)], x: f64) -> Option<f64> {
    let first = points.first()?;
    let last = points.last()?;
    if x <= first.0 {
        return Some(first.1);
    }
    if x >= last.0 {
        return Some(last.1);
    }
    points.windows(2).find_map(|pair| {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        if x < x0 || x > x1 {
            return None;
        }
        if x1 <= x0 {
            return Some(y1);
        }
        Some(y0 + (y1 - y0) * (x - x0) / (x1 - x0))
    })
}
