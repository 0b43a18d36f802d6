//! Wave scheduler: decides when waves start, what they contain, and when
//! they are cleared.
//!
//! Idle → Spawning → WaitingForClear → Completed → Idle. Boss waves run two
//! extra timed stages inside `Spawning`: a warning grace period before the
//! regular contingent, then an interlude before the boss itself.

use tracing::{info, warn};

use holdout_core::enums::{UnitKind, WavePhase};
use holdout_core::error::{ConfigKey, InvalidOperation, SimError};
use holdout_core::events::SimEvent;

use crate::scaling::ScalingModel;
use crate::systems::spawn_coordinator::{SpawnContext, SpawnCoordinator};
use crate::world_setup;

/// Timed stages of a boss wave.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BossStage {
    /// Boss-incoming announced; regular contingent not yet requested.
    Warning { elapsed: f64 },
    /// Contingent requested; boss not yet spawned.
    Interlude { elapsed: f64 },
}

#[derive(Debug, Clone, Copy)]
struct BossEncounter {
    stage: BossStage,
    appearance: u32,
}

#[derive(Debug, Clone, Default)]
pub struct WaveScheduler {
    wave: u32,
    phase: WavePhase,
    idle_timer: f64,
    running: bool,
    force_next: bool,
    boss: Option<BossEncounter>,
}

impl WaveScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wave(&self) -> u32 {
        self.wave
    }

    pub fn phase(&self) -> WavePhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn boss_stage(&self) -> Option<BossStage> {
        self.boss.map(|b| b.stage)
    }

    /// Start from wave 0. The first wave arrives a short lead-in before
    /// the full interval would elapse.
    pub fn start(&mut self, scaling: &ScalingModel) {
        let t = scaling.tuning();
        *self = Self {
            running: true,
            idle_timer: (scaling.wave_interval(1) - t.first_wave_lead_in).max(0.0),
            ..Self::default()
        };
        info!("Wave system started");
    }

    /// Interrupt at the tick boundary. Wave number and live units are kept.
    pub fn stop(&mut self, coordinator: &mut SpawnCoordinator) {
        self.running = false;
        self.force_next = false;
        self.phase = WavePhase::Idle;
        self.boss = None;
        coordinator.stop_sequence();
    }

    /// Stop, clear every unit, and return to wave 0.
    pub fn reset(&mut self, coordinator: &mut SpawnCoordinator, world: &mut hecs::World) {
        self.stop(coordinator);
        coordinator.clear(world);
        self.wave = 0;
        self.idle_timer = 0.0;
    }

    /// Start the next wave on the following advance instead of waiting.
    pub fn force_next_wave(&mut self) -> Result<(), SimError> {
        if !self.running {
            return Err(InvalidOperation::WrongPhase("waves are stopped").into());
        }
        if self.phase != WavePhase::Idle {
            return Err(InvalidOperation::WrongPhase("a wave is in progress").into());
        }
        self.force_next = true;
        Ok(())
    }

    /// Seconds until the next wave starts. Zero outside `Idle`.
    pub fn time_to_next_wave(&self, scaling: &ScalingModel) -> f64 {
        if !self.running || self.phase != WavePhase::Idle {
            return 0.0;
        }
        (scaling.wave_interval(self.wave + 1) - self.idle_timer).max(0.0)
    }

    /// Advance timers and stages by `dt`. Returns the wave number when a
    /// wave starts during this step.
    pub fn advance(
        &mut self,
        dt: f64,
        scaling: &ScalingModel,
        coordinator: &mut SpawnCoordinator,
        ctx: &mut SpawnContext<'_>,
    ) -> Option<u32> {
        if !self.running {
            return None;
        }
        match self.phase {
            WavePhase::Idle => {
                self.idle_timer += dt;
                let due = self.idle_timer >= scaling.wave_interval(self.wave + 1);
                if due || self.force_next {
                    self.force_next = false;
                    return self.begin_wave(scaling, coordinator, ctx);
                }
                None
            }
            WavePhase::Spawning => {
                self.advance_boss(dt, scaling, coordinator, ctx);
                if self.boss.is_none() && !coordinator.is_spawning() {
                    self.phase = WavePhase::WaitingForClear;
                }
                None
            }
            WavePhase::WaitingForClear | WavePhase::Completed => None,
        }
    }

    /// WaitingForClear → Completed → Idle once the live set is empty.
    /// Runs after combat so this tick's deaths are already pruned.
    pub fn poll_clear(
        &mut self,
        coordinator: &SpawnCoordinator,
        events: &mut Vec<SimEvent>,
    ) -> Option<u32> {
        if self.phase != WavePhase::WaitingForClear || coordinator.live_count() > 0 {
            return None;
        }
        self.phase = WavePhase::Completed;
        info!(wave = self.wave, "Wave completed");
        events.push(SimEvent::WaveCompleted { wave: self.wave });
        self.phase = WavePhase::Idle;
        self.idle_timer = 0.0;
        Some(self.wave)
    }

    fn begin_wave(
        &mut self,
        scaling: &ScalingModel,
        coordinator: &mut SpawnCoordinator,
        ctx: &mut SpawnContext<'_>,
    ) -> Option<u32> {
        let next = self.wave + 1;
        let started = if scaling.is_boss_wave(next) {
            self.begin_boss_wave(next, scaling, coordinator, ctx)
        } else {
            let total = scaling.enemy_count(next);
            let distribution = scaling.unit_type_distribution(next, total);
            coordinator.request_wave(
                total,
                &distribution,
                scaling.spawn_scaling(next, false),
                ctx.configs,
            )
        };

        self.idle_timer = 0.0;
        if let Err(err) = started {
            warn!(wave = next, %err, "Wave aborted");
            return None;
        }

        self.wave = next;
        self.phase = WavePhase::Spawning;
        info!(wave = next, boss = self.boss.is_some(), "Wave started");
        ctx.events.push(SimEvent::WaveStarted { wave: next });
        if let Some(boss) = self.boss {
            info!(appearance = boss.appearance, "Boss incoming");
            ctx.events.push(SimEvent::BossIncoming {
                appearance: boss.appearance,
            });
        }
        Some(next)
    }

    /// Validate everything a boss wave will need, then arm the encounter.
    fn begin_boss_wave(
        &mut self,
        wave: u32,
        scaling: &ScalingModel,
        coordinator: &SpawnCoordinator,
        ctx: &SpawnContext<'_>,
    ) -> Result<(), SimError> {
        if coordinator.is_spawning() {
            return Err(InvalidOperation::SpawnBusy.into());
        }
        let contingent = scaling.boss_contingent();
        let kinds = scaling.unit_type_distribution(wave, contingent);
        for kind in kinds.keys().copied().chain([UnitKind::Boss]) {
            ctx.configs
                .unit_type(kind)
                .ok_or(ConfigKey::Unit(kind))?;
        }
        self.boss = Some(BossEncounter {
            stage: BossStage::Warning { elapsed: 0.0 },
            appearance: scaling.boss_appearance_index(wave).unwrap_or(1),
        });
        Ok(())
    }

    fn advance_boss(
        &mut self,
        dt: f64,
        scaling: &ScalingModel,
        coordinator: &mut SpawnCoordinator,
        ctx: &mut SpawnContext<'_>,
    ) {
        let Some(mut boss) = self.boss else {
            return;
        };
        let t = scaling.tuning();
        match &mut boss.stage {
            BossStage::Warning { elapsed } => {
                *elapsed += dt;
                if *elapsed >= t.boss_warning_delay {
                    let contingent = scaling.boss_contingent();
                    let distribution = scaling.unit_type_distribution(self.wave, contingent);
                    let requested = coordinator.request_wave(
                        contingent,
                        &distribution,
                        scaling.spawn_scaling(self.wave, false),
                        ctx.configs,
                    );
                    if let Err(err) = requested {
                        warn!(wave = self.wave, %err, "Boss contingent skipped");
                    }
                    boss.stage = BossStage::Interlude { elapsed: 0.0 };
                }
                self.boss = Some(boss);
            }
            BossStage::Interlude { elapsed } => {
                *elapsed += dt;
                if *elapsed >= t.boss_spawn_delay {
                    self.spawn_boss(boss.appearance, scaling, coordinator, ctx);
                    self.boss = None;
                } else {
                    self.boss = Some(boss);
                }
            }
        }
    }

    fn spawn_boss(
        &self,
        appearance: u32,
        scaling: &ScalingModel,
        coordinator: &mut SpawnCoordinator,
        ctx: &mut SpawnContext<'_>,
    ) {
        let Some(config) = ctx.configs.unit_type(UnitKind::Boss) else {
            warn!(wave = self.wave, "Boss config missing; boss skipped");
            return;
        };
        let factor = scaling.boss_appearance_factor(appearance);
        let mut boss_scaling = scaling.spawn_scaling(self.wave, true);
        boss_scaling.health *= factor;
        boss_scaling.gold *= factor;

        let position = coordinator.spawn_position(ctx.rng, ctx.ground, ctx.center);
        let entity = world_setup::spawn_unit(
            ctx.world,
            UnitKind::Boss,
            config,
            position,
            ctx.center,
            boss_scaling,
        );
        coordinator.register_external(entity);
        info!(
            wave = self.wave,
            health = boss_scaling.health,
            "Boss spawned"
        );
        ctx.events.push(SimEvent::UnitSpawned {
            unit_id: world_setup::entity_id(entity),
            kind: UnitKind::Boss,
            position,
        });
    }
}
