//! Simulation engine: the core of the game.
//!
//! `SimulationEngine` owns the hecs world and every subsystem, processes
//! player commands at tick boundaries, runs the systems in a fixed order,
//! and produces `GameStateSnapshot`s. It is headless and deterministic for
//! a given seed.

use std::collections::VecDeque;

use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use holdout_campaign::{PassiveIncome, Treasury, UpgradeEffectAggregator};
use holdout_core::commands::PlayerCommand;
use holdout_core::config::{Catalog, SimConfig};
use holdout_core::enums::{GamePhase, UnitKind};
use holdout_core::error::{ConfigKey, InvalidOperation, SimError};
use holdout_core::events::SimEvent;
use holdout_core::interfaces::{ConfigSource, DefendedStructure, Economy, GroundProbe};
use holdout_core::state::{GameStateSnapshot, WaveView};
use holdout_core::types::{Position, SimTime};
use holdout_terrain::FlatGround;

use crate::armory::Armory;
use crate::scaling::ScalingModel;
use crate::stats::RunStats;
use crate::systems;
use crate::systems::spawn_coordinator::{SpawnContext, SpawnCoordinator};
use crate::systems::wave_scheduler::WaveScheduler;
use crate::tower::Tower;

/// The simulation engine. Owns the ECS world and all run state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    phase: GamePhase,
    config: SimConfig,
    rng: ChaCha8Rng,
    command_queue: VecDeque<PlayerCommand>,
    despawn_buffer: Vec<hecs::Entity>,
    events: Vec<SimEvent>,

    configs: Box<dyn ConfigSource>,
    economy: Box<dyn Economy>,
    structure: Box<dyn DefendedStructure>,
    ground: Box<dyn GroundProbe>,

    scaling: ScalingModel,
    scheduler: WaveScheduler,
    spawner: SpawnCoordinator,
    armory: Armory,
    upgrades: UpgradeEffectAggregator,
    income: PassiveIncome,
    stats: RunStats,
    /// Structure max health before upgrade bonuses.
    base_max_health: f64,
}

impl SimulationEngine {
    /// Wire an engine from explicit collaborators.
    pub fn new(
        config: SimConfig,
        configs: Box<dyn ConfigSource>,
        economy: Box<dyn Economy>,
        structure: Box<dyn DefendedStructure>,
        ground: Box<dyn GroundProbe>,
    ) -> Self {
        let center = structure.position();
        let base_max_health = structure.max_health();
        Self {
            world: World::new(),
            time: SimTime::default(),
            phase: GamePhase::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            events: Vec::new(),
            scaling: ScalingModel::new(config.waves.clone()),
            scheduler: WaveScheduler::new(),
            spawner: SpawnCoordinator::new(config.spawn.clone()),
            armory: Armory::from_tuning(center, &config.run),
            upgrades: UpgradeEffectAggregator::new(),
            income: PassiveIncome::from_tuning(&config.run),
            stats: RunStats::default(),
            base_max_health,
            configs,
            economy,
            structure,
            ground,
            config,
        }
    }

    /// Standard catalog, an in-memory treasury, a tower at the origin and
    /// flat ground.
    pub fn with_defaults(config: SimConfig) -> Self {
        let economy = Treasury::new(config.run.starting_gold);
        let tower = Tower::new(Position::default(), config.run.tower_max_health);
        Self::new(
            config,
            Box::new(Catalog::standard()),
            Box::new(economy),
            Box::new(tower),
            Box::new(FlatGround::default()),
        )
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> GameStateSnapshot {
        self.process_commands();

        if self.phase == GamePhase::Playing {
            self.run_systems();
            self.time.advance();
        }

        let events = std::mem::take(&mut self.events);
        let wave = self.wave_view();
        systems::snapshot::build_snapshot(
            &self.world,
            &self.time,
            self.phase,
            wave,
            &self.armory,
            self.structure.as_ref(),
            self.economy.balance(),
            self.income.rate() + self.upgrades.multipliers().gold_gen_per_sec,
            *self.upgrades.multipliers(),
            &self.stats,
            events,
        )
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn scaling(&self) -> &ScalingModel {
        &self.scaling
    }

    pub fn scheduler(&self) -> &WaveScheduler {
        &self.scheduler
    }

    pub fn spawner(&self) -> &SpawnCoordinator {
        &self.spawner
    }

    pub fn armory(&self) -> &Armory {
        &self.armory
    }

    pub fn upgrades(&self) -> &UpgradeEffectAggregator {
        &self.upgrades
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub fn gold(&self) -> f64 {
        self.economy.balance()
    }

    pub fn structure(&self) -> &dyn DefendedStructure {
        self.structure.as_ref()
    }

    /// Upgrade ids purchasable right now, ignoring affordability.
    pub fn available_upgrades(&self) -> Vec<String> {
        self.upgrades
            .available_upgrades(self.configs.as_ref(), self.shop_wave())
    }

    /// Spawn a unit outside any wave and track it as live (for tests).
    #[cfg(test)]
    pub fn spawn_test_unit(&mut self, kind: UnitKind, position: Position) -> hecs::Entity {
        let config = self
            .configs
            .unit_type(kind)
            .unwrap_or_else(|| panic!("no config for {kind:?}"));
        let entity = crate::world_setup::spawn_unit(
            &mut self.world,
            kind,
            config,
            position,
            self.structure.position(),
            holdout_core::types::SpawnScaling::IDENTITY,
        );
        self.spawner.register_external(entity);
        entity
    }

    /// Mutable access to the structure (for tests).
    #[cfg(test)]
    pub fn structure_mut(&mut self) -> &mut dyn DefendedStructure {
        self.structure.as_mut()
    }

    /// Stop the wave clock so tests control every unit (for tests).
    #[cfg(test)]
    pub fn halt_waves(&mut self) {
        self.scheduler.stop(&mut self.spawner);
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            if let Err(err) = self.handle_command(&command) {
                warn!(?command, %err, "Command rejected");
                self.events.push(SimEvent::CommandRejected {
                    reason: err.to_string(),
                });
            }
        }
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: &PlayerCommand) -> Result<(), SimError> {
        match command {
            PlayerCommand::StartGame => {
                if !matches!(self.phase, GamePhase::MainMenu | GamePhase::GameOver) {
                    return Err(InvalidOperation::WrongPhase("a run is in progress").into());
                }
                self.start_run()?;
            }
            PlayerCommand::Pause => {
                if self.phase != GamePhase::Playing {
                    return Err(InvalidOperation::WrongPhase("not playing").into());
                }
                self.set_phase(GamePhase::Paused);
            }
            PlayerCommand::Resume => {
                if self.phase != GamePhase::Paused {
                    return Err(InvalidOperation::WrongPhase("not paused").into());
                }
                self.set_phase(GamePhase::Playing);
            }
            PlayerCommand::ForceNextWave => {
                self.require_run()?;
                self.scheduler.force_next_wave()?;
            }
            PlayerCommand::StopWaves => {
                self.require_run()?;
                self.scheduler.stop(&mut self.spawner);
                info!(wave = self.scheduler.wave(), "Wave system stopped");
            }
            PlayerCommand::PurchaseUpgrade { id } => {
                self.require_run()?;
                let wave = self.shop_wave();
                let stacks =
                    self.upgrades
                        .purchase(self.configs.as_ref(), id, wave, self.economy.as_mut())?;
                let bonus = self.upgrades.multipliers().max_health_bonus;
                self.structure.set_max_health(self.base_max_health + bonus);
                self.events.push(SimEvent::UpgradePurchased {
                    id: id.clone(),
                    stacks,
                });
                self.events.push(SimEvent::GoldChanged {
                    balance: self.economy.balance(),
                });
            }
            PlayerCommand::BuyWeapon { id } => {
                self.require_run()?;
                let config = self
                    .configs
                    .weapon(id)
                    .ok_or_else(|| ConfigKey::Weapon(id.clone()))?;
                self.armory.can_add(id, &config)?;
                if !self.economy.spend(config.cost) {
                    return Err(SimError::InsufficientFunds {
                        cost: config.cost,
                        balance: self.economy.balance(),
                    });
                }
                let slot = self.armory.add_weapon(id, config)?;
                self.events.push(SimEvent::WeaponAdded {
                    slot,
                    weapon_id: id.clone(),
                });
                self.events.push(SimEvent::GoldChanged {
                    balance: self.economy.balance(),
                });
            }
            PlayerCommand::RemoveWeapon { slot } => {
                self.require_run()?;
                let removed = self.armory.remove_weapon(*slot)?;
                self.events.push(SimEvent::WeaponRemoved {
                    slot: *slot,
                    weapon_id: removed.weapon_id,
                });
            }
            PlayerCommand::ReturnToMenu => {
                self.teardown();
                self.set_phase(GamePhase::MainMenu);
            }
        }
        Ok(())
    }

    /// Reset every subsystem and begin a fresh run.
    fn start_run(&mut self) -> Result<(), SimError> {
        self.teardown();
        self.time = SimTime::default();
        self.rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        self.armory.reset();
        self.upgrades.reset();
        self.income.reset();
        self.stats = RunStats::default();

        self.economy.reset(self.config.run.starting_gold);

        self.structure.set_max_health(self.base_max_health);
        self.structure.restore();

        if let Some(id) = self.config.starting_weapon.clone() {
            let config = self
                .configs
                .weapon(&id)
                .ok_or_else(|| ConfigKey::Weapon(id.clone()))?;
            let slot = self.armory.add_weapon(&id, config)?;
            self.events.push(SimEvent::WeaponAdded { slot, weapon_id: id });
        }

        self.scheduler.start(&self.scaling);
        self.set_phase(GamePhase::Playing);
        info!(seed = self.config.seed, "Run started");
        Ok(())
    }

    /// Stop waves and remove every unit and projectile.
    fn teardown(&mut self) {
        self.scheduler.reset(&mut self.spawner, &mut self.world);
        systems::cleanup::clear_projectiles(&mut self.world);
        self.despawn_buffer.clear();
        self.armory.clear_targets();
    }

    fn game_over(&mut self) {
        info!(
            waves = self.stats.waves_reached,
            kills = self.stats.units_killed,
            survived = self.stats.survival_secs,
            "Structure destroyed"
        );
        self.events.push(SimEvent::StructureDestroyed);
        self.scheduler.stop(&mut self.spawner);
        self.spawner.clear(&mut self.world);
        systems::cleanup::clear_projectiles(&mut self.world);
        self.armory.clear_targets();
        self.set_phase(GamePhase::GameOver);
    }

    fn set_phase(&mut self, phase: GamePhase) {
        if self.phase != phase {
            info!(?phase, "Game phase changed");
            self.phase = phase;
            self.events.push(SimEvent::GamePhaseChanged { phase });
        }
    }

    fn require_run(&self) -> Result<(), SimError> {
        if matches!(self.phase, GamePhase::Playing | GamePhase::Paused) {
            Ok(())
        } else {
            Err(InvalidOperation::WrongPhase("no run in progress").into())
        }
    }

    /// Wave number used for shop gates; the pre-wave lead-in counts as wave 1.
    fn shop_wave(&self) -> u32 {
        self.scheduler.wave().max(1)
    }

    fn wave_view(&self) -> WaveView {
        let number = self.scheduler.wave();
        WaveView {
            number,
            phase: self.scheduler.phase(),
            is_boss_wave: number > 0 && self.scaling.is_boss_wave(number),
            time_to_next_wave: self.scheduler.time_to_next_wave(&self.scaling),
            live_units: self.spawner.live_count() as u32,
        }
    }

    fn add_gold(&mut self, amount: f64) {
        if amount <= 0.0 {
            return;
        }
        self.economy.add(amount);
        self.stats.record_gold(amount);
        self.events.push(SimEvent::GoldAdded { amount });
        self.events.push(SimEvent::GoldChanged {
            balance: self.economy.balance(),
        });
    }

    /// Pay out bounties for every death reported since `mark`.
    fn collect_bounties(&mut self, mark: usize) {
        let deaths: Vec<(UnitKind, f64)> = self.events[mark..]
            .iter()
            .filter_map(|e| match e {
                SimEvent::UnitDied { kind, gold, .. } => Some((*kind, *gold)),
                _ => None,
            })
            .collect();
        for (kind, gold) in deaths {
            self.stats.record_kill(kind);
            self.add_gold(gold);
        }
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        let dt = self.time.dt();
        let now = self.time.elapsed_secs;
        let center = self.structure.position();

        // 1. Wave scheduling, then 2. staggered spawns
        {
            let mut ctx = SpawnContext {
                world: &mut self.world,
                rng: &mut self.rng,
                ground: self.ground.as_ref(),
                configs: self.configs.as_ref(),
                center,
                events: &mut self.events,
            };
            if let Some(wave) = self
                .scheduler
                .advance(dt, &self.scaling, &mut self.spawner, &mut ctx)
            {
                self.income.on_wave_started();
                self.stats.waves_reached = wave;
            }
            self.spawner.advance(dt, &mut ctx);
        }

        // 3. Unit movement
        systems::movement::run(&mut self.world, center);
        // 4. Unit strikes on the structure
        systems::unit_attack::run(
            &mut self.world,
            self.structure.as_mut(),
            now,
            &mut self.events,
        );

        // 5. Weapons and projectiles
        let mark = self.events.len();
        let global = *self.upgrades.multipliers();
        systems::combat::run(
            &mut self.world,
            &mut self.armory,
            self.spawner.live_units(),
            &global,
            now,
            &mut self.events,
        );
        systems::projectiles::run(
            &mut self.world,
            self.spawner.live_units(),
            now,
            &mut self.events,
            &mut self.despawn_buffer,
        );
        // 6. Bounties
        self.collect_bounties(mark);

        // 7. Cleanup
        systems::cleanup::run(&mut self.world, &mut self.despawn_buffer);
        self.spawner.prune(&self.world);
        // 8. Wave clear
        self.scheduler.poll_clear(&self.spawner, &mut self.events);

        // 9. Regeneration and passive income
        if global.health_regen_per_sec > 0.0 {
            self.structure.heal(global.health_regen_per_sec * dt);
        }
        if let Some(amount) = self.income.advance(dt, global.gold_gen_per_sec) {
            self.add_gold(amount);
        }

        self.stats.survival_secs += dt;
        if self.structure.is_destroyed() {
            self.game_over();
        }
    }
}
