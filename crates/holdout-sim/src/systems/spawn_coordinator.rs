//! Spawn coordinator: ring placement, staggered unit creation and the
//! live-unit set that wave-clear detection polls.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use holdout_core::components::Vitals;
use holdout_core::config::{SpawnTuning, UnitTypeConfig};
use holdout_core::enums::UnitKind;
use holdout_core::error::{ConfigKey, InvalidOperation, SimError};
use holdout_core::events::SimEvent;
use holdout_core::interfaces::{ConfigSource, GroundProbe};
use holdout_core::types::{Position, SpawnScaling};

use crate::world_setup;

/// Everything a spawn needs from the outside world for one step.
pub struct SpawnContext<'a> {
    pub world: &'a mut World,
    pub rng: &'a mut ChaCha8Rng,
    pub ground: &'a dyn GroundProbe,
    pub configs: &'a dyn ConfigSource,
    /// Defended point the ring is centred on.
    pub center: Position,
    pub events: &'a mut Vec<SimEvent>,
}

#[derive(Debug, Clone)]
struct PendingSpawn {
    kind: UnitKind,
    config: Arc<UnitTypeConfig>,
}

/// An in-progress staggered spawn.
#[derive(Debug, Clone)]
struct SpawnSequence {
    queue: VecDeque<PendingSpawn>,
    scaling: SpawnScaling,
    /// Seconds accumulated toward the next spawn.
    timer: f64,
    spawned: u32,
}

#[derive(Debug, Clone, Default)]
pub struct SpawnCoordinator {
    tuning: SpawnTuning,
    sequence: Option<SpawnSequence>,
    /// Tracked units in spawn order. Iteration order breaks targeting ties.
    live: Vec<Entity>,
}

impl SpawnCoordinator {
    pub fn new(tuning: SpawnTuning) -> Self {
        Self {
            tuning,
            sequence: None,
            live: Vec::new(),
        }
    }

    pub fn tuning(&self) -> &SpawnTuning {
        &self.tuning
    }

    pub fn is_spawning(&self) -> bool {
        self.sequence.is_some()
    }

    /// Units still queued in the current sequence.
    pub fn pending(&self) -> usize {
        self.sequence.as_ref().map_or(0, |s| s.queue.len())
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn live_units(&self) -> &[Entity] {
        &self.live
    }

    /// Queue `total` units for staggered creation.
    ///
    /// Kinds come from `distribution` in kind order; anything the distribution
    /// leaves unassigned is filled with basic units. Nothing is queued unless
    /// every requested kind resolves.
    pub fn request_wave(
        &mut self,
        total: u32,
        distribution: &BTreeMap<UnitKind, u32>,
        scaling: SpawnScaling,
        configs: &dyn ConfigSource,
    ) -> Result<(), SimError> {
        if self.is_spawning() {
            return Err(InvalidOperation::SpawnBusy.into());
        }

        let assigned: u32 = distribution.values().sum();
        let mut counts = distribution.clone();
        if total > assigned {
            *counts.entry(UnitKind::Basic).or_insert(0) += total - assigned;
        }

        let mut queue = VecDeque::new();
        for (&kind, &count) in &counts {
            if count == 0 {
                continue;
            }
            let config = configs
                .unit_type(kind)
                .ok_or(ConfigKey::Unit(kind))?;
            for _ in 0..count {
                queue.push_back(PendingSpawn {
                    kind,
                    config: Arc::clone(&config),
                });
            }
        }

        debug!(units = queue.len(), "Spawn sequence queued");
        self.sequence = Some(SpawnSequence {
            queue,
            scaling,
            // The first unit appears on the next advance.
            timer: self.tuning.delay_between_units,
            spawned: 0,
        });
        Ok(())
    }

    /// Advance the running sequence by `dt` seconds.
    pub fn advance(&mut self, dt: f64, ctx: &mut SpawnContext<'_>) {
        let Some(mut seq) = self.sequence.take() else {
            return;
        };

        seq.timer += dt;
        while seq.timer >= self.tuning.delay_between_units {
            let Some(next) = seq.queue.pop_front() else {
                break;
            };
            seq.timer -= self.tuning.delay_between_units;
            let position = self.spawn_position(ctx.rng, ctx.ground, ctx.center);
            let entity = world_setup::spawn_unit(
                ctx.world,
                next.kind,
                next.config,
                position,
                ctx.center,
                seq.scaling,
            );
            self.live.push(entity);
            seq.spawned += 1;
            debug!(kind = ?next.kind, x = position.x, y = position.y, "Unit spawned");
            ctx.events.push(SimEvent::UnitSpawned {
                unit_id: world_setup::entity_id(entity),
                kind: next.kind,
                position,
            });
        }

        if seq.queue.is_empty() {
            ctx.events.push(SimEvent::SpawnSequenceComplete {
                spawned: seq.spawned,
            });
        } else {
            self.sequence = Some(seq);
        }
    }

    /// Uniform angle on the spawn ring, snapped to the ground when the probe hits.
    pub fn spawn_position(
        &self,
        rng: &mut ChaCha8Rng,
        ground: &dyn GroundProbe,
        center: Position,
    ) -> Position {
        let angle = rng.gen_range(0.0..360.0_f64).to_radians();
        let x = center.x + self.tuning.radius * angle.sin();
        let y = center.y + self.tuning.radius * angle.cos();
        let probe_origin = Position::new(x, y, center.z + self.tuning.probe_height);
        match ground.probe_down(probe_origin, self.tuning.probe_reach) {
            Some(z) => Position::new(x, y, z),
            None => Position::new(x, y, center.z),
        }
    }

    /// Track a unit created outside the sequence (the boss).
    pub fn register_external(&mut self, entity: Entity) {
        if !self.live.contains(&entity) {
            self.live.push(entity);
        }
    }

    /// Cancel the running sequence. Units already spawned stay live.
    pub fn stop_sequence(&mut self) {
        self.sequence = None;
    }

    /// Cancel the sequence and despawn every tracked unit.
    pub fn clear(&mut self, world: &mut World) {
        self.sequence = None;
        for entity in self.live.drain(..) {
            let _ = world.despawn(entity);
        }
    }

    /// Drop handles to units that are dead or no longer in the world.
    pub fn prune(&mut self, world: &World) {
        self.live.retain(|&e| {
            world
                .get::<&Vitals>(e)
                .map(|v| !v.dead)
                .unwrap_or(false)
        });
    }
}
