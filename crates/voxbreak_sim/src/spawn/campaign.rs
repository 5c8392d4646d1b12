//! Campaign stage scheduling
//!
//! The campaign manager releases entities according to the active stage's
//! declarative schedule: once per second, every event whose gates have
//! opened (stage time and stage-wide spawn count) releases up to its spawn
//! rate, in definition order. A stage is finished only when every event
//! has exhausted its count AND nothing it spawned is still alive.

use std::sync::Arc;

use log::{debug, info};
use voxbreak_core::Stopwatch;
use voxbreak_defs::campaign::{CampaignDefinition, SpawnEventData};
use voxbreak_defs::entity::EntityDefinition;

use crate::world::World;

/// Seconds between spawn ticks
const SPAWN_TICK_INTERVAL: f32 = 1.0;

/// A stage event cloned into running state with a mutable remaining count
#[derive(Debug)]
struct ActiveSpawnEvent {
    data: SpawnEventData,
    definition: Arc<EntityDefinition>,
    remaining: u32,
    event_id: u32,
}

/// Per-stage entity release scheduler
#[derive(Debug)]
pub struct CampaignManager {
    definition: Arc<CampaignDefinition>,
    stage_index: Option<usize>,
    stage_timer: Stopwatch,
    spawn_tick: Stopwatch,
    events: Vec<ActiveSpawnEvent>,
    stage_finished: bool,
    total_spawned_this_stage: u32,
    difficulty_scale: f32,
    next_event_id: u32,
}

impl CampaignManager {
    /// Create a manager for a campaign; installs the campaign's spawn
    /// points into the world
    pub fn new(definition: Arc<CampaignDefinition>, world: &mut World) -> Self {
        world.install_spawn_points(&definition.spawn_points);
        let clock = world.clock();
        Self {
            stage_index: None,
            stage_timer: Stopwatch::new(clock),
            spawn_tick: Stopwatch::with_interval(clock, SPAWN_TICK_INTERVAL),
            events: Vec::new(),
            stage_finished: false,
            total_spawned_this_stage: 0,
            difficulty_scale: 1.0,
            next_event_id: 0,
            definition,
        }
    }

    /// Advance to the next stage, cloning its events into running state
    pub fn start_next_stage(&mut self, world: &mut World) {
        let next_index = self.stage_index.map_or(0, |index| index + 1);
        self.stage_index = Some(next_index);
        self.stage_finished = false;
        self.total_spawned_this_stage = 0;
        self.events.clear();

        if let Some(stage) = self.definition.stages.get(next_index) {
            for data in &stage.events {
                let Some(definition) = world.catalog().entity(&data.entity) else {
                    continue;
                };
                let event_id = self.next_event_id;
                self.next_event_id += 1;
                self.events.push(ActiveSpawnEvent {
                    remaining: scale_count(data.count_to_spawn, self.difficulty_scale),
                    data: data.clone(),
                    definition,
                    event_id,
                });
            }
            info!(
                "stage {} \"{}\" started: {} events",
                next_index, stage.name, self.events.len()
            );
        }

        self.stage_timer.reset(world.clock());
    }

    /// Run one scheduling step; call once per frame after the world update
    pub fn update(&mut self, world: &mut World) {
        if self.stage_index.is_none() || self.stage_finished {
            return;
        }

        // Rate limit to the spawn tick; the stopwatch catches up slow
        // frames instead of dropping them
        let ticked = self.spawn_tick.decrement_by_interval_all(world.clock()) > 0;

        if ticked {
            let stage_time = self.stage_timer.elapsed_seconds(world.clock());

            for event in &mut self.events {
                if event.remaining == 0 {
                    continue;
                }

                // Both delay gates must be open
                let time_open = stage_time >= event.data.spawn_time_delay;
                let count_open = self.total_spawned_this_stage >= event.data.spawn_count_delay;
                if !(time_open && count_open) {
                    continue;
                }

                let release = event.remaining.min(event.data.spawn_rate);
                let mut spawned = 0;
                for _ in 0..release {
                    if world
                        .spawn_from_point(
                            event.data.spawn_point,
                            &event.definition,
                            Some(event.event_id),
                        )
                        .is_some()
                    {
                        spawned += 1;
                    }
                }

                event.remaining -= release;
                self.total_spawned_this_stage += spawned;
                debug!(
                    "event {} released {} \"{}\" ({} remaining)",
                    event.event_id, spawned, event.data.entity, event.remaining
                );
            }
        }

        // Two-part completion: counts exhausted AND no stragglers alive
        let all_exhausted = self.events.iter().all(|event| event.remaining == 0);
        if all_exhausted && self.live_enemy_count(world) == 0 {
            self.stage_finished = true;
            info!(
                "stage {} finished ({} spawned)",
                self.stage_index.unwrap_or(0),
                self.total_spawned_this_stage
            );
        }
    }

    /// Rescale the remaining release counts to a new difficulty
    pub fn rescale_to_new_difficulty(&mut self, new_scale: f32) {
        for event in &mut self.events {
            let unscaled = event.remaining as f32 / self.difficulty_scale;
            event.remaining = (unscaled * new_scale).round() as u32;
        }
        self.difficulty_scale = new_scale;
    }

    /// Live entities released by this stage's events
    fn live_enemy_count(&self, world: &World) -> u32 {
        self.events
            .iter()
            .map(|event| world.live_count_for_event(event.event_id))
            .sum()
    }

    /// Whether the active stage's two-part completion condition has held
    pub fn is_current_stage_finished(&self) -> bool {
        self.stage_finished
    }

    /// Whether the active stage is the campaign's last
    pub fn is_current_stage_final(&self) -> bool {
        match self.stage_index {
            Some(index) => index + 1 >= self.definition.stages.len(),
            None => self.definition.stages.is_empty(),
        }
    }

    /// Index of the active stage
    pub fn current_stage_number(&self) -> usize {
        self.stage_index.unwrap_or(0)
    }

    /// Number of stages in the campaign
    pub fn stage_count(&self) -> usize {
        self.definition.stages.len()
    }

    /// Entities still to be spawned plus entities still alive
    pub fn enemy_count_left_in_stage(&self, world: &World) -> u32 {
        let remaining: u32 = self.events.iter().map(|event| event.remaining).sum();
        remaining + self.live_enemy_count(world)
    }

    /// Entities spawned since the stage started
    pub fn spawned_this_stage(&self) -> u32 {
        self.total_spawned_this_stage
    }

    /// Seconds since the stage started
    pub fn time_into_stage(&self, world: &World) -> f32 {
        self.stage_timer.elapsed_seconds(world.clock())
    }

    /// The difficulty scale currently applied to release counts
    pub fn difficulty_scale(&self) -> f32 {
        self.difficulty_scale
    }
}

fn scale_count(count: u32, scale: f32) -> u32 {
    (count as f32 * scale).round() as u32
}
