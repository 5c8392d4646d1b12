//! Wave scheduling with live-population corridors
//!
//! Instead of a fixed release schedule, each wave event keeps the live
//! count of its entity type inside a corridor: below the minimum it
//! force-spawns the shortfall, inside the corridor it adds a bounded
//! random amount, and at or above the 80%-of-range threshold it backs off
//! entirely. Density stays in a band rather than the whole quota arriving
//! at once.

use std::sync::Arc;

use log::{debug, info};
use voxbreak_core::Stopwatch;
use voxbreak_defs::entity::EntityDefinition;
use voxbreak_defs::wave::{WaveSet, WaveSpawnData};

use crate::world::World;

/// Seconds between spawn ticks
const SPAWN_TICK_INTERVAL: f32 = 1.0;

/// A wave event cloned into running state
#[derive(Debug)]
struct ActiveWaveEvent {
    data: WaveSpawnData,
    definition: Arc<EntityDefinition>,
    remaining: u32,
}

/// Corridor-based wave scheduler
#[derive(Debug)]
pub struct WaveManager {
    definition: Arc<WaveSet>,
    wave_index: Option<usize>,
    spawn_tick: Stopwatch,
    events: Vec<ActiveWaveEvent>,
    wave_finished: bool,
    total_spawned_this_wave: u32,
}

impl WaveManager {
    /// Create a manager for a wave set; installs its spawn points
    pub fn new(definition: Arc<WaveSet>, world: &mut World) -> Self {
        world.install_spawn_points(&definition.spawn_points);
        Self {
            wave_index: None,
            spawn_tick: Stopwatch::with_interval(world.clock(), SPAWN_TICK_INTERVAL),
            events: Vec::new(),
            wave_finished: false,
            total_spawned_this_wave: 0,
            definition,
        }
    }

    /// Advance to the next wave
    pub fn start_next_wave(&mut self, world: &mut World) {
        let next_index = self.wave_index.map_or(0, |index| index + 1);
        self.wave_index = Some(next_index);
        self.wave_finished = false;
        self.total_spawned_this_wave = 0;
        self.events.clear();

        if let Some(wave) = self.definition.waves.get(next_index) {
            for data in &wave.events {
                let Some(definition) = world.catalog().entity(&data.entity) else {
                    continue;
                };
                self.events.push(ActiveWaveEvent {
                    remaining: data.total_to_spawn,
                    data: data.clone(),
                    definition,
                });
            }
            info!("wave {} started: {} events", next_index, self.events.len());
        }
    }

    /// Run one corridor step; call once per frame after the world update
    pub fn update(&mut self, world: &mut World) {
        if self.wave_index.is_none() {
            return;
        }

        // End-of-wave check runs every frame, spawning only on the tick
        self.perform_wave_end_check(world);
        if self.wave_finished {
            return;
        }

        if self.spawn_tick.decrement_by_interval_all(world.clock()) == 0 {
            return;
        }

        let point_count = world.spawn_point_count();
        if point_count == 0 {
            return;
        }

        for event in &mut self.events {
            if event.remaining == 0 {
                continue;
            }

            let live = world.live_count_for_definition(&event.data.entity);

            // Density already near the top of the corridor
            if live >= event.data.max_live_threshold {
                continue;
            }

            // Event still gated behind the wave's spawn progression
            if self.total_spawned_this_wave < event.data.spawn_delay {
                continue;
            }

            // Force up to the corridor floor, then a random topping
            let mut amount = 0;
            let mut lower_bound = live;
            if live < event.data.min_live {
                amount += event.data.min_live - live;
                lower_bound = event.data.min_live;
            }

            let range = event.data.max_live.saturating_sub(lower_bound);
            amount += world.rng_mut().int_in_range(0, range as i32) as u32;
            amount = amount.min(event.remaining);
            if amount == 0 {
                continue;
            }

            event.remaining -= amount;

            let point_index = world.rng_mut().int_less_than(point_count);
            let mut spawned = 0;
            for _ in 0..amount {
                if world
                    .spawn_from_point(point_index, &event.definition, None)
                    .is_some()
                {
                    spawned += 1;
                }
            }
            self.total_spawned_this_wave += spawned;
            debug!(
                "wave event \"{}\" spawned {} (live {}, {} remaining)",
                event.data.entity, spawned, live, event.remaining
            );
        }
    }

    fn perform_wave_end_check(&mut self, world: &World) {
        let all_exhausted = self.events.iter().all(|event| event.remaining == 0);
        if !all_exhausted {
            return;
        }

        let live: u32 = self
            .events
            .iter()
            .map(|event| world.live_count_for_definition(&event.data.entity))
            .sum();
        if live == 0 {
            self.wave_finished = true;
        }
    }

    /// Whether the active wave's two-part completion condition has held
    pub fn is_current_wave_finished(&self) -> bool {
        self.wave_finished
    }

    /// Whether the active wave is the set's last
    pub fn is_current_wave_final(&self) -> bool {
        match self.wave_index {
            Some(index) => index + 1 >= self.definition.waves.len(),
            None => self.definition.waves.is_empty(),
        }
    }

    /// Index of the active wave
    pub fn current_wave_number(&self) -> usize {
        self.wave_index.unwrap_or(0)
    }

    /// Number of waves in the set
    pub fn wave_count(&self) -> usize {
        self.definition.waves.len()
    }

    /// Entities spawned since the wave started
    pub fn spawned_this_wave(&self) -> u32 {
        self.total_spawned_this_wave
    }
}
