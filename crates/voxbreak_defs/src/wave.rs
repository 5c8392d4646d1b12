//! Wave-mode spawn schedules
//!
//! The wave mode keeps a live-population corridor per entity type instead
//! of a fixed release schedule: the manager force-spawns up to `min_live`,
//! adds a bounded random amount on top, and backs off entirely above the
//! 80%-of-range threshold derived at load time.

use serde::{Deserialize, Serialize};

use crate::campaign::SpawnPointData;

/// One entity type's corridor within a wave
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveSpawnData {
    /// Entity definition to spawn
    pub entity: String,
    /// Total amount this wave may release of this type
    #[serde(default)]
    pub total_to_spawn: u32,
    /// Live count the manager force-spawns up to
    #[serde(default)]
    pub min_live: u32,
    /// Live count the manager may randomly fill toward
    #[serde(default)]
    pub max_live: u32,
    /// Wave-wide spawn count that must be reached before this type starts
    #[serde(default)]
    pub spawn_delay: u32,
    /// Live count at which spawning pauses; derived at load, not authored
    #[serde(skip)]
    pub max_live_threshold: u32,
}

impl WaveSpawnData {
    /// Compute the derived corridor threshold: 80% of the min..max range
    pub fn finalize(&mut self) {
        let range = self.max_live.saturating_sub(self.min_live);
        self.max_live_threshold = (range as f32 * 0.8).ceil() as u32 + self.min_live;
    }
}

/// A single wave of entity releases
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wave {
    #[serde(default)]
    pub events: Vec<WaveSpawnData>,
}

/// A full wave set: spawn points plus an ordered list of waves
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveSet {
    pub name: String,
    #[serde(default)]
    pub spawn_points: Vec<SpawnPointData>,
    #[serde(default)]
    pub waves: Vec<Wave>,
}

impl WaveSet {
    /// Fill in derived fields after parsing
    pub fn finalize(&mut self) {
        for wave in &mut self.waves {
            for event in &mut wave.events {
                event.finalize();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_derivation() {
        let mut event = WaveSpawnData {
            entity: "swarmer".to_string(),
            total_to_spawn: 40,
            min_live: 5,
            max_live: 15,
            spawn_delay: 0,
            max_live_threshold: 0,
        };
        event.finalize();
        // ceil(0.8 * 10) + 5
        assert_eq!(event.max_live_threshold, 13);
    }

    #[test]
    fn test_threshold_degenerate_range() {
        let mut event = WaveSpawnData {
            entity: "swarmer".to_string(),
            total_to_spawn: 10,
            min_live: 8,
            max_live: 8,
            spawn_delay: 0,
            max_live_threshold: 0,
        };
        event.finalize();
        assert_eq!(event.max_live_threshold, 8);
    }

    #[test]
    fn test_wave_set_finalize() {
        let mut set: WaveSet = serde_json::from_str(
            r#"{
                "name": "endless",
                "waves": [
                    { "events": [ { "entity": "swarmer", "min_live": 2, "max_live": 12 } ] }
                ]
            }"#,
        )
        .expect("parses");
        set.finalize();
        assert_eq!(set.waves[0].events[0].max_live_threshold, 10);
    }
}
