//! Campaign and stage spawn schedules

use serde::{Deserialize, Serialize};
use voxbreak_math::Vec3;

/// A named source position entities are released from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnPointData {
    pub position: Vec3,
    /// Spawn positions are jittered uniformly within this radius
    #[serde(default)]
    pub radius: f32,
}

/// One scheduled release of entities within a stage
///
/// Immutable once loaded; the scheduler clones these into running events
/// with a mutable remaining counter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnEventData {
    /// Entity definition to spawn
    pub entity: String,
    /// Total amount this event releases over the stage
    #[serde(default)]
    pub count_to_spawn: u32,
    /// Entities released per spawn tick once the gates open
    #[serde(default = "default_spawn_rate")]
    pub spawn_rate: u32,
    /// Stage-wide spawn count that must be reached before this event starts
    #[serde(default)]
    pub spawn_count_delay: u32,
    /// Seconds into the stage before this event starts
    #[serde(default)]
    pub spawn_time_delay: f32,
    /// Index into the campaign's spawn point list
    #[serde(default)]
    pub spawn_point: usize,
}

fn default_spawn_rate() -> u32 {
    1
}

/// One stage of a campaign
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignStage {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub events: Vec<SpawnEventData>,
}

/// A full campaign: spawn points plus an ordered list of stages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignDefinition {
    pub name: String,
    #[serde(default)]
    pub spawn_points: Vec<SpawnPointData>,
    #[serde(default)]
    pub stages: Vec<CampaignStage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_campaign_parse() {
        let campaign: CampaignDefinition = serde_json::from_str(
            r#"{
                "name": "assault",
                "spawn_points": [
                    { "position": { "x": 10.0, "y": 0.0, "z": 10.0 }, "radius": 4.0 }
                ],
                "stages": [
                    {
                        "name": "opening",
                        "events": [
                            { "entity": "grunt", "count_to_spawn": 12, "spawn_rate": 3 },
                            { "entity": "bomber", "count_to_spawn": 2, "spawn_time_delay": 20.0 }
                        ]
                    }
                ]
            }"#,
        )
        .expect("campaign parses");

        assert_eq!(campaign.stages.len(), 1);
        let events = &campaign.stages[0].events;
        assert_eq!(events[0].spawn_rate, 3);
        assert_eq!(events[1].spawn_rate, 1);
        assert_eq!(events[1].spawn_count_delay, 0);
        assert_eq!(events[1].spawn_time_delay, 20.0);
    }
}
