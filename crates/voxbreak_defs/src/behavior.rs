//! Behavior prototypes
//!
//! A [`BehaviorConfig`] is the prototype half of the prototype/instance
//! split: pure tunables held by an [`crate::EntityDefinition`], never
//! attached to a live entity. The simulation crate builds a fresh behavior
//! instance (own timers, own state) from one of these for every entity it
//! spawns, so prototypes cannot leak live state by construction.

use serde::{Deserialize, Serialize};

/// Prototype data for one AI behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "behavior", rename_all = "snake_case")]
pub enum BehaviorConfig {
    /// Straight-line pursuit of the closest player
    PursueDirect,

    /// Pursuit that hops obstacles a step higher than the current footing
    PursueJump {
        #[serde(default = "default_sensor_offset")]
        sensor_offset: f32,
    },

    /// Pursuit following the world's navigation service
    PursuePath,

    /// Line up on a player, leap, then charge in a locked direction
    Charge {
        #[serde(default = "default_charge_duration")]
        charge_duration: f32,
        #[serde(default = "default_rest_duration")]
        rest_duration: f32,
        #[serde(default = "default_charge_speed")]
        charge_speed: f32,
        #[serde(default = "default_charge_knockback")]
        knockback: f32,
        #[serde(default = "default_charge_damage")]
        damage: i32,
    },

    /// Close on a player and detonate
    Kamikaze {
        #[serde(default = "default_explosion_damage")]
        explosion_damage: i32,
        #[serde(default = "default_explosion_radius")]
        explosion_radius: f32,
        #[serde(default = "default_explosion_impulse")]
        explosion_impulse: f32,
        #[serde(default = "default_trigger_distance")]
        trigger_distance: f32,
        #[serde(default = "default_tick_duration")]
        tick_duration: f32,
    },

    /// Hover over a player and slam down, cratering the terrain
    Smash {
        #[serde(default = "default_touch_damage")]
        damage_on_touch: i32,
        #[serde(default = "default_smash_damage")]
        damage_on_smash: i32,
        #[serde(default = "default_smash_knockback")]
        knockback: f32,
        /// Projectile definition scattered by the landing burst
        #[serde(default = "default_burst_projectile")]
        burst_projectile: String,
    },

    /// Fly between far-apart targets, dropping gravity bombs on a cooldown
    Bomber {
        /// Projectile definition dropped as the bomb
        bomb: String,
        #[serde(default = "default_bomber_speed")]
        move_speed: f32,
        #[serde(default = "default_bomb_cooldown")]
        bomb_cooldown: f32,
        #[serde(default = "default_hover_height")]
        hover_height: f32,
    },

    /// Move straight at the player, firing a weapon in range
    ShootDirect {
        /// Weapon definition operated with infinite ammo
        weapon: String,
        #[serde(default = "default_shoot_range")]
        range: f32,
    },

    /// Orbit the player tangentially while firing
    ShootCircle {
        weapon: String,
        #[serde(default = "default_shoot_range")]
        range: f32,
    },

    /// Flocking blend of separation, obstacle avoidance and pursuit
    SwarmAndAvoid {
        #[serde(default = "default_elbow_room")]
        elbow_room: f32,
    },

    /// Amble between random targets with randomized rests
    Wander,
}

fn default_sensor_offset() -> f32 {
    1.0
}

fn default_charge_duration() -> f32 {
    2.0
}

fn default_rest_duration() -> f32 {
    1.0
}

fn default_charge_speed() -> f32 {
    100.0
}

fn default_charge_knockback() -> f32 {
    30.0
}

fn default_charge_damage() -> i32 {
    2
}

fn default_explosion_damage() -> i32 {
    3
}

fn default_explosion_radius() -> f32 {
    8.0
}

fn default_explosion_impulse() -> f32 {
    50.0
}

fn default_trigger_distance() -> f32 {
    5.0
}

fn default_tick_duration() -> f32 {
    2.0
}

fn default_touch_damage() -> i32 {
    1
}

fn default_smash_damage() -> i32 {
    3
}

fn default_smash_knockback() -> f32 {
    30.0
}

fn default_burst_projectile() -> String {
    "bullet".to_string()
}

fn default_bomber_speed() -> f32 {
    50.0
}

fn default_bomb_cooldown() -> f32 {
    3.0
}

fn default_hover_height() -> f32 {
    30.0
}

fn default_shoot_range() -> f32 {
    50.0
}

fn default_elbow_room() -> f32 {
    4.0
}

impl BehaviorConfig {
    /// Name of the weapon definition this behavior operates, if any
    pub fn weapon_reference(&self) -> Option<&str> {
        match self {
            Self::ShootDirect { weapon, .. } | Self::ShootCircle { weapon, .. } => Some(weapon),
            _ => None,
        }
    }

    /// Name of the projectile definition this behavior spawns, if any
    pub fn projectile_reference(&self) -> Option<&str> {
        match self {
            Self::Bomber { bomb, .. } => Some(bomb),
            Self::Smash {
                burst_projectile, ..
            } => Some(burst_projectile),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_parse() {
        let config: BehaviorConfig =
            serde_json::from_str(r#"{ "behavior": "charge", "charge_speed": 120.0 }"#)
                .expect("parses");
        match config {
            BehaviorConfig::Charge {
                charge_speed,
                charge_duration,
                damage,
                ..
            } => {
                assert_eq!(charge_speed, 120.0);
                assert_eq!(charge_duration, 2.0);
                assert_eq!(damage, 2);
            }
            other => panic!("wrong variant: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_behavior_is_an_error() {
        let result: Result<BehaviorConfig, _> =
            serde_json::from_str(r#"{ "behavior": "sulk" }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_references() {
        let shoot: BehaviorConfig =
            serde_json::from_str(r#"{ "behavior": "shoot_circle", "weapon": "orb_cannon" }"#)
                .expect("parses");
        assert_eq!(shoot.weapon_reference(), Some("orb_cannon"));
        assert_eq!(shoot.projectile_reference(), None);

        let bomber: BehaviorConfig =
            serde_json::from_str(r#"{ "behavior": "bomber", "bomb": "big_bomb" }"#)
                .expect("parses");
        assert_eq!(bomber.projectile_reference(), Some("big_bomb"));
    }
}
