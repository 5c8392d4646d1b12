//! Pursuit behaviors
//!
//! Three ways of closing on the player: a straight line, a straight line
//! with a jump sensor for terrain steps, and following the world's
//! navigation service one waypoint at a time.

use super::{Action, BehaviorContext};

/// Straight-line pursuit of the closest player
#[derive(Debug)]
pub struct PursueDirect;

impl PursueDirect {
    pub fn update(&mut self, ctx: &BehaviorContext) -> Vec<Action> {
        let Some(player) = ctx.closest_player else {
            return vec![Action::Decelerate];
        };

        let direction = (player.position - ctx.owner.position).xz().normalize();
        vec![Action::Move {
            direction,
            speed_override: None,
        }]
    }
}

/// Pursuit with a jump sensor probing the ground just outside the
/// entity's collision boundary
#[derive(Debug)]
pub struct PursueJump {
    sensor_offset: f32,
}

impl PursueJump {
    pub fn new(sensor_offset: f32) -> Self {
        Self { sensor_offset }
    }

    pub fn update(&mut self, ctx: &BehaviorContext) -> Vec<Action> {
        let Some(player) = ctx.closest_player else {
            return vec![Action::Decelerate];
        };

        let direction = (player.position - ctx.owner.position).xz().normalize();
        let mut actions = vec![Action::Move {
            direction,
            speed_override: None,
        }];

        // Probe just past the collision extent along the move direction;
        // a step more than one voxel up needs a hop
        let sensor_distance = ctx.owner.lateral_extent + self.sensor_offset;
        let probe = ctx.owner.position.xz() + direction * sensor_distance;
        let step_height = ctx.terrain.height_at(probe) - ctx.owner.position.y;
        if step_height > 1.0 && ctx.owner.grounded {
            actions.push(Action::Jump);
        }

        actions
    }
}

/// Thin consumer of the world's navigation service
#[derive(Debug)]
pub struct PursuePath;

impl PursuePath {
    pub fn update(&mut self, ctx: &BehaviorContext) -> Vec<Action> {
        let Some(next_position) = ctx.next_position_towards_player else {
            return vec![Action::Decelerate];
        };

        let direction = (next_position - ctx.owner.position).xz().normalize();
        vec![Action::Move {
            direction,
            speed_override: None,
        }]
    }
}
