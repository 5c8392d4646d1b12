//! Swarm-and-avoid behavior: a stateless per-frame steering blend
//!
//! No explicit states; the "state" is the continuously recomputed blend of
//! three directions - 20% separation from packed swarm-mates, 50% detour
//! around the nearest static obstacle in the forward cone, 30% pursuit of
//! the player.

use super::{obstacle_avoidance, separation_from_swarm, Action, BehaviorContext};
use voxbreak_math::Vec2;

const SEPARATION_WEIGHT: f32 = 0.2;
const AVOIDANCE_WEIGHT: f32 = 0.5;
const PURSUIT_WEIGHT: f32 = 0.3;

/// The swarm steering behavior
#[derive(Debug)]
pub struct SwarmAndAvoid {
    elbow_room: f32,
}

impl SwarmAndAvoid {
    pub fn new(elbow_room: f32) -> Self {
        Self { elbow_room }
    }

    pub fn update(&mut self, ctx: &BehaviorContext) -> Vec<Action> {
        let Some(player) = ctx.closest_player else {
            return vec![Action::Decelerate];
        };

        let direction_to_player = (player.center - ctx.owner.center).xz().normalize();

        let separation = separation_from_swarm(&ctx.owner, ctx.nearby, self.elbow_room);
        let avoidance =
            obstacle_avoidance(&ctx.owner, ctx.nearby, direction_to_player).unwrap_or(Vec2::ZERO);

        let blended = (separation * SEPARATION_WEIGHT
            + avoidance * AVOIDANCE_WEIGHT
            + direction_to_player * PURSUIT_WEIGHT)
            .normalize();

        vec![
            Action::Move {
                direction: blended,
                speed_override: None,
            },
            // Always look at the player, not the way we happen to sidle
            Action::Face {
                degrees: direction_to_player.orientation_degrees(),
            },
        ]
    }
}
