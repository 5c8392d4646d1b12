//! Shooting behaviors: direct approach and orbiting
//!
//! Both own and operate a [`Weapon`] built at instantiation with infinite
//! ammo; the difference is what they do with their feet once in range.

use voxbreak_core::SimRng;
use voxbreak_math::Vec2;

use super::{Action, BehaviorContext};
use crate::combat::{ShooterView, Weapon};
use crate::events::SoundId;

/// Move straight at the closest player, firing while in range
#[derive(Debug)]
pub struct ShootDirect {
    weapon: Option<Weapon>,
    range: f32,
}

impl ShootDirect {
    pub fn new(weapon: Option<Weapon>, range: f32) -> Self {
        Self { weapon, range }
    }

    pub fn update(&mut self, ctx: &BehaviorContext, rng: &mut SimRng) -> Vec<Action> {
        let Some(player) = ctx.closest_player else {
            return vec![Action::Decelerate];
        };

        let direction = (player.position - ctx.owner.position).xz().normalize();
        let mut actions = vec![
            Action::Move {
                direction,
                speed_override: None,
            },
            Action::Decelerate,
        ];

        let in_range = ctx.distance_to_player().is_some_and(|d| d <= self.range);
        if in_range {
            actions.extend(fire(self.weapon.as_mut(), ctx, rng));
        }
        actions
    }
}

/// Orbit the closest player tangentially while firing
///
/// The orbit direction is decided once at instantiation by a coin flip and
/// kept for the entity's lifetime.
#[derive(Debug)]
pub struct ShootCircle {
    weapon: Option<Weapon>,
    range: f32,
    go_left: bool,
}

impl ShootCircle {
    pub fn new(weapon: Option<Weapon>, range: f32, go_left: bool) -> Self {
        Self {
            weapon,
            range,
            go_left,
        }
    }

    pub fn update(&mut self, ctx: &BehaviorContext, rng: &mut SimRng) -> Vec<Action> {
        let Some(player) = ctx.closest_player else {
            return vec![Action::Decelerate];
        };

        let direction_to_player = (player.position - ctx.owner.position).xz().normalize();
        let distance = ctx.distance_to_player().unwrap_or(f32::MAX);

        if distance > self.range {
            return vec![
                Action::Move {
                    direction: direction_to_player,
                    speed_override: None,
                },
                Action::Decelerate,
            ];
        }

        // Circle strafe: move along the tangent, keep facing the player
        let mut tangent = direction_to_player.perpendicular();
        if self.go_left {
            tangent = -tangent;
        }

        let mut actions = vec![
            Action::Move {
                direction: tangent,
                speed_override: None,
            },
            Action::Face {
                degrees: direction_to_player.orientation_degrees(),
            },
        ];
        actions.extend(fire_facing(
            self.weapon.as_mut(),
            ctx,
            direction_to_player,
            rng,
        ));
        actions
    }
}

fn fire(weapon: Option<&mut Weapon>, ctx: &BehaviorContext, rng: &mut SimRng) -> Vec<Action> {
    fire_facing(weapon, ctx, ctx.owner.forward, rng)
}

fn fire_facing(
    weapon: Option<&mut Weapon>,
    ctx: &BehaviorContext,
    facing: Vec2,
    rng: &mut SimRng,
) -> Vec<Action> {
    let Some(weapon) = weapon else {
        return Vec::new();
    };

    let shooter = ShooterView {
        center: ctx.owner.center,
        orientation: facing.orientation_degrees(),
        team: ctx.owner.team,
    };

    let spawns = weapon.shoot(&shooter, ctx.clock, rng);
    if spawns.is_empty() {
        return Vec::new();
    }

    let mut actions = vec![Action::PlaySound(SoundId::Shoot)];
    actions.extend(spawns.into_iter().map(Action::SpawnProjectile));
    actions
}
