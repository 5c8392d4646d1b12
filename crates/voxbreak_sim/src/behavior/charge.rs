//! Charge behavior: line up on a player, leap, then rush in a straight line

use voxbreak_core::{Clock, Stopwatch};
use voxbreak_math::{Vec2, Vec3};

use super::{Action, BehaviorContext, Contact, OwnerView};

/// Alignment required between the charge direction and a collision for the
/// impact to count as "ran into what we were charging at"
const IMPACT_ALIGNMENT: f32 = 0.8;

/// Knockback applied to the struck entity, relative to the self-knockback
const STRUCK_KNOCKBACK_SCALE: f32 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChargeState {
    /// Re-aim at the closest player every frame until ready to leap
    Search,
    /// Airborne, waiting for ground contact to begin the rush
    Jump,
    /// Rushing along the locked direction until the timer or an impact
    Charge,
    /// Bounced off an impact, waiting to land
    Knockback,
    /// Cooling down before searching again
    Rest,
}

/// The charge state machine
#[derive(Debug)]
pub struct Charge {
    state: ChargeState,
    state_timer: Stopwatch,
    charge_direction: Vec2,
    charge_duration: f32,
    rest_duration: f32,
    charge_speed: f32,
    knockback: f32,
    damage: i32,
}

impl Charge {
    pub fn new(
        charge_duration: f32,
        rest_duration: f32,
        charge_speed: f32,
        knockback: f32,
        damage: i32,
        clock: &Clock,
    ) -> Self {
        Self {
            state: ChargeState::Search,
            state_timer: Stopwatch::new(clock),
            charge_direction: Vec2::ZERO,
            charge_duration,
            rest_duration,
            charge_speed,
            knockback,
            damage,
        }
    }

    pub fn update(&mut self, ctx: &BehaviorContext) -> Vec<Action> {
        let Some(player) = ctx.closest_player else {
            return vec![Action::Decelerate];
        };

        let mut actions = Vec::new();
        match self.state {
            ChargeState::Search => {
                self.charge_direction =
                    (player.position - ctx.owner.position).xz().normalize();
                actions.push(Action::StopAllMovement);
                actions.push(Action::Face {
                    degrees: self.charge_direction.orientation_degrees(),
                });
                actions.push(Action::Jump);
                actions.push(Action::PlayAnimation("idle"));
                self.state = ChargeState::Jump;
            }
            ChargeState::Jump => {
                // Landed, or fell out of the map: begin the rush
                if ctx.owner.grounded || ctx.owner.position.y < 0.0 {
                    self.state_timer.set_interval(ctx.clock, self.charge_duration);
                    self.state = ChargeState::Charge;
                    actions.push(Action::Move {
                        direction: self.charge_direction,
                        speed_override: Some(self.charge_speed),
                    });
                }
            }
            ChargeState::Charge => {
                if self.state_timer.has_interval_elapsed(ctx.clock) {
                    self.state_timer.set_interval(ctx.clock, self.rest_duration);
                    self.state = ChargeState::Rest;
                    actions.push(Action::StopAllMovement);
                    actions.push(Action::PlayAnimation("idle"));
                } else {
                    actions.push(Action::Move {
                        direction: self.charge_direction,
                        speed_override: Some(self.charge_speed),
                    });
                }
            }
            ChargeState::Knockback => {
                if ctx.owner.grounded {
                    self.state_timer.set_interval(ctx.clock, self.rest_duration);
                    self.state = ChargeState::Rest;
                }
            }
            ChargeState::Rest => {
                if self.state_timer.has_interval_elapsed(ctx.clock) {
                    self.state = ChargeState::Search;
                }
            }
        }
        actions
    }

    /// Impacts only matter mid-charge, and only when roughly head-on
    pub fn on_entity_collision(&mut self, owner: &OwnerView, contact: &Contact) -> Vec<Action> {
        if self.state != ChargeState::Charge {
            return Vec::new();
        }

        let direction_to_other =
            (contact.other_bottom_center - owner.position).xz().normalize();
        if owner.forward.dot(direction_to_other) <= IMPACT_ALIGNMENT {
            return Vec::new();
        }

        self.state = ChargeState::Knockback;

        let recoil = -self.charge_direction;
        let mut actions = vec![
            Action::StopAllMovement,
            Action::PlayAnimation("idle"),
            Action::SelfImpulse(
                Vec3::new(recoil.x, 1.0, recoil.y) * self.knockback,
            ),
        ];

        if contact.other_team != owner.team {
            let struck = self.charge_direction * (self.knockback * STRUCK_KNOCKBACK_SCALE);
            actions.push(Action::DamageOther {
                target: contact.other,
                amount: self.damage,
                knockback: struck.to_xz(0.0),
            });
        }

        actions
    }
}
