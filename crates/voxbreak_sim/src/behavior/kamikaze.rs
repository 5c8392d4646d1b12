//! Kamikaze behavior: close on a player, tick down, detonate

use voxbreak_core::{Clock, Stopwatch};

use super::{obstacle_avoidance, Action, BehaviorContext, Contact, OwnerView};
use crate::entity::FLASH_RED;
use crate::events::SoundId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KamikazeState {
    /// Steering toward the nearest player
    Pursue,
    /// In range, movement frozen, counting down
    Ticking,
    /// Detonated; terminal
    Done,
}

/// The kamikaze state machine
#[derive(Debug)]
pub struct Kamikaze {
    state: KamikazeState,
    tick_timer: Stopwatch,
    normalized_last_frame: f32,
    explosion_damage: i32,
    explosion_radius: f32,
    explosion_impulse: f32,
    trigger_distance: f32,
    tick_duration: f32,
}

impl Kamikaze {
    pub fn new(
        explosion_damage: i32,
        explosion_radius: f32,
        explosion_impulse: f32,
        trigger_distance: f32,
        tick_duration: f32,
        clock: &Clock,
    ) -> Self {
        Self {
            state: KamikazeState::Pursue,
            tick_timer: Stopwatch::new(clock),
            normalized_last_frame: 0.0,
            explosion_damage,
            explosion_radius,
            explosion_impulse,
            trigger_distance,
            tick_duration,
        }
    }

    pub fn update(&mut self, ctx: &BehaviorContext) -> Vec<Action> {
        match self.state {
            KamikazeState::Pursue => self.update_pursue(ctx),
            KamikazeState::Ticking => self.update_ticking(ctx),
            KamikazeState::Done => Vec::new(),
        }
    }

    fn update_pursue(&mut self, ctx: &BehaviorContext) -> Vec<Action> {
        // Target swaps to whoever is closest whenever the old one is gone;
        // with no players at all there is nothing to do but coast down
        let Some(player) = ctx.closest_player else {
            return vec![Action::Decelerate];
        };

        let mut to_player = player.position - ctx.owner.position;
        let distance = to_player.normalize_and_get_length();

        if distance <= self.trigger_distance {
            self.tick_timer.set_interval(ctx.clock, self.tick_duration);
            self.normalized_last_frame = 0.0;
            self.state = KamikazeState::Ticking;
            return vec![Action::StopAllMovement];
        }

        // Half direct pursuit, half sidestep around static obstacles
        let pursuit = to_player.xz();
        let direction = match obstacle_avoidance(&ctx.owner, ctx.nearby, pursuit) {
            Some(avoidance) => (pursuit * 0.5 + avoidance * 0.5).normalize(),
            None => pursuit,
        };

        vec![Action::Move {
            direction,
            speed_override: None,
        }]
    }

    fn update_ticking(&mut self, ctx: &BehaviorContext) -> Vec<Action> {
        let mut actions = vec![Action::StopAllMovement];

        let t = self.tick_timer.elapsed_normalized(ctx.clock);
        let crossed_quarter = [0.25, 0.5, 0.75]
            .iter()
            .any(|&mark| t >= mark && self.normalized_last_frame < mark);
        if crossed_quarter {
            actions.push(Action::FlashColor(FLASH_RED));
            actions.push(Action::PlaySound(SoundId::KamikazeTick));
        }
        self.normalized_last_frame = t;

        if self.tick_timer.has_interval_elapsed(ctx.clock) {
            self.state = KamikazeState::Done;
            actions.push(self.explode());
        }

        actions
    }

    /// A player touch mid-tick sets the bomb off immediately
    pub fn on_entity_collision(&mut self, _owner: &OwnerView, contact: &Contact) -> Vec<Action> {
        if self.state == KamikazeState::Ticking && contact.other_is_player {
            self.state = KamikazeState::Done;
            return vec![self.explode()];
        }
        Vec::new()
    }

    fn explode(&self) -> Action {
        Action::Explode {
            damage: self.explosion_damage,
            radius: self.explosion_radius,
            knockback: self.explosion_impulse,
        }
    }
}
