//! Smash behavior: hover over a player and slam down
//!
//! Physics stays disabled for the lifetime of this behavior; all movement
//! is imperative translation so the hover position is exact regardless of
//! gravity or collision response.

use std::sync::Arc;

use voxbreak_core::{Clock, Stopwatch};
use voxbreak_defs::entity::EntityDefinition;
use voxbreak_math::Vec3;

use super::{Action, BehaviorContext, Contact, OwnerView};
use crate::events::SoundId;

const HOVER_HEIGHT_ABOVE_PLAYER: f32 = 30.0;
const HOVER_WAIT_TIME: f32 = 1.0;
const GROUND_WAIT_TIME: f32 = 2.0;
const HOVER_TRANSLATION_SPEED: f32 = 150.0;
const TRANSLATION_THRESHOLD: f32 = 2.0;

/// Size of the landing burst
const BURST_COUNT: u32 = 150;

/// Crater depth carved by a landing
const CRATER_DEPTH: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SmashState {
    /// Resting between slams
    WaitingOnGround,
    /// Translating toward the hover point above a player
    MovingToHoverTarget,
    /// Holding position before dropping
    Hovering,
    /// Descending until ground contact
    Smashing,
}

/// The smash state machine
#[derive(Debug)]
pub struct Smash {
    state: SmashState,
    hover_target: Vec3,
    hover_direction: Vec3,
    wait_timer: Stopwatch,
    damage_on_touch: i32,
    damage_on_smash: i32,
    knockback: f32,
    burst_projectile: Option<Arc<EntityDefinition>>,
}

impl Smash {
    pub fn new(
        damage_on_touch: i32,
        damage_on_smash: i32,
        knockback: f32,
        burst_projectile: Option<Arc<EntityDefinition>>,
        clock: &Clock,
    ) -> Self {
        Self {
            state: SmashState::WaitingOnGround,
            hover_target: Vec3::ZERO,
            hover_direction: Vec3::ZERO,
            wait_timer: Stopwatch::new(clock),
            damage_on_touch,
            damage_on_smash,
            knockback,
            burst_projectile,
        }
    }

    /// Physics is off for the whole lifetime of this behavior
    pub fn on_spawn(&mut self, ctx: &BehaviorContext) -> Vec<Action> {
        self.wait_timer.set_interval(ctx.clock, GROUND_WAIT_TIME);
        vec![Action::SetPhysicsEnabled(false)]
    }

    pub fn update(&mut self, ctx: &BehaviorContext) -> Vec<Action> {
        match self.state {
            SmashState::WaitingOnGround => self.update_waiting(ctx),
            SmashState::MovingToHoverTarget => self.update_moving(ctx),
            SmashState::Hovering => self.update_hovering(ctx),
            SmashState::Smashing => self.update_smashing(ctx),
        }
    }

    fn update_waiting(&mut self, ctx: &BehaviorContext) -> Vec<Action> {
        if !self.wait_timer.has_interval_elapsed(ctx.clock) {
            return Vec::new();
        }
        let Some(player) = ctx.closest_player else {
            return Vec::new();
        };

        self.hover_target = player.center + Vec3::UP * HOVER_HEIGHT_ABOVE_PLAYER;
        self.hover_direction = (self.hover_target - ctx.owner.center).normalize();
        self.state = SmashState::MovingToHoverTarget;
        Vec::new()
    }

    fn update_moving(&mut self, ctx: &BehaviorContext) -> Vec<Action> {
        let translation = self.hover_direction * HOVER_TRANSLATION_SPEED * ctx.dt;
        let mut actions = vec![Action::Translate(translation)];

        let remaining = self.hover_target - (ctx.owner.center + translation);
        if remaining.length_squared() < TRANSLATION_THRESHOLD * TRANSLATION_THRESHOLD {
            actions.push(Action::SetCenterPosition(self.hover_target));
            self.wait_timer.set_interval(ctx.clock, HOVER_WAIT_TIME);
            self.state = SmashState::Hovering;
        }
        actions
    }

    fn update_hovering(&mut self, ctx: &BehaviorContext) -> Vec<Action> {
        if self.wait_timer.has_interval_elapsed(ctx.clock) {
            self.state = SmashState::Smashing;
        }
        Vec::new()
    }

    fn update_smashing(&mut self, ctx: &BehaviorContext) -> Vec<Action> {
        if !ctx.owner.grounded {
            return vec![Action::Translate(
                Vec3::DOWN * HOVER_TRANSLATION_SPEED * ctx.dt,
            )];
        }

        // Ground contact: crater the terrain and scatter the burst
        self.wait_timer.set_interval(ctx.clock, GROUND_WAIT_TIME);
        self.state = SmashState::WaitingOnGround;

        let mut actions = vec![
            Action::DestroyTerrainDisc {
                radius: ctx.owner.lateral_extent * 2.0,
                depth: CRATER_DEPTH,
            },
            Action::PlaySound(SoundId::TerrainBreak),
        ];

        if let Some(definition) = &self.burst_projectile {
            let speed = definition
                .projectile
                .as_ref()
                .map(|section| section.speed)
                .unwrap_or(100.0);
            actions.push(Action::RadialBurst {
                definition: Arc::clone(definition),
                count: BURST_COUNT,
                speed,
            });
        }

        actions
    }

    /// Touching players hurts; a slam landing hurts more
    pub fn on_entity_collision(&mut self, owner: &OwnerView, contact: &Contact) -> Vec<Action> {
        if !contact.other_is_player {
            return Vec::new();
        }

        let (amount, magnitude) = if self.state == SmashState::Smashing {
            (self.damage_on_smash, self.knockback)
        } else {
            (self.damage_on_touch, 0.0)
        };

        let direction = (contact.other_center - owner.center).normalize();
        vec![Action::DamageOther {
            target: contact.other,
            amount,
            knockback: direction * magnitude,
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests_support::{context, owner_at, player_at};
    use super::*;
    use voxbreak_core::Clock;
    use voxbreak_defs::entity::ProjectileSection;

    fn smash(clock: &Clock) -> Smash {
        let mut burst = EntityDefinition::named("spark");
        burst.projectile = Some(ProjectileSection::default());
        Smash::new(1, 3, 30.0, Some(Arc::new(burst)), clock)
    }

    #[test]
    fn test_spawn_disables_physics() {
        let clock = Clock::new();
        let terrain = crate::world::terrain::Terrain::flat(64, 64, 0);
        let nearby = [];
        let ctx = context(owner_at(Vec3::ZERO), None, &nearby, &terrain, &clock);

        let mut behavior = smash(&clock);
        let actions = behavior.on_spawn(&ctx);
        assert!(matches!(actions[0], Action::SetPhysicsEnabled(false)));
    }

    #[test]
    fn test_full_cycle() {
        let mut clock = Clock::new();
        let mut behavior = smash(&clock);
        let terrain = crate::world::terrain::Terrain::flat(64, 64, 0);
        let nearby = [];
        let player = Some(player_at(Vec3::new(10.0, 0.0, 0.0)));

        let ctx = context(owner_at(Vec3::ZERO), player, &nearby, &terrain, &clock);
        behavior.on_spawn(&ctx);

        // Ground wait has not elapsed
        let ctx = context(owner_at(Vec3::ZERO), player, &nearby, &terrain, &clock);
        assert!(behavior.update(&ctx).is_empty());
        assert_eq!(behavior.state, SmashState::WaitingOnGround);

        // Wait out the ground timer: acquires a hover target
        clock.advance(2.5);
        let ctx = context(owner_at(Vec3::ZERO), player, &nearby, &terrain, &clock);
        behavior.update(&ctx);
        assert_eq!(behavior.state, SmashState::MovingToHoverTarget);
        assert!(behavior.hover_target.y > 30.0);

        // Translate until within threshold of the hover target
        let mut owner = owner_at(Vec3::ZERO);
        for _ in 0..200 {
            let ctx = context(owner, player, &nearby, &terrain, &clock);
            let actions = behavior.update(&ctx);
            for action in &actions {
                match action {
                    Action::Translate(delta) => owner.center += *delta,
                    Action::SetCenterPosition(target) => owner.center = *target,
                    _ => {}
                }
            }
            if behavior.state == SmashState::Hovering {
                break;
            }
        }
        assert_eq!(behavior.state, SmashState::Hovering);

        // Hover wait, then drop
        clock.advance(1.5);
        let ctx = context(owner, player, &nearby, &terrain, &clock);
        behavior.update(&ctx);
        assert_eq!(behavior.state, SmashState::Smashing);

        // Descending while airborne
        let ctx = context(owner, player, &nearby, &terrain, &clock);
        let actions = behavior.update(&ctx);
        assert!(matches!(actions[0], Action::Translate(delta) if delta.y < 0.0));

        // Ground contact: crater + burst, back to waiting
        owner.grounded = true;
        let ctx = context(owner, player, &nearby, &terrain, &clock);
        let actions = behavior.update(&ctx);
        assert!(actions
            .iter()
            .any(|a| matches!(a, Action::DestroyTerrainDisc { depth: 2, .. })));
        assert!(actions
            .iter()
            .any(|a| matches!(a, Action::RadialBurst { count: 150, .. })));
        assert_eq!(behavior.state, SmashState::WaitingOnGround);
    }

    #[test]
    fn test_touch_damage_scales_with_state() {
        let clock = Clock::new();
        let mut behavior = smash(&clock);
        let owner = owner_at(Vec3::ZERO);
        let contact = Contact {
            other: owner.handle,
            other_team: voxbreak_defs::Team::Player,
            other_is_player: true,
            other_center: Vec3::new(2.0, 4.0, 0.0),
            other_bottom_center: Vec3::new(2.0, 0.0, 0.0),
        };

        // Idle touch: light damage, no knockback
        let actions = behavior.on_entity_collision(&owner, &contact);
        assert!(matches!(
            actions[0],
            Action::DamageOther { amount: 1, knockback, .. } if knockback == Vec3::ZERO
        ));

        // Slamming: heavy damage with knockback
        behavior.state = SmashState::Smashing;
        let actions = behavior.on_entity_collision(&owner, &contact);
        assert!(matches!(
            actions[0],
            Action::DamageOther { amount: 3, knockback, .. } if knockback.length() > 1.0
        ));
    }

    #[test]
    fn test_non_player_touch_ignored() {
        let clock = Clock::new();
        let mut behavior = smash(&clock);
        let owner = owner_at(Vec3::ZERO);
        let contact = Contact {
            other: owner.handle,
            other_team: voxbreak_defs::Team::Enemy,
            other_is_player: false,
            other_center: Vec3::new(2.0, 4.0, 0.0),
            other_bottom_center: Vec3::new(2.0, 0.0, 0.0),
        };
        assert!(behavior.on_entity_collision(&owner, &contact).is_empty());
    }
}
