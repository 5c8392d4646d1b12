//! Bomber behavior: fly between far-apart targets, dropping gravity bombs
//!
//! Physics is disabled; the bomber translates at a constant height and the
//! bomb cooldown runs independently of where it happens to be flying.

use std::sync::Arc;

use voxbreak_core::{Clock, SimRng, Stopwatch};
use voxbreak_defs::entity::EntityDefinition;
use voxbreak_math::{Vec2, Vec3};

use super::{Action, BehaviorContext};
use crate::combat::ProjectileSpawn;

/// Distance at which a target counts as reached
const TARGET_REACHED_THRESHOLD: f32 = 5.0;

/// New targets must be at least this far away (squared)
const MIN_DISTANCE_TO_NEW_TARGET_SQUARED: f32 = 2500.0;

/// Margin kept from the map edge when sampling targets
const EDGE_MARGIN: f32 = 20.0;

/// Rejection sampling attempts before settling for the last candidate
const MAX_TARGET_ATTEMPTS: u32 = 16;

/// The bomber behavior
#[derive(Debug)]
pub struct Bomber {
    bomb: Option<Arc<EntityDefinition>>,
    move_speed: f32,
    bomb_cooldown: f32,
    hover_height: f32,
    target_position: Vec3,
    moving_direction: Vec3,
    bomb_timer: Stopwatch,
}

impl Bomber {
    pub fn new(
        bomb: Option<Arc<EntityDefinition>>,
        move_speed: f32,
        bomb_cooldown: f32,
        hover_height: f32,
        clock: &Clock,
    ) -> Self {
        Self {
            bomb,
            move_speed,
            bomb_cooldown,
            hover_height,
            target_position: Vec3::ZERO,
            moving_direction: Vec3::ZERO,
            bomb_timer: Stopwatch::new(clock),
        }
    }

    /// Lift off the ground, pick a first target, arm the bomb cooldown
    pub fn on_spawn(&mut self, ctx: &BehaviorContext, rng: &mut SimRng) -> Vec<Action> {
        self.bomb_timer.set_interval(ctx.clock, self.bomb_cooldown);

        let mut lifted = ctx.owner.position;
        lifted.y = ctx.terrain.height_at(lifted.xz()) + self.hover_height;
        self.find_new_target(lifted, ctx, rng);

        vec![
            Action::SetPhysicsEnabled(false),
            Action::SetPosition(lifted),
        ]
    }

    pub fn update(&mut self, ctx: &BehaviorContext, rng: &mut SimRng) -> Vec<Action> {
        let mut actions = vec![Action::Translate(
            self.moving_direction * self.move_speed * ctx.dt,
        )];

        let distance_squared = (self.target_position - ctx.owner.center).length_squared();
        if distance_squared < TARGET_REACHED_THRESHOLD * TARGET_REACHED_THRESHOLD {
            self.find_new_target(ctx.owner.center, ctx, rng);
        }

        if self.bomb_timer.has_interval_elapsed(ctx.clock) {
            self.bomb_timer.set_interval(ctx.clock, self.bomb_cooldown);
            if let Some(bomb) = &self.bomb {
                actions.push(Action::SpawnProjectile(ProjectileSpawn {
                    definition: Arc::clone(bomb),
                    position: ctx.owner.position,
                    orientation: ctx.owner.orientation,
                    velocity: Vec3::ZERO,
                    team: ctx.owner.team,
                    gravity_override: Some(true),
                }));
            }
        }

        actions
    }

    /// Rejection-sample a far-enough flight target over walkable ground
    fn find_new_target(&mut self, from: Vec3, ctx: &BehaviorContext, rng: &mut SimRng) {
        let max_x = ctx.terrain.width() as f32 - EDGE_MARGIN;
        let max_z = ctx.terrain.depth() as f32 - EDGE_MARGIN;

        for attempt in 0..MAX_TARGET_ATTEMPTS {
            let lateral = Vec2::new(
                rng.float_in_range(EDGE_MARGIN, max_x.max(EDGE_MARGIN + 1.0)),
                rng.float_in_range(EDGE_MARGIN, max_z.max(EDGE_MARGIN + 1.0)),
            );
            let target = Vec3::new(
                lateral.x,
                ctx.terrain.height_at(lateral) + self.hover_height,
                lateral.y,
            );

            let mut direction = target - from;
            let distance = direction.normalize_and_get_length();
            let far_enough = distance * distance >= MIN_DISTANCE_TO_NEW_TARGET_SQUARED;

            if far_enough || attempt == MAX_TARGET_ATTEMPTS - 1 {
                self.target_position = target;
                self.moving_direction = direction;
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests_support::{context, owner_at};
    use super::*;
    use voxbreak_core::Clock;
    use voxbreak_defs::entity::ProjectileSection;

    fn bomb_definition() -> Arc<EntityDefinition> {
        let mut def = EntityDefinition::named("bomb");
        def.projectile = Some(ProjectileSection::default());
        Arc::new(def)
    }

    fn bomber(clock: &Clock) -> Bomber {
        Bomber::new(Some(bomb_definition()), 50.0, 1.0, 30.0, clock)
    }

    #[test]
    fn test_spawn_disables_physics_and_lifts_off() {
        let clock = Clock::new();
        let mut rng = SimRng::from_seed(5);
        let terrain = crate::world::terrain::Terrain::flat(256, 256, 8);
        let nearby = [];
        let ctx = context(
            owner_at(Vec3::new(100.0, 8.0, 100.0)),
            None,
            &nearby,
            &terrain,
            &clock,
        );

        let mut behavior = bomber(&clock);
        let actions = behavior.on_spawn(&ctx, &mut rng);

        assert!(matches!(actions[0], Action::SetPhysicsEnabled(false)));
        assert!(matches!(
            actions[1],
            Action::SetPosition(position) if (position.y - 38.0).abs() < 1e-3
        ));
        // A flight target was chosen inside the map margins
        assert!(behavior.target_position.x >= EDGE_MARGIN);
        assert!(behavior.target_position.x <= 256.0 - EDGE_MARGIN);
        assert!(behavior.target_position.z >= EDGE_MARGIN);
        assert!((behavior.target_position.y - 38.0).abs() < 1e-3);
        assert!((behavior.moving_direction.length() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_update_translates_along_direction() {
        let clock = Clock::new();
        let mut rng = SimRng::from_seed(5);
        let terrain = crate::world::terrain::Terrain::flat(256, 256, 8);
        let nearby = [];
        let owner = owner_at(Vec3::new(100.0, 38.0, 100.0));
        let ctx = context(owner, None, &nearby, &terrain, &clock);

        let mut behavior = bomber(&clock);
        behavior.on_spawn(&ctx, &mut rng);

        let actions = behavior.update(&ctx, &mut rng);
        let Action::Translate(delta) = actions[0] else {
            panic!("expected translation, got {:?}", actions[0]);
        };
        // Constant speed translation
        assert!((delta.length() - 50.0 * ctx.dt).abs() < 1e-3);
    }

    #[test]
    fn test_bomb_drops_on_cooldown() {
        let mut clock = Clock::new();
        let mut rng = SimRng::from_seed(5);
        let terrain = crate::world::terrain::Terrain::flat(256, 256, 8);
        let nearby = [];
        let owner = owner_at(Vec3::new(100.0, 38.0, 100.0));

        let ctx = context(owner, None, &nearby, &terrain, &clock);
        let mut behavior = bomber(&clock);
        behavior.on_spawn(&ctx, &mut rng);

        // Cooldown not elapsed: no bomb
        let ctx = context(owner, None, &nearby, &terrain, &clock);
        let actions = behavior.update(&ctx, &mut rng);
        assert!(!actions
            .iter()
            .any(|a| matches!(a, Action::SpawnProjectile(_))));

        clock.advance(1.2);
        let ctx = context(owner, None, &nearby, &terrain, &clock);
        let actions = behavior.update(&ctx, &mut rng);
        let spawn = actions
            .iter()
            .find_map(|a| match a {
                Action::SpawnProjectile(spawn) => Some(spawn),
                _ => None,
            })
            .expect("bomb dropped");
        assert_eq!(spawn.gravity_override, Some(true));
        assert_eq!(spawn.velocity, Vec3::ZERO);

        // Cooldown re-armed
        let ctx = context(owner, None, &nearby, &terrain, &clock);
        let actions = behavior.update(&ctx, &mut rng);
        assert!(!actions
            .iter()
            .any(|a| matches!(a, Action::SpawnProjectile(_))));
    }
}
