//! The simulation entity
//!
//! One concrete [`Entity`] struct covers every simulated thing - players,
//! NPCs, projectiles, items, scenery. What an entity can do is decided by
//! which capability components it carries: a physics component for
//! dynamics, a behavior for AI, a weapon when equipped, projectile or item
//! state for those lifecycles. Systems dispatch on component presence
//! rather than on a class tag.

use std::sync::Arc;

use voxbreak_core::{Clock, SimRng, Stopwatch};
use voxbreak_defs::entity::{CollisionLayer, EntityDefinition, EntityKind};
use voxbreak_math::{snap_to_cardinal, direction_at_degrees, Vec2, Vec3};

pub use voxbreak_defs::Team;

use crate::animation::Animator;
use crate::behavior::Behavior;
use crate::combat::Weapon;
use crate::physics::PhysicsComponent;

/// RGB color override used for damage and warning flashes
pub type Color = [u8; 3];

/// Flash color for damage and kamikaze ticks
pub const FLASH_RED: Color = [255, 0, 0];

/// How long a damage flash lasts, in seconds
const FLASH_DURATION: f32 = 0.15;

/// What a call to [`Entity::take_damage`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Dropped: the entity was deleted or invincible
    Ignored,
    /// Health reduced, entity survived
    Damaged,
    /// Health reached zero and the death path ran
    Died,
}

/// Projectile-specific lifecycle state
#[derive(Debug, Clone)]
pub struct ProjectileState {
    /// Self-delete when this elapses
    pub lifetime: Stopwatch,
}

/// Item-specific lifecycle state (bobbing pickups)
#[derive(Debug, Clone)]
pub struct ItemState {
    pub bob_timer: Stopwatch,
    /// Resting position once the item has landed
    pub base_position: Option<Vec3>,
}

/// Player-specific state
#[derive(Debug, Clone)]
pub struct PlayerState {
    pub score: i32,
    pub respawning: bool,
    pub respawn_timer: Stopwatch,
    pub spawn_position: Vec3,
}

/// Back-reference to the spawn bookkeeping that produced an AI entity
///
/// The spawn point tracks entities it created; the death sweep reports
/// back through this record, so tracking stops exactly once per entity.
#[derive(Debug, Clone, Copy)]
pub struct SpawnTracker {
    /// Index of the spawn point that produced this entity
    pub point: usize,
    /// Identity of the scheduler event that requested it, if any
    pub event_id: Option<u32>,
}

/// The principal simulation unit
#[derive(Debug)]
pub struct Entity {
    pub definition: Arc<EntityDefinition>,

    // Basic state
    pub position: Vec3,
    /// 2D yaw in degrees; the only rotation entities have
    pub orientation: f32,
    pub health: i32,
    pub team: Team,
    pub marked_for_delete: bool,

    // Physics state
    pub mass: f32,
    pub inverse_mass: f32,
    pub physics_enabled: bool,
    pub grounded: bool,
    pub collision_layer: CollisionLayer,

    // Presentation state
    pub color_override: Option<Color>,
    flash_timer: f32,
    invincibility_timer: f32,

    // Capability components
    pub physics: Option<PhysicsComponent>,
    pub animator: Option<Animator>,
    pub behavior: Option<Behavior>,
    pub weapon: Option<Weapon>,
    pub projectile: Option<ProjectileState>,
    pub item: Option<ItemState>,
    pub player: Option<PlayerState>,
    pub tracker: Option<SpawnTracker>,
}

impl Entity {
    /// Build an entity from its definition
    ///
    /// Behavior prototypes are instantiated fresh here (the prototype
    /// itself is plain config data and is never attached). Projectile
    /// lifetimes and item spawn velocities are armed immediately, so a
    /// freshly built entity is live the moment it registers.
    pub fn from_definition(
        definition: Arc<EntityDefinition>,
        catalog: &voxbreak_defs::AssetCatalog,
        clock: &Clock,
        rng: &mut SimRng,
    ) -> Self {
        let physics = definition
            .is_dynamic()
            .then(|| PhysicsComponent::new(&definition.physics));

        let animator = definition.visuals.animation_set.as_ref().map(|set_name| {
            Animator::new(catalog.animation_set(set_name))
        });

        let behavior = definition
            .behaviors
            .first()
            .map(|config| Behavior::instantiate(config, catalog, clock, rng));

        let projectile = definition.projectile.as_ref().map(|section| {
            let mut lifetime = Stopwatch::new(clock);
            lifetime.set_interval(clock, section.lifetime);
            ProjectileState { lifetime }
        });

        let (team, item, player) = match definition.kind {
            EntityKind::Player => (
                Team::Player,
                None,
                Some(PlayerState {
                    score: 0,
                    respawning: false,
                    respawn_timer: Stopwatch::new(clock),
                    spawn_position: Vec3::ZERO,
                }),
            ),
            // Items sit on the player team so enemy fire passes through
            EntityKind::Item => (
                Team::Player,
                Some(ItemState {
                    bob_timer: Stopwatch::new(clock),
                    base_position: None,
                }),
                None,
            ),
            _ => (Team::Neutral, None, None),
        };

        let weapon = match definition.kind {
            EntityKind::Player => Weapon::from_definition(&definition, catalog, clock),
            _ => None,
        };

        let mass = definition.physics.mass.max(1e-6);

        let mut entity = Self {
            position: Vec3::ZERO,
            orientation: 0.0,
            health: definition.initial_health,
            team,
            marked_for_delete: false,
            mass,
            inverse_mass: 1.0 / mass,
            physics_enabled: true,
            grounded: false,
            collision_layer: definition.collision.layer,
            color_override: None,
            flash_timer: 0.0,
            invincibility_timer: 0.0,
            physics,
            animator,
            behavior,
            weapon,
            projectile,
            item,
            player,
            tracker: None,
            definition,
        };

        // Items pop out of their source with a randomized hop
        if entity.item.is_some() {
            if let Some(physics) = entity.physics.as_mut() {
                let mut velocity = Vec3::new(
                    rng.float_in_range(7.0, 10.0),
                    75.0,
                    rng.float_in_range(7.0, 10.0),
                );
                if rng.chance(0.5) {
                    velocity.x = -velocity.x;
                }
                if rng.chance(0.5) {
                    velocity.z = -velocity.z;
                }
                physics.set_velocity(velocity);
            }
        }

        entity
    }

    /// Apply damage with optional knockback
    ///
    /// Silently dropped while deleted or invincible. The order is fixed:
    /// health mutates, the death check runs, and only then does knockback
    /// reach the physics component, so death-time movement freezes observe
    /// the final health.
    pub fn take_damage(&mut self, amount: i32, knockback: Vec3) -> DamageOutcome {
        if self.marked_for_delete || self.is_invincible() {
            return DamageOutcome::Ignored;
        }

        self.health -= amount;
        self.flash(FLASH_RED);

        let died = self.health <= 0;
        if died {
            self.on_death();
        }

        if let Some(physics) = self.physics.as_mut() {
            physics.add_impulse(knockback);
        }

        if died {
            DamageOutcome::Died
        } else {
            DamageOutcome::Damaged
        }
    }

    /// Begin the death path
    ///
    /// Non-players mark for delete; players flip to respawning instead and
    /// are restored by the world once their timer runs out. The layered
    /// death consequences (loot, particles, tracking, score) run in the
    /// world's sweep where the surrounding state lives.
    pub fn on_death(&mut self) {
        if let Some(player) = self.player.as_mut() {
            player.respawning = true;
            self.health = 0;
            if let Some(physics) = self.physics.as_mut() {
                physics.stop_all_movement();
            }
        } else {
            self.marked_for_delete = true;
        }
    }

    /// Arm the invincibility window; the only way to re-arm it
    pub fn set_invincibility_timer(&mut self, seconds: f32) {
        self.invincibility_timer = seconds;
    }

    /// Whether damage is currently being dropped
    pub fn is_invincible(&self) -> bool {
        self.invincibility_timer > 0.0
    }

    /// Show a color override for the standard flash duration
    pub fn flash(&mut self, color: Color) {
        self.color_override = Some(color);
        self.flash_timer = FLASH_DURATION;
    }

    /// Advance the entity's own timers; called once per frame
    pub fn tick_timers(&mut self, dt: f32) {
        if self.invincibility_timer > 0.0 {
            self.invincibility_timer = (self.invincibility_timer - dt).max(0.0);
        }
        if self.flash_timer > 0.0 {
            self.flash_timer -= dt;
            if self.flash_timer <= 0.0 {
                self.flash_timer = 0.0;
                self.color_override = None;
            }
        }
        if let Some(animator) = self.animator.as_mut() {
            animator.update(dt);
        }
    }

    // --- Movement intent -------------------------------------------------

    /// Drive toward `direction` (normalized, XZ plane), accelerating up to
    /// the definition's movement tunables and reorienting to face the move
    ///
    /// `speed_override` substitutes the definition's max speed, used by
    /// behaviors that sprint (charging). Entities already moving faster
    /// than the cap are not slowed by this call, only prevented from
    /// accelerating further.
    pub fn move_in_direction(&mut self, direction: Vec2, dt: f32, speed_override: Option<f32>) {
        let max_speed = speed_override.unwrap_or(self.definition.movement.max_speed);
        let max_acceleration = self.definition.movement.max_acceleration;
        let mass = self.mass;

        let Some(physics) = self.physics.as_mut() else {
            return;
        };
        if dt <= 0.0 {
            return;
        }

        let velocity = physics.velocity();
        let current_lateral_speed = velocity.xz().length();

        let mut desired_lateral = velocity.xz() + direction * (max_acceleration * dt);
        let mut desired_speed = desired_lateral.normalize_and_get_length();
        desired_speed = if current_lateral_speed > max_speed {
            desired_speed.clamp(0.0, current_lateral_speed)
        } else {
            desired_speed.clamp(0.0, max_speed)
        };
        desired_lateral *= desired_speed;

        let velocity_change = desired_lateral.to_xz(velocity.y) - velocity;
        let force = velocity_change * (mass / dt);
        physics.add_force(force);

        self.orientation = direction.orientation_degrees();
    }

    /// Hop upward with the definition's jump impulse, only from the ground
    pub fn jump(&mut self) {
        if !self.grounded {
            return;
        }
        let impulse = self.definition.movement.jump_impulse;
        if let Some(physics) = self.physics.as_mut() {
            physics.add_impulse(Vec3::UP * impulse);
        }
    }

    /// Brake laterally, limited by the definition's deceleration
    pub fn decelerate(&mut self, dt: f32) {
        let max_deceleration = self.definition.movement.max_deceleration;
        let mass = self.mass;

        let Some(physics) = self.physics.as_mut() else {
            return;
        };
        if dt <= 0.0 {
            return;
        }

        let lateral = physics.velocity().xz();
        let speed = lateral.length();
        if speed <= 0.0 {
            return;
        }

        let direction = -(lateral / speed);
        let magnitude = (speed / dt).clamp(0.0, max_deceleration) * mass;
        physics.add_force((direction * magnitude).to_xz(0.0));
    }

    // --- Geometry --------------------------------------------------------

    /// Unit forward vector in the XZ plane
    pub fn forward(&self) -> Vec2 {
        direction_at_degrees(self.orientation)
    }

    /// Center of the collision volume
    pub fn center(&self) -> Vec3 {
        self.position + Vec3::UP * (self.definition.collision.height * 0.5)
    }

    /// Bottom-center of the collision volume (the entity's feet)
    pub fn bottom_center(&self) -> Vec3 {
        self.position
    }

    /// Collision half-extents after snapping the yaw to a cardinal:
    /// east/west keep (x, z), north/south swap them
    pub fn oriented_extents(&self) -> Vec2 {
        let collision = &self.definition.collision;
        if snap_to_cardinal(self.orientation).swaps_extents() {
            Vec2::new(collision.z_extent, collision.x_extent)
        } else {
            Vec2::new(collision.x_extent, collision.z_extent)
        }
    }

    /// Lateral collision radius used for disc overlap tests
    pub fn collision_radius(&self) -> f32 {
        let collision = &self.definition.collision;
        collision.x_extent.max(collision.z_extent)
    }

    /// Current velocity, zero when there is no physics component
    pub fn velocity(&self) -> Vec3 {
        self.physics
            .as_ref()
            .map(|physics| physics.velocity())
            .unwrap_or(Vec3::ZERO)
    }

    /// Whether this entity is a live player (not mid-respawn)
    pub fn is_active_player(&self) -> bool {
        matches!(&self.player, Some(state) if !state.respawning) && !self.marked_for_delete
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use voxbreak_defs::AssetCatalog;

    fn spawn(def: EntityDefinition) -> Entity {
        let catalog = AssetCatalog::new();
        let clock = Clock::new();
        let mut rng = SimRng::from_seed(1);
        Entity::from_definition(Arc::new(def), &catalog, &clock, &mut rng)
    }

    fn grunt() -> Entity {
        let mut def = EntityDefinition::named("grunt");
        def.initial_health = 10;
        spawn(def)
    }

    #[test]
    fn test_damage_reduces_health() {
        let mut entity = grunt();
        let outcome = entity.take_damage(3, Vec3::ZERO);
        assert_eq!(outcome, DamageOutcome::Damaged);
        assert_eq!(entity.health, 7);
        assert!(!entity.marked_for_delete);
    }

    #[test]
    fn test_lethal_damage_marks_for_delete() {
        let mut entity = grunt();
        let outcome = entity.take_damage(10, Vec3::ZERO);
        assert_eq!(outcome, DamageOutcome::Died);
        assert!(entity.marked_for_delete);
    }

    #[test]
    fn test_damage_during_invincibility_is_dropped() {
        let mut entity = grunt();
        entity.set_invincibility_timer(1.0);

        for _ in 0..5 {
            assert_eq!(entity.take_damage(3, Vec3::ZERO), DamageOutcome::Ignored);
        }
        assert_eq!(entity.health, 10);

        // Window elapses; exactly one application goes through
        entity.tick_timers(1.5);
        assert_eq!(entity.take_damage(3, Vec3::ZERO), DamageOutcome::Damaged);
        assert_eq!(entity.health, 7);
    }

    #[test]
    fn test_damage_after_delete_is_dropped() {
        let mut entity = grunt();
        entity.take_damage(10, Vec3::ZERO);
        assert_eq!(entity.take_damage(1, Vec3::ZERO), DamageOutcome::Ignored);
    }

    #[test]
    fn test_knockback_reaches_physics() {
        let mut entity = grunt();
        entity.take_damage(1, Vec3::new(30.0, 0.0, 0.0));
        let physics = entity.physics.as_mut().expect("dynamic entity");
        let outcome = physics.apply_step(0.016, 1.0, 1.0);
        assert!(outcome.position_delta.x > 0.0);
    }

    #[test]
    fn test_jump_requires_ground() {
        let mut entity = grunt();
        entity.jump();
        assert_eq!(entity.velocity(), Vec3::ZERO);

        entity.grounded = true;
        entity.jump();
        let physics = entity.physics.as_mut().expect("dynamic entity");
        physics.apply_step(0.016, 1.0, 1.0);
        assert!(physics.velocity().y > 0.0);
    }

    #[test]
    fn test_move_reorients() {
        let mut entity = grunt();
        entity.move_in_direction(Vec2::new(0.0, 1.0), 0.016, None);
        assert_relative_eq!(entity.orientation, 90.0, epsilon = 1e-4);
    }

    #[test]
    fn test_oriented_extents_swap() {
        let mut def = EntityDefinition::named("slab");
        def.collision.x_extent = 6.0;
        def.collision.z_extent = 2.0;
        let mut entity = spawn(def);

        entity.orientation = 5.0; // east
        assert_eq!(entity.oriented_extents(), Vec2::new(6.0, 2.0));

        entity.orientation = 92.0; // north
        assert_eq!(entity.oriented_extents(), Vec2::new(2.0, 6.0));
    }

    #[test]
    fn test_flash_clears_after_duration() {
        let mut entity = grunt();
        entity.take_damage(1, Vec3::ZERO);
        assert_eq!(entity.color_override, Some(FLASH_RED));

        entity.tick_timers(0.5);
        assert_eq!(entity.color_override, None);
    }

    #[test]
    fn test_player_death_respawns_instead_of_deleting() {
        let mut def = EntityDefinition::named("hero");
        def.kind = EntityKind::Player;
        def.initial_health = 5;
        let mut entity = spawn(def);

        entity.take_damage(5, Vec3::ZERO);
        assert!(!entity.marked_for_delete);
        assert!(entity.player.as_ref().expect("player state").respawning);
        assert!(!entity.is_active_player());
    }
}
