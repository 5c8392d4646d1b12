//! AI behaviors
//!
//! Each behavior is one variant of the [`Behavior`] enum - a small state
//! machine updated once per frame for the entity that owns it. Behaviors
//! read a prepared [`BehaviorContext`] and answer with [`Action`]s the
//! world applies to the owning entity; they never reach into the world
//! directly.
//!
//! The prototype/instance split is value-based: prototypes are
//! [`BehaviorConfig`] data on a definition, and [`Behavior::instantiate`]
//! builds a fresh instance with its own timers for each spawned entity.
//! A prototype therefore cannot carry live state, and two instances built
//! from the same prototype share nothing.
//!
//! Behaviors never panic: a frame with no living player degrades to
//! deceleration or waiting, not an error.

pub mod bomber;
pub mod charge;
pub mod kamikaze;
pub mod pursue;
pub mod shoot;
pub mod smash;
pub mod swarm;
pub mod wander;

use std::sync::Arc;

use voxbreak_core::{Clock, SimRng};
use voxbreak_defs::entity::{EntityDefinition, PhysicsType, Team};
use voxbreak_defs::{AssetCatalog, BehaviorConfig};
use voxbreak_math::{Vec2, Vec3};

use crate::combat::ProjectileSpawn;
use crate::entity::Color;
use crate::events::SoundId;
use crate::world::terrain::Terrain;
use crate::world::EntityHandle;

pub use bomber::Bomber;
pub use charge::Charge;
pub use kamikaze::Kamikaze;
pub use pursue::{PursueDirect, PursueJump, PursuePath};
pub use shoot::{ShootCircle, ShootDirect};
pub use smash::Smash;
pub use swarm::SwarmAndAvoid;
pub use wander::Wander;

/// Snapshot of the owning entity a behavior reads each frame
#[derive(Debug, Clone, Copy)]
pub struct OwnerView {
    pub handle: EntityHandle,
    pub position: Vec3,
    pub center: Vec3,
    pub orientation: f32,
    pub forward: Vec2,
    pub grounded: bool,
    pub team: Team,
    pub velocity: Vec3,
    /// Oriented lateral half-extent, for sensors and crater sizing
    pub lateral_extent: f32,
}

/// What a behavior knows about the player it is hunting
#[derive(Debug, Clone, Copy)]
pub struct PlayerView {
    pub position: Vec3,
    pub center: Vec3,
}

/// One nearby entity from the world's overlap query
#[derive(Debug, Clone, Copy)]
pub struct NearbyEntity {
    pub handle: EntityHandle,
    pub center: Vec3,
    pub team: Team,
    pub physics_type: PhysicsType,
}

/// A contact reported to [`Behavior::on_entity_collision`]
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    pub other: EntityHandle,
    pub other_team: Team,
    pub other_is_player: bool,
    pub other_center: Vec3,
    pub other_bottom_center: Vec3,
}

/// Read-only view assembled by the world for one behavior update
pub struct BehaviorContext<'a> {
    pub owner: OwnerView,
    /// Closest living (non-respawning) player, if any
    pub closest_player: Option<PlayerView>,
    /// Entities within the standard awareness radius, excluding the owner
    pub nearby: &'a [NearbyEntity],
    /// One step of the world's navigation service toward the players
    pub next_position_towards_player: Option<Vec3>,
    pub terrain: &'a Terrain,
    pub clock: &'a Clock,
    pub dt: f32,
}

impl BehaviorContext<'_> {
    /// Lateral distance from the owner to the closest player
    pub fn distance_to_player(&self) -> Option<f32> {
        self.closest_player
            .map(|player| (player.position - self.owner.position).length())
    }
}

/// Intent issued by a behavior, interpreted by the world
#[derive(Debug, Clone)]
pub enum Action {
    /// Accelerate toward a lateral direction, reorienting to face it
    Move {
        direction: Vec2,
        speed_override: Option<f32>,
    },
    /// Brake laterally
    Decelerate,
    Jump,
    /// Set the yaw without moving
    Face { degrees: f32 },
    /// Zero velocity and accumulated force/impulse
    StopAllMovement,
    SetPhysicsEnabled(bool),
    /// Imperative position offset (hover/bomber style movement)
    Translate(Vec3),
    SetPosition(Vec3),
    SetCenterPosition(Vec3),
    PlayAnimation(&'static str),
    FlashColor(Color),
    PlaySound(SoundId),
    /// Impulse on the owner itself (recoil, knockback)
    SelfImpulse(Vec3),
    /// Damage another entity (contact attacks)
    DamageOther {
        target: EntityHandle,
        amount: i32,
        knockback: Vec3,
    },
    SpawnProjectile(ProjectileSpawn),
    /// Area damage centered on the owner, then die
    Explode {
        damage: i32,
        radius: f32,
        knockback: f32,
    },
    /// Carve a crater under the owner
    DestroyTerrainDisc { radius: f32, depth: u8 },
    /// Scatter projectiles radially from the owner
    RadialBurst {
        definition: Arc<EntityDefinition>,
        count: u32,
        speed: f32,
    },
    Die,
}

/// A live AI strategy bound to one entity
#[derive(Debug)]
pub enum Behavior {
    PursueDirect(PursueDirect),
    PursueJump(PursueJump),
    PursuePath(PursuePath),
    Charge(Charge),
    Kamikaze(Kamikaze),
    Smash(Smash),
    Bomber(Bomber),
    ShootDirect(ShootDirect),
    ShootCircle(ShootCircle),
    SwarmAndAvoid(SwarmAndAvoid),
    Wander(Wander),
}

impl Behavior {
    /// Build a fresh instance from a prototype
    ///
    /// Timers are constructed against the current clock, weapons are built
    /// and given infinite ammo, and any one-time random choices (orbit
    /// direction) are made here. Nothing is copied from a live instance.
    pub fn instantiate(
        config: &BehaviorConfig,
        catalog: &AssetCatalog,
        clock: &Clock,
        rng: &mut SimRng,
    ) -> Self {
        match config {
            BehaviorConfig::PursueDirect => Self::PursueDirect(PursueDirect),
            BehaviorConfig::PursueJump { sensor_offset } => {
                Self::PursueJump(PursueJump::new(*sensor_offset))
            }
            BehaviorConfig::PursuePath => Self::PursuePath(PursuePath),
            BehaviorConfig::Charge {
                charge_duration,
                rest_duration,
                charge_speed,
                knockback,
                damage,
            } => Self::Charge(Charge::new(
                *charge_duration,
                *rest_duration,
                *charge_speed,
                *knockback,
                *damage,
                clock,
            )),
            BehaviorConfig::Kamikaze {
                explosion_damage,
                explosion_radius,
                explosion_impulse,
                trigger_distance,
                tick_duration,
            } => Self::Kamikaze(Kamikaze::new(
                *explosion_damage,
                *explosion_radius,
                *explosion_impulse,
                *trigger_distance,
                *tick_duration,
                clock,
            )),
            BehaviorConfig::Smash {
                damage_on_touch,
                damage_on_smash,
                knockback,
                burst_projectile,
            } => Self::Smash(Smash::new(
                *damage_on_touch,
                *damage_on_smash,
                *knockback,
                catalog.entity(burst_projectile),
                clock,
            )),
            BehaviorConfig::Bomber {
                bomb,
                move_speed,
                bomb_cooldown,
                hover_height,
            } => Self::Bomber(Bomber::new(
                catalog.entity(bomb),
                *move_speed,
                *bomb_cooldown,
                *hover_height,
                clock,
            )),
            BehaviorConfig::ShootDirect { weapon, range } => Self::ShootDirect(
                ShootDirect::new(weapon_for(weapon, catalog, clock), *range),
            ),
            BehaviorConfig::ShootCircle { weapon, range } => Self::ShootCircle(
                ShootCircle::new(weapon_for(weapon, catalog, clock), *range, rng.chance(0.5)),
            ),
            BehaviorConfig::SwarmAndAvoid { elbow_room } => {
                Self::SwarmAndAvoid(SwarmAndAvoid::new(*elbow_room))
            }
            BehaviorConfig::Wander => Self::Wander(Wander::new(clock)),
        }
    }

    /// One-time setup actions, applied right after the entity registers
    pub fn on_spawn(&mut self, ctx: &BehaviorContext, rng: &mut SimRng) -> Vec<Action> {
        match self {
            Self::Smash(smash) => smash.on_spawn(ctx),
            Self::Bomber(bomber) => bomber.on_spawn(ctx, rng),
            _ => Vec::new(),
        }
    }

    /// Per-frame decision step
    pub fn update(&mut self, ctx: &BehaviorContext, rng: &mut SimRng) -> Vec<Action> {
        match self {
            Self::PursueDirect(behavior) => behavior.update(ctx),
            Self::PursueJump(behavior) => behavior.update(ctx),
            Self::PursuePath(behavior) => behavior.update(ctx),
            Self::Charge(behavior) => behavior.update(ctx),
            Self::Kamikaze(behavior) => behavior.update(ctx),
            Self::Smash(behavior) => behavior.update(ctx),
            Self::Bomber(behavior) => behavior.update(ctx, rng),
            Self::ShootDirect(behavior) => behavior.update(ctx, rng),
            Self::ShootCircle(behavior) => behavior.update(ctx, rng),
            Self::SwarmAndAvoid(behavior) => behavior.update(ctx),
            Self::Wander(behavior) => behavior.update(ctx, rng),
        }
    }

    /// Contact hook; may fire several times per frame, independent of
    /// the update cadence
    pub fn on_entity_collision(&mut self, owner: &OwnerView, contact: &Contact) -> Vec<Action> {
        match self {
            Self::Charge(behavior) => behavior.on_entity_collision(owner, contact),
            Self::Kamikaze(behavior) => behavior.on_entity_collision(owner, contact),
            Self::Smash(behavior) => behavior.on_entity_collision(owner, contact),
            _ => Vec::new(),
        }
    }
}

fn weapon_for(
    name: &str,
    catalog: &AssetCatalog,
    clock: &Clock,
) -> Option<crate::combat::Weapon> {
    let definition = catalog.entity(name)?;
    let mut weapon = crate::combat::Weapon::from_definition(&definition, catalog, clock)?;
    weapon.set_infinite_ammo(true);
    Some(weapon)
}

/// Steering shared by kamikaze and the swarm: direction that walks around
/// the nearest static obstacle inside a 45 degree forward cone
///
/// The avoidance direction is the obstacle direction rotated a quarter
/// turn; the rotation sign is picked so the detour bends the shorter
/// angular way toward the player.
pub(crate) fn obstacle_avoidance(
    owner: &OwnerView,
    nearby: &[NearbyEntity],
    direction_to_player: Vec2,
) -> Option<Vec2> {
    let cone_threshold = 45.0_f32.to_radians().cos();
    let mut closest: Option<(f32, Vec2)> = None;

    for entity in nearby {
        if entity.physics_type != PhysicsType::Static {
            continue;
        }

        let mut direction = (entity.center - owner.center).xz();
        let distance = direction.normalize_and_get_length();
        if distance <= 0.0 {
            continue;
        }

        let within_cone = direction.dot(owner.forward) > cone_threshold;
        if !within_cone {
            continue;
        }

        if closest.map_or(true, |(best, _)| distance < best) {
            closest = Some((distance, direction));
        }
    }

    let (_, obstacle_direction) = closest?;
    let displacement = voxbreak_math::angular_displacement(
        direction_to_player.orientation_degrees(),
        obstacle_direction.orientation_degrees(),
    );
    let sign = if displacement < 0.0 { 1.0 } else { -1.0 };
    Some(obstacle_direction.perpendicular() * sign)
}

/// Separation component of the swarm blend: sum of directions away from
/// same-team entities closer than `elbow_room`
pub(crate) fn separation_from_swarm(
    owner: &OwnerView,
    nearby: &[NearbyEntity],
    elbow_room: f32,
) -> Vec2 {
    let mut away = Vec2::ZERO;
    for entity in nearby {
        if entity.team != owner.team {
            continue;
        }
        let mut direction = (entity.center - owner.center).xz();
        let distance = direction.normalize_and_get_length();
        if distance > 0.0 && distance < elbow_room {
            away -= direction;
        }
    }
    away.normalize()
}

#[cfg(test)]
mod tests {
    use super::tests_support::{context, owner_at, player_at};
    use super::*;
    use voxbreak_math::Vec3;

    #[test]
    fn test_instances_share_no_state() {
        let config = BehaviorConfig::Kamikaze {
            explosion_damage: 3,
            explosion_radius: 8.0,
            explosion_impulse: 50.0,
            trigger_distance: 5.0,
            tick_duration: 2.0,
        };
        let original = config.clone();

        let catalog = AssetCatalog::new();
        let mut clock = Clock::new();
        let mut rng = SimRng::from_seed(1);

        let mut first = Behavior::instantiate(&config, &catalog, &clock, &mut rng);
        let mut second = Behavior::instantiate(&config, &catalog, &clock, &mut rng);

        // Drive the first instance into its terminal state
        let terrain = Terrain::flat(64, 64, 0);
        let nearby = [];
        let player = Some(player_at(Vec3::new(3.0, 0.0, 0.0)));
        let ctx = context(owner_at(Vec3::ZERO), player, &nearby, &terrain, &clock);
        first.update(&ctx, &mut rng);
        clock.advance(3.0);
        let ctx = context(owner_at(Vec3::ZERO), player, &nearby, &terrain, &clock);
        let actions = first.update(&ctx, &mut rng);
        assert!(actions.iter().any(|a| matches!(a, Action::Explode { .. })));

        // The sibling instance built from the same prototype is untouched:
        // it still pursues rather than exploding
        let far_player = Some(player_at(Vec3::new(30.0, 0.0, 0.0)));
        let ctx = context(owner_at(Vec3::ZERO), far_player, &nearby, &terrain, &clock);
        let actions = second.update(&ctx, &mut rng);
        assert!(actions.iter().any(|a| matches!(a, Action::Move { .. })));

        // And the prototype itself was never mutated
        assert_eq!(config, original);
    }

    #[test]
    fn test_instantiation_reconstructs_timers() {
        let config = BehaviorConfig::Charge {
            charge_duration: 2.0,
            rest_duration: 1.0,
            charge_speed: 100.0,
            knockback: 30.0,
            damage: 2,
        };

        let catalog = AssetCatalog::new();
        let mut clock = Clock::new();
        let mut rng = SimRng::from_seed(1);

        // Instances built late get timers anchored to the current clock,
        // not copies of some earlier instance's marks
        clock.advance(100.0);
        let behavior = Behavior::instantiate(&config, &catalog, &clock, &mut rng);
        match behavior {
            Behavior::Charge(_) => {}
            other => panic!("wrong variant: {other:?}"),
        }
    }
}
