//! Entity definitions
//!
//! An [`EntityDefinition`] is the immutable, data-driven description of a
//! spawnable thing: its physics, collision footprint, movement tunables,
//! visuals, AI behavior prototypes, and (for projectiles and weapons) the
//! combat numbers. Definitions are loaded once and shared by reference;
//! live entities never mutate them.

use serde::{Deserialize, Serialize};

use crate::behavior::BehaviorConfig;

/// Which side an entity fights for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    Player,
    Enemy,
    /// Unaffiliated - items, scenery, unclaimed projectiles
    Neutral,
}

impl Default for Team {
    fn default() -> Self {
        Self::Neutral
    }
}

/// Broad class of entity a definition produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// AI-driven character
    Npc,
    /// Player-controlled character
    Player,
    /// Short-lived fired entity
    Projectile,
    /// Pickup lying in the world
    Item,
    /// Static scenery that participates in collision
    Scenery,
}

impl Default for EntityKind {
    fn default() -> Self {
        Self::Npc
    }
}

/// Whether an entity simulates dynamics or stays put
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhysicsType {
    Static,
    Dynamic,
}

impl Default for PhysicsType {
    fn default() -> Self {
        Self::Dynamic
    }
}

/// Shape of the collision boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionShape {
    None,
    Disc,
    Box,
}

impl Default for CollisionShape {
    fn default() -> Self {
        Self::Disc
    }
}

/// How an entity reacts to collision corrections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionResponse {
    /// Never moved by corrections
    NoCorrection,
    /// Splits the correction with the other entity
    ShareCorrection,
    /// Takes the whole correction itself
    FullCorrection,
}

impl Default for CollisionResponse {
    fn default() -> Self {
        Self::FullCorrection
    }
}

/// Collision layer, controlling which pairs of entities interact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionLayer {
    /// Collides with everything
    World,
    Player,
    Enemy,
    PlayerBullet,
    EnemyBullet,
    Item,
}

impl Default for CollisionLayer {
    fn default() -> Self {
        Self::World
    }
}

impl CollisionLayer {
    /// Whether entities on these two layers should collide at all
    ///
    /// Bullets ignore their own side; items only care about players.
    pub fn interacts_with(self, other: CollisionLayer) -> bool {
        use CollisionLayer::*;
        match (self, other) {
            (World, _) | (_, World) => true,
            (PlayerBullet, Player) | (Player, PlayerBullet) => false,
            (PlayerBullet, PlayerBullet) | (EnemyBullet, EnemyBullet) => false,
            (EnemyBullet, Enemy) | (Enemy, EnemyBullet) => false,
            (PlayerBullet, EnemyBullet) | (EnemyBullet, PlayerBullet) => false,
            (Item, Player) | (Player, Item) => true,
            (Item, _) | (_, Item) => false,
            _ => true,
        }
    }
}

/// Geometric pattern by which a weapon's projectiles diverge per shot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpreadType {
    /// All projectiles exactly along the wielder's forward vector
    None,
    /// Directions jittered uniformly per axis
    Random,
    /// Even horizontal fan centered on forward
    Fan,
    /// Forward direction, jittered spawn position
    Source,
}

impl Default for SpreadType {
    fn default() -> Self {
        Self::None
    }
}

/// Physics block of an entity definition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSection {
    /// Static entities never get a physics component
    pub physics_type: PhysicsType,
    pub has_gravity: bool,
    pub mass: f32,
    /// Per-axis speed clamp applied by the integrator
    pub max_speed: f32,
    /// Acceleration magnitude clamp applied by the integrator
    pub max_acceleration: f32,
}

impl Default for PhysicsSection {
    fn default() -> Self {
        Self {
            physics_type: PhysicsType::Dynamic,
            has_gravity: false,
            mass: 1.0,
            max_speed: 1000.0,
            max_acceleration: 1_000_000.0,
        }
    }
}

/// Collision block of an entity definition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionSection {
    pub shape: CollisionShape,
    pub response: CollisionResponse,
    pub layer: CollisionLayer,
    /// Half extent along local x
    pub x_extent: f32,
    /// Half extent along local z
    pub z_extent: f32,
    pub height: f32,
    pub can_destroy_voxels: bool,
    /// Impulse applied to the other entity on contact
    pub knockback: f32,
    /// Damage dealt to entities of the other team on contact
    pub contact_damage: i32,
}

impl Default for CollisionSection {
    fn default() -> Self {
        Self {
            shape: CollisionShape::Disc,
            response: CollisionResponse::FullCorrection,
            layer: CollisionLayer::World,
            x_extent: 4.0,
            z_extent: 4.0,
            height: 8.0,
            can_destroy_voxels: false,
            knockback: 0.0,
            contact_damage: 0,
        }
    }
}

/// Movement block of an entity definition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementSection {
    /// Top lateral speed self-driven movement aims for
    pub max_speed: f32,
    /// Change in velocity per second while accelerating
    pub max_acceleration: f32,
    /// Change in velocity per second while braking
    pub max_deceleration: f32,
    pub jump_impulse: f32,
}

impl Default for MovementSection {
    fn default() -> Self {
        Self {
            max_speed: 40.0,
            max_acceleration: 300.0,
            max_deceleration: 100.0,
            jump_impulse: 80.0,
        }
    }
}

/// Visuals block of an entity definition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualsSection {
    /// Animation set to translate clip aliases through
    pub animation_set: Option<String>,
    pub default_sprite: String,
}

impl Default for VisualsSection {
    fn default() -> Self {
        Self {
            animation_set: None,
            default_sprite: "default".to_string(),
        }
    }
}

/// Projectile block - present on definitions fired by weapons
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileSection {
    pub speed: f32,
    /// Seconds before the projectile self-deletes
    pub lifetime: f32,
    pub damage: i32,
    /// Nonzero turns a hit into an area explosion of this radius
    pub hit_radius: f32,
    /// Impulse applied to the struck entity along the travel direction
    pub knockback: f32,
}

impl Default for ProjectileSection {
    fn default() -> Self {
        Self {
            speed: 100.0,
            lifetime: 1.0,
            damage: 1,
            hit_radius: 0.0,
            knockback: 0.0,
        }
    }
}

/// Weapon block - present on definitions that can be equipped and fired
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponSection {
    /// Name of the projectile definition this weapon fires
    pub projectile: String,
    /// Shots per second
    pub fire_rate: f32,
    pub spread: SpreadType,
    /// Spread amount - degrees of arc for `fan`, per-axis jitter otherwise
    pub fire_spread: f32,
    pub projectiles_per_shot: u32,
    /// Starting ammo; 0 means infinite
    pub initial_ammo: u32,
}

impl Default for WeaponSection {
    fn default() -> Self {
        Self {
            projectile: "bullet".to_string(),
            fire_rate: 1.0,
            spread: SpreadType::None,
            fire_spread: 0.0,
            projectiles_per_shot: 1,
            initial_ammo: 0,
        }
    }
}

/// Immutable description of a spawnable entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityDefinition {
    pub name: String,
    #[serde(default)]
    pub kind: EntityKind,
    #[serde(default = "default_health")]
    pub initial_health: i32,
    #[serde(default)]
    pub physics: PhysicsSection,
    #[serde(default)]
    pub collision: CollisionSection,
    #[serde(default)]
    pub movement: MovementSection,
    #[serde(default)]
    pub visuals: VisualsSection,
    /// Behavior prototypes, cloned into fresh instances per spawned entity
    #[serde(default)]
    pub behaviors: Vec<BehaviorConfig>,
    #[serde(default)]
    pub projectile: Option<ProjectileSection>,
    #[serde(default)]
    pub weapon: Option<WeaponSection>,
    /// Loot table rolled when this entity dies
    #[serde(default)]
    pub loot_table: Option<String>,
}

fn default_health() -> i32 {
    1
}

impl EntityDefinition {
    /// Minimal definition for tests and programmatic catalogs
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntityKind::default(),
            initial_health: default_health(),
            physics: PhysicsSection::default(),
            collision: CollisionSection::default(),
            movement: MovementSection::default(),
            visuals: VisualsSection::default(),
            behaviors: Vec::new(),
            projectile: None,
            weapon: None,
            loot_table: None,
        }
    }

    /// Whether entities of this definition get a physics component
    #[inline]
    pub fn is_dynamic(&self) -> bool {
        self.physics.physics_type == PhysicsType::Dynamic
    }

    /// Seconds between shots for the weapon block, if any
    pub fn shoot_interval(&self) -> Option<f32> {
        self.weapon.as_ref().map(|w| 1.0 / w.fire_rate.max(1e-6))
    }
}
