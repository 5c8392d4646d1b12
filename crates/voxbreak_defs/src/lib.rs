//! Voxbreak Defs - the immutable definition registry
//!
//! Everything data-driven about the simulation lives here: entity
//! definitions, behavior prototypes, loot tables, animation sets, and the
//! campaign/wave spawn schedules. Definitions are loaded once at startup
//! into an [`AssetCatalog`], validated as a whole (dangling references are
//! load errors, not runtime surprises), and shared read-only afterwards.
//!
//! Loading is fail-fast: a broken content file is a build-time asset error,
//! so [`CatalogError`] is returned rather than limping along with partial
//! data. Runtime code never sees a half-loaded catalog.

pub mod animation;
pub mod behavior;
pub mod campaign;
pub mod catalog;
pub mod entity;
pub mod error;
pub mod loot;
pub mod wave;

pub use animation::AnimationSet;
pub use behavior::BehaviorConfig;
pub use campaign::{CampaignDefinition, CampaignStage, SpawnEventData, SpawnPointData};
pub use catalog::AssetCatalog;
pub use entity::{
    CollisionLayer, CollisionResponse, CollisionShape, EntityDefinition, EntityKind, PhysicsType,
    SpreadType, Team,
};
pub use error::CatalogError;
pub use loot::LootTable;
pub use wave::{Wave, WaveSet, WaveSpawnData};
