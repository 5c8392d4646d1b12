//! Voxbreak Sim - the entity simulation core
//!
//! This crate implements the per-frame simulation of a voxel action game:
//!
//! - a generational [`world::EntityArena`] owning every live entity
//! - forward-Euler [`physics::PhysicsComponent`] integration
//! - the [`behavior::Behavior`] family of AI state machines
//! - [`combat`] weapon firing and projectile resolution
//! - [`spawn`] population scheduling (campaign stages and wave corridors)
//!
//! Everything runs single-threaded in a fixed per-frame order driven by
//! [`world::World::update`]: entity update → physics integration → ground
//! collision → entity collision → death sweep. Spawn scheduling sits
//! outside the world in [`spawn::CampaignManager`] / [`spawn::WaveManager`]
//! and is stepped by the embedder between frames. Deletion is deferred -
//! entities are marked during the frame and destroyed only at the sweep,
//! so no system ever observes a half-dead entity.

pub mod animation;
pub mod behavior;
pub mod combat;
pub mod entity;
pub mod events;
pub mod physics;
pub mod spawn;
pub mod world;

pub use entity::{Entity, Team};
pub use events::{SimEvent, SoundId};
pub use world::{EntityHandle, World};
