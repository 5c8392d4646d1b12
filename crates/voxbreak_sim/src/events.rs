//! Outbound simulation events
//!
//! The audio system, scoreboard and stage flow are external collaborators;
//! the simulation communicates with them by queueing plain messages that
//! the embedder drains once per frame. Nothing in here carries callbacks.

use voxbreak_math::Vec3;

use crate::world::EntityHandle;

/// Sound effects the simulation requests, fire-and-forget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundId {
    EnemyDeath,
    PlayerDeath,
    Shoot,
    Explosion,
    KamikazeTick,
    ItemPickup,
    TerrainBreak,
}

/// Messages emitted by the simulation during a frame
#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    /// Play a sound effect
    Sound(SoundId),
    /// A player's score changed by `delta`
    ScoreChanged { player: EntityHandle, delta: i32 },
    /// An entity died at `position` (already handled internally; exposed
    /// for UI feedback such as kill counters)
    EntityDied { entity: EntityHandle, position: Vec3 },
}
