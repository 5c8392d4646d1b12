//! Spawn points
//!
//! A spawn point is a position-plus-radius source that remembers which of
//! its offspring are still alive. The world's death sweep reports each
//! death back exactly once through [`SpawnPoint::stop_tracking`], so the
//! live count can never go negative or double-decrement.

use voxbreak_core::SimRng;
use voxbreak_defs::campaign::SpawnPointData;
use voxbreak_math::Vec3;

use crate::world::EntityHandle;

/// A population source entities are released from
#[derive(Debug, Clone)]
pub struct SpawnPoint {
    position: Vec3,
    radius: f32,
    spawned: Vec<EntityHandle>,
}

impl SpawnPoint {
    /// Build from loaded data
    pub fn new(data: &SpawnPointData) -> Self {
        Self {
            position: data.position,
            radius: data.radius,
            spawned: Vec::new(),
        }
    }

    /// The point's center position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// A spawn position jittered uniformly within the radius
    pub fn jittered_position(&self, rng: &mut SimRng) -> Vec3 {
        let offset = rng.unit_vec2() * rng.float_in_range(0.0, self.radius);
        self.position + Vec3::new(offset.x, 0.0, offset.y)
    }

    /// Record a freshly spawned entity
    pub fn track(&mut self, handle: EntityHandle) {
        self.spawned.push(handle);
    }

    /// Remove a dead entity from the tracking list
    ///
    /// Linear scan; per-point populations are small. Unknown handles are
    /// ignored so a stray double report cannot corrupt the count.
    pub fn stop_tracking(&mut self, handle: EntityHandle) {
        if let Some(index) = self.spawned.iter().position(|&h| h == handle) {
            self.spawned.swap_remove(index);
        }
    }

    /// Number of entities from this point still alive
    pub fn live_spawn_count(&self) -> usize {
        self.spawned.len()
    }

    /// Handles of the live entities from this point
    pub fn live_handles(&self) -> &[EntityHandle] {
        &self.spawned
    }
}
