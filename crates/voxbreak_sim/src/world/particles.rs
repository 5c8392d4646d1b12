//! Debris particles
//!
//! Dying entities burst into short-lived gravity-affected particles. The
//! renderer draws them; the simulation only integrates and expires them.

use voxbreak_core::SimRng;
use voxbreak_math::Vec3;

use crate::entity::{Color, Entity};
use crate::physics::GRAVITY_MAGNITUDE;

/// Particles per lateral voxel of the dying entity's footprint
const PARTICLES_PER_VOXEL: u32 = 2;

/// How long a debris particle lives
const PARTICLE_LIFETIME: f32 = 1.5;

/// One debris particle
#[derive(Debug, Clone)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    pub remaining: f32,
    pub color: Color,
}

/// Integrate particles and drop the expired ones
pub(crate) fn update_particles(particles: &mut Vec<Particle>, dt: f32) {
    for particle in particles.iter_mut() {
        particle.velocity.y -= GRAVITY_MAGNITUDE * dt;
        particle.position += particle.velocity * dt;
        particle.remaining -= dt;
    }
    particles.retain(|particle| particle.remaining > 0.0);
}

/// Burst an entity's footprint into debris
pub(crate) fn burst_for_entity(entity: &Entity, rng: &mut SimRng) -> Vec<Particle> {
    let extents = entity.oriented_extents();
    let footprint = (extents.x * 2.0).max(1.0) * (extents.y * 2.0).max(1.0);
    let count = (footprint as u32).max(1) * PARTICLES_PER_VOXEL;

    let color = entity.color_override.unwrap_or([200, 200, 200]);
    let center = entity.center();

    let mut particles = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let offset = Vec3::new(
            rng.float_in_range(-extents.x, extents.x),
            rng.float_in_range(0.0, entity.definition.collision.height),
            rng.float_in_range(-extents.y, extents.y),
        );
        let velocity = Vec3::new(
            rng.float_in_range(-20.0, 20.0),
            rng.float_in_range(20.0, 60.0),
            rng.float_in_range(-20.0, 20.0),
        );
        particles.push(Particle {
            position: center + offset,
            velocity,
            remaining: rng.float_in_range(PARTICLE_LIFETIME * 0.5, PARTICLE_LIFETIME),
            color,
        });
    }
    particles
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use voxbreak_core::{Clock, SimRng};
    use voxbreak_defs::entity::EntityDefinition;
    use voxbreak_defs::AssetCatalog;

    #[test]
    fn test_particles_fall_and_expire() {
        let mut particles = vec![Particle {
            position: Vec3::new(0.0, 10.0, 0.0),
            velocity: Vec3::ZERO,
            remaining: 0.1,
            color: [255, 255, 255],
        }];

        update_particles(&mut particles, 0.05);
        assert_eq!(particles.len(), 1);
        assert!(particles[0].position.y < 10.0);

        update_particles(&mut particles, 0.1);
        assert!(particles.is_empty());
    }

    #[test]
    fn test_burst_scales_with_footprint() {
        let catalog = AssetCatalog::new();
        let clock = Clock::new();
        let mut rng = SimRng::from_seed(2);

        let small = Entity::from_definition(
            Arc::new(EntityDefinition::named("small")),
            &catalog,
            &clock,
            &mut rng,
        );
        let mut big_def = EntityDefinition::named("big");
        big_def.collision.x_extent = 8.0;
        big_def.collision.z_extent = 8.0;
        let big = Entity::from_definition(Arc::new(big_def), &catalog, &clock, &mut rng);

        let small_burst = burst_for_entity(&small, &mut rng);
        let big_burst = burst_for_entity(&big, &mut rng);
        assert!(big_burst.len() > small_burst.len());
    }
}
