//! Forward-Euler linear dynamics
//!
//! Each dynamic entity owns one [`PhysicsComponent`]. Forces and impulses
//! accumulate between steps and are consumed exactly once per frame by
//! [`PhysicsComponent::apply_step`]; velocity persists across steps.

use voxbreak_math::Vec3;

/// Acceleration due to gravity, in voxels per second squared
pub const GRAVITY_MAGNITUDE: f32 = 200.0;

/// Result of one integration step, applied to the owning entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    /// Translation to add to the entity's position
    pub position_delta: Vec3,
    /// Whether the grounded flag must be pessimistically cleared
    /// (gravity was applied; ground collision may re-set it this frame)
    pub cleared_grounded: bool,
}

/// Per-entity linear-dynamics integrator
#[derive(Debug, Clone)]
pub struct PhysicsComponent {
    force: Vec3,
    impulse: Vec3,
    velocity: Vec3,
    affected_by_gravity: bool,
    max_speed: f32,
    max_acceleration: f32,
}

impl PhysicsComponent {
    /// Build from a definition's physics block
    pub fn new(section: &voxbreak_defs::entity::PhysicsSection) -> Self {
        Self {
            force: Vec3::ZERO,
            impulse: Vec3::ZERO,
            velocity: Vec3::ZERO,
            affected_by_gravity: section.has_gravity,
            max_speed: section.max_speed,
            max_acceleration: section.max_acceleration,
        }
    }

    /// Accumulate a force for the next step
    pub fn add_force(&mut self, force: Vec3) {
        self.force += force;
    }

    /// Accumulate an instantaneous impulse for the next step
    pub fn add_impulse(&mut self, impulse: Vec3) {
        self.impulse += impulse;
    }

    /// Add directly to the velocity
    pub fn add_velocity(&mut self, velocity: Vec3) {
        self.velocity += velocity;
    }

    /// Overwrite the velocity
    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    /// Zero the vertical velocity component
    pub fn zero_y_velocity(&mut self) {
        self.velocity.y = 0.0;
    }

    /// Immediately stop: zeroes velocity and both accumulators
    pub fn stop_all_movement(&mut self) {
        self.velocity = Vec3::ZERO;
        self.force = Vec3::ZERO;
        self.impulse = Vec3::ZERO;
    }

    /// Toggle gravity
    pub fn set_gravity(&mut self, affected: bool) {
        self.affected_by_gravity = affected;
    }

    /// Whether gravity is applied each step
    pub fn has_gravity(&self) -> bool {
        self.affected_by_gravity
    }

    /// Current velocity
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Run one forward-Euler step
    ///
    /// The caller is responsible for a finite, non-negative `dt`; this is
    /// an unconditional numeric step with no internal guard. Force and
    /// impulse accumulators are exactly zero afterwards.
    pub fn apply_step(&mut self, dt: f32, mass: f32, inverse_mass: f32) -> StepOutcome {
        // Impulse converts straight to velocity, no time scaling
        self.velocity += self.impulse * inverse_mass;

        let mut cleared_grounded = false;
        if self.affected_by_gravity {
            self.force += Vec3::DOWN * mass * GRAVITY_MAGNITUDE;
            cleared_grounded = true;
        }

        // Acceleration magnitude clamp preserves direction
        let mut acceleration = self.force * inverse_mass;
        let magnitude = acceleration.normalize_and_get_length();
        acceleration *= magnitude.clamp(0.0, self.max_acceleration);

        self.velocity += acceleration * dt;

        // Component-wise clamp: diagonal speed may exceed max_speed by up
        // to sqrt(2). The movement tuning depends on the anisotropy.
        self.velocity = self.velocity.clamp_axes(-self.max_speed, self.max_speed);

        let position_delta = self.velocity * dt;

        self.force = Vec3::ZERO;
        self.impulse = Vec3::ZERO;

        StepOutcome {
            position_delta,
            cleared_grounded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use voxbreak_defs::entity::PhysicsSection;

    fn component() -> PhysicsComponent {
        PhysicsComponent::new(&PhysicsSection::default())
    }

    #[test]
    fn test_step_is_deterministic() {
        let run = || {
            let mut physics = component();
            physics.add_force(Vec3::new(10.0, 0.0, 4.0));
            physics.add_impulse(Vec3::new(0.0, 3.0, 0.0));
            physics.apply_step(0.016, 1.0, 1.0)
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_accumulators_zeroed_after_step() {
        let mut physics = component();
        physics.add_force(Vec3::new(100.0, 0.0, 0.0));
        physics.add_impulse(Vec3::new(0.0, 50.0, 0.0));
        physics.apply_step(0.016, 1.0, 1.0);

        // A second step with no new input only integrates existing velocity
        let velocity_before = physics.velocity();
        physics.apply_step(0.016, 1.0, 1.0);
        assert_eq!(physics.velocity(), velocity_before);
    }

    #[test]
    fn test_impulse_ignores_dt() {
        let mut short = component();
        short.add_impulse(Vec3::new(8.0, 0.0, 0.0));
        short.apply_step(0.001, 2.0, 0.5);

        let mut long = component();
        long.add_impulse(Vec3::new(8.0, 0.0, 0.0));
        long.apply_step(0.1, 2.0, 0.5);

        // Both gained the same velocity from the impulse
        assert_relative_eq!(short.velocity().x, 4.0);
        assert_relative_eq!(long.velocity().x, 4.0);
    }

    #[test]
    fn test_gravity_adds_downward_velocity_and_clears_grounded() {
        let mut physics = component();
        physics.set_gravity(true);
        let outcome = physics.apply_step(0.1, 2.0, 0.5);

        assert!(outcome.cleared_grounded);
        assert_relative_eq!(physics.velocity().y, -GRAVITY_MAGNITUDE * 0.1, epsilon = 1e-4);
    }

    #[test]
    fn test_no_gravity_keeps_grounded() {
        let mut physics = component();
        let outcome = physics.apply_step(0.1, 1.0, 1.0);
        assert!(!outcome.cleared_grounded);
    }

    #[test]
    fn test_acceleration_clamp_preserves_direction() {
        let section = PhysicsSection {
            max_acceleration: 10.0,
            ..PhysicsSection::default()
        };
        let mut physics = PhysicsComponent::new(&section);
        physics.add_force(Vec3::new(300.0, 0.0, 400.0));
        physics.apply_step(1.0, 1.0, 1.0);

        let velocity = physics.velocity();
        assert_relative_eq!(velocity.length(), 10.0, epsilon = 1e-4);
        // Direction of the original force is preserved (3-4-5 triangle)
        assert_relative_eq!(velocity.x / velocity.z, 0.75, epsilon = 1e-4);
    }

    #[test]
    fn test_velocity_clamped_per_axis() {
        let section = PhysicsSection {
            max_speed: 10.0,
            ..PhysicsSection::default()
        };
        let mut physics = PhysicsComponent::new(&section);
        physics.set_velocity(Vec3::new(50.0, -50.0, 50.0));
        physics.apply_step(0.016, 1.0, 1.0);

        let velocity = physics.velocity();
        assert_eq!(velocity, Vec3::new(10.0, -10.0, 10.0));
        // Anisotropic by design: the diagonal exceeds max_speed
        assert!(velocity.length() > 10.0);
    }

    #[test]
    fn test_position_delta_matches_velocity() {
        let mut physics = component();
        physics.set_velocity(Vec3::new(2.0, 0.0, -4.0));
        let outcome = physics.apply_step(0.5, 1.0, 1.0);
        assert_eq!(outcome.position_delta, Vec3::new(1.0, 0.0, -2.0));
    }

    #[test]
    fn test_stop_all_movement() {
        let mut physics = component();
        physics.set_velocity(Vec3::new(5.0, 5.0, 5.0));
        physics.add_force(Vec3::new(1.0, 0.0, 0.0));
        physics.add_impulse(Vec3::new(1.0, 0.0, 0.0));
        physics.stop_all_movement();

        let outcome = physics.apply_step(0.016, 1.0, 1.0);
        assert_eq!(physics.velocity(), Vec3::ZERO);
        assert_eq!(outcome.position_delta, Vec3::ZERO);
    }
}
