//! Voxbreak Math - vectors and orientation helpers
//!
//! This crate provides the small math vocabulary the simulation uses:
//!
//! - [`Vec2`] / [`Vec3`] float vectors (Y-up, lateral movement in XZ)
//! - [`IntVec3`] voxel-grid coordinates
//! - [`Aabb3`] axis-aligned boxes for spawn areas
//! - Degree-based orientation helpers ([`direction_at_degrees`],
//!   [`turn_toward`], [`Cardinal`])
//!
//! Entity orientation in the game is a single yaw angle in degrees; all the
//! trigonometry here works in degrees for that reason.

pub mod bounds;
pub mod orientation;
pub mod vector;

pub use bounds::Aabb3;
pub use orientation::{
    angular_displacement, direction_at_degrees, snap_to_cardinal, turn_toward, Cardinal,
};
pub use vector::{IntVec3, Vec2, Vec3};
