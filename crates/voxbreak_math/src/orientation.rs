//! Degree-based orientation helpers
//!
//! Entities carry a single continuous yaw angle in degrees (no pitch/roll).
//! Rendering and oriented-extent queries quantize that yaw to the four
//! cardinal directions; movement uses the continuous value.

use crate::vector::Vec2;

/// One of the four yaw directions sprites can face
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Cardinal {
    East,
    North,
    West,
    South,
}

impl Cardinal {
    /// The yaw in degrees this cardinal represents
    #[inline]
    pub const fn degrees(self) -> f32 {
        match self {
            Self::East => 0.0,
            Self::North => 90.0,
            Self::West => 180.0,
            Self::South => 270.0,
        }
    }

    /// Whether the entity's local x/z extents swap when facing this way
    #[inline]
    pub const fn swaps_extents(self) -> bool {
        matches!(self, Self::North | Self::South)
    }
}

/// Unit direction in the XZ plane for a yaw in degrees
#[inline]
pub fn direction_at_degrees(degrees: f32) -> Vec2 {
    let radians = degrees.to_radians();
    Vec2::new(radians.cos(), radians.sin())
}

/// Signed shortest rotation from `from` to `to`, in (-180, 180]
pub fn angular_displacement(from: f32, to: f32) -> f32 {
    let mut delta = (to - from) % 360.0;
    if delta > 180.0 {
        delta -= 360.0;
    } else if delta <= -180.0 {
        delta += 360.0;
    }
    delta
}

/// Rotate `current` toward `goal` by at most `max_delta` degrees
pub fn turn_toward(current: f32, goal: f32, max_delta: f32) -> f32 {
    let delta = angular_displacement(current, goal);
    if delta.abs() <= max_delta {
        goal
    } else {
        current + max_delta.copysign(delta)
    }
}

/// Snap a continuous yaw to the nearest cardinal direction
pub fn snap_to_cardinal(degrees: f32) -> Cardinal {
    let wrapped = degrees.rem_euclid(360.0);
    let quadrant = ((wrapped + 45.0) / 90.0) as u32 % 4;
    match quadrant {
        0 => Cardinal::East,
        1 => Cardinal::North,
        2 => Cardinal::West,
        _ => Cardinal::South,
    }
}
