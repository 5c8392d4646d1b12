//! Destructible heightmap terrain
//!
//! The full voxel grid and its meshing are render-side collaborators; the
//! simulation only needs a column-height view of the ground for landing
//! entities, walkability checks and crater destruction.

use voxbreak_math::{Vec2, Vec3};

/// Column heightmap the simulation stands on
#[derive(Debug, Clone)]
pub struct Terrain {
    width: u32,
    depth: u32,
    heights: Vec<u8>,
}

impl Terrain {
    /// Flat terrain of uniform height
    pub fn flat(width: u32, depth: u32, height: u8) -> Self {
        Self {
            width,
            depth,
            heights: vec![height; (width * depth) as usize],
        }
    }

    /// Terrain from explicit column heights, row-major by z
    pub fn from_heights(width: u32, depth: u32, heights: Vec<u8>) -> Self {
        debug_assert_eq!(heights.len(), (width * depth) as usize);
        Self {
            width,
            depth,
            heights,
        }
    }

    /// Width in voxels along x
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Depth in voxels along z
    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    fn index(&self, x: i32, z: i32) -> Option<usize> {
        if x < 0 || z < 0 || x >= self.width as i32 || z >= self.depth as i32 {
            return None;
        }
        Some((z as u32 * self.width + x as u32) as usize)
    }

    /// Ground height under a lateral position; out-of-bounds reads as 0
    pub fn height_at(&self, position: Vec2) -> f32 {
        match self.index(position.x.floor() as i32, position.y.floor() as i32) {
            Some(index) => self.heights[index] as f32,
            None => 0.0,
        }
    }

    /// Set one column's height, ignoring out-of-bounds writes
    pub fn set_height(&mut self, x: i32, z: i32, height: u8) {
        if let Some(index) = self.index(x, z) {
            self.heights[index] = height;
        }
    }

    /// Highest ground under a lateral footprint of half-extents `extents`
    pub fn height_for_bounds(&self, center: Vec2, extents: Vec2) -> f32 {
        let min_x = (center.x - extents.x).floor() as i32;
        let max_x = (center.x + extents.x).floor() as i32;
        let min_z = (center.y - extents.y).floor() as i32;
        let max_z = (center.y + extents.y).floor() as i32;

        let mut highest = 0.0_f32;
        for z in min_z..=max_z {
            for x in min_x..=max_x {
                if let Some(index) = self.index(x, z) {
                    highest = highest.max(self.heights[index] as f32);
                }
            }
        }
        highest
    }

    /// Carve a disc-shaped crater: columns within `radius` of `center`
    /// lose up to `depth` height
    pub fn destroy_disc(&mut self, center: Vec3, radius: f32, depth: u8) {
        let min_x = (center.x - radius).floor() as i32;
        let max_x = (center.x + radius).ceil() as i32;
        let min_z = (center.z - radius).floor() as i32;
        let max_z = (center.z + radius).ceil() as i32;
        let radius_squared = radius * radius;

        for z in min_z..=max_z {
            for x in min_x..=max_x {
                let offset = Vec2::new(x as f32 + 0.5 - center.x, z as f32 + 0.5 - center.z);
                if offset.length_squared() > radius_squared {
                    continue;
                }
                if let Some(index) = self.index(x, z) {
                    self.heights[index] = self.heights[index].saturating_sub(depth);
                }
            }
        }
    }

    /// Whether an entity can step from one column to a neighbor: at most
    /// one voxel up, any distance down
    pub fn is_walkable_step(&self, from: Vec2, to: Vec2) -> bool {
        self.height_at(to) - self.height_at(from) <= 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_heights() {
        let terrain = Terrain::flat(16, 16, 4);
        assert_eq!(terrain.height_at(Vec2::new(8.0, 8.0)), 4.0);
        assert_eq!(terrain.height_at(Vec2::new(-1.0, 8.0)), 0.0);
    }

    #[test]
    fn test_destroy_disc_carves_crater() {
        let mut terrain = Terrain::flat(16, 16, 10);
        terrain.destroy_disc(Vec3::new(8.0, 10.0, 8.0), 3.0, 4);

        // Center of the crater lost height
        assert_eq!(terrain.height_at(Vec2::new(8.0, 8.0)), 6.0);
        // Far outside is untouched
        assert_eq!(terrain.height_at(Vec2::new(1.0, 1.0)), 10.0);
    }

    #[test]
    fn test_destroy_disc_saturates_at_zero() {
        let mut terrain = Terrain::flat(8, 8, 2);
        terrain.destroy_disc(Vec3::new(4.0, 0.0, 4.0), 2.0, 10);
        assert_eq!(terrain.height_at(Vec2::new(4.0, 4.0)), 0.0);
    }

    #[test]
    fn test_height_for_bounds_takes_highest() {
        let mut terrain = Terrain::flat(8, 8, 2);
        terrain.set_height(3, 3, 7);
        let height = terrain.height_for_bounds(Vec2::new(3.0, 3.0), Vec2::new(1.5, 1.5));
        assert_eq!(height, 7.0);
    }

    #[test]
    fn test_walkable_step() {
        let mut terrain = Terrain::flat(8, 8, 2);
        terrain.set_height(4, 4, 3);
        terrain.set_height(5, 4, 6);

        let from = Vec2::new(3.5, 4.5);
        assert!(terrain.is_walkable_step(from, Vec2::new(4.5, 4.5)));
        assert!(!terrain.is_walkable_step(from, Vec2::new(5.5, 4.5)));
        // Dropping down is always allowed
        assert!(terrain.is_walkable_step(Vec2::new(5.5, 4.5), from));
    }
}
