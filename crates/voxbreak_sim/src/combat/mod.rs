//! Combat: weapons and projectile resolution

pub mod projectile;
pub mod weapon;

pub use projectile::{resolve_hit, ExplosionSpec, ProjectileHit};
pub use weapon::{ProjectileSpawn, ShooterView, Weapon, WEAPON_FIRE_OFFSET};
