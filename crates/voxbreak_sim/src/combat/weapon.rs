//! Weapons and projectile-set construction
//!
//! A weapon is rate-limited by its own polled stopwatch and spends ammo per
//! projectile spawned. Firing builds a set of projectile spawn requests
//! shaped by the definition's spread type; the world registers the
//! resulting entities.

use std::sync::Arc;

use voxbreak_core::{Clock, SimRng, Stopwatch};
use voxbreak_defs::entity::{EntityDefinition, SpreadType, Team};
use voxbreak_defs::AssetCatalog;
use voxbreak_math::{direction_at_degrees, Vec3};

/// Muzzle distance along the wielder's forward vector
pub const WEAPON_FIRE_OFFSET: f32 = 5.0;

/// What a weapon needs to know about its wielder to fire
#[derive(Debug, Clone, Copy)]
pub struct ShooterView {
    pub center: Vec3,
    pub orientation: f32,
    pub team: Team,
}

/// Request to register one projectile entity with the world
#[derive(Debug, Clone)]
pub struct ProjectileSpawn {
    pub definition: Arc<EntityDefinition>,
    pub position: Vec3,
    pub orientation: f32,
    pub velocity: Vec3,
    pub team: Team,
    /// Overrides the projectile definition's gravity flag when set
    pub gravity_override: Option<bool>,
}

/// A fire-capable attachment owned by the entity wielding it
#[derive(Debug, Clone)]
pub struct Weapon {
    definition: Arc<EntityDefinition>,
    projectile_definition: Arc<EntityDefinition>,
    shoot_timer: Stopwatch,
    spread: SpreadType,
    spread_amount: f32,
    projectiles_per_shot: u32,
    ammo_remaining: u32,
    infinite_ammo: bool,
}

impl Weapon {
    /// Build from a weapon-bearing definition; `None` when the definition
    /// has no weapon block or its projectile cannot be resolved
    pub fn from_definition(
        definition: &Arc<EntityDefinition>,
        catalog: &AssetCatalog,
        clock: &Clock,
    ) -> Option<Self> {
        let section = definition.weapon.as_ref()?;
        let projectile_definition = catalog.entity(&section.projectile)?;

        let interval = 1.0 / section.fire_rate.max(1e-6);
        let mut shoot_timer = Stopwatch::new(clock);
        shoot_timer.set_interval(clock, interval);

        Some(Self {
            projectile_definition,
            shoot_timer,
            spread: section.spread,
            spread_amount: section.fire_spread,
            projectiles_per_shot: section.projectiles_per_shot.max(1),
            ammo_remaining: section.initial_ammo,
            infinite_ammo: section.initial_ammo == 0,
            definition: Arc::clone(definition),
        })
    }

    /// Name of the weapon's own definition
    pub fn definition_name(&self) -> &str {
        &self.definition.name
    }

    /// Grant or revoke infinite ammo (AI weapons always fire forever)
    pub fn set_infinite_ammo(&mut self, infinite: bool) {
        self.infinite_ammo = infinite;
    }

    /// Ammo left; meaningless when infinite
    pub fn ammo_remaining(&self) -> u32 {
        self.ammo_remaining
    }

    /// Whether a finite weapon has run dry
    pub fn is_out_of_ammo(&self) -> bool {
        !self.infinite_ammo && self.ammo_remaining == 0
    }

    /// Fire if the shoot interval has elapsed, producing spawn requests
    ///
    /// A no-op (empty set) while the interval stopwatch has not ticked or
    /// the weapon is dry. Multiple elapsed intervals collapse into one
    /// volley; the stopwatch itself never drops accumulated time.
    pub fn shoot(
        &mut self,
        shooter: &ShooterView,
        clock: &Clock,
        rng: &mut SimRng,
    ) -> Vec<ProjectileSpawn> {
        if self.shoot_timer.decrement_by_interval_all(clock) == 0 {
            return Vec::new();
        }
        if self.is_out_of_ammo() {
            return Vec::new();
        }

        let forward = direction_at_degrees(shooter.orientation).to_xz(0.0);
        let muzzle = shooter.center + forward * WEAPON_FIRE_OFFSET;
        let speed = self
            .projectile_definition
            .projectile
            .as_ref()
            .map(|section| section.speed)
            .unwrap_or(100.0);

        let mut count = self.projectiles_per_shot;
        if !self.infinite_ammo {
            count = count.min(self.ammo_remaining);
        }

        let mut spawns = Vec::with_capacity(count as usize);
        for index in 0..count {
            let (position, direction) = match self.spread {
                SpreadType::None => (muzzle, forward),
                SpreadType::Fan => (muzzle, self.fan_direction(shooter.orientation, index, count)),
                SpreadType::Random => (muzzle, self.random_direction(forward, rng)),
                SpreadType::Source => (self.jittered_position(muzzle, forward, rng), forward),
            };

            spawns.push(ProjectileSpawn {
                definition: Arc::clone(&self.projectile_definition),
                position,
                orientation: direction.xz().orientation_degrees(),
                velocity: direction * speed,
                team: shooter.team,
                gravity_override: None,
            });

            if !self.infinite_ammo {
                self.ammo_remaining -= 1;
            }
        }

        spawns
    }

    /// Even horizontal fan symmetric about forward, `spread_amount` degrees
    /// of total arc spaced by `spread / count`
    fn fan_direction(&self, orientation: f32, index: u32, count: u32) -> Vec3 {
        let step = self.spread_amount / count as f32;
        let start = orientation - self.spread_amount * 0.5 + step * 0.5;
        direction_at_degrees(start + step * index as f32).to_xz(0.0)
    }

    /// Forward plus an independent uniform offset per axis, renormalized -
    /// a direction spread, not a position spread
    fn random_direction(&self, forward: Vec3, rng: &mut SimRng) -> Vec3 {
        let amount = self.spread_amount;
        let offset = Vec3::new(
            rng.float_in_range(-amount, amount),
            rng.float_in_range(-amount, amount),
            rng.float_in_range(-amount, amount),
        );
        let direction = forward + offset;
        let normalized = direction.normalize();
        if normalized == Vec3::ZERO {
            forward
        } else {
            normalized
        }
    }

    /// Exact forward direction with the spawn position jittered along the
    /// wielder's local up/right/forward axes
    fn jittered_position(&self, muzzle: Vec3, forward: Vec3, rng: &mut SimRng) -> Vec3 {
        let amount = self.spread_amount;
        let right = forward.xz().perpendicular().to_xz(0.0);
        muzzle
            + forward * rng.float_in_range(-amount, amount)
            + right * rng.float_in_range(-amount, amount)
            + Vec3::UP * rng.float_in_range(-amount, amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use voxbreak_defs::entity::{ProjectileSection, WeaponSection};

    fn catalog_with_bullet() -> AssetCatalog {
        let mut catalog = AssetCatalog::new();
        let mut bullet = EntityDefinition::named("bullet");
        bullet.projectile = Some(ProjectileSection {
            speed: 100.0,
            ..ProjectileSection::default()
        });
        catalog.insert_entity(bullet).expect("insert bullet");
        catalog
    }

    fn weapon(section: WeaponSection, clock: &Clock) -> Weapon {
        let catalog = catalog_with_bullet();
        let mut def = EntityDefinition::named("gun");
        def.weapon = Some(section);
        Weapon::from_definition(&Arc::new(def), &catalog, clock).expect("weapon builds")
    }

    fn shooter() -> ShooterView {
        ShooterView {
            center: Vec3::new(0.0, 4.0, 0.0),
            orientation: 0.0,
            team: Team::Player,
        }
    }

    #[test]
    fn test_rate_limited_by_interval() {
        let mut clock = Clock::new();
        let mut gun = weapon(
            WeaponSection {
                fire_rate: 2.0,
                ..WeaponSection::default()
            },
            &clock,
        );
        let mut rng = SimRng::from_seed(1);

        // Interval (0.5s) has not elapsed yet
        assert!(gun.shoot(&shooter(), &clock, &mut rng).is_empty());

        clock.advance(0.6);
        assert_eq!(gun.shoot(&shooter(), &clock, &mut rng).len(), 1);

        // Immediately again: still rate limited
        assert!(gun.shoot(&shooter(), &clock, &mut rng).is_empty());
    }

    #[test]
    fn test_no_spread_follows_forward() {
        let mut clock = Clock::new();
        let mut gun = weapon(WeaponSection::default(), &clock);
        let mut rng = SimRng::from_seed(1);
        clock.advance(1.5);

        let spawns = gun.shoot(&shooter(), &clock, &mut rng);
        assert_eq!(spawns.len(), 1);
        let spawn = &spawns[0];
        assert_relative_eq!(spawn.velocity.x, 100.0, epsilon = 1e-3);
        assert_relative_eq!(spawn.velocity.z, 0.0, epsilon = 1e-3);
        // Muzzle offset along forward
        assert_relative_eq!(spawn.position.x, WEAPON_FIRE_OFFSET, epsilon = 1e-3);
    }

    #[test]
    fn test_fan_spread_is_symmetric() {
        let mut clock = Clock::new();
        let mut gun = weapon(
            WeaponSection {
                spread: SpreadType::Fan,
                fire_spread: 60.0,
                projectiles_per_shot: 4,
                ..WeaponSection::default()
            },
            &clock,
        );
        let mut rng = SimRng::from_seed(1);
        clock.advance(1.5);

        let spawns = gun.shoot(&shooter(), &clock, &mut rng);
        assert_eq!(spawns.len(), 4);

        let orientations: Vec<f32> = spawns.iter().map(|s| s.orientation).collect();
        // 60 degrees total, 15 apart, centered on 0
        assert_relative_eq!(orientations[0], -22.5, epsilon = 1e-3);
        assert_relative_eq!(orientations[1], -7.5, epsilon = 1e-3);
        assert_relative_eq!(orientations[2], 7.5, epsilon = 1e-3);
        assert_relative_eq!(orientations[3], 22.5, epsilon = 1e-3);
    }

    #[test]
    fn test_source_spread_jitters_position_not_direction() {
        let mut clock = Clock::new();
        let mut gun = weapon(
            WeaponSection {
                spread: SpreadType::Source,
                fire_spread: 2.0,
                projectiles_per_shot: 8,
                ..WeaponSection::default()
            },
            &clock,
        );
        let mut rng = SimRng::from_seed(9);
        clock.advance(1.5);

        let spawns = gun.shoot(&shooter(), &clock, &mut rng);
        assert_eq!(spawns.len(), 8);
        let mut any_position_differs = false;
        for spawn in &spawns {
            assert_relative_eq!(spawn.orientation, 0.0, epsilon = 1e-3);
            if (spawn.position - spawns[0].position).length() > 1e-6 {
                any_position_differs = true;
            }
        }
        assert!(any_position_differs);
    }

    #[test]
    fn test_random_spread_jitters_direction() {
        let mut clock = Clock::new();
        let mut gun = weapon(
            WeaponSection {
                spread: SpreadType::Random,
                fire_spread: 0.5,
                projectiles_per_shot: 8,
                ..WeaponSection::default()
            },
            &clock,
        );
        let mut rng = SimRng::from_seed(9);
        clock.advance(1.5);

        let spawns = gun.shoot(&shooter(), &clock, &mut rng);
        let mut any_direction_differs = false;
        for spawn in &spawns {
            assert_eq!(spawn.position, spawns[0].position);
            if (spawn.velocity - spawns[0].velocity).length() > 1e-3 {
                any_direction_differs = true;
            }
        }
        assert!(any_direction_differs);
    }

    #[test]
    fn test_ammo_spent_per_projectile() {
        let mut clock = Clock::new();
        let mut gun = weapon(
            WeaponSection {
                spread: SpreadType::Fan,
                fire_spread: 30.0,
                projectiles_per_shot: 3,
                initial_ammo: 5,
                ..WeaponSection::default()
            },
            &clock,
        );
        let mut rng = SimRng::from_seed(1);

        clock.advance(1.5);
        assert_eq!(gun.shoot(&shooter(), &clock, &mut rng).len(), 3);
        assert_eq!(gun.ammo_remaining(), 2);

        // Second volley is capped by remaining ammo
        clock.advance(1.5);
        assert_eq!(gun.shoot(&shooter(), &clock, &mut rng).len(), 2);
        assert!(gun.is_out_of_ammo());

        clock.advance(1.5);
        assert!(gun.shoot(&shooter(), &clock, &mut rng).is_empty());
    }

    #[test]
    fn test_infinite_ammo_never_runs_dry() {
        let mut clock = Clock::new();
        let mut gun = weapon(WeaponSection::default(), &clock);
        let mut rng = SimRng::from_seed(1);

        for _ in 0..10 {
            clock.advance(1.5);
            assert_eq!(gun.shoot(&shooter(), &clock, &mut rng).len(), 1);
        }
        assert!(!gun.is_out_of_ammo());
    }
}
