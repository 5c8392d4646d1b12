//! Projectile hit resolution
//!
//! A projectile applies its damage to at most one entity: the first valid
//! contact marks it for delete synchronously, so any further contact in
//! the same collision pass sees the mark and resolves to nothing.

use voxbreak_math::Vec3;

use crate::entity::Entity;

/// Area explosion request produced by a projectile with a hit radius
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExplosionSpec {
    pub center: Vec3,
    pub damage: i32,
    pub radius: f32,
    pub knockback: f32,
}

/// Resolved effect of a projectile striking a target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileHit {
    pub damage: i32,
    pub knockback: Vec3,
    pub explosion: Option<ExplosionSpec>,
}

/// Work out what a projectile-target contact does, if anything
///
/// Returns `None` when the contact must be ignored: the projectile has
/// already spent its hit, the target is already dead, the teams match
/// (friendly fire guard), or the entity has no projectile capability.
/// The caller applies the hit and must mark the projectile for delete in
/// the same step.
pub fn resolve_hit(projectile: &Entity, target: &Entity) -> Option<ProjectileHit> {
    let section = projectile.definition.projectile.as_ref()?;
    projectile.projectile.as_ref()?;

    if projectile.marked_for_delete || target.marked_for_delete {
        return None;
    }
    if projectile.team == target.team {
        return None;
    }

    let travel = projectile.velocity().normalize();
    let knockback = travel * section.knockback;

    let explosion = (section.hit_radius > 0.0).then(|| ExplosionSpec {
        center: projectile.center(),
        damage: section.damage,
        radius: section.hit_radius,
        knockback: section.knockback,
    });

    Some(ProjectileHit {
        damage: section.damage,
        knockback,
        explosion,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use voxbreak_core::{Clock, SimRng};
    use voxbreak_defs::entity::{EntityDefinition, EntityKind, ProjectileSection, Team};
    use voxbreak_defs::AssetCatalog;

    fn projectile_entity(team: Team, damage: i32, hit_radius: f32) -> Entity {
        let mut def = EntityDefinition::named("bullet");
        def.kind = EntityKind::Projectile;
        def.projectile = Some(ProjectileSection {
            damage,
            hit_radius,
            knockback: 10.0,
            ..ProjectileSection::default()
        });

        let catalog = AssetCatalog::new();
        let clock = Clock::new();
        let mut rng = SimRng::from_seed(1);
        let mut entity = Entity::from_definition(Arc::new(def), &catalog, &clock, &mut rng);
        entity.team = team;
        entity
    }

    fn target_entity(team: Team) -> Entity {
        let mut def = EntityDefinition::named("grunt");
        def.initial_health = 10;
        let catalog = AssetCatalog::new();
        let clock = Clock::new();
        let mut rng = SimRng::from_seed(1);
        let mut entity = Entity::from_definition(Arc::new(def), &catalog, &clock, &mut rng);
        entity.team = team;
        entity
    }

    #[test]
    fn test_hit_on_opposing_team() {
        let bullet = projectile_entity(Team::Player, 2, 0.0);
        let enemy = target_entity(Team::Enemy);

        let hit = resolve_hit(&bullet, &enemy).expect("valid hit");
        assert_eq!(hit.damage, 2);
        assert_eq!(hit.explosion, None);
    }

    #[test]
    fn test_friendly_fire_ignored() {
        let bullet = projectile_entity(Team::Player, 2, 0.0);
        let friend = target_entity(Team::Player);
        assert!(resolve_hit(&bullet, &friend).is_none());
    }

    #[test]
    fn test_spent_projectile_ignored() {
        let mut bullet = projectile_entity(Team::Player, 2, 0.0);
        bullet.marked_for_delete = true;
        let enemy = target_entity(Team::Enemy);
        assert!(resolve_hit(&bullet, &enemy).is_none());
    }

    #[test]
    fn test_dead_target_ignored() {
        let bullet = projectile_entity(Team::Player, 2, 0.0);
        let mut enemy = target_entity(Team::Enemy);
        enemy.marked_for_delete = true;
        assert!(resolve_hit(&bullet, &enemy).is_none());
    }

    #[test]
    fn test_hit_radius_requests_explosion() {
        let bullet = projectile_entity(Team::Player, 4, 6.0);
        let enemy = target_entity(Team::Enemy);

        let hit = resolve_hit(&bullet, &enemy).expect("valid hit");
        let explosion = hit.explosion.expect("explosion requested");
        assert_eq!(explosion.radius, 6.0);
        assert_eq!(explosion.damage, 4);
    }
}
