//! End-to-end combat scenarios run through a full world

use std::sync::Arc;

use voxbreak_defs::behavior::BehaviorConfig;
use voxbreak_defs::entity::{
    CollisionLayer, EntityDefinition, EntityKind, ProjectileSection, WeaponSection,
};
use voxbreak_defs::AssetCatalog;
use voxbreak_math::{Vec2, Vec3};
use voxbreak_sim::combat::ProjectileSpawn;
use voxbreak_sim::events::{SimEvent, SoundId};
use voxbreak_sim::world::{Terrain, World};
use voxbreak_sim::Team;

const DT: f32 = 1.0 / 60.0;

fn catalog() -> Arc<AssetCatalog> {
    let mut catalog = AssetCatalog::new();

    let mut bullet = EntityDefinition::named("bullet");
    bullet.kind = EntityKind::Projectile;
    bullet.projectile = Some(ProjectileSection {
        speed: 100.0,
        lifetime: 1.0,
        damage: 2,
        hit_radius: 0.0,
        knockback: 0.0,
    });
    bullet.physics.has_gravity = false;
    catalog.insert_entity(bullet).unwrap();

    let mut hero = EntityDefinition::named("hero");
    hero.kind = EntityKind::Player;
    hero.initial_health = 10;
    hero.collision.layer = CollisionLayer::Player;
    hero.collision.x_extent = 1.0;
    hero.collision.z_extent = 1.0;
    hero.weapon = Some(WeaponSection {
        projectile: "bullet".to_string(),
        fire_rate: 2.0,
        ..WeaponSection::default()
    });
    catalog.insert_entity(hero).unwrap();

    let mut grunt = EntityDefinition::named("grunt");
    grunt.initial_health = 10;
    grunt.collision.layer = CollisionLayer::Enemy;
    catalog.insert_entity(grunt).unwrap();

    let mut boomer = EntityDefinition::named("boomer");
    boomer.initial_health = 5;
    boomer.collision.x_extent = 1.0;
    boomer.collision.z_extent = 1.0;
    boomer.behaviors.push(BehaviorConfig::Kamikaze {
        explosion_damage: 3,
        explosion_radius: 8.0,
        explosion_impulse: 50.0,
        trigger_distance: 5.0,
        tick_duration: 2.0,
    });
    catalog.insert_entity(boomer).unwrap();

    catalog.validate().unwrap();
    Arc::new(catalog)
}

fn world() -> World {
    World::new(catalog(), Terrain::flat(128, 128, 0), 42)
}

#[test]
fn bullet_hits_enemy_once_for_exact_damage() {
    let mut world = world();

    let player = world
        .spawn_player("hero", Vec3::new(10.0, 0.0, 10.0))
        .unwrap();
    let enemy = world.spawn_named("grunt", Vec3::new(20.0, 0.0, 10.0)).unwrap();
    world.entity_mut(enemy).unwrap().team = Team::Enemy;

    // Let the weapon's shoot interval elapse, then fire east at the enemy
    for _ in 0..40 {
        world.update(DT);
    }
    world.entity_mut(player).unwrap().orientation = 0.0;
    world.player_shoot(player);

    let terrain_before = world.terrain().height_at(Vec2::new(20.0, 10.0));
    for _ in 0..30 {
        world.update(DT);
    }

    // Direct damage applied exactly once, no area explosion (radius 0)
    assert_eq!(world.entity(enemy).unwrap().health, 8);
    assert_eq!(
        world.terrain().height_at(Vec2::new(20.0, 10.0)),
        terrain_before,
        "no explosion call for a zero hit radius"
    );
    // Projectile was swept after its one hit
    assert_eq!(world.entity_count(), 2);
}

#[test]
fn projectile_applies_at_most_one_hit() {
    let mut world = world();

    let first = world.spawn_named("grunt", Vec3::new(20.0, 0.0, 10.0)).unwrap();
    let second = world.spawn_named("grunt", Vec3::new(27.0, 0.0, 10.0)).unwrap();
    world.entity_mut(first).unwrap().team = Team::Enemy;
    world.entity_mut(second).unwrap().team = Team::Enemy;

    // A stationary projectile overlapping both enemies at once
    let bullet = world.catalog().entity("bullet").unwrap();
    world.spawn_projectile(ProjectileSpawn {
        definition: bullet,
        position: Vec3::new(23.5, 4.0, 10.0),
        orientation: 0.0,
        velocity: Vec3::ZERO,
        team: Team::Player,
        gravity_override: None,
    });

    world.update(DT);

    let health_first = world.entity(first).unwrap().health;
    let health_second = world.entity(second).unwrap().health;
    let total_damage = (10 - health_first) + (10 - health_second);
    assert_eq!(total_damage, 2, "only the first processed contact damaged");
    assert_eq!(health_first, 8, "fixed arena order hits the first enemy");
}

#[test]
fn invincibility_window_drops_damage() {
    let mut world = world();
    let enemy = world.spawn_named("grunt", Vec3::new(20.0, 0.0, 10.0)).unwrap();
    world.entity_mut(enemy).unwrap().team = Team::Enemy;
    world
        .entity_mut(enemy)
        .unwrap()
        .set_invincibility_timer(1.0);

    for _ in 0..5 {
        world.damage_entity(enemy, 3, Vec3::ZERO);
    }
    assert_eq!(world.entity(enemy).unwrap().health, 10);

    // Window elapses; exactly one application lands
    for _ in 0..70 {
        world.update(DT);
    }
    world.damage_entity(enemy, 3, Vec3::ZERO);
    assert_eq!(world.entity(enemy).unwrap().health, 7);
}

#[test]
fn kamikaze_freezes_in_range_then_detonates() {
    let mut world = world();

    let player = world
        .spawn_player("hero", Vec3::new(10.0, 0.0, 10.0))
        .unwrap();
    let boomer = world.spawn_named("boomer", Vec3::new(13.0, 0.0, 10.0)).unwrap();
    world.entity_mut(boomer).unwrap().team = Team::Enemy;

    // Distance 3 < trigger distance 5: first update freezes it in place
    world.update(DT);
    let position_after_first = world.entity(boomer).unwrap().position;

    for _ in 0..10 {
        world.update(DT);
    }
    let position_later = world.entity(boomer).unwrap().position;
    assert!(
        (position_later - position_after_first).length() < 0.01,
        "movement is frozen while ticking"
    );

    // Let the tick timer run out
    let mut exploded = false;
    for _ in 0..150 {
        world.update(DT);
        for event in world.drain_events() {
            if event == SimEvent::Sound(SoundId::Explosion) {
                exploded = true;
            }
        }
        if exploded {
            break;
        }
    }

    assert!(exploded, "tick timer expiry detonates");
    assert!(world.entity(boomer).is_none(), "the bomber died in the blast");
    assert!(
        world.entity(player).unwrap().health < 10,
        "the player caught the area damage"
    );
}

#[test]
fn dry_weapon_falls_back_to_default() {
    let mut catalog = AssetCatalog::new();

    let mut bullet = EntityDefinition::named("bullet");
    bullet.kind = EntityKind::Projectile;
    bullet.projectile = Some(ProjectileSection::default());
    catalog.insert_entity(bullet).unwrap();

    let mut hero = EntityDefinition::named("hero");
    hero.kind = EntityKind::Player;
    hero.initial_health = 10;
    hero.weapon = Some(WeaponSection {
        projectile: "bullet".to_string(),
        fire_rate: 100.0,
        initial_ammo: 2,
        ..WeaponSection::default()
    });
    catalog.insert_entity(hero).unwrap();
    catalog.validate().unwrap();

    let mut world = World::new(Arc::new(catalog), Terrain::flat(64, 64, 0), 7);
    let player = world.spawn_player("hero", Vec3::new(10.0, 0.0, 10.0)).unwrap();

    // Burn through the two rounds
    for _ in 0..12 {
        world.update(DT);
        world.player_shoot(player);
    }

    // The fallback weapon never runs dry
    let weapon = world.entity(player).unwrap().weapon.as_ref().unwrap();
    assert!(!weapon.is_out_of_ammo());
}

#[test]
fn fixed_seed_runs_are_identical() {
    let run = || {
        let mut world = world();
        world.spawn_player("hero", Vec3::new(10.0, 0.0, 10.0));
        let boomer = world.spawn_named("boomer", Vec3::new(60.0, 0.0, 60.0)).unwrap();
        world.entity_mut(boomer).unwrap().team = Team::Enemy;

        for _ in 0..120 {
            world.update(DT);
        }
        world.entity(boomer).map(|entity| entity.position)
    };

    assert_eq!(run(), run());
}
