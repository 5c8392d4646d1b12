//! Headless campaign driver
//!
//! Loads a definition catalog, spawns a player, and runs a campaign at a
//! fixed 60 Hz step with no renderer attached. Useful for soak-testing the
//! simulation and for watching the schedulers work via `RUST_LOG=debug`.
//!
//! Usage: `headless-arena [data_dir] [campaign_name] [seconds]`
//! With no data directory, a small built-in catalog is used.

use std::process::ExitCode;
use std::sync::Arc;

use log::{error, info};
use voxbreak_defs::behavior::BehaviorConfig;
use voxbreak_defs::entity::{
    CollisionLayer, EntityDefinition, EntityKind, ProjectileSection, WeaponSection,
};
use voxbreak_defs::{AssetCatalog, CatalogError};
use voxbreak_math::{Vec2, Vec3};
use voxbreak_sim::spawn::CampaignManager;
use voxbreak_sim::world::{Terrain, World};
use voxbreak_sim::SimEvent;

const DT: f32 = 1.0 / 60.0;
const MAP_SIZE: u32 = 256;
const GROUND_HEIGHT: u8 = 8;

fn main() -> ExitCode {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let data_dir = args.next();
    let campaign_name = args.next().unwrap_or_else(|| "skirmish".to_string());
    let seconds: f32 = args
        .next()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(120.0);

    let catalog = match load_catalog(data_dir.as_deref()) {
        Ok(catalog) => Arc::new(catalog),
        Err(err) => {
            // Broken content is a build error, not something to limp past
            error!("failed to load definitions: {err}");
            return ExitCode::FAILURE;
        }
    };

    let Some(campaign) = catalog.campaign(&campaign_name) else {
        error!("no campaign named \"{campaign_name}\" in the catalog");
        return ExitCode::FAILURE;
    };

    let mut world = World::new(
        Arc::clone(&catalog),
        Terrain::flat(MAP_SIZE, MAP_SIZE, GROUND_HEIGHT),
        0x5EED,
    );
    let mut manager = CampaignManager::new(campaign, &mut world);

    let center = Vec3::new(
        MAP_SIZE as f32 * 0.5,
        GROUND_HEIGHT as f32,
        MAP_SIZE as f32 * 0.5,
    );
    let Some(player) = world.spawn_player("ranger", center) else {
        error!("catalog has no \"ranger\" player definition");
        return ExitCode::FAILURE;
    };

    manager.start_next_stage(&mut world);
    info!(
        "running \"{}\": {} stages, {:.0}s at {} Hz",
        campaign_name,
        manager.stage_count(),
        seconds,
        (1.0 / DT) as u32
    );

    let mut sounds = 0_u64;
    let frames = (seconds / DT) as u64;
    for frame in 0..frames {
        // A crude stand-in for input: strafe in a slow circle and shoot
        let angle = frame as f32 * 0.5;
        world.player_move(player, Vec2::new(angle.to_radians().cos(), angle.to_radians().sin()));
        world.player_shoot(player);

        world.update(DT);
        manager.update(&mut world);

        for event in world.drain_events() {
            if matches!(event, SimEvent::Sound(_)) {
                sounds += 1;
            }
        }

        if manager.is_current_stage_finished() {
            if manager.is_current_stage_final() {
                info!("campaign complete at frame {frame}");
                break;
            }
            manager.start_next_stage(&mut world);
        }
    }

    info!(
        "done: stage {}/{}, {} entities live, {} enemies left, {} sound events",
        manager.current_stage_number() + 1,
        manager.stage_count(),
        world.entity_count(),
        manager.enemy_count_left_in_stage(&world),
        sounds
    );
    ExitCode::SUCCESS
}

/// Load definitions from a directory, or fall back to the built-in set
fn load_catalog(data_dir: Option<&str>) -> Result<AssetCatalog, CatalogError> {
    match data_dir {
        Some(dir) => AssetCatalog::load_dir(dir),
        None => built_in_catalog(),
    }
}

/// A compact catalog exercising most of the behavior family
fn built_in_catalog() -> Result<AssetCatalog, CatalogError> {
    let mut catalog = AssetCatalog::new();

    let mut bullet = EntityDefinition::named("bullet");
    bullet.kind = EntityKind::Projectile;
    bullet.projectile = Some(ProjectileSection {
        speed: 120.0,
        lifetime: 1.5,
        damage: 2,
        hit_radius: 0.0,
        knockback: 10.0,
    });
    catalog.insert_entity(bullet)?;

    let mut bomb = EntityDefinition::named("bomb");
    bomb.kind = EntityKind::Projectile;
    bomb.physics.has_gravity = true;
    bomb.projectile = Some(ProjectileSection {
        speed: 0.0,
        lifetime: 6.0,
        damage: 4,
        hit_radius: 6.0,
        knockback: 40.0,
    });
    catalog.insert_entity(bomb)?;

    let mut blaster = EntityDefinition::named("blaster");
    blaster.kind = EntityKind::Item;
    blaster.weapon = Some(WeaponSection {
        projectile: "bullet".to_string(),
        fire_rate: 4.0,
        projectiles_per_shot: 1,
        ..WeaponSection::default()
    });
    catalog.insert_entity(blaster)?;

    let mut ranger = EntityDefinition::named("ranger");
    ranger.kind = EntityKind::Player;
    ranger.initial_health = 20;
    ranger.collision.layer = CollisionLayer::Player;
    ranger.physics.has_gravity = true;
    ranger.weapon = Some(WeaponSection {
        projectile: "bullet".to_string(),
        fire_rate: 3.0,
        ..WeaponSection::default()
    });
    catalog.insert_entity(ranger)?;

    let mut swarmer = EntityDefinition::named("swarmer");
    swarmer.initial_health = 2;
    swarmer.collision.layer = CollisionLayer::Enemy;
    swarmer.collision.contact_damage = 1;
    swarmer.collision.knockback = 15.0;
    swarmer.physics.has_gravity = true;
    swarmer
        .behaviors
        .push(BehaviorConfig::SwarmAndAvoid { elbow_room: 4.0 });
    catalog.insert_entity(swarmer)?;

    let mut bull = EntityDefinition::named("bull");
    bull.initial_health = 8;
    bull.collision.layer = CollisionLayer::Enemy;
    bull.physics.has_gravity = true;
    bull.behaviors.push(BehaviorConfig::Charge {
        charge_duration: 2.0,
        rest_duration: 1.0,
        charge_speed: 90.0,
        knockback: 30.0,
        damage: 2,
    });
    catalog.insert_entity(bull)?;

    let mut bomber = EntityDefinition::named("bomber");
    bomber.initial_health = 6;
    bomber.collision.layer = CollisionLayer::Enemy;
    bomber.behaviors.push(BehaviorConfig::Bomber {
        bomb: "bomb".to_string(),
        move_speed: 45.0,
        bomb_cooldown: 3.0,
        hover_height: 30.0,
    });
    catalog.insert_entity(bomber)?;

    let campaign = serde_campaign();
    catalog.insert_campaign(campaign)?;
    catalog.validate()?;
    Ok(catalog)
}

fn serde_campaign() -> voxbreak_defs::CampaignDefinition {
    use voxbreak_defs::campaign::{CampaignStage, SpawnEventData, SpawnPointData};

    let corner_points = vec![
        SpawnPointData {
            position: Vec3::new(40.0, 8.0, 40.0),
            radius: 6.0,
        },
        SpawnPointData {
            position: Vec3::new(216.0, 8.0, 216.0),
            radius: 6.0,
        },
    ];

    voxbreak_defs::CampaignDefinition {
        name: "skirmish".to_string(),
        spawn_points: corner_points,
        stages: vec![
            CampaignStage {
                name: "probing".to_string(),
                events: vec![SpawnEventData {
                    entity: "swarmer".to_string(),
                    count_to_spawn: 12,
                    spawn_rate: 3,
                    spawn_count_delay: 0,
                    spawn_time_delay: 0.0,
                    spawn_point: 0,
                }],
            },
            CampaignStage {
                name: "assault".to_string(),
                events: vec![
                    SpawnEventData {
                        entity: "swarmer".to_string(),
                        count_to_spawn: 16,
                        spawn_rate: 4,
                        spawn_count_delay: 0,
                        spawn_time_delay: 0.0,
                        spawn_point: 0,
                    },
                    SpawnEventData {
                        entity: "bull".to_string(),
                        count_to_spawn: 3,
                        spawn_rate: 1,
                        spawn_count_delay: 8,
                        spawn_time_delay: 10.0,
                        spawn_point: 1,
                    },
                    SpawnEventData {
                        entity: "bomber".to_string(),
                        count_to_spawn: 2,
                        spawn_rate: 1,
                        spawn_count_delay: 0,
                        spawn_time_delay: 20.0,
                        spawn_point: 1,
                    },
                ],
            },
        ],
    }
}
