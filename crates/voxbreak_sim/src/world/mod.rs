//! The world: entity ownership, the frame loop, and spatial queries
//!
//! [`World`] owns the master entity and particle lists and runs the fixed
//! per-frame order: entity update (timers, items, projectiles, players,
//! AI) → physics integration → ground collision → entity collision →
//! death sweep → particle update. Spawn scheduling sits outside in the
//! managers and is stepped by the embedder between frames.
//!
//! Entities are marked for delete during the frame and destroyed only in
//! the sweep, so no system ever sees a half-destructed entity. All
//! randomness flows through the world's seeded RNG; a run is reproducible
//! from (seed, fixed dt, catalog).

pub mod arena;
mod collision;
pub mod particles;
pub mod terrain;

use std::sync::Arc;

use log::debug;
use voxbreak_core::{Clock, SimRng};
use voxbreak_defs::campaign::SpawnPointData;
use voxbreak_defs::entity::{CollisionLayer, EntityDefinition};
use voxbreak_defs::AssetCatalog;
use voxbreak_math::{Vec2, Vec3};

use crate::behavior::{BehaviorContext, NearbyEntity, OwnerView, PlayerView};
use crate::combat::{ProjectileSpawn, ShooterView, Weapon};
use crate::entity::{DamageOutcome, Entity, SpawnTracker, Team};
use crate::events::{SimEvent, SoundId};
use crate::spawn::SpawnPoint;

pub use arena::{EntityArena, EntityHandle};
pub use particles::Particle;
pub use terrain::Terrain;

/// Radius of the standard AI awareness query
const AWARENESS_RADIUS: f32 = 10.0;

/// Seconds a dead player waits before respawning
const PLAYER_RESPAWN_TIME: f32 = 5.0;

/// Invincibility window granted on respawn
const PLAYER_RESPAWN_INVINCIBILITY: f32 = 2.0;

/// Score lost on death
const PLAYER_DEATH_SCORE_PENALTY: i32 = 100;

/// Degrees per second of bob phase for grounded items
const ITEM_BOB_RATE: f32 = 180.0;

/// Degrees per second grounded items spin
const ITEM_SPIN_RATE: f32 = 90.0;

/// The simulation world
pub struct World {
    pub(crate) catalog: Arc<AssetCatalog>,
    pub(crate) arena: EntityArena,
    pub(crate) particles: Vec<Particle>,
    pub(crate) spawn_points: Vec<SpawnPoint>,
    pub(crate) terrain: Terrain,
    pub(crate) clock: Clock,
    pub(crate) rng: SimRng,
    pub(crate) events: Vec<SimEvent>,
}

impl World {
    /// Create a world over a validated catalog and terrain
    pub fn new(catalog: Arc<AssetCatalog>, terrain: Terrain, seed: u64) -> Self {
        Self {
            catalog,
            arena: EntityArena::new(),
            particles: Vec::new(),
            spawn_points: Vec::new(),
            terrain,
            clock: Clock::new(),
            rng: SimRng::from_seed(seed),
            events: Vec::new(),
        }
    }

    // --- Accessors -------------------------------------------------------

    /// The frame clock
    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// The world's RNG; all simulation randomness flows through it
    pub fn rng_mut(&mut self) -> &mut SimRng {
        &mut self.rng
    }

    /// The definition catalog
    pub fn catalog(&self) -> &AssetCatalog {
        &self.catalog
    }

    /// The terrain heightmap
    pub fn terrain(&self) -> &Terrain {
        &self.terrain
    }

    /// Resolve an entity handle
    pub fn entity(&self, handle: EntityHandle) -> Option<&Entity> {
        self.arena.get(handle)
    }

    /// Resolve an entity handle mutably
    pub fn entity_mut(&mut self, handle: EntityHandle) -> Option<&mut Entity> {
        self.arena.get_mut(handle)
    }

    /// Number of live entities
    pub fn entity_count(&self) -> usize {
        self.arena.len()
    }

    /// Live particles, for rendering
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Add a loose particle (muzzle smoke, debris from collaborators)
    pub fn add_particle(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    /// Take this frame's outbound events
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    // --- Spawning --------------------------------------------------------

    /// Register a prepared entity, running its behavior's spawn setup
    pub fn add_entity(&mut self, entity: Entity) -> EntityHandle {
        let handle = self.arena.insert(entity);
        self.run_behavior_on_spawn(handle);
        handle
    }

    /// Spawn an entity by definition name at a position
    pub fn spawn_named(&mut self, name: &str, position: Vec3) -> Option<EntityHandle> {
        let definition = self.catalog.entity(name)?;
        let mut entity =
            Entity::from_definition(definition, &self.catalog, &self.clock, &mut self.rng);
        entity.position = position;
        Some(self.add_entity(entity))
    }

    /// Spawn a player entity, recording its respawn anchor
    pub fn spawn_player(&mut self, name: &str, position: Vec3) -> Option<EntityHandle> {
        let handle = self.spawn_named(name, position)?;
        if let Some(entity) = self.arena.get_mut(handle) {
            if let Some(player) = entity.player.as_mut() {
                player.spawn_position = position;
            }
        }
        Some(handle)
    }

    /// Install the spawn points a campaign or wave set declares
    pub fn install_spawn_points(&mut self, points: &[SpawnPointData]) {
        self.spawn_points = points.iter().map(SpawnPoint::new).collect();
    }

    /// Number of installed spawn points
    pub fn spawn_point_count(&self) -> usize {
        self.spawn_points.len()
    }

    /// Look at an installed spawn point
    pub fn spawn_point(&self, index: usize) -> Option<&SpawnPoint> {
        self.spawn_points.get(index)
    }

    /// Release one AI entity through a spawn point
    ///
    /// The entity lands on the enemy team with a tracker back-reference;
    /// the death sweep reports it back to the point exactly once.
    pub fn spawn_from_point(
        &mut self,
        point_index: usize,
        definition: &Arc<EntityDefinition>,
        event_id: Option<u32>,
    ) -> Option<EntityHandle> {
        let point = self.spawn_points.get(point_index)?;
        let mut position = point.jittered_position(&mut self.rng);
        position.y = self.terrain.height_at(position.xz());

        let mut entity = Entity::from_definition(
            Arc::clone(definition),
            &self.catalog,
            &self.clock,
            &mut self.rng,
        );
        entity.position = position;
        entity.team = Team::Enemy;
        entity.tracker = Some(SpawnTracker {
            point: point_index,
            event_id,
        });

        let handle = self.arena.insert(entity);
        self.spawn_points[point_index].track(handle);
        self.run_behavior_on_spawn(handle);
        Some(handle)
    }

    /// Register a projectile from a spawn request
    pub fn spawn_projectile(&mut self, spawn: ProjectileSpawn) -> Option<EntityHandle> {
        let mut entity = Entity::from_definition(
            spawn.definition,
            &self.catalog,
            &self.clock,
            &mut self.rng,
        );
        entity.position = spawn.position;
        entity.orientation = spawn.orientation;
        entity.team = spawn.team;

        // Bullets sort onto the firing side's layer
        if entity.projectile.is_some() {
            entity.collision_layer = match spawn.team {
                Team::Player => CollisionLayer::PlayerBullet,
                Team::Enemy => CollisionLayer::EnemyBullet,
                Team::Neutral => entity.collision_layer,
            };
        }

        if let Some(physics) = entity.physics.as_mut() {
            physics.set_velocity(spawn.velocity);
            if let Some(gravity) = spawn.gravity_override {
                physics.set_gravity(gravity);
            }
        }

        Some(self.arena.insert(entity))
    }

    // --- Queries ---------------------------------------------------------

    /// Live entities whose collision volume overlaps a sphere
    pub fn entities_overlapping_sphere(&self, center: Vec3, radius: f32) -> Vec<EntityHandle> {
        self.arena
            .iter()
            .filter(|(_, entity)| !entity.marked_for_delete)
            .filter(|(_, entity)| {
                let reach = radius + entity.collision_radius();
                (entity.center() - center).length_squared() <= reach * reach
            })
            .map(|(handle, _)| handle)
            .collect()
    }

    /// Live entities spawned by a scheduler event
    pub fn live_count_for_event(&self, event_id: u32) -> u32 {
        self.arena
            .iter()
            .filter(|(_, entity)| !entity.marked_for_delete)
            .filter(|(_, entity)| {
                matches!(entity.tracker, Some(tracker) if tracker.event_id == Some(event_id))
            })
            .count() as u32
    }

    /// Live spawned entities of a definition, across all spawn points
    pub fn live_count_for_definition(&self, name: &str) -> u32 {
        self.arena
            .iter()
            .filter(|(_, entity)| !entity.marked_for_delete && entity.tracker.is_some())
            .filter(|(_, entity)| entity.definition.name == name)
            .count() as u32
    }

    /// One step of the navigation service: the walkable neighbor cell that
    /// brings an entity closest to the nearest living player
    pub fn next_position_towards_player(&self, from: Vec3) -> Option<Vec3> {
        let player = self.closest_active_player_to(from)?;
        let from_xz = from.xz();

        let mut best: Option<(f32, Vec2)> = None;
        for (dx, dz) in [
            (1.0, 0.0),
            (-1.0, 0.0),
            (0.0, 1.0),
            (0.0, -1.0),
            (1.0, 1.0),
            (1.0, -1.0),
            (-1.0, 1.0),
            (-1.0, -1.0),
        ] {
            let candidate = from_xz + Vec2::new(dx, dz);
            if !self.terrain.is_walkable_step(from_xz, candidate) {
                continue;
            }
            let distance = (player.position.xz() - candidate).length_squared();
            if best.map_or(true, |(best_distance, _)| distance < best_distance) {
                best = Some((distance, candidate));
            }
        }

        best.map(|(_, step)| Vec3::new(step.x, self.terrain.height_at(step), step.y))
    }

    fn closest_active_player_to(&self, position: Vec3) -> Option<PlayerView> {
        self.arena
            .iter()
            .filter(|(_, entity)| entity.is_active_player())
            .min_by(|(_, a), (_, b)| {
                let da = (a.position - position).length_squared();
                let db = (b.position - position).length_squared();
                da.total_cmp(&db)
            })
            .map(|(_, entity)| PlayerView {
                position: entity.position,
                center: entity.center(),
            })
    }

    // --- Damage and area effects ----------------------------------------

    /// Apply damage with knockback, handling player-death bookkeeping
    pub fn damage_entity(&mut self, handle: EntityHandle, amount: i32, knockback: Vec3) {
        let Some(entity) = self.arena.get_mut(handle) else {
            return;
        };
        let was_player = entity.player.is_some();
        let outcome = entity.take_damage(amount, knockback);

        if outcome == DamageOutcome::Died && was_player {
            let clock = self.clock;
            if let Some(player) = self
                .arena
                .get_mut(handle)
                .and_then(|entity| entity.player.as_mut())
            {
                player.score -= PLAYER_DEATH_SCORE_PENALTY;
                player.respawn_timer.set_interval(&clock, PLAYER_RESPAWN_TIME);
            }
            self.events.push(SimEvent::ScoreChanged {
                player: handle,
                delta: -PLAYER_DEATH_SCORE_PENALTY,
            });
            self.events.push(SimEvent::Sound(SoundId::PlayerDeath));
        }
    }

    /// Area damage: hurt and push everything not on `team` within the
    /// radius, and crater the terrain underneath
    pub fn apply_explosion(
        &mut self,
        center: Vec3,
        team: Team,
        damage: i32,
        radius: f32,
        knockback: f32,
        instigator: Option<EntityHandle>,
    ) {
        let targets = self.entities_overlapping_sphere(center, radius);
        for handle in targets {
            if Some(handle) == instigator {
                continue;
            }
            let Some(entity) = self.arena.get(handle) else {
                continue;
            };
            if entity.team == team {
                continue;
            }

            let mut direction = entity.center() - center;
            if direction.normalize_and_get_length() <= 0.0 {
                direction = Vec3::UP;
            }
            self.damage_entity(handle, damage, direction * knockback);
        }

        let depth = (radius * 0.5).clamp(1.0, 8.0) as u8;
        self.terrain.destroy_disc(center, radius, depth);
        self.events.push(SimEvent::Sound(SoundId::Explosion));
    }

    /// Carve terrain without any damage
    pub fn destroy_terrain_disc(&mut self, center: Vec3, radius: f32, depth: u8) {
        self.terrain.destroy_disc(center, radius, depth);
    }

    // --- Player input surface -------------------------------------------

    /// Drive a player's movement intent for this frame
    pub fn player_move(&mut self, handle: EntityHandle, direction: Vec2) {
        let dt = self.clock.delta_seconds();
        if let Some(entity) = self.arena.get_mut(handle) {
            if entity.is_active_player() {
                entity.move_in_direction(direction, dt, None);
            }
        }
    }

    /// Make a player jump
    pub fn player_jump(&mut self, handle: EntityHandle) {
        if let Some(entity) = self.arena.get_mut(handle) {
            if entity.is_active_player() {
                entity.jump();
            }
        }
    }

    /// Fire a player's equipped weapon
    ///
    /// When a finite weapon runs dry it is swapped for the player
    /// definition's own (infinite) default weapon - ammo exhaustion is a
    /// silent downgrade, never an error.
    pub fn player_shoot(&mut self, handle: EntityHandle) {
        let clock = self.clock;

        let Some(entity) = self.arena.get_mut(handle) else {
            return;
        };
        if !entity.is_active_player() {
            return;
        }

        let shooter = ShooterView {
            center: entity.center(),
            orientation: entity.orientation,
            team: entity.team,
        };
        let own_definition = Arc::clone(&entity.definition);

        let Some(weapon) = entity.weapon.as_mut() else {
            return;
        };
        let spawns = weapon.shoot(&shooter, &clock, &mut self.rng);
        let ran_dry = weapon.is_out_of_ammo();

        if ran_dry {
            debug!("player weapon dry, falling back to default");
            if let Some(mut fallback) =
                Weapon::from_definition(&own_definition, &self.catalog, &clock)
            {
                fallback.set_infinite_ammo(true);
                if let Some(entity) = self.arena.get_mut(handle) {
                    entity.weapon = Some(fallback);
                }
            }
        }

        if !spawns.is_empty() {
            self.events.push(SimEvent::Sound(SoundId::Shoot));
        }
        for spawn in spawns {
            self.spawn_projectile(spawn);
        }
    }

    /// Equip a weapon built from a definition, replacing the current one
    pub fn equip_weapon(&mut self, handle: EntityHandle, definition: &Arc<EntityDefinition>) {
        let clock = self.clock;
        let weapon = Weapon::from_definition(definition, &self.catalog, &clock);
        if let Some(entity) = self.arena.get_mut(handle) {
            entity.weapon = weapon;
        }
    }

    /// Take an entity's equipped weapon away; ownership moves to the caller
    pub fn unequip_weapon(&mut self, handle: EntityHandle) -> Option<Weapon> {
        self.arena.get_mut(handle)?.weapon.take()
    }

    // --- The frame -------------------------------------------------------

    /// Advance the simulation by one fixed step
    pub fn update(&mut self, dt: f32) {
        self.clock.advance(dt);
        self.update_entities(dt);
        self.integrate_physics(dt);
        self.resolve_ground_collisions();
        self.run_collision_pass();
        self.sweep_deaths();
        particles::update_particles(&mut self.particles, dt);
    }

    fn update_entities(&mut self, dt: f32) {
        let clock = self.clock;
        let handles = self.arena.handles();

        // Housekeeping: timers, projectiles, items, respawns
        for &handle in &handles {
            let Some(entity) = self.arena.get_mut(handle) else {
                continue;
            };

            entity.tick_timers(dt);

            if let Some(projectile) = &entity.projectile {
                if !entity.marked_for_delete && projectile.lifetime.has_interval_elapsed(&clock) {
                    entity.marked_for_delete = true;
                    continue;
                }
            }

            if entity.item.is_some() {
                update_item(entity, &clock, dt);
            }

            let due_to_respawn = matches!(
                &entity.player,
                Some(player) if player.respawning && player.respawn_timer.has_interval_elapsed(&clock)
            );
            if due_to_respawn {
                let spawn_position = entity
                    .player
                    .as_ref()
                    .map(|player| player.spawn_position)
                    .unwrap_or(entity.position);
                entity.health = entity.definition.initial_health;
                entity.position = spawn_position;
                entity.set_invincibility_timer(PLAYER_RESPAWN_INVINCIBILITY);
                if let Some(player) = entity.player.as_mut() {
                    player.respawning = false;
                }
            }
        }

        self.update_behaviors(dt, &handles);
    }

    fn update_behaviors(&mut self, dt: f32, handles: &[EntityHandle]) {
        for &handle in handles {
            let Some(entity) = self.arena.get(handle) else {
                continue;
            };
            if entity.behavior.is_none() || entity.marked_for_delete {
                continue;
            }

            let owner = owner_view(handle, entity);
            let closest_player = self.closest_active_player_to(owner.position);
            let nearby = self.nearby_entities(handle, owner.center);
            let next_position = self.next_position_towards_player(owner.position);

            let Some(mut behavior) = self
                .arena
                .get_mut(handle)
                .and_then(|entity| entity.behavior.take())
            else {
                continue;
            };

            let actions = {
                let ctx = BehaviorContext {
                    owner,
                    closest_player,
                    nearby: &nearby,
                    next_position_towards_player: next_position,
                    terrain: &self.terrain,
                    clock: &self.clock,
                    dt,
                };
                behavior.update(&ctx, &mut self.rng)
            };

            if let Some(entity) = self.arena.get_mut(handle) {
                entity.behavior = Some(behavior);
            }
            self.apply_actions(handle, actions, dt);
        }
    }

    fn nearby_entities(&self, owner: EntityHandle, center: Vec3) -> Vec<NearbyEntity> {
        self.arena
            .iter()
            .filter(|(handle, entity)| *handle != owner && !entity.marked_for_delete)
            .filter(|(_, entity)| {
                let reach = AWARENESS_RADIUS + entity.collision_radius();
                (entity.center() - center).length_squared() <= reach * reach
            })
            .map(|(handle, entity)| NearbyEntity {
                handle,
                center: entity.center(),
                team: entity.team,
                physics_type: entity.definition.physics.physics_type,
            })
            .collect()
    }

    fn run_behavior_on_spawn(&mut self, handle: EntityHandle) {
        let Some(entity) = self.arena.get(handle) else {
            return;
        };
        if entity.behavior.is_none() {
            return;
        }

        let owner = owner_view(handle, entity);
        let closest_player = self.closest_active_player_to(owner.position);

        let Some(mut behavior) = self
            .arena
            .get_mut(handle)
            .and_then(|entity| entity.behavior.take())
        else {
            return;
        };

        let actions = {
            let ctx = BehaviorContext {
                owner,
                closest_player,
                nearby: &[],
                next_position_towards_player: None,
                terrain: &self.terrain,
                clock: &self.clock,
                dt: self.clock.delta_seconds(),
            };
            behavior.on_spawn(&ctx, &mut self.rng)
        };

        if let Some(entity) = self.arena.get_mut(handle) {
            entity.behavior = Some(behavior);
        }
        self.apply_actions(handle, actions, self.clock.delta_seconds());
    }

    /// Interpret the intents a behavior issued for its owner
    pub(crate) fn apply_actions(
        &mut self,
        owner: EntityHandle,
        actions: Vec<crate::behavior::Action>,
        dt: f32,
    ) {
        use crate::behavior::Action;

        for action in actions {
            match action {
                Action::Move {
                    direction,
                    speed_override,
                } => {
                    if let Some(entity) = self.arena.get_mut(owner) {
                        entity.move_in_direction(direction, dt, speed_override);
                    }
                }
                Action::Decelerate => {
                    if let Some(entity) = self.arena.get_mut(owner) {
                        entity.decelerate(dt);
                    }
                }
                Action::Jump => {
                    if let Some(entity) = self.arena.get_mut(owner) {
                        entity.jump();
                    }
                }
                Action::Face { degrees } => {
                    if let Some(entity) = self.arena.get_mut(owner) {
                        entity.orientation = degrees;
                    }
                }
                Action::StopAllMovement => {
                    if let Some(physics) = self
                        .arena
                        .get_mut(owner)
                        .and_then(|entity| entity.physics.as_mut())
                    {
                        physics.stop_all_movement();
                    }
                }
                Action::SetPhysicsEnabled(enabled) => {
                    if let Some(entity) = self.arena.get_mut(owner) {
                        entity.physics_enabled = enabled;
                    }
                }
                Action::Translate(delta) => {
                    if let Some(entity) = self.arena.get_mut(owner) {
                        entity.position += delta;
                    }
                }
                Action::SetPosition(position) => {
                    if let Some(entity) = self.arena.get_mut(owner) {
                        entity.position = position;
                    }
                }
                Action::SetCenterPosition(center) => {
                    if let Some(entity) = self.arena.get_mut(owner) {
                        let half_height = entity.definition.collision.height * 0.5;
                        entity.position = center - Vec3::UP * half_height;
                    }
                }
                Action::PlayAnimation(alias) => {
                    if let Some(animator) = self
                        .arena
                        .get_mut(owner)
                        .and_then(|entity| entity.animator.as_mut())
                    {
                        animator.play(alias, voxbreak_defs::animation::PlayMode::Default);
                    }
                }
                Action::FlashColor(color) => {
                    if let Some(entity) = self.arena.get_mut(owner) {
                        entity.flash(color);
                    }
                }
                Action::PlaySound(sound) => {
                    self.events.push(SimEvent::Sound(sound));
                }
                Action::SelfImpulse(impulse) => {
                    if let Some(physics) = self
                        .arena
                        .get_mut(owner)
                        .and_then(|entity| entity.physics.as_mut())
                    {
                        physics.add_impulse(impulse);
                    }
                }
                Action::DamageOther {
                    target,
                    amount,
                    knockback,
                } => {
                    self.damage_entity(target, amount, knockback);
                }
                Action::SpawnProjectile(spawn) => {
                    self.spawn_projectile(spawn);
                }
                Action::Explode {
                    damage,
                    radius,
                    knockback,
                } => {
                    let Some((center, team)) = self
                        .arena
                        .get(owner)
                        .map(|entity| (entity.bottom_center(), entity.team))
                    else {
                        continue;
                    };
                    self.apply_explosion(center, team, damage, radius, knockback, Some(owner));
                    if let Some(entity) = self.arena.get_mut(owner) {
                        entity.on_death();
                    }
                }
                Action::DestroyTerrainDisc { radius, depth } => {
                    if let Some(center) = self.arena.get(owner).map(|entity| entity.bottom_center())
                    {
                        self.terrain.destroy_disc(center, radius, depth);
                        self.events.push(SimEvent::Sound(SoundId::TerrainBreak));
                    }
                }
                Action::RadialBurst {
                    definition,
                    count,
                    speed,
                } => {
                    let Some((center, team)) = self
                        .arena
                        .get(owner)
                        .map(|entity| (entity.center(), entity.team))
                    else {
                        continue;
                    };
                    for index in 0..count {
                        let degrees = index as f32 * 360.0 / count as f32;
                        let direction = voxbreak_math::direction_at_degrees(degrees).to_xz(0.0);
                        self.spawn_projectile(ProjectileSpawn {
                            definition: Arc::clone(&definition),
                            position: center,
                            orientation: degrees,
                            velocity: direction * speed,
                            team,
                            gravity_override: None,
                        });
                    }
                }
                Action::Die => {
                    if let Some(entity) = self.arena.get_mut(owner) {
                        entity.on_death();
                    }
                }
            }
        }
    }

    fn integrate_physics(&mut self, dt: f32) {
        for handle in self.arena.handles() {
            let Some(entity) = self.arena.get_mut(handle) else {
                continue;
            };
            if !entity.physics_enabled || entity.marked_for_delete {
                continue;
            }

            let mass = entity.mass;
            let inverse_mass = entity.inverse_mass;
            if let Some(physics) = entity.physics.as_mut() {
                let outcome = physics.apply_step(dt, mass, inverse_mass);
                entity.position += outcome.position_delta;
                if outcome.cleared_grounded {
                    entity.grounded = false;
                }
            }
        }
    }

    fn resolve_ground_collisions(&mut self) {
        let mut detonations: Vec<(Vec3, Team, i32, f32, f32)> = Vec::new();

        for handle in self.arena.handles() {
            let Some(entity) = self.arena.get_mut(handle) else {
                continue;
            };
            if entity.marked_for_delete {
                continue;
            }

            let ground = self.terrain.height_at(entity.position.xz());
            if entity.position.y <= ground {
                // Projectiles don't land, they end; bombs crater
                if entity.projectile.is_some() {
                    let (damage, hit_radius, knockback) = entity
                        .definition
                        .projectile
                        .as_ref()
                        .map(|section| (section.damage, section.hit_radius, section.knockback))
                        .unwrap_or((0, 0.0, 0.0));
                    entity.marked_for_delete = true;
                    if hit_radius > 0.0 {
                        detonations.push((entity.center(), entity.team, damage, hit_radius, knockback));
                    }
                    continue;
                }

                entity.position.y = ground;
                let falling = entity.velocity().y <= 0.0;
                if falling {
                    if let Some(physics) = entity.physics.as_mut() {
                        physics.zero_y_velocity();
                    }
                    entity.grounded = true;
                }
            } else if !entity.physics_enabled {
                // Hovering entities learn they're airborne here; dynamic
                // ones get the flag cleared by their gravity step
                entity.grounded = false;
            }
        }

        for (center, team, damage, radius, knockback) in detonations {
            self.apply_explosion(center, team, damage, radius, knockback, None);
        }
    }

    /// Destroy everything marked for delete, running the layered death
    /// consequences; the only place entities are physically removed
    fn sweep_deaths(&mut self) {
        let marked: Vec<EntityHandle> = self
            .arena
            .iter()
            .filter(|(_, entity)| entity.marked_for_delete)
            .map(|(handle, _)| handle)
            .collect();

        for handle in marked {
            let Some(entity) = self.arena.remove(handle) else {
                continue;
            };

            // Report back to spawn bookkeeping exactly once
            if let Some(tracker) = entity.tracker {
                if let Some(point) = self.spawn_points.get_mut(tracker.point) {
                    point.stop_tracking(handle);
                }
            }

            // Loot roll
            if let Some(table_name) = &entity.definition.loot_table {
                if let Some(table) = self.catalog.loot_table(table_name) {
                    if let Some(item_name) = table.roll(&mut self.rng).map(str::to_string) {
                        if let Some(definition) = self.catalog.entity(&item_name) {
                            let mut item = Entity::from_definition(
                                definition,
                                &self.catalog,
                                &self.clock,
                                &mut self.rng,
                            );
                            item.position = entity.position;
                            self.arena.insert(item);
                        }
                    }
                }
            }

            let burst = particles::burst_for_entity(&entity, &mut self.rng);
            self.particles.extend(burst);

            let sound = if entity.player.is_some() {
                SoundId::PlayerDeath
            } else {
                SoundId::EnemyDeath
            };
            self.events.push(SimEvent::Sound(sound));
            self.events.push(SimEvent::EntityDied {
                entity: handle,
                position: entity.position,
            });
        }
    }
}

/// Build the owner snapshot a behavior reads
pub(crate) fn owner_view(handle: EntityHandle, entity: &Entity) -> OwnerView {
    OwnerView {
        handle,
        position: entity.position,
        center: entity.center(),
        orientation: entity.orientation,
        forward: entity.forward(),
        grounded: entity.grounded,
        team: entity.team,
        velocity: entity.velocity(),
        lateral_extent: entity.oriented_extents().x,
    }
}

/// Item housekeeping: settle onto the ground, then bob and spin
fn update_item(entity: &mut Entity, clock: &Clock, dt: f32) {
    if entity.grounded && entity.physics_enabled {
        entity.physics_enabled = false;
        let position = entity.position;
        if let Some(item) = entity.item.as_mut() {
            item.base_position = Some(position);
            item.bob_timer.reset(clock);
        }
    }

    if !entity.physics_enabled {
        let base = entity
            .item
            .as_ref()
            .and_then(|item| item.base_position)
            .unwrap_or(entity.position);
        let elapsed = entity
            .item
            .as_ref()
            .map(|item| item.bob_timer.elapsed_seconds(clock))
            .unwrap_or(0.0);
        let offset = 1.0 + (elapsed * ITEM_BOB_RATE).to_radians().sin();
        entity.position = base + Vec3::UP * offset;
        entity.orientation += ITEM_SPIN_RATE * dt;
    }
}
