//! Entity-entity collision detection, correction, and contact hooks
//!
//! Pairs are detected against a frame-start snapshot, then resolved in
//! fixed arena order: position correction, projectile resolution, behavior
//! contact hooks, item pickup, contact damage. A projectile marking itself
//! in an early pair is seen by every later pair in the same pass, which is
//! what enforces at-most-one-hit.

use std::sync::Arc;

use voxbreak_defs::entity::{CollisionLayer, CollisionResponse, CollisionShape, PhysicsType};
use voxbreak_math::{Vec2, Vec3};

use crate::behavior::Contact;
use crate::combat::resolve_hit;
use crate::events::{SimEvent, SoundId};
use crate::world::{owner_view, EntityHandle, World};

/// Snapshot of one entity's collision geometry
struct CollisionBody {
    handle: EntityHandle,
    center: Vec3,
    half_extents: Vec2,
    radius: f32,
    min_y: f32,
    height: f32,
    shape: CollisionShape,
    response: CollisionResponse,
    layer: CollisionLayer,
    is_static: bool,
}

/// One detected overlap, with the push-apart direction from a toward b
struct Overlap {
    a: EntityHandle,
    b: EntityHandle,
    direction: Vec2,
    penetration: f32,
}

impl World {
    /// Detect and resolve every colliding pair this frame
    pub(crate) fn run_collision_pass(&mut self) {
        let overlaps = self.detect_overlaps();
        for overlap in overlaps {
            self.correct_pair(&overlap);
            // Both orderings of each hook, a-then-b in arena order
            self.resolve_projectile_contact(overlap.a, overlap.b);
            self.resolve_projectile_contact(overlap.b, overlap.a);
            self.run_contact_hook(overlap.a, overlap.b);
            self.run_contact_hook(overlap.b, overlap.a);
            self.try_item_pickup(overlap.a, overlap.b);
            self.try_item_pickup(overlap.b, overlap.a);
            self.apply_contact_damage(overlap.a, overlap.b);
            self.apply_contact_damage(overlap.b, overlap.a);
        }
    }

    fn detect_overlaps(&self) -> Vec<Overlap> {
        let bodies: Vec<CollisionBody> = self
            .arena
            .iter()
            .filter(|(_, entity)| !entity.marked_for_delete)
            .filter(|(_, entity)| entity.definition.collision.shape != CollisionShape::None)
            .map(|(handle, entity)| {
                let collision = &entity.definition.collision;
                CollisionBody {
                    handle,
                    center: entity.center(),
                    half_extents: entity.oriented_extents(),
                    radius: entity.collision_radius(),
                    min_y: entity.position.y,
                    height: collision.height,
                    shape: collision.shape,
                    response: collision.response,
                    layer: entity.collision_layer,
                    is_static: entity.definition.physics.physics_type == PhysicsType::Static,
                }
            })
            .collect();

        let mut overlaps = Vec::new();
        for i in 0..bodies.len() {
            for j in (i + 1)..bodies.len() {
                let a = &bodies[i];
                let b = &bodies[j];

                if a.is_static && b.is_static {
                    continue;
                }
                if !a.layer.interacts_with(b.layer) {
                    continue;
                }

                let vertical = a.min_y < b.min_y + b.height && b.min_y < a.min_y + a.height;
                if !vertical {
                    continue;
                }

                if let Some((direction, penetration)) = lateral_overlap(a, b) {
                    overlaps.push(Overlap {
                        a: a.handle,
                        b: b.handle,
                        direction,
                        penetration,
                    });
                }
            }
        }
        overlaps
    }

    /// Push an overlapping pair apart according to their responses
    fn correct_pair(&mut self, overlap: &Overlap) {
        let weight = |handle: EntityHandle| -> f32 {
            let Some(entity) = self.arena.get(handle) else {
                return 0.0;
            };
            if entity.definition.physics.physics_type == PhysicsType::Static {
                return 0.0;
            }
            match entity.definition.collision.response {
                CollisionResponse::NoCorrection => 0.0,
                CollisionResponse::ShareCorrection => 0.5,
                CollisionResponse::FullCorrection => 1.0,
            }
        };

        let weight_a = weight(overlap.a);
        let weight_b = weight(overlap.b);
        let total = weight_a + weight_b;
        if total <= 0.0 {
            return;
        }

        let push = overlap.direction * overlap.penetration;
        if let Some(entity) = self.arena.get_mut(overlap.a) {
            entity.position -= (push * (weight_a / total)).to_xz(0.0);
        }
        if let Some(entity) = self.arena.get_mut(overlap.b) {
            entity.position += (push * (weight_b / total)).to_xz(0.0);
        }
    }

    /// Resolve one direction of a possible projectile strike
    fn resolve_projectile_contact(&mut self, projectile: EntityHandle, target: EntityHandle) {
        let hit = {
            let (Some(shooter), Some(struck)) =
                (self.arena.get(projectile), self.arena.get(target))
            else {
                return;
            };
            match resolve_hit(shooter, struck) {
                Some(hit) => (hit, shooter.team),
                None => return,
            }
        };
        let (hit, team) = hit;

        self.damage_entity(target, hit.damage, hit.knockback);

        if let Some(explosion) = hit.explosion {
            self.apply_explosion(
                explosion.center,
                team,
                explosion.damage,
                explosion.radius,
                explosion.knockback,
                Some(projectile),
            );
        }

        // The hit is spent the moment it lands; later pairs in this same
        // pass see the mark and ignore the projectile
        if let Some(entity) = self.arena.get_mut(projectile) {
            entity.marked_for_delete = true;
        }
    }

    /// Deliver the contact to one side's behavior, if it has one
    fn run_contact_hook(&mut self, owner: EntityHandle, other: EntityHandle) {
        let contact = {
            let Some(entity) = self.arena.get(other) else {
                return;
            };
            Contact {
                other,
                other_team: entity.team,
                other_is_player: entity.player.is_some(),
                other_center: entity.center(),
                other_bottom_center: entity.bottom_center(),
            }
        };

        let view = {
            let Some(entity) = self.arena.get(owner) else {
                return;
            };
            if entity.behavior.is_none() || entity.marked_for_delete {
                return;
            }
            owner_view(owner, entity)
        };

        let Some(mut behavior) = self
            .arena
            .get_mut(owner)
            .and_then(|entity| entity.behavior.take())
        else {
            return;
        };
        let actions = behavior.on_entity_collision(&view, &contact);
        if let Some(entity) = self.arena.get_mut(owner) {
            entity.behavior = Some(behavior);
        }

        let dt = self.clock.delta_seconds();
        self.apply_actions(owner, actions, dt);
    }

    /// Items hand themselves to the first player that touches them
    fn try_item_pickup(&mut self, item: EntityHandle, player: EntityHandle) {
        let definition = {
            let Some(entity) = self.arena.get(item) else {
                return;
            };
            if entity.item.is_none() || entity.marked_for_delete {
                return;
            }
            Arc::clone(&entity.definition)
        };

        let player_alive = self
            .arena
            .get(player)
            .is_some_and(|entity| entity.is_active_player());
        if !player_alive {
            return;
        }

        // Weapons transfer ownership on pickup
        if definition.weapon.is_some() {
            self.equip_weapon(player, &definition);
        }

        if let Some(entity) = self.arena.get_mut(item) {
            entity.marked_for_delete = true;
        }
        self.events.push(SimEvent::Sound(SoundId::ItemPickup));
    }

    /// Raw body contact damage, for entities that hurt by touch
    fn apply_contact_damage(&mut self, source: EntityHandle, target: EntityHandle) {
        let (amount, knockback, source_team, source_center) = {
            let Some(entity) = self.arena.get(source) else {
                return;
            };
            let collision = &entity.definition.collision;
            // Projectiles damage through their own resolution path
            if collision.contact_damage <= 0
                || entity.projectile.is_some()
                || entity.marked_for_delete
            {
                return;
            }
            (
                collision.contact_damage,
                collision.knockback,
                entity.team,
                entity.center(),
            )
        };

        let direction = {
            let Some(entity) = self.arena.get(target) else {
                return;
            };
            if entity.team == source_team {
                return;
            }
            let mut direction = entity.center() - source_center;
            if direction.normalize_and_get_length() <= 0.0 {
                direction = Vec3::UP;
            }
            direction
        };

        self.damage_entity(target, amount, direction * knockback);
    }
}

/// Lateral overlap test: disc-disc by radii, anything involving a box by
/// axis-aligned extents with the axis of least penetration
fn lateral_overlap(a: &CollisionBody, b: &CollisionBody) -> Option<(Vec2, f32)> {
    let delta = (b.center - a.center).xz();

    if a.shape == CollisionShape::Disc && b.shape == CollisionShape::Disc {
        let reach = a.radius + b.radius;
        let distance_squared = delta.length_squared();
        if distance_squared >= reach * reach {
            return None;
        }
        let distance = distance_squared.sqrt();
        let direction = if distance > 1e-6 {
            delta / distance
        } else {
            Vec2::X
        };
        return Some((direction, reach - distance));
    }

    let extents_a = body_extents(a);
    let extents_b = body_extents(b);
    let overlap_x = (extents_a.x + extents_b.x) - delta.x.abs();
    let overlap_z = (extents_a.y + extents_b.y) - delta.y.abs();
    if overlap_x <= 0.0 || overlap_z <= 0.0 {
        return None;
    }

    if overlap_x < overlap_z {
        let sign = if delta.x >= 0.0 { 1.0 } else { -1.0 };
        Some((Vec2::new(sign, 0.0), overlap_x))
    } else {
        let sign = if delta.y >= 0.0 { 1.0 } else { -1.0 };
        Some((Vec2::new(0.0, sign), overlap_z))
    }
}

fn body_extents(body: &CollisionBody) -> Vec2 {
    match body.shape {
        CollisionShape::Box => body.half_extents,
        _ => Vec2::splat(body.radius),
    }
}
