//! Generational entity storage
//!
//! Entities live in a slab owned by the world and are referenced everywhere
//! else by [`EntityHandle`] - an index plus a generation. Removing an
//! entity bumps the slot's generation, so a stale handle held by any other
//! system resolves to `None` instead of dangling.

use crate::entity::Entity;

/// Stable reference to an entity slot
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityHandle {
    index: u32,
    generation: u32,
}

impl EntityHandle {
    /// Slot index
    #[inline]
    pub const fn index(&self) -> u32 {
        self.index
    }

    /// Generation the handle was issued at
    #[inline]
    pub const fn generation(&self) -> u32 {
        self.generation
    }
}

impl core::fmt::Debug for EntityHandle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "EntityHandle({}v{})", self.index, self.generation)
    }
}

struct Slot {
    generation: u32,
    entity: Option<Entity>,
}

/// Slab of entities with generational handles and a free list
#[derive(Default)]
pub struct EntityArena {
    slots: Vec<Slot>,
    free_list: Vec<u32>,
    alive_count: usize,
}

impl EntityArena {
    /// Create an empty arena
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            alive_count: 0,
        }
    }

    /// Insert an entity, returning its handle
    pub fn insert(&mut self, entity: Entity) -> EntityHandle {
        self.alive_count += 1;

        if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index as usize];
            slot.entity = Some(entity);
            EntityHandle {
                index,
                generation: slot.generation,
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                entity: Some(entity),
            });
            EntityHandle {
                index,
                generation: 0,
            }
        }
    }

    /// Remove an entity, bumping the slot generation
    ///
    /// Returns the entity if the handle was live. Stale handles are a
    /// no-op, never a panic.
    pub fn remove(&mut self, handle: EntityHandle) -> Option<Entity> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation || slot.entity.is_none() {
            return None;
        }

        let entity = slot.entity.take();
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push(handle.index);
        self.alive_count -= 1;
        entity
    }

    /// Resolve a handle immutably
    pub fn get(&self, handle: EntityHandle) -> Option<&Entity> {
        let slot = self.slots.get(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.entity.as_ref()
    }

    /// Resolve a handle mutably
    pub fn get_mut(&mut self, handle: EntityHandle) -> Option<&mut Entity> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.entity.as_mut()
    }

    /// Resolve two distinct handles mutably at once
    ///
    /// Needed by the collision pass, which mutates both sides of a contact.
    /// Returns `None` if either handle is stale or they alias.
    pub fn get_pair_mut(
        &mut self,
        a: EntityHandle,
        b: EntityHandle,
    ) -> Option<(&mut Entity, &mut Entity)> {
        if a.index == b.index {
            return None;
        }

        let (low, high, swapped) = if a.index < b.index {
            (a, b, false)
        } else {
            (b, a, true)
        };

        let (left, right) = self.slots.split_at_mut(high.index as usize);
        let low_slot = left.get_mut(low.index as usize)?;
        let high_slot = right.first_mut()?;

        if low_slot.generation != low.generation || high_slot.generation != high.generation {
            return None;
        }

        let low_entity = low_slot.entity.as_mut()?;
        let high_entity = high_slot.entity.as_mut()?;

        if swapped {
            Some((high_entity, low_entity))
        } else {
            Some((low_entity, high_entity))
        }
    }

    /// Number of live entities
    #[inline]
    pub fn len(&self) -> usize {
        self.alive_count
    }

    /// Whether the arena holds no entities
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.alive_count == 0
    }

    /// Handles of every live entity, in slot order
    ///
    /// Collected up front so callers can mutate the arena while walking the
    /// frame's population; handles that die mid-walk simply resolve to
    /// `None`.
    pub fn handles(&self) -> Vec<EntityHandle> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.entity.is_some())
            .map(|(index, slot)| EntityHandle {
                index: index as u32,
                generation: slot.generation,
            })
            .collect()
    }

    /// Iterate live entities with their handles
    pub fn iter(&self) -> impl Iterator<Item = (EntityHandle, &Entity)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.entity.as_ref().map(|entity| {
                (
                    EntityHandle {
                        index: index as u32,
                        generation: slot.generation,
                    },
                    entity,
                )
            })
        })
    }
}
