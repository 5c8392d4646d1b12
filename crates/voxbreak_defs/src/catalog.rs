//! The asset catalog
//!
//! [`AssetCatalog`] is the one place definitions live. It is constructed
//! once at startup - either from a directory of JSON documents or
//! programmatically for tests - validated as a whole, then passed by
//! reference into the systems that need lookups. There is no global
//! registry; load order and test isolation are explicit.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use log::{debug, info};
use serde::Deserialize;

use crate::animation::AnimationSet;
use crate::campaign::CampaignDefinition;
use crate::entity::EntityDefinition;
use crate::error::CatalogError;
use crate::loot::LootTable;
use crate::wave::WaveSet;

/// One definition document on disk; any section may be present
#[derive(Debug, Default, Deserialize)]
struct DefinitionDocument {
    #[serde(default)]
    entities: Vec<EntityDefinition>,
    #[serde(default)]
    loot_tables: Vec<LootTable>,
    #[serde(default)]
    animation_sets: Vec<AnimationSet>,
    #[serde(default)]
    campaigns: Vec<CampaignDefinition>,
    #[serde(default)]
    wave_sets: Vec<WaveSet>,
}

/// Load-once, read-only registry of every definition domain
#[derive(Debug, Default)]
pub struct AssetCatalog {
    entities: HashMap<String, Arc<EntityDefinition>>,
    loot_tables: HashMap<String, Arc<LootTable>>,
    animation_sets: HashMap<String, Arc<AnimationSet>>,
    campaigns: HashMap<String, Arc<CampaignDefinition>>,
    wave_sets: HashMap<String, Arc<WaveSet>>,
}

impl AssetCatalog {
    /// Create an empty catalog for programmatic population
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every `.json` document under `dir`, then validate
    ///
    /// Files are visited in sorted order so duplicate detection is
    /// deterministic regardless of filesystem enumeration order.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let dir = dir.as_ref();
        let mut catalog = Self::new();

        let mut paths: Vec<_> = fs::read_dir(dir)
            .map_err(|source| CatalogError::Io {
                path: dir.display().to_string(),
                source,
            })?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        for path in paths {
            let display = path.display().to_string();
            let text = fs::read_to_string(&path).map_err(|source| CatalogError::Io {
                path: display.clone(),
                source,
            })?;
            let document: DefinitionDocument =
                serde_json::from_str(&text).map_err(|source| CatalogError::Parse {
                    path: display.clone(),
                    source,
                })?;
            debug!(
                "loaded {}: {} entities, {} campaigns, {} wave sets",
                display,
                document.entities.len(),
                document.campaigns.len(),
                document.wave_sets.len()
            );
            catalog.merge(document)?;
        }

        catalog.validate()?;
        info!(
            "catalog ready: {} entities, {} loot tables, {} campaigns, {} wave sets",
            catalog.entities.len(),
            catalog.loot_tables.len(),
            catalog.campaigns.len(),
            catalog.wave_sets.len()
        );
        Ok(catalog)
    }

    fn merge(&mut self, document: DefinitionDocument) -> Result<(), CatalogError> {
        for entity in document.entities {
            self.insert_entity(entity)?;
        }
        for table in document.loot_tables {
            self.insert_loot_table(table)?;
        }
        for set in document.animation_sets {
            self.insert_animation_set(set)?;
        }
        for campaign in document.campaigns {
            self.insert_campaign(campaign)?;
        }
        for set in document.wave_sets {
            self.insert_wave_set(set)?;
        }
        Ok(())
    }

    /// Insert an entity definition, rejecting duplicates
    pub fn insert_entity(&mut self, definition: EntityDefinition) -> Result<(), CatalogError> {
        if definition.name.is_empty() {
            return Err(CatalogError::MissingName {
                path: "<memory>".to_string(),
            });
        }
        let name = definition.name.clone();
        if self
            .entities
            .insert(name.clone(), Arc::new(definition))
            .is_some()
        {
            return Err(CatalogError::Duplicate {
                kind: "entity",
                name,
            });
        }
        Ok(())
    }

    /// Insert a loot table, rejecting duplicates
    pub fn insert_loot_table(&mut self, table: LootTable) -> Result<(), CatalogError> {
        let name = table.name.clone();
        if self.loot_tables.insert(name.clone(), Arc::new(table)).is_some() {
            return Err(CatalogError::Duplicate {
                kind: "loot table",
                name,
            });
        }
        Ok(())
    }

    /// Insert an animation set, rejecting duplicates
    pub fn insert_animation_set(&mut self, set: AnimationSet) -> Result<(), CatalogError> {
        let name = set.name.clone();
        if self
            .animation_sets
            .insert(name.clone(), Arc::new(set))
            .is_some()
        {
            return Err(CatalogError::Duplicate {
                kind: "animation set",
                name,
            });
        }
        Ok(())
    }

    /// Insert a campaign, rejecting duplicates
    pub fn insert_campaign(&mut self, campaign: CampaignDefinition) -> Result<(), CatalogError> {
        let name = campaign.name.clone();
        if self
            .campaigns
            .insert(name.clone(), Arc::new(campaign))
            .is_some()
        {
            return Err(CatalogError::Duplicate {
                kind: "campaign",
                name,
            });
        }
        Ok(())
    }

    /// Insert a wave set, finalizing its derived fields first
    pub fn insert_wave_set(&mut self, mut set: WaveSet) -> Result<(), CatalogError> {
        set.finalize();
        let name = set.name.clone();
        if self.wave_sets.insert(name.clone(), Arc::new(set)).is_some() {
            return Err(CatalogError::Duplicate {
                kind: "wave set",
                name,
            });
        }
        Ok(())
    }

    /// Check every cross-reference in the catalog
    ///
    /// Called automatically by [`AssetCatalog::load_dir`]; programmatic
    /// catalogs should call it once population is complete.
    pub fn validate(&self) -> Result<(), CatalogError> {
        for (name, entity) in &self.entities {
            if let Some(weapon) = &entity.weapon {
                if weapon.fire_rate <= 0.0 {
                    return Err(CatalogError::InvalidField {
                        definition: name.clone(),
                        message: format!("fire_rate must be positive, got {}", weapon.fire_rate),
                    });
                }
                self.require_projectile(&weapon.projectile, name)?;
            }

            if let Some(set) = &entity.visuals.animation_set {
                if !self.animation_sets.contains_key(set) {
                    return Err(CatalogError::UnknownDefinition {
                        kind: "animation set",
                        referent: set.clone(),
                        referenced_by: name.clone(),
                    });
                }
            }

            if let Some(table) = &entity.loot_table {
                if !self.loot_tables.contains_key(table) {
                    return Err(CatalogError::UnknownDefinition {
                        kind: "loot table",
                        referent: table.clone(),
                        referenced_by: name.clone(),
                    });
                }
            }

            for behavior in &entity.behaviors {
                if let Some(weapon) = behavior.weapon_reference() {
                    let weapon_def = self.require_entity_ref(weapon, name, "weapon entity")?;
                    if weapon_def.weapon.is_none() {
                        return Err(CatalogError::InvalidField {
                            definition: name.clone(),
                            message: format!("\"{weapon}\" has no weapon block"),
                        });
                    }
                }
                if let Some(bomb) = behavior.projectile_reference() {
                    self.require_projectile(bomb, name)?;
                }
            }
        }

        for table in self.loot_tables.values() {
            for entry in &table.entries {
                if let Some(item) = &entry.item {
                    self.require_entity_ref(item, &table.name, "item entity")?;
                }
            }
        }

        for campaign in self.campaigns.values() {
            for (stage_index, stage) in campaign.stages.iter().enumerate() {
                for event in &stage.events {
                    self.require_entity_ref(&event.entity, &campaign.name, "entity")?;
                    if event.spawn_point >= campaign.spawn_points.len() {
                        return Err(CatalogError::InvalidField {
                            definition: campaign.name.clone(),
                            message: format!(
                                "stage {stage_index} references spawn point {} of {}",
                                event.spawn_point,
                                campaign.spawn_points.len()
                            ),
                        });
                    }
                }
            }
        }

        for set in self.wave_sets.values() {
            if set.spawn_points.is_empty() && !set.waves.is_empty() {
                return Err(CatalogError::InvalidField {
                    definition: set.name.clone(),
                    message: "wave set has waves but no spawn points".to_string(),
                });
            }
            for wave in &set.waves {
                for event in &wave.events {
                    self.require_entity_ref(&event.entity, &set.name, "entity")?;
                }
            }
        }

        Ok(())
    }

    fn require_entity_ref(
        &self,
        name: &str,
        referenced_by: &str,
        kind: &'static str,
    ) -> Result<&Arc<EntityDefinition>, CatalogError> {
        self.entities
            .get(name)
            .ok_or_else(|| CatalogError::UnknownDefinition {
                kind,
                referent: name.to_string(),
                referenced_by: referenced_by.to_string(),
            })
    }

    fn require_projectile(&self, name: &str, referenced_by: &str) -> Result<(), CatalogError> {
        let definition = self.require_entity_ref(name, referenced_by, "projectile entity")?;
        if definition.projectile.is_none() {
            return Err(CatalogError::InvalidField {
                definition: referenced_by.to_string(),
                message: format!("\"{name}\" has no projectile block"),
            });
        }
        Ok(())
    }

    /// Look up an entity definition by name
    pub fn entity(&self, name: &str) -> Option<Arc<EntityDefinition>> {
        self.entities.get(name).cloned()
    }

    /// Look up a loot table by name
    pub fn loot_table(&self, name: &str) -> Option<Arc<LootTable>> {
        self.loot_tables.get(name).cloned()
    }

    /// Look up an animation set by name
    pub fn animation_set(&self, name: &str) -> Option<Arc<AnimationSet>> {
        self.animation_sets.get(name).cloned()
    }

    /// Look up a campaign by name
    pub fn campaign(&self, name: &str) -> Option<Arc<CampaignDefinition>> {
        self.campaigns.get(name).cloned()
    }

    /// Look up a wave set by name
    pub fn wave_set(&self, name: &str) -> Option<Arc<WaveSet>> {
        self.wave_sets.get(name).cloned()
    }

    /// Number of entity definitions loaded
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }
}
