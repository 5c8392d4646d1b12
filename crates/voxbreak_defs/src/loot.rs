//! Weighted loot tables

use serde::{Deserialize, Serialize};
use voxbreak_core::SimRng;

/// One possible drop in a loot table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LootEntry {
    /// Item definition to drop; `None` means "drop nothing"
    pub item: Option<String>,
    #[serde(default = "default_weight")]
    pub weight: u32,
}

fn default_weight() -> u32 {
    1
}

/// A named weighted table of drops
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LootTable {
    pub name: String,
    pub entries: Vec<LootEntry>,
}

impl LootTable {
    /// Roll the table, returning the chosen item definition name if the
    /// roll landed on an actual drop
    pub fn roll(&self, rng: &mut SimRng) -> Option<&str> {
        let total: u32 = self.entries.iter().map(|e| e.weight).sum();
        if total == 0 {
            return None;
        }

        let mut remaining = rng.int_in_range(0, total as i32 - 1) as u32;
        for entry in &self.entries {
            if remaining < entry.weight {
                return entry.item.as_deref();
            }
            remaining -= entry.weight;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> LootTable {
        LootTable {
            name: "grunt_drops".to_string(),
            entries: vec![
                LootEntry {
                    item: None,
                    weight: 3,
                },
                LootEntry {
                    item: Some("medkit".to_string()),
                    weight: 1,
                },
            ],
        }
    }

    #[test]
    fn test_roll_respects_weights() {
        let table = table();
        let mut rng = SimRng::from_seed(42);

        let mut drops = 0;
        for _ in 0..1000 {
            if table.roll(&mut rng).is_some() {
                drops += 1;
            }
        }
        // Expected rate is 25%; allow generous slack
        assert!((150..350).contains(&drops), "drops = {drops}");
    }

    #[test]
    fn test_empty_table_never_drops() {
        let table = LootTable {
            name: "empty".to_string(),
            entries: Vec::new(),
        };
        let mut rng = SimRng::from_seed(1);
        assert_eq!(table.roll(&mut rng), None);
    }
}
