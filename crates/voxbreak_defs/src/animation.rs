//! Animation sets
//!
//! An animation set maps clip aliases ("walk", "attack") to the concrete
//! clip names authored for one character. Lookup failures fall back to the
//! literal alias silently; a missing alias is an authoring convenience,
//! not an error.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How a clip behaves past its last frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayMode {
    /// Use the clip's authored mode
    Default,
    Loop,
    Clamp,
}

impl Default for PlayMode {
    fn default() -> Self {
        Self::Default
    }
}

/// Alias → clip-name translation table for one character family
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationSet {
    pub name: String,
    #[serde(default)]
    pub aliases: HashMap<String, String>,
}

impl AnimationSet {
    /// Translate an alias to its clip name, falling back to the alias
    /// itself when no translation exists
    pub fn translate<'a>(&'a self, alias: &'a str) -> &'a str {
        match self.aliases.get(alias) {
            Some(clip) => clip.as_str(),
            None => alias,
        }
    }
}
