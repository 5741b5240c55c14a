use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use super::passage::{Passage, PassageId};
use super::pickup::PickupRule;

#[derive(Debug, Error)]
pub enum ModuleError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("passage '{0}' is defined more than once")]
    DuplicatePassage(PassageId),
    #[error("choice '{shown}' aliases both '{existing}' and '{requested}'")]
    ConflictingAlias {
        shown: String,
        existing: PassageId,
        requested: PassageId,
    },
}

/// What a named sensor does when the player enters or leaves it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SensorBinding {
    /// Arms the interact affordance for a passage while the player is in range.
    Stage(PassageId),
    /// Sends the player through a level exit on enter.
    Exit { name: String, immediate: bool },
}

/// Initial narrative state for a module.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StateDefaults {
    #[serde(default)]
    pub scalars: FxHashMap<String, String>,
    #[serde(default)]
    pub story: FxHashMap<String, bool>,
    #[serde(default)]
    pub options: FxHashMap<String, bool>,
}

fn default_interact_label() -> String {
    "interact".to_string()
}

fn default_player() -> String {
    "player".to_string()
}

/// One authored dialogue module: passages, aliases and the level wiring
/// that stages them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogueModule {
    pub title: String,
    #[serde(default = "default_interact_label")]
    pub interact_label: String,
    /// Initiator id the host uses for the player.
    #[serde(default = "default_player")]
    pub player: String,
    #[serde(default)]
    pub aliases: FxHashMap<String, PassageId>,
    #[serde(default)]
    pub passages: Vec<Passage>,
    #[serde(default)]
    pub sensors: FxHashMap<String, SensorBinding>,
    #[serde(default)]
    pub pickups: FxHashMap<String, PickupRule>,
    #[serde(default)]
    pub defaults: StateDefaults,
}

impl DialogueModule {
    /// An empty module with default labels.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            interact_label: default_interact_label(),
            player: default_player(),
            aliases: FxHashMap::default(),
            passages: Vec::new(),
            sensors: FxHashMap::default(),
            pickups: FxHashMap::default(),
            defaults: StateDefaults::default(),
        }
    }

    /// Load a module from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<DialogueModule, ModuleError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// Parse a module from a RON string.
    pub fn parse_ron(input: &str) -> Result<DialogueModule, ModuleError> {
        Ok(ron::from_str(input)?)
    }

    /// Merge another module into this one. Passages, aliases and bindings
    /// from `other` override entries with the same key.
    pub fn merge(&mut self, other: DialogueModule) {
        for passage in other.passages {
            self.passages.retain(|p| p.id != passage.id);
            self.passages.push(passage);
        }
        self.aliases.extend(other.aliases);
        self.sensors.extend(other.sensors);
        self.pickups.extend(other.pickups);
        self.defaults.scalars.extend(other.defaults.scalars);
        self.defaults.story.extend(other.defaults.story);
        self.defaults.options.extend(other.defaults.options);
    }
}
