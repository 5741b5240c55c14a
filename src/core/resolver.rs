/// Single-hop alias resolution from shown choice ids to passage ids.
use rustc_hash::FxHashMap;

use crate::schema::module::ModuleError;
use crate::schema::passage::PassageId;

/// Maps a shown choice id to the canonical passage it leads to.
///
/// Lookups never chain: a target that is itself an alias key is returned
/// as-is.
#[derive(Debug, Clone, Default)]
pub struct ChoiceResolver {
    aliases: FxHashMap<String, PassageId>,
}

impl ChoiceResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an alias. Re-adding the same mapping is fine; pointing an
    /// existing shown id somewhere else is a content error.
    pub fn insert(&mut self, shown: &str, target: PassageId) -> Result<(), ModuleError> {
        match self.aliases.get(shown) {
            Some(existing) if *existing != target => Err(ModuleError::ConflictingAlias {
                shown: shown.to_string(),
                existing: existing.clone(),
                requested: target,
            }),
            Some(_) => Ok(()),
            None => {
                self.aliases.insert(shown.to_string(), target);
                Ok(())
            }
        }
    }

    pub fn resolve(&self, shown: &str) -> PassageId {
        match self.aliases.get(shown) {
            Some(target) => target.clone(),
            None => PassageId::new(shown),
        }
    }

    pub fn is_alias(&self, shown: &str) -> bool {
        self.aliases.contains_key(shown)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PassageId)> {
        self.aliases.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}
