use serde::{Deserialize, Serialize};

use super::passage::PassageId;
use crate::core::state::StateStore;

/// A predicate over narrative state, used to guard branches and choices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum Condition {
    #[default]
    Always,
    /// The player holds a pickup with this slug.
    HasPickup(String),
    /// The player holds any pickup of this kind.
    HasPickupKind(String),
    /// The current sun event falls in the night window.
    Night,
    Marker(String),
    /// A named story flag is set.
    Story(String),
    /// An option flag is still enabled (defaults to enabled).
    OptionEnabled(String),
    Visited(PassageId),
    VisitsAtLeast(PassageId, u32),
    Not(Box<Condition>),
    All(Vec<Condition>),
    Any(Vec<Condition>),
}

impl Condition {
    pub fn holds(&self, store: &StateStore) -> bool {
        match self {
            Self::Always => true,
            Self::HasPickup(slug) => store.has_pickup(|p| p.slug == *slug),
            Self::HasPickupKind(kind) => store.has_pickup(|p| p.kind == *kind),
            Self::Night => store.is_night(),
            Self::Marker(token) => store.has_marker(token),
            Self::Story(name) => store.story_flag(name),
            Self::OptionEnabled(token) => store.get_flag(token),
            Self::Visited(id) => store.visited(id.as_str()),
            Self::VisitsAtLeast(id, n) => store.count(id.as_str()) >= *n,
            Self::Not(inner) => !inner.holds(store),
            Self::All(all) => all.iter().all(|c| c.holds(store)),
            Self::Any(any) => any.iter().any(|c| c.holds(store)),
        }
    }
}
