/// Narrative state for one dialogue module: visit counts, markers,
/// pickups, option flags and the named scalar/story bags.
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::schema::module::StateDefaults;
use crate::schema::pickup::Pickup;
use crate::schema::time::SunEvent;

/// The living narrative state of a level session.
///
/// Every query is total: absent keys resolve to their documented default
/// (count 0, marker absent, story flag false, option flag enabled).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StateStore {
    visit_counts: FxHashMap<String, u32>,
    markers: FxHashSet<String>,
    pickups: Vec<Pickup>,
    option_flags: FxHashMap<String, bool>,
    story_flags: FxHashMap<String, bool>,
    scalars: FxHashMap<String, String>,
    sun_event: SunEvent,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store seeded with a module's defaults.
    pub fn with_defaults(defaults: &StateDefaults) -> Self {
        Self {
            option_flags: defaults.options.clone(),
            story_flags: defaults.story.clone(),
            scalars: defaults.scalars.clone(),
            ..Self::default()
        }
    }

    pub fn increment(&mut self, passage: &str) {
        let count = self.visit_counts.entry(passage.to_string()).or_insert(0);
        *count = count.saturating_add(1);
    }

    pub fn count(&self, passage: &str) -> u32 {
        self.visit_counts.get(passage).copied().unwrap_or(0)
    }

    pub fn visited(&self, passage: &str) -> bool {
        self.count(passage) > 0
    }

    /// Markers are additive; nothing in the engine clears them.
    pub fn set_marker(&mut self, token: &str) {
        self.markers.insert(token.to_string());
    }

    pub fn has_marker(&self, token: &str) -> bool {
        self.markers.contains(token)
    }

    pub fn has_pickup<F>(&self, predicate: F) -> bool
    where
        F: Fn(&Pickup) -> bool,
    {
        self.pickups.iter().any(predicate)
    }

    pub fn add_pickup(&mut self, pickup: Pickup) {
        self.pickups.push(pickup);
    }

    /// Drop the first held pickup with this slug. Returns whether one was held.
    pub fn remove_pickup(&mut self, slug: &str) -> bool {
        match self.pickups.iter().position(|p| p.slug == slug) {
            Some(index) => {
                self.pickups.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn pickups(&self) -> &[Pickup] {
        &self.pickups
    }

    /// Option flag lookup. Unset flags are enabled.
    pub fn get_flag(&self, token: &str) -> bool {
        self.option_flags.get(token).copied().unwrap_or(true)
    }

    pub fn set_flag(&mut self, token: &str, value: bool) {
        self.option_flags.insert(token.to_string(), value);
    }

    /// Named story flag lookup. Unset flags are false.
    pub fn story_flag(&self, name: &str) -> bool {
        self.story_flags.get(name).copied().unwrap_or(false)
    }

    pub fn set_story_flag(&mut self, name: &str, value: bool) {
        self.story_flags.insert(name.to_string(), value);
    }

    pub fn scalar(&self, name: &str) -> Option<&str> {
        self.scalars.get(name).map(String::as_str)
    }

    pub fn set_scalar(&mut self, name: &str, value: impl Into<String>) {
        self.scalars.insert(name.to_string(), value.into());
    }

    /// Scalars handed to the host for `$variable` substitution.
    pub fn template_params(&self) -> BTreeMap<String, String> {
        self.scalars
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn sun_event(&self) -> SunEvent {
        self.sun_event
    }

    pub fn set_sun_event(&mut self, event: SunEvent) {
        self.sun_event = event;
    }

    pub fn is_night(&self) -> bool {
        self.sun_event.is_night()
    }
}
