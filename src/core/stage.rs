/// Stage controller: binds sensor proximity to the interact affordance.
use rustc_hash::FxHashMap;

use crate::core::host::{Affordance, HostPort};
use crate::schema::passage::PassageId;

/// Button slug prefix for staged passages: `passage/<id>`.
pub const PASSAGE_SLUG_PREFIX: &str = "passage/";

pub fn passage_slug(id: &PassageId) -> String {
    format!("{PASSAGE_SLUG_PREFIX}{id}")
}

/// Extract the passage id from a `passage/<id>` slug.
pub fn parse_passage_slug(slug: &str) -> Option<&str> {
    slug.strip_prefix(PASSAGE_SLUG_PREFIX)
        .filter(|id| !id.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StageState {
    #[default]
    Idle,
    Armed,
}

#[derive(Debug, Clone)]
struct Stage {
    target: PassageId,
    state: StageState,
}

/// Tracks one Idle/Armed state machine per sensor scope.
///
/// Overlapping scopes are not arbitrated: the most recent enter owns the
/// affordance, and any exit clears it.
#[derive(Debug, Clone)]
pub struct StageController {
    label: String,
    stages: FxHashMap<String, Stage>,
}

impl StageController {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            stages: FxHashMap::default(),
        }
    }

    /// Bind a sensor scope to the passage it stages.
    pub fn bind(&mut self, scope: impl Into<String>, target: PassageId) {
        self.stages.insert(
            scope.into(),
            Stage {
                target,
                state: StageState::Idle,
            },
        );
    }

    pub fn is_bound(&self, scope: &str) -> bool {
        self.stages.contains_key(scope)
    }

    pub fn state(&self, scope: &str) -> StageState {
        self.stages
            .get(scope)
            .map(|s| s.state)
            .unwrap_or_default()
    }

    pub fn bindings(&self) -> impl Iterator<Item = (&str, &PassageId)> {
        self.stages.iter().map(|(k, s)| (k.as_str(), &s.target))
    }

    /// Feed a sensor transition for `scope`. Returns false if the scope is
    /// not bound to a stage.
    pub fn sensor(&mut self, scope: &str, entered: bool, host: &mut dyn HostPort) -> bool {
        let Some(stage) = self.stages.get_mut(scope) else {
            return false;
        };

        match (stage.state, entered) {
            (StageState::Idle, true) => {
                stage.state = StageState::Armed;
                tracing::debug!("stage '{}' armed for {}", scope, stage.target);
                host.set_interact_affordances(&[Affordance {
                    label: self.label.clone(),
                    slug: passage_slug(&stage.target),
                }]);
            }
            (StageState::Armed, false) => {
                stage.state = StageState::Idle;
                tracing::debug!("stage '{}' idle", scope);
                host.set_interact_affordances(&[]);
            }
            _ => {}
        }
        true
    }

    /// Confirm a press on the affordance for `target`. Yields the passage
    /// to dispatch only when some scope is armed for it.
    pub fn confirm(&self, target: &str) -> Option<PassageId> {
        self.stages
            .values()
            .find(|s| s.state == StageState::Armed && s.target.as_str() == target)
            .map(|s| s.target.clone())
    }

    /// Return every scope to Idle, as on a fresh level load. Bindings stay.
    pub fn reset(&mut self) {
        for stage in self.stages.values_mut() {
            stage.state = StageState::Idle;
        }
    }
}
