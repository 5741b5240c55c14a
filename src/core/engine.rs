/// The dialogue engine: host events in, passage dispatch and host effects out.
///
/// Wires the passage registry, choice resolver, stage controller and
/// narrative state together behind the inbound event surface the host
/// runtime calls.
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::dispatcher::{ChoiceOutcome, Dispatch, Dispatcher};
use crate::core::host::HostPort;
use crate::core::registry::{EvalContext, Evaluator, FnEvaluator, PassageRegistry};
use crate::core::resolver::ChoiceResolver;
use crate::core::stage::{parse_passage_slug, StageController};
use crate::core::state::StateStore;
use crate::core::validate::{validate, ValidationIssue};
use crate::schema::module::{DialogueModule, ModuleError, SensorBinding, StateDefaults};
use crate::schema::passage::{PassageId, Presentation};
use crate::schema::pickup::{Pickup, PickupRule};
use crate::schema::time::SunEvent;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("content error: {0}")]
    Module(#[from] ModuleError),
    #[error("content failed validation with {} error(s)", .0.len())]
    Validation(Vec<ValidationIssue>),
}

/// A level's dialogue engine. Built via `DialogueEngineBuilder`.
pub struct DialogueEngine<H: HostPort> {
    title: String,
    player: String,
    dispatcher: Dispatcher,
    stages: StageController,
    sensors: FxHashMap<String, SensorBinding>,
    pickups: FxHashMap<String, PickupRule>,
    defaults: StateDefaults,
    store: StateStore,
    host: H,
}

/// Builder for constructing a `DialogueEngine`.
pub struct DialogueEngineBuilder {
    module_paths: Vec<PathBuf>,
    /// Directly provided modules (for testing without files).
    modules: Vec<DialogueModule>,
    evaluators: Vec<(PassageId, Box<dyn Evaluator>)>,
    strict: bool,
}

impl<H: HostPort> DialogueEngine<H> {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    /// Direct state access for external world-event handlers.
    pub fn store_mut(&mut self) -> &mut StateStore {
        &mut self.store
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn registry(&self) -> &PassageRegistry {
        self.dispatcher.registry()
    }

    pub fn stages(&self) -> &StageController {
        &self.stages
    }

    /// Run the content validation pass against the built tables.
    pub fn validate(&self) -> Vec<ValidationIssue> {
        validate(
            self.dispatcher.registry(),
            self.dispatcher.resolver(),
            &self.stages,
        )
    }

    /// Discard session state and start over from the module defaults,
    /// as when the level is loaded again. The host clock is not ours to
    /// rewind, so the current sun event carries over.
    pub fn reset(&mut self) {
        let sun_event = self.store.sun_event();
        self.store = StateStore::with_defaults(&self.defaults);
        self.store.set_sun_event(sun_event);
        self.stages.reset();
        self.host.set_interact_affordances(&[]);
    }

    pub fn dispatch(&mut self, passage: &str) -> Dispatch {
        self.dispatcher
            .dispatch(passage, &mut self.store, &mut self.host)
    }

    /// A choice (or a close, for an empty `choice`) reported by the host.
    pub fn choice_made_event(&mut self, passage: &str, choice: &str) -> ChoiceOutcome {
        self.dispatcher
            .choice_made(passage, choice, &mut self.store, &mut self.host)
    }

    /// A sensor transition. Only the player's transitions are acted on.
    pub fn sensor_event(&mut self, initiator: &str, sensor: &str, entered: bool) {
        tracing::debug!(
            "sensor event: '{}' {} '{}'",
            initiator,
            if entered { "entered" } else { "left" },
            sensor
        );
        if initiator != self.player {
            return;
        }

        match self.sensors.get(sensor) {
            Some(SensorBinding::Stage(_)) => {
                self.stages.sensor(sensor, entered, &mut self.host);
            }
            Some(SensorBinding::Exit { name, immediate }) => {
                if entered {
                    self.host.exit(name, *immediate);
                }
            }
            None => {}
        }
    }

    /// A UI button transition. Presses of `passage/<id>` dispatch `id` while
    /// a stage for it is armed.
    pub fn button_press_event(&mut self, slug: &str, down: bool) -> Option<Dispatch> {
        if !down {
            return None;
        }
        let id = parse_passage_slug(slug)?;
        match self.stages.confirm(id) {
            Some(target) => Some(self.dispatch(target.as_str())),
            None => {
                tracing::debug!("ignoring press of '{}': no stage armed for it", slug);
                None
            }
        }
    }

    /// The player took (or declined) a pickup.
    pub fn pickup_event(&mut self, slug: &str, took: bool) {
        if !took {
            return;
        }
        let (kind, marker) = match self.pickups.get(slug) {
            Some(rule) => (rule.kind.clone(), rule.marker.clone()),
            None => (slug.to_string(), None),
        };
        self.store.add_pickup(Pickup::new(slug, kind));
        if let Some(marker) = marker {
            self.record_marker(&marker);
        }
    }

    /// Record a world-event marker in state and report it to the host.
    pub fn record_marker(&mut self, token: &str) {
        self.store.set_marker(token);
        self.host.record_marker(token);
    }

    pub fn time_changed_event(&mut self, event: SunEvent) {
        tracing::debug!("time changed: {}", event.name());
        self.store.set_sun_event(event);
    }
}

impl Default for DialogueEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DialogueEngineBuilder {
    pub fn new() -> Self {
        Self {
            module_paths: Vec::new(),
            modules: Vec::new(),
            evaluators: Vec::new(),
            strict: false,
        }
    }

    /// Load a RON module from disk at build time. Later modules override
    /// earlier ones.
    pub fn module_path(mut self, path: impl AsRef<Path>) -> Self {
        self.module_paths.push(path.as_ref().to_path_buf());
        self
    }

    /// Provide a module directly (for testing without files).
    pub fn with_module(mut self, module: DialogueModule) -> Self {
        self.modules.push(module);
        self
    }

    /// Register a code evaluator next to the authored passages.
    pub fn with_evaluator<F>(mut self, id: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut EvalContext<'_>) -> Option<Presentation> + 'static,
    {
        self.evaluators
            .push((PassageId::new(id), Box::new(FnEvaluator(f))));
        self
    }

    /// Refuse to build when validation finds errors.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn build<H: HostPort>(self, host: H) -> Result<DialogueEngine<H>, EngineError> {
        let mut modules = self.modules;
        for path in &self.module_paths {
            modules.push(DialogueModule::load_from_ron(path)?);
        }

        let mut modules = modules.into_iter();
        let mut module = modules
            .next()
            .unwrap_or_else(|| DialogueModule::new(String::new()));
        for other in modules {
            module.merge(other);
        }

        let mut resolver = ChoiceResolver::new();
        for (shown, target) in &module.aliases {
            resolver.insert(shown, target.clone())?;
        }
        for passage in &module.passages {
            for entry in passage.choice_entries() {
                if let Some(target) = &entry.target {
                    if target.as_str() != entry.label {
                        resolver.insert(&entry.label, target.clone())?;
                    }
                }
            }
        }

        let mut registry = PassageRegistry::new();
        for passage in module.passages {
            registry.register_passage(passage)?;
        }
        for (id, evaluator) in self.evaluators {
            registry.register(id, evaluator)?;
        }

        let mut stages = StageController::new(module.interact_label.clone());
        for (sensor, binding) in &module.sensors {
            if let SensorBinding::Stage(target) = binding {
                stages.bind(sensor.clone(), target.clone());
            }
        }

        let issues = validate(&registry, &resolver, &stages);
        for issue in &issues {
            tracing::warn!("{}: {}", module.title, issue);
        }
        if self.strict {
            let errors: Vec<ValidationIssue> =
                issues.into_iter().filter(|i| i.is_error()).collect();
            if !errors.is_empty() {
                return Err(EngineError::Validation(errors));
            }
        }

        let store = StateStore::with_defaults(&module.defaults);
        tracing::debug!(
            "built dialogue '{}' with {} passages",
            module.title,
            registry.len()
        );

        Ok(DialogueEngine {
            title: module.title,
            player: module.player,
            dispatcher: Dispatcher::new(registry, resolver),
            stages,
            sensors: module.sensors,
            pickups: module.pickups,
            defaults: module.defaults,
            store,
            host,
        })
    }
}
