//! WASM bindings for dialogue-engine: lets a browser level drive the shipped dialogue.

use std::collections::BTreeMap;
use wasm_bindgen::prelude::*;

use dialogue_engine::core::dispatcher::{ChoiceOutcome, Dispatch};
use dialogue_engine::core::engine::{DialogueEngine, DialogueEngineBuilder};
use dialogue_engine::core::host::{Affordance, HostPort};
use dialogue_engine::schema::module::DialogueModule;
use dialogue_engine::schema::passage::PassageId;
use dialogue_engine::schema::time::SunEvent;

// ---------------------------------------------------------------------------
// Embedded dialogue modules: compiled into the WASM binary
// ---------------------------------------------------------------------------
mod data {
    pub const GMORK: &str = include_str!("../../content/gmork.ron");
    pub const OASIS: &str = include_str!("../../content/oasis.ron");

    pub fn module_source(level: &str) -> Option<&'static str> {
        match level {
            "gmork" => Some(GMORK),
            "oasis" => Some(OASIS),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Host runtime imports: the page provides `globalThis.host`
// ---------------------------------------------------------------------------
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = host, js_name = display)]
    fn host_display(
        passage: &str,
        title: &str,
        text: &str,
        choices_json: &str,
        params_json: &str,
        animate: bool,
    );

    #[wasm_bindgen(js_namespace = host, js_name = setInteractAffordances)]
    fn host_set_interact_affordances(affordances_json: &str);

    #[wasm_bindgen(js_namespace = host, js_name = exit)]
    fn host_exit(exit_name: &str, immediate: bool);

    #[wasm_bindgen(js_namespace = host, js_name = recordMarker)]
    fn host_record_marker(token: &str);

    #[wasm_bindgen(js_namespace = host, js_name = log)]
    fn host_log(message: &str);
}

// ---------------------------------------------------------------------------
// JSON helper types for communication across the WASM boundary
// ---------------------------------------------------------------------------
#[derive(serde::Serialize)]
struct LevelInfo {
    title: String,
    passages: Vec<String>,
    sensors: Vec<String>,
}

#[derive(serde::Serialize)]
struct ChoiceResult {
    closed: bool,
    target: Option<String>,
    displayed: bool,
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T, fallback: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| fallback.to_string())
}

/// Forwards engine effects to the page's `host` object.
struct JsHost;

impl HostPort for JsHost {
    fn display(
        &mut self,
        passage: &PassageId,
        title: &str,
        text: &str,
        choices: &[String],
        params: &BTreeMap<String, String>,
        animate: bool,
    ) {
        host_display(
            passage.as_str(),
            title,
            text,
            &to_json(choices, "[]"),
            &to_json(params, "{}"),
            animate,
        );
    }

    fn set_interact_affordances(&mut self, affordances: &[Affordance]) {
        host_set_interact_affordances(&to_json(affordances, "[]"));
    }

    fn exit(&mut self, exit_name: &str, immediate: bool) {
        host_exit(exit_name, immediate);
    }

    fn record_marker(&mut self, token: &str) {
        host_record_marker(token);
    }

    fn log(&mut self, message: &str) {
        host_log(message);
    }
}

// ---------------------------------------------------------------------------
// DialogueLevel: the main exported struct
// ---------------------------------------------------------------------------
#[wasm_bindgen]
pub struct DialogueLevel {
    engine: DialogueEngine<JsHost>,
}

#[wasm_bindgen]
impl DialogueLevel {
    /// Build the dialogue for one of the embedded levels ("gmork", "oasis").
    #[wasm_bindgen(constructor)]
    pub fn new(level: &str) -> Result<DialogueLevel, JsError> {
        let source = data::module_source(level)
            .ok_or_else(|| JsError::new(&format!("Unknown level: {level}")))?;
        let module = DialogueModule::parse_ron(source)
            .map_err(|e| JsError::new(&format!("Module parse error: {e}")))?;
        let engine = DialogueEngineBuilder::new()
            .with_module(module)
            .strict(true)
            .build(JsHost)
            .map_err(|e| JsError::new(&format!("Engine build error: {e}")))?;
        Ok(DialogueLevel { engine })
    }

    /// Names of the embedded levels as a JSON array.
    pub fn available_levels() -> String {
        to_json(&["gmork", "oasis"], "[]")
    }

    pub fn info(&self) -> Result<String, JsError> {
        let mut passages: Vec<String> = self
            .engine
            .registry()
            .ids()
            .map(|id| id.to_string())
            .collect();
        passages.sort();
        let mut sensors: Vec<String> = self
            .engine
            .stages()
            .bindings()
            .map(|(s, _)| s.to_string())
            .collect();
        sensors.sort();
        serde_json::to_string(&LevelInfo {
            title: self.engine.title().to_string(),
            passages,
            sensors,
        })
        .map_err(|e| JsError::new(&format!("Serialization error: {e}")))
    }

    #[wasm_bindgen(js_name = sensorEvent)]
    pub fn sensor_event(&mut self, initiator: &str, sensor: &str, entered: bool) {
        self.engine.sensor_event(initiator, sensor, entered);
    }

    /// Returns true when the press opened a passage with text.
    #[wasm_bindgen(js_name = buttonPressEvent)]
    pub fn button_press_event(&mut self, slug: &str, down: bool) -> bool {
        self.engine.button_press_event(slug, down) == Some(Dispatch::Displayed)
    }

    /// Report a choice; an empty `choice` closes the passage. Returns a JSON
    /// `{closed, target, displayed}` record.
    #[wasm_bindgen(js_name = choiceMadeEvent)]
    pub fn choice_made_event(&mut self, passage: &str, choice: &str) -> String {
        let result = match self.engine.choice_made_event(passage, choice) {
            ChoiceOutcome::Closed(_) => ChoiceResult {
                closed: true,
                target: None,
                displayed: false,
            },
            ChoiceOutcome::Dispatched { target, result } => ChoiceResult {
                closed: false,
                target: Some(target.to_string()),
                displayed: result == Dispatch::Displayed,
            },
        };
        to_json(&result, "{}")
    }

    #[wasm_bindgen(js_name = pickupEvent)]
    pub fn pickup_event(&mut self, slug: &str, took: bool) {
        self.engine.pickup_event(slug, took);
    }

    /// Accepts sun event names such as "dusk" or "solarNoon".
    #[wasm_bindgen(js_name = timeChangedEvent)]
    pub fn time_changed_event(&mut self, event: &str) -> Result<(), JsError> {
        let event = SunEvent::from_name(event)
            .ok_or_else(|| JsError::new(&format!("Unknown sun event: {event}")))?;
        self.engine.time_changed_event(event);
        Ok(())
    }

    #[wasm_bindgen(js_name = setPlayerName)]
    pub fn set_player_name(&mut self, name: &str) {
        self.engine.store_mut().set_scalar("playerName", name);
    }

    /// Snapshot of the narrative state, for save slots and debugging.
    #[wasm_bindgen(js_name = stateJson)]
    pub fn state_json(&self) -> Result<String, JsError> {
        serde_json::to_string(self.engine.store())
            .map_err(|e| JsError::new(&format!("Serialization error: {e}")))
    }

    pub fn reset(&mut self) {
        self.engine.reset();
    }
}
