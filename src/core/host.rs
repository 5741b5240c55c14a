/// The capability interface through which the engine reaches the host
/// runtime, plus a recording double for tests and tools.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::schema::passage::PassageId;

/// A contextual UI action: a label key and the slug reported when pressed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Affordance {
    pub label: String,
    pub slug: String,
}

/// Outbound effects the engine performs on the host.
///
/// Text arguments are localization keys; the host resolves them and
/// substitutes `$variables` from `params`.
pub trait HostPort {
    fn display(
        &mut self,
        passage: &PassageId,
        title: &str,
        text: &str,
        choices: &[String],
        params: &BTreeMap<String, String>,
        animate: bool,
    );

    /// Replace the active interact affordances. An empty slice clears them.
    fn set_interact_affordances(&mut self, affordances: &[Affordance]);

    fn exit(&mut self, exit_name: &str, immediate: bool);

    fn record_marker(&mut self, token: &str);

    /// Diagnostics for the level author, never shown to players.
    fn log(&mut self, message: &str);
}

/// A `display` call as seen by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Displayed {
    pub passage: PassageId,
    pub title: String,
    pub text: String,
    pub choices: Vec<String>,
    pub params: BTreeMap<String, String>,
    pub animate: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    Display(Displayed),
    Affordances(Vec<Affordance>),
    Exit { name: String, immediate: bool },
    RecordMarker(String),
    Log(String),
}

/// A `HostPort` that records every call in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    pub calls: Vec<HostCall>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn displays(&self) -> Vec<&Displayed> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HostCall::Display(d) => Some(d),
                _ => None,
            })
            .collect()
    }

    pub fn last_display(&self) -> Option<&Displayed> {
        self.displays().into_iter().last()
    }

    pub fn logs(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HostCall::Log(m) => Some(m.as_str()),
                _ => None,
            })
            .collect()
    }

    /// The affordance list most recently set, if any call was made.
    pub fn last_affordances(&self) -> Option<&[Affordance]> {
        self.calls.iter().rev().find_map(|c| match c {
            HostCall::Affordances(a) => Some(a.as_slice()),
            _ => None,
        })
    }

    pub fn exits(&self) -> Vec<(&str, bool)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HostCall::Exit { name, immediate } => Some((name.as_str(), *immediate)),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl HostPort for RecordingHost {
    fn display(
        &mut self,
        passage: &PassageId,
        title: &str,
        text: &str,
        choices: &[String],
        params: &BTreeMap<String, String>,
        animate: bool,
    ) {
        self.calls.push(HostCall::Display(Displayed {
            passage: passage.clone(),
            title: title.to_string(),
            text: text.to_string(),
            choices: choices.to_vec(),
            params: params.clone(),
            animate,
        }));
    }

    fn set_interact_affordances(&mut self, affordances: &[Affordance]) {
        self.calls.push(HostCall::Affordances(affordances.to_vec()));
    }

    fn exit(&mut self, exit_name: &str, immediate: bool) {
        self.calls.push(HostCall::Exit {
            name: exit_name.to_string(),
            immediate,
        });
    }

    fn record_marker(&mut self, token: &str) {
        self.calls.push(HostCall::RecordMarker(token.to_string()));
    }

    fn log(&mut self, message: &str) {
        self.calls.push(HostCall::Log(message.to_string()));
    }
}
