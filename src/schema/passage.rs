use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

use super::condition::Condition;

/// Stable opaque identifier for a passage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PassageId(pub String);

impl PassageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for PassageId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PassageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PassageId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A selectable option shown to the player.
///
/// The label key doubles as the shown choice id the host reports back. When
/// `target` is absent the label resolves either to a passage of the same id
/// or through the alias table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub label: String,
    #[serde(default)]
    pub target: Option<PassageId>,
}

impl Choice {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            target: None,
        }
    }
}

/// A choice guarded by a condition, evaluated in authored order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChoiceEntry {
    #[serde(default)]
    pub when: Condition,
    pub label: String,
    #[serde(default)]
    pub target: Option<PassageId>,
}

impl ChoiceEntry {
    pub fn choice(&self) -> Choice {
        Choice {
            label: self.label.clone(),
            target: self.target.clone(),
        }
    }
}

/// A state or world side effect committed when a branch fires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    /// Set a per-conversation option flag (`false` suppresses a choice).
    SetOption(String, bool),
    /// Set a named story flag such as `learnedStory`.
    SetStory(String, bool),
    /// Set a narrative scalar used for `$variable` substitution.
    SetScalar(String, String),
    /// Trigger a level transition through the host.
    Exit { name: String, immediate: bool },
}

/// One rung of a passage's guarded branch ladder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branch {
    #[serde(default)]
    pub when: Condition,
    /// Body text key. Empty means nothing is displayed.
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub choices: Vec<ChoiceEntry>,
    #[serde(default)]
    pub effects: Vec<Effect>,
}

fn default_animate() -> bool {
    true
}

/// An authored passage: presentation metadata plus an ordered branch ladder.
/// The first branch whose condition holds wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Passage {
    pub id: PassageId,
    /// Authoring name, used only in diagnostics.
    #[serde(default)]
    pub name: Option<String>,
    pub title: String,
    #[serde(default = "default_animate")]
    pub animate: bool,
    #[serde(default)]
    pub branches: Vec<Branch>,
}

impl Passage {
    /// Every choice entry across all branches, in authored order.
    pub fn choice_entries(&self) -> impl Iterator<Item = &ChoiceEntry> {
        self.branches.iter().flat_map(|b| b.choices.iter())
    }
}

/// What a passage evaluation asks the host to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    pub title: String,
    pub text: String,
    pub choices: Vec<Choice>,
    pub animate: bool,
}

impl Presentation {
    /// Label keys of the choices, in order.
    pub fn choice_labels(&self) -> Vec<String> {
        self.choices.iter().map(|c| c.label.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passage_id_borrows_as_str() {
        let mut ids = std::collections::HashSet::new();
        ids.insert(PassageId::new("knight"));
        assert!(ids.contains("knight"));
        assert_eq!(PassageId::from("well").to_string(), "well");
    }

    #[test]
    fn passage_defaults_from_ron() {
        let passage: Passage = ron::from_str(
            r#"(
                id: "fire",
                title: "flame-title",
                branches: [
                    (text: "crackle", choices: [(label: "warm-hands")]),
                ],
            )"#,
        )
        .unwrap();
        assert!(passage.animate);
        assert!(passage.name.is_none());
        assert_eq!(passage.branches.len(), 1);
        assert!(matches!(passage.branches[0].when, Condition::Always));
        assert!(passage.branches[0].effects.is_empty());
        assert_eq!(passage.choice_entries().count(), 1);
    }

    #[test]
    fn effects_parse_from_ron() {
        let effects: Vec<Effect> = ron::from_str(
            r#"[
                SetOption("askedName", false),
                SetStory("learnedStory", true),
                SetScalar("playerName", "Atreyu"),
                Exit(name: "well", immediate: false),
            ]"#,
        )
        .unwrap();
        assert_eq!(effects.len(), 4);
        assert_eq!(
            effects[3],
            Effect::Exit {
                name: "well".to_string(),
                immediate: false
            }
        );
    }
}
