/// Passage registry: identifier-to-evaluator table and the evaluator contract.
///
/// Declarative passages evaluate as a guarded branch ladder: branches are
/// tested top-down against the state and the first match wins. Code
/// evaluators can sit alongside them for logic the ladder cannot express.
use rustc_hash::FxHashMap;

use crate::core::host::HostPort;
use crate::core::state::StateStore;
use crate::schema::module::ModuleError;
use crate::schema::passage::{ChoiceEntry, Effect, Passage, PassageId, Presentation};

/// Everything an evaluator may touch while running.
pub struct EvalContext<'a> {
    pub passage: &'a PassageId,
    pub store: &'a mut StateStore,
    pub host: &'a mut dyn HostPort,
}

impl EvalContext<'_> {
    /// Commit one authored effect. There is no rollback.
    pub fn apply(&mut self, effect: &Effect) {
        tracing::debug!("passage {} applies {:?}", self.passage, effect);
        match effect {
            Effect::SetOption(token, value) => self.store.set_flag(token, *value),
            Effect::SetStory(name, value) => self.store.set_story_flag(name, *value),
            Effect::SetScalar(name, value) => self.store.set_scalar(name, value.clone()),
            Effect::Exit { name, immediate } => self.host.exit(name, *immediate),
        }
    }
}

/// A passage body: a function of narrative state yielding an optional
/// presentation, free to mutate state and perform world effects.
pub trait Evaluator {
    fn evaluate(&self, ctx: &mut EvalContext<'_>) -> Option<Presentation>;

    /// Shown choice ids this evaluator can offer, for content validation.
    fn choice_labels(&self) -> Vec<&str> {
        Vec::new()
    }
}

impl Evaluator for Passage {
    fn evaluate(&self, ctx: &mut EvalContext<'_>) -> Option<Presentation> {
        let branch = self.branches.iter().find(|b| b.when.holds(ctx.store))?;

        // Choices see the state as it was when the branch was selected.
        let choices = branch
            .choices
            .iter()
            .filter(|entry| entry.when.holds(ctx.store))
            .map(ChoiceEntry::choice)
            .collect();

        for effect in &branch.effects {
            ctx.apply(effect);
        }

        Some(Presentation {
            title: self.title.clone(),
            text: branch.text.clone(),
            choices,
            animate: self.animate,
        })
    }

    fn choice_labels(&self) -> Vec<&str> {
        self.choice_entries().map(|e| e.label.as_str()).collect()
    }
}

/// Adapter so plain closures can be registered as evaluators.
pub struct FnEvaluator<F>(pub F);

impl<F> Evaluator for FnEvaluator<F>
where
    F: Fn(&mut EvalContext<'_>) -> Option<Presentation>,
{
    fn evaluate(&self, ctx: &mut EvalContext<'_>) -> Option<Presentation> {
        (self.0)(ctx)
    }
}

/// The authored table of passages, built once and immutable afterwards.
#[derive(Default)]
pub struct PassageRegistry {
    evaluators: FxHashMap<PassageId, Box<dyn Evaluator>>,
}

impl PassageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        id: PassageId,
        evaluator: Box<dyn Evaluator>,
    ) -> Result<(), ModuleError> {
        if self.evaluators.contains_key(&id) {
            return Err(ModuleError::DuplicatePassage(id));
        }
        self.evaluators.insert(id, evaluator);
        Ok(())
    }

    pub fn register_passage(&mut self, passage: Passage) -> Result<(), ModuleError> {
        let id = passage.id.clone();
        self.register(id, Box::new(passage))
    }

    pub fn register_fn<F>(&mut self, id: impl Into<String>, f: F) -> Result<(), ModuleError>
    where
        F: Fn(&mut EvalContext<'_>) -> Option<Presentation> + 'static,
    {
        self.register(PassageId::new(id), Box::new(FnEvaluator(f)))
    }

    pub fn get(&self, id: &str) -> Option<&dyn Evaluator> {
        self.evaluators.get(id).map(|e| e.as_ref())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.evaluators.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &PassageId> {
        self.evaluators.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PassageId, &dyn Evaluator)> {
        self.evaluators.iter().map(|(k, v)| (k, v.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.evaluators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.evaluators.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::host::RecordingHost;
    use crate::schema::condition::Condition;
    use crate::schema::passage::{Branch, Choice};

    fn entry(label: &str, when: Condition) -> ChoiceEntry {
        ChoiceEntry {
            when,
            label: label.to_string(),
            target: None,
        }
    }

    fn ladder() -> Passage {
        Passage {
            id: "knight".into(),
            name: Some("Knight".to_string()),
            title: "knight-title".to_string(),
            animate: false,
            branches: vec![
                Branch {
                    when: Condition::HasPickup("map".into()),
                    text: "map".to_string(),
                    choices: vec![],
                    effects: vec![Effect::SetStory("showedMap".into(), true)],
                },
                Branch {
                    when: Condition::Night,
                    text: "sleeping".to_string(),
                    choices: vec![],
                    effects: vec![],
                },
                Branch {
                    when: Condition::Always,
                    text: "silence".to_string(),
                    choices: vec![
                        entry("greet", Condition::Always),
                        entry("insult", Condition::Story("brave".into())),
                    ],
                    effects: vec![],
                },
            ],
        }
    }

    fn run(passage: &Passage, store: &mut StateStore, host: &mut RecordingHost) -> Option<Presentation> {
        let id = passage.id.clone();
        let mut ctx = EvalContext {
            passage: &id,
            store,
            host,
        };
        passage.evaluate(&mut ctx)
    }

    #[test]
    fn first_matching_branch_wins() {
        let passage = ladder();
        let mut store = StateStore::new();
        let mut host = RecordingHost::new();

        let p = run(&passage, &mut store, &mut host).unwrap();
        assert_eq!(p.text, "silence");
        assert_eq!(p.choices, vec![Choice::new("greet")]);
        assert_eq!(p.title, "knight-title");
        assert!(!p.animate);

        store.set_sun_event(crate::schema::time::SunEvent::Night);
        let p = run(&passage, &mut store, &mut host).unwrap();
        assert_eq!(p.text, "sleeping");

        // Pickup outranks night.
        store.add_pickup(crate::schema::pickup::Pickup::new("map", "document"));
        let p = run(&passage, &mut store, &mut host).unwrap();
        assert_eq!(p.text, "map");
        assert!(store.story_flag("showedMap"));
    }

    #[test]
    fn no_matching_branch_yields_nothing() {
        let passage = Passage {
            id: "well".into(),
            name: None,
            title: "well-title".to_string(),
            animate: true,
            branches: vec![Branch {
                when: Condition::Night,
                text: "echo".to_string(),
                choices: vec![],
                effects: vec![],
            }],
        };
        let mut store = StateStore::new();
        let mut host = RecordingHost::new();
        assert!(run(&passage, &mut store, &mut host).is_none());
    }

    #[test]
    fn exit_effect_reaches_host() {
        let passage = Passage {
            id: "dive".into(),
            name: None,
            title: "well-title".to_string(),
            animate: true,
            branches: vec![Branch {
                when: Condition::Always,
                text: String::new(),
                choices: vec![],
                effects: vec![Effect::Exit {
                    name: "well".to_string(),
                    immediate: true,
                }],
            }],
        };
        let mut store = StateStore::new();
        let mut host = RecordingHost::new();
        let p = run(&passage, &mut store, &mut host).unwrap();
        assert!(p.text.is_empty());
        assert_eq!(host.exits(), vec![("well", true)]);
    }

    #[test]
    fn registry_rejects_duplicates() {
        let mut registry = PassageRegistry::new();
        registry.register_passage(ladder()).unwrap();
        let err = registry.register_passage(ladder()).unwrap_err();
        assert!(matches!(err, ModuleError::DuplicatePassage(ref id) if id.as_str() == "knight"));
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("knight"));
        assert!(registry.get("fire").is_none());
    }

    #[test]
    fn closures_register_as_evaluators() {
        let mut registry = PassageRegistry::new();
        registry
            .register_fn("coin", |ctx| {
                ctx.store.set_marker("flipped");
                None
            })
            .unwrap();
        let evaluator = registry.get("coin").unwrap();
        assert!(evaluator.choice_labels().is_empty());

        let id = PassageId::new("coin");
        let mut store = StateStore::new();
        let mut host = RecordingHost::new();
        let mut ctx = EvalContext {
            passage: &id,
            store: &mut store,
            host: &mut host,
        };
        assert!(evaluator.evaluate(&mut ctx).is_none());
        assert!(store.has_marker("flipped"));
    }
}
