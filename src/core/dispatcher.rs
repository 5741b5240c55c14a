/// Dispatcher: routes passage ids to evaluators and choices to passages.
use crate::core::host::HostPort;
use crate::core::registry::{EvalContext, PassageRegistry};
use crate::core::resolver::ChoiceResolver;
use crate::core::state::StateStore;
use crate::schema::passage::PassageId;

/// What a single dispatch did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// The passage ran and its presentation was sent to the host.
    Displayed,
    /// The passage ran but produced nothing to show.
    Silent,
    /// No passage is registered under the id; nothing was mutated.
    NotFound,
}

/// What the engine did with a reported choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChoiceOutcome {
    /// The player dismissed the dialogue for this passage.
    Closed(PassageId),
    /// The choice resolved to `target`, which was dispatched.
    Dispatched { target: PassageId, result: Dispatch },
}

pub struct Dispatcher {
    registry: PassageRegistry,
    resolver: ChoiceResolver,
}

impl Dispatcher {
    pub fn new(registry: PassageRegistry, resolver: ChoiceResolver) -> Self {
        Self { registry, resolver }
    }

    pub fn registry(&self) -> &PassageRegistry {
        &self.registry
    }

    pub fn resolver(&self) -> &ChoiceResolver {
        &self.resolver
    }

    /// Run the passage registered under `id` and show its result.
    ///
    /// The visit count is incremented before the evaluator runs, so it
    /// counts every evaluation whether or not anything is displayed.
    pub fn dispatch(&self, id: &str, store: &mut StateStore, host: &mut dyn HostPort) -> Dispatch {
        let Some(evaluator) = self.registry.get(id) else {
            tracing::warn!("no passage registered for '{}'", id);
            host.log(&format!("No passage found for {id}, does it have content?"));
            return Dispatch::NotFound;
        };

        let passage = PassageId::new(id);
        store.increment(id);
        tracing::debug!("dispatch {} (visit {})", id, store.count(id));

        let presentation = {
            let mut ctx = EvalContext {
                passage: &passage,
                store: &mut *store,
                host: &mut *host,
            };
            evaluator.evaluate(&mut ctx)
        };

        match presentation {
            Some(p) if !p.text.is_empty() => {
                let params = store.template_params();
                host.display(
                    &passage,
                    &p.title,
                    &p.text,
                    &p.choice_labels(),
                    &params,
                    p.animate,
                );
                Dispatch::Displayed
            }
            _ => Dispatch::Silent,
        }
    }

    /// Handle a choice reported by the host. An empty choice id means the
    /// dialogue for `passage` was closed.
    pub fn choice_made(
        &self,
        passage: &str,
        choice: &str,
        store: &mut StateStore,
        host: &mut dyn HostPort,
    ) -> ChoiceOutcome {
        if choice.is_empty() {
            host.log(&format!("Passage {passage} closed."));
            return ChoiceOutcome::Closed(PassageId::new(passage));
        }

        let target = self.resolver.resolve(choice);
        tracing::debug!("choice made for {}: {} -> {}", passage, choice, target);
        let result = self.dispatch(target.as_str(), store, host);
        ChoiceOutcome::Dispatched { target, result }
    }
}
