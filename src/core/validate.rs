/// Content validation: checks that every reachable id names a registered passage.
use thiserror::Error;

use crate::core::registry::PassageRegistry;
use crate::core::resolver::ChoiceResolver;
use crate::core::stage::StageController;
use crate::schema::passage::PassageId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationIssue {
    #[error("passage '{passage}' offers choice '{label}' which resolves to unregistered '{target}'")]
    DanglingChoice {
        passage: PassageId,
        label: String,
        target: PassageId,
    },
    #[error("alias '{shown}' points at unregistered passage '{target}'")]
    DanglingAlias { shown: String, target: PassageId },
    #[error("alias '{shown}' points at '{target}', which is itself an alias")]
    ChainedAlias { shown: String, target: PassageId },
    #[error("sensor '{sensor}' stages unregistered passage '{target}'")]
    DanglingStage { sensor: String, target: PassageId },
    #[error("alias '{shown}' shadows a registered passage of the same id")]
    ShadowedPassage { shown: String },
}

impl ValidationIssue {
    /// Warnings do not make content unusable.
    pub fn is_error(&self) -> bool {
        !matches!(self, Self::ShadowedPassage { .. })
    }
}

/// Check choices, aliases and stage bindings. Issues come back sorted by
/// their message so reports are stable.
pub fn validate(
    registry: &PassageRegistry,
    resolver: &ChoiceResolver,
    stages: &StageController,
) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    for (id, evaluator) in registry.iter() {
        for label in evaluator.choice_labels() {
            let target = resolver.resolve(label);
            if !registry.contains(target.as_str()) {
                issues.push(ValidationIssue::DanglingChoice {
                    passage: id.clone(),
                    label: label.to_string(),
                    target,
                });
            }
        }
    }

    for (shown, target) in resolver.iter() {
        if resolver.is_alias(target.as_str()) {
            issues.push(ValidationIssue::ChainedAlias {
                shown: shown.to_string(),
                target: target.clone(),
            });
        } else if !registry.contains(target.as_str()) {
            issues.push(ValidationIssue::DanglingAlias {
                shown: shown.to_string(),
                target: target.clone(),
            });
        }
        if registry.contains(shown) {
            issues.push(ValidationIssue::ShadowedPassage {
                shown: shown.to_string(),
            });
        }
    }

    for (sensor, target) in stages.bindings() {
        if !registry.contains(target.as_str()) {
            issues.push(ValidationIssue::DanglingStage {
                sensor: sensor.to_string(),
                target: target.clone(),
            });
        }
    }

    issues.sort_by_key(|i| i.to_string());
    issues
}
