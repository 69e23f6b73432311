//! Selection validation against a vocabulary.
//!
//! Validation is best-effort filtering, never an error: anything the
//! vocabulary does not admit is dropped, and absence from the result is the
//! only failure signal.

use indexmap::IndexMap;

use labeler_core::{CoreSelections, CoreVocabulary, ExtendedSelections, ExtendedVocabulary, LeveledChoice};

/// Keep only core choices whose value is listed for their variable.
///
/// A category present in both input and vocabulary is kept (possibly empty)
/// even when none of its variables survive.
pub fn validate_core(selections: &CoreSelections, vocab: &CoreVocabulary) -> CoreSelections {
    let mut validated = CoreSelections::default();

    for (category, choices) in &selections.categories {
        if !vocab.categories.contains_key(category) {
            continue;
        }
        let kept: IndexMap<String, String> = choices
            .iter()
            .filter(|(variable, value)| vocab.admits(category, variable, value))
            .map(|(variable, value)| (variable.clone(), value.clone()))
            .collect();
        validated.categories.insert(category.clone(), kept);
    }

    validated
}

/// Keep extended choices whose sub-variable exists and whose primary is listed.
///
/// The secondary survives only when it was supplied, the entry declares a
/// secondary tier, and it is listed under the *chosen* primary; otherwise it
/// resets to empty.
pub fn validate_extended(
    selections: &ExtendedSelections,
    vocab: &ExtendedVocabulary,
) -> ExtendedSelections {
    let mut validated = ExtendedSelections::default();

    for (category, choices) in &selections.categories {
        let Some(template) = vocab.categories.get(category) else {
            continue;
        };

        let mut kept = IndexMap::new();
        for (variable, choice) in choices {
            let Some(entry) = template.get(variable) else {
                continue;
            };

            if !entry.primary.contains(&choice.primary) {
                continue;
            }

            let mut checked = LeveledChoice::primary(choice.primary.clone());
            if !choice.secondary.is_empty()
                && entry.has_secondary_tier()
                && entry
                    .secondary_for(&choice.primary)
                    .contains(&choice.secondary)
            {
                checked.secondary = choice.secondary.clone();
            }
            kept.insert(variable.clone(), checked);
        }
        validated.categories.insert(category.clone(), kept);
    }

    validated
}

/// `category.variable` keys present in `input` but absent from `validated`.
pub(crate) fn dropped_keys<T>(
    input: &IndexMap<String, IndexMap<String, T>>,
    validated: &IndexMap<String, IndexMap<String, T>>,
) -> Vec<String> {
    let mut dropped = Vec::new();
    for (category, vars) in input {
        for variable in vars.keys() {
            let survived = validated
                .get(category)
                .map(|v| v.contains_key(variable))
                .unwrap_or(false);
            if !survived {
                dropped.push(format!("{}.{}", category, variable));
            }
        }
    }
    dropped
}
