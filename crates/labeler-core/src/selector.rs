//! Widget descriptors derived from a vocabulary.
//!
//! A host builds one drop-down per [`Selector`]; the key is the field name it
//! sends back.

use serde::{Deserialize, Serialize};

use crate::{CoreVocabulary, ExtendedVocabulary};

/// Which tier a selector drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectorLevel {
    /// A flat core variable.
    Single,
    /// Primary tier of an extended variable.
    Primary,
    /// Secondary tier of an extended variable.
    Secondary,
}

/// One selection widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selector {
    /// Field name used by the host.
    pub key: String,
    pub category: String,
    pub variable: String,
    pub level: SelectorLevel,
    /// Options in display order; never empty.
    pub options: Vec<String>,
    /// Preselected option (the first one).
    pub default: String,
}

impl CoreVocabulary {
    /// One selector per variable with a non-empty option list, keyed by variable name.
    pub fn selectors(&self) -> Vec<Selector> {
        let mut selectors = Vec::new();
        for (category, vars) in &self.categories {
            for (variable, options) in vars {
                let Some(first) = options.first() else {
                    continue;
                };
                selectors.push(Selector {
                    key: variable.clone(),
                    category: category.clone(),
                    variable: variable.clone(),
                    level: SelectorLevel::Single,
                    options: options.clone(),
                    default: first.clone(),
                });
            }
        }
        selectors
    }
}

impl ExtendedVocabulary {
    /// Primary selectors (`<category>_<variable>_level1`) and, when the default
    /// primary has refinements, a secondary selector (`..._level2`) listing them.
    pub fn selectors(&self) -> Vec<Selector> {
        let mut selectors = Vec::new();
        for (category, vars) in &self.categories {
            for (variable, entry) in vars {
                let Some(default_primary) = entry.primary.first() else {
                    continue;
                };
                selectors.push(Selector {
                    key: format!("{}_{}_level1", category, variable),
                    category: category.clone(),
                    variable: variable.clone(),
                    level: SelectorLevel::Primary,
                    options: entry.primary.clone(),
                    default: default_primary.clone(),
                });

                let secondary = entry.secondary_for(default_primary);
                if let Some(first) = secondary.first() {
                    selectors.push(Selector {
                        key: format!("{}_{}_level2", category, variable),
                        category: category.clone(),
                        variable: variable.clone(),
                        level: SelectorLevel::Secondary,
                        options: secondary.to_vec(),
                        default: first.clone(),
                    });
                }
            }
        }
        selectors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_selectors_skip_empty_lists() {
        let mut vocab = CoreVocabulary::seed();
        vocab
            .categories
            .get_mut("appearance")
            .unwrap()
            .insert("scars".to_string(), vec![]);

        let selectors = vocab.selectors();
        assert_eq!(selectors.len(), 9);
        assert!(selectors.iter().all(|s| s.key != "scars"));
        assert_eq!(selectors[0].key, "hair_style");
        assert_eq!(selectors[0].default, "长发");
    }

    #[test]
    fn test_extended_selectors_follow_default_primary() {
        let selectors = ExtendedVocabulary::seed().selectors();

        let level2 = selectors
            .iter()
            .find(|s| s.key == "state_action_expression_level2")
            .unwrap();
        assert_eq!(level2.level, SelectorLevel::Secondary);
        assert_eq!(level2.options[1], "大笑");

        // Primary-only entries produce no secondary selector.
        assert!(selectors.iter().any(|s| s.key == "additional_weather_level1"));
        assert!(!selectors.iter().any(|s| s.key == "additional_weather_level2"));
    }
}
