//! Select and validate command implementations.

use std::path::Path;

use anyhow::{bail, Context, Result};

use labeler_core::{CoreSelections, ExtendedSelections, LeveledChoice, VocabularyKind};
use labeler_ops::{OpsContext, SelectCoreRequest, SelectExtendedRequest, Selections};

/// Validate picks against the vocabulary and print the summary.
pub fn execute(ctx: &OpsContext, kind: VocabularyKind, picks: &[String], json: bool) -> Result<()> {
    let (summary, dropped, document) = match kind {
        VocabularyKind::Core => {
            let response = ctx.select_core(SelectCoreRequest::new(parse_core_picks(picks)?));
            let document = serde_json::to_string_pretty(&response)?;
            (response.summary, response.dropped, document)
        }
        VocabularyKind::Extended => {
            let response =
                ctx.select_extended(SelectExtendedRequest::new(parse_extended_picks(picks)?));
            let document = serde_json::to_string_pretty(&response)?;
            (response.summary, response.dropped, document)
        }
    };

    if json {
        println!("{}", document);
        return Ok(());
    }

    println!("{}", summary);
    print_dropped(&dropped);
    Ok(())
}

/// Validate a selections document and print what survived.
pub fn validate_file(ctx: &OpsContext, kind: VocabularyKind, file: &Path) -> Result<()> {
    let contents = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let selections = Selections::from_json(kind, &contents)
        .with_context(|| format!("{} is not a selections document", file.display()))?;

    let response = ctx.validate(selections);
    if response.is_clean() {
        println!("✅ All selections are valid");
    } else {
        print_dropped(&response.dropped);
    }

    let validated = match &response.validated {
        Selections::Core(core) => serde_json::to_string_pretty(core)?,
        Selections::Extended(extended) => serde_json::to_string_pretty(extended)?,
    };
    println!("{}", validated);
    Ok(())
}

fn print_dropped(dropped: &[String]) {
    if !dropped.is_empty() {
        println!("⚠️  Dropped {} selection(s):", dropped.len());
        for key in dropped {
            println!("   • {}", key);
        }
    }
}

/// Parse `category.variable=value` picks.
pub fn parse_core_picks(picks: &[String]) -> Result<CoreSelections> {
    let mut selections = CoreSelections::default();
    for pick in picks {
        let (category, variable, value) = split_pick(pick)?;
        selections.insert(category, variable, value);
    }
    Ok(selections)
}

/// Parse `category.variable=primary[/secondary]` picks.
pub fn parse_extended_picks(picks: &[String]) -> Result<ExtendedSelections> {
    let mut selections = ExtendedSelections::default();
    for pick in picks {
        let (category, variable, value) = split_pick(pick)?;
        let choice = match value.split_once('/') {
            Some((primary, secondary)) => LeveledChoice::new(primary.trim(), secondary.trim()),
            None => LeveledChoice::primary(value),
        };
        selections.insert(category, variable, choice);
    }
    Ok(selections)
}

fn split_pick(pick: &str) -> Result<(&str, &str, &str)> {
    let Some((key, value)) = pick.split_once('=') else {
        bail!("Invalid pick '{}': expected category.variable=value", pick);
    };
    let Some((category, variable)) = key.split_once('.') else {
        bail!("Invalid pick '{}': key must be category.variable", pick);
    };
    let (category, variable, value) = (category.trim(), variable.trim(), value.trim());
    if category.is_empty() || variable.is_empty() {
        bail!("Invalid pick '{}': empty category or variable", pick);
    }
    Ok((category, variable, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn picks(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_core_picks() {
        let selections =
            parse_core_picks(&picks(&["appearance.hair_style=长发", " appearance.eye_color = 红色 "]))
                .unwrap();
        assert_eq!(selections.categories["appearance"]["hair_style"], "长发");
        assert_eq!(selections.categories["appearance"]["eye_color"], "红色");
    }

    #[test]
    fn test_parse_extended_picks() {
        let selections = parse_extended_picks(&picks(&[
            "state_action.expression=微笑/大笑",
            "environment.time=白天",
        ]))
        .unwrap();
        assert_eq!(
            selections.categories["state_action"]["expression"],
            LeveledChoice::new("微笑", "大笑")
        );
        assert_eq!(
            selections.categories["environment"]["time"],
            LeveledChoice::primary("白天")
        );
    }

    #[test]
    fn test_rejects_malformed_picks() {
        assert!(parse_core_picks(&picks(&["hair_style=长发"])).is_err());
        assert!(parse_core_picks(&picks(&["appearance.hair_style"])).is_err());
        assert!(parse_core_picks(&picks(&[".x=y"])).is_err());
    }
}
