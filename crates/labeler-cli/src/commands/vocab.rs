//! Vocab command implementation.
//!
//! Prints the stored vocabularies as a tree, as selectors, or as JSON.

use anyhow::Result;

use labeler_core::{ConfigScope, Selector, SelectorLevel};
use labeler_ops::OpsContext;

/// Show the vocabularies in `scope`.
pub fn execute(ctx: &OpsContext, scope: ConfigScope, selectors: bool, json: bool) -> Result<()> {
    if json {
        let mut document = serde_json::Map::new();
        if scope.includes_core() {
            document.insert("core_variables".into(), serde_json::to_value(ctx.core_vocabulary())?);
        }
        if scope.includes_extended() {
            document.insert(
                "variable_variables".into(),
                serde_json::to_value(ctx.extended_vocabulary())?,
            );
        }
        println!("{}", serde_json::to_string_pretty(&document)?);
        return Ok(());
    }

    if scope.includes_core() {
        let core = ctx.core_vocabulary();
        println!("🎯 Core vocabulary");
        println!("   {}", core.path.display());
        if selectors {
            print_selectors(&core.selectors);
        } else {
            for (category, vars) in &core.vocabulary.categories {
                println!("  {}", category);
                for (variable, options) in vars {
                    println!("    • {}: {}", variable, options.join(", "));
                }
            }
        }
        println!();
    }

    if scope.includes_extended() {
        let extended = ctx.extended_vocabulary();
        println!("🎭 Extended vocabulary");
        println!("   {}", extended.path.display());
        if selectors {
            print_selectors(&extended.selectors);
        } else {
            for (category, vars) in &extended.vocabulary.categories {
                println!("  {}", category);
                for (variable, entry) in vars {
                    println!("    • {}: {}", variable, entry.primary.join(", "));
                    for (primary, refinements) in &entry.secondary {
                        if !refinements.is_empty() {
                            println!("        ↳ {}: {}", primary, refinements.join(", "));
                        }
                    }
                }
            }
        }
        println!();
    }

    Ok(())
}

fn print_selectors(selectors: &[Selector]) {
    for selector in selectors {
        let level = match selector.level {
            SelectorLevel::Single => "single",
            SelectorLevel::Primary => "level 1",
            SelectorLevel::Secondary => "level 2",
        };
        println!(
            "    {} [{}] default={} ({} options)",
            selector.key,
            level,
            selector.default,
            selector.options.len()
        );
    }
}
