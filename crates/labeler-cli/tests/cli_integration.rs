//! Integration tests for the clabel CLI.
//!
//! Every test runs the binary against its own temporary vocabulary
//! directory and settings file, so nothing touches the user's config.
//!
//! Run with: `cargo test --package labeler-cli --test cli_integration`

use std::fs;
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

/// Helper to run clabel isolated inside `temp`.
fn run_clabel(temp: &TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_clabel"))
        .current_dir(temp.path())
        .env("LABELER_CONFIG_DIR", temp.path().join("vocab"))
        .env("LABELER_SETTINGS_FILE", temp.path().join("settings.json"))
        .env("LABELER_SEED", "7")
        .env_remove("LABELER_LANGUAGE")
        .env_remove("LABELER_SEPARATOR")
        .args(args)
        .output()
        .expect("Failed to execute clabel command")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

// =============================================================================
// Compose & Prompt Tests
// =============================================================================

#[test]
fn test_compose_tag_list_chinese() {
    let temp = TempDir::new().unwrap();

    let output = run_clabel(
        &temp,
        &["compose", "-p", "appearance.hair_style=长发", "-t", "red eyes"],
    );

    assert!(output.status.success(), "compose should succeed");
    assert_eq!(stdout(&output).trim(), "长发, red eyes");
}

#[test]
fn test_compose_tag_list_english() {
    let temp = TempDir::new().unwrap();

    let output = run_clabel(
        &temp,
        &[
            "compose",
            "-p",
            "appearance.hair_style=长发",
            "-t",
            "red eyes",
            "--language",
            "en",
        ],
    );

    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "long hair, red eyes");
}

#[test]
fn test_compose_json_format_is_parseable() {
    let temp = TempDir::new().unwrap();

    let output = run_clabel(
        &temp,
        &[
            "compose",
            "-p",
            "appearance.hair_style=长发",
            "-x",
            "state_action.expression=微笑/大笑",
            "--format",
            "json",
        ],
    );

    assert!(output.status.success());
    let document: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(document["summary"]["core_tags_count"], 1);
    assert_eq!(document["summary"]["variable_tags_count"], 1);
    assert_eq!(
        document["metadata"]["generator"],
        "ComfyUI Character Labeler"
    );
}

#[test]
fn test_compose_reads_selection_files() {
    let temp = TempDir::new().unwrap();
    let core = temp.path().join("core.json");
    fs::write(&core, r#"{"appearance": {"eye_color": "红色"}}"#).unwrap();

    let output = run_clabel(
        &temp,
        &["compose", "--core", core.to_str().unwrap(), "-s", " | ", "-t", "smile"],
    );

    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "红色 | smile");
}

#[test]
fn test_compose_rejects_malformed_pick() {
    let temp = TempDir::new().unwrap();

    let output = run_clabel(&temp, &["compose", "-p", "hair_style"]);

    assert!(!output.status.success(), "a pick without '=' should fail");
}

#[test]
fn test_prompt_style() {
    let temp = TempDir::new().unwrap();

    let output = run_clabel(&temp, &["prompt", "1girl,  silver hair ,", "--style", "anime"]);

    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "anime style, 1girl, silver hair");
}

// =============================================================================
// Selection Tests
// =============================================================================

#[test]
fn test_select_reports_dropped_picks() {
    let temp = TempDir::new().unwrap();

    let output = run_clabel(
        &temp,
        &[
            "select",
            "core",
            "-p",
            "appearance.hair_style=长发",
            "-p",
            "appearance.eye_color=紫罗兰",
        ],
    );
    let out = stdout(&output);

    assert!(output.status.success());
    assert!(out.contains("核心变量: hair_style: 长发"), "{}", out);
    assert!(out.contains("Dropped 1 selection(s)"), "{}", out);
    assert!(out.contains("appearance.eye_color"), "{}", out);
}

#[test]
fn test_validate_file() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("extended.json");
    fs::write(
        &file,
        r#"{"state_action": {"expression": {"一级": "微笑", "二级": "大笑"}}}"#,
    )
    .unwrap();

    let output = run_clabel(&temp, &["validate", "extended", "-f", file.to_str().unwrap()]);
    let out = stdout(&output);

    assert!(output.status.success());
    assert!(out.contains("✅ All selections are valid"), "{}", out);
    assert!(out.contains("\"secondary\": \"大笑\""), "{}", out);
}

// =============================================================================
// Analyze Tests
// =============================================================================

#[test]
fn test_analyze_json_is_reproducible() {
    let temp = TempDir::new().unwrap();
    let args = ["analyze", "--threshold", "0", "--json"];

    let first: Value = serde_json::from_str(&stdout(&run_clabel(&temp, &args))).unwrap();
    let second: Value = serde_json::from_str(&stdout(&run_clabel(&temp, &args))).unwrap();

    assert_eq!(first["results"].as_object().unwrap().len(), 8);
    assert_eq!(first["results"], second["results"]);
    assert_eq!(first["backend"], "mock");
}

#[test]
fn test_analyze_categories_top() {
    let temp = TempDir::new().unwrap();

    let output = run_clabel(
        &temp,
        &["analyze", "--categories", "--top", "2", "--language", "en", "--json"],
    );

    assert!(output.status.success());
    let response: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(response["results"].as_object().unwrap().len(), 2);
    assert!(response["summary"]
        .as_str()
        .unwrap()
        .starts_with("CLIP analysis detected: "));
}

// =============================================================================
// Config & Settings Tests
// =============================================================================

#[test]
fn test_config_inspect() {
    let temp = TempDir::new().unwrap();

    let output = run_clabel(&temp, &["config", "inspect", "--scope", "core"]);
    let out = stdout(&output);

    assert!(output.status.success());
    assert!(out.contains("📋 Core vocabulary"), "{}", out);
    assert!(out.contains("    - hair_style: 10 options"), "{}", out);
    assert!(out.contains("📁 Configuration files:"), "{}", out);
}

#[test]
fn test_config_reset_restores_seed() {
    let temp = TempDir::new().unwrap();
    let vocab = temp.path().join("vocab");

    // First run seeds the documents; then clobber the core one.
    assert!(run_clabel(&temp, &["config", "reload"]).status.success());
    fs::write(vocab.join("core_variables.json"), "{}").unwrap();

    let output = run_clabel(&temp, &["config", "reset", "--scope", "core"]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("🔄 Core vocabulary reset to defaults"));
    let restored = fs::read_to_string(vocab.join("core_variables.json")).unwrap();
    assert!(restored.contains("长发"));
}

#[test]
fn test_config_export() {
    let temp = TempDir::new().unwrap();
    let out_dir = temp.path().join("exported");

    let output = run_clabel(
        &temp,
        &["config", "export", "--dir", out_dir.to_str().unwrap()],
    );

    assert!(output.status.success());
    assert!(stdout(&output).contains("📤 Exported to:"));
    assert!(out_dir.join("core_variables.json").exists());
    assert!(out_dir.join("variable_variables.json").exists());
}

#[test]
fn test_config_import_failure_exits_nonzero() {
    let temp = TempDir::new().unwrap();

    let output = run_clabel(&temp, &["config", "import"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("❌ Configuration management failed"),
        "{}",
        stderr
    );
}

#[test]
fn test_settings_set_then_get() {
    let temp = TempDir::new().unwrap();

    let output = run_clabel(&temp, &["settings", "set", "separator", " / "]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("✅ Set separator to:"));
    assert!(temp.path().join("settings.json").exists());

    let output = run_clabel(&temp, &["settings", "get", "separator"]);
    assert_eq!(stdout(&output).trim_end_matches('\n'), " / ");

    let output = run_clabel(&temp, &["compose", "-t", "a, b"]);
    assert_eq!(stdout(&output).trim(), "a / b");
}

#[test]
fn test_settings_set_does_not_persist_overrides() {
    let temp = TempDir::new().unwrap();
    let one_off = temp.path().join("elsewhere");

    let output = run_clabel(
        &temp,
        &[
            "--config-dir",
            one_off.to_str().unwrap(),
            "settings",
            "set",
            "language",
            "en",
        ],
    );
    assert!(output.status.success());

    let saved: Value =
        serde_json::from_str(&fs::read_to_string(temp.path().join("settings.json")).unwrap())
            .unwrap();
    assert_eq!(saved["language"], "en");
    // LABELER_SEED, LABELER_CONFIG_DIR and --config-dir belong to the run, not the file.
    assert!(saved.get("analysis_seed").is_none(), "{}", saved);
    let saved_dir = saved["config_dir"].as_str().unwrap();
    assert_ne!(saved_dir, one_off.to_str().unwrap());
    assert_ne!(saved_dir, temp.path().join("vocab").to_str().unwrap());
}

#[test]
fn test_settings_rejects_unknown_key() {
    let temp = TempDir::new().unwrap();

    let output = run_clabel(&temp, &["settings", "set", "colour", "red"]);

    assert!(!output.status.success());
}
