use agentc::config::ConfigLoader;
use agentc::error::CompileError;
use agentc::tooling::cli::{Cli, CliContext, Commands};
use clap::Parser;

use crate::integration::support::{create_source_tree, write};

fn json(output: &str) -> serde_json::Value {
    serde_json::from_str(output).unwrap()
}

#[test]
fn compile_json_contract_has_required_fields() {
    let temp = create_source_tree();
    let cli = CliContext::new(temp.path().to_path_buf(), None).unwrap();

    let output = cli
        .execute(&Commands::Compile {
            format: "json".to_string(),
        })
        .unwrap();

    let parsed = json(&output.text);
    assert_eq!(parsed["profile"], "home");
    assert_eq!(parsed["agents"].as_array().unwrap().len(), 2);
    assert_eq!(parsed["skills"].as_array().unwrap().len(), 3);
    assert!(parsed["validation"]["warnings"].as_array().is_some());
    let written = &parsed["written"];
    assert_eq!(written["agents"], 2);
    assert_eq!(written["fingerprint"].as_str().unwrap().len(), 64);
}

#[test]
fn validate_json_contract_writes_nothing() {
    let temp = create_source_tree();
    let cli = CliContext::new(temp.path().to_path_buf(), None).unwrap();

    let output = cli
        .execute(&Commands::Validate {
            format: "json".to_string(),
        })
        .unwrap();

    assert!(output.success);
    let parsed = json(&output.text);
    assert_eq!(parsed["valid"], true);
    assert!(parsed["errors"].as_array().unwrap().is_empty());
    assert!(parsed["warnings"].as_array().is_some());
    assert!(!temp.path().join(".claude").exists());
}

#[test]
fn validate_json_reports_invalid() {
    let temp = create_source_tree();
    std::fs::remove_file(temp.path().join("agent-sources/developer/workflow.md")).unwrap();
    let cli = CliContext::new(temp.path().to_path_buf(), None).unwrap();

    let output = cli
        .execute(&Commands::Validate {
            format: "json".to_string(),
        })
        .unwrap();

    assert!(!output.success);
    let parsed = json(&output.text);
    assert_eq!(parsed["valid"], false);
    let errors = parsed["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].as_str().unwrap().contains("workflow.md"));
    assert_eq!(parsed["agents"], serde_json::json!(["developer", "reviewer"]));

    let text = cli
        .execute(&Commands::Validate {
            format: "text".to_string(),
        })
        .unwrap();
    assert!(!text.success);
    assert!(text.text.contains("Invalid (1 error(s))"));
    assert!(!temp.path().join(".claude").exists());
}

#[test]
fn output_dir_overlapping_sources_is_rejected() {
    let temp = create_source_tree();
    let source = temp.path().to_string_lossy().to_string();
    let cli = Cli::parse_from(["agentc", "--source", source.as_str(), "--out", "."]);
    let context = CliContext::from_cli(&cli).unwrap();

    let err = context.execute(&cli.command()).unwrap_err();
    assert!(matches!(err, CompileError::Config(_)));
    assert!(temp.path().join("skills/frontend/react/SKILL.md").is_file());
    assert!(temp.path().join("commands/review.md").is_file());
}

#[test]
fn profiles_lists_sorted_names() {
    let temp = create_source_tree();
    write(temp.path(), "profiles/empty-dir/notes.md", "not a profile");
    let cli = CliContext::new(temp.path().to_path_buf(), None).unwrap();

    let output = cli
        .execute(&Commands::Profiles {
            format: "json".to_string(),
        })
        .unwrap();

    let parsed = json(&output.text);
    assert_eq!(parsed["default"], "home");
    assert_eq!(parsed["profiles"], serde_json::json!(["home", "minimal"]));

    let text = cli
        .execute(&Commands::Profiles {
            format: "text".to_string(),
        })
        .unwrap();
    assert!(text.success);
    assert!(text.text.contains("minimal"));
}

#[test]
fn project_config_file_selects_profile_and_output() {
    let temp = create_source_tree();
    write(
        temp.path(),
        "agentc.toml",
        "default_profile = \"minimal\"\n\n[output]\ndir = \"build/claude\"\n",
    );
    let cli = CliContext::new(temp.path().to_path_buf(), None).unwrap();
    assert_eq!(cli.profile(), "minimal");

    cli.execute(&Commands::Compile {
        format: "text".to_string(),
    })
    .unwrap();
    assert!(temp.path().join("build/claude/agents/developer.md").is_file());
    assert!(!temp.path().join(".claude").exists());
}

#[test]
fn cli_flags_override_project_config() {
    let temp = create_source_tree();
    let source = temp.path().to_string_lossy().to_string();
    let cli = Cli::parse_from([
        "agentc",
        "compile",
        "--source",
        source.as_str(),
        "--profile",
        "minimal",
        "--out",
        "generated",
    ]);

    let context = CliContext::from_cli(&cli).unwrap();
    assert_eq!(context.profile(), "minimal");
    context.execute(&cli.command()).unwrap();
    assert!(temp.path().join("generated/agents/developer.md").is_file());
}

#[test]
fn validation_failure_surfaces_as_error() {
    let temp = create_source_tree();
    std::fs::remove_file(temp.path().join("core-prompts/core-principles.md")).unwrap();
    let cli = CliContext::new(temp.path().to_path_buf(), None).unwrap();

    let err = cli
        .execute(&Commands::Compile {
            format: "text".to_string(),
        })
        .unwrap_err();
    match err {
        CompileError::Validation(result) => {
            assert!(result
                .errors
                .iter()
                .any(|e| e.contains("Baseline core prompt not found")));
        }
        other => panic!("Expected validation error, got {:?}", other),
    }
}

#[test]
fn missing_source_root_is_config_error() {
    let temp = create_source_tree();
    let missing = temp.path().join("nowhere");
    assert!(matches!(
        CliContext::new(missing, None),
        Err(CompileError::Config(_))
    ));
}

#[test]
fn explicit_config_file_must_exist() {
    let temp = create_source_tree();
    assert!(ConfigLoader::load_from_file(&temp.path().join("missing.toml")).is_err());

    let missing = temp.path().join("missing.toml");
    let cli = Cli::parse_from([
        "agentc",
        "--source",
        temp.path().to_str().unwrap(),
        "--config",
        missing.to_str().unwrap(),
    ]);
    assert!(matches!(
        CliContext::from_cli(&cli),
        Err(CompileError::Config(_))
    ));
    assert_eq!(ConfigLoader::default().default_profile, "home");
}
