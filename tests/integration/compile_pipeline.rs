use std::fs;
use std::path::Path;

use agentc::compiler::{CompileMode, Compiler};
use agentc::config::CompilerConfig;
use agentc::error::CompileError;

use crate::integration::support::{create_source_tree, write, REGISTRY};

fn compiler(root: &Path) -> Compiler {
    Compiler::new(root, CompilerConfig::default())
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn compile_writes_agents_skills_commands_and_root_document() {
    let temp = create_source_tree();
    let root = temp.path();

    let report = compiler(root).compile("home", CompileMode::Write).unwrap();
    assert_eq!(report.agents, vec!["developer", "reviewer"]);
    assert_eq!(
        report.skills,
        vec!["frontend/react", "backend/postgres", "testing/vitest"]
    );

    let out = root.join(".claude");
    let developer = read(&out.join("agents/developer.md"));
    assert!(developer.starts_with("---\nname: developer\n"));
    assert!(developer.contains("model: sonnet"));
    assert!(developer.contains("tools: Read, Write, Edit"));
    assert!(developer.contains("You are the developer."));
    assert!(developer.contains("Be precise."));
    assert!(developer.contains("Keep notes short."));
    assert!(developer.contains("Never skip tests."));
    assert!(developer.contains("Summarize what changed."));

    assert_eq!(read(&out.join("skills/frontend-react/SKILL.md")), "# React skill");
    assert!(out.join("skills/frontend-react/examples.md").is_file());
    assert!(out.join("skills/frontend-react/scripts/lint.sh").is_file());
    assert_eq!(
        read(&out.join("skills/backend-postgres/SKILL.md")),
        "# Postgres skill"
    );
    assert_eq!(read(&out.join("skills/testing-vitest/SKILL.md")), "# Vitest skill");
    assert_eq!(read(&out.join("commands/review.md")), "Review the diff.");
    assert_eq!(read(&root.join("CLAUDE.md")), "# Home\n");

    let written = report.written.unwrap();
    assert_eq!(written.agents, 2);
    assert_eq!(written.skills, 3);
    assert_eq!(written.commands, 1);
}

#[test]
fn stack_skills_apply_when_no_explicit_skills() {
    let temp = create_source_tree();
    let root = temp.path();
    compiler(root).compile("home", CompileMode::Write).unwrap();

    let developer = read(&root.join(".claude/agents/developer.md"));
    assert!(developer.contains("### React"));
    assert!(developer.contains("when working with react (ui)"));
    assert!(developer.contains("### Postgres"));
    assert!(developer.contains("when working with postgres (data)"));
    assert!(!developer.contains("### Vitest"));
}

#[test]
fn explicit_skills_replace_the_stack() {
    let temp = create_source_tree();
    let root = temp.path();
    compiler(root).compile("home", CompileMode::Write).unwrap();

    let reviewer = read(&root.join(".claude/agents/reviewer.md"));
    assert!(reviewer.contains("### Vitest"));
    assert!(reviewer.contains("when reviewing test coverage"));
    assert!(!reviewer.contains("### React"));
    assert!(!reviewer.contains("### Postgres"));
}

#[test]
fn rebuild_is_byte_identical() {
    let temp = create_source_tree();
    let root = temp.path();
    let compiler = compiler(root);

    let first = compiler.compile("home", CompileMode::Write).unwrap();
    let developer = read(&root.join(".claude/agents/developer.md"));
    let second = compiler.compile("home", CompileMode::Write).unwrap();

    assert_eq!(
        first.written.unwrap().fingerprint,
        second.written.unwrap().fingerprint
    );
    assert_eq!(developer, read(&root.join(".claude/agents/developer.md")));

    let leftovers: Vec<_> = fs::read_dir(root.join(".claude"))
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().starts_with(".agentc-staging"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn switching_profiles_removes_stale_output() {
    let temp = create_source_tree();
    let root = temp.path();
    let compiler = compiler(root);

    compiler.compile("home", CompileMode::Write).unwrap();
    write(root, ".claude/settings.json", "{}");
    compiler.compile("minimal", CompileMode::Write).unwrap();

    let out = root.join(".claude");
    assert!(out.join("agents/developer.md").is_file());
    assert!(!out.join("agents/reviewer.md").exists());
    assert!(!out.join("skills/frontend-react").exists());
    assert!(out.join("settings.json").is_file());
    assert_eq!(read(&root.join("CLAUDE.md")), "# Minimal\n");
}

#[test]
fn unknown_skill_fails_before_writing() {
    let temp = create_source_tree();
    let root = temp.path();
    write(
        root,
        "profiles/broken/config.yaml",
        "claude_md: profiles/home/CLAUDE.md\nagents:\n  developer:\n    skills:\n      - id: does/not-exist\n",
    );

    let err = compiler(root).compile("broken", CompileMode::Write).unwrap_err();
    match err {
        CompileError::Reference(message) => assert!(message.contains("does/not-exist")),
        other => panic!("Expected reference error, got {:?}", other),
    }
    assert!(!root.join(".claude").exists());
    assert!(!root.join("CLAUDE.md").exists());
}

#[test]
fn unknown_stack_skill_fails_before_writing() {
    let temp = create_source_tree();
    let root = temp.path();
    write(root, "stacks/web.yaml", "skills:\n  ui: frontend/vue\n");

    let err = compiler(root).compile("home", CompileMode::Write).unwrap_err();
    assert!(matches!(err, CompileError::Reference(_)));
    assert!(!root.join(".claude").exists());
}

#[test]
fn validation_reports_every_error_and_leaves_output_untouched() {
    let temp = create_source_tree();
    let root = temp.path();
    let compiler = compiler(root);
    compiler.compile("home", CompileMode::Write).unwrap();
    let before = read(&root.join(".claude/agents/developer.md"));

    fs::remove_file(root.join("agent-sources/developer/workflow.md")).unwrap();
    fs::remove_file(root.join("agent-sources/reviewer/intro.md")).unwrap();
    fs::remove_file(root.join("core-prompts/context-management.md")).unwrap();
    fs::remove_file(root.join("skills/testing/vitest.md")).unwrap();

    let err = compiler.compile("home", CompileMode::Write).unwrap_err();
    let result = match err {
        CompileError::Validation(result) => result,
        other => panic!("Expected validation error, got {:?}", other),
    };
    assert_eq!(result.errors.len(), 4, "errors: {:?}", result.errors);
    assert!(result.errors.iter().any(|e| e.contains("workflow.md")));
    assert!(result.errors.iter().any(|e| e.contains("intro.md")));
    assert!(result.errors.iter().any(|e| e.contains("context-management")));
    assert!(result.errors.iter().any(|e| e.contains("testing/vitest")));
    assert!(!result.warnings.is_empty());

    assert_eq!(before, read(&root.join(".claude/agents/developer.md")));
}

#[test]
fn check_only_writes_nothing() {
    let temp = create_source_tree();
    let root = temp.path();

    let report = compiler(root).check("home").unwrap();
    assert!(report.validation.is_valid());
    assert!(report.written.is_none());
    assert!(!root.join(".claude").exists());
    assert!(!root.join("CLAUDE.md").exists());
}

#[test]
fn missing_profile_is_load_error() {
    let temp = create_source_tree();
    let err = compiler(temp.path())
        .compile("nope", CompileMode::Write)
        .unwrap_err();
    assert!(matches!(err, CompileError::Load { .. }));
}

#[test]
fn custom_template_in_source_tree_is_used() {
    let temp = create_source_tree();
    let root = temp.path();
    write(
        root,
        "templates/agent.md.tera",
        "# {{ agent.title }} for {{ profile }}\n{% for skill in skills %}- {{ skill.id }}\n{% endfor %}",
    );

    compiler(root).compile("home", CompileMode::Write).unwrap();
    assert_eq!(
        read(&root.join(".claude/agents/reviewer.md")),
        "# Reviewer for home\n- testing/vitest\n"
    );
}

#[test]
fn output_dir_at_source_root_is_rejected_and_sources_survive() {
    let temp = create_source_tree();
    let root = temp.path();
    let mut config = CompilerConfig::default();
    config.output.dir = ".".into();
    let compiler = Compiler::new(root, config);

    for _ in 0..2 {
        let err = compiler.compile("home", CompileMode::Write).unwrap_err();
        assert!(matches!(err, CompileError::Config(_)), "got {:?}", err);
    }
    assert_eq!(read(&root.join("skills/frontend/react/SKILL.md")), "# React skill");
    assert_eq!(read(&root.join("skills/backend/postgres.md")), "# Postgres skill");
    assert_eq!(read(&root.join("commands/review.md")), "Review the diff.");
    assert!(!root.join("agents").exists());
}

#[test]
fn colliding_skill_output_names_fail_validation() {
    let temp = create_source_tree();
    let root = temp.path();
    let registry = format!(
        "{}  testing-vitest:\n    name: Other\n    description: Clashes with testing/vitest\n    path: skills/other.md\n",
        REGISTRY
    );
    write(root, "registry.yaml", &registry);
    write(root, "skills/other.md", "# OTHER");
    write(
        root,
        "profiles/clash/config.yaml",
        "claude_md: profiles/home/CLAUDE.md\nagents:\n  reviewer:\n    core_prompts: [core-principles]\n    skills:\n      - id: testing/vitest\n      - id: testing-vitest\n",
    );

    let err = compiler(root).compile("clash", CompileMode::Write).unwrap_err();
    let result = match err {
        CompileError::Validation(result) => result,
        other => panic!("Expected validation error, got {:?}", other),
    };
    assert!(result
        .errors
        .iter()
        .any(|e| e.contains("both write to skills/testing-vitest")));
    assert!(!root.join(".claude").exists());
}

#[test]
fn agent_id_with_path_separator_fails_validation() {
    let temp = create_source_tree();
    let root = temp.path();
    let registry = format!(
        "{}\n",
        REGISTRY.replace("agents:\n", "agents:\n  team/developer:\n    title: Team Developer\n    description: Nested id\n    output_format: output-formats-developer\n")
    );
    write(root, "registry.yaml", &registry);
    for fragment in ["intro.md", "workflow.md"] {
        write(root, &format!("agent-sources/team/developer/{}", fragment), "text");
    }
    write(
        root,
        "profiles/nested/config.yaml",
        "claude_md: profiles/home/CLAUDE.md\nagents:\n  team/developer:\n    core_prompts: [core-principles]\n",
    );

    let err = compiler(root).compile("nested", CompileMode::Write).unwrap_err();
    let result = match err {
        CompileError::Validation(result) => result,
        other => panic!("Expected validation error, got {:?}", other),
    };
    assert_eq!(result.errors.len(), 1, "errors: {:?}", result.errors);
    assert!(result.errors[0].contains("team/developer"));
    assert!(!root.join(".claude").exists());
}

#[test]
fn check_reports_invalid_profile_without_error() {
    let temp = create_source_tree();
    let root = temp.path();
    fs::remove_file(root.join("agent-sources/reviewer/workflow.md")).unwrap();

    let report = compiler(root).check("home").unwrap();
    assert!(!report.validation.is_valid());
    assert_eq!(report.validation.errors.len(), 1);
    assert_eq!(report.agents, vec!["developer", "reviewer"]);
    assert!(report.written.is_none());
    assert!(!root.join(".claude").exists());
}
