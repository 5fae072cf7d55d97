use std::fs;
use std::path::Path;

use tempfile::TempDir;

pub const REGISTRY: &str = r#"
agents:
  developer:
    title: Developer
    description: Implements features
    model: sonnet
    tools: Read, Write, Edit
    output_format: output-formats-developer
  reviewer:
    title: Reviewer
    description: Reviews changes
    tools: [Read, Grep]
    output_format: output-formats-reviewer
skills:
  frontend/react:
    name: React
    description: Component patterns
    path: skills/frontend/react/
  backend/postgres:
    name: Postgres
    description: Schema and query conventions
    path: skills/backend/postgres.md
  testing/vitest:
    name: Vitest
    description: Unit testing
    path: skills/testing/vitest.md
"#;

pub const HOME_PROFILE: &str = r#"
claude_md: profiles/home/CLAUDE.md
stack: web
agents:
  developer:
    core_prompts: [core-principles]
    ending_prompts: [context-management]
  reviewer:
    core_prompts: [core-principles]
    skills:
      - id: testing/vitest
        usage: when reviewing test coverage
"#;

pub const MINIMAL_PROFILE: &str = r#"
claude_md: profiles/minimal/CLAUDE.md
agents:
  developer:
    core_prompts: [core-principles]
"#;

pub const WEB_STACK: &str = r#"
name: Web
skills:
  ui: frontend/react
  data: backend/postgres
"#;

pub fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Source tree with two profiles, one stack, and every referenced file present
pub fn create_source_tree() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();

    write(root, "registry.yaml", REGISTRY);
    write(root, "profiles/home/config.yaml", HOME_PROFILE);
    write(root, "profiles/home/CLAUDE.md", "# Home\n");
    write(root, "profiles/minimal/config.yaml", MINIMAL_PROFILE);
    write(root, "profiles/minimal/CLAUDE.md", "# Minimal\n");
    write(root, "stacks/web.yaml", WEB_STACK);

    write(root, "core-prompts/core-principles.md", "Be precise.");
    write(root, "core-prompts/context-management.md", "Keep notes short.");

    for agent in ["developer", "reviewer"] {
        write(
            root,
            &format!("agent-sources/{}/intro.md", agent),
            &format!("You are the {}.", agent),
        );
        write(
            root,
            &format!("agent-sources/{}/workflow.md", agent),
            "1. Investigate\n2. Act",
        );
        write(
            root,
            &format!("agent-outputs/output-formats-{}.md", agent),
            "Summarize what changed.",
        );
    }
    write(
        root,
        "agent-sources/developer/critical-requirements.md",
        "Never skip tests.",
    );

    write(root, "skills/frontend/react/SKILL.md", "# React skill");
    write(root, "skills/frontend/react/examples.md", "react examples");
    write(root, "skills/frontend/react/scripts/lint.sh", "#!/bin/sh\n");
    write(root, "skills/backend/postgres.md", "# Postgres skill");
    write(root, "skills/testing/vitest.md", "# Vitest skill");

    write(root, "commands/review.md", "Review the diff.");

    temp
}
