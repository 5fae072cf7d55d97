//! Source and output path layout for a compilation run.

use super::OutputConfig;
use crate::error::CompileError;
use crate::output::MANAGED_DIRS;
use std::path::{Component, Path, PathBuf};

/// Source directories read during a run, relative to the source root.
pub const INPUT_DIRS: [&str; 8] = [
    "profiles",
    "stacks",
    "core-prompts",
    "agent-sources",
    "agent-outputs",
    "skills",
    "commands",
    "templates",
];

/// Per-agent source fragment under `agent-sources/{agent}/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentFragment {
    Intro,
    Workflow,
    Examples,
    CriticalRequirements,
    CriticalReminders,
}

impl AgentFragment {
    pub const ALL: [AgentFragment; 5] = [
        AgentFragment::Intro,
        AgentFragment::Workflow,
        AgentFragment::Examples,
        AgentFragment::CriticalRequirements,
        AgentFragment::CriticalReminders,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            AgentFragment::Intro => "intro.md",
            AgentFragment::Workflow => "workflow.md",
            AgentFragment::Examples => "examples.md",
            AgentFragment::CriticalRequirements => "critical-requirements.md",
            AgentFragment::CriticalReminders => "critical-reminders.md",
        }
    }

    /// Missing required fragments are validation errors; optional ones are warnings.
    pub fn is_required(self) -> bool {
        matches!(self, AgentFragment::Intro | AgentFragment::Workflow)
    }
}

/// Resolved locations of every input and output the compiler touches.
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    source_root: PathBuf,
    output_dir: PathBuf,
    output_root: PathBuf,
}

impl ProjectLayout {
    /// Build a layout; relative output paths are anchored at the source root.
    pub fn new(source_root: &Path, output: &OutputConfig) -> Self {
        let source_root = source_root.to_path_buf();
        let output_dir = anchor(&source_root, &output.dir);
        let output_root = anchor(&source_root, &output.root);
        Self {
            source_root,
            output_dir,
            output_root,
        }
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    pub fn registry_path(&self) -> PathBuf {
        self.source_root.join("registry.yaml")
    }

    pub fn profiles_dir(&self) -> PathBuf {
        self.source_root.join("profiles")
    }

    pub fn profile_config_path(&self, profile: &str) -> PathBuf {
        self.profiles_dir().join(profile).join("config.yaml")
    }

    pub fn stack_path(&self, stack_id: &str) -> PathBuf {
        self.source_root
            .join("stacks")
            .join(format!("{}.yaml", stack_id))
    }

    pub fn core_prompt_path(&self, name: &str) -> PathBuf {
        self.source_root
            .join("core-prompts")
            .join(format!("{}.md", name))
    }

    pub fn agent_fragment_path(&self, agent_id: &str, fragment: AgentFragment) -> PathBuf {
        self.source_root
            .join("agent-sources")
            .join(agent_id)
            .join(fragment.file_name())
    }

    pub fn output_format_path(&self, format: &str) -> PathBuf {
        self.source_root
            .join("agent-outputs")
            .join(format!("{}.md", format))
    }

    pub fn commands_dir(&self) -> PathBuf {
        self.source_root.join("commands")
    }

    pub fn default_template_path(&self) -> PathBuf {
        self.source_root.join("templates").join("agent.md.tera")
    }

    /// Resolve a path declared in a source document (skill paths, top-level document)
    pub fn source_path(&self, declared: &Path) -> PathBuf {
        anchor(&self.source_root, declared)
    }

    /// Reject an output directory whose managed subdirectories would replace source
    /// inputs. Committing swaps `agents/`, `skills/`, and `commands/` wholesale, so
    /// they must not overlap the source root or any input directory.
    pub fn check_output_separation(&self) -> Result<(), CompileError> {
        let source_root = normalize(&self.source_root);
        let output_dir = normalize(&self.output_dir);
        if source_root.starts_with(&output_dir) {
            return Err(CompileError::Config(format!(
                "Output directory {} must not contain the source root {}",
                self.output_dir.display(),
                self.source_root.display()
            )));
        }

        for managed in MANAGED_DIRS {
            let managed_dir = output_dir.join(managed);
            for input in INPUT_DIRS {
                let input_dir = source_root.join(input);
                if managed_dir.starts_with(&input_dir) || input_dir.starts_with(&managed_dir) {
                    return Err(CompileError::Config(format!(
                        "Output {} overlaps source input {}",
                        managed_dir.display(),
                        input_dir.display()
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Lexically resolve `.` and `..` so overlapping paths compare equal
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}

fn anchor(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else if path == Path::new(".") {
        root.to_path_buf()
    } else {
        root.join(path)
    }
}
