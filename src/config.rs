//! Configuration Management
//!
//! Compiler settings loaded from layered sources: built-in defaults, the project's
//! `agentc.toml` (or an explicit file), and `AGENTC__*` environment variables.
//! CLI flags are applied on top by the caller.

pub mod facade;
pub mod layout;
pub mod merge;
pub mod sources;

pub use facade::ConfigLoader;
pub use layout::{AgentFragment, ProjectLayout};

use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// File name of the project-level config file, looked up in the source root.
pub const PROJECT_CONFIG_FILE: &str = "agentc.toml";

pub(crate) fn default_profile() -> String {
    "home".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".claude")
}

fn default_output_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_root_document() -> String {
    "CLAUDE.md".to_string()
}

fn default_baseline_prompt() -> String {
    "core-principles".to_string()
}

/// Top-level compiler configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompilerConfig {
    /// Profile compiled when `--profile` is not given
    #[serde(default = "default_profile")]
    pub default_profile: String,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub validation: ValidationConfig,

    #[serde(default)]
    pub template: TemplateConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            default_profile: default_profile(),
            output: OutputConfig::default(),
            validation: ValidationConfig::default(),
            template: TemplateConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Where generated files land
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving `agents/`, `skills/`, and `commands/` (relative to the source root)
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,

    /// Directory receiving the top-level document (relative to the source root)
    #[serde(default = "default_output_root")]
    pub root: PathBuf,

    /// File name of the copied top-level document
    #[serde(default = "default_root_document")]
    pub root_document: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            root: default_output_root(),
            root_document: default_root_document(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Core prompt whose presence proves the prompt library is populated
    #[serde(default = "default_baseline_prompt")]
    pub baseline_prompt: String,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            baseline_prompt: default_baseline_prompt(),
        }
    }
}

/// Shared agent template selection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// Explicit template path (relative to the source root). When unset, the project's
    /// `templates/agent.md.tera` is used if present, otherwise the built-in template.
    #[serde(default)]
    pub path: Option<PathBuf>,
}
