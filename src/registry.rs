//! Registry of agent and skill definitions.
//!
//! The registry is the single source of truth for every agent and skill id a profile
//! or stack may reference. It is parsed once per run into typed definitions; skill
//! paths are classified into [`SkillLocation`] here so later stages never inspect
//! path strings again.

use crate::error::CompileError;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Canonical main file of a directory skill.
pub const SKILL_MAIN_FILE: &str = "SKILL.md";

/// Supporting files copied alongside a directory skill when they exist.
pub const DEFAULT_SKILL_EXTRAS: [&str; 3] = ["examples.md", "reference.md", "scripts"];

fn default_model() -> String {
    "opus".to_string()
}

/// Tool list; accepts either a YAML sequence or a comma-separated string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ToolList {
    Csv(String),
    List(Vec<String>),
}

impl Default for ToolList {
    fn default() -> Self {
        ToolList::List(Vec::new())
    }
}

impl ToolList {
    fn into_vec(self) -> Vec<String> {
        match self {
            ToolList::Csv(s) => s
                .split(',')
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
            ToolList::List(v) => v,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RegistryDocument {
    #[serde(default)]
    agents: HashMap<String, AgentEntry>,
    #[serde(default)]
    skills: HashMap<String, SkillEntry>,
}

#[derive(Debug, Deserialize)]
struct AgentEntry {
    title: String,
    description: String,
    #[serde(default = "default_model")]
    model: String,
    #[serde(default)]
    tools: ToolList,
    output_format: String,
}

#[derive(Debug, Deserialize)]
struct SkillEntry {
    name: String,
    description: String,
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    extras: Option<Vec<PathBuf>>,
}

/// Static agent definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentDefinition {
    pub id: String,
    pub title: String,
    pub description: String,
    pub model: String,
    pub tools: Vec<String>,
    /// Name of the `agent-outputs/{format}.md` fragment
    pub output_format: String,
}

/// Where a skill's content lives, relative to the source root
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkillLocation {
    SingleFile(PathBuf),
    Directory { path: PathBuf, extras: Vec<PathBuf> },
}

impl SkillLocation {
    /// Classify a declared registry path. A trailing separator marks a directory.
    pub fn from_declared(path: &str, extras: Option<Vec<PathBuf>>) -> Self {
        if path.ends_with('/') || path.ends_with('\\') {
            let trimmed = path.trim_end_matches(['/', '\\']);
            SkillLocation::Directory {
                path: PathBuf::from(trimmed),
                extras: extras.unwrap_or_else(|| {
                    DEFAULT_SKILL_EXTRAS.iter().map(PathBuf::from).collect()
                }),
            }
        } else {
            SkillLocation::SingleFile(PathBuf::from(path))
        }
    }

    /// File holding the skill's main content
    pub fn main_file(&self) -> PathBuf {
        match self {
            SkillLocation::SingleFile(path) => path.clone(),
            SkillLocation::Directory { path, .. } => path.join(SKILL_MAIN_FILE),
        }
    }

    /// Optional supporting entries, relative to the skill directory
    pub fn extras(&self) -> &[PathBuf] {
        match self {
            SkillLocation::SingleFile(_) => &[],
            SkillLocation::Directory { extras, .. } => extras,
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, SkillLocation::Directory { .. })
    }
}

/// Static skill definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillDefinition {
    pub id: String,
    pub name: String,
    pub description: String,
    /// `None` for metadata-only skills, which are never copied to output
    pub location: Option<SkillLocation>,
}

/// Agent and skill definitions keyed by id
#[derive(Debug, Clone, Default)]
pub struct Registry {
    agents: HashMap<String, AgentDefinition>,
    skills: HashMap<String, SkillDefinition>,
}

impl Registry {
    /// Build a registry from already-constructed definitions
    pub fn new(agents: Vec<AgentDefinition>, skills: Vec<SkillDefinition>) -> Self {
        Self {
            agents: agents.into_iter().map(|a| (a.id.clone(), a)).collect(),
            skills: skills.into_iter().map(|s| (s.id.clone(), s)).collect(),
        }
    }

    /// Load the registry document. Missing or malformed files are fatal.
    pub fn load(path: &Path) -> Result<Self, CompileError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CompileError::load(path, format!("Failed to read registry: {}", e)))?;
        let registry = Self::parse(&content, path)?;
        tracing::debug!(
            agents = registry.agents.len(),
            skills = registry.skills.len(),
            "Loaded registry from {}",
            path.display()
        );
        Ok(registry)
    }

    /// Parse registry YAML; `origin` is only used in error messages
    pub fn parse(content: &str, origin: &Path) -> Result<Self, CompileError> {
        let document: RegistryDocument = serde_yaml::from_str(content)
            .map_err(|e| CompileError::load(origin, format!("Invalid registry: {}", e)))?;

        let agents = document
            .agents
            .into_iter()
            .map(|(id, entry)| {
                let definition = AgentDefinition {
                    id: id.clone(),
                    title: entry.title,
                    description: entry.description,
                    model: entry.model,
                    tools: entry.tools.into_vec(),
                    output_format: entry.output_format,
                };
                (id, definition)
            })
            .collect();

        let skills = document
            .skills
            .into_iter()
            .map(|(id, entry)| {
                let location = entry
                    .path
                    .filter(|p| !p.trim().is_empty())
                    .map(|p| SkillLocation::from_declared(p.trim(), entry.extras));
                let definition = SkillDefinition {
                    id: id.clone(),
                    name: entry.name,
                    description: entry.description,
                    location,
                };
                (id, definition)
            })
            .collect();

        Ok(Self { agents, skills })
    }

    pub fn agent(&self, agent_id: &str) -> Option<&AgentDefinition> {
        self.agents.get(agent_id)
    }

    pub fn skill(&self, skill_id: &str) -> Option<&SkillDefinition> {
        self.skills.get(skill_id)
    }

    pub fn has_agent(&self, agent_id: &str) -> bool {
        self.agents.contains_key(agent_id)
    }

    pub fn has_skill(&self, skill_id: &str) -> bool {
        self.skills.contains_key(skill_id)
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    pub fn skill_count(&self) -> usize {
        self.skills.len()
    }
}
