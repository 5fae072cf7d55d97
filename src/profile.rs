//! Profile configuration: which agents to compile and how each is assembled.

use crate::config::ProjectLayout;
use crate::error::CompileError;
use crate::types::OrderedMap;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Pointer into the registry's skills with agent-specific usage text
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SkillReference {
    pub id: String,
    #[serde(default)]
    pub usage: String,
}

impl SkillReference {
    pub fn new(id: impl Into<String>, usage: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            usage: usage.into(),
        }
    }
}

/// Per-agent overrides declared by a profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProfileAgentConfig {
    #[serde(default)]
    pub core_prompts: Vec<String>,
    #[serde(default)]
    pub ending_prompts: Vec<String>,
    /// Explicit skills; when present and non-empty they replace the profile stack entirely
    #[serde(default)]
    pub skills: Option<Vec<SkillReference>>,
}

impl ProfileAgentConfig {
    /// Explicit skills, if any were declared
    pub fn explicit_skills(&self) -> Option<&[SkillReference]> {
        self.skills.as_deref().filter(|skills| !skills.is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct ProfileDocument {
    claude_md: PathBuf,
    #[serde(default)]
    stack: Option<String>,
    #[serde(default)]
    agents: OrderedMap<ProfileAgentConfig>,
}

/// A named profile
#[derive(Debug, Clone)]
pub struct ProfileConfig {
    pub name: String,
    /// Top-level document copied to the output root, relative to the source root
    pub claude_md: PathBuf,
    pub stack: Option<String>,
    /// Agents in declaration order
    pub agents: OrderedMap<ProfileAgentConfig>,
}

impl ProfileConfig {
    /// Load `profiles/{name}/config.yaml`. Missing or malformed files are fatal.
    pub fn load(layout: &ProjectLayout, name: &str) -> Result<Self, CompileError> {
        let path = layout.profile_config_path(name);
        let content = std::fs::read_to_string(&path).map_err(|e| {
            CompileError::load(&path, format!("Failed to read profile '{}': {}", name, e))
        })?;
        let profile = Self::parse(name, &content, &path)?;
        tracing::debug!(
            profile = name,
            agents = profile.agents.len(),
            stack = profile.stack.as_deref().unwrap_or("-"),
            "Loaded profile"
        );
        Ok(profile)
    }

    pub fn parse(name: &str, content: &str, origin: &Path) -> Result<Self, CompileError> {
        let document: ProfileDocument = serde_yaml::from_str(content)
            .map_err(|e| CompileError::load(origin, format!("Invalid profile: {}", e)))?;
        Ok(Self {
            name: name.to_string(),
            claude_md: document.claude_md,
            stack: document.stack.filter(|s| !s.trim().is_empty()),
            agents: document.agents,
        })
    }

    /// Distinct prompt names across all agents, in first-seen order
    pub fn prompt_names(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for (_, agent) in self.agents.iter() {
            for name in agent.core_prompts.iter().chain(agent.ending_prompts.iter()) {
                if !seen.contains(&name.as_str()) {
                    seen.push(name.as_str());
                }
            }
        }
        seen
    }
}

/// Names of profiles with a `config.yaml`, sorted
pub fn list_profiles(layout: &ProjectLayout) -> Result<Vec<String>, CompileError> {
    let dir = layout.profiles_dir();
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let entries = std::fs::read_dir(&dir)
        .map_err(|e| CompileError::load(&dir, format!("Failed to read profiles: {}", e)))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!("Failed to read directory entry in {}: {}", dir.display(), e);
                continue;
            }
        };
        let path = entry.path();
        if !path.join("config.yaml").is_file() {
            continue;
        }
        match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => names.push(name.to_string()),
            None => tracing::warn!("Skipping profile with non UTF8 name: {:?}", path),
        }
    }
    names.sort();
    Ok(names)
}
