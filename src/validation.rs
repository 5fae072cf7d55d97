//! Pre-render validation of a resolved profile.
//!
//! Every check runs regardless of earlier failures so a single pass reports the
//! full set of problems. Errors block compilation; warnings never do.

use crate::config::{AgentFragment, ProjectLayout};
use crate::output::skill_output_name;
use crate::profile::ProfileConfig;
use crate::registry::{Registry, SkillLocation};
use crate::resolve::{unique_skills, ResolvedAgent};
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;

/// Validation result for a profile compilation
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationResult {
    pub checks: Vec<(String, bool)>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_check(&mut self, description: &str, passed: bool) {
        self.checks.push((description.to_string(), passed));
    }

    pub fn add_error(&mut self, error: String) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn total_checks(&self) -> usize {
        self.checks.len()
    }

    pub fn passed_checks(&self) -> usize {
        self.checks.iter().filter(|(_, passed)| *passed).count()
    }
}

/// Settings that shape validation beyond the registry and profile
#[derive(Debug, Clone)]
pub struct ValidationOptions {
    /// Core prompt whose presence proves the prompt library is populated
    pub baseline_prompt: String,
    /// Explicitly configured template, which must exist
    pub template: Option<PathBuf>,
}

/// Validate a resolved profile against the files on disk.
pub fn validate(
    registry: &Registry,
    profile: &ProfileConfig,
    agents: &[ResolvedAgent],
    layout: &ProjectLayout,
    options: &ValidationOptions,
) -> ValidationResult {
    let mut result = ValidationResult::new();

    let claude_md = layout.source_path(&profile.claude_md);
    if claude_md.is_file() {
        result.add_check("Top-level document exists", true);
    } else {
        result.add_error(format!(
            "Top-level document not found: {}",
            claude_md.display()
        ));
    }

    let baseline = layout.core_prompt_path(&options.baseline_prompt);
    if baseline.is_file() {
        result.add_check("Baseline core prompt exists", true);
    } else {
        result.add_error(format!(
            "Baseline core prompt not found: {}",
            baseline.display()
        ));
    }

    if let Some(template) = &options.template {
        if template.is_file() {
            result.add_check("Configured template exists", true);
        } else {
            result.add_error(format!("Template not found: {}", template.display()));
        }
    }

    for agent_id in profile.agents.keys() {
        if !registry.has_agent(agent_id) {
            result.add_error(format!(
                "Agent '{}' in profile '{}' not found in registry",
                agent_id, profile.name
            ));
        }
    }

    for agent in agents {
        validate_agent_sources(agent, layout, &mut result);
        validate_agent_skills(agent, registry, layout, &mut result);
    }

    let mut prompt_names: Vec<&str> = Vec::new();
    for agent in agents {
        for name in agent.core_prompts.iter().chain(agent.ending_prompts.iter()) {
            if !prompt_names.contains(&name.as_str()) {
                prompt_names.push(name.as_str());
            }
        }
    }
    for name in prompt_names {
        let path = layout.core_prompt_path(name);
        if path.is_file() {
            result.add_check("Core prompt exists", true);
        } else {
            result.add_error(format!(
                "Core prompt '{}' not found: {}",
                name,
                path.display()
            ));
        }
    }

    validate_output_names(agents, &mut result);

    for warning in &result.warnings {
        tracing::warn!("{}", warning);
    }
    tracing::debug!(
        checks = result.total_checks(),
        errors = result.errors.len(),
        warnings = result.warnings.len(),
        "Validation finished"
    );
    result
}

/// A single path component that stays inside its parent directory
fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

fn validate_output_names(agents: &[ResolvedAgent], result: &mut ValidationResult) {
    for agent in agents {
        if is_plain_file_name(&agent.id) {
            result.add_check("Agent output name is a plain file name", true);
        } else {
            result.add_error(format!(
                "Agent id '{}' cannot be used as an output file name (no '/', '\\', '.' or '..')",
                agent.id
            ));
        }
    }

    let mut claimed: HashMap<String, &str> = HashMap::new();
    for skill in unique_skills(agents) {
        if skill.location.is_none() {
            continue;
        }
        let name = skill_output_name(&skill.id);
        if !is_plain_file_name(&name) {
            result.add_error(format!(
                "Skill id '{}' cannot be used as an output directory name",
                skill.id
            ));
            continue;
        }
        match claimed.get(&name) {
            Some(other) => result.add_error(format!(
                "Skills '{}' and '{}' both write to skills/{}",
                other, skill.id, name
            )),
            None => {
                result.add_check("Skill output directory is unique", true);
                claimed.insert(name, &skill.id);
            }
        }
    }
}

fn validate_agent_sources(agent: &ResolvedAgent, layout: &ProjectLayout, result: &mut ValidationResult) {
    for fragment in AgentFragment::ALL {
        let path = layout.agent_fragment_path(&agent.id, fragment);
        if path.is_file() {
            result.add_check(fragment.file_name(), true);
        } else if fragment.is_required() {
            result.add_error(format!(
                "Agent '{}' is missing required {}: {}",
                agent.id,
                fragment.file_name(),
                path.display()
            ));
        } else {
            result.add_warning(format!(
                "Agent '{}' has no optional {}: {}",
                agent.id,
                fragment.file_name(),
                path.display()
            ));
        }
    }

    let output_format = layout.output_format_path(&agent.output_format);
    if output_format.is_file() {
        result.add_check("Output format exists", true);
    } else {
        result.add_error(format!(
            "Agent '{}' output format '{}' not found: {}",
            agent.id,
            agent.output_format,
            output_format.display()
        ));
    }
}

fn validate_agent_skills(
    agent: &ResolvedAgent,
    registry: &Registry,
    layout: &ProjectLayout,
    result: &mut ValidationResult,
) {
    for skill in &agent.skills {
        if !registry.has_skill(&skill.id) {
            result.add_error(format!(
                "Agent '{}' references unknown skill '{}'",
                agent.id, skill.id
            ));
            continue;
        }

        let location = match &skill.location {
            Some(location) => location,
            None => {
                result.add_warning(format!(
                    "Skill '{}' (agent '{}') has no path and will not be written",
                    skill.id, agent.id
                ));
                continue;
            }
        };

        let main_file = layout.source_path(&location.main_file());
        if main_file.is_file() {
            result.add_check("Skill file exists", true);
            continue;
        }
        match location {
            SkillLocation::Directory { path, .. } => result.add_error(format!(
                "Skill '{}' (agent '{}') directory {} has no SKILL.md",
                skill.id,
                agent.id,
                layout.source_path(path).display()
            )),
            SkillLocation::SingleFile(_) => result.add_error(format!(
                "Skill '{}' (agent '{}') file not found: {}",
                skill.id,
                agent.id,
                main_file.display()
            )),
        }
    }
}
