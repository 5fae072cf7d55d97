//! Resolution of profile agents into fully merged, render-ready records.

pub mod agent;
pub mod skills;

pub use agent::{resolve_agent, resolve_agents};
pub use skills::{resolve_skill_reference, resolve_stack_skills, stack_usage};

use crate::registry::SkillLocation;

/// Registry skill definition merged with agent-specific usage text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skill {
    pub id: String,
    pub name: String,
    pub description: String,
    pub location: Option<SkillLocation>,
    pub usage: String,
}

/// Registry agent definition merged with profile overrides and resolved skills
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAgent {
    pub id: String,
    pub title: String,
    pub description: String,
    pub model: String,
    pub tools: Vec<String>,
    pub output_format: String,
    pub core_prompts: Vec<String>,
    pub ending_prompts: Vec<String>,
    pub skills: Vec<Skill>,
}

/// Skills referenced by any agent, deduplicated by id in first-seen order
pub fn unique_skills(agents: &[ResolvedAgent]) -> Vec<&Skill> {
    let mut unique: Vec<&Skill> = Vec::new();
    for skill in agents.iter().flat_map(|a| a.skills.iter()) {
        if !unique.iter().any(|s| s.id == skill.id) {
            unique.push(skill);
        }
    }
    unique
}
