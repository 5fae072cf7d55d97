//! Agent resolution: registry definition ⊕ profile overrides ⊕ resolved skills.

use super::skills::{resolve_skill_reference, resolve_stack_skills};
use super::ResolvedAgent;
use crate::error::CompileError;
use crate::profile::{ProfileAgentConfig, ProfileConfig, SkillReference};
use crate::registry::Registry;
use crate::stack::StackLoader;

/// Resolve one profile agent.
///
/// Explicit skills on the agent replace the profile stack entirely; without either
/// the agent resolves with no skills.
pub fn resolve_agent(
    agent_id: &str,
    agent_config: &ProfileAgentConfig,
    profile: &ProfileConfig,
    registry: &Registry,
    stacks: &mut StackLoader,
) -> Result<ResolvedAgent, CompileError> {
    let definition = registry.agent(agent_id).ok_or_else(|| {
        CompileError::Reference(format!(
            "Agent '{}' in profile '{}' not found in registry",
            agent_id, profile.name
        ))
    })?;

    let references: Vec<SkillReference> = match (agent_config.explicit_skills(), &profile.stack) {
        (Some(explicit), _) => {
            tracing::debug!(agent = agent_id, count = explicit.len(), "Using explicit skills");
            explicit.to_vec()
        }
        (None, Some(stack_id)) => {
            let stack = stacks.load(stack_id)?;
            tracing::debug!(agent = agent_id, stack = %stack_id, "Deriving skills from stack");
            resolve_stack_skills(stack, registry)?
        }
        (None, None) => Vec::new(),
    };

    let skills = references
        .iter()
        .map(|reference| resolve_skill_reference(reference, registry))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ResolvedAgent {
        id: definition.id.clone(),
        title: definition.title.clone(),
        description: definition.description.clone(),
        model: definition.model.clone(),
        tools: definition.tools.clone(),
        output_format: definition.output_format.clone(),
        core_prompts: agent_config.core_prompts.clone(),
        ending_prompts: agent_config.ending_prompts.clone(),
        skills,
    })
}

/// Resolve every agent in the profile, in profile order. The first failure aborts.
pub fn resolve_agents(
    profile: &ProfileConfig,
    registry: &Registry,
    stacks: &mut StackLoader,
) -> Result<Vec<ResolvedAgent>, CompileError> {
    let mut resolved = Vec::with_capacity(profile.agents.len());
    for (agent_id, agent_config) in profile.agents.iter() {
        let agent = resolve_agent(agent_id, agent_config, profile, registry, stacks)?;
        tracing::debug!(
            agent = agent_id,
            skills = agent.skills.len(),
            "Resolved agent"
        );
        resolved.push(agent);
    }
    Ok(resolved)
}
