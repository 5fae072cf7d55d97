//! Stack expansion and skill reference resolution.

use super::Skill;
use crate::error::CompileError;
use crate::profile::SkillReference;
use crate::registry::Registry;
use crate::stack::Stack;

/// Usage text synthesized for skills that arrive through a stack
pub fn stack_usage(skill_name: &str, category: &str) -> String {
    format!(
        "when working with {} ({})",
        skill_name.to_lowercase(),
        category
    )
}

/// Expand a stack into skill references, in the stack's declared category order.
///
/// Every skill a stack names must exist in the registry.
pub fn resolve_stack_skills(
    stack: &Stack,
    registry: &Registry,
) -> Result<Vec<SkillReference>, CompileError> {
    stack
        .skills
        .iter()
        .map(|(category, skill_id)| {
            let definition = registry.skill(skill_id).ok_or_else(|| {
                CompileError::Reference(format!(
                    "Stack '{}' references unknown skill '{}' (category: {})",
                    stack.id, skill_id, category
                ))
            })?;
            Ok(SkillReference::new(
                skill_id.clone(),
                stack_usage(&definition.name, category),
            ))
        })
        .collect()
}

/// Merge a reference with its registry definition
pub fn resolve_skill_reference(
    reference: &SkillReference,
    registry: &Registry,
) -> Result<Skill, CompileError> {
    let definition = registry.skill(&reference.id).ok_or_else(|| {
        CompileError::Reference(format!("Skill not found in registry: {}", reference.id))
    })?;

    Ok(Skill {
        id: definition.id.clone(),
        name: definition.name.clone(),
        description: definition.description.clone(),
        location: definition.location.clone(),
        usage: reference.usage.clone(),
    })
}
