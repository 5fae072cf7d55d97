//! Agent document rendering.
//!
//! Reads every fragment a resolved agent names, concatenates prompt bodies in their
//! declared order, and renders the result through one shared `tera` template.

use crate::config::{AgentFragment, ProjectLayout};
use crate::error::CompileError;
use crate::resolve::ResolvedAgent;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tera::{Context, Tera};

/// Template name registered with tera
pub const AGENT_TEMPLATE_NAME: &str = "agent.md";

/// Separator placed between concatenated prompt bodies
pub const PROMPT_SEPARATOR: &str = "\n\n---\n\n";

const BUILTIN_AGENT_TEMPLATE: &str = include_str!("../templates/agent.md.tera");

/// Display form of a prompt name: `core-principles` / `core_principles` → `Core Principles`
pub fn format_prompt_name(name: &str) -> String {
    name.split(['-', '_'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Text of every fragment an agent document is built from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AgentFragments {
    pub intro: String,
    pub workflow: String,
    pub examples: String,
    pub critical_requirements: String,
    pub critical_reminders: String,
    pub core_prompts: String,
    pub output_format: String,
    pub ending_prompts: String,
}

impl AgentFragments {
    /// Read fragments from disk. Optional agent fragments read as empty text.
    pub fn read(agent: &ResolvedAgent, layout: &ProjectLayout) -> Result<Self, CompileError> {
        let mut fragments = AgentFragments::default();
        for fragment in AgentFragment::ALL {
            let path = layout.agent_fragment_path(&agent.id, fragment);
            let text = if fragment.is_required() {
                read_text(&path)?
            } else {
                read_optional(&path)?
            };
            match fragment {
                AgentFragment::Intro => fragments.intro = text,
                AgentFragment::Workflow => fragments.workflow = text,
                AgentFragment::Examples => fragments.examples = text,
                AgentFragment::CriticalRequirements => fragments.critical_requirements = text,
                AgentFragment::CriticalReminders => fragments.critical_reminders = text,
            }
        }

        fragments.core_prompts = concat_prompts(&agent.core_prompts, layout)?;
        fragments.output_format = read_text(&layout.output_format_path(&agent.output_format))?;
        fragments.ending_prompts = concat_prompts(&agent.ending_prompts, layout)?;
        Ok(fragments)
    }
}

fn read_text(path: &Path) -> Result<String, CompileError> {
    std::fs::read_to_string(path).map_err(|e| CompileError::load(path, e))
}

fn read_optional(path: &Path) -> Result<String, CompileError> {
    if path.is_file() {
        read_text(path)
    } else {
        Ok(String::new())
    }
}

fn concat_prompts(names: &[String], layout: &ProjectLayout) -> Result<String, CompileError> {
    let bodies = names
        .iter()
        .map(|name| read_text(&layout.core_prompt_path(name)))
        .collect::<Result<Vec<String>, _>>()?;
    Ok(bodies.join(PROMPT_SEPARATOR))
}

#[derive(Serialize)]
struct AgentView<'a> {
    id: &'a str,
    title: &'a str,
    description: &'a str,
    model: &'a str,
    tools: &'a [String],
    output_format: &'a str,
}

// Skill bodies stay out of agent documents; only metadata is rendered
#[derive(Serialize)]
struct SkillView<'a> {
    id: &'a str,
    name: &'a str,
    description: &'a str,
    usage: &'a str,
}

/// Where the shared template came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    Builtin,
    File(PathBuf),
}

/// Renders agent documents through one shared template
pub struct TemplateRenderer {
    tera: Tera,
    source: TemplateSource,
}

impl TemplateRenderer {
    /// Renderer using the template embedded in the binary
    pub fn builtin() -> Result<Self, CompileError> {
        Self::from_template(BUILTIN_AGENT_TEMPLATE, TemplateSource::Builtin)
    }

    pub fn from_file(path: &Path) -> Result<Self, CompileError> {
        let content = read_text(path)?;
        Self::from_template(&content, TemplateSource::File(path.to_path_buf()))
    }

    pub fn from_template(content: &str, source: TemplateSource) -> Result<Self, CompileError> {
        let mut tera = Tera::default();
        tera.autoescape_on(Vec::new());
        tera.add_raw_template(AGENT_TEMPLATE_NAME, content)?;
        Ok(Self { tera, source })
    }

    /// Pick the configured template, then the project's `templates/agent.md.tera`,
    /// then the built-in one.
    pub fn select(layout: &ProjectLayout, configured: Option<&Path>) -> Result<Self, CompileError> {
        if let Some(path) = configured {
            return Self::from_file(&layout.source_path(path));
        }
        let project_template = layout.default_template_path();
        if project_template.is_file() {
            return Self::from_file(&project_template);
        }
        Self::builtin()
    }

    pub fn source(&self) -> &TemplateSource {
        &self.source
    }

    /// Render one agent from already-read fragments
    pub fn render(
        &self,
        agent: &ResolvedAgent,
        fragments: &AgentFragments,
        profile_name: &str,
    ) -> Result<String, CompileError> {
        let mut context = Context::new();
        context.insert(
            "agent",
            &AgentView {
                id: &agent.id,
                title: &agent.title,
                description: &agent.description,
                model: &agent.model,
                tools: &agent.tools,
                output_format: &agent.output_format,
            },
        );
        context.insert("profile", profile_name);
        context.insert("intro", &fragments.intro);
        context.insert("workflow", &fragments.workflow);
        context.insert("examples", &fragments.examples);
        context.insert("critical_requirements", &fragments.critical_requirements);
        context.insert("critical_reminders", &fragments.critical_reminders);
        context.insert("core_prompts", &fragments.core_prompts);
        context.insert("output_format", &fragments.output_format);
        context.insert("ending_prompts", &fragments.ending_prompts);

        let display = |names: &[String]| -> Vec<String> {
            names.iter().map(|n| format_prompt_name(n)).collect()
        };
        context.insert("core_prompt_names", &display(&agent.core_prompts));
        context.insert("ending_prompt_names", &display(&agent.ending_prompts));

        let skills: Vec<SkillView> = agent
            .skills
            .iter()
            .map(|skill| SkillView {
                id: &skill.id,
                name: &skill.name,
                description: &skill.description,
                usage: &skill.usage,
            })
            .collect();
        context.insert("skills", &skills);

        Ok(self.tera.render(AGENT_TEMPLATE_NAME, &context)?)
    }

    /// Read an agent's fragments and render its document
    pub fn render_agent(
        &self,
        agent: &ResolvedAgent,
        layout: &ProjectLayout,
        profile_name: &str,
    ) -> Result<String, CompileError> {
        let fragments = AgentFragments::read(agent, layout)?;
        self.render(agent, &fragments, profile_name)
    }
}
