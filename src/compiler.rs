//! Compilation pipeline.
//!
//! Registry + profile → resolved agents → validation gate → rendering → staged write.
//! Any load or reference failure stops the run before validation; any validation
//! error stops it before a single output file is touched.

use crate::config::{CompilerConfig, ProjectLayout};
use crate::error::CompileError;
use crate::output::{OutputWriter, RenderedAgent, WriteSummary};
use crate::profile::{list_profiles, ProfileConfig};
use crate::registry::Registry;
use crate::render::TemplateRenderer;
use crate::resolve::{resolve_agents, unique_skills};
use crate::stack::StackLoader;
use crate::validation::{validate, ValidationOptions, ValidationResult};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Whether a run commits output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileMode {
    /// Resolve, validate, render, and write
    Write,
    /// Resolve, validate, and render without touching the output tree
    CheckOnly,
}

/// Outcome of a successful run
#[derive(Debug, Clone, Serialize)]
pub struct CompileReport {
    pub profile: String,
    pub agents: Vec<String>,
    pub skills: Vec<String>,
    pub validation: ValidationResult,
    pub output_dir: PathBuf,
    /// Present when output was committed
    pub written: Option<WriteSummary>,
}

/// Compiles profiles from one source root
pub struct Compiler {
    config: CompilerConfig,
    layout: ProjectLayout,
}

impl Compiler {
    pub fn new(source_root: &Path, config: CompilerConfig) -> Self {
        let layout = ProjectLayout::new(source_root, &config.output);
        Self { config, layout }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    /// Profile names available under `profiles/`
    pub fn list_profiles(&self) -> Result<Vec<String>, CompileError> {
        list_profiles(&self.layout)
    }

    /// Validate a profile without writing output. An invalid profile is reported in
    /// `CompileReport::validation` rather than as an error.
    pub fn check(&self, profile_name: &str) -> Result<CompileReport, CompileError> {
        self.compile(profile_name, CompileMode::CheckOnly)
    }

    pub fn compile(
        &self,
        profile_name: &str,
        mode: CompileMode,
    ) -> Result<CompileReport, CompileError> {
        tracing::info!(profile = profile_name, ?mode, "Compiling profile");
        self.layout.check_output_separation()?;

        let registry = Registry::load(&self.layout.registry_path())?;
        let profile = ProfileConfig::load(&self.layout, profile_name)?;

        let mut stacks = StackLoader::new(&self.layout);
        let agents = resolve_agents(&profile, &registry, &mut stacks)?;
        tracing::info!(
            agents = agents.len(),
            stacks = stacks.cache().len(),
            "Resolved agents"
        );

        let options = ValidationOptions {
            baseline_prompt: self.config.validation.baseline_prompt.clone(),
            template: self
                .config
                .template
                .path
                .as_ref()
                .map(|p| self.layout.source_path(p)),
        };
        let validation = validate(&registry, &profile, &agents, &self.layout, &options);
        let skills = unique_skills(&agents);
        if !validation.is_valid() {
            for error in &validation.errors {
                tracing::error!("{}", error);
            }
            if mode == CompileMode::Write {
                return Err(CompileError::Validation(validation));
            }
            return Ok(CompileReport {
                profile: profile.name.clone(),
                agents: agents.iter().map(|a| a.id.clone()).collect(),
                skills: skills.iter().map(|s| s.id.clone()).collect(),
                validation,
                output_dir: self.layout.output_dir().to_path_buf(),
                written: None,
            });
        }

        let renderer =
            TemplateRenderer::select(&self.layout, self.config.template.path.as_deref())?;
        tracing::debug!(source = ?renderer.source(), "Selected agent template");

        let mut rendered = Vec::with_capacity(agents.len());
        for agent in &agents {
            let content = renderer.render_agent(agent, &self.layout, &profile.name)?;
            tracing::debug!(agent = %agent.id, bytes = content.len(), "Rendered agent");
            rendered.push(RenderedAgent {
                id: agent.id.clone(),
                content,
            });
        }

        let written = match mode {
            CompileMode::CheckOnly => None,
            CompileMode::Write => {
                let writer = OutputWriter::new(&self.layout, &self.config.output.root_document);
                Some(writer.write(&rendered, &skills, &profile.claude_md)?)
            }
        };

        Ok(CompileReport {
            profile: profile.name.clone(),
            agents: agents.iter().map(|a| a.id.clone()).collect(),
            skills: skills.iter().map(|s| s.id.clone()).collect(),
            validation,
            output_dir: self.layout.output_dir().to_path_buf(),
            written,
        })
    }
}
