//! CLI Tooling
//!
//! Command-line interface for compiling profiles. Every command is idempotent:
//! running it twice on an unchanged source tree yields the same output.

use crate::compiler::{CompileMode, Compiler};
use crate::config::{CompilerConfig, ConfigLoader};
use crate::error::CompileError;
use crate::logging::LoggingConfig;
use crate::tooling::format::{
    format_compile_report_text, format_profiles_text, format_validation_report_text,
};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;
use tracing::info;

/// agentc - compile agent and skill fragments into generated documents
#[derive(Parser)]
#[command(name = "agentc")]
#[command(about = "Compile agent, skill, and stack fragments into generated agent documents")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Profile to compile (default from config, then "home")
    #[arg(long, global = true)]
    pub profile: Option<String>,

    /// Source root containing registry.yaml, profiles/, stacks/, ...
    #[arg(long, default_value = ".", global = true)]
    pub source: PathBuf,

    /// Configuration file path (overrides <source>/agentc.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output directory for agents/, skills/, and commands/
    #[arg(long, global = true)]
    pub out: Option<PathBuf>,

    /// Log each pipeline step to stdout (default: off)
    #[arg(long, default_value = "false", global = true)]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// The command to run; compiling is the default
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Compile {
            format: "text".to_string(),
        })
    }

    /// Fold logging flags into the configured logging settings
    pub fn logging_config(&self, base: &LoggingConfig) -> LoggingConfig {
        let mut logging = base.clone();
        if self.verbose {
            logging.level = "debug".to_string();
            logging.output = "stdout".to_string();
        }
        if let Some(level) = &self.log_level {
            logging.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            logging.format = format.clone();
        }
        if let Some(output) = &self.log_output {
            logging.output = output.clone();
        }
        if let Some(file) = &self.log_file {
            logging.file = Some(file.clone());
        }
        logging
    }
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Resolve, validate, render, and write the profile's output
    Compile {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Resolve and validate the profile without writing anything
    Validate {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// List available profiles
    Profiles {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

/// Rendered command output. `success` is false when the command ran but found
/// problems (an invalid profile under `validate`); the binary exits 1 then.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub text: String,
    pub success: bool,
}

impl CommandOutput {
    fn ok(text: String) -> Self {
        Self {
            text,
            success: true,
        }
    }
}

/// CLI context bound to one source root
pub struct CliContext {
    compiler: Compiler,
    profile: String,
    verbose: bool,
}

impl CliContext {
    /// Create a context, loading config from `config_path` or the source root
    pub fn new(source_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, CompileError> {
        let source_root = dunce::canonicalize(&source_root).map_err(|e| {
            CompileError::Config(format!(
                "Source root {} is not accessible: {}",
                source_root.display(),
                e
            ))
        })?;
        let config = match &config_path {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(&source_root)?,
        };
        Ok(Self::with_config(source_root, config))
    }

    /// Create a context from parsed CLI flags
    pub fn from_cli(cli: &Cli) -> Result<Self, CompileError> {
        let mut context = Self::new(cli.source.clone(), cli.config.clone())?;
        if cli.out.is_some() || cli.profile.is_some() {
            let mut config = context.compiler.config().clone();
            if let Some(out) = &cli.out {
                config.output.dir = out.clone();
            }
            if let Some(profile) = &cli.profile {
                config.default_profile = profile.clone();
            }
            let source_root = context.compiler.layout().source_root().to_path_buf();
            context = Self::with_config(source_root, config);
        }
        context.verbose = cli.verbose;
        Ok(context)
    }

    pub fn with_config(source_root: PathBuf, config: CompilerConfig) -> Self {
        let profile = config.default_profile.clone();
        Self {
            compiler: Compiler::new(&source_root, config),
            profile,
            verbose: false,
        }
    }

    pub fn config(&self) -> &CompilerConfig {
        self.compiler.config()
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    /// Execute a CLI command
    pub fn execute(&self, command: &Commands) -> Result<CommandOutput, CompileError> {
        match command {
            Commands::Compile { format } => {
                info!(profile = %self.profile, "Starting compile");
                let report = self.compiler.compile(&self.profile, CompileMode::Write)?;
                let text = match format.as_str() {
                    "json" => to_json(&report)?,
                    _ => format_compile_report_text(&report, self.verbose),
                };
                Ok(CommandOutput::ok(text))
            }
            Commands::Validate { format } => {
                let report = self.compiler.check(&self.profile)?;
                let valid = report.validation.is_valid();
                let text = match format.as_str() {
                    "json" => to_json(&json!({
                        "profile": report.profile,
                        "valid": valid,
                        "errors": report.validation.errors,
                        "warnings": report.validation.warnings,
                        "agents": report.agents,
                        "skills": report.skills,
                    }))?,
                    _ => format_validation_report_text(&report.validation, self.verbose),
                };
                Ok(CommandOutput {
                    text,
                    success: valid,
                })
            }
            Commands::Profiles { format } => {
                let profiles = self.compiler.list_profiles()?;
                let text = match format.as_str() {
                    "json" => to_json(&json!({
                        "default": self.profile,
                        "profiles": profiles,
                    }))?,
                    _ => format_profiles_text(&profiles, &self.profile),
                };
                Ok(CommandOutput::ok(text))
            }
        }
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, CompileError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| CompileError::Config(format!("Failed to serialize output: {}", e)))
}
