//! MergeService: orchestrates sources, applies merge policy, deserializes to CompilerConfig.

use crate::config::sources::{environment, project_file};
use crate::config::CompilerConfig;
use config::ConfigError;
use std::path::Path;

use super::merge_policy;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Load config for a source root.
    /// Precedence: defaults (lowest) -> project file -> environment (highest).
    pub fn load(source_root: &Path) -> Result<CompilerConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = project_file::add_to_builder(builder, source_root)?;
        let builder = environment::add_to_builder(builder)?;

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Load config from a specific file with environment overlay.
    pub fn load_from_file(path: &Path) -> Result<CompilerConfig, ConfigError> {
        use config::File;

        if !path.exists() {
            return Err(ConfigError::Message(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let builder = merge_policy::builder_with_defaults()?;
        let builder = builder.add_source(File::from(path));
        let builder = environment::add_to_builder(builder)?;

        let config = builder.build()?;
        config.try_deserialize()
    }
}
