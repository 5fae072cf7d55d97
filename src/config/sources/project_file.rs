//! Project file source: `<source_root>/agentc.toml`, optional.

use crate::config::PROJECT_CONFIG_FILE;
use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::File;
use std::path::Path;

/// Add the project config file to builder if it exists.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    source_root: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let path = source_root.join(PROJECT_CONFIG_FILE);
    if !path.exists() {
        tracing::debug!("No project config at {}", path.display());
        return Ok(builder);
    }
    tracing::debug!("Loading project config from {}", path.display());
    Ok(builder.add_source(File::from(path).required(true)))
}
