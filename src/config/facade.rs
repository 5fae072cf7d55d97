//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::CompilerConfig;
use config::ConfigError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a source root (project file + environment).
    pub fn load(source_root: &Path) -> Result<CompilerConfig, ConfigError> {
        MergeService::load(source_root)
    }

    /// Load configuration from a specific file with environment overlay.
    pub fn load_from_file(path: &Path) -> Result<CompilerConfig, ConfigError> {
        MergeService::load_from_file(path)
    }

    /// Create default configuration.
    pub fn default() -> CompilerConfig {
        CompilerConfig::default()
    }
}
