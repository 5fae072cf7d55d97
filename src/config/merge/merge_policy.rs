//! Defaults seeded into every config builder before file and environment sources.

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;

/// Start a builder with the defaults that must exist even when no file is present.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    config::Config::builder()
        .set_default("default_profile", crate::config::default_profile())?
        .set_default("output.root_document", "CLAUDE.md")
}
