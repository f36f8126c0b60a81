//! # Loader Configuration
//!
//! Settings for loading material libraries: where textures live, how verbose
//! logging is, which shading profile answers capability queries, and whether
//! the conventional metallic/gloss texture is autoloaded.
//!
//! Any field missing from a configuration file keeps its default, so a file
//! only needs to mention what it changes:
//!
//! ```toml
//! assets_dir = "resources/models"
//!
//! [metallic_gloss]
//! enabled = false
//! ```

use serde::{Serialize, Deserialize};

use crate::assets::{FileSystemStore, MetallicGlossAutoload, ParseOptions, ShadingProfile};

pub use crate::config::{Config, ConfigError};

/// # Loader Configuration
///
/// Top-level configuration for the MTL loader and its tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Base directory textures are resolved against
    pub assets_dir: String,
    /// Default log filter (`RUST_LOG` overrides it)
    pub log_level: String,
    /// Conventional metallic/gloss texture autoload
    pub metallic_gloss: MetallicGlossAutoload,
    /// Capability table used while parsing
    pub profile: ShadingProfile,
}

impl LoaderConfig {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self {
            assets_dir: ".".to_string(),
            log_level: "info".to_string(),
            metallic_gloss: MetallicGlossAutoload::default(),
            profile: ShadingProfile::standard(),
        }
    }

    /// Set assets directory
    #[must_use]
    pub fn with_assets_dir(mut self, dir: impl Into<String>) -> Self {
        self.assets_dir = dir.into();
        self
    }

    /// Set log level
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Configure the metallic/gloss autoload
    #[must_use]
    pub fn with_metallic_gloss(mut self, enabled: bool, path: impl Into<String>) -> Self {
        self.metallic_gloss = MetallicGlossAutoload {
            enabled,
            path: path.into(),
        };
        self
    }

    /// Set shading profile
    #[must_use]
    pub fn with_profile(mut self, profile: ShadingProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Validate the configuration
    ///
    /// Profile entries that name no known capability are only warned about.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.metallic_gloss.enabled && self.metallic_gloss.path.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "metallic_gloss.path is empty while the autoload is enabled".to_string(),
            ));
        }

        for name in self.profile.unknown_entries() {
            log::warn!("Profile entry '{}' does not name a known capability", name);
        }
        Ok(())
    }

    /// Parser options derived from this configuration
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            metallic_gloss: self.metallic_gloss.clone(),
        }
    }

    /// Filesystem store rooted at [`LoaderConfig::assets_dir`]
    pub fn file_store(&self) -> FileSystemStore {
        FileSystemStore::new(&self.assets_dir)
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Config for LoaderConfig {}
