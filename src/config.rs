//! Configuration management for schema subsetting
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (schema-subset.toml)
//! - Environment variables (SCHEMA_SUBSET__*)
//!
//! ## Example config file (schema-subset.toml):
//! ```toml
//! [shorten]
//! max_length = 120
//! fill = "<<shortened>>"
//! keys = ["description", "deprecationMessage"]
//!
//! [output]
//! format = "compact"
//! ```

use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;
use crate::schema::OutputFormat;
use crate::subset::ShortenOptions;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubsetConfig {
    /// Description shortening settings
    #[serde(default)]
    pub shorten: ShortenOptions,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// Output configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// JSON rendering (pretty or compact)
    #[serde(default)]
    pub format: OutputFormat,
}

impl SubsetConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration, layering an explicit file over the default locations
    pub fn load_from(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_locations = [
            "schema-subset.toml",
            ".schema-subset.toml",
            "config/schema-subset.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("dev", "provider-schemas", "schema-subset") {
            let xdg_config = config_dir.config_dir().join("schema-subset.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("SCHEMA_SUBSET")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }
}
