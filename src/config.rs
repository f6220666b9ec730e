//! Configuration for the definition tools
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (exchanges.toml)
//! - Environment variables (EXCHANGES__*)
//!
//! ## Example config file (exchanges.toml):
//! ```toml
//! [manifest]
//! include_embedded = true
//! dirs = ["./site-definitions"]
//!
//! [render]
//! rust_crate_path = "exchange_definitions"
//! cpp_include = "bisect/bimo/mq/common.h"
//!
//! [[targets]]
//! language = "cpp"
//! path = "bindings/cpp/preprocessor_status.h"
//! definition = "preprocessor_status"
//!
//! [drift]
//! scan_root = "."
//! strict = false
//! ignore_paths = ["target/**", "definitions/**"]
//!
//! [output]
//! format = "text"
//! ```

use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::codegen::RenderProfile;
use crate::drift::Target;
use crate::error::Result;
use crate::registry::ExchangeRegistry;

/// Main configuration for the definition tools
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefinitionsConfig {
    /// Where definitions come from
    #[serde(default)]
    pub manifest: ManifestConfig,

    /// Rendering settings for generated copies
    #[serde(default)]
    pub render: RenderProfile,

    /// Language copies kept in sync with the definitions
    #[serde(default)]
    pub targets: Vec<Target>,

    /// Drift check settings
    #[serde(default)]
    pub drift: DriftConfig,

    /// Report output
    #[serde(default)]
    pub output: OutputConfig,
}

/// Manifest sources
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestConfig {
    /// Start from the manifests compiled into the tools
    #[serde(default = "default_true")]
    pub include_embedded: bool,

    /// Extra directories of `*.toml` manifests
    #[serde(default)]
    pub dirs: Vec<PathBuf>,
}

/// Drift check configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriftConfig {
    /// Tree scanned for unmanaged copies; no scan when unset
    #[serde(default)]
    pub scan_root: Option<PathBuf>,

    /// Treat unmanaged copies as drift
    #[serde(default)]
    pub strict: bool,

    /// Gitignore-style patterns skipped by the scan
    #[serde(default = "default_ignore_paths")]
    pub ignore_paths: Vec<String>,
}

/// Output configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

/// Report format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

// Default value functions
fn default_true() -> bool {
    true
}

fn default_ignore_paths() -> Vec<String> {
    vec![
        "target/**".to_string(),
        "definitions/**".to_string(),
        "*.md".to_string(),
    ]
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            include_embedded: true,
            dirs: Vec::new(),
        }
    }
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            scan_root: None,
            strict: false,
            ignore_paths: default_ignore_paths(),
        }
    }
}

impl DefinitionsConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration, with `config_path` layered over the default locations
    pub fn load_from(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_locations = ["exchanges.toml", ".exchanges.toml", "config/exchanges.toml"];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // Load from XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("tv", "ebu-list", "exchanges") {
            let xdg_config = config_dir.config_dir().join("exchanges.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path).required(true));
        }

        // EXCHANGES__DRIFT__STRICT=true and friends
        builder = builder.add_source(
            Environment::with_prefix("EXCHANGES")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Load a single file, without the default locations or environment
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()).required(true))
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// Save configuration to a file
    pub fn save(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// Registry assembled from the configured manifest sources
    pub fn registry(&self) -> Result<ExchangeRegistry> {
        let mut registry = if self.manifest.include_embedded {
            ExchangeRegistry::from_embedded()?
        } else {
            ExchangeRegistry::from_definitions(Vec::new())?
        };

        for dir in &self.manifest.dirs {
            registry = registry.merge(ExchangeRegistry::from_dir(dir)?)?;
        }
        Ok(registry)
    }

    /// Configured targets for one definition
    pub fn targets_for<'a>(&'a self, definition: &'a str) -> impl Iterator<Item = &'a Target> {
        self.targets.iter().filter(move |t| t.definition == definition)
    }
}
