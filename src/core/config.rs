/*!
# Grafter Configuration

Configuration structures and loading for the insertion engine and the CLI.
Supports TOML and YAML configuration files.
*/

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

/// Output format of the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One terminal projection per line
    #[default]
    Text,
    /// Parse trees as JSON
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Engine settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertionSettings {
    /// Stop after this many accepted results
    #[serde(default)]
    pub max_solutions: Option<usize>,

    /// Cap on EXTEND steps (wrappings of the inserted tree)
    #[serde(default)]
    pub max_extensions: Option<usize>,

    /// Run the validity oracle on every candidate
    #[serde(default = "default_true")]
    pub check_validity: bool,

    /// Expand slots whose nonterminal has a single all-terminal alternative
    #[serde(default = "default_true")]
    pub expand_trivial: bool,
}

fn default_true() -> bool {
    true
}

impl Default for InsertionSettings {
    fn default() -> Self {
        Self {
            max_solutions: None,
            max_extensions: None,
            check_validity: true,
            expand_trivial: true,
        }
    }
}

/// Output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct OutputSettings {
    #[serde(default)]
    pub format: OutputFormat,

    /// Render open nodes as their symbol in text output
    #[serde(default)]
    pub show_open: bool,
}

/// Global configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraftConfig {
    /// Configuration version
    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default)]
    pub insertion: InsertionSettings,

    #[serde(default)]
    pub output: OutputSettings,
}

fn default_version() -> String {
    "1.0".to_string()
}

impl Default for GraftConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            insertion: InsertionSettings::default(),
            output: OutputSettings::default(),
        }
    }
}

impl GraftConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).with_context(|| {
            format!("Failed to read grafter config from {}", path.as_ref().display())
        })?;

        let config: Self = toml::from_str(&content).with_context(|| {
            format!("Failed to parse TOML config from {}", path.as_ref().display())
        })?;

        for warning in config.validate()? {
            warn!("{}: {}", path.as_ref().display(), warning);
        }
        Ok(config)
    }

    /// Load configuration from YAML file
    pub fn load_from_yaml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).with_context(|| {
            format!("Failed to read grafter config from {}", path.as_ref().display())
        })?;

        let config: Self = serde_yaml::from_str(&content).with_context(|| {
            format!("Failed to parse YAML config from {}", path.as_ref().display())
        })?;

        for warning in config.validate()? {
            warn!("{}: {}", path.as_ref().display(), warning);
        }
        Ok(config)
    }

    /// Pick the loader by file extension (`.yaml`/`.yml`, anything else is TOML)
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        match path.as_ref().extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::load_from_yaml(path),
            _ => Self::load_from_file(path),
        }
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content =
            toml::to_string_pretty(self).context("Failed to serialize grafter config to TOML")?;

        std::fs::write(&path, content).with_context(|| {
            format!("Failed to write grafter config to {}", path.as_ref().display())
        })?;

        Ok(())
    }

    /// Validate configuration, returning warnings for suspicious settings
    pub fn validate(&self) -> Result<Vec<String>> {
        let mut warnings = Vec::new();

        if self.insertion.max_solutions == Some(0) {
            anyhow::bail!("insertion.max_solutions must be greater than zero");
        }

        if self.insertion.max_solutions.is_none() && self.insertion.max_extensions.is_none() {
            warnings.push(
                "Neither max_solutions nor max_extensions is set; recursive grammars may produce long result streams"
                    .to_string(),
            );
        }

        if !self.insertion.check_validity {
            warnings.push("Validity oracle disabled; unvalidated candidates will be emitted".to_string());
        }

        Ok(warnings)
    }
}
