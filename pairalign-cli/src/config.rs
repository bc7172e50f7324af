//! Configuration handling for the pairalign CLI
//!
//! Supports loading defaults from pairalign.toml files; command-line flags
//! override every value read here.

use anyhow::{Context, Result};
use pairalign_core::{AlignMode, PathFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "pairalign.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub align: AlignSection,
    #[serde(default)]
    pub output: OutputSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignSection {
    /// Alignment mode: NW, SHW or HW
    #[serde(default)]
    pub mode: AlignMode,

    /// Maximum reported edit distance; negative means unbounded
    #[serde(default = "default_score_cutoff")]
    pub score_cutoff: i64,

    /// Engine calls per pair
    #[serde(default = "default_repeats")]
    pub repeats: u32,

    /// Report only the N best-scoring pairs (0 = all)
    #[serde(default)]
    pub best: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputSection {
    /// Alignment path format: NICE, CIG_STD or CIG_EXT
    #[serde(default)]
    pub format: PathFormat,

    /// Suppress per-pair results
    #[serde(default)]
    pub silent: bool,
}

// Default value functions
fn default_score_cutoff() -> i64 { -1 }
fn default_repeats() -> u32 { 1 }

impl Default for AlignSection {
    fn default() -> Self {
        Self {
            mode: AlignMode::default(),
            score_cutoff: default_score_cutoff(),
            repeats: default_repeats(),
            best: 0,
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => {
                log::info!("Loading configuration from: {}", path.display());
                Self::load_from_file(path)?
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    log::info!("Loading configuration from: {}", DEFAULT_CONFIG_FILE);
                    Self::load_from_file(&default_path)?
                } else {
                    log::debug!("Using default configuration");
                    Self::default()
                }
            }
        };

        if config.align.repeats == 0 {
            anyhow::bail!("align.repeats must be at least 1");
        }
        Ok(config)
    }

    /// Load configuration from a specific TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse configuration file: {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write configuration file: {}", path.display()))?;

        Ok(())
    }

    /// Generate example configuration file content
    pub fn example_toml() -> Result<String> {
        toml::to_string_pretty(&Self::default()).context("Failed to serialize default configuration")
    }
}
