use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use shoji_ipc::Inset;

/// User settings, loaded once at startup and passed by reference.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Space kept free around each display's work area.
    pub display_padding: Inset,
    /// Space kept free around each tiled window.
    pub window_margin: Inset,
    /// Window classes that are never tiled.
    pub ignored_classnames: Vec<String>,
    /// Aspect bias for choosing side-by-side over stacked splits.
    pub partition_split_ratio: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            display_padding: Inset::default(),
            window_margin: Inset::default(),
            ignored_classnames: Vec::new(),
            partition_split_ratio: 1.0,
        }
    }
}

impl Config {
    /// `<config_dir>/shoji/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("shoji").join("config.toml"))
    }

    /// Loads `path` if given, otherwise the default location.
    ///
    /// A missing default file is not an error; a missing explicit file is.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            Some(path) => {
                tracing::info!("No config file at {}, using defaults", path.display());
                Ok(Self::default())
            }
            None => {
                tracing::info!("No config directory available, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = Self::parse(&contents)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let ratio = self.partition_split_ratio;
        if !ratio.is_finite() || ratio <= 0.0 {
            bail!("partition_split_ratio must be a positive number, got {}", ratio);
        }
        Ok(())
    }
}
