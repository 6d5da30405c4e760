//! Project and user configuration.
//!
//! `pedigree.toml` sits next to the document being edited and seeds the chart
//! filter and edit behaviour. The user config lives under the platform config
//! directory and only carries presentation preferences. Missing files yield
//! defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::chart::ChartFilter;

/// File name of the project config.
pub const PROJECT_CONFIG_FILE: &str = "pedigree.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub chart: ChartConfig,
    #[serde(default)]
    pub edit: EditConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Person the first subtree is seeded from.
    #[serde(default)]
    pub principal: Option<String>,
    /// Persons left out of the chart.
    #[serde(default)]
    pub hidden: Vec<String>,
}

impl ChartConfig {
    pub fn to_filter(&self) -> ChartFilter {
        ChartFilter {
            principal: self.principal.clone(),
            hidden: self.hidden.iter().cloned().collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditConfig {
    /// Copy the document to `<file>.bak` before writing it back in place.
    #[serde(default = "default_true")]
    pub write_backup: bool,
}

impl Default for EditConfig {
    fn default() -> Self {
        Self {
            write_backup: default_true(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(default)]
    pub output: Option<String>,
}

/// Load `pedigree.toml` from `dir`.
///
/// # Errors
///
/// Returns an error naming the path if the file exists but cannot be read
/// or parsed.
pub fn load_project_config(dir: &Path) -> Result<ProjectConfig> {
    let path = dir.join(PROJECT_CONFIG_FILE);
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }
    parse_file(&path)
}

/// Load `<config_dir>/pedigree/config.toml`.
///
/// # Errors
///
/// Returns an error naming the path if the file exists but cannot be read
/// or parsed.
pub fn load_user_config() -> Result<UserConfig> {
    let Some(path) = user_config_path() else {
        return Ok(UserConfig::default());
    };
    if !path.exists() {
        return Ok(UserConfig::default());
    }
    parse_file(&path)
}

pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("pedigree").join("config.toml"))
}

fn parse_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    toml::from_str::<T>(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Canonical output mode name for a user-supplied value.
///
/// Accepts `pretty`, `text`, `json` and the aliases `human` and `plain`.
pub fn normalize_output_mode(raw: &str) -> Option<&'static str> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "pretty" | "human" => Some("pretty"),
        "text" | "plain" => Some("text"),
        "json" => Some("json"),
        _ => None,
    }
}

const fn default_true() -> bool {
    true
}
