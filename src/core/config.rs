//! Project configuration (ship.toml) parsing
//!
//! ship.toml is optional. It declares the things the orchestrator cannot
//! discover from the project itself: auxiliary shared source trees that
//! must be clean (and get tagged) on release, an output root override, and
//! an explicit artwork path.

use crate::core::error::{ResultExt, ShipResult};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for xcship, stored in ship.toml at the project root
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShipConfig {
  #[serde(default)]
  pub project: ProjectSection,

  /// Auxiliary shared source trees, relative to the project root.
  /// Checked for cleanliness in release mode and tagged `<project>-<tag>`.
  #[serde(default)]
  pub shared: Vec<PathBuf>,

  #[serde(default)]
  pub artwork: ArtworkSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectSection {
  /// Where Releases/ and Development/ are created (default: project root)
  pub output_root: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArtworkSection {
  /// Explicit artwork file, overriding per-target and project-wide lookup
  pub path: Option<PathBuf>,
}

impl ShipConfig {
  /// Load ship.toml from the project root. Absence is not an error.
  pub fn load(root: &Path) -> ShipResult<Option<Self>> {
    let config_path = root.join("ship.toml");
    if !config_path.exists() {
      return Ok(None);
    }

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config: ShipConfig =
      toml::from_str(&content).with_context(|| format!("Failed to parse {}", config_path.display()))?;
    Ok(Some(config))
  }

  /// Shared trees resolved against the project root
  pub fn shared_trees(&self, root: &Path) -> Vec<PathBuf> {
    self.shared.iter().map(|p| root.join(p)).collect()
  }
}
