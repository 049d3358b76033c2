//! Unified project context - build once, pass everywhere
//!
//! ProjectContext gathers everything a run needs up front: the project
//! root, the metadata discovered from `xcodebuild -list`, the optional
//! ship.toml configuration, and the resolved output root. Commands receive
//! it by reference instead of reading ambient state.

use crate::core::config::ShipConfig;
use crate::core::error::ShipResult;
use crate::xcode::project::XcodeProject;
use std::path::{Path, PathBuf};

/// Everything a packaging run needs, built once in main
#[derive(Debug, Clone)]
pub struct ProjectContext {
  /// Project root directory (absolute path)
  pub root: PathBuf,

  /// Metadata discovered from xcodebuild -list
  pub project: XcodeProject,

  /// ship.toml configuration, if present
  pub config: Option<ShipConfig>,

  /// Where Releases/ and Development/ live
  pub output_root: PathBuf,
}

impl ProjectContext {
  /// Build a context from a project root.
  ///
  /// Discovery failures (not an Xcode project, nothing to build) surface
  /// as usage errors.
  pub fn build(root: &Path) -> ShipResult<Self> {
    let project = XcodeProject::discover(root)?;
    let config = ShipConfig::load(root)?;
    Ok(Self::from_parts(root, project, config))
  }

  /// Assemble a context from already-discovered pieces.
  pub fn from_parts(root: &Path, project: XcodeProject, config: Option<ShipConfig>) -> Self {
    let output_root = config
      .as_ref()
      .and_then(|c| c.project.output_root.as_ref())
      .map(|p| root.join(p))
      .unwrap_or_else(|| root.to_path_buf());

    Self {
      root: root.to_path_buf(),
      project,
      config,
      output_root,
    }
  }

  /// Every source tree whose cleanliness matters: the project root first,
  /// then the configured shared trees in declaration order.
  pub fn checked_trees(&self) -> Vec<PathBuf> {
    let mut trees = vec![self.root.clone()];
    if let Some(config) = &self.config {
      trees.extend(config.shared_trees(&self.root));
    }
    trees
  }

  /// Shared trees only (tag propagation in release mode)
  pub fn shared_trees(&self) -> Vec<PathBuf> {
    self
      .config
      .as_ref()
      .map(|c| c.shared_trees(&self.root))
      .unwrap_or_default()
  }

  /// Explicit artwork override from ship.toml, resolved against the root
  pub fn artwork_override(&self) -> Option<PathBuf> {
    self
      .config
      .as_ref()
      .and_then(|c| c.artwork.path.as_ref())
      .map(|p| self.root.join(p))
  }
}
