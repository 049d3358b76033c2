//! VCS abstraction for swappable version-control backends
//!
//! The backend is selected once per tree by which metadata directory is
//! present (.git or .svn), then every operation goes through the trait.

pub mod git;
pub mod svn;

use crate::core::error::{ShipError, ShipResult, VcsError};
use std::path::Path;

pub use git::SystemGit;
pub use svn::SystemSvn;

/// Capability set required from a version-control backend
pub trait Vcs {
  /// Backend name for diagnostics ("git", "svn")
  fn name(&self) -> &'static str;

  /// Short working-tree status listing; empty when clean
  fn status(&self) -> ShipResult<String>;

  /// Whether the tree has uncommitted changes
  fn is_dirty(&self) -> ShipResult<bool> {
    Ok(!self.status()?.trim().is_empty())
  }

  /// Commit all pending changes with the given message
  fn commit_all(&self, message: &str) -> ShipResult<()>;

  /// Create a named tag with a message
  fn tag(&self, name: &str, message: &str) -> ShipResult<()>;

  /// Stable revision identifier for the current checkout
  fn revision_id(&self) -> ShipResult<String>;
}

/// Select a backend for a tree by its metadata directory.
pub fn detect(root: &Path) -> ShipResult<Box<dyn Vcs>> {
  if root.join(".git").exists() {
    Ok(Box::new(SystemGit::new(root)))
  } else if root.join(".svn").exists() {
    Ok(Box::new(SystemSvn::new(root)))
  } else {
    Err(ShipError::Vcs(VcsError::NoBackend {
      root: root.to_path_buf(),
    }))
  }
}
