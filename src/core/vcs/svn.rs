//! System Subversion backend
//!
//! Tagging in Subversion is a server-side copy that needs a repository
//! URL the orchestrator does not carry, so `tag` warns and does nothing.
//! Revision identifiers come from `svnversion`, normalized for use in
//! directory names.

use super::Vcs;
use crate::core::error::{ResultExt, ShipError, ShipResult, VcsError};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Subversion backend using the system svn/svnversion binaries
pub struct SystemSvn {
  root: PathBuf,
}

impl SystemSvn {
  pub fn new(root: &Path) -> Self {
    Self {
      root: root.to_path_buf(),
    }
  }

  fn run(&self, program: &str, args: &[&str]) -> ShipResult<String> {
    let output = Command::new(program)
      .args(args)
      .current_dir(&self.root)
      .output()
      .with_context(|| format!("Failed to execute {} {}", program, args.join(" ")))?;

    if !output.status.success() {
      return Err(ShipError::Vcs(VcsError::CommandFailed {
        command: format!("{} {}", program, args.join(" ")),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
      }));
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
  }
}

impl Vcs for SystemSvn {
  fn name(&self) -> &'static str {
    "svn"
  }

  fn status(&self) -> ShipResult<String> {
    self.run("svn", &["status", "-q"])
  }

  fn commit_all(&self, message: &str) -> ShipResult<()> {
    self.run("svn", &["commit", "-m", message])?;
    Ok(())
  }

  fn tag(&self, name: &str, _message: &str) -> ShipResult<()> {
    println!("⚠️  svn backend cannot create tag '{}' without a repository URL; skipping", name);
    Ok(())
  }

  fn revision_id(&self) -> ShipResult<String> {
    let raw = self.run("svnversion", &[])?;
    Ok(normalize_revision(&raw))
  }
}

/// Make svnversion output safe for directory and tag names.
///
/// svnversion may print mixed-revision ranges like `1234:1236M`; the colon
/// is replaced since the identifier ends up in filesystem paths.
fn normalize_revision(raw: &str) -> String {
  raw.trim().replace(':', "-")
}
