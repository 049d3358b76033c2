//! System git backend
//!
//! Shells out to the system git binary with an isolated environment. The
//! orchestrator only needs porcelain status, commit -a, annotated tags,
//! and a short revision id.

use super::Vcs;
use crate::core::error::{ResultExt, ShipError, ShipResult, VcsError};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Git backend using system git (zero crate dependencies)
pub struct SystemGit {
  root: PathBuf,
}

impl SystemGit {
  pub fn new(root: &Path) -> Self {
    Self {
      root: root.to_path_buf(),
    }
  }

  /// Create a safe git command with isolated environment
  ///
  /// - Sets working directory to the tree root
  /// - Clears environment variables, whitelisting only PATH and HOME
  /// - Overrides chatty advice output
  fn git_cmd(&self) -> Command {
    let mut cmd = Command::new("git");

    cmd.arg("-C").arg(&self.root);

    cmd.env_clear();
    if let Ok(path) = std::env::var("PATH") {
      cmd.env("PATH", path);
    }
    if let Ok(home) = std::env::var("HOME") {
      cmd.env("HOME", home);
    }

    cmd.arg("-c").arg("advice.detachedHead=false");
    cmd.arg("-c").arg("core.quotePath=false");

    cmd
  }

  fn run(&self, args: &[&str]) -> ShipResult<String> {
    let output = self
      .git_cmd()
      .args(args)
      .output()
      .with_context(|| format!("Failed to execute git {}", args.join(" ")))?;

    if !output.status.success() {
      return Err(ShipError::Vcs(VcsError::CommandFailed {
        command: format!("git {}", args.join(" ")),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
      }));
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
  }
}

impl Vcs for SystemGit {
  fn name(&self) -> &'static str {
    "git"
  }

  fn status(&self) -> ShipResult<String> {
    self.run(&["status", "--porcelain"])
  }

  fn commit_all(&self, message: &str) -> ShipResult<()> {
    self.run(&["commit", "-a", "-m", message])?;
    Ok(())
  }

  fn tag(&self, name: &str, message: &str) -> ShipResult<()> {
    self.run(&["tag", "-a", name, "-m", message])?;
    Ok(())
  }

  fn revision_id(&self) -> ShipResult<String> {
    Ok(self.run(&["rev-parse", "--short", "HEAD"])?.trim().to_string())
  }
}
