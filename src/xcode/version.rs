//! Project version metadata via agvtool
//!
//! agvtool reads and bumps the versions stored in the project file. Both
//! queries must yield a value in release mode; an empty answer means the
//! project was never set up for Apple-generic versioning.

use crate::core::error::{BuildError, ResultExt, ShipError, ShipResult};
use std::path::Path;
use std::process::Command;

/// Current marketing version (e.g. "2.1"); empty is a hard failure
pub fn marketing_version(root: &Path) -> ShipResult<String> {
  let out = agvtool(root, &["what-marketing-version", "-terse1"])?;
  nonempty(out).ok_or(ShipError::Build(BuildError::MissingMarketingVersion))
}

/// Bump the build number in every project file
pub fn bump_build_number(root: &Path) -> ShipResult<()> {
  agvtool(root, &["next-version", "-all"])?;
  Ok(())
}

/// Current build number (after a bump); empty is a hard failure
pub fn build_number(root: &Path) -> ShipResult<String> {
  let out = agvtool(root, &["what-version", "-terse"])?;
  nonempty(out).ok_or(ShipError::Build(BuildError::MissingBuildNumber))
}

fn agvtool(root: &Path, args: &[&str]) -> ShipResult<String> {
  let output = Command::new("agvtool")
    .args(args)
    .current_dir(root)
    .output()
    .with_context(|| format!("Failed to execute agvtool {}", args.join(" ")))?;

  if !output.status.success() {
    return Err(ShipError::Build(BuildError::ToolFailed {
      command: format!("agvtool {}", args.join(" ")),
      stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    }));
  }

  Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

fn nonempty(value: String) -> Option<String> {
  if value.is_empty() { None } else { Some(value) }
}
