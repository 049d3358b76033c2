//! Driving xcodebuild per configuration
//!
//! One blocking `xcodebuild clean build` call per configuration, all
//! targets at once. The combined log is captured because the packaging
//! step later mines it for the embedded provisioning-profile reference.

use crate::core::error::{BuildError, ResultExt, ShipError, ShipResult};
use std::path::{Path, PathBuf};
use std::process::Command;

/// How many trailing log lines to show when a build fails
const FAILURE_LOG_LINES: usize = 25;

/// Captured output of one configuration build
pub struct BuildOutput {
  /// Combined stdout + stderr of xcodebuild
  pub log: String,
}

/// Clean and build every target for one configuration.
///
/// Target-level parallelism is xcodebuild's own; this call blocks until
/// the whole configuration is built. Non-zero exit is fatal.
pub fn clean_build(root: &Path, configuration: &str) -> ShipResult<BuildOutput> {
  println!("🔨 Building configuration '{}'...", configuration);

  let output = Command::new("xcodebuild")
    .args([
      "-configuration",
      configuration,
      "-alltargets",
      "-parallelizeTargets",
      "clean",
      "build",
    ])
    .current_dir(root)
    .output()
    .context("Failed to execute xcodebuild")?;

  let mut log = String::from_utf8_lossy(&output.stdout).to_string();
  log.push_str(&String::from_utf8_lossy(&output.stderr));

  if !output.status.success() {
    return Err(ShipError::Build(BuildError::CommandFailed {
      configuration: configuration.to_string(),
      log_tail: log_tail(&log, FAILURE_LOG_LINES),
    }));
  }

  Ok(BuildOutput { log })
}

/// Where xcodebuild leaves built products for a configuration
pub fn product_dir(root: &Path, configuration: &str) -> PathBuf {
  root.join("build").join(format!("{}-iphoneos", configuration))
}

/// Last `lines` lines of a build log, for failure diagnostics
pub fn log_tail(log: &str, lines: usize) -> String {
  let all: Vec<&str> = log.lines().collect();
  let start = all.len().saturating_sub(lines);
  all[start..].join("\n")
}
