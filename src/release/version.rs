//! Version string and tag composition
//!
//! Release mode combines the marketing version with the bumped build
//! number; development mode uses the VCS revision id, annotated with a
//! timestamp when the tree was dirty. Tags and on-disk directory names
//! are the version with spaces replaced by underscores.

use chrono::{DateTime, Local};

/// One run's resolved version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseVersion {
  /// Human-readable version string, e.g. "2.1 build 42"
  pub version: String,
  /// Tag-safe form, e.g. "2.1_build_42"
  pub tag: String,
}

impl ReleaseVersion {
  /// Directory name for the release directory (same sanitization as tags)
  pub fn dir_name(&self) -> &str {
    &self.tag
  }
}

/// Compose the release-mode version from marketing version and build number.
pub fn release_version(marketing: &str, build: &str) -> ReleaseVersion {
  let version = format!("{} build {}", marketing, build);
  let tag = sanitize(&version);
  ReleaseVersion { version, tag }
}

/// Compose the development-mode version from the current revision.
///
/// A dirty tree gets a `"+ "` marker plus the local date, time, and
/// timezone so the artifact is distinguishable from the clean revision.
pub fn development_version(revision: &str, dirty: bool, now: DateTime<Local>) -> ReleaseVersion {
  let version = if dirty {
    format!("{}+ {}", revision, now.format("%Y-%m-%d %H:%M:%S %z"))
  } else {
    revision.to_string()
  };
  let tag = sanitize(&version);
  ReleaseVersion { version, tag }
}

/// Replace spaces so the value is usable as a tag and a directory name
fn sanitize(version: &str) -> String {
  version.replace(' ', "_")
}
