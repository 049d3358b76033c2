//! Xcode project introspection via `xcodebuild -list`
//!
//! One subprocess call at startup yields the project name and the ordered
//! sets of build configurations and targets. Everything downstream
//! validates against these parsed lists instead of re-querying.

use crate::core::error::{ResultExt, ShipError, ShipResult, UsageError};
use std::path::Path;
use std::process::Command;

/// The `All` aggregate target builds everything else; it never produces a
/// bundle of its own, so it is filtered out of the target list.
const AGGREGATE_TARGET: &str = "All";

/// Project metadata discovered from xcodebuild
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XcodeProject {
  /// Project name, used for tags propagated into shared trees
  pub name: String,
  /// Build configurations in discovery order
  pub configurations: Vec<String>,
  /// Buildable targets in discovery order, `All` excluded
  pub targets: Vec<String>,
}

impl XcodeProject {
  /// Run `xcodebuild -list` in the project root and parse its output.
  pub fn discover(root: &Path) -> ShipResult<Self> {
    let output = Command::new("xcodebuild")
      .arg("-list")
      .current_dir(root)
      .output()
      .context("Failed to execute xcodebuild -list")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(ShipError::Usage(UsageError::NotAProject {
        root: root.to_path_buf(),
        detail: stderr.trim().to_string(),
      }));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let project = Self::parse_list_output(&stdout);

    if project.configurations.is_empty() || project.targets.is_empty() {
      return Err(ShipError::Usage(UsageError::NotAProject {
        root: root.to_path_buf(),
        detail: "xcodebuild -list reported no build configurations or targets".to_string(),
      }));
    }

    Ok(project)
  }

  /// Parse the sectioned output of `xcodebuild -list`.
  ///
  /// The output looks like:
  ///
  /// ```text
  /// Information about project "MyApp":
  ///     Targets:
  ///         MyApp
  ///         All
  ///
  ///     Build Configurations:
  ///         Debug
  ///         Distribution
  ///
  ///     If no build configuration is specified and -scheme is not passed
  ///     then "Release" is used.
  /// ```
  pub fn parse_list_output(output: &str) -> Self {
    #[derive(PartialEq)]
    enum Section {
      None,
      Targets,
      Configurations,
      Other,
    }

    let mut name = String::new();
    let mut configurations = Vec::new();
    let mut targets = Vec::new();
    let mut section = Section::None;

    for line in output.lines() {
      let trimmed = line.trim();

      if let Some(rest) = trimmed.strip_prefix("Information about project \"")
        && let Some(project_name) = rest.strip_suffix("\":")
      {
        name = project_name.to_string();
        continue;
      }

      // Section headers end with a colon
      if let Some(header) = trimmed.strip_suffix(':') {
        section = match header {
          "Targets" => Section::Targets,
          "Build Configurations" => Section::Configurations,
          _ => Section::Other,
        };
        continue;
      }

      if trimmed.is_empty() {
        section = Section::None;
        continue;
      }

      // Entry lines are indented names, possibly annotated
      let entry = trimmed
        .trim_end_matches("(default)")
        .trim_end_matches("(Active)")
        .trim();
      if entry.is_empty() {
        continue;
      }

      match section {
        Section::Targets => {
          if entry != AGGREGATE_TARGET {
            targets.push(entry.to_string());
          }
        }
        Section::Configurations => configurations.push(entry.to_string()),
        _ => {}
      }
    }

    Self {
      name,
      configurations,
      targets,
    }
  }

  /// Case-sensitive whole-name configuration membership test
  pub fn has_configuration(&self, name: &str) -> bool {
    self.configurations.iter().any(|c| c == name)
  }
}
