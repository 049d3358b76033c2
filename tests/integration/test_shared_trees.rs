//! Shared source trees from ship.toml: cleanliness gating, tag
//! propagation, and the output root override

use crate::helpers::{TestProject, tags_in};
use anyhow::Result;
use std::fs;

#[test]
fn test_release_tags_shared_tree_with_project_prefix() -> Result<()> {
  let project = TestProject::new()?;
  let shared = project.add_shared_repo("shared")?;
  project.add_committed_file("ship.toml", "shared = [\"../shared\"]\n")?;

  let output = project.run_xcship(&["Distribution"])?;
  assert_eq!(output.status.code(), Some(0), "stderr: {}", String::from_utf8_lossy(&output.stderr));

  // The project gets the plain tag, the shared tree the prefixed one
  assert!(project.tags()?.contains(&"2.1_build_42".to_string()));
  assert!(
    tags_in(&shared)?.contains(&"MyApp-2.1_build_42".to_string()),
    "shared tags: {:?}",
    tags_in(&shared)?
  );
  Ok(())
}

#[test]
fn test_release_blocked_by_dirty_shared_tree() -> Result<()> {
  let project = TestProject::new()?;
  let shared = project.add_shared_repo("shared")?;
  project.add_committed_file("ship.toml", "shared = [\"../shared\"]\n")?;
  fs::write(shared.join("Shared.m"), "// modified\n")?;

  let output = project.run_xcship(&["Distribution"])?;
  assert_eq!(output.status.code(), Some(1));

  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("dirty"), "stderr: {}", stderr);

  // Nothing happened: no build, no bump, no tags anywhere
  assert!(!project.path.join("build").exists());
  assert!(!project.path.join("Releases").exists());
  assert!(project.tags()?.is_empty());
  assert!(tags_in(&shared)?.is_empty());
  assert_eq!(fs::read_to_string(project.path.join("BuildNumber"))?.trim(), "41");
  Ok(())
}

#[test]
fn test_dev_run_warns_about_dirty_shared_tree() -> Result<()> {
  let project = TestProject::new()?;
  let shared = project.add_shared_repo("shared")?;
  project.add_committed_file("ship.toml", "shared = [\"../shared\"]\n")?;
  fs::write(shared.join("Shared.m"), "// modified\n")?;

  let output = project.run_xcship(&["-n", "Debug"])?;
  assert_eq!(output.status.code(), Some(0), "stderr: {}", String::from_utf8_lossy(&output.stderr));

  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(stdout.contains("⚠️"), "expected a dirty-tree warning, got: {}", stdout);

  // The dirty shared tree marks the version like a dirty project tree
  let config_dir = project.path.join("Development/Debug");
  let versions: Vec<String> = fs::read_dir(&config_dir)?
    .filter_map(|e| e.ok())
    .filter(|e| e.path().is_dir())
    .map(|e| e.file_name().to_string_lossy().to_string())
    .collect();
  assert_eq!(versions.len(), 1);
  assert!(versions[0].contains('+'), "version dir: {}", versions[0]);
  Ok(())
}

#[test]
fn test_output_root_override_relocates_artifacts() -> Result<()> {
  let project = TestProject::new()?;
  project.add_committed_file("ship.toml", "[project]\noutput_root = \"artifacts\"\n")?;

  let output = project.run_xcship(&["-n", "Debug"])?;
  assert_eq!(output.status.code(), Some(0), "stderr: {}", String::from_utf8_lossy(&output.stderr));

  let revision = project.head_revision()?;
  let artifact = project
    .path
    .join("artifacts/Development/Debug")
    .join(&revision)
    .join("MyApp.ipa");
  assert!(artifact.exists(), "expected {}", artifact.display());
  assert!(!project.path.join("Development").exists());
  Ok(())
}
