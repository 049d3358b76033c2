//! Test helpers for integration tests
//!
//! Builds a throwaway Xcode-like project backed by a real git repository,
//! with stub `xcodebuild`, `agvtool`, and `zip` executables placed first
//! on PATH. The stubs are file-driven: tests drop marker files under
//! `.stub/` to shape tool behavior before committing the tree.

use anyhow::{Context, Result};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const DEFAULT_LIST_OUTPUT: &str = r#"Information about project "MyApp":
    Targets:
        MyApp
        All

    Build Configurations:
        Debug
        Distribution

"#;

const XCODEBUILD_STUB: &str = r#"#!/bin/sh
if [ "$1" = "-list" ]; then
  if [ -f .stub/fail_list ]; then
    echo "xcodebuild: error: does not contain an Xcode project" >&2
    exit 66
  fi
  cat .stub/list.txt
  exit 0
fi
if [ -f .stub/fail_build ]; then
  echo "The following build commands failed:"
  echo "    CompileC Classes/AppDelegate.o"
  exit 65
fi
cfg=""
prev=""
for a in "$@"; do
  [ "$prev" = "-configuration" ] && cfg="$a"
  prev="$a"
done
out="build/$cfg-iphoneos"
mkdir -p "$out/MyApp.app"
echo "binary" > "$out/MyApp.app/MyApp"
if [ -f .stub/dsym ]; then
  mkdir -p "$out/MyApp.app.dSYM/Contents"
  echo "dwarf" > "$out/MyApp.app.dSYM/Contents/Info.plist"
fi
if [ -f .stub/profile_id ]; then
  id=$(cat .stub/profile_id)
  echo "ProcessProductPackaging \"$HOME/Library/MobileDevice/Provisioning Profiles/$id.mobileprovision\" build/MyApp.build"
fi
echo "** BUILD SUCCEEDED **"
exit 0
"#;

const AGVTOOL_STUB: &str = r#"#!/bin/sh
case "$1" in
  what-marketing-version)
    cat .stub/marketing
    ;;
  next-version)
    n=$(cat BuildNumber)
    echo $((n + 1)) > BuildNumber
    ;;
  what-version)
    cat BuildNumber
    ;;
esac
exit 0
"#;

const ZIP_STUB: &str = r#"#!/bin/sh
# $1 is -qry, $2 the archive, the rest entries that must exist
archive="$2"
shift 2
for entry in "$@"; do
  [ -e "$entry" ] || { echo "zip error: nothing to do ($entry)" >&2; exit 12; }
done
echo "stub-archive" > "$archive"
exit 0
"#;

/// A disposable project directory with stub tools and git history
pub struct TestProject {
  _root: TempDir,
  /// The project root (git repository, cwd for xcship)
  pub path: PathBuf,
  /// Stub executables directory, prepended to PATH
  pub bin: PathBuf,
  /// HOME for the spawned process (provisioning profiles live here)
  pub home: PathBuf,
}

impl TestProject {
  /// Create a project with the default two configurations and one target
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().join("project");
    let bin = root.path().join("bin");
    let home = root.path().join("home");
    fs::create_dir_all(&path)?;
    fs::create_dir_all(&bin)?;
    fs::create_dir_all(&home)?;

    write_stub(&bin.join("xcodebuild"), XCODEBUILD_STUB)?;
    write_stub(&bin.join("agvtool"), AGVTOOL_STUB)?;
    write_stub(&bin.join("zip"), ZIP_STUB)?;

    // Project files the stubs read
    fs::create_dir_all(path.join(".stub"))?;
    fs::write(path.join(".stub/list.txt"), DEFAULT_LIST_OUTPUT)?;
    fs::write(path.join(".stub/marketing"), "2.1\n")?;
    fs::write(path.join("BuildNumber"), "41\n")?;
    fs::write(path.join("main.m"), "int main() { return 0; }\n")?;
    fs::write(path.join(".gitignore"), "build/\nDevelopment/\nReleases/\n")?;

    // Real git history underneath
    git(&path, &["init", "--initial-branch=main"])?;
    git(&path, &["config", "user.name", "Test User"])?;
    git(&path, &["config", "user.email", "test@example.com"])?;
    git(&path, &["add", "."])?;
    git(&path, &["commit", "-m", "Initial project setup"])?;

    Ok(Self {
      _root: root,
      path,
      bin,
      home,
    })
  }

  /// Write a file into the project and commit everything
  pub fn add_committed_file(&self, name: &str, content: &str) -> Result<()> {
    fs::write(self.path.join(name), content)?;
    git(&self.path, &["add", "."])?;
    git(&self.path, &["commit", "-m", &format!("Add {}", name)])?;
    Ok(())
  }

  /// Modify a tracked file without committing (makes the tree dirty)
  pub fn dirty_tracked_file(&self) -> Result<()> {
    fs::write(self.path.join("main.m"), "int main() { return 1; }\n")?;
    Ok(())
  }

  /// Short revision id of HEAD, as the binary will see it
  pub fn head_revision(&self) -> Result<String> {
    let output = git(&self.path, &["rev-parse", "--short", "HEAD"])?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// List tags in the project repository
  pub fn tags(&self) -> Result<Vec<String>> {
    tags_in(&self.path)
  }

  /// Create a sibling git repository, reachable from the project as
  /// `../<name>`, for use as a shared source tree
  pub fn add_shared_repo(&self, name: &str) -> Result<PathBuf> {
    let path = self._root.path().join(name);
    fs::create_dir_all(&path)?;
    fs::write(path.join("Shared.m"), "// shared sources\n")?;
    git(&path, &["init", "--initial-branch=main"])?;
    git(&path, &["config", "user.name", "Test User"])?;
    git(&path, &["config", "user.email", "test@example.com"])?;
    git(&path, &["add", "."])?;
    git(&path, &["commit", "-m", "Initial shared sources"])?;
    Ok(path)
  }

  /// Install a provisioning profile under the test HOME
  pub fn install_profile(&self, profile_id: &str) -> Result<PathBuf> {
    let dir = self.home.join("Library/MobileDevice/Provisioning Profiles");
    fs::create_dir_all(&dir)?;
    let path = dir.join(format!("{}.mobileprovision", profile_id));
    fs::write(&path, "profile-plist")?;
    Ok(path)
  }

  /// Run xcship in the project directory with stubs first on PATH
  pub fn run_xcship(&self, args: &[&str]) -> Result<Output> {
    let path_var = format!(
      "{}:{}",
      self.bin.display(),
      std::env::var("PATH").unwrap_or_default()
    );
    Command::new(env!("CARGO_BIN_EXE_xcship"))
      .args(args)
      .current_dir(&self.path)
      .env("PATH", path_var)
      .env("HOME", &self.home)
      .output()
      .context("Failed to run xcship")
  }
}

fn write_stub(path: &Path, script: &str) -> Result<()> {
  fs::write(path, script)?;
  fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
  Ok(())
}

/// Run a git command in a repository, asserting success
pub fn git(repo: &Path, args: &[&str]) -> Result<Output> {
  let output = Command::new("git")
    .arg("-C")
    .arg(repo)
    .args(args)
    .output()
    .with_context(|| format!("Failed to run git {:?}", args))?;
  anyhow::ensure!(
    output.status.success(),
    "git {:?} failed: {}",
    args,
    String::from_utf8_lossy(&output.stderr)
  );
  Ok(output)
}

/// List tags in any git repository
pub fn tags_in(repo: &Path) -> Result<Vec<String>> {
  let output = git(repo, &["tag", "-l"])?;
  Ok(
    String::from_utf8_lossy(&output.stdout)
      .lines()
      .map(|l| l.to_string())
      .collect(),
  )
}

/// Lines of stdout that are artifact paths (absolute paths in the manifest)
pub fn manifest_paths(output: &Output) -> Vec<String> {
  String::from_utf8_lossy(&output.stdout)
    .lines()
    .filter(|l| l.starts_with('/'))
    .map(|l| l.to_string())
    .collect()
}
