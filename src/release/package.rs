//! Per-target packaging: staging, archiving, artwork, dSYM, symlinks
//!
//! Each target's built bundle is staged into a scratch directory shaped
//! like the archive interior, compressed with the system zip tool, and
//! published under the release directory together with artwork, debug
//! symbols, and (when the build log names one) the provisioning profile.
//! A per-configuration symlink always points at the newest artifact.

use crate::core::error::{PackageError, ResultExt, ShipError, ShipResult};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;

/// Configuration names that produce App Store distribution archives
const DISTRIBUTION_CONFIGS: [&str; 2] = ["Distribute", "Distribution"];

/// One target's packaging inputs
pub struct PackageJob<'a> {
  pub target: &'a str,
  pub configuration: &'a str,
  /// xcodebuild's product directory for this configuration
  pub product_dir: &'a Path,
  /// `<basedir>/<config>/<version>` - where artifacts land
  pub release_dir: &'a Path,
  /// `<basedir>/<config>` - where the latest symlinks live
  pub config_dir: &'a Path,
  /// Scratch staging directory, reused sequentially across targets
  pub staging_dir: &'a Path,
  /// Resolved artwork file, if any
  pub artwork: Option<PathBuf>,
  /// Captured build log, mined for the provisioning profile
  pub build_log: &'a str,
}

/// Distribution configs ship `.zip` archives, everything else `.ipa`
pub fn is_distribution(configuration: &str) -> bool {
  DISTRIBUTION_CONFIGS.contains(&configuration)
}

/// Archive extension for a configuration
pub fn archive_extension(configuration: &str) -> &'static str {
  if is_distribution(configuration) { "zip" } else { "ipa" }
}

/// Resolve artwork for a target: explicit override, then
/// `<target>-iTunesArtwork`, then project-wide `iTunesArtwork`.
pub fn resolve_artwork(root: &Path, target: &str, override_path: Option<&Path>) -> Option<PathBuf> {
  if let Some(path) = override_path
    && path.exists()
  {
    return Some(path.to_path_buf());
  }

  let per_target = root.join(format!("{}-iTunesArtwork", target));
  if per_target.exists() {
    return Some(per_target);
  }

  let project_wide = root.join("iTunesArtwork");
  if project_wide.exists() {
    return Some(project_wide);
  }

  None
}

/// Package one target. Returns the artifact paths produced, in order.
pub fn package_target(job: &PackageJob) -> ShipResult<Vec<PathBuf>> {
  let bundle = job.product_dir.join(format!("{}.app", job.target));
  if !bundle.exists() {
    return Err(ShipError::Package(PackageError::MissingBundle {
      target: job.target.to_string(),
      path: bundle,
    }));
  }

  let distribution = is_distribution(job.configuration);
  let ext = archive_extension(job.configuration);
  let archive_name = format!("{}.{}", job.target, ext);
  let archive = job.release_dir.join(&archive_name);
  let mut artifacts = Vec::new();

  // Stage, compress, and always clear the scratch directory so a failure
  // cannot leak staged files into the next target's archive.
  let staged = stage_payload(&bundle, job.staging_dir, job.target, distribution, job.artwork.as_deref());
  let result = staged.and_then(|items| compress(job.staging_dir, &items, &archive));
  remove_dir_if_present(job.staging_dir)?;
  result?;
  artifacts.push(archive.clone());

  // Distribution archives keep artwork beside the archive, not inside it
  if distribution
    && let Some(artwork) = &job.artwork
  {
    let dest = job.release_dir.join(format!("{}.iTunesArtwork", job.target));
    fs::copy(artwork, &dest).with_context(|| format!("Failed to copy artwork to {}", dest.display()))?;
    artifacts.push(dest);
  }

  // Debug symbols are optional; package them when the build produced them
  let dsym = job.product_dir.join(format!("{}.app.dSYM", job.target));
  if dsym.exists() {
    let dsym_archive = job.release_dir.join(format!("{}.dSYM.zip", job.target));
    compress(job.product_dir, &[format!("{}.app.dSYM", job.target)], &dsym_archive)?;
    artifacts.push(dsym_archive);
  }

  // Latest pointer: <config>/<target>.<ext> -> <version>/<target>.<ext>
  let link = job.config_dir.join(&archive_name);
  update_symlink(&link, &version_relative(job.release_dir, &archive_name))?;

  publish_profile(job, &mut artifacts)?;

  Ok(artifacts)
}

/// Stage the bundle (and artwork, for installable packages) into the
/// scratch directory. Returns the entry names to archive.
fn stage_payload(
  bundle: &Path,
  staging: &Path,
  target: &str,
  distribution: bool,
  artwork: Option<&Path>,
) -> ShipResult<Vec<String>> {
  remove_dir_if_present(staging)?;

  let mut items = Vec::new();
  if distribution {
    // Bare .app at the archive root
    let dest = staging.join(format!("{}.app", target));
    copy_dir_recursive(bundle, &dest)?;
    items.push(format!("{}.app", target));
  } else {
    // iTunes-installable layout: Payload/<target>.app (+ iTunesArtwork)
    let payload = staging.join("Payload");
    copy_dir_recursive(bundle, &payload.join(format!("{}.app", target)))?;
    items.push("Payload".to_string());

    if let Some(artwork) = artwork {
      fs::copy(artwork, staging.join("iTunesArtwork")).context("Failed to stage artwork")?;
      items.push("iTunesArtwork".to_string());
    }
  }

  Ok(items)
}

/// Compress entries from inside `dir` into `archive` with the system zip
fn compress(dir: &Path, items: &[String], archive: &Path) -> ShipResult<()> {
  let output = Command::new("zip")
    .arg("-qry")
    .arg(archive)
    .args(items)
    .current_dir(dir)
    .output()
    .context("Failed to execute zip")?;

  if !output.status.success() {
    return Err(ShipError::Package(PackageError::ArchiveFailed {
      archive: archive.to_path_buf(),
      stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    }));
  }

  Ok(())
}

/// Copy the provisioning profile named in the build log into the release
/// directory and refresh the latest-profile symlink. Missing log entries
/// and missing profile files are warnings, never fatal.
fn publish_profile(job: &PackageJob, artifacts: &mut Vec<PathBuf>) -> ShipResult<()> {
  let Some(profile_id) = extract_profile_id(job.build_log, job.target) else {
    println!("⚠️  No provisioning profile found in build log for '{}'", job.target);
    return Ok(());
  };

  let Some(source) = profile_source(&profile_id) else {
    println!("⚠️  Provisioning profile {} not found locally; skipping", profile_id);
    return Ok(());
  };

  let profile_name = format!("{}.mobileprovision", profile_id);
  let dest = job.release_dir.join(&profile_name);
  fs::copy(&source, &dest).with_context(|| format!("Failed to copy profile to {}", dest.display()))?;
  artifacts.push(dest);

  let link = job.config_dir.join(format!("{}.mobileprovision", job.target));
  update_symlink(&link, &version_relative(job.release_dir, &profile_name))?;

  Ok(())
}

/// Extract the provisioning-profile UUID the build used for one target.
///
/// The combined log covers every target in the configuration, so the
/// match is restricted to lines that reference `<target>.build` - an
/// unscoped scan would hand the first target's profile to all of them.
pub fn extract_profile_id(log: &str, target: &str) -> Option<String> {
  static PROFILE_RE: OnceLock<Regex> = OnceLock::new();
  let re = PROFILE_RE.get_or_init(|| {
    Regex::new(
      r"([0-9A-Fa-f]{8}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{12})\.mobileprovision",
    )
    .expect("profile regex is valid")
  });

  let build_ref = format!("{}.build", target);
  log
    .lines()
    .filter(|line| line.contains(&build_ref))
    .find_map(|line| re.captures(line).map(|c| c[1].to_string()))
}

/// Installed location of a provisioning profile, if it exists
fn profile_source(profile_id: &str) -> Option<PathBuf> {
  let home = std::env::var_os("HOME")?;
  let path = PathBuf::from(home)
    .join("Library/MobileDevice/Provisioning Profiles")
    .join(format!("{}.mobileprovision", profile_id));
  path.exists().then_some(path)
}

/// Symlink target relative to the config directory: `<version>/<name>`
fn version_relative(release_dir: &Path, name: &str) -> PathBuf {
  match release_dir.file_name() {
    Some(version) => PathBuf::from(version).join(name),
    None => release_dir.join(name),
  }
}

/// Create or force-overwrite a symlink
fn update_symlink(link: &Path, target: &Path) -> ShipResult<()> {
  if link.symlink_metadata().is_ok() {
    fs::remove_file(link).with_context(|| format!("Failed to replace symlink {}", link.display()))?;
  }
  std::os::unix::fs::symlink(target, link)
    .with_context(|| format!("Failed to create symlink {}", link.display()))?;
  Ok(())
}

fn remove_dir_if_present(dir: &Path) -> ShipResult<()> {
  if dir.exists() {
    fs::remove_dir_all(dir).with_context(|| format!("Failed to remove {}", dir.display()))?;
  }
  Ok(())
}

/// Recursive copy preserving file permissions and symlinks
fn copy_dir_recursive(src: &Path, dst: &Path) -> ShipResult<()> {
  fs::create_dir_all(dst).with_context(|| format!("Failed to create {}", dst.display()))?;

  for entry in fs::read_dir(src).with_context(|| format!("Failed to read {}", src.display()))? {
    let entry = entry?;
    let from = entry.path();
    let to = dst.join(entry.file_name());
    let file_type = entry.file_type()?;

    if file_type.is_dir() {
      copy_dir_recursive(&from, &to)?;
    } else if file_type.is_symlink() {
      let target = fs::read_link(&from)?;
      std::os::unix::fs::symlink(target, &to)
        .with_context(|| format!("Failed to copy symlink {}", from.display()))?;
    } else {
      fs::copy(&from, &to).with_context(|| format!("Failed to copy {}", from.display()))?;
    }
  }

  Ok(())
}
