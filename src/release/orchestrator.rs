//! The packaging run: validate, commit/version, build, package, report
//!
//! Strictly sequential. Configurations run in the order given (discovery
//! order when defaulted), targets in discovery order, and any failure
//! aborts the whole run. Artifacts already produced stay on disk; there
//! is no rollback.

use crate::core::context::ProjectContext;
use crate::core::error::{ShipError, ShipResult, UsageError, VcsError};
use crate::core::vcs;
use crate::release::package::{self, PackageJob};
use crate::release::version::{self, ReleaseVersion};
use crate::ui::progress::TargetProgress;
use crate::xcode::build;
use crate::xcode::project::XcodeProject;
use crate::xcode::version as project_version;
use chrono::Local;
use std::fs;
use std::path::PathBuf;

/// Whether this run commits and tags (release) or only packages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
  Release,
  Development,
}

impl Mode {
  /// Base output directory for this mode
  pub fn base_dir(self) -> &'static str {
    match self {
      Mode::Release => "Releases",
      Mode::Development => "Development",
    }
  }
}

/// Run a full packaging pass.
pub fn run(ctx: &ProjectContext, mode: Mode, requested: &[String]) -> ShipResult<()> {
  let configurations = select_configurations(&ctx.project, requested)?;

  let dirty = check_cleanliness(ctx, mode)?;
  let version = resolve_version(ctx, mode, dirty)?;
  println!("🚀 Packaging version '{}' ({} configuration(s))", version.version, configurations.len());

  let staging = ctx.root.join("build").join("xcship-staging");
  let mut manifest: Vec<PathBuf> = Vec::new();

  for configuration in &configurations {
    let build_output = build::clean_build(&ctx.root, configuration)?;

    let config_dir = ctx.output_root.join(mode.base_dir()).join(configuration);
    let release_dir = config_dir.join(version.dir_name());
    fs::create_dir_all(&release_dir)?;

    let product_dir = build::product_dir(&ctx.root, configuration);
    let artwork_override = ctx.artwork_override();

    let mut bar = TargetProgress::new(ctx.project.targets.len(), format!("Packaging {}", configuration));
    for target in &ctx.project.targets {
      let job = PackageJob {
        target,
        configuration,
        product_dir: &product_dir,
        release_dir: &release_dir,
        config_dir: &config_dir,
        staging_dir: &staging,
        artwork: package::resolve_artwork(&ctx.root, target, artwork_override.as_deref()),
        build_log: &build_output.log,
      };
      manifest.extend(package::package_target(&job)?);
      bar.inc();
    }
  }

  report(&manifest);
  Ok(())
}

/// Validate requested configuration names, defaulting to the full set.
pub fn select_configurations(project: &XcodeProject, requested: &[String]) -> ShipResult<Vec<String>> {
  if requested.is_empty() {
    return Ok(project.configurations.clone());
  }

  for name in requested {
    if !project.has_configuration(name) {
      return Err(ShipError::Usage(UsageError::UnknownConfiguration {
        name: name.clone(),
        known: project.configurations.clone(),
      }));
    }
  }

  Ok(requested.to_vec())
}

/// Check every tree for uncommitted changes.
///
/// Release mode aborts on the first dirty tree; development mode records
/// dirtiness so the version string can carry a timestamp.
fn check_cleanliness(ctx: &ProjectContext, mode: Mode) -> ShipResult<bool> {
  let mut dirty = false;

  for tree in ctx.checked_trees() {
    let backend = vcs::detect(&tree)?;
    if backend.is_dirty()? {
      match mode {
        Mode::Release => {
          return Err(ShipError::Vcs(VcsError::DirtyTree {
            status: backend.status()?,
            root: tree,
          }));
        }
        Mode::Development => {
          println!("⚠️  {} has uncommitted changes", tree.display());
          dirty = true;
        }
      }
    }
  }

  Ok(dirty)
}

/// Resolve the run version.
///
/// Release mode bumps the build number, commits, and tags before any
/// build starts; a bump already written to the project file is not rolled
/// back when the commit or tag fails.
fn resolve_version(ctx: &ProjectContext, mode: Mode, dirty: bool) -> ShipResult<ReleaseVersion> {
  match mode {
    Mode::Release => {
      let marketing = project_version::marketing_version(&ctx.root)?;
      project_version::bump_build_number(&ctx.root)?;
      let build = project_version::build_number(&ctx.root)?;
      let rv = version::release_version(&marketing, &build);

      let message = format!("Tagging version {}", rv.version);
      let backend = vcs::detect(&ctx.root)?;
      backend.commit_all(&message)?;
      backend.tag(&rv.tag, &message)?;
      println!("🏷  Committed and tagged '{}'", rv.tag);

      for tree in ctx.shared_trees() {
        let shared_tag = format!("{}-{}", ctx.project.name, rv.tag);
        vcs::detect(&tree)?.tag(&shared_tag, &message)?;
      }

      Ok(rv)
    }
    Mode::Development => {
      let revision = vcs::detect(&ctx.root)?.revision_id()?;
      Ok(version::development_version(&revision, dirty, Local::now()))
    }
  }
}

/// Print every artifact path produced, in creation order.
fn report(manifest: &[PathBuf]) {
  println!();
  println!("📦 Created {} artifact(s):", manifest.len());
  for path in manifest {
    println!("{}", path.display());
  }
}
