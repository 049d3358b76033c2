//! Error types for xcship with contextual messages and exit codes
//!
//! Every failure in a packaging run is fatal; this module decides how it is
//! reported and which exit status the process ends with. Usage mistakes
//! (bad flag, unknown configuration, not an Xcode project) exit 3, every
//! other failure exits 1.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for xcship
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// Generic failure (dirty tree, build, archive, VCS, I/O)
  Failure = 1,
  /// Usage error (bad flag, unknown configuration, no project metadata)
  Usage = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for xcship
#[derive(Debug)]
pub enum ShipError {
  /// CLI / project discovery errors
  Usage(UsageError),

  /// Version-control operation errors
  Vcs(VcsError),

  /// Build and project-metadata errors
  Build(BuildError),

  /// Archiving and staging errors
  Package(PackageError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message, optional context, and the exit code of
  /// whatever error it was built from
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
    code: ExitCode,
  },
}

impl ShipError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    ShipError::Message {
      message: msg.into(),
      context: None,
      help: None,
      code: ExitCode::Failure,
    }
  }

  /// Add context to an existing error, keeping its exit code
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      ShipError::Message { message, context, help, code } => ShipError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
        code,
      },
      other => ShipError::Message {
        help: other.help_message(),
        message: other.to_string(),
        code: other.exit_code(),
        context: Some(ctx_str),
      },
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      ShipError::Usage(_) => ExitCode::Usage,
      ShipError::Message { code, .. } => *code,
      _ => ExitCode::Failure,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      ShipError::Usage(e) => e.help_message(),
      ShipError::Vcs(e) => e.help_message(),
      ShipError::Build(e) => e.help_message(),
      ShipError::Package(e) => e.help_message(),
      ShipError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for ShipError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ShipError::Usage(e) => write!(f, "{}", e),
      ShipError::Vcs(e) => write!(f, "{}", e),
      ShipError::Build(e) => write!(f, "{}", e),
      ShipError::Package(e) => write!(f, "{}", e),
      ShipError::Io(e) => write!(f, "I/O error: {}", e),
      ShipError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for ShipError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      ShipError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for ShipError {
  fn from(err: io::Error) -> Self {
    ShipError::Io(err)
  }
}

impl From<String> for ShipError {
  fn from(msg: String) -> Self {
    ShipError::message(msg)
  }
}

impl From<&str> for ShipError {
  fn from(msg: &str) -> Self {
    ShipError::message(msg)
  }
}

impl From<toml::de::Error> for ShipError {
  fn from(err: toml::de::Error) -> Self {
    ShipError::message(format!("TOML parse error: {}", err))
  }
}

impl From<std::str::Utf8Error> for ShipError {
  fn from(err: std::str::Utf8Error) -> Self {
    ShipError::message(format!("UTF-8 error: {}", err))
  }
}

impl From<std::string::FromUtf8Error> for ShipError {
  fn from(err: std::string::FromUtf8Error) -> Self {
    ShipError::message(format!("UTF-8 conversion error: {}", err))
  }
}

impl From<std::path::StripPrefixError> for ShipError {
  fn from(err: std::path::StripPrefixError) -> Self {
    ShipError::message(format!("Path strip prefix error: {}", err))
  }
}

/// Convert anyhow::Error to ShipError
impl From<anyhow::Error> for ShipError {
  fn from(err: anyhow::Error) -> Self {
    ShipError::message(err.to_string())
  }
}

/// CLI and project discovery errors (exit status 3)
#[derive(Debug)]
pub enum UsageError {
  /// Positional argument did not match any discovered configuration
  UnknownConfiguration { name: String, known: Vec<String> },

  /// xcodebuild found no configurations or targets here
  NotAProject { root: PathBuf, detail: String },
}

impl UsageError {
  fn help_message(&self) -> Option<String> {
    match self {
      UsageError::UnknownConfiguration { known, .. } => Some(format!(
        "Valid configurations for this project: {}",
        known.join(", ")
      )),
      UsageError::NotAProject { .. } => {
        Some("Run xcship from a directory containing an Xcode project.".to_string())
      }
    }
  }
}

impl fmt::Display for UsageError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      UsageError::UnknownConfiguration { name, .. } => {
        write!(f, "Unknown build configuration '{}'", name)
      }
      UsageError::NotAProject { root, detail } => {
        write!(f, "Not a valid Xcode project: {}\n{}", root.display(), detail)
      }
    }
  }
}

/// Version-control operation errors
#[derive(Debug)]
pub enum VcsError {
  /// Neither .git nor .svn found in a checked tree
  NoBackend { root: PathBuf },

  /// A checked tree has uncommitted changes in release mode
  DirtyTree { root: PathBuf, status: String },

  /// A git/svn command failed
  CommandFailed { command: String, stderr: String },
}

impl VcsError {
  fn help_message(&self) -> Option<String> {
    match self {
      VcsError::DirtyTree { .. } => {
        Some("Commit your changes, or pass -n for a development build that tolerates a dirty tree.".to_string())
      }
      VcsError::NoBackend { .. } => {
        Some("xcship needs a git or svn working copy to record releases.".to_string())
      }
      _ => None,
    }
  }
}

impl fmt::Display for VcsError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      VcsError::NoBackend { root } => {
        write!(f, "No version-control metadata (.git or .svn) found in {}", root.display())
      }
      VcsError::DirtyTree { root, status } => {
        write!(f, "Directory is dirty: {}\n{}", root.display(), status)
      }
      VcsError::CommandFailed { command, stderr } => {
        write!(f, "VCS command failed: {}\n{}", command, stderr)
      }
    }
  }
}

/// Build-tool and project-metadata errors
#[derive(Debug)]
pub enum BuildError {
  /// xcodebuild returned non-zero
  CommandFailed { configuration: String, log_tail: String },

  /// A toolchain helper (agvtool) returned non-zero
  ToolFailed { command: String, stderr: String },

  /// agvtool reported no marketing version
  MissingMarketingVersion,

  /// agvtool reported no build number
  MissingBuildNumber,
}

impl BuildError {
  fn help_message(&self) -> Option<String> {
    match self {
      BuildError::MissingMarketingVersion => {
        Some("Set one with: agvtool new-marketing-version <version>".to_string())
      }
      BuildError::MissingBuildNumber => {
        Some("Set one with: agvtool new-version -all <number>".to_string())
      }
      _ => None,
    }
  }
}

impl fmt::Display for BuildError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      BuildError::CommandFailed { configuration, log_tail } => {
        write!(f, "Build failed for configuration '{}':\n{}", configuration, log_tail)
      }
      BuildError::ToolFailed { command, stderr } => {
        write!(f, "Toolchain command failed: {}\n{}", command, stderr)
      }
      BuildError::MissingMarketingVersion => {
        write!(f, "Project has no marketing version")
      }
      BuildError::MissingBuildNumber => {
        write!(f, "Project has no build number")
      }
    }
  }
}

/// Archiving and staging errors
#[derive(Debug)]
pub enum PackageError {
  /// Built application bundle not found where xcodebuild puts it
  MissingBundle { target: String, path: PathBuf },

  /// zip returned non-zero
  ArchiveFailed { archive: PathBuf, stderr: String },
}

impl PackageError {
  fn help_message(&self) -> Option<String> {
    match self {
      PackageError::MissingBundle { target, .. } => Some(format!(
        "Check that target '{}' produces an application bundle for this configuration.",
        target
      )),
      _ => None,
    }
  }
}

impl fmt::Display for PackageError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PackageError::MissingBundle { target, path } => {
        write!(f, "Built bundle for '{}' not found at {}", target, path.display())
      }
      PackageError::ArchiveFailed { archive, stderr } => {
        write!(f, "Failed to create archive {}:\n{}", archive.display(), stderr)
      }
    }
  }
}

/// Result type alias for xcship
pub type ShipResult<T> = Result<T, ShipError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> ShipResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> ShipResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<ShipError>,
{
  fn context(self, ctx: impl Into<String>) -> ShipResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> ShipResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &ShipError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
