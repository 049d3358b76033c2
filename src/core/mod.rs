//! Core building blocks for xcship
//!
//! - **config**: ship.toml parsing (shared trees, output root, artwork)
//! - **context**: unified project context built once in main
//! - **error**: categorized error types with exit codes and help messages
//! - **vcs**: version-control abstraction (SystemGit, SystemSvn)

pub mod config;
pub mod context;
pub mod error;
pub mod vcs;
