//! Release packaging engine
//!
//! - **version**: version string and tag composition
//! - **package**: per-target staging, archiving, and symlink publishing
//! - **orchestrator**: the end-to-end run driver

pub mod orchestrator;
pub mod package;
pub mod version;
