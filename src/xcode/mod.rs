//! Xcode toolchain integration
//!
//! - **project**: project introspection via `xcodebuild -list`
//! - **build**: clean-and-build per configuration, captured log
//! - **version**: marketing version and build number via agvtool

pub mod build;
pub mod project;
pub mod version;
