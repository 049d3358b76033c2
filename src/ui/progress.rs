//! Progress indicators for the packaging loop
//!
//! Uses `linya` for allocation-free progress bars, one bar per
//! configuration spanning its targets.

use linya::{Bar, Progress};

/// Progress bar over the targets of one configuration
pub struct TargetProgress {
  progress: Progress,
  bar: Bar,
}

impl TargetProgress {
  /// Create a bar for `total` targets, labeled with the configuration
  pub fn new(total: usize, label: impl Into<String>) -> Self {
    let mut progress = Progress::new();
    let bar = progress.bar(total, label.into());
    Self { progress, bar }
  }

  /// One target packaged
  pub fn inc(&mut self) {
    self.progress.inc_and_draw(&self.bar, 1);
  }
}
