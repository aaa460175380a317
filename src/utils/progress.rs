//! Progress bar abstraction that becomes no-op when the `progress` feature is disabled

#[cfg(feature = "progress")]
pub use indicatif::{ProgressBar, ProgressStyle};

#[cfg(not(feature = "progress"))]
pub use self::noop::*;

/// Bar over `total` ranks, or `None` when progress output is off
pub fn rank_progress(total: u64, show: bool) -> Option<ProgressBar> {
    if !show {
        return None;
    }

    let pb = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ranks {msg}")
    {
        pb.set_style(style.progress_chars("█▓▒░  "));
    }
    pb.set_message("Concatenating...");
    Some(pb)
}

#[cfg(not(feature = "progress"))]
mod noop {
    /// No-op progress bar when `progress` feature is disabled
    #[derive(Clone)]
    pub struct ProgressBar;

    impl ProgressBar {
        pub fn new(_len: u64) -> Self {
            ProgressBar
        }

        pub fn set_style(&self, _style: ProgressStyle) {}
        pub fn set_message(&self, _msg: impl Into<std::borrow::Cow<'static, str>>) {}
        pub fn inc(&self, _delta: u64) {}
        pub fn finish_with_message(&self, _msg: impl Into<std::borrow::Cow<'static, str>>) {}
    }

    /// No-op progress style
    pub struct ProgressStyle;

    impl ProgressStyle {
        pub fn default_bar() -> Self {
            ProgressStyle
        }

        pub fn template(self, _template: &str) -> Result<Self, std::convert::Infallible> {
            Ok(self)
        }

        pub fn progress_chars(self, _chars: &str) -> Self {
            self
        }
    }
}
