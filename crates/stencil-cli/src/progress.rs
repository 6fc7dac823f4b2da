//! Terminal progress for generation runs.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use stencil_core::application::ports::ProgressReporter;

const TEMPLATE: &str = "{spinner:.cyan} [{pos}/{len}] {msg}";

/// [`ProgressReporter`] backed by an `indicatif` bar on stderr.
pub struct IndicatifProgress {
    bar: ProgressBar,
}

impl IndicatifProgress {
    /// Visible bar; hidden when `enabled` is false (quiet or piped output).
    pub fn new(enabled: bool) -> Self {
        let bar = if enabled {
            ProgressBar::new(0)
        } else {
            ProgressBar::hidden()
        };
        if let Ok(style) = ProgressStyle::with_template(TEMPLATE) {
            bar.set_style(style);
        }
        Self { bar }
    }
}

impl ProgressReporter for IndicatifProgress {
    fn begin(&self, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_position(0);
        self.bar.enable_steady_tick(Duration::from_millis(100));
    }

    fn step(&self, index: usize, label: &str) {
        self.bar.set_position(index.saturating_sub(1) as u64);
        self.bar.set_message(label.to_owned());
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
