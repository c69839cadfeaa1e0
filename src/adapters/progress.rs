use crate::ports::ProgressPort;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

pub struct ProgressBarAdapter {
    bar: Arc<ProgressBar>,
    quiet: bool,
}

impl ProgressBarAdapter {
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .template("[{elapsed_precise}] {spinner:.cyan} {pos:>7} files hashed {msg}")
        {
            bar.set_style(style);
        }
        Self {
            bar: Arc::new(bar),
            quiet: false,
        }
    }

    pub fn new_quiet() -> Self {
        Self {
            bar: Arc::new(ProgressBar::hidden()),
            quiet: true,
        }
    }

    /// Shared handle so output adapters can print without tearing the spinner.
    pub fn bar(&self) -> Arc<ProgressBar> {
        Arc::clone(&self.bar)
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        if quiet {
            self.bar = Arc::new(ProgressBar::hidden());
        }
        self
    }
}

impl Default for ProgressBarAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressPort for ProgressBarAdapter {
    fn start(&self, target: &Path) {
        if self.quiet {
            return;
        }

        self.bar.reset();
        self.bar.set_message(format!("in {}", target.display()));
        self.bar.enable_steady_tick(Duration::from_millis(100));
    }

    fn update(&self, processed: u64) {
        if self.quiet {
            return;
        }

        self.bar.set_position(processed);
    }

    fn finish(&self) {
        if self.quiet {
            return;
        }

        self.bar.disable_steady_tick();
        self.bar.finish_and_clear();
    }
}
