use ferry_core::progress::ProgressSink;
use indicatif::{ProgressBar, ProgressStyle};
use parking_lot::Mutex;

/// Terminal progress bar. One bar per phase: bytes for the copy pass,
/// items for the verification pass.
pub struct BarProgress {
    bar: Mutex<Option<ProgressBar>>,
}

impl BarProgress {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn start(&self, total: u64, template: &str) {
        let bar = ProgressBar::new(total);
        bar.set_style(
            ProgressStyle::with_template(template)
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        *self.bar.lock() = Some(bar);
    }
}

impl Default for BarProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for BarProgress {
    fn begin_bytes(&self, total: u64) {
        self.start(
            total,
            "{bar:40.cyan/blue} {bytes}/{total_bytes} ({bytes_per_sec}, eta {eta})",
        );
    }

    fn begin_files(&self, total: u64) {
        self.start(total, "{bar:40.cyan/blue} {pos}/{len} files verified");
    }

    fn advance(&self, n: u64) {
        if let Some(bar) = self.bar.lock().as_ref() {
            bar.inc(n);
        }
    }

    fn finish(&self) {
        if let Some(bar) = self.bar.lock().take() {
            bar.finish_and_clear();
        }
    }
}
