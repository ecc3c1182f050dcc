use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::{Mutex, PoisonError};

const UNITS: [&str; 6] = ["bytes", "KB", "MB", "GB", "TB", "PB"];

/// Scale a byte count into the largest 1024-based unit that keeps it >= 1.
pub fn format_bytes(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", value, UNITS[unit])
}

/// Receives progress for the file currently being downloaded.
///
/// Called from inside the copy loop, so implementations must return quickly.
pub trait ProgressSink: Send + Sync {
    fn update(&self, file_name: &str, transferred: u64);

    fn finish(&self, _file_name: &str, _transferred: u64) {}
}

/// Discards all progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentProgress;

impl ProgressSink for SilentProgress {
    fn update(&self, _file_name: &str, _transferred: u64) {}
}

const STATUS_TEMPLATE: &str = "{msg}";

/// Shows one status line per file on stderr, rewritten in place as bytes arrive.
pub struct TerminalProgress {
    style: ProgressStyle,
    bar: Mutex<Option<ProgressBar>>,
}

impl TerminalProgress {
    pub fn new() -> Self {
        let style = ProgressStyle::with_template(STATUS_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        Self {
            style,
            bar: Mutex::new(None),
        }
    }

    fn status(file_name: &str, transferred: u64) -> String {
        format!("{}: {} complete", file_name, format_bytes(transferred))
    }
}

impl Default for TerminalProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TerminalProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalProgress").finish_non_exhaustive()
    }
}

impl ProgressSink for TerminalProgress {
    fn update(&self, file_name: &str, transferred: u64) {
        let mut bar = self.bar.lock().unwrap_or_else(PoisonError::into_inner);
        let bar = bar.get_or_insert_with(|| {
            ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr())
                .with_style(self.style.clone())
        });
        bar.set_message(Self::status(file_name, transferred));
    }

    fn finish(&self, file_name: &str, transferred: u64) {
        let bar = self
            .bar
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .unwrap_or_else(|| {
                ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr())
                    .with_style(self.style.clone())
            });
        // The finished line stays; the next file gets a new bar.
        bar.finish_with_message(Self::status(file_name, transferred));
    }
}

/// Cumulative byte count for one in-flight download.
pub struct ProgressCounter<'a> {
    file_name: &'a str,
    transferred: u64,
    sink: &'a dyn ProgressSink,
}

impl<'a> ProgressCounter<'a> {
    pub fn new(file_name: &'a str, sink: &'a dyn ProgressSink) -> Self {
        Self {
            file_name,
            transferred: 0,
            sink,
        }
    }

    pub fn add(&mut self, bytes: usize) {
        self.transferred += bytes as u64;
        self.sink.update(self.file_name, self.transferred);
    }

    pub fn transferred(&self) -> u64 {
        self.transferred
    }

    pub fn finish(self) -> u64 {
        self.sink.finish(self.file_name, self.transferred);
        self.transferred
    }
}
