//! Console rendering of sizes and download progress.

use std::time::{Duration, Instant};
use winfetch_core::progress::DownloadProgress;

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;
const MIB: f64 = 1024.0 * 1024.0;
const PROGRESS_INTERVAL: Duration = Duration::from_millis(500);

/// Size in binary gigabytes with one decimal, e.g. `4.0 GiB`.
pub fn format_gib(bytes: u64) -> String {
    format!("{:.1} GiB", bytes as f64 / GIB)
}

/// One progress line; the total and ETA are omitted when the server sent no length.
pub fn progress_line(stats: &DownloadProgress) -> String {
    let done_mib = stats.bytes_done as f64 / MIB;
    let rate_mib = stats.bytes_per_sec() / MIB;
    match (stats.total_bytes, stats.fraction()) {
        (Some(total), Some(fraction)) => {
            let eta = stats
                .eta_secs()
                .map(|s| format!("{:.0}s", s))
                .unwrap_or_else(|| "?".to_string());
            format!(
                "  {:.1} / {:.1} MiB ({:.1}%)  {:.2} MiB/s  ETA {}",
                done_mib,
                total as f64 / MIB,
                fraction * 100.0,
                rate_mib,
                eta
            )
        }
        _ => format!("  {:.1} MiB  {:.2} MiB/s", done_mib, rate_mib),
    }
}

/// Prints progress at most every 500ms, plus once when the total is reached.
#[derive(Debug, Default)]
pub struct ProgressPrinter {
    last_print: Option<Instant>,
    printed: bool,
}

impl ProgressPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, stats: &DownloadProgress) {
        let now = Instant::now();
        let complete = stats.total_bytes.is_some_and(|t| stats.bytes_done >= t);
        let due = self
            .last_print
            .is_none_or(|last| now.duration_since(last) >= PROGRESS_INTERVAL);
        if due || complete {
            eprint!("\r{}  ", progress_line(stats));
            self.last_print = Some(now);
            self.printed = true;
        }
    }

    /// Ends the progress line, if one was started.
    pub fn finish(&mut self) {
        if self.printed {
            eprintln!();
            self.printed = false;
        }
    }
}
