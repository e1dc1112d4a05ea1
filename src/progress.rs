//! Progress bar display for bundle installations

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// Progress display for a batch of bundles
///
/// One bar counts bundles; a second, short-lived bar tracks the archive
/// currently being downloaded.
pub struct ProgressDisplay {
    multi: MultiProgress,
    /// Main progress bar for the batch
    bundle_pb: ProgressBar,
}

fn style(template: &str, chars: &str) -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars(chars)
}

impl ProgressDisplay {
    /// Create a new progress display with total bundle count
    pub fn new(total_bundles: u64) -> Self {
        let multi = MultiProgress::new();
        let bundle_pb = multi.add(ProgressBar::new(total_bundles));
        bundle_pb.set_style(style("[{bar:40.cyan/blue}] {pos}/{len} {msg}", "#>-"));

        Self { multi, bundle_pb }
    }

    /// Update to show the bundle currently being processed
    pub fn update_bundle(&self, bundle_name: &str, current: usize, total: usize) {
        self.bundle_pb
            .set_message(format!("({}/{}) {}", current, total, bundle_name));
    }

    /// Increment bundle progress
    pub fn inc_bundle(&self) {
        self.bundle_pb.inc(1);
    }

    /// Add a byte-level bar for one archive download
    ///
    /// The length is filled in by the fetcher once the size is known.
    pub fn start_download(&self, bundle_name: &str) -> ProgressBar {
        let pb = self.multi.add(ProgressBar::new(0));
        pb.set_style(style(
            "  [{bar:40.green/yellow}] {bytes}/{total_bytes} {msg}",
            "█▉▊▋▌▍▎▏  ",
        ));
        pb.set_message(bundle_name.to_string());
        pb
    }

    /// Remove a finished download bar
    pub fn finish_download(&self, pb: &ProgressBar) {
        pb.finish_and_clear();
        self.multi.remove(pb);
    }

    /// Finish the batch
    pub fn finish(&self) {
        self.bundle_pb.finish_and_clear();
    }

    /// Abandon on error
    pub fn abandon(&self) {
        self.bundle_pb.abandon();
    }
}
