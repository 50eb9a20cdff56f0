use crate::core::sinks::{DownloadNotifier, DownloadsPixelName, Pixel};
use tracing::info;

/// Notification sink for headless runs: every notification becomes a log line.
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl DownloadNotifier for LogNotifier {
    fn show_in_progress(&self) {
        info!(target: "notification", "download in progress");
    }

    fn show_finished(&self, file_name: &str, uri: &str, mime_type: Option<&str>) {
        info!(target: "notification", file_name, uri, mime_type = mime_type.unwrap_or("-"), "download finished");
    }

    fn show_failed(&self) {
        info!(target: "notification", "download failed");
    }
}

pub struct LogPixel;

impl LogPixel {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogPixel {
    fn default() -> Self {
        Self::new()
    }
}

impl Pixel for LogPixel {
    fn fire(&self, name: DownloadsPixelName) {
        info!(target: "pixel", pixel = name.pixel_name(), "pixel fired");
    }
}
