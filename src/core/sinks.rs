//! Contracts of the collaborators the callback reports to.

use std::fmt;

/// Presents system-level download notifications. Calls are fire-and-forget.
pub trait DownloadNotifier: Send + Sync {
    fn show_in_progress(&self);
    fn show_finished(&self, file_name: &str, uri: &str, mime_type: Option<&str>);
    fn show_failed(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DownloadsPixelName {
    DownloadRequestStarted,
    DownloadRequestSucceeded,
    DownloadRequestFailed,
    DownloadRequestCancelled,
}

impl DownloadsPixelName {
    pub fn pixel_name(self) -> &'static str {
        match self {
            DownloadsPixelName::DownloadRequestStarted => "m_download_request_started",
            DownloadsPixelName::DownloadRequestSucceeded => "m_download_request_succeeded",
            DownloadsPixelName::DownloadRequestFailed => "m_download_request_failed",
            DownloadsPixelName::DownloadRequestCancelled => "m_download_request_cancelled",
        }
    }
}

impl fmt::Display for DownloadsPixelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.pixel_name())
    }
}

/// Telemetry sink for named events.
pub trait Pixel: Send + Sync {
    fn fire(&self, name: DownloadsPixelName);
}
