use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Engine-assigned download identifier. `0` means the engine has not assigned one yet.
pub type DownloadId = i64;

pub const UNASSIGNED_DOWNLOAD_ID: DownloadId = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadStatus {
    Started,
    Finished,
    Failed,
}

impl DownloadStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, DownloadStatus::Started)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadItem {
    pub download_id: DownloadId,
    pub download_status: DownloadStatus,
    pub file_name: String,
    pub file_path: String,
    pub url: Option<String>,
    pub mime_type: Option<String>,
    pub content_length: i64,
    pub created_at: i64,
}

impl DownloadItem {
    /// A freshly started download, as reported by the engine's start signal.
    pub fn started(
        download_id: DownloadId,
        file_name: impl Into<String>,
        file_path: impl Into<String>,
    ) -> Self {
        Self {
            download_id,
            download_status: DownloadStatus::Started,
            file_name: file_name.into(),
            file_path: file_path.into(),
            url: None,
            mime_type: None,
            content_length: 0,
            created_at: 0,
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn has_assigned_id(&self) -> bool {
        self.download_id != UNASSIGNED_DOWNLOAD_ID
    }
}

/// Which record an update targets: the engine id, or the file name for id-less downloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadKey {
    ById(DownloadId),
    ByFileName(String),
}

/// A completed file handed over by the path-based success signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinishedFile {
    pub path: PathBuf,
    pub content_length: i64,
}

impl FinishedFile {
    pub fn new(path: impl Into<PathBuf>, content_length: i64) -> Self {
        Self { path: path.into(), content_length }
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.to_string_lossy().to_string())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DownloadFailReason {
    ConnectionRefused,
    DownloadManagerDisabled,
    UnsupportedUrlType,
    DataUriParseException,
    Other,
}

impl DownloadFailReason {
    pub const ALL: [DownloadFailReason; 5] = [
        DownloadFailReason::ConnectionRefused,
        DownloadFailReason::DownloadManagerDisabled,
        DownloadFailReason::UnsupportedUrlType,
        DownloadFailReason::DataUriParseException,
        DownloadFailReason::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DownloadFailReason::ConnectionRefused => "ConnectionRefused",
            DownloadFailReason::DownloadManagerDisabled => "DownloadManagerDisabled",
            DownloadFailReason::UnsupportedUrlType => "UnsupportedUrlType",
            DownloadFailReason::DataUriParseException => "DataUriParseException",
            DownloadFailReason::Other => "Other",
        }
    }
}

impl fmt::Display for DownloadFailReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("unknown download fail reason: {0}")]
pub struct ParseReasonError(pub String);

impl FromStr for DownloadFailReason {
    type Err = ParseReasonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DownloadFailReason::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseReasonError(s.to_string()))
    }
}
