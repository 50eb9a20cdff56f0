//! Download lifecycle callback: turns raw signals from a download engine into
//! persisted records, telemetry, notifications and at most one UI command per event.

pub mod core;
pub mod i18n;
pub mod plugins;

pub use crate::core::callback::{DownloadCallback, FileDownloadCallback};
pub use crate::core::dispatcher::Dispatcher;
pub use crate::core::events::{DownloadCommand, MessageId};
pub use crate::core::model::{DownloadFailReason, DownloadItem, DownloadStatus, FinishedFile};
