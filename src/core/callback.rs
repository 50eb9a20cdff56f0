//! Receives lifecycle signals from the download engine.
//!
//! Each entry point returns right away. Store access, queue publishing and
//! most sink calls run as one background unit on the [`Dispatcher`]; units for
//! the same download are not ordered against each other, so a stale read ends
//! as a silent no-op rather than an error.

use crate::core::dispatcher::Dispatcher;
use crate::core::events::{DownloadCommand, MessageId};
use crate::core::model::{DownloadFailReason, DownloadId, DownloadItem, DownloadKey, DownloadStatus, FinishedFile};
use crate::core::queue::{command_queue, CommandReceiver, CommandSender};
use crate::core::sinks::{DownloadNotifier, DownloadsPixelName, Pixel};
use crate::core::store::DownloadsRepository;
use futures::stream::{BoxStream, StreamExt};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

pub trait DownloadCallback: Send + Sync {
    fn on_start(&self, item: DownloadItem);
    fn on_success(&self, download_id: DownloadId, content_length: i64);
    fn on_success_file(&self, file: FinishedFile, mime_type: Option<String>);
    fn on_error(&self, download_id: DownloadId);
    fn on_fail_or_cancel(&self, download_id: DownloadId, reason: DownloadFailReason);
    fn on_failure(&self, url: Option<String>, reason: DownloadFailReason);
    fn commands(&self) -> BoxStream<'static, DownloadCommand>;
}

/// How a fail-or-cancel signal is read. The engine sends the same signal for
/// both; a record that is gone means the user already cancelled from the app.
#[derive(Debug, PartialEq, Eq)]
pub enum FailOrCancel {
    Cancelled,
    Failed(DownloadItem),
}

impl FailOrCancel {
    // Known race: a failure that lands before the start insert commits reads as a cancel.
    pub fn classify(record: Option<DownloadItem>) -> Self {
        match record {
            None => FailOrCancel::Cancelled,
            Some(item) => FailOrCancel::Failed(item),
        }
    }
}

#[derive(Clone)]
pub struct FileDownloadCallback {
    notifier: Arc<dyn DownloadNotifier>,
    repository: Arc<dyn DownloadsRepository>,
    pixel: Arc<dyn Pixel>,
    dispatcher: Dispatcher,
    command_tx: CommandSender,
    command_rx: CommandReceiver,
}

impl FileDownloadCallback {
    pub fn new(
        notifier: Arc<dyn DownloadNotifier>,
        repository: Arc<dyn DownloadsRepository>,
        pixel: Arc<dyn Pixel>,
        dispatcher: Dispatcher,
    ) -> Self {
        let (command_tx, command_rx) = command_queue();
        Self { notifier, repository, pixel, dispatcher, command_tx, command_rx }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Takes the buffered command without waiting, if there is one.
    pub fn try_next_command(&self) -> Option<DownloadCommand> {
        self.command_rx.try_recv()
    }

    /// Pixel, message mapping and optional notification shared by both failure paths.
    fn failed_download_command(&self, show_notification: bool, reason: DownloadFailReason) -> DownloadCommand {
        self.pixel.fire(DownloadsPixelName::DownloadRequestFailed);
        let cmd = DownloadCommand::failed(reason, show_notification);
        if show_notification {
            self.notifier.show_failed();
        }
        cmd
    }
}

impl DownloadCallback for FileDownloadCallback {
    fn on_start(&self, item: DownloadItem) {
        debug!(download_id = item.download_id, file = %item.file_name, "download started");
        self.pixel.fire(DownloadsPixelName::DownloadRequestStarted);

        // Without an engine id the engine's own notification cannot be relied on.
        let cmd = DownloadCommand::ShowDownloadStartedMessage {
            message_id: MessageId::DownloadStarted,
            show_notification: !item.has_assigned_id(),
            file_name: item.file_name.clone(),
        };
        if cmd.show_notification() {
            self.notifier.show_in_progress();
        }

        let tx = self.command_tx.clone();
        let repository = self.repository.clone();
        self.dispatcher.spawn(async move {
            tx.publish(cmd);
            if let Err(e) = repository.insert(&item).await {
                warn!(download_id = item.download_id, "could not record started download: {:#}", e);
            }
        });
    }

    fn on_success(&self, download_id: DownloadId, content_length: i64) {
        debug!(download_id, "download succeeded");
        self.pixel.fire(DownloadsPixelName::DownloadRequestSucceeded);

        let tx = self.command_tx.clone();
        let repository = self.repository.clone();
        self.dispatcher.spawn(async move {
            if let Err(e) = repository
                .update(DownloadKey::ById(download_id), DownloadStatus::Finished, Some(content_length))
                .await
            {
                warn!(download_id, "could not mark download finished: {:#}", e);
            }

            match repository.get_download_item(download_id).await {
                Ok(Some(item)) => tx.publish(DownloadCommand::ShowDownloadSuccessMessage {
                    message_id: MessageId::DownloadFinished,
                    show_notification: false,
                    file_name: item.file_name,
                    file_path: item.file_path,
                    mime_type: None,
                }),
                // removed by a cancel or error that raced this completion
                Ok(None) => debug!(download_id, "no record for finished download"),
                Err(e) => warn!(download_id, "could not load finished download: {:#}", e),
            }
        });
    }

    fn on_success_file(&self, file: FinishedFile, mime_type: Option<String>) {
        let file_name = file.file_name();
        let file_path = file.path().to_string_lossy().to_string();
        debug!(file = %file_name, "download succeeded");
        self.pixel.fire(DownloadsPixelName::DownloadRequestSucceeded);
        self.notifier
            .show_finished(&file_name, &file_uri(file.path()), mime_type.as_deref());

        let tx = self.command_tx.clone();
        let repository = self.repository.clone();
        self.dispatcher.spawn(async move {
            if let Err(e) = repository
                .update(
                    DownloadKey::ByFileName(file_name.clone()),
                    DownloadStatus::Finished,
                    Some(file.content_length),
                )
                .await
            {
                warn!(file = %file_name, "could not mark download finished: {:#}", e);
            }
            tx.publish(DownloadCommand::ShowDownloadSuccessMessage {
                message_id: MessageId::DownloadFinished,
                show_notification: true,
                file_name,
                file_path,
                mime_type,
            });
        });
    }

    fn on_error(&self, download_id: DownloadId) {
        // The engine completed without recording success or failure. Counted as a failure, no message.
        debug!(download_id, "download error");
        self.pixel.fire(DownloadsPixelName::DownloadRequestFailed);

        let repository = self.repository.clone();
        self.dispatcher.spawn(async move {
            if let Err(e) = repository.delete(&[download_id]).await {
                warn!(download_id, "could not clear errored download: {:#}", e);
            }
        });
    }

    fn on_fail_or_cancel(&self, download_id: DownloadId, reason: DownloadFailReason) {
        let this = self.clone();
        self.dispatcher.spawn(async move {
            let record = match this.repository.get_download_item(download_id).await {
                Ok(record) => record,
                Err(e) => {
                    warn!(download_id, "could not load download: {:#}", e);
                    None
                }
            };

            match FailOrCancel::classify(record) {
                FailOrCancel::Cancelled => {
                    debug!(download_id, "download cancelled");
                    this.pixel.fire(DownloadsPixelName::DownloadRequestCancelled);
                }
                FailOrCancel::Failed(item) => {
                    debug!(download_id, file = %item.file_name, %reason, "download failed");
                    if let Err(e) = this.repository.delete(&[download_id]).await {
                        warn!(download_id, "could not clear failed download: {:#}", e);
                    }
                    // the engine notifies for id-based failures itself
                    let cmd = this.failed_download_command(false, reason);
                    this.command_tx.publish(cmd);
                }
            }
        });
    }

    fn on_failure(&self, url: Option<String>, reason: DownloadFailReason) {
        debug!(url = url.as_deref().unwrap_or("-"), %reason, "download failed");
        let cmd = self.failed_download_command(true, reason);

        let tx = self.command_tx.clone();
        self.dispatcher.spawn(async move {
            tx.publish(cmd);
        });
    }

    fn commands(&self) -> BoxStream<'static, DownloadCommand> {
        self.command_rx.stream().boxed()
    }
}

fn file_uri(path: &Path) -> String {
    url::Url::from_file_path(path)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| path.to_string_lossy().to_string())
}
