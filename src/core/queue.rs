//! Single-slot command queue between the callback and the UI.
//!
//! Publishing never waits: a command that has not been read yet is evicted by
//! the next one. Messages are transient toasts, so the newest one wins.

use crate::core::events::DownloadCommand;
use futures::stream::{self, Stream};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::Notify;

struct Slot {
    buffered: Mutex<Option<DownloadCommand>>,
    ready: Notify,
}

impl Slot {
    fn lock(&self) -> MutexGuard<'_, Option<DownloadCommand>> {
        // The slot holds plain data; a panic elsewhere cannot leave it half-written.
        self.buffered.lock().unwrap_or_else(|e| e.into_inner())
    }
}

pub fn command_queue() -> (CommandSender, CommandReceiver) {
    let slot = Arc::new(Slot { buffered: Mutex::new(None), ready: Notify::new() });
    (CommandSender { slot: slot.clone() }, CommandReceiver { slot })
}

#[derive(Clone)]
pub struct CommandSender {
    slot: Arc<Slot>,
}

impl CommandSender {
    /// Buffers `command`, replacing whatever was still unread.
    pub fn publish(&self, command: DownloadCommand) {
        let evicted = self.slot.lock().replace(command);
        if let Some(old) = evicted {
            tracing::debug!(?old, "command queue full, dropped oldest command");
        }
        self.slot.ready.notify_one();
    }
}

#[derive(Clone)]
pub struct CommandReceiver {
    slot: Arc<Slot>,
}

impl CommandReceiver {
    pub async fn recv(&self) -> DownloadCommand {
        loop {
            if let Some(cmd) = self.try_recv() {
                return cmd;
            }
            self.slot.ready.notified().await;
        }
    }

    pub fn try_recv(&self) -> Option<DownloadCommand> {
        self.slot.lock().take()
    }

    pub fn len(&self) -> usize {
        usize::from(self.slot.lock().is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Infinite stream of commands. Every clone reads from the same slot.
    pub fn stream(&self) -> impl Stream<Item = DownloadCommand> + Send + 'static {
        self.clone().into_stream()
    }

    pub fn into_stream(self) -> impl Stream<Item = DownloadCommand> + Send + 'static {
        stream::unfold(self, |rx| async move {
            let cmd = rx.recv().await;
            Some((cmd, rx))
        })
    }
}
