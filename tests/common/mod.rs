//! Shared test infrastructure: recording sinks and a callback wired to a
//! throwaway SQLite database.

#![allow(dead_code)]

use download_callback::core::callback::FileDownloadCallback;
use download_callback::core::dispatcher::Dispatcher;
use download_callback::core::sinks::{DownloadNotifier, DownloadsPixelName, Pixel};
use download_callback::core::store::SqliteStore;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    InProgress,
    Finished { file_name: String, uri: String, mime_type: Option<String> },
    Failed,
}

#[derive(Default)]
pub struct RecordingNotifier {
    shown: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn shown(&self) -> Vec<Notification> {
        self.shown.lock().unwrap().clone()
    }
}

impl DownloadNotifier for RecordingNotifier {
    fn show_in_progress(&self) {
        self.shown.lock().unwrap().push(Notification::InProgress);
    }

    fn show_finished(&self, file_name: &str, uri: &str, mime_type: Option<&str>) {
        self.shown.lock().unwrap().push(Notification::Finished {
            file_name: file_name.to_string(),
            uri: uri.to_string(),
            mime_type: mime_type.map(str::to_string),
        });
    }

    fn show_failed(&self) {
        self.shown.lock().unwrap().push(Notification::Failed);
    }
}

#[derive(Default)]
pub struct RecordingPixel {
    fired: Mutex<Vec<DownloadsPixelName>>,
}

impl RecordingPixel {
    pub fn fired(&self) -> Vec<DownloadsPixelName> {
        self.fired.lock().unwrap().clone()
    }

    pub fn count(&self, name: DownloadsPixelName) -> usize {
        self.fired().into_iter().filter(|n| *n == name).count()
    }
}

impl Pixel for RecordingPixel {
    fn fire(&self, name: DownloadsPixelName) {
        self.fired.lock().unwrap().push(name);
    }
}

pub struct Harness {
    pub callback: FileDownloadCallback,
    pub store: Arc<SqliteStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub pixel: Arc<RecordingPixel>,
    _dir: TempDir,
}

impl Harness {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let store = Arc::new(
            SqliteStore::open(&dir.path().join("downloads.sqlite"))
                .await
                .expect("open store"),
        );
        let notifier = Arc::new(RecordingNotifier::default());
        let pixel = Arc::new(RecordingPixel::default());
        let callback = FileDownloadCallback::new(
            notifier.clone(),
            store.clone(),
            pixel.clone(),
            Dispatcher::current(),
        );
        Self { callback, store, notifier, pixel, _dir: dir }
    }

    /// Waits for every background unit scheduled so far.
    pub async fn settle(&self) {
        self.callback.dispatcher().drain().await;
    }
}

pub async fn open_store() -> (TempDir, SqliteStore) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let store = SqliteStore::open(&dir.path().join("downloads.sqlite"))
        .await
        .expect("open store");
    (dir, store)
}
