use crate::core::model::{DownloadId, DownloadItem, DownloadKey, DownloadStatus};
use anyhow::Context;
use async_trait::async_trait;
use sqlx::sqlite::{SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::path::Path;

/// Durable record of downloads. Every operation is atomic per key and safe to
/// call concurrently.
#[async_trait]
pub trait DownloadsRepository: Send + Sync {
    /// Inserts `item` unless a record with the same assigned id already exists.
    async fn insert(&self, item: &DownloadItem) -> anyhow::Result<()>;

    /// Moves a `Started` record to `status`; returns the number of records changed.
    async fn update(
        &self,
        key: DownloadKey,
        status: DownloadStatus,
        content_length: Option<i64>,
    ) -> anyhow::Result<u64>;

    async fn delete(&self, download_ids: &[DownloadId]) -> anyhow::Result<u64>;

    async fn delete_all(&self) -> anyhow::Result<u64>;

    async fn get_download_item(&self, download_id: DownloadId) -> anyhow::Result<Option<DownloadItem>>;

    /// All records, newest first.
    async fn get_downloads(&self) -> anyhow::Result<Vec<DownloadItem>>;
}

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn open(db_path: &Path) -> anyhow::Result<Self> {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await
                .with_context(|| format!("create_dir_all {}", parent.display()))?;
        }

        let abs = if db_path.is_absolute() {
            db_path.to_path_buf()
        } else {
            std::env::current_dir()
                .with_context(|| "current_dir")?
                .join(db_path)
        };

        let mut p = abs.to_string_lossy().to_string();
        if cfg!(windows) {
            p = p.replace('\\', "/");
        }

        // mode=rwc creates the file when missing
        let url = if p.starts_with('/') {
            format!("sqlite://{}?mode=rwc", p)
        } else {
            format!("sqlite:///{}?mode=rwc", p)
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&url)
            .await
            .with_context(|| format!("connect sqlite url={} (file={})", url, abs.display()))?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// A private in-memory database. One connection, kept for the life of the pool.
    pub async fn open_in_memory() -> anyhow::Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .context("connect in-memory sqlite")?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS downloads (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              download_id INTEGER NOT NULL,
              download_status INTEGER NOT NULL, -- 0 Started,1 Finished,2 Failed
              file_name TEXT NOT NULL,
              file_path TEXT NOT NULL,
              url TEXT NULL,
              mime_type TEXT NULL,
              content_length INTEGER NOT NULL DEFAULT 0,
              created_at INTEGER NOT NULL
            );
            "#,
        )
            .execute(&self.pool)
            .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_downloads_download_id
            ON downloads(download_id);
            "#,
        )
            .execute(&self.pool)
            .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_downloads_file_name
            ON downloads(file_name);
            "#,
        )
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    fn now_epoch() -> i64 {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }

    fn row_to_item(r: &SqliteRow) -> DownloadItem {
        DownloadItem {
            download_id: r.get::<i64, _>("download_id"),
            download_status: int_to_status(r.get::<i64, _>("download_status")),
            file_name: r.get::<String, _>("file_name"),
            file_path: r.get::<String, _>("file_path"),
            url: r.try_get::<Option<String>, _>("url").ok().flatten(),
            mime_type: r.try_get::<Option<String>, _>("mime_type").ok().flatten(),
            content_length: r.get::<i64, _>("content_length"),
            created_at: r.get::<i64, _>("created_at"),
        }
    }
}

#[async_trait]
impl DownloadsRepository for SqliteStore {
    async fn insert(&self, item: &DownloadItem) -> anyhow::Result<()> {
        // Id 0 is the unassigned sentinel, so several such rows may coexist.
        sqlx::query(
            r#"
            INSERT INTO downloads
              (download_id, download_status, file_name, file_path, url, mime_type, content_length, created_at)
            SELECT ?, ?, ?, ?, ?, ?, ?, ?
            WHERE ? = 0 OR NOT EXISTS (SELECT 1 FROM downloads WHERE download_id = ?);
            "#,
        )
            .bind(item.download_id)
            .bind(status_to_int(item.download_status))
            .bind(&item.file_name)
            .bind(&item.file_path)
            .bind(&item.url)
            .bind(&item.mime_type)
            .bind(item.content_length)
            .bind(Self::now_epoch())
            .bind(item.download_id)
            .bind(item.download_id)
            .execute(&self.pool)
            .await
            .with_context(|| format!("insert download id={} file={}", item.download_id, item.file_name))?;
        Ok(())
    }

    async fn update(
        &self,
        key: DownloadKey,
        status: DownloadStatus,
        content_length: Option<i64>,
    ) -> anyhow::Result<u64> {
        let column = match &key {
            DownloadKey::ById(_) => "download_id",
            DownloadKey::ByFileName(_) => "file_name",
        };
        let sql = format!(
            r#"
            UPDATE downloads
            SET download_status = ?,
                content_length = COALESCE(?, content_length)
            WHERE {column} = ?
              AND (download_status = ? OR download_status = ?);
            "#
        );

        let q = sqlx::query(&sql)
            .bind(status_to_int(status))
            .bind(content_length);
        let q = match &key {
            DownloadKey::ById(id) => q.bind(*id),
            DownloadKey::ByFileName(name) => q.bind(name.clone()),
        };
        let res = q
            .bind(status_to_int(DownloadStatus::Started))
            .bind(status_to_int(status))
            .execute(&self.pool)
            .await
            .with_context(|| format!("update download {:?}", key))?;
        Ok(res.rows_affected())
    }

    async fn delete(&self, download_ids: &[DownloadId]) -> anyhow::Result<u64> {
        let mut tx = self.pool.begin().await?;
        let mut deleted = 0;
        for id in download_ids {
            let res = sqlx::query(r#"DELETE FROM downloads WHERE download_id = ?"#)
                .bind(*id)
                .execute(&mut *tx)
                .await
                .with_context(|| format!("delete download id={}", id))?;
            deleted += res.rows_affected();
        }
        tx.commit().await?;
        Ok(deleted)
    }

    async fn delete_all(&self) -> anyhow::Result<u64> {
        let res = sqlx::query(r#"DELETE FROM downloads"#)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected())
    }

    async fn get_download_item(&self, download_id: DownloadId) -> anyhow::Result<Option<DownloadItem>> {
        let row = sqlx::query(
            r#"
            SELECT download_id, download_status, file_name, file_path, url, mime_type, content_length, created_at
            FROM downloads
            WHERE download_id = ?
            ORDER BY id DESC
            LIMIT 1;
            "#,
        )
            .bind(download_id)
            .fetch_optional(&self.pool)
            .await
            .context("fetch download")?;

        Ok(row.as_ref().map(Self::row_to_item))
    }

    async fn get_downloads(&self) -> anyhow::Result<Vec<DownloadItem>> {
        let rows = sqlx::query(
            r#"
            SELECT download_id, download_status, file_name, file_path, url, mime_type, content_length, created_at
            FROM downloads
            ORDER BY created_at DESC, id DESC;
            "#,
        )
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(Self::row_to_item).collect())
    }
}

fn status_to_int(s: DownloadStatus) -> i64 {
    match s {
        DownloadStatus::Started => 0,
        DownloadStatus::Finished => 1,
        DownloadStatus::Failed => 2,
    }
}

fn int_to_status(v: i64) -> DownloadStatus {
    match v {
        1 => DownloadStatus::Finished,
        2 => DownloadStatus::Failed,
        _ => DownloadStatus::Started,
    }
}
