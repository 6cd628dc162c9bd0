//! # eb-db-sqlite Implementation
//!
//! This module implements the data mapping between the SQLite `posts` table
//! and the `eb-core` domain models. The table is append-only.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eb_core::models::{DeviceClass, NewPost, Post};
use eb_core::traits::PostRepo;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;

const CREATE_POSTS: &str = "CREATE TABLE IF NOT EXISTS posts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    message TEXT NOT NULL,
    device TEXT NOT NULL,
    country TEXT NOT NULL,
    user_id TEXT NOT NULL,
    time TEXT NOT NULL,
    is_foreign INTEGER NOT NULL DEFAULT 0,
    created_at TEXT
)";

pub struct SqlitePostRepo {
    pool: SqlitePool,
}

impl SqlitePostRepo {
    /// Opens (or creates) the database at `url` and makes sure the schema exists.
    ///
    /// In-memory URLs get a single pinned connection, otherwise every pooled
    /// connection would see its own empty database.
    pub async fn new(url: &str) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        let pool = if url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(5)
                .connect_with(options)
                .await?
        };

        let repo = Self { pool };
        repo.ensure_schema().await?;
        Ok(repo)
    }

    /// Wraps an existing pool. The caller is responsible for `ensure_schema`.
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Tables created before `created_at` existed get the column added in place.
    async fn ensure_created_at_column(&self) -> anyhow::Result<()> {
        let columns = sqlx::query("PRAGMA table_info(posts)")
            .fetch_all(&self.pool)
            .await?;

        let has_created_at = columns
            .iter()
            .any(|c| c.try_get::<String, _>("name").is_ok_and(|n| n == "created_at"));

        if !has_created_at {
            log::info!("adding created_at column to legacy posts table");
            sqlx::query("ALTER TABLE posts ADD COLUMN created_at TEXT")
                .execute(&self.pool)
                .await?;
        }
        Ok(())
    }
}

fn row_to_post(row: &SqliteRow) -> Result<Post, sqlx::Error> {
    Ok(Post {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        message: row.try_get("message")?,
        device: DeviceClass::from_label(&row.try_get::<String, _>("device")?),
        country: row.try_get("country")?,
        user_id: row.try_get("user_id")?,
        time: row.try_get("time")?,
        is_foreign: row.try_get("is_foreign")?,
        created_at: row.try_get::<Option<DateTime<Utc>>, _>("created_at")?,
    })
}

#[async_trait]
impl PostRepo for SqlitePostRepo {
    async fn ensure_schema(&self) -> anyhow::Result<()> {
        sqlx::query(CREATE_POSTS).execute(&self.pool).await?;
        self.ensure_created_at_column().await
    }

    async fn insert_post(&self, post: NewPost) -> anyhow::Result<i64> {
        let result = sqlx::query(
            "INSERT INTO posts (name, message, device, country, user_id, time, is_foreign, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(post.name)
        .bind(post.message)
        .bind(post.device.as_str())
        .bind(post.country)
        .bind(post.user_id)
        .bind(post.time)
        .bind(post.is_foreign)
        .bind(post.created_at)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    async fn list_recent(&self, limit: i64) -> anyhow::Result<Vec<Post>> {
        let rows = sqlx::query(
            "SELECT id, name, message, device, country, user_id, time, is_foreign, created_at FROM posts ORDER BY id DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        let posts = rows.iter().map(row_to_post).collect::<Result<Vec<_>, _>>()?;
        Ok(posts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn new_post(message: &str) -> NewPost {
        NewPost {
            name: "Anonymous".into(),
            message: message.into(),
            device: DeviceClass::IPhone,
            country: "JP".into(),
            user_id: "deadbeef".into(),
            time: "03/11 14:46".into(),
            is_foreign: false,
            created_at: Utc.with_ymd_and_hms(2024, 3, 11, 5, 46, 0).unwrap(),
        }
    }

    async fn repo() -> SqlitePostRepo {
        SqlitePostRepo::new("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_ensure_schema_is_idempotent() {
        let repo = repo().await;
        repo.ensure_schema().await.unwrap();
        repo.ensure_schema().await.unwrap();
        assert!(repo.list_recent(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids() {
        let repo = repo().await;
        let first = repo.insert_post(new_post("a")).await.unwrap();
        let second = repo.insert_post(new_post("b")).await.unwrap();
        assert!(second > first);
    }

    #[tokio::test]
    async fn test_list_recent_returns_newest_first_and_caps() {
        let repo = repo().await;
        for i in 0..60 {
            repo.insert_post(new_post(&format!("msg {i}"))).await.unwrap();
        }

        let posts = repo.list_recent(50).await.unwrap();
        assert_eq!(posts.len(), 50);
        assert_eq!(posts[0].message, "msg 59");
        assert_eq!(posts[49].message, "msg 10");
        assert!(posts.windows(2).all(|w| w[0].id > w[1].id));
    }

    #[tokio::test]
    async fn test_round_trip_keeps_fields() {
        let repo = repo().await;
        let mut post = new_post("避難所に到着しました");
        post.device = DeviceClass::Mac;
        post.country = "US".into();
        post.is_foreign = true;

        let id = repo.insert_post(post.clone()).await.unwrap();
        let stored = repo.list_recent(1).await.unwrap().remove(0);

        assert_eq!(stored, Post::from_new(id, post));
    }

    #[tokio::test]
    async fn test_legacy_table_gains_created_at() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::query(
            "CREATE TABLE posts (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT, message TEXT,
             device TEXT, country TEXT, user_id TEXT, time TEXT, is_foreign INTEGER)",
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query("INSERT INTO posts (name, message, device, country, user_id, time, is_foreign) VALUES ('old', 'hi', 'Linux', '??', 'cafebabe', '01/02 03:04', 0)")
            .execute(&pool)
            .await
            .unwrap();

        let repo = SqlitePostRepo::from_pool(pool);
        repo.ensure_schema().await.unwrap();

        let posts = repo.list_recent(50).await.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].device, DeviceClass::Linux);
        assert_eq!(posts[0].created_at, None);
    }
}
