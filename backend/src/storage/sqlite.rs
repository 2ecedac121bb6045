use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use super::traits::KeyValueStore;

/// Database file name inside the data directory
pub const DATABASE_FILE: &str = "nownext.db";

/// Key-value store backed by a single SQLite table
#[derive(Clone)]
pub struct SqliteKeyValueStore {
    pool: Arc<SqlitePool>,
}

impl SqliteKeyValueStore {
    /// Open (creating if needed) the database at `path`
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        Self::setup_schema(&pool).await?;
        info!("Opened key-value database at {}", path.as_ref().display());

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Open the standard database inside a data directory
    pub async fn init<P: AsRef<Path>>(data_directory: P) -> Result<Self> {
        Self::open(data_directory.as_ref().join(DATABASE_FILE)).await
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS key_values (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for SqliteKeyValueStore {
    async fn read(&self, key: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT value FROM key_values WHERE key = ?")
            .bind(key)
            .fetch_optional(&*self.pool)
            .await?;

        Ok(row.map(|r| r.get::<String, _>("value")))
    }

    async fn write(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query("INSERT OR REPLACE INTO key_values (key, value) VALUES (?, ?)")
            .bind(key)
            .bind(value)
            .execute(&*self.pool)
            .await?;
        debug!("Wrote {} bytes under key '{}'", value.len(), key);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM key_values WHERE key = ?")
            .bind(key)
            .execute(&*self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn setup_test() -> (SqliteKeyValueStore, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = SqliteKeyValueStore::init(temp_dir.path())
            .await
            .expect("Failed to open test database");
        (store, temp_dir)
    }

    #[tokio::test]
    async fn test_write_and_read_value() {
        let (store, _temp_dir) = setup_test().await;

        store.write("allboards", "[]").await.expect("Failed to write value");

        let value = store.read("allboards").await.expect("Failed to read value");
        assert_eq!(value.as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_read_missing_key() {
        let (store, _temp_dir) = setup_test().await;

        let value = store.read("nonexistent_key").await.expect("Query failed");
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_write_overwrites_previous_value() {
        let (store, _temp_dir) = setup_test().await;

        store.write("same_key", "initial").await.expect("Failed to write initial value");
        store.write("same_key", "updated").await.expect("Failed to overwrite value");

        let value = store.read("same_key").await.expect("Failed to read value");
        assert_eq!(value.as_deref(), Some("updated"));
    }

    #[tokio::test]
    async fn test_remove_value() {
        let (store, _temp_dir) = setup_test().await;

        store.write("key_to_delete", "value").await.expect("Failed to write value");

        assert!(store.remove("key_to_delete").await.expect("Failed to remove value"));
        assert!(store.read("key_to_delete").await.expect("Failed to read").is_none());

        // Removing again reports that nothing was there
        assert!(!store.remove("key_to_delete").await.expect("Failed to re-remove value"));
    }

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        {
            let store = SqliteKeyValueStore::init(temp_dir.path()).await.unwrap();
            store.write("allboards", "[1]").await.unwrap();
        }

        let reopened = SqliteKeyValueStore::init(temp_dir.path()).await.unwrap();
        assert_eq!(reopened.read("allboards").await.unwrap().as_deref(), Some("[1]"));
    }
}
