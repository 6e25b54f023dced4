//! Persistent half of the article sink.
//!
//! The store holds one document per `(source, article_key)` pair in a
//! single `articles` table, partitioned by the source column. Writes are
//! upserts on that composite key, so re-running the same sources never
//! creates duplicate documents, and two sources that syndicate the same
//! URL each keep their own document.
//!
//! [`PgDocumentStore`] is the production implementation over a PostgreSQL
//! pool; the pool is created once at startup and shared for the whole run.
//! Migrations run at connect time.

use crate::error::SetupError;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{info, instrument};

/// Narrow upsert contract the sink depends on.
///
/// `(source_id, article_key)` together identify the document, mirroring the
/// one-file-per-source filesystem layout. Implementations must tolerate
/// repeated upserts of the same pair (overwrite, not duplicate).
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn upsert(
        &self,
        source_id: &str,
        article_key: &str,
        document: &serde_json::Value,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// PostgreSQL-backed [`DocumentStore`].
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    /// Connect to the store and apply migrations.
    ///
    /// # Errors
    ///
    /// Connection and migration failures are fatal setup errors; there is
    /// nothing to archive into if the store is unreachable.
    #[instrument(level = "info", skip_all)]
    pub async fn connect(database_url: &str) -> Result<Self, SetupError> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(SetupError::StoreConnect)?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(SetupError::StoreMigrate)?;

        info!("Connected to article store");
        Ok(Self { pool })
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn upsert(
        &self,
        source_id: &str,
        article_key: &str,
        document: &serde_json::Value,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        sqlx::query(
            "INSERT INTO articles (source, article_key, document, updated_at) \
             VALUES ($1, $2, $3, now()) \
             ON CONFLICT (source, article_key) \
             DO UPDATE SET document = EXCLUDED.document, updated_at = now()",
        )
        .bind(source_id)
        .bind(article_key)
        .bind(document)
        .execute(&self.pool)
        .await
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;

        Ok(())
    }
}

/// In-memory [`DocumentStore`] used by sink and pipeline tests. Keyed by
/// `(source, article_key)` like the production table.
#[cfg(test)]
pub struct MemoryStore {
    docs: std::sync::Mutex<std::collections::HashMap<(String, String), serde_json::Value>>,
    fail_keys: std::sync::Mutex<std::collections::HashSet<String>>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        Self {
            docs: std::sync::Mutex::new(std::collections::HashMap::new()),
            fail_keys: std::sync::Mutex::new(std::collections::HashSet::new()),
        }
    }

    /// Make upserts of `key` fail for any source, simulating a store-side
    /// refusal.
    pub fn fail_key(&self, key: &str) {
        self.fail_keys.lock().unwrap().insert(key.to_string());
    }

    pub fn len(&self) -> usize {
        self.docs.lock().unwrap().len()
    }

    pub fn get(&self, source: &str, key: &str) -> Option<serde_json::Value> {
        self.docs
            .lock()
            .unwrap()
            .get(&(source.to_string(), key.to_string()))
            .cloned()
    }

    pub fn keys(&self) -> Vec<(String, String)> {
        let mut keys: Vec<(String, String)> = self.docs.lock().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[cfg(test)]
#[async_trait]
impl DocumentStore for MemoryStore {
    async fn upsert(
        &self,
        source_id: &str,
        article_key: &str,
        document: &serde_json::Value,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if self.fail_keys.lock().unwrap().contains(article_key) {
            return Err(format!("upsert refused for {article_key}").into());
        }

        self.docs.lock().unwrap().insert(
            (source_id.to_string(), article_key.to_string()),
            document.clone(),
        );
        Ok(())
    }
}
