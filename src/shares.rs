use async_trait::async_trait;
use sqlx::SqlitePool;
use thiserror::Error;

/// A password-protected share as seen by the download gate.
#[derive(Clone, sqlx::FromRow)]
pub struct Share {
    pub id: i64,
    #[sqlx(rename = "download_uuid")]
    pub identifier: String,
    #[sqlx(rename = "password_hash")]
    pub credential_hash: String,
}

impl std::fmt::Debug for Share {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Share")
            .field("id", &self.id)
            .field("identifier", &self.identifier)
            .field("credential_hash", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("share storage unavailable: {0}")]
    StorageUnavailable(#[from] sqlx::Error),
}

/// Read-only lookup of shares by their public download identifier.
#[async_trait]
pub trait ShareRepository: Send + Sync {
    /// Return the share addressed by `identifier`.
    ///
    /// Unknown, expired and malformed identifiers all come back as `Ok(None)`.
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<Share>, RepositoryError>;
}

#[derive(Clone)]
pub struct SqliteShareRepository {
    pool: SqlitePool,
}

impl SqliteShareRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShareRepository for SqliteShareRepository {
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<Share>, RepositoryError> {
        if identifier.is_empty() {
            return Ok(None);
        }

        // The transaction never outlives this call.
        let mut tx = self.pool.begin().await?;

        let share = sqlx::query_as::<_, Share>(
            r#"
            SELECT id, download_uuid, password_hash
            FROM shares
            WHERE download_uuid = ?
            "#,
        )
        .bind(identifier)
        .fetch_optional(&mut *tx)
        .await?;

        tx.rollback().await?;

        Ok(share)
    }
}
