use crate::{
    authorizer::DownloadAuthorizer,
    config::AppConfig,
    credentials::{CredentialError, CredentialHasher},
    shares::SqliteShareRepository,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use thiserror::Error;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Password gate in front of share downloads
    pub authorizer: Arc<DownloadAuthorizer<SqliteShareRepository>>,
}

#[derive(Debug, Error)]
pub enum AppStateError {
    #[error("credential configuration error: {0}")]
    Credentials(#[from] CredentialError),
}

impl AppState {
    pub async fn new(db: SqlitePool, config: &AppConfig) -> Result<Self, AppStateError> {
        let hasher = CredentialHasher::new(config.security.password_pepper.as_deref())?;
        Self::with_hasher(db, config, hasher).await
    }

    /// Build state around an explicit hasher, e.g. one with cheaper parameters.
    pub async fn with_hasher(
        db: SqlitePool,
        config: &AppConfig,
        hasher: CredentialHasher,
    ) -> Result<Self, AppStateError> {
        let repository = SqliteShareRepository::new(db);
        let authorizer =
            DownloadAuthorizer::new(repository, hasher, config.failure_delay()).await?;

        Ok(Self {
            authorizer: Arc::new(authorizer),
        })
    }

    pub fn authorizer(&self) -> &DownloadAuthorizer<SqliteShareRepository> {
        &self.authorizer
    }
}
