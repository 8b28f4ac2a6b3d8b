//! Password gate for protected file share downloads.
//!
//! [`authorizer::DownloadAuthorizer`] looks a share up through a
//! [`shares::ShareRepository`], verifies the submitted password against the
//! stored Argon2 hash and delays every denial by a fixed minimum latency.
//! Unknown shares and wrong passwords are indistinguishable to callers.

pub mod app_state;
pub mod authorizer;
pub mod config;
pub mod credentials;
pub mod database;
pub mod logging;
pub mod server;
pub mod shares;
pub mod verdict;

pub use authorizer::DownloadAuthorizer;
pub use shares::{RepositoryError, Share, ShareRepository, SqliteShareRepository};
pub use verdict::{AuthorizationVerdict, AuthorizeError, DenialReason, UnlockOutcome};
