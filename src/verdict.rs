use thiserror::Error;

use crate::shares::RepositoryError;

/// Message key shown for any denied unlock attempt.
pub const BAD_PASSWORD_MESSAGE_KEY: &str = "msg-bad-password";
/// Message key shown when share storage cannot be reached.
pub const SERVICE_UNAVAILABLE_MESSAGE_KEY: &str = "msg-service-unavailable";

/// Outcome of a single unlock attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationVerdict {
    Allowed,
    Denied(DenialReason),
}

/// Why an attempt was denied. For logs only, never shown to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    NotFound,
    PasswordMismatch,
}

/// What the presentation layer is allowed to learn from a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockOutcome {
    Unlocked,
    Invalid,
}

impl AuthorizationVerdict {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AuthorizationVerdict::Allowed)
    }

    /// Collapse the verdict to its outward form. Every denial maps to
    /// [`UnlockOutcome::Invalid`] regardless of reason.
    pub fn outcome(&self) -> UnlockOutcome {
        match self {
            AuthorizationVerdict::Allowed => UnlockOutcome::Unlocked,
            AuthorizationVerdict::Denied(_) => UnlockOutcome::Invalid,
        }
    }
}

impl DenialReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DenialReason::NotFound => "not_found",
            DenialReason::PasswordMismatch => "password_mismatch",
        }
    }
}

impl UnlockOutcome {
    pub fn message_key(&self) -> Option<&'static str> {
        match self {
            UnlockOutcome::Unlocked => None,
            UnlockOutcome::Invalid => Some(BAD_PASSWORD_MESSAGE_KEY),
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthorizeError {
    #[error("share storage unavailable: {0}")]
    StorageUnavailable(#[source] RepositoryError),
}

impl From<RepositoryError> for AuthorizeError {
    fn from(err: RepositoryError) -> Self {
        AuthorizeError::StorageUnavailable(err)
    }
}

impl AuthorizeError {
    pub fn message_key(&self) -> &'static str {
        match self {
            AuthorizeError::StorageUnavailable(_) => SERVICE_UNAVAILABLE_MESSAGE_KEY,
        }
    }
}
