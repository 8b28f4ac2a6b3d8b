use std::time::Duration;

use tokio::time::{sleep_until, Instant};
use tracing::{debug, error};

use crate::{
    credentials::{CredentialError, CredentialHasher},
    shares::ShareRepository,
    verdict::{AuthorizationVerdict, AuthorizeError, DenialReason},
};

/// Decides whether a password unlocks a share.
///
/// Denied attempts never return before `failure_delay` has elapsed since the
/// attempt started. The wait is a timer on the calling task only, so other
/// attempts are unaffected. Allowed attempts return as soon as verification
/// finishes.
pub struct DownloadAuthorizer<R> {
    repository: R,
    hasher: CredentialHasher,
    failure_delay: Duration,
    decoy_hash: String,
}

impl<R: ShareRepository> DownloadAuthorizer<R> {
    pub async fn new(
        repository: R,
        hasher: CredentialHasher,
        failure_delay: Duration,
    ) -> Result<Self, CredentialError> {
        let decoy_hash = hasher.decoy_hash().await?;

        Ok(Self {
            repository,
            hasher,
            failure_delay,
            decoy_hash,
        })
    }

    pub fn failure_delay(&self) -> Duration {
        self.failure_delay
    }

    pub async fn authorize(
        &self,
        identifier: &str,
        candidate_password: &str,
    ) -> Result<AuthorizationVerdict, AuthorizeError> {
        let started = Instant::now();

        let share = self.repository.find_by_identifier(identifier).await?;

        // Absent shares are checked against the decoy so both denial paths do
        // the same work.
        let (stored_hash, missing_reason) = match share.as_ref() {
            Some(share) => (share.credential_hash.as_str(), None),
            None => (self.decoy_hash.as_str(), Some(DenialReason::NotFound)),
        };

        let matched = match self.hasher.verify(candidate_password, stored_hash).await {
            Ok(matched) => matched,
            Err(err) => {
                error!(
                    target: "shares",
                    share_id = share.as_ref().map(|share| share.id),
                    %err,
                    "stored share credential could not be verified"
                );
                false
            }
        };

        let verdict = match (missing_reason, matched) {
            (None, true) => AuthorizationVerdict::Allowed,
            (Some(reason), _) => AuthorizationVerdict::Denied(reason),
            (None, false) => AuthorizationVerdict::Denied(DenialReason::PasswordMismatch),
        };

        match verdict {
            AuthorizationVerdict::Allowed => {
                debug!(target: "shares", "share download password accepted");
            }
            AuthorizationVerdict::Denied(reason) => {
                debug!(
                    target: "shares",
                    reason = reason.as_str(),
                    "share download password rejected"
                );
                // Mitigate brute force attempts.
                sleep_until(started + self.failure_delay).await;
            }
        }

        Ok(verdict)
    }
}
