use std::sync::Arc;
use std::time::{Duration, Instant};

use argon2::Params;
use share_gate::{
    credentials::CredentialHasher, database::ensure_schema, AuthorizationVerdict, AuthorizeError,
    DownloadAuthorizer, SqliteShareRepository, UnlockOutcome,
};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

const DELAY: Duration = Duration::from_millis(300);

// Cheap Argon2 parameters keep verification well under the failure delay.
fn test_hasher() -> CredentialHasher {
    CredentialHasher::with_params(Params::new(8, 1, 1, Some(32)).unwrap(), None)
}

async fn memory_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    ensure_schema(&pool).await.unwrap();
    pool
}

async fn provision_share(pool: &SqlitePool, hasher: &CredentialHasher, id: &str, password: &str) {
    let hash = hasher.hash(password).await.unwrap();
    sqlx::query("INSERT INTO shares (download_uuid, password_hash, created_at) VALUES (?, ?, 0)")
        .bind(id)
        .bind(hash)
        .execute(pool)
        .await
        .unwrap();
}

async fn setup(shares: &[(&str, &str)]) -> (DownloadAuthorizer<SqliteShareRepository>, SqlitePool) {
    let pool = memory_pool().await;
    let hasher = test_hasher();
    for (id, password) in shares {
        provision_share(&pool, &hasher, id, password).await;
    }

    let repository = SqliteShareRepository::new(pool.clone());
    let authorizer = DownloadAuthorizer::new(repository, hasher, DELAY)
        .await
        .unwrap();
    (authorizer, pool)
}

async fn timed(
    authorizer: &DownloadAuthorizer<SqliteShareRepository>,
    id: &str,
    password: &str,
) -> (Result<AuthorizationVerdict, AuthorizeError>, Duration) {
    let started = Instant::now();
    let result = authorizer.authorize(id, password).await;
    (result, started.elapsed())
}

#[tokio::test]
async fn correct_horse_scenario() {
    let (authorizer, _pool) = setup(&[("abc123", "correct-horse")]).await;

    let (allowed, allowed_elapsed) = timed(&authorizer, "abc123", "correct-horse").await;
    assert_eq!(allowed.unwrap(), AuthorizationVerdict::Allowed);
    assert!(allowed_elapsed < DELAY);

    let (wrong, wrong_elapsed) = timed(&authorizer, "abc123", "wrong").await;
    let wrong = wrong.unwrap();
    assert!(!wrong.is_allowed());
    assert!(wrong_elapsed >= DELAY);

    let (missing, missing_elapsed) = timed(&authorizer, "doesnotexist", "anything").await;
    let missing = missing.unwrap();
    assert!(!missing.is_allowed());
    assert!(missing_elapsed >= DELAY);

    assert_eq!(wrong.outcome(), UnlockOutcome::Invalid);
    assert_eq!(wrong.outcome(), missing.outcome());
    assert_eq!(
        wrong.outcome().message_key(),
        missing.outcome().message_key()
    );
}

#[tokio::test]
async fn every_other_password_is_denied() {
    let (authorizer, _pool) = setup(&[("abc123", "correct-horse")]).await;

    for candidate in ["", "correct", "correct-horse!", "CORRECT-HORSE", " correct-horse"] {
        let verdict = authorizer.authorize("abc123", candidate).await.unwrap();
        assert!(!verdict.is_allowed(), "{candidate:?} should not unlock");
    }
}

#[tokio::test]
async fn long_identifiers_unlock_like_any_other() {
    let long_id = "x".repeat(200);
    let (authorizer, _pool) = setup(&[(long_id.as_str(), "correct-horse")]).await;

    let verdict = authorizer.authorize(&long_id, "correct-horse").await.unwrap();

    assert_eq!(verdict, AuthorizationVerdict::Allowed);
}

#[tokio::test]
async fn verdicts_are_idempotent() {
    let (authorizer, _pool) = setup(&[("abc123", "correct-horse")]).await;

    for (id, password) in [
        ("abc123", "correct-horse"),
        ("abc123", "wrong"),
        ("doesnotexist", "anything"),
    ] {
        let first = authorizer.authorize(id, password).await.unwrap();
        let second = authorizer.authorize(id, password).await.unwrap();
        assert_eq!(first, second);
    }
}

#[tokio::test]
async fn storage_outage_is_an_error_without_delay() {
    let (authorizer, pool) = setup(&[("abc123", "correct-horse")]).await;
    pool.close().await;

    let (result, elapsed) = timed(&authorizer, "abc123", "wrong").await;

    assert!(matches!(result, Err(AuthorizeError::StorageUnavailable(_))));
    assert!(elapsed < DELAY);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_attempts_resolve_independently() {
    let shares: Vec<(String, String)> = (0..8)
        .map(|n| (format!("share-{n}"), format!("password-{n}")))
        .collect();
    let borrowed: Vec<(&str, &str)> = shares
        .iter()
        .map(|(id, password)| (id.as_str(), password.as_str()))
        .collect();
    let (authorizer, _pool) = setup(&borrowed).await;
    let authorizer = Arc::new(authorizer);

    let started = Instant::now();
    let mut tasks = Vec::new();
    for (n, (id, password)) in shares.iter().cloned().enumerate() {
        let authorizer = Arc::clone(&authorizer);
        let correct = n % 2 == 0;
        let candidate = if correct { password } else { "nope".to_string() };
        tasks.push(tokio::spawn(async move {
            let attempt_started = Instant::now();
            let verdict = authorizer.authorize(&id, &candidate).await.unwrap();
            (correct, verdict, attempt_started.elapsed())
        }));
    }

    for task in tasks {
        let (correct, verdict, elapsed) = task.await.unwrap();
        assert_eq!(verdict.is_allowed(), correct);
        if correct {
            assert!(elapsed < DELAY, "allowed attempt waited {elapsed:?}");
        } else {
            assert!(elapsed >= DELAY);
        }
    }

    // Four denials at DELAY each would take 4 * DELAY if they were serialized.
    assert!(started.elapsed() < DELAY * 3);
}
