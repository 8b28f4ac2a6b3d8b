use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::verdict::{BAD_PASSWORD_MESSAGE_KEY, SERVICE_UNAVAILABLE_MESSAGE_KEY};

use super::constants::STORAGE_RETRY_AFTER_SECS;

/// Resolve a message key to the text shown to the client.
pub fn message_text(key: &str) -> &'static str {
    match key {
        BAD_PASSWORD_MESSAGE_KEY => "Invalid password.",
        SERVICE_UNAVAILABLE_MESSAGE_KEY => {
            "Unable to process your request. Please try again later."
        }
        _ => "Unable to process your request.",
    }
}

/// Response for a share whose password was accepted.
pub fn share_unlocked_response() -> Response {
    (StatusCode::OK, "Share unlocked.").into_response()
}

/// Response for any denied unlock attempt. Deliberately identical for
/// unknown shares and wrong passwords.
pub fn bad_password_response() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        message_text(BAD_PASSWORD_MESSAGE_KEY),
    )
        .into_response()
}

/// Response used when share storage cannot be reached.
pub fn service_unavailable_response() -> Response {
    let mut response = (
        StatusCode::SERVICE_UNAVAILABLE,
        message_text(SERVICE_UNAVAILABLE_MESSAGE_KEY),
    )
        .into_response();

    attach_retry_after(&mut response, STORAGE_RETRY_AFTER_SECS);
    response
}

/// Convenience for attaching a `Retry-After` header.
pub fn attach_retry_after(response: &mut Response, seconds: u64) {
    if let Ok(value) = HeaderValue::from_str(&seconds.max(1).to_string()) {
        response.headers_mut().insert(header::RETRY_AFTER, value);
    }
}
