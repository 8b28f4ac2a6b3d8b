use axum::{
    extract::{Path as AxumPath, State},
    response::Response,
    Form,
};
use serde::Deserialize;
use tracing::error;

use crate::{app_state::AppState, verdict::UnlockOutcome};

use crate::server::utils::{
    bad_password_response, service_unavailable_response, share_unlocked_response,
};

/// POST /share-download/:download_id: check the password for a protected share.
pub async fn share_unlock_handler(
    State(state): State<AppState>,
    AxumPath(download_id): AxumPath<String>,
    Form(form): Form<UnlockForm>,
) -> Response {
    match state
        .authorizer()
        .authorize(&download_id, &form.password)
        .await
    {
        Ok(verdict) => match verdict.outcome() {
            UnlockOutcome::Unlocked => share_unlocked_response(),
            UnlockOutcome::Invalid => bad_password_response(),
        },
        Err(err) => {
            error!(target: "shares", %err, "share lookup failed during unlock");
            service_unavailable_response()
        }
    }
}

/// Unlock form body. Not `Debug` so the password cannot end up in logs.
#[derive(Deserialize)]
pub struct UnlockForm {
    #[serde(default)]
    password: String,
}
