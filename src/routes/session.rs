use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use tracing::instrument;

use crate::core::error::Error;
use crate::core::state::AppState;
use crate::utils::auth::bearer_token;

#[instrument(skip_all)]
pub(crate) async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, Error> {
    let token_id = bearer_token(&headers)?;

    state.authorizer.revoke_token(token_id).await?;

    Ok((StatusCode::OK, "logged out"))
}

#[instrument(skip_all)]
pub(crate) async fn get(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, Error> {
    let token_id = bearer_token(&headers)?;

    let rights = state.authorizer.token_rights(token_id).await?;

    let status = if rights.is_valid() {
        StatusCode::OK
    } else {
        StatusCode::UNAUTHORIZED
    };

    Ok((status, Json(rights)))
}
