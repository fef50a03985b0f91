use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::{validate_id, validate_upload, AppState, CreatedResponse};
use crate::error::AppError;
use crate::store::{SecretKind, StoredSecret};

pub fn create_router() -> Router<AppState> {
    Router::new().route("/api/v1/secrets", post(create_secret))
}

pub fn fetch_router() -> Router<AppState> {
    Router::new().route("/api/v1/secrets/:id", get(fetch_secret))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateSecretRequest {
    encrypted_secret: String,
    expiration: u64,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SecretResponse {
    encrypted_secret: String,
}

async fn create_secret(
    State(state): State<AppState>,
    payload: Result<Json<CreateSecretRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let Json(body) = payload?;
    let ttl = validate_upload(&state.config, &body.encrypted_secret, body.expiration)?;
    let size = body.encrypted_secret.len();

    let id = state
        .store
        .insert(StoredSecret::text(body.encrypted_secret), ttl)
        .await;
    tracing::info!(%id, size, expiration = body.expiration, "stored secret");

    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

async fn fetch_secret(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    validate_id(&id)?;

    let secret = state
        .store
        .take(&id, SecretKind::Text)
        .await
        .ok_or(AppError::NotFound)?;
    tracing::info!(%id, "secret consumed");

    Ok((
        [(header::CACHE_CONTROL, "no-store")],
        Json(SecretResponse {
            encrypted_secret: secret.encrypted_secret,
        }),
    ))
}
