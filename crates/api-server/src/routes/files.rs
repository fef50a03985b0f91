use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use snaplink_crypto::FileMetadata;

use super::{validate_id, validate_upload, AppState, CreatedResponse};
use crate::error::AppError;
use crate::store::{SecretKind, StoredSecret};

const MAX_FILENAME_LEN: usize = 255;

pub fn create_router() -> Router<AppState> {
    Router::new().route("/api/v1/files", post(create_file))
}

pub fn fetch_router() -> Router<AppState> {
    Router::new().route("/api/v1/files/:id", get(fetch_file))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateFileRequest {
    encrypted_secret: String,
    expiration: u64,
    metadata: FileMetadata,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileResponse {
    encrypted_secret: String,
    metadata: FileMetadata,
}

async fn create_file(
    State(state): State<AppState>,
    payload: Result<Json<CreateFileRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let Json(body) = payload?;
    let ttl = validate_upload(&state.config, &body.encrypted_secret, body.expiration)?;

    let filename = &body.metadata.original_filename;
    if filename.is_empty() || filename.len() > MAX_FILENAME_LEN {
        return Err(AppError::BadRequest(format!(
            "'metadata.originalFilename' must be 1 to {MAX_FILENAME_LEN} bytes"
        )));
    }

    let size = body.encrypted_secret.len();
    let id = state
        .store
        .insert(StoredSecret::file(body.encrypted_secret, body.metadata), ttl)
        .await;
    tracing::info!(%id, size, expiration = body.expiration, "stored file");

    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

async fn fetch_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    validate_id(&id)?;

    let secret = state
        .store
        .take(&id, SecretKind::File)
        .await
        .ok_or(AppError::NotFound)?;
    let metadata = secret.metadata.ok_or(AppError::NotFound)?;
    tracing::info!(%id, "file consumed");

    Ok((
        [(header::CACHE_CONTROL, "no-store")],
        Json(FileResponse {
            encrypted_secret: secret.encrypted_secret,
            metadata,
        }),
    ))
}
