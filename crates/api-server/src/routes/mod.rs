use std::sync::Arc;
use std::time::Duration;

use axum::{middleware::from_fn_with_state, Router};
use serde::Serialize;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::middleware::require_auth;
use crate::store::SecretStore;

pub mod files;
mod health;
pub mod secrets;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SecretStore>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            store: Arc::new(SecretStore::new()),
            config,
        }
    }
}

#[derive(Serialize)]
pub(crate) struct CreatedResponse {
    id: String,
}

/// All routes, no auth.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(secrets::create_router())
        .merge(files::create_router())
        .merge(secrets::fetch_router())
        .merge(files::fetch_router())
}

/// Build the router with auth applied to the create endpoints.
///
/// Fetch endpoints stay open: holding the link is the only capability a
/// reader needs.
pub fn router_with_auth(state: AppState) -> Router<AppState> {
    let create = Router::new()
        .merge(secrets::create_router())
        .merge(files::create_router())
        .route_layer(from_fn_with_state(state, require_auth));

    Router::new()
        .merge(health::router())
        .merge(create)
        .merge(secrets::fetch_router())
        .merge(files::fetch_router())
}

/// Shared checks for uploads. Returns the time-to-live.
pub(crate) fn validate_upload(
    config: &AppConfig,
    encrypted_secret: &str,
    expiration: u64,
) -> Result<Duration, AppError> {
    if encrypted_secret.is_empty() {
        return Err(AppError::BadRequest(
            "'encryptedSecret' must not be empty".into(),
        ));
    }
    if expiration == 0 || expiration > config.max_expiration_secs {
        return Err(AppError::BadRequest(format!(
            "'expiration' must be between 1 and {} seconds",
            config.max_expiration_secs
        )));
    }
    Ok(Duration::from_secs(expiration))
}

pub(crate) fn validate_id(id: &str) -> Result<(), AppError> {
    if snaplink_crypto::link::is_valid_id(id) {
        Ok(())
    } else {
        Err(AppError::BadRequest("invalid secret id".into()))
    }
}
