use anyhow::{bail, Context, Result};
use reqwest::header::CACHE_CONTROL;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use snaplink_crypto::link::is_valid_id;
use snaplink_crypto::FileMetadata;

use crate::config::CliConfig;

pub struct ApiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

/// Read-path failures, kept apart so the caller can fall back from the text
/// endpoint to the file endpoint on `NotFound`.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("secret not found or already viewed")]
    NotFound,

    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("server returned HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("unexpected response body: {0}")]
    Decode(String),
}

// --- Request/Response types matching the API server ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StoreSecretRequest<'a> {
    encrypted_secret: &'a str,
    expiration: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StoreFileRequest<'a> {
    encrypted_secret: &'a str,
    expiration: u64,
    metadata: &'a FileMetadata,
}

#[derive(Deserialize)]
struct CreatedResponse {
    id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SecretResponse {
    encrypted_secret: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchedFile {
    pub encrypted_secret: String,
    pub metadata: FileMetadata,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    code: String,
    message: String,
}

impl ApiClient {
    pub fn new(base_url: &str, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// The upload token is optional: servers without `API_KEY` accept anyone.
    pub fn from_config(config: &CliConfig) -> Self {
        let api_key = std::env::var(&config.server.api_key_env)
            .ok()
            .filter(|key| !key.is_empty());
        if api_key.is_none() {
            tracing::debug!(
                var = %config.server.api_key_env,
                "no API key in environment, sending unauthenticated uploads"
            );
        }
        Self::new(&config.server.endpoint, api_key)
    }

    /// POST /secrets: store a text envelope, returns its id.
    pub async fn store_secret(&self, encrypted_secret: &str, expiration: u64) -> Result<String> {
        let body = StoreSecretRequest {
            encrypted_secret,
            expiration,
        };
        let resp = self
            .authorized(self.client.post(format!("{}/secrets", self.base_url)))
            .json(&body)
            .send()
            .await
            .context("failed to reach the storage server")?;

        Self::created_id(resp).await
    }

    /// POST /files: store a file envelope with its metadata, returns its id.
    pub async fn store_file(
        &self,
        encrypted_secret: &str,
        expiration: u64,
        metadata: &FileMetadata,
    ) -> Result<String> {
        let body = StoreFileRequest {
            encrypted_secret,
            expiration,
            metadata,
        };
        let resp = self
            .authorized(self.client.post(format!("{}/files", self.base_url)))
            .json(&body)
            .send()
            .await
            .context("failed to reach the storage server")?;

        Self::created_id(resp).await
    }

    /// GET /secrets/{id}: consumes the secret on the server.
    pub async fn fetch_secret(&self, id: &str) -> Result<String, FetchError> {
        let parsed: SecretResponse = self.fetch(&format!("secrets/{id}")).await?;
        Ok(parsed.encrypted_secret)
    }

    /// GET /files/{id}: consumes the file on the server.
    pub async fn fetch_file(&self, id: &str) -> Result<FetchedFile, FetchError> {
        self.fetch(&format!("files/{id}")).await
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let resp = self
            .client
            .get(format!("{}/{path}", self.base_url))
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound);
        }
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(FetchError::Status { status, body });
        }
        serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => req.bearer_auth(key),
            None => req,
        }
    }

    async fn created_id(resp: reqwest::Response) -> Result<String> {
        let resp = Self::check_response(resp).await?;
        let parsed: CreatedResponse = resp
            .json()
            .await
            .context("failed to parse create response")?;
        if !is_valid_id(&parsed.id) {
            bail!("server returned an unusable id: {:?}", parsed.id);
        }
        Ok(parsed.id)
    }

    /// Check HTTP response status; extract API error body if present.
    async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response> {
        if resp.status().is_success() {
            return Ok(resp);
        }

        let status = resp.status();
        let body_text = resp.text().await.unwrap_or_default();

        if let Ok(api_err) = serde_json::from_str::<ApiErrorBody>(&body_text) {
            bail!(
                "API error (HTTP {}): [{}] {}",
                status,
                api_err.error.code,
                api_err.error.message
            );
        }

        bail!("API error (HTTP {}): {}", status, body_text);
    }
}
