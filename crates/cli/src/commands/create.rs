use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use snaplink_crypto::{seal, seal_file, transfer, LinkStyle, ShareLink, SymmetricKey};

use crate::api_client::ApiClient;
use crate::config::CliConfig;

/// How long an unread secret survives on the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Expiry {
    Hour,
    #[default]
    Day,
    Week,
}

impl Expiry {
    pub fn as_secs(self) -> u64 {
        match self {
            Expiry::Hour => 60 * 60,
            Expiry::Day => 24 * 60 * 60,
            Expiry::Week => 7 * 24 * 60 * 60,
        }
    }
}

pub enum Input {
    Text(String),
    File(PathBuf),
}

pub async fn run(
    config: &CliConfig,
    api: &ApiClient,
    input: Input,
    expiry: Expiry,
    style: LinkStyle,
    out: &mut impl Write,
) -> Result<()> {
    let key = SymmetricKey::generate();
    let expiration = expiry.as_secs();

    let id = match input {
        Input::Text(text) => {
            if text.is_empty() {
                bail!("nothing to share: the secret is empty");
            }
            let envelope = seal(text.as_bytes(), &key).context("failed to encrypt secret")?;
            let encoded = transfer::to_text(&envelope);
            tracing::info!(size = encoded.len(), expiration, "uploading secret");
            api.store_secret(&encoded, expiration).await?
        }
        Input::File(path) => {
            let contents = tokio::fs::read(&path)
                .await
                .with_context(|| format!("failed to read {}", path.display()))?;
            if contents.is_empty() {
                bail!("nothing to share: {} is empty", path.display());
            }
            let filename = path
                .file_name()
                .and_then(|name| name.to_str())
                .with_context(|| format!("{} has no usable file name", path.display()))?;

            let (metadata, envelope) = seal_file(&contents, filename, &guess_mime(&path), &key)
                .context("failed to encrypt file")?;
            let encoded = transfer::to_text(&envelope);
            tracing::info!(size = encoded.len(), expiration, "uploading file");
            api.store_file(&encoded, expiration, &metadata).await?
        }
    };

    let url = ShareLink::new(id, key.encode())?
        .to_url(&config.link.origin, &config.link.path, style)
        .context("failed to build link; check [link] origin in the config")?;
    writeln!(out, "{url}")?;
    Ok(())
}

/// Text from stdin, minus the trailing newline a shell pipe usually adds.
pub async fn read_stdin() -> Result<String> {
    use tokio::io::AsyncReadExt;

    let mut text = String::new();
    tokio::io::stdin()
        .read_to_string(&mut text)
        .await
        .context("failed to read secret from stdin")?;
    Ok(strip_newline(text))
}

fn strip_newline(mut text: String) -> String {
    if text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
    text
}

pub fn guess_mime(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}
