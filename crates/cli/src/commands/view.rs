use std::fmt::Display;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use snaplink_crypto::{base58, open, open_file, transfer, ShareLink};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::api_client::{ApiClient, FetchError, FetchedFile};
use crate::config::CliConfig;

/// Shown for every read failure past the network layer.
pub const UNAVAILABLE: &str =
    "this secret does not exist, has already been viewed, or the link is wrong";

const FALLBACK_FILENAME: &str = "snaplink-download";

enum Fetched {
    Text(String),
    File(FetchedFile),
}

pub async fn run(
    config: &CliConfig,
    api: &ApiClient,
    link: &str,
    assume_yes: bool,
    output: Option<PathBuf>,
    out: &mut impl Write,
) -> Result<()> {
    let link = ShareLink::parse(link).context("invalid link")?;
    if !base58::is_valid_key(link.key_str()) {
        bail!("invalid link: the key is malformed");
    }

    if !assume_yes && !confirm().await? {
        eprintln!("aborted; the secret was not opened");
        return Ok(());
    }

    let fetched = match api.fetch_secret(link.id()).await {
        Ok(encrypted) => Fetched::Text(encrypted),
        Err(FetchError::NotFound) => match api.fetch_file(link.id()).await {
            Ok(file) => Fetched::File(file),
            Err(e) => return Err(read_failure(e)),
        },
        Err(e) => return Err(read_failure(e)),
    };

    let key = link.key().map_err(unavailable)?;
    match fetched {
        Fetched::Text(encrypted) => {
            let envelope = transfer::from_text(&encrypted).map_err(unavailable)?;
            let plaintext = open(&envelope, &key).map_err(unavailable)?;
            out.write_all(&plaintext)?;
            if !plaintext.ends_with(b"\n") {
                writeln!(out)?;
            }
        }
        Fetched::File(file) => {
            let envelope = transfer::from_text(&file.encrypted_secret).map_err(unavailable)?;
            let contents = open_file(&file.metadata, &envelope, &key).map_err(unavailable)?;

            let dir = output.unwrap_or_else(|| config.storage.download_dir.clone());
            tokio::fs::create_dir_all(&dir)
                .await
                .with_context(|| format!("failed to create {}", dir.display()))?;
            let target = unused_path(&dir, safe_filename(&file.metadata.original_filename));
            tokio::fs::write(&target, &contents)
                .await
                .with_context(|| format!("failed to write {}", target.display()))?;
            eprintln!(
                "saved {} ({} bytes, {})",
                target.display(),
                contents.len(),
                file.metadata.content_type
            );
        }
    }
    Ok(())
}

fn read_failure(err: FetchError) -> anyhow::Error {
    match err {
        FetchError::Network(e) => anyhow!(e).context("could not reach the storage server"),
        other => unavailable(other),
    }
}

fn unavailable(detail: impl Display) -> anyhow::Error {
    tracing::debug!(%detail, "secret could not be read");
    anyhow!(UNAVAILABLE)
}

async fn confirm() -> Result<bool> {
    eprint!("This secret can be viewed only once. Reveal it now? [y/N] ");
    let mut answer = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut answer)
        .await
        .context("failed to read confirmation")?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Last path component only; the sender controls this string.
fn safe_filename(original: &str) -> &str {
    let base = original.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    match base {
        "" | "." | ".." => FALLBACK_FILENAME,
        name => name,
    }
}

/// `name`, or `name (1)`, `name (2)`... so an earlier download is never overwritten.
fn unused_path(dir: &Path, name: &str) -> PathBuf {
    let candidate = dir.join(name);
    if !candidate.exists() {
        return candidate;
    }
    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (name, None),
    };
    (1..)
        .map(|n| match ext {
            Some(ext) => dir.join(format!("{stem} ({n}).{ext}")),
            None => dir.join(format!("{stem} ({n})")),
        })
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}
