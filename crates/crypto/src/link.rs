//! Share links.
//!
//! The key is only ever written into the URL fragment, which user agents do
//! not send to the server. Two shapes exist:
//!
//! ```text
//! query:   https://host/path?id=<id>#key=<base58 key>
//! compact: https://host/path#<id>_<base58 key>
//! ```
//!
//! New links use the query shape. Compact links are still parsed; their id
//! may not contain `_`, and the base58 alphabet never does, so the fragment
//! splits unambiguously at its last underscore.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::{form_urlencoded, Url};

use crate::{CryptoError, LinkError, SymmetricKey};

pub const ID_MAX_LEN: usize = 128;

/// Id check shared by the client and the storage service: `[A-Za-z0-9_-]+`.
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= ID_MAX_LEN
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

fn is_valid_compact_id(id: &str) -> bool {
    is_valid_id(id) && !id.contains('_')
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStyle {
    /// `?id=<id>#key=<key>`
    #[default]
    Query,
    /// `#<id>_<key>`
    Compact,
}

#[derive(Clone, PartialEq, Eq)]
pub struct ShareLink {
    id: String,
    key: String,
}

impl ShareLink {
    pub fn new(id: impl Into<String>, key: impl Into<String>) -> Result<Self, LinkError> {
        let id = id.into();
        let key = key.into();
        if id.is_empty() {
            return Err(LinkError::MissingId);
        }
        if !is_valid_id(&id) {
            return Err(LinkError::InvalidId(id));
        }
        if key.is_empty() {
            return Err(LinkError::MissingKey);
        }
        Ok(Self { id, key })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The base58 key exactly as it appears in the link.
    pub fn key_str(&self) -> &str {
        &self.key
    }

    pub fn key(&self) -> Result<SymmetricKey, CryptoError> {
        SymmetricKey::decode(&self.key)
    }

    /// Render as `origin` + `path`, with the key in the fragment.
    pub fn to_url(&self, origin: &str, path: &str, style: LinkStyle) -> Result<String, LinkError> {
        let base = Url::parse(origin).map_err(|e| LinkError::InvalidUrl(e.to_string()))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(LinkError::InvalidUrl(format!(
                "unsupported scheme {:?}",
                base.scheme()
            )));
        }
        let mut url = base
            .join(path)
            .map_err(|e| LinkError::InvalidUrl(e.to_string()))?;
        url.set_query(None);

        match style {
            LinkStyle::Query => {
                url.query_pairs_mut().append_pair("id", &self.id);
                url.set_fragment(Some(&format!("key={}", self.key)));
            }
            LinkStyle::Compact => {
                if !is_valid_compact_id(&self.id) {
                    return Err(LinkError::InvalidId(self.id.clone()));
                }
                url.set_fragment(Some(&format!("{}_{}", self.id, self.key)));
            }
        }

        Ok(url.into())
    }

    /// Parse either link shape. A query `id` parameter selects the query
    /// shape; otherwise the fragment is read as compact.
    pub fn parse(input: &str) -> Result<Self, LinkError> {
        let url = Url::parse(input.trim()).map_err(|e| LinkError::InvalidUrl(e.to_string()))?;
        let fragment = url.fragment().unwrap_or_default();

        let query_id = url
            .query_pairs()
            .find(|(name, _)| name == "id")
            .map(|(_, value)| value.into_owned());

        let (id, key) = match query_id {
            Some(id) => {
                let key = form_urlencoded::parse(fragment.as_bytes())
                    .find(|(name, _)| name == "key")
                    .map(|(_, value)| value.into_owned());
                (id, key)
            }
            None => match fragment.rsplit_once('_') {
                Some((id, key)) => {
                    if !id.is_empty() && !is_valid_compact_id(id) {
                        return Err(LinkError::InvalidId(id.to_string()));
                    }
                    (id.to_string(), Some(key.to_string()))
                }
                None => return Err(LinkError::MissingId),
            },
        };

        if id.is_empty() {
            return Err(LinkError::MissingId);
        }
        if !is_valid_id(&id) {
            return Err(LinkError::InvalidId(id));
        }
        match key {
            Some(key) if !key.is_empty() => Ok(Self { id, key }),
            _ => Err(LinkError::MissingKey),
        }
    }
}

impl fmt::Debug for ShareLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShareLink")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

pub fn build_link(
    origin: &str,
    path: &str,
    id: &str,
    key: &str,
    style: LinkStyle,
) -> Result<String, LinkError> {
    ShareLink::new(id, key)?.to_url(origin, path, style)
}

/// Returns `(id, key)`.
pub fn parse_link(url: &str) -> Result<(String, String), LinkError> {
    let link = ShareLink::parse(url)?;
    Ok((link.id, link.key))
}
