//! Catalog document client
//!
//! Fetches the static catalog JSON from an HTTP(S) URL or a local file.

use reqwest::StatusCode;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::models::Catalog;

/// Catalog load error types
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog request returned HTTP {0}")]
    Status(u16),

    #[error("Invalid catalog document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Could not read catalog file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Catalog fetch ended without a result")]
    Interrupted,
}

/// Where the catalog document lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    Url(String),
    File(PathBuf),
}

impl CatalogSource {
    /// Strings starting with http:// or https:// are URLs, anything else a path
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            CatalogSource::Url(trimmed.to_string())
        } else {
            CatalogSource::File(PathBuf::from(trimmed))
        }
    }
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogSource::Url(url) => write!(f, "{}", url),
            CatalogSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Catalog client
pub struct CatalogClient {
    source: CatalogSource,
    client: reqwest::Client,
}

impl CatalogClient {
    /// Create a client for the given source
    pub fn new(source: CatalogSource) -> Self {
        Self {
            source,
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
        }
    }

    /// Source this client reads from
    pub fn source(&self) -> &CatalogSource {
        &self.source
    }

    /// Fetch and parse the catalog document. Single attempt, no retry.
    pub async fn fetch(&self) -> Result<Catalog, CatalogError> {
        let body = match &self.source {
            CatalogSource::Url(url) => {
                let response = self
                    .client
                    .get(url)
                    .header("Accept", "application/json")
                    .send()
                    .await?;

                let status: StatusCode = response.status();
                if !status.is_success() {
                    return Err(CatalogError::Status(status.as_u16()));
                }
                response.text().await?
            }
            CatalogSource::File(path) => {
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| CatalogError::Io {
                        path: path.clone(),
                        source,
                    })?
            }
        };

        Ok(serde_json::from_str(&body)?)
    }
}
