//! Artwork availability probe
//!
//! The terminal cannot draw posters, but it still needs to know whether an
//! image would load so it can show the "No Image" placeholder instead.

use std::path::Path;
use std::time::Duration;

use reqwest::header::RANGE;
use reqwest::StatusCode;

/// Outcome of probing one image URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Artwork {
    /// Not probed yet
    #[default]
    Pending,
    /// The image resolved
    Loaded,
    /// The image failed; show the placeholder
    Placeholder,
}

/// Checks image URLs with a HEAD request (or a file existence check)
#[derive(Clone)]
pub struct ArtworkProbe {
    client: reqwest::Client,
}

impl Default for ArtworkProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl ArtworkProbe {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_default(),
        }
    }

    /// Probe one image location
    pub async fn probe(&self, location: &str) -> Artwork {
        if location.starts_with("http://") || location.starts_with("https://") {
            let mut response = self.client.head(location).send().await;
            // Some image hosts refuse HEAD; ask for the first byte instead
            if matches!(&response, Ok(resp) if resp.status() == StatusCode::METHOD_NOT_ALLOWED) {
                response = self
                    .client
                    .get(location)
                    .header(RANGE, "bytes=0-0")
                    .send()
                    .await;
            }
            match response {
                Ok(resp) if resp.status().is_success() => Artwork::Loaded,
                Ok(resp) => {
                    tracing::warn!(url = location, status = resp.status().as_u16(), "artwork unavailable");
                    Artwork::Placeholder
                }
                Err(e) => {
                    tracing::warn!(url = location, error = %e, "artwork probe failed");
                    Artwork::Placeholder
                }
            }
        } else if !location.is_empty() && Path::new(location).exists() {
            Artwork::Loaded
        } else {
            tracing::warn!(path = location, "artwork file missing");
            Artwork::Placeholder
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_is_placeholder() {
        let probe = ArtworkProbe::new();
        assert_eq!(probe.probe("/no/such/poster.jpg").await, Artwork::Placeholder);
        assert_eq!(probe.probe("").await, Artwork::Placeholder);
    }

    #[test]
    fn test_default_is_pending() {
        assert_eq!(Artwork::default(), Artwork::Pending);
    }
}
