//! Remote dataset client module
//!
//! Provides `RemoteClient` for downloading dataset files over HTTP. The
//! client carries its credentials as default headers, so every download uses
//! the same auth without threading it through call sites.
//!
//! Transport failures surface as `SourceUnavailable`; a response that
//! completes but delivers fewer bytes than the server advertised surfaces as
//! `PartialFetch`. That split is what lets an orchestration layer retry the
//! first kind and force-recompute the second.

use super::Auth;
use crate::error::{PipelineError, Result};
use base64::Engine;
use reqwest::Client;
use std::path::Path;
use url::Url;

/// HTTP client for fetching dataset files from a remote source.
///
/// # Example
/// ```no_run
/// use corral::client::{Auth, RemoteClient};
/// use url::Url;
/// use std::path::Path;
///
/// # async fn example() -> corral::error::Result<()> {
/// let client = RemoteClient::try_new(Auth::None)?;
///
/// let url = Url::parse("https://datasets.example.com/weather/2024.csv")
///     .map_err(|e| corral::error::PipelineError::Config(e.to_string()))?;
/// let bytes = client.download(&url, Path::new("raw/2024.csv")).await?;
/// println!("Downloaded {} bytes", bytes);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct RemoteClient {
    client: Client,
}

impl RemoteClient {
    /// Create a new RemoteClient with the given authentication.
    ///
    /// # Errors
    /// Returns `Config` if the credentials do not form a valid header or the
    /// HTTP client cannot be built.
    pub fn try_new(auth: Auth) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        match auth {
            Auth::Basic(username, password) => {
                let credentials = base64::engine::general_purpose::STANDARD
                    .encode(format!("{}:{}", username, password));
                headers.append(
                    reqwest::header::AUTHORIZATION,
                    format!("Basic {}", credentials)
                        .parse()
                        .map_err(|_| PipelineError::Config("invalid basic credentials".into()))?,
                );
            }
            Auth::Token(token) => {
                headers.append(
                    reqwest::header::AUTHORIZATION,
                    format!("Bearer {}", token)
                        .parse()
                        .map_err(|_| PipelineError::Config("invalid token".into()))?,
                );
            }
            Auth::None => {}
        }
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        Ok(Self { client })
    }

    /// Download a single file to a local path, returning the byte count.
    ///
    /// The destination's parent directory must already exist; sources stage
    /// downloads inside their own output directory.
    ///
    /// # Errors
    /// - `SourceUnavailable`: transport failure or non-success status
    /// - `PartialFetch`: body shorter than the advertised Content-Length,
    ///   or an empty body
    pub async fn download(&self, url: &Url, dest: &Path) -> Result<u64> {
        log::debug!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| PipelineError::SourceUnavailable(format!("{}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::SourceUnavailable(format!(
                "{}: HTTP {}",
                url, status
            )));
        }

        let expected = response.content_length();

        let body = response
            .bytes()
            .await
            .map_err(|e| PipelineError::SourceUnavailable(format!("{}: {}", url, e)))?;

        if body.is_empty() {
            return Err(PipelineError::PartialFetch(format!("{}: empty body", url)));
        }
        if let Some(expected) = expected
            && body.len() as u64 != expected
        {
            return Err(PipelineError::PartialFetch(format!(
                "{}: got {} of {} bytes",
                url,
                body.len(),
                expected
            )));
        }

        std::fs::write(dest, &body)?;
        log::debug!("Wrote {} bytes to {}", body.len(), dest.display());

        Ok(body.len() as u64)
    }
}
