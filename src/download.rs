//! Result download trigger
//!
//! The final step of a successful polling session: retrieve the ready
//! result and save it, honoring the server-declared filename. This is a
//! thin side-effecting action with no retry logic of its own; a failure
//! here does not alter the polling outcome.

use crate::error::{Error, Result};
use async_trait::async_trait;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// Filename used when the server declares none
const FALLBACK_FILENAME: &str = "result.csv";

/// Side-effecting action taken when a polled result becomes ready
#[async_trait]
pub trait DownloadTrigger: Send + Sync {
    /// Retrieves and saves the result at `location` (a same-origin path)
    async fn trigger(&self, location: &str) -> Result<()>;
}

/// [`DownloadTrigger`] that streams the result to a file on disk
///
/// The filename comes from the response's `Content-Disposition` header
/// when present (quoted, unquoted, and RFC 5987 forms), reduced to its
/// final path component so a hostile header cannot escape the target
/// directory.
#[derive(Debug, Clone)]
pub struct FileDownloadTrigger {
    origin: String,
    dir: PathBuf,
    http: reqwest::Client,
}

impl FileDownloadTrigger {
    /// Creates a trigger that resolves locations against `origin` and
    /// saves results under `dir`
    pub fn new(origin: impl Into<String>, dir: impl Into<PathBuf>, http: reqwest::Client) -> Self {
        Self {
            origin: origin.into().trim_end_matches('/').to_string(),
            dir: dir.into(),
            http,
        }
    }
}

#[async_trait]
impl DownloadTrigger for FileDownloadTrigger {
    async fn trigger(&self, location: &str) -> Result<()> {
        let response = self
            .http
            .get(format!("{}{location}", self.origin))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Download(format!(
                "result fetch returned status {}",
                response.status().as_u16()
            )));
        }

        let filename = filename_from_response(&response);
        let path = self.dir.join(&filename);

        let mut file = tokio::fs::File::create(&path).await?;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            file.write_all(&chunk?).await?;
        }
        file.flush().await?;

        tracing::info!(path = %path.display(), "result saved");
        Ok(())
    }
}

/// Extracts a safe filename from the response's Content-Disposition header
///
/// Handles `filename="quoted.csv"`, `filename=bare.csv`, and the RFC 5987
/// `filename*=UTF-8''encoded` form. The value is reduced to its final path
/// component; when nothing usable is declared the fallback name is used.
fn filename_from_response(response: &reqwest::Response) -> String {
    let header = response
        .headers()
        .get(reqwest::header::CONTENT_DISPOSITION)
        .and_then(|value| value.to_str().ok());

    if let Some(value) = header {
        for part in value.split(';') {
            let part = part.trim();
            if let Some(encoded) = part.strip_prefix("filename*=") {
                // RFC 5987: charset'lang'percent-encoded-name
                if let Some(idx) = encoded.rfind('\'')
                    && let Ok(decoded) = urlencoding::decode(&encoded[idx + 1..])
                {
                    return sanitize(&decoded);
                }
            } else if let Some(name) = part.strip_prefix("filename=") {
                return sanitize(name.trim_matches('"'));
            }
        }
    }

    FALLBACK_FILENAME.to_string()
}

/// Reduces a declared filename to its final, non-empty path component
fn sanitize(name: &str) -> String {
    Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty() && *n != "." && *n != "..")
        .map(String::from)
        .unwrap_or_else(|| FALLBACK_FILENAME.to_string())
}
