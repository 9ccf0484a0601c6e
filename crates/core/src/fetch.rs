//! Page retrieval for hosts: URLs, files, and stdin.
//!
//! The capture engine never fetches anything itself. These helpers exist for
//! the CLI host, together with [`HttpImageProbe`], which settles images with
//! HEAD requests.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::settle::{ImageProbe, ImageStatus};
use crate::{CaptureError, Result};

/// HTTP client configuration for fetching web pages.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: 30,
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) clipmark/0.4".to_string(),
        }
    }
}

impl FetchConfig {
    fn client(&self) -> Result<Client> {
        Client::builder()
            .timeout(Duration::from_secs(self.timeout))
            .user_agent(&self.user_agent)
            .build()
            .map_err(CaptureError::HttpError)
    }
}

/// Fetches the HTML of `url` with browser-like headers.
///
/// # Errors
///
/// [`CaptureError::InvalidUrl`] for anything but an absolute http(s) URL,
/// [`CaptureError::Timeout`] when the request exceeds `config.timeout`.
pub async fn fetch_url(url: &str, config: &FetchConfig) -> Result<String> {
    let parsed_url = Url::parse(url).map_err(|e| CaptureError::InvalidUrl(e.to_string()))?;

    if !matches!(parsed_url.scheme(), "http" | "https") {
        return Err(CaptureError::InvalidUrl(format!("unsupported scheme '{}'", parsed_url.scheme())));
    }

    tracing::debug!(url = %parsed_url, "fetching page");
    let response = config
        .client()?
        .get(parsed_url)
        .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
        .header("Accept-Language", "en-US,en;q=0.9")
        .send()
        .await
        .map_err(|e| timeout_or_http(e, config.timeout))?
        .error_for_status()?;

    let content = response.text().await?;

    Ok(content)
}

fn timeout_or_http(e: reqwest::Error, timeout: u64) -> CaptureError {
    if e.is_timeout() { CaptureError::Timeout { timeout } } else { CaptureError::HttpError(e) }
}

/// Reads HTML content from a local file.
pub fn fetch_file(path: &str) -> Result<String> {
    let path_buf = PathBuf::from(path);

    if !path_buf.exists() {
        Err(CaptureError::FileNotFound(path_buf))
    } else {
        fs::read_to_string(&path_buf).map_err(CaptureError::from)
    }
}

/// Reads HTML content from standard input until EOF.
pub fn fetch_stdin() -> Result<String> {
    use std::io::{self, Read};

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    Ok(buffer)
}

/// Settles images with a HEAD request each; any 2xx counts as loaded.
#[derive(Debug, Clone)]
pub struct HttpImageProbe {
    client: Client,
}

impl HttpImageProbe {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        Ok(Self { client: config.client()? })
    }
}

#[async_trait]
impl ImageProbe for HttpImageProbe {
    async fn settle(&self, src: &str) -> ImageStatus {
        match self.client.head(src).send().await {
            Ok(response) if response.status().is_success() => ImageStatus::Loaded,
            Ok(response) => {
                tracing::debug!(src, status = %response.status(), "image did not load");
                ImageStatus::Failed
            }
            Err(e) => {
                tracing::debug!(src, error = %e, "image request failed");
                ImageStatus::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout, 30);
        assert!(config.user_agent.contains("clipmark"));
    }

    #[tokio::test]
    async fn test_fetch_url_invalid() {
        let result = fetch_url("not-a-url", &FetchConfig::default()).await;
        assert!(matches!(result, Err(CaptureError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_fetch_url_rejects_other_schemes() {
        let result = fetch_url("ftp://example.com/page.html", &FetchConfig::default()).await;
        assert!(matches!(result, Err(CaptureError::InvalidUrl(msg)) if msg.contains("ftp")));
    }

    #[test]
    fn test_fetch_file_not_found() {
        let result = fetch_file("/nonexistent/path/file.html");
        assert!(matches!(result, Err(CaptureError::FileNotFound(_))));
    }

    #[test]
    fn test_fetch_file_reads_contents() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "<p>saved page</p>").unwrap();

        let html = fetch_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(html, "<p>saved page</p>");
    }

    #[test]
    fn test_http_probe_builds() {
        assert!(HttpImageProbe::new(&FetchConfig::default()).is_ok());
    }
}
