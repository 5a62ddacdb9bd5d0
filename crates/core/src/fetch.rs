//! Page loading from URLs, files, and stdin.
//!
//! HTTP fetching needs the `fetch` feature (on by default).

use std::fs;
use std::path::PathBuf;
#[cfg(feature = "fetch")]
use std::time::Duration;

#[cfg(feature = "fetch")]
use reqwest::Client;
use url::Url;

use crate::{ReaderError, Result};

/// HTTP client configuration for fetching web pages.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout: 30, user_agent: format!("Mozilla/5.0 (compatible; readmode/{})", env!("CARGO_PKG_VERSION")) }
    }
}

/// Parses `input` as an absolute `http`/`https` URL.
pub fn parse_page_url(input: &str) -> Result<Url> {
    let url = Url::parse(input).map_err(|e| ReaderError::InvalidUrl(format!("{}: {}", input, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(ReaderError::InvalidUrl(format!("unsupported scheme {:?}, expected http or https", scheme))),
    }
}

/// Fetches a page over HTTP(S) and returns its body.
#[cfg(feature = "fetch")]
pub async fn fetch_url(url: &str, config: &FetchConfig) -> Result<String> {
    let parsed_url = parse_page_url(url)?;

    let client = Client::builder().timeout(Duration::from_secs(config.timeout)).build()?;

    tracing::debug!(url = %parsed_url, "fetching page");
    let response = client
        .get(parsed_url)
        .header("User-Agent", &config.user_agent)
        .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
        .send()
        .await
        .map_err(|e| if e.is_timeout() { ReaderError::Timeout { timeout: config.timeout } } else { e.into() })?
        .error_for_status()?;

    Ok(response.text().await?)
}

/// Reads a page from a local file.
pub fn fetch_file(path: &str) -> Result<String> {
    let path_buf = PathBuf::from(path);

    if !path_buf.exists() {
        Err(ReaderError::FileNotFound(path_buf))
    } else {
        fs::read_to_string(&path_buf).map_err(ReaderError::from)
    }
}

/// Reads a page from standard input until EOF.
pub fn fetch_stdin() -> Result<String> {
    use std::io::{self, Read};

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout, 30);
        assert!(config.user_agent.contains("readmode"));
    }

    #[test]
    fn test_parse_page_url() {
        assert!(parse_page_url("https://example.com/a").is_ok());
        assert!(matches!(parse_page_url("example.com"), Err(ReaderError::InvalidUrl(_))));
        assert!(matches!(parse_page_url("ftp://example.com/a"), Err(ReaderError::InvalidUrl(_))));
    }

    #[cfg(feature = "fetch")]
    #[tokio::test]
    async fn test_fetch_url_invalid() {
        let result = fetch_url("not-a-url", &FetchConfig::default()).await;
        assert!(matches!(result, Err(ReaderError::InvalidUrl(_))));
    }

    #[test]
    fn test_fetch_file_not_found() {
        let result = fetch_file("/nonexistent/path/file.html");
        assert!(matches!(result, Err(ReaderError::FileNotFound(_))));
    }

    #[test]
    fn test_fetch_file_reads_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.html");
        std::fs::write(&path, "<p>hi</p>").unwrap();
        assert_eq!(fetch_file(path.to_str().unwrap()).unwrap(), "<p>hi</p>");
    }
}
