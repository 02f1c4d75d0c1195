//! Main repository contents client.

use crate::error::{RepoClientError, Result};
use crate::types::{RepoConfig, RepoEntry};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Default contents API host.
const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Default raw file host.
const DEFAULT_RAW_BASE: &str = "https://raw.githubusercontent.com";

/// Client for a repository's contents API.
///
/// Holds no state beyond the repository coordinates and the HTTP client;
/// every [`list_entries`](RepoClient::list_entries) call is one request,
/// and [`raw_url`](RepoClient::raw_url) is pure string construction.
pub struct RepoClient {
    http: Client,
    config: RepoConfig,
    api_base: String,
    raw_base: String,
}

impl RepoClient {
    /// Create a client against the default hosts.
    pub fn new(config: RepoConfig) -> Result<Self> {
        Self::with_endpoints(config, DEFAULT_API_BASE, DEFAULT_RAW_BASE)
    }

    /// Create a client against explicit API and raw hosts.
    ///
    /// Used by tests to point at a mock server; the default hosts are
    /// right for everything else.
    pub fn with_endpoints(
        config: RepoConfig,
        api_base: impl Into<String>,
        raw_base: impl Into<String>,
    ) -> Result<Self> {
        for (field, value) in [
            ("owner", &config.owner),
            ("repo", &config.repo),
            ("branch", &config.branch),
        ] {
            if value.trim().is_empty() {
                return Err(RepoClientError::InvalidConfig(format!(
                    "{field} cannot be empty"
                )));
            }
        }

        let api_base = normalize_base(api_base.into())?;
        let raw_base = normalize_base(raw_base.into())?;

        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("ReelPlayer/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(RepoClientError::Request)?;

        Ok(Self {
            http,
            config,
            api_base,
            raw_base,
        })
    }

    /// The repository coordinates this client is bound to.
    pub fn config(&self) -> &RepoConfig {
        &self.config
    }

    /// List one directory of the repository tree.
    ///
    /// `path` is repository-relative; the empty string lists the root.
    /// Exactly one request is issued and errors are surfaced as-is:
    /// 404 → [`RepoClientError::NotFound`], 403/429 →
    /// [`RepoClientError::RateLimited`], other non-2xx →
    /// [`RepoClientError::Api`].
    pub async fn list_entries(&self, path: &str) -> Result<Vec<RepoEntry>> {
        let url = format!(
            "{}/repos/{}/{}/contents/{}?ref={}",
            self.api_base,
            encoding::encode_segment(&self.config.owner),
            encoding::encode_segment(&self.config.repo),
            encoding::encode_path(path),
            encoding::encode_query(&self.config.branch),
        );
        debug!(url = %url, path = %path, "Listing repository contents");

        let response = self.http.get(&url).send().await?;
        let status = response.status();

        if status.is_success() {
            let entries: Vec<RepoEntry> = response.json().await.map_err(|e| {
                RepoClientError::Parse(format!("Failed to parse listing for {path:?}: {e}"))
            })?;

            debug!(path = %path, entries = entries.len(), "Listed repository contents");
            Ok(entries)
        } else if status.as_u16() == 404 {
            Err(RepoClientError::NotFound(path.to_string()))
        } else if status.as_u16() == 403 || status.as_u16() == 429 {
            // GitHub signals primary rate limits with 403, secondary with
            // 429; both may carry Retry-After.
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            Err(RepoClientError::RateLimited { retry_after_secs })
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(RepoClientError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }

    /// Resolve a repository path to its raw-download URL.
    ///
    /// Pure string construction; the returned URL is what gets handed to
    /// the audio sink, which performs its own range-request streaming.
    pub fn raw_url(&self, path: &str) -> String {
        format!(
            "{}/{}/{}/{}/{}",
            self.raw_base,
            encoding::encode_segment(&self.config.owner),
            encoding::encode_segment(&self.config.repo),
            encoding::encode_segment(&self.config.branch),
            encoding::encode_path(path),
        )
    }
}

fn normalize_base(base: String) -> Result<String> {
    let base = base.trim_end_matches('/').to_string();
    if !base.starts_with("http://") && !base.starts_with("https://") {
        return Err(RepoClientError::InvalidConfig(format!(
            "endpoint must start with http:// or https://, got {base:?}"
        )));
    }
    Ok(base)
}

// URL encoding helpers
mod encoding {
    /// Percent-encode one path segment, keeping the RFC 3986 unreserved set.
    pub fn encode_segment(segment: &str) -> String {
        let mut out = String::with_capacity(segment.len());
        for &byte in segment.as_bytes() {
            match byte {
                b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                    out.push(byte as char);
                }
                _ => out.push_str(&format!("%{byte:02X}")),
            }
        }
        out
    }

    /// Percent-encode a repository-relative path, preserving `/` separators.
    pub fn encode_path(path: &str) -> String {
        path.split('/')
            .map(encode_segment)
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Encode a query-string value.
    pub fn encode_query(value: &str) -> String {
        url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> RepoClient {
        RepoClient::new(RepoConfig::new("octocat", "jukebox", "main")).expect("valid config")
    }

    #[test]
    fn empty_config_fields_rejected() {
        for config in [
            RepoConfig::new("", "jukebox", "main"),
            RepoConfig::new("octocat", "", "main"),
            RepoConfig::new("octocat", "jukebox", " "),
        ] {
            let result = RepoClient::new(config);
            assert!(matches!(result, Err(RepoClientError::InvalidConfig(_))));
        }
    }

    #[test]
    fn endpoints_require_http_scheme() {
        let result = RepoClient::with_endpoints(
            RepoConfig::new("octocat", "jukebox", "main"),
            "ftp://api.example.com",
            DEFAULT_RAW_BASE,
        );
        assert!(matches!(result, Err(RepoClientError::InvalidConfig(_))));
    }

    #[test]
    fn raw_url_joins_host_coordinates_and_path() {
        assert_eq!(
            client().raw_url("Mix/song.mp3"),
            "https://raw.githubusercontent.com/octocat/jukebox/main/Mix/song.mp3"
        );
    }

    #[test]
    fn raw_url_percent_encodes_but_preserves_separators() {
        assert_eq!(
            client().raw_url("Road Trip/01 - intro.mp3"),
            "https://raw.githubusercontent.com/octocat/jukebox/main/Road%20Trip/01%20-%20intro.mp3"
        );
    }

    #[test]
    fn raw_url_encodes_non_ascii() {
        assert_eq!(
            client().raw_url("Café/son.mp3"),
            "https://raw.githubusercontent.com/octocat/jukebox/main/Caf%C3%A9/son.mp3"
        );
    }
}
