use crate::address::Address;
use crate::error::{ALL_RELAYS_FAILED, ScrapeError};
use crate::relay::RelayEndpoint;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use scrapex_http::{HttpClient, HttpError, RequestOpts};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

const DIRECT_SOURCE: &str = "direct";
/// How much of a body is sniffed for NUL bytes before treating it as binary.
const BINARY_SNIFF_LEN: usize = 1024;

/// Transport knobs shared by the relay and direct fetchers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    /// Whole-request timeout for every attempt.
    pub timeout_ms: u64,
    pub connect_timeout_ms: u64,
    pub user_agent: String,
    /// Retry budget for the direct path. Relays are never retried.
    pub direct_retries: usize,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout_ms: 15_000,
            connect_timeout_ms: 5_000,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            direct_retries: 0,
        }
    }
}

impl FetchSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    fn client(&self) -> Result<HttpClient, HttpError> {
        Ok(
            HttpClient::with_connect_timeout(Duration::from_millis(self.connect_timeout_ms))?
                .with_timeout(self.timeout())
                .with_retries(self.direct_retries),
        )
    }

    fn user_agent_headers(&self) -> Result<HeaderMap, HttpError> {
        let mut headers = HeaderMap::new();
        let ua = HeaderValue::from_str(&self.user_agent)
            .map_err(|e| HttpError::Build(format!("invalid user agent: {e}")))?;
        headers.insert(USER_AGENT, ua);
        Ok(headers)
    }
}

/// Markup bytes as returned by a fetcher, not yet parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    source: String,
    body: Vec<u8>,
}

impl RawDocument {
    pub fn new(source: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            source: source.into(),
            body: body.into(),
        }
    }

    /// Relay name, or `direct`.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.body
    }

    /// The body as text. Bytes that are not UTF-8 become U+FFFD, so pages
    /// served as Latin-1 or windows-1252 still read; a leading BOM is kept.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Whether the body looks like a binary payload (image, archive, PDF)
    /// rather than markup: a NUL byte near the start.
    pub fn is_binary(&self) -> bool {
        self.body.iter().take(BINARY_SNIFF_LEN).any(|&b| b == 0)
    }
}

/// Something that turns an [`Address`] into markup.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, address: &Address) -> Result<RawDocument, ScrapeError>;
}

/// Tries each relay in order and returns the first successful body.
#[derive(Debug, Clone)]
pub struct RelayFetcher {
    http: HttpClient,
    relays: Vec<RelayEndpoint>,
    headers: HeaderMap,
    timeout: Duration,
}

impl RelayFetcher {
    pub fn new(relays: Vec<RelayEndpoint>, settings: &FetchSettings) -> Result<Self, HttpError> {
        let mut headers = settings.user_agent_headers()?;
        headers.insert(
            HeaderName::from_static("x-requested-with"),
            HeaderValue::from_static("XMLHttpRequest"),
        );
        Ok(Self {
            http: settings.client()?,
            relays,
            headers,
            timeout: settings.timeout(),
        })
    }

    pub fn relays(&self) -> &[RelayEndpoint] {
        &self.relays
    }
}

#[async_trait]
impl PageFetcher for RelayFetcher {
    async fn fetch(&self, address: &Address) -> Result<RawDocument, ScrapeError> {
        let encoded = address.encoded();
        let mut last_failure = None;

        for (idx, relay) in self.relays.iter().enumerate() {
            let url = relay.request_url(address, &encoded);
            tracing::debug!(
                relay = %relay.name,
                position = idx + 1,
                total = self.relays.len(),
                %address,
                "fetch.relay.attempt"
            );

            let opts = RequestOpts {
                timeout: Some(self.timeout),
                retries: Some(0),
                headers: Some(self.headers.clone()),
            };
            match self.http.get_bytes(&url, opts).await {
                Ok(body) => {
                    tracing::info!(
                        relay = %relay.name,
                        %address,
                        body_len = body.len(),
                        "fetch.relay.ok"
                    );
                    return Ok(RawDocument::new(relay.name.clone(), body));
                }
                Err(cause) => {
                    let failure = ScrapeError::RelayFailed {
                        relay: relay.name.clone(),
                        cause,
                    };
                    tracing::warn!(relay = %relay.name, error = %failure, "fetch.relay.failed");
                    last_failure = Some(failure);
                }
            }
        }

        let last_cause = match last_failure {
            Some(ScrapeError::RelayFailed { cause, .. }) => cause.to_string(),
            _ => ALL_RELAYS_FAILED.to_string(),
        };
        tracing::error!(%address, last_cause = %last_cause, "fetch.all_relays_failed");
        Err(ScrapeError::FetchFailed { last_cause })
    }
}

/// Fetches the address itself, with no relay in between.
///
/// Only useful where cross-origin restrictions do not apply. Never used as a
/// fallback by [`RelayFetcher`].
#[derive(Debug, Clone)]
pub struct DirectFetcher {
    http: HttpClient,
    headers: HeaderMap,
}

impl DirectFetcher {
    pub fn new(settings: &FetchSettings) -> Result<Self, HttpError> {
        Ok(Self {
            http: settings.client()?,
            headers: settings.user_agent_headers()?,
        })
    }
}

#[async_trait]
impl PageFetcher for DirectFetcher {
    async fn fetch(&self, address: &Address) -> Result<RawDocument, ScrapeError> {
        tracing::debug!(%address, "fetch.direct.attempt");
        let opts = RequestOpts {
            headers: Some(self.headers.clone()),
            ..Default::default()
        };
        match self.http.get_bytes(address.as_str(), opts).await {
            Ok(body) => {
                tracing::info!(%address, body_len = body.len(), "fetch.direct.ok");
                Ok(RawDocument::new(DIRECT_SOURCE, body))
            }
            Err(cause) => {
                let err = ScrapeError::DirectFailed { cause };
                tracing::error!(%address, error = %err, "fetch.direct.failed");
                Err(err)
            }
        }
    }
}

/// One-shot direct fetch with default settings.
pub async fn fetch_direct(address: &str) -> Result<RawDocument, ScrapeError> {
    let fetcher = DirectFetcher::new(&FetchSettings::default())
        .map_err(|cause| ScrapeError::DirectFailed { cause })?;
    fetcher.fetch(&Address::new(address)).await
}
