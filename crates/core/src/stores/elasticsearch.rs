use crate::query::{build_query, SearchBody};
use crate::traits::LogSearch;
use crate::{QueryOptions, SearchError, SearchResponse};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::io::Write;
use std::time::Duration;
use url::Url;

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(3);
pub const DEFAULT_ENDPOINT: &str = "http://localhost:9200";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub endpoint: String,
    /// Bounds connection establishment only. Zero means the 3 second default.
    pub connect_timeout: Duration,
    /// Overall deadline for connect, send and reading the body.
    pub request_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            connect_timeout: Duration::ZERO,
            request_timeout: None,
        }
    }
}

/// Search client for a single `_search` endpoint. Holds no connection state; every call
/// builds its own transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EsClient {
    endpoint: String,
    connect_timeout: Duration,
    request_timeout: Option<Duration>,
}

impl EsClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            connect_timeout: Duration::ZERO,
            request_timeout: None,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        let client = Self::new(config.endpoint.clone()).with_connect_timeout(config.connect_timeout);
        match config.request_timeout {
            Some(timeout) => client.with_request_timeout(timeout),
            None => client,
        }
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// A zero deadline leaves the request unbounded.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = (!timeout.is_zero()).then_some(timeout);
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }

    pub fn effective_connect_timeout(&self) -> Duration {
        if self.connect_timeout.is_zero() {
            DEFAULT_CONNECT_TIMEOUT
        } else {
            self.connect_timeout
        }
    }

    pub fn search_url(&self) -> Result<Url, SearchError> {
        let mut url = Url::parse(&format!("{}/_search", self.endpoint.trim_end_matches('/')))?;
        if !matches!(url.scheme(), "http" | "https") || !url.has_host() {
            return Err(SearchError::UnsupportedEndpoint(self.endpoint.clone()));
        }
        url.query_pairs_mut().append_pair("pretty", "true");
        Ok(url)
    }

    fn http_client(&self) -> Result<Client, SearchError> {
        let mut builder = Client::builder().connect_timeout(self.effective_connect_timeout());
        if let Some(timeout) = self.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(builder.build()?)
    }

    pub async fn search(&self, options: &QueryOptions) -> Result<SearchResponse, SearchError> {
        let body = build_query(options);
        let payload = serde_json::to_vec(&body)?;

        if options.show {
            echo_query(&body, &mut std::io::stdout().lock())?;
        }

        let url = self.search_url()?;
        let response = self
            .http_client()?
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await?;

        let status = response.status();
        let raw = response.bytes().await?;

        if !status.is_success() {
            return Err(SearchError::BackendResponse {
                backend: "elasticsearch".to_string(),
                details: format!("{status}: {}", String::from_utf8_lossy(&raw)),
            });
        }

        serde_json::from_slice(&raw).map_err(SearchError::Decode)
    }
}

/// Writes the query document as pretty JSON followed by a separator line.
pub fn echo_query(body: &SearchBody, out: &mut impl Write) -> Result<(), SearchError> {
    writeln!(out, "ES Query: {}", serde_json::to_string_pretty(body)?)?;
    writeln!(out, "--------------------------\n")?;
    out.flush()?;
    Ok(())
}

#[async_trait]
impl LogSearch for EsClient {
    async fn search(&self, options: &QueryOptions) -> Result<SearchResponse, SearchError> {
        EsClient::search(self, options).await
    }
}
