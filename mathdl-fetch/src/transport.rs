use crate::error::{FetchError, Result};
use crate::result::{ProbeMethod, ProbeResponse};
use reqwest::{Client, Url};
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::debug;

pub const DEFAULT_USER_AGENT: &str = concat!("mathdl/", env!("CARGO_PKG_VERSION"));

/// Network seam used by the download pipeline.
///
/// Both calls are single attempts; the caller decides what a failure means.
pub trait Transport {
    /// Ask the server about `url` without reading the response body.
    fn probe(
        &self,
        url: &str,
        method: ProbeMethod,
        timeout: Duration,
    ) -> impl Future<Output = Result<ProbeResponse>>;

    /// Download the full body of `url`. Non-success statuses are errors.
    fn fetch(&self, url: &str, timeout: Duration) -> impl Future<Output = Result<Vec<u8>>>;
}

pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        Self::with_user_agent(DEFAULT_USER_AGENT)
    }

    pub fn with_user_agent(user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .connect_timeout(Duration::from_secs(5))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;

        Ok(Self { client })
    }

    fn parse_url(url: &str) -> Result<Url> {
        Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", url, e)))
    }
}

impl Transport for ReqwestTransport {
    async fn probe(
        &self,
        url: &str,
        method: ProbeMethod,
        timeout: Duration,
    ) -> Result<ProbeResponse> {
        let parsed = Self::parse_url(url)?;
        let request = match method {
            ProbeMethod::Head => self.client.head(parsed),
            ProbeMethod::Get => self.client.get(parsed),
        };

        let start = Instant::now();
        let response = request.timeout(timeout).send().await?;

        let mut result = ProbeResponse::new(url.to_string(), response.status().as_u16());
        result.content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        debug!(
            "Probed {} ({:?}): {} {:?} in {:?}",
            url,
            method,
            result.status_code,
            result.content_type,
            start.elapsed()
        );

        // The body is dropped unread
        Ok(result)
    }

    async fn fetch(&self, url: &str, timeout: Duration) -> Result<Vec<u8>> {
        let parsed = Self::parse_url(url)?;
        debug!("Fetching {}", url);

        let response = self.client.get(parsed).timeout(timeout).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::StatusError {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        debug!("Fetched {} ({} bytes)", url, body.len());
        Ok(body.to_vec())
    }
}
