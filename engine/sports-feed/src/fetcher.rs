use crate::config::SourceConfig;
use crate::error::FeedResult;
use crate::models::{RawSnapshot, SourcePayload};
use async_trait::async_trait;
use futures::future::join_all;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Produces a raw snapshot of every configured source.
///
/// Implementations never fail as a whole: each source's outcome, success or
/// error, is recorded in the returned snapshot.
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    async fn fetch_all(&self) -> RawSnapshot;
}

/// Fetches the configured sources over HTTP
pub struct HttpFetcher {
    client: Client,
    urls: Vec<String>,
    auth_token: Option<String>,
    timeout: Duration,
}

impl HttpFetcher {
    /// Create a fetcher for the teams and games endpoints
    pub fn new(config: &SourceConfig) -> FeedResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("sports-feed/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            urls: config.urls().iter().map(|url| url.to_string()).collect(),
            auth_token: config.auth_token.clone(),
            timeout: config.request_timeout(),
        })
    }

    /// Fetch a single source, turning any failure into an error descriptor
    async fn fetch_source(&self, url: &str) -> SourcePayload {
        match self.get_json(url).await {
            Ok(body) => {
                debug!("Fetched {}", url);
                SourcePayload::Body(body)
            }
            Err(e) => {
                warn!("Fetch failed for {}: {}", url, e);
                SourcePayload::failed(e)
            }
        }
    }

    async fn get_json(&self, url: &str) -> Result<Value, reqwest::Error> {
        let mut request = self.client.get(url).timeout(self.timeout);
        if let Some(token) = &self.auth_token {
            request = request.header(AUTHORIZATION, token);
        }

        request.send().await?.error_for_status()?.json::<Value>().await
    }
}

#[async_trait]
impl SourceFetcher for HttpFetcher {
    async fn fetch_all(&self) -> RawSnapshot {
        let fetches = self.urls.iter().map(|url| async move {
            let payload = self.fetch_source(url).await;
            (url.clone(), payload)
        });

        join_all(fetches).await.into_iter().collect()
    }
}
