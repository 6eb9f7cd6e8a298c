use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};
use eyre::{Result, eyre};
use log::{debug, warn};
use reqwest::{Client, ClientBuilder, Url};
use serde::de::DeserializeOwned;

use crate::utils::config::FetchConfig;

/// HTTP client with a per-request timeout and bounded retries on transient failures.
pub struct HttpClient {
    client: Client,
    max_retries: usize,
}

impl HttpClient {
    pub fn new(fetch: &FetchConfig) -> Result<Self> {
        Ok(Self {
            client: builder(fetch).build()?,
            max_retries: fetch.max_retries,
        })
    }

    /// Client for loopback servers, ignoring any proxy set in the environment.
    #[cfg(test)]
    pub(crate) fn local(fetch: &FetchConfig) -> Result<Self> {
        Ok(Self {
            client: builder(fetch).no_proxy().build()?,
            max_retries: fetch.max_retries,
        })
    }

    pub async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let body = self.get_text(url.clone()).await?;
        serde_json::from_str(&body).map_err(|e| eyre!("malformed response from {}: {}", url, e))
    }

    pub async fn get_text(&self, url: Url) -> Result<String> {
        debug!("GET {}", url);

        (|| async {
            let response = self.client.get(url.clone()).send().await?;
            let response = response.error_for_status()?;
            Ok::<_, reqwest::Error>(response.text().await?)
        })
        .retry(
            ExponentialBuilder::default()
                .with_min_delay(Duration::from_millis(250))
                .with_max_times(self.max_retries),
        )
        .when(is_transient)
        .notify(|err, delay| warn!("request to {} failed ({}), retrying in {:?}", url, err, delay))
        .await
        .map_err(|e| eyre!("request to {} failed: {}", url, e))
    }
}

fn builder(fetch: &FetchConfig) -> ClientBuilder {
    Client::builder()
        .user_agent(fetch.user_agent.as_str())
        .timeout(Duration::from_secs(fetch.timeout_secs))
}

fn is_transient(err: &reqwest::Error) -> bool {
    err.is_timeout()
        || err.is_connect()
        || err.status().is_some_and(|status| status.is_server_error())
}
