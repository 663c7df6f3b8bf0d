//! Reader for the log cache `read` endpoint.

use async_trait::async_trait;
use reqwest::Client;
use stratus_api_models::{LogCacheReadResponse, LogEnvelope};
use url::Url;

use crate::client::CloudControllerClient;
use crate::error::{ClientError, ClientResult};
use crate::warnings::Warnings;

/// Source of log envelopes for an application.
#[async_trait]
pub trait LogCacheClient: Send + Sync {
    /// Envelopes for `source_id` with a timestamp at or after `start_time`
    /// (nanoseconds since the epoch), oldest first.
    async fn read(&self, source_id: &str, start_time: i64) -> ClientResult<Vec<LogEnvelope>>;
}

/// [`LogCacheClient`] backed by the log cache HTTP API.
#[derive(Debug, Clone)]
pub struct HttpLogCacheClient {
    http: Client,
    base_url: Url,
}

impl HttpLogCacheClient {
    /// Reader for the log cache at `base_url`.
    #[must_use]
    pub const fn new(http: Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// Reader sharing the control-plane client's connection and headers,
    /// pointed at the log cache advertised by the root document.
    ///
    /// # Errors
    ///
    /// Returns an error when the root document cannot be fetched, does not
    /// advertise a log cache, or advertises an invalid URL.
    pub async fn discover(
        client: &CloudControllerClient,
        warnings: &mut Warnings,
    ) -> ClientResult<Self> {
        let root = client.get_root(warnings).await?;
        let href = root.log_cache_url().ok_or_else(|| ClientError::InvalidUrl {
            url: client.base_url().to_string(),
            reason: "root document does not advertise a log cache".to_string(),
        })?;
        let base_url = Url::parse(href).map_err(|err| ClientError::InvalidUrl {
            url: href.to_string(),
            reason: err.to_string(),
        })?;
        Ok(Self::new(client.http().clone(), base_url))
    }

    fn read_url(&self, source_id: &str, start_time: i64) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl {
                url: self.base_url.to_string(),
                reason: "URL cannot be used as a base".to_string(),
            })?
            .pop_if_empty()
            .extend(["api", "v1", "read", source_id]);
        url.query_pairs_mut()
            .append_pair("start_time", &start_time.to_string())
            .append_pair("envelope_types", "LOG");
        Ok(url)
    }
}

#[async_trait]
impl LogCacheClient for HttpLogCacheClient {
    async fn read(&self, source_id: &str, start_time: i64) -> ClientResult<Vec<LogEnvelope>> {
        let url = self.read_url(source_id, start_time)?;
        tracing::debug!(url = %url, "log cache read");
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::RawHttp {
                status: status.as_u16(),
                url: url.to_string(),
                body: body.trim().to_string(),
            });
        }

        let bytes = response.bytes().await.map_err(|source| ClientError::Transport {
            url: url.to_string(),
            source,
        })?;
        let decoded: LogCacheReadResponse =
            serde_json::from_slice(&bytes).map_err(|source| ClientError::Decode {
                url: url.to_string(),
                source,
            })?;
        Ok(decoded.envelopes.batch)
    }
}
