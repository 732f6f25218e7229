use std::marker::PhantomData;
use std::time::Duration;

use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use thiserror::Error;

use seeker_core::{FailureKind, FetchFailure, RequestToken};

/// Transport configuration. There is deliberately no retry or backoff
/// setting: a failed request is surfaced once and retried only through an
/// explicit refetch by the caller.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    /// Hard deadline for the whole request; a breach surfaces as
    /// `FailureKind::Timeout`.
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

/// Opaque transport capability consumed by the engine. Implementations map
/// a search key to one typed payload; the token is carried through for
/// logging only.
#[async_trait::async_trait]
pub trait Fetcher<T>: Send + Sync {
    async fn fetch(&self, token: RequestToken, key: &str) -> Result<T, FetchFailure>;
}

/// Error constructing a [`JsonFetcher`], before any request is made.
#[derive(Debug, Error)]
pub enum FetcherBuildError {
    #[error("invalid base url: {0}")]
    BaseUrl(#[from] url::ParseError),
    #[error("http client construction failed: {0}")]
    Client(#[from] reqwest::Error),
}

/// Fetches `{base_url}?{query_param}={key}` and decodes the JSON body into
/// `T`. The key is percent-encoded by the URL builder, so arbitrary user
/// input is safe to pass through.
pub struct JsonFetcher<T> {
    client: reqwest::Client,
    base_url: reqwest::Url,
    query_param: String,
    settings: FetchSettings,
    _payload: PhantomData<fn() -> T>,
}

impl<T> JsonFetcher<T> {
    pub fn new(
        base_url: &str,
        query_param: impl Into<String>,
        settings: FetchSettings,
    ) -> Result<Self, FetcherBuildError> {
        let base_url = reqwest::Url::parse(base_url)?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()?;
        Ok(Self {
            client,
            base_url,
            query_param: query_param.into(),
            settings,
            _payload: PhantomData,
        })
    }
}

#[async_trait::async_trait]
impl<T: DeserializeOwned + Send + Sync> Fetcher<T> for JsonFetcher<T> {
    async fn fetch(&self, token: RequestToken, key: &str) -> Result<T, FetchFailure> {
        let mut url = self.base_url.clone();
        url.query_pairs_mut().append_pair(&self.query_param, key);
        seeker_logging::seeker_debug!("fetch start token={token} url={url}");

        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchFailure::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(too_large(self.settings.max_bytes, Some(content_len)));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(too_large(self.settings.max_bytes, Some(next_len)));
            }
            bytes.extend_from_slice(&chunk);
        }

        serde_json::from_slice(&bytes)
            .map_err(|err| FetchFailure::new(FailureKind::Decode, err.to_string()))
    }
}

fn too_large(max_bytes: u64, actual: Option<u64>) -> FetchFailure {
    FetchFailure::new(
        FailureKind::TooLarge { max_bytes, actual },
        "response too large",
    )
}

fn map_reqwest_error(err: reqwest::Error) -> FetchFailure {
    if err.is_timeout() {
        return FetchFailure::new(FailureKind::Timeout, err.to_string());
    }
    FetchFailure::new(FailureKind::Network, err.to_string())
}
