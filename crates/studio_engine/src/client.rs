use std::sync::{mpsc, Arc};

use bytes::{Bytes, BytesMut};
use futures_util::StreamExt;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

use crate::{EngineEvent, ServiceConfig, StudioError};

/// `Accept` value sent with every JSON request.
pub(crate) const ACCEPT_JSON: &str = "application/json, text/plain, */*";

/// Receives pipeline events as they happen.
pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelProgressSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Discards every event.
pub struct NullProgressSink;

impl ProgressSink for NullProgressSink {
    fn emit(&self, _event: EngineEvent) {}
}

/// HTTP client for the effect service. Cheap to clone.
///
/// The pipeline operations live next to their stage: `upload`, `submit`,
/// `poll_job`/`generate` and the download strategies.
#[derive(Debug, Clone)]
pub struct StudioClient {
    http: reqwest::Client,
    config: Arc<ServiceConfig>,
}

impl StudioClient {
    pub fn new(config: ServiceConfig) -> Result<Self, StudioError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }
}

/// Status text as shown to users, e.g. `404 Not Found`.
pub(crate) fn status_text(status: StatusCode) -> String {
    status.to_string()
}

pub(crate) fn parse_url(raw: &str) -> Result<Url, StudioError> {
    Url::parse(raw).map_err(|err| StudioError::InvalidUrl {
        url: raw.to_string(),
        reason: err.to_string(),
    })
}

pub(crate) fn url_with_query(base: &str, key: &str, value: &str) -> Result<Url, StudioError> {
    Url::parse_with_params(base, &[(key, value)]).map_err(|err| StudioError::InvalidUrl {
        url: base.to_string(),
        reason: err.to_string(),
    })
}

pub(crate) async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, StudioError> {
    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

/// Collects a response body, refusing anything above `max_bytes`.
pub(crate) async fn read_body(
    response: reqwest::Response,
    max_bytes: u64,
) -> Result<Bytes, StudioError> {
    if let Some(content_len) = response.content_length() {
        if content_len > max_bytes {
            return Err(StudioError::TooLarge {
                max_bytes,
                actual: content_len,
            });
        }
    }

    let mut body = BytesMut::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        let next_len = body.len() as u64 + chunk.len() as u64;
        if next_len > max_bytes {
            return Err(StudioError::TooLarge {
                max_bytes,
                actual: next_len,
            });
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body.freeze())
}
