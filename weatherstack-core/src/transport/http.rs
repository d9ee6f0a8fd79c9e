use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::{config::Config, error::WeatherstackError};

use super::Transport;

pub const HTTP_BASE_URL: &str = "http://api.weatherstack.com";
pub const HTTPS_BASE_URL: &str = "https://api.weatherstack.com";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// reqwest-backed transport that signs every URL with the access key.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    access_key: String,
    base_url: String,
    http: Client,
}

impl HttpTransport {
    /// Plain-HTTP transport; the free weatherstack plan has no TLS.
    pub fn new(access_key: String) -> Result<Self, WeatherstackError> {
        Self::with_base_url(access_key, HTTP_BASE_URL)
    }

    pub fn with_base_url(access_key: String, base_url: &str) -> Result<Self, WeatherstackError> {
        Self::with_timeout(access_key, base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        access_key: String,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, WeatherstackError> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self { access_key, base_url: base_url.trim_end_matches('/').to_string(), http })
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let access_key = config.access_key()?;
        Ok(Self::with_base_url(access_key.to_owned(), &config.base_url())?)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: i64,
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    info: String,
}

/// weatherstack reports most failures as `{"success": false, "error": {...}}`.
///
/// A `success: false` body is always an error, even when `error` is missing
/// or malformed.
fn error_envelope(body: &Value) -> Option<WeatherstackError> {
    let failed = body.get("success").and_then(Value::as_bool) == Some(false);
    let parsed = body
        .get("error")
        .filter(|error| error.is_object())
        .and_then(|error| ErrorBody::deserialize(error).ok());

    match parsed {
        Some(ErrorBody { code, kind, info }) => Some(WeatherstackError::Api { code, kind, info }),
        None if failed => Some(WeatherstackError::Api {
            code: 0,
            kind: "unknown".to_string(),
            info: truncate_body(&body.to_string()),
        }),
        None => None,
    }
}

/// URL without its query string, which carries the access key.
fn redact(url: &str) -> &str {
    url.split_once('?').map_or(url, |(path, _)| path)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn url(&self, path: &str) -> Result<String, WeatherstackError> {
        let raw = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let mut url = Url::parse(&raw).map_err(|e| WeatherstackError::InvalidUrl(raw.clone(), e))?;
        url.query_pairs_mut().append_pair("access_key", &self.access_key);

        Ok(url.into())
    }

    async fn get(&self, url: &str) -> Result<Value, WeatherstackError> {
        debug!(url = redact(url), "GET");

        let res = self.http.get(url).send().await?;
        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            warn!(url = redact(url), %status, "weatherstack request failed");
            return Err(WeatherstackError::Status { status, body: truncate_body(&body) });
        }

        let value: Value = serde_json::from_str(&body)?;

        if let Some(err) = error_envelope(&value) {
            warn!(url = redact(url), error = %err, "weatherstack returned an error");
            return Err(err);
        }

        Ok(value)
    }
}
