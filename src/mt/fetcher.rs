//! Timeboxed HTTP/JSON fetching shared by all provider adapters

use crate::mt::error::{TransportError, TransportResult};
use crate::settings::ConfigError;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// HTTP method of a provider request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Parameters sent as the query string
    Get,
    /// Parameters sent as a form-encoded body
    Post,
}

/// HTTP client with a fixed deadline and optional proxy
///
/// Cloning is cheap and shares the underlying connection pool.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl Fetcher {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Build a fetcher; an empty proxy means a direct connection
    ///
    /// A non-empty proxy carries both `http://` and `https://` requests.
    pub fn new(timeout: Duration, proxy: Option<&str>) -> Result<Self, ConfigError> {
        let builder = reqwest::Client::builder().timeout(timeout);
        let builder = match proxy.map(str::trim).filter(|p| !p.is_empty()) {
            Some(proxy) => builder.proxy(
                reqwest::Proxy::all(proxy)
                    .map_err(|e| ConfigError::InvalidProxy(format!("{}: {}", proxy, e)))?,
            ),
            None => builder.no_proxy(),
        };

        let client = builder
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Issue one request and return the decoded body
    ///
    /// The body is decoded with the charset advertised by the server,
    /// UTF-8 when none is given.
    pub async fn fetch(
        &self,
        method: Method,
        url: &str,
        params: &[(&str, String)],
    ) -> TransportResult<String> {
        debug!(url = %url, method = ?method, "Sending provider request");

        let request = match method {
            Method::Get => self.client.get(url).query(params),
            Method::Post => self.client.post(url).form(params),
        };

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        Ok(response.text().await?)
    }

    /// Like [`Fetcher::fetch`], parsing the body as JSON
    ///
    /// A malformed body is not an error: it is logged and degrades to an
    /// empty object, which adapters read as "no candidates".
    pub async fn fetch_json(
        &self,
        method: Method,
        url: &str,
        params: &[(&str, String)],
    ) -> TransportResult<Value> {
        let body = self.fetch(method, url, params).await?;
        Ok(parse_json_lenient(&body))
    }
}

pub(crate) fn parse_json_lenient(body: &str) -> Value {
    match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, body = %body, "JSON parse error");
            Value::Object(serde_json::Map::new())
        }
    }
}

/// Read a provider error code that may be sent as a number or a numeric string
pub(crate) fn json_code(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
