//! Microsoft Translator (legacy HTTP API) provider
//!
//! Calls are authorized with an OAuth bearer token obtained from the
//! client-credentials endpoint. The token is cached per translator and reused
//! until three quarters of its lifetime have passed. Refreshing happens while
//! holding the token lock, so concurrent queries wait for a single refresh
//! instead of racing several.

use crate::mt::error::TransportError;
use crate::mt::fetcher::{Fetcher, Method, json_code};
use crate::mt::translator::{Outcome, ProviderId, Translator};
use crate::status::Status;
use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Text content of every `<string ...>...</string>` element
static STRING_ELEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<string[^>]*>(.*?)</string>").expect("string element pattern is valid")
});

#[derive(Debug, Clone)]
struct AccessToken {
    bearer: String,
    acquired_at: Instant,
    expires_in: Duration,
}

impl AccessToken {
    fn is_fresh(&self, now: Instant) -> bool {
        now < self.acquired_at + self.expires_in.mul_f64(0.75)
    }
}

pub struct MicrosoftTranslator {
    client_id: String,
    client_secret: String,
    oauth_endpoint: String,
    endpoint: String,
    fetcher: Fetcher,
    token: Mutex<Option<AccessToken>>,
}

impl MicrosoftTranslator {
    pub const OAUTH_ENDPOINT: &'static str =
        "https://datamarket.accesscontrol.windows.net/v2/OAuth2-13";
    pub const ENDPOINT: &'static str = "http://api.microsofttranslator.com/v2/Http.svc/Translate";

    const SCOPE: &'static str = "http://api.microsofttranslator.com";
    const GRANT_TYPE: &'static str = "client_credentials";

    pub fn new(client_id: String, client_secret: String, fetcher: Fetcher) -> Self {
        Self {
            client_id,
            client_secret,
            oauth_endpoint: Self::OAUTH_ENDPOINT.to_string(),
            endpoint: Self::ENDPOINT.to_string(),
            fetcher,
            token: Mutex::new(None),
        }
    }

    /// Point the provider at other token and translate URLs (local test servers)
    pub fn with_endpoints(
        mut self,
        oauth_endpoint: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        self.oauth_endpoint = oauth_endpoint.into();
        self.endpoint = endpoint.into();
        self
    }

    /// Return a usable `Bearer ...` credential, refreshing it when stale
    async fn latest_token(&self) -> Result<String, Status> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh(Instant::now())) {
            return Ok(token.bearer.clone());
        }

        debug!(provider = "Microsoft", "Refreshing access token");
        let params = [
            ("client_id", self.client_id.clone()),
            ("client_secret", self.client_secret.clone()),
            ("scope", Self::SCOPE.to_string()),
            ("grant_type", Self::GRANT_TYPE.to_string()),
        ];

        let json = self
            .fetcher
            .fetch_json(Method::Post, &self.oauth_endpoint, &params)
            .await
            .map_err(|e| {
                warn!(provider = "Microsoft", error = %e, "Access token request failed");
                Status::from(&e)
            })?;

        let Some(access_token) = json["access_token"].as_str().filter(|t| !t.is_empty()) else {
            warn!(provider = "Microsoft", "Token response has no access_token");
            *cached = None;
            return Err(Status::AuthError {
                provider: ProviderId::Microsoft,
            });
        };

        let expires_in = json
            .get("expires_in")
            .and_then(json_code)
            .unwrap_or(0)
            .max(0) as u64;

        let token = AccessToken {
            bearer: format!("Bearer {}", access_token),
            acquired_at: Instant::now(),
            expires_in: Duration::from_secs(expires_in),
        };
        let bearer = token.bearer.clone();
        *cached = Some(token);
        Ok(bearer)
    }

    /// Forget a token the translate endpoint rejected, unless it was already replaced
    async fn discard_token(&self, bearer: &str) {
        let mut cached = self.token.lock().await;
        if cached.as_ref().is_some_and(|t| t.bearer == bearer) {
            warn!(provider = "Microsoft", "Access token rejected, discarding it");
            *cached = None;
        }
    }
}

/// Extract the translations from the XML answer of the translate endpoint
fn parse_string_elements(body: &str) -> Vec<String> {
    STRING_ELEMENT
        .captures_iter(body)
        .filter_map(|caps| caps.get(1))
        .map(|m| unescape_xml(m.as_str()))
        .collect()
}

fn unescape_xml(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

impl std::fmt::Debug for MicrosoftTranslator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MicrosoftTranslator")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("oauth_endpoint", &self.oauth_endpoint)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

#[async_trait]
impl Translator for MicrosoftTranslator {
    async fn translate(&self, phrase: &str) -> Outcome {
        let bearer = match self.latest_token().await {
            Ok(bearer) => bearer,
            Err(status) => return Outcome::failed(status),
        };

        let params = [
            ("appId", bearer.clone()),
            ("text", phrase.to_string()),
            ("to", "en".to_string()),
        ];

        match self.fetcher.fetch(Method::Get, &self.endpoint, &params).await {
            Ok(body) => Outcome::ok(parse_string_elements(&body)),
            Err(e) => {
                debug!(provider = "Microsoft", error = %e, "Request failed");
                if matches!(e, TransportError::Status(400 | 401)) {
                    self.discard_token(&bearer).await;
                }
                Outcome::failed(Status::from(&e))
            }
        }
    }

    async fn warm_up(&self) -> Status {
        match self.latest_token().await {
            Ok(_) => Status::Ok,
            Err(status) => status,
        }
    }

    fn provider_name(&self) -> &str {
        ProviderId::Microsoft.as_str()
    }
}
