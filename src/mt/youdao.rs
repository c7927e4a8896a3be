//! Youdao open API dictionary provider
//!
//! Sends the phrase with a static key pair and reads both the plain
//! `translation` list and the `web` (related phrase) entries of the JSON
//! answer. Related phrases are only kept when their key equals the queried
//! phrase, unless full inspiration is enabled.

use crate::mt::fetcher::{Fetcher, Method, json_code};
use crate::mt::translator::{Outcome, ProviderId, Translator};
use crate::status::Status;
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

#[derive(Clone)]
pub struct YoudaoTranslator {
    key: String,
    key_from: String,
    full_inspiration: bool,
    endpoint: String,
    fetcher: Fetcher,
}

impl YoudaoTranslator {
    pub const ENDPOINT: &'static str = "http://fanyi.youdao.com/openapi.do";

    pub fn new(key: String, key_from: String, full_inspiration: bool, fetcher: Fetcher) -> Self {
        Self {
            key,
            key_from,
            full_inspiration,
            endpoint: Self::ENDPOINT.to_string(),
            fetcher,
        }
    }

    /// Point the provider at another base URL (local test servers)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn params(&self, phrase: &str) -> Vec<(&'static str, String)> {
        vec![
            ("key", self.key.clone()),
            ("keyfrom", self.key_from.clone()),
            ("type", "data".to_string()),
            ("doctype", "json".to_string()),
            ("version", "1.1".to_string()),
            ("q", phrase.to_string()),
        ]
    }

    fn parse_response(&self, phrase: &str, json: &Value) -> Outcome {
        if let Some(raw) = json.get("errorCode") {
            // A code we cannot read is still an error report
            let code = json_code(raw).unwrap_or(-1);
            if code != 0 {
                return Outcome::failed(Status::ProviderError {
                    provider: ProviderId::Youdao,
                    code,
                });
            }
        }

        let mut candidates = Vec::new();
        if let Some(translations) = json["translation"].as_array() {
            candidates.extend(strings(translations));
        }

        if let Some(web) = json["web"].as_array() {
            for entry in web {
                let strictly_matched = entry["key"].as_str() == Some(phrase);
                if !(self.full_inspiration || strictly_matched) {
                    continue;
                }
                if let Some(values) = entry["value"].as_array() {
                    candidates.extend(strings(values));
                }
            }
        }

        Outcome::ok(candidates)
    }
}

fn strings(values: &[Value]) -> impl Iterator<Item = String> + '_ {
    values.iter().filter_map(Value::as_str).map(str::to_string)
}

impl std::fmt::Debug for YoudaoTranslator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YoudaoTranslator")
            .field("key", &"***")
            .field("key_from", &self.key_from)
            .field("full_inspiration", &self.full_inspiration)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

#[async_trait]
impl Translator for YoudaoTranslator {
    async fn translate(&self, phrase: &str) -> Outcome {
        let json = match self
            .fetcher
            .fetch_json(Method::Get, &self.endpoint, &self.params(phrase))
            .await
        {
            Ok(json) => json,
            Err(e) => {
                debug!(provider = "Youdao", error = %e, "Request failed");
                return Outcome::failed(Status::from(&e));
            }
        };

        self.parse_response(phrase, &json)
    }

    fn provider_name(&self) -> &str {
        ProviderId::Youdao.as_str()
    }
}
