//! Baidu general translation API provider
//!
//! Every request is signed with `md5(appid + q + salt + secret)` where `salt`
//! is a fresh random number per call.

use crate::mt::fetcher::{Fetcher, Method, json_code};
use crate::mt::translator::{Outcome, ProviderId, Translator};
use crate::status::Status;
use async_trait::async_trait;
use md5::{Digest, Md5};
use rand::Rng;
use serde_json::Value;
use std::ops::RangeInclusive;
use tracing::debug;

/// Codes Baidu uses to report success inside the `error_code` field
const SUCCESS_CODES: [i64; 2] = [0, 52000];

#[derive(Clone)]
pub struct BaiduTranslator {
    app_id: String,
    secret_key: String,
    endpoint: String,
    fetcher: Fetcher,
}

impl BaiduTranslator {
    pub const ENDPOINT: &'static str = "http://api.fanyi.baidu.com/api/trans/vip/translate";

    const SALT_RANGE: RangeInclusive<u32> = 32768..=65536;

    pub fn new(app_id: String, secret_key: String, fetcher: Fetcher) -> Self {
        Self {
            app_id,
            secret_key,
            endpoint: Self::ENDPOINT.to_string(),
            fetcher,
        }
    }

    /// Point the provider at another base URL (local test servers)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn salt() -> u32 {
        rand::thread_rng().gen_range(Self::SALT_RANGE)
    }

    /// Hex MD5 digest of `app_id + phrase + salt + secret_key`
    pub fn sign(&self, phrase: &str, salt: u32) -> String {
        let input = format!("{}{}{}{}", self.app_id, phrase, salt, self.secret_key);
        format!("{:x}", Md5::digest(input.as_bytes()))
    }

    fn params(&self, phrase: &str, salt: u32) -> Vec<(&'static str, String)> {
        vec![
            ("appid", self.app_id.clone()),
            ("from", "zh".to_string()),
            ("to", "en".to_string()),
            ("salt", salt.to_string()),
            ("sign", self.sign(phrase, salt)),
            ("q", phrase.to_string()),
        ]
    }

    fn parse_response(json: &Value) -> Outcome {
        if let Some(raw) = json.get("error_code") {
            // A code we cannot read is still an error report
            let code = json_code(raw).unwrap_or(-1);
            if !SUCCESS_CODES.contains(&code) {
                return Outcome::failed(Status::ProviderError {
                    provider: ProviderId::Baidu,
                    code,
                });
            }
        }

        let candidates = json["trans_result"]
            .as_array()
            .map(|results| {
                results
                    .iter()
                    .filter_map(|r| r["dst"].as_str())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Outcome::ok(candidates)
    }
}

impl std::fmt::Debug for BaiduTranslator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BaiduTranslator")
            .field("app_id", &self.app_id)
            .field("secret_key", &"***")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

#[async_trait]
impl Translator for BaiduTranslator {
    async fn translate(&self, phrase: &str) -> Outcome {
        let params = self.params(phrase, Self::salt());
        match self
            .fetcher
            .fetch_json(Method::Get, &self.endpoint, &params)
            .await
        {
            Ok(json) => Self::parse_response(&json),
            Err(e) => {
                debug!(provider = "Baidu", error = %e, "Request failed");
                Outcome::failed(Status::from(&e))
            }
        }
    }

    fn provider_name(&self) -> &str {
        ProviderId::Baidu.as_str()
    }
}
