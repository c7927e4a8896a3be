//! User settings
//!
//! Settings are read from a JSON file using the same keys as the editor
//! plugin's settings file. Every key is optional. Credentials can also come
//! from `INSPR_*` environment variables so they need not live in the file.

use crate::cache::ResultCache;
use crate::mt::fetcher::Fetcher;
use crate::mt::translator::ProviderId;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read settings file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse settings file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid HTTP proxy {0}")]
    InvalidProxy(String),

    #[error("Failed to create HTTP client: {0}")]
    HttpClient(String),
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Providers queried for every phrase, in this order
    pub dictionary_source: Vec<ProviderId>,
    /// Whether the editor should collapse the selection after replacing it
    pub clear_selection: bool,
    /// Tokens dropped from translations before case conversion
    pub ignore_words: Vec<String>,
    /// Keep related phrases even when they do not match the query exactly
    pub full_inspiration: bool,
    /// Proxy for HTTP requests; empty means a direct connection
    pub http_proxy: String,
    pub youdao_key: String,
    pub youdao_key_from: String,
    pub baidu_appid: String,
    pub baidu_secret_key: String,
    pub microsoft_client_id: String,
    #[serde(alias = "microsot_client_secret_key")]
    pub microsoft_client_secret_key: String,
    /// Cached phrase count above which the result cache is cleared
    pub maximum_cache_words: usize,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dictionary_source: vec![ProviderId::Baidu],
            clear_selection: true,
            ignore_words: ["A", "a", "the", "The"].map(String::from).to_vec(),
            full_inspiration: false,
            http_proxy: String::new(),
            youdao_key: String::new(),
            youdao_key_from: String::new(),
            baidu_appid: String::new(),
            baidu_secret_key: String::new(),
            microsoft_client_id: String::new(),
            microsoft_client_secret_key: String::new(),
            maximum_cache_words: ResultCache::DEFAULT_MAX_WORDS,
            request_timeout_secs: Fetcher::DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file; missing keys take their defaults
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Override credentials and proxy from `INSPR_*` environment variables
    pub fn with_env_overrides(mut self) -> Self {
        let overrides: [(&str, &mut String); 7] = [
            ("INSPR_YOUDAO_KEY", &mut self.youdao_key),
            ("INSPR_YOUDAO_KEY_FROM", &mut self.youdao_key_from),
            ("INSPR_BAIDU_APPID", &mut self.baidu_appid),
            ("INSPR_BAIDU_SECRET_KEY", &mut self.baidu_secret_key),
            ("INSPR_MICROSOFT_CLIENT_ID", &mut self.microsoft_client_id),
            ("INSPR_MICROSOFT_CLIENT_SECRET", &mut self.microsoft_client_secret_key),
            ("INSPR_HTTP_PROXY", &mut self.http_proxy),
        ];

        for (var, field) in overrides {
            if let Ok(value) = std::env::var(var) {
                if !value.trim().is_empty() {
                    *field = value;
                }
            }
        }
        self
    }

    /// Per-request deadline; `0` falls back to [`Fetcher::DEFAULT_TIMEOUT`]
    pub fn request_timeout(&self) -> Duration {
        match self.request_timeout_secs {
            0 => Fetcher::DEFAULT_TIMEOUT,
            secs => Duration::from_secs(secs),
        }
    }

    /// Whether switching from `self` to `other` needs freshly built providers
    pub fn providers_differ(&self, other: &Settings) -> bool {
        self.http_proxy != other.http_proxy
            || self.request_timeout_secs != other.request_timeout_secs
            || self.full_inspiration != other.full_inspiration
            || self.youdao_key != other.youdao_key
            || self.youdao_key_from != other.youdao_key_from
            || self.baidu_appid != other.baidu_appid
            || self.baidu_secret_key != other.baidu_secret_key
            || self.microsoft_client_id != other.microsoft_client_id
            || self.microsoft_client_secret_key != other.microsoft_client_secret_key
    }

    /// Whether results computed under `self` may differ under `other`
    pub fn output_differs(&self, other: &Settings) -> bool {
        self.dictionary_source != other.dictionary_source
            || self.ignore_words != other.ignore_words
            || self.providers_differ(other)
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("dictionary_source", &self.dictionary_source)
            .field("clear_selection", &self.clear_selection)
            .field("ignore_words", &self.ignore_words)
            .field("full_inspiration", &self.full_inspiration)
            .field("http_proxy", &self.http_proxy)
            .field("youdao_key", &"***")
            .field("youdao_key_from", &self.youdao_key_from)
            .field("baidu_appid", &self.baidu_appid)
            .field("baidu_secret_key", &"***")
            .field("microsoft_client_id", &self.microsoft_client_id)
            .field("microsoft_client_secret_key", &"***")
            .field("maximum_cache_words", &self.maximum_cache_words)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}
