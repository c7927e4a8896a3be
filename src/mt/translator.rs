//! Translator trait and provider identities
//!
//! Every translation backend implements [`Translator`]. The aggregator only
//! ever sees `Arc<dyn Translator>`, so adding a provider means one new
//! [`ProviderId`] variant and one implementation.
//!
//! # Example
//!
//! ```ignore
//! use inspr::mt::{MockMode, MockTranslator, Translator};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mock = MockTranslator::new(MockMode::Candidates(vec!["apple".to_string()]));
//!     let outcome = mock.translate("苹果").await;
//!     assert!(outcome.status.is_ok());
//! }
//! ```

use crate::status::Status;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Known translation backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderId {
    Youdao,
    Baidu,
    Microsoft,
}

impl ProviderId {
    pub const ALL: [ProviderId; 3] = [ProviderId::Youdao, ProviderId::Baidu, ProviderId::Microsoft];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Youdao => "Youdao",
            ProviderId::Baidu => "Baidu",
            ProviderId::Microsoft => "Microsoft",
        }
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProviderId::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown dictionary source: {}", s))
    }
}

/// Result of one provider call: a status plus the raw candidates in the
/// order the provider returned them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub status: Status,
    pub candidates: Vec<String>,
}

impl Outcome {
    pub fn ok(candidates: Vec<String>) -> Self {
        Self {
            status: Status::Ok,
            candidates,
        }
    }

    /// A failed call never carries candidates
    pub fn failed(status: Status) -> Self {
        Self {
            status,
            candidates: Vec::new(),
        }
    }
}

/// A translation backend
///
/// Implementations must not panic or propagate errors on expected failure
/// paths: every failure is folded into the returned [`Outcome`]'s status.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate a phrase into zero or more raw English candidates
    async fn translate(&self, phrase: &str) -> Outcome;

    /// Acquire whatever the provider needs before its first call
    ///
    /// Providers without credentials to prefetch report `Ok` without I/O.
    async fn warm_up(&self) -> Status {
        Status::Ok
    }

    /// Name of this provider, used in logs
    fn provider_name(&self) -> &str;
}
