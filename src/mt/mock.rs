//! Mock translator for testing
//!
//! This module provides a deterministic, network-free translator for testing
//! the pipeline and for the CLI's `--mock` mode.
//!
//! # Example
//!
//! ```ignore
//! use inspr::mt::{MockMode, MockTranslator, Translator};
//!
//! #[tokio::test]
//! async fn test_translation() {
//!     let mock = MockTranslator::new(MockMode::Candidates(vec!["apple".to_string()]));
//!     let outcome = mock.translate("苹果").await;
//!     assert_eq!(outcome.candidates, vec!["apple"]);
//! }
//! ```

use crate::mt::translator::{Outcome, Translator};
use crate::status::Status;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Mock translation modes for testing different scenarios
#[derive(Debug, Clone)]
pub enum MockMode {
    /// Answer every phrase with the same candidates
    Candidates(Vec<String>),

    /// Per-phrase candidates; unknown phrases yield an empty success
    Mappings(HashMap<String, Vec<String>>),

    /// Simulate a failed call with the given status
    Fail(Status),

    /// Echo the phrase back as the only candidate
    Echo,
}

/// Mock translator that simulates various provider behaviors
///
/// Counts its calls so tests can check whether the network would have been hit.
#[derive(Debug)]
pub struct MockTranslator {
    name: String,
    mode: MockMode,
    /// Optional simulated network delay (in milliseconds)
    delay_ms: u64,
    calls: AtomicUsize,
}

impl MockTranslator {
    pub fn new(mode: MockMode) -> Self {
        Self::with_delay(mode, 0)
    }

    /// Create a MockTranslator with simulated network delay
    ///
    /// ```ignore
    /// let mock = MockTranslator::with_delay(MockMode::Echo, 50);
    /// // Each translation will take ~50ms
    /// ```
    pub fn with_delay(mode: MockMode, delay_ms: u64) -> Self {
        Self {
            name: "Mock Translator".to_string(),
            mode,
            delay_ms,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Number of `translate` calls served so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn apply_delay(&self) {
        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }
    }

    fn apply_translation(&self, phrase: &str) -> Outcome {
        match &self.mode {
            MockMode::Candidates(candidates) => Outcome::ok(candidates.clone()),
            MockMode::Mappings(map) => Outcome::ok(map.get(phrase).cloned().unwrap_or_default()),
            MockMode::Fail(status) => Outcome::failed(*status),
            MockMode::Echo => Outcome::ok(vec![phrase.to_string()]),
        }
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(&self, phrase: &str) -> Outcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.apply_delay().await;
        self.apply_translation(phrase)
    }

    fn provider_name(&self) -> &str {
        &self.name
    }
}
