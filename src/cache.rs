//! Memoization of finished queries
//!
//! Entries map `(phrase, case style)` to the final candidate list. Eviction
//! is deliberately coarse: once more than `max_words` distinct phrases are
//! cached, the next write clears everything first.

use crate::case_style::CaseStyle;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

type Entries = HashMap<String, HashMap<CaseStyle, Vec<String>>>;

#[derive(Debug)]
pub struct ResultCache {
    max_words: AtomicUsize,
    entries: Mutex<Entries>,
}

impl ResultCache {
    pub const DEFAULT_MAX_WORDS: usize = 32768;

    pub fn new(max_words: usize) -> Self {
        Self {
            max_words: AtomicUsize::new(max_words),
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn entries(&self) -> MutexGuard<'_, Entries> {
        // Every mutation leaves the map consistent, so a poisoned lock is still usable
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, phrase: &str, style: CaseStyle) -> Option<Vec<String>> {
        self.entries()
            .get(phrase)
            .and_then(|styles| styles.get(&style))
            .cloned()
    }

    /// Store a finished result; empty results are never cached
    pub fn put(&self, phrase: &str, style: CaseStyle, result: Vec<String>) {
        if result.is_empty() {
            debug!(phrase = %phrase, "Refusing to cache an empty result");
            return;
        }

        let mut entries = self.entries();
        let max_words = self.max_words();
        if entries.len() > max_words {
            info!(phrases = entries.len(), max_words, "Result cache full, clearing");
            entries.clear();
        }

        entries
            .entry(phrase.to_string())
            .or_default()
            .insert(style, result);
    }

    pub fn invalidate_all(&self) {
        let mut entries = self.entries();
        if !entries.is_empty() {
            debug!(phrases = entries.len(), "Invalidating result cache");
        }
        entries.clear();
    }

    /// Number of distinct cached phrases
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    pub fn max_words(&self) -> usize {
        self.max_words.load(Ordering::Relaxed)
    }

    pub fn set_max_words(&self, max_words: usize) {
        self.max_words.store(max_words, Ordering::Relaxed);
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_WORDS)
    }
}
