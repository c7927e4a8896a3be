//! The query pipeline: cache, provider fan-out and normalization
//!
//! ```ignore
//! use inspr::{CaseStyle, Engine, Settings};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = Engine::new(Settings::default().with_env_overrides())?;
//!     match engine.inspire("苹果", CaseStyle::LowerCamelCase).await {
//!         Ok(candidates) => println!("{:?}", candidates),
//!         Err(status) => eprintln!("{}", status),
//!     }
//!     Ok(())
//! }
//! ```

use crate::cache::ResultCache;
use crate::case_style::CaseStyle;
use crate::mt::aggregator::aggregate;
use crate::mt::registry::ProviderRegistry;
use crate::mt::translator::{ProviderId, Translator};
use crate::normalizer::normalize;
use crate::settings::{ConfigError, Settings};
use crate::status::Status;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, warn};

struct EngineState {
    settings: Arc<Settings>,
    registry: ProviderRegistry,
    /// Bumped whenever cached results become stale
    generation: u64,
}

pub struct Engine {
    state: RwLock<EngineState>,
    cache: ResultCache,
}

impl Engine {
    /// Longest selection, in characters, that is sent to the providers
    pub const MAXIMUM_QUERY_CHARS: usize = 64;

    pub fn new(settings: Settings) -> Result<Self, ConfigError> {
        let registry = ProviderRegistry::from_settings(&settings)?;
        Ok(Self::with_registry(settings, registry))
    }

    /// Use an already built registry instead of the settings' providers
    pub fn with_registry(settings: Settings, registry: ProviderRegistry) -> Self {
        let cache = ResultCache::new(settings.maximum_cache_words);
        Self {
            state: RwLock::new(EngineState {
                settings: Arc::new(settings),
                registry,
                generation: 0,
            }),
            cache,
        }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, EngineState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, EngineState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn settings(&self) -> Arc<Settings> {
        Arc::clone(&self.read_state().settings)
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    /// Suggest identifiers for the selected text
    ///
    /// Blank selections and selections longer than
    /// [`Engine::MAXIMUM_QUERY_CHARS`] are a no-op and yield an empty list.
    /// Any other query either yields a non-empty list or the status
    /// explaining why there is none.
    pub async fn inspire(&self, selection: &str, style: CaseStyle) -> Result<Vec<String>, Status> {
        let phrase = selection.trim();
        if phrase.is_empty() {
            return Ok(Vec::new());
        }
        if phrase.chars().count() > Self::MAXIMUM_QUERY_CHARS {
            warn!(
                chars = phrase.chars().count(),
                max = Self::MAXIMUM_QUERY_CHARS,
                "Selection too long, skipping"
            );
            return Ok(Vec::new());
        }

        if let Some(hit) = self.cache.get(phrase, style) {
            debug!(phrase = %phrase, style = %style, "Cache hit");
            return Ok(hit);
        }

        let (settings, translators, generation) = {
            let state = self.read_state();
            (
                Arc::clone(&state.settings),
                state.registry.select(&state.settings.dictionary_source),
                state.generation,
            )
        };

        info!(phrase = %phrase, style = %style, providers = translators.len(), "Searching");
        let outcome = aggregate(phrase, &translators).await;
        if !outcome.status.is_ok() {
            info!(phrase = %phrase, status = ?outcome.status, "Search failed");
            return Err(outcome.status);
        }

        let candidates = normalize(&outcome.candidates, &settings.ignore_words, style);
        if candidates.is_empty() {
            return Err(Status::EmptyResponse);
        }

        self.store(phrase, style, &candidates, generation);
        Ok(candidates)
    }

    /// Cache a result unless the settings changed while it was computed
    fn store(&self, phrase: &str, style: CaseStyle, candidates: &[String], generation: u64) {
        // Holding the read lock keeps update_settings from invalidating mid-write
        let state = self.read_state();
        if state.generation != generation {
            debug!(phrase = %phrase, "Settings changed during search, not caching");
            return;
        }
        self.cache.put(phrase, style, candidates.to_vec());
    }

    /// Replace the live settings
    ///
    /// Cached results are dropped when the change can alter them, and
    /// providers are rebuilt when their credentials, proxy or timeout changed.
    pub fn update_settings(&self, settings: Settings) -> Result<(), ConfigError> {
        let mut state = self.write_state();

        if state.settings.providers_differ(&settings) {
            state.registry = ProviderRegistry::from_settings(&settings)?;
            debug!("Providers rebuilt");
        }

        if state.settings.output_differs(&settings) {
            self.cache.invalidate_all();
            state.generation += 1;
            info!("Settings changed, result cache invalidated");
        }

        self.cache.set_max_words(settings.maximum_cache_words);
        state.settings = Arc::new(settings);
        Ok(())
    }

    /// Let the configured providers fetch credentials ahead of the first query
    pub async fn warm_up(&self) -> Vec<(ProviderId, Status)> {
        let (registry, sources) = {
            let state = self.read_state();
            (state.registry.clone(), state.settings.dictionary_source.clone())
        };
        registry.warm_up(&sources).await
    }

    /// The translators a query would use right now, in order
    pub fn translators(&self) -> Vec<Arc<dyn Translator>> {
        let state = self.read_state();
        state.registry.select(&state.settings.dictionary_source)
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.read_state();
        f.debug_struct("Engine")
            .field("settings", &state.settings)
            .field("registry", &state.registry)
            .field("cached_phrases", &self.cache.len())
            .finish()
    }
}
