//! Provider instances keyed by [`ProviderId`]

use crate::mt::baidu::BaiduTranslator;
use crate::mt::fetcher::Fetcher;
use crate::mt::microsoft::MicrosoftTranslator;
use crate::mt::translator::{ProviderId, Translator};
use crate::mt::youdao::YoudaoTranslator;
use crate::settings::{ConfigError, Settings};
use crate::status::Status;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

#[derive(Clone, Default)]
pub struct ProviderRegistry {
    translators: HashMap<ProviderId, Arc<dyn Translator>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build every known provider from the credentials in `settings`
    ///
    /// All providers share one HTTP client configured with the settings'
    /// timeout and proxy.
    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        let fetcher = Fetcher::new(settings.request_timeout(), Some(&settings.http_proxy))?;

        let youdao = YoudaoTranslator::new(
            settings.youdao_key.clone(),
            settings.youdao_key_from.clone(),
            settings.full_inspiration,
            fetcher.clone(),
        );
        let baidu = BaiduTranslator::new(
            settings.baidu_appid.clone(),
            settings.baidu_secret_key.clone(),
            fetcher.clone(),
        );
        let microsoft = MicrosoftTranslator::new(
            settings.microsoft_client_id.clone(),
            settings.microsoft_client_secret_key.clone(),
            fetcher,
        );

        Ok(Self::new()
            .with(ProviderId::Youdao, Arc::new(youdao))
            .with(ProviderId::Baidu, Arc::new(baidu))
            .with(ProviderId::Microsoft, Arc::new(microsoft)))
    }

    pub fn with(mut self, id: ProviderId, translator: Arc<dyn Translator>) -> Self {
        self.translators.insert(id, translator);
        self
    }

    pub fn get(&self, id: ProviderId) -> Option<&Arc<dyn Translator>> {
        self.translators.get(&id)
    }

    /// Translators for `sources`, in order; unregistered ids are skipped
    pub fn select(&self, sources: &[ProviderId]) -> Vec<Arc<dyn Translator>> {
        sources
            .iter()
            .filter_map(|id| {
                let translator = self.translators.get(id);
                if translator.is_none() {
                    warn!(provider = %id, "No translator registered for dictionary source");
                }
                translator.cloned()
            })
            .collect()
    }

    /// Run every selected provider's warm-up concurrently
    ///
    /// Returns the statuses in `sources` order.
    pub async fn warm_up(&self, sources: &[ProviderId]) -> Vec<(ProviderId, Status)> {
        let handles: Vec<_> = sources
            .iter()
            .filter_map(|id| self.translators.get(id).map(|t| (*id, Arc::clone(t))))
            .map(|(id, translator)| (id, tokio::spawn(async move { translator.warm_up().await })))
            .collect();

        let mut statuses = Vec::with_capacity(handles.len());
        for (id, handle) in handles {
            let status = handle.await.unwrap_or(Status::NetworkError);
            if !status.is_ok() {
                warn!(provider = %id, status = ?status, "Warm-up failed");
            }
            statuses.push((id, status));
        }
        statuses
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.translators.keys().map(ProviderId::as_str).collect();
        names.sort_unstable();
        f.debug_struct("ProviderRegistry")
            .field("providers", &names)
            .finish()
    }
}
