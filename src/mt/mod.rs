/// Translation providers
///
/// This module talks to the online dictionaries and turns their replies into
/// raw English candidates. Normalization into identifiers happens elsewhere.
///
/// # Overview
///
/// 1. **Fetcher** - Shared HTTP client with a single timeout and optional proxy
/// 2. **Translator trait & providers** - Youdao, Baidu and Microsoft adapters
/// 3. **Registry** - Provider instances built from the user settings
/// 4. **Aggregator** - Concurrent fan-out and merge of provider outcomes
///
/// # Example
///
/// ```ignore
/// use inspr::Settings;
/// use inspr::mt::{ProviderId, ProviderRegistry, aggregate};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let registry = ProviderRegistry::from_settings(&Settings::default())?;
///     let translators = registry.select(&[ProviderId::Baidu, ProviderId::Youdao]);
///     let outcome = aggregate("苹果", &translators).await;
///
///     println!("{:?}: {:?}", outcome.status, outcome.candidates);
///     Ok(())
/// }
/// ```
pub mod aggregator;
pub mod baidu;
pub mod error;
pub mod fetcher;
pub mod microsoft;
pub mod mock;
pub mod registry;
pub mod translator;
pub mod youdao;

pub use aggregator::{aggregate, merge};
pub use baidu::BaiduTranslator;
pub use error::{TransportError, TransportResult};
pub use fetcher::{Fetcher, Method};
pub use microsoft::MicrosoftTranslator;
pub use mock::{MockMode, MockTranslator};
pub use registry::ProviderRegistry;
pub use translator::{Outcome, ProviderId, Translator};
pub use youdao::YoudaoTranslator;
