//! Concurrent fan-out to the configured providers
//!
//! All provider calls are spawned before any of them is awaited, so a query
//! costs about as much as its slowest provider. Results are then joined in
//! provider order, which keeps the merged candidate list reproducible.

use crate::mt::translator::{Outcome, Translator};
use crate::status::Status;
use std::sync::Arc;
use tracing::{debug, warn};

/// Translate `phrase` with every translator and merge the outcomes
///
/// An empty translator list makes no calls and yields an empty success.
pub async fn aggregate(phrase: &str, translators: &[Arc<dyn Translator>]) -> Outcome {
    let handles: Vec<_> = translators
        .iter()
        .map(|translator| {
            let translator = Arc::clone(translator);
            let phrase = phrase.to_string();
            debug!(provider = translator.provider_name(), phrase = %phrase, "Dispatching query");
            tokio::spawn(async move { translator.translate(&phrase).await })
        })
        .collect();

    let mut outcomes = Vec::with_capacity(handles.len());
    for (handle, translator) in handles.into_iter().zip(translators) {
        let outcome = match handle.await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(provider = translator.provider_name(), error = %e, "Translator task failed");
                Outcome::failed(Status::NetworkError)
            }
        };
        debug!(
            provider = translator.provider_name(),
            status = ?outcome.status,
            candidates = outcome.candidates.len(),
            "Provider finished"
        );
        outcomes.push(outcome);
    }

    merge(outcomes)
}

/// Reduce per-provider outcomes, given in provider order, to one
///
/// The merged status is `Ok` when any provider succeeded, otherwise the
/// first failure. Candidates keep provider order and each provider's own
/// order; duplicates are left for the normalizer.
pub fn merge(outcomes: Vec<Outcome>) -> Outcome {
    let status = if outcomes.iter().any(|o| o.status.is_ok()) {
        Status::Ok
    } else {
        outcomes.first().map_or(Status::Ok, |o| o.status)
    };

    let candidates = outcomes.into_iter().flat_map(|o| o.candidates).collect();
    Outcome { status, candidates }
}
