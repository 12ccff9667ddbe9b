//! The refresh coordinator.
//!
//! One cycle runs three phases, each through its own bounded
//! `buffer_unordered` pool:
//!
//! 1. catalogs: reuse fresh catalogs, fetch and persist stale ones;
//! 2. classification: compare every (provider, plan) candidate's detail
//!    artifact against the detail TTL (file reads only);
//! 3. details: fetch and persist stale details.
//!
//! A task checks the cancellation token when it starts; a task that already
//! started runs to completion.

mod catalog;
mod detail;
mod dry_run;

use std::collections::HashSet;
use std::sync::Arc;

use cdrplans_client::CdrClient;
use cdrplans_core::Provider;
use cdrplans_store::ArtifactStore;
use chrono::Utc;
use tokio_util::sync::CancellationToken;

use crate::events::{RefreshEvent, RefreshObserver, TracingObserver};
use crate::{RefreshConfig, RefreshError, RefreshSummary};

pub use detail::DetailOutcome;

pub struct Coordinator {
    client: CdrClient,
    store: ArtifactStore,
    config: RefreshConfig,
    observer: Arc<dyn RefreshObserver>,
    cancel: CancellationToken,
}

impl Coordinator {
    /// # Errors
    ///
    /// Returns [`RefreshError::InvalidConfig`] if `config` is out of range.
    pub fn new(
        client: CdrClient,
        store: ArtifactStore,
        config: RefreshConfig,
    ) -> Result<Self, RefreshError> {
        config.validate()?;
        Ok(Self {
            client,
            store,
            config,
            observer: Arc::new(TracingObserver),
            cancel: CancellationToken::new(),
        })
    }

    /// Replaces the default [`TracingObserver`].
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn RefreshObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Uses an externally owned token, e.g. a child of a process-wide one.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// A handle that cancels this coordinator's pending tasks.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    #[must_use]
    pub fn config(&self) -> &RefreshConfig {
        &self.config
    }

    #[must_use]
    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Runs one refresh cycle over `providers`.
    ///
    /// Per-provider and per-plan failures are collected in the summary and
    /// never abort the cycle.
    ///
    /// # Errors
    ///
    /// Returns [`RefreshError::Store`] only if the store root cannot be
    /// created.
    pub async fn refresh(&self, providers: &[Provider]) -> Result<RefreshSummary, RefreshError> {
        self.store.ensure_root().await?;

        let providers = unique_providers(providers);
        let now = Utc::now();
        let mut summary = RefreshSummary::default();
        self.emit(RefreshEvent::CycleStarted {
            providers: providers.len(),
        });

        let catalogs = self.catalog_phase(&providers, now, &mut summary).await;

        let classification = self.classify(detail::candidates(&catalogs), now).await;
        summary.details_checked = classification.checked();
        summary.details_fresh = classification.fresh;
        self.emit(RefreshEvent::DetailsClassified {
            checked: classification.checked(),
            fresh: classification.fresh,
            stale: classification.stale.len(),
        });
        for failure in classification.failures {
            self.emit(RefreshEvent::DetailFailed(failure.clone()));
            summary.failures.push(failure);
        }
        for cancelled in &classification.cancelled {
            self.emit(cancelled.cancelled_event());
        }
        summary.tasks_cancelled += classification.cancelled.len();

        self.detail_phase(classification.stale, &mut summary).await;

        self.emit(RefreshEvent::CycleFinished(summary.clone()));
        Ok(summary)
    }

    fn emit(&self, event: RefreshEvent) {
        self.observer.on_event(&event);
    }
}

/// First provider per brand key; later duplicates would race on the same
/// artifact paths.
fn unique_providers(providers: &[Provider]) -> Vec<&Provider> {
    let mut seen = HashSet::new();
    providers
        .iter()
        .filter(|p| {
            let fresh = seen.insert(p.key());
            if !fresh {
                tracing::warn!(brand = %p.brand_name, "duplicate provider ignored");
            }
            fresh
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_brand_keys_are_dropped() {
        let providers = vec![
            Provider::new("Acme Energy", "https://api.acme.example/").unwrap(),
            Provider::new("ACME  energy", "https://other.acme.example/").unwrap(),
            Provider::new("Bolt Power", "https://cdr.bolt.example/").unwrap(),
        ];
        let unique = unique_providers(&providers);
        let names: Vec<&str> = unique.iter().map(|p| p.brand_name.as_str()).collect();
        assert_eq!(names, ["Acme Energy", "Bolt Power"]);
    }

    #[test]
    fn new_rejects_invalid_config() {
        let client = CdrClient::new(5, "cdrplans-test/0.1").unwrap();
        let config = RefreshConfig {
            concurrency: 0,
            ..RefreshConfig::default()
        };
        let result = Coordinator::new(client, ArtifactStore::new("/tmp/unused"), config);
        assert!(matches!(result, Err(RefreshError::InvalidConfig(_))));
    }
}
