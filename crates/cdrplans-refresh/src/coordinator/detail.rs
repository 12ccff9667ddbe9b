//! Detail classification and fetch phases, plus single-plan refresh.

use std::collections::HashSet;

use cdrplans_core::Provider;
use cdrplans_store::{validate_plan_id, WriteOutcome};
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};

use super::catalog::ProviderCatalog;
use super::Coordinator;
use crate::events::RefreshEvent;
use crate::{FailureKind, RefreshError, RefreshFailure, RefreshSummary};

/// Result of [`Coordinator::refresh_plan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailOutcome {
    /// The cached detail is within the detail TTL; nothing was fetched.
    Fresh,
    Fetched,
}

/// One (provider, plan) pair whose detail artifact may need refreshing.
pub(super) struct Candidate<'a> {
    provider: &'a Provider,
    key: String,
    plan_id: String,
}

impl Candidate<'_> {
    pub(super) fn cancelled_event(&self) -> RefreshEvent {
        RefreshEvent::TaskCancelled {
            brand: self.provider.brand_name.clone(),
            plan_id: Some(self.plan_id.clone()),
        }
    }
}

/// Every plan id of every catalog, deduplicated per provider.
pub(super) fn candidates<'a>(catalogs: &[ProviderCatalog<'a>]) -> Vec<Candidate<'a>> {
    let mut out = Vec::new();
    for catalog in catalogs {
        let key = catalog.provider.key();
        let mut seen = HashSet::new();
        for plan in &catalog.plans {
            if seen.insert(plan.plan_id.as_str()) {
                out.push(Candidate {
                    provider: catalog.provider,
                    key: key.clone(),
                    plan_id: plan.plan_id.clone(),
                });
            }
        }
    }
    out
}

pub(super) struct Classification<'a> {
    pub fresh: usize,
    pub stale: Vec<Candidate<'a>>,
    pub failures: Vec<RefreshFailure>,
    pub cancelled: Vec<Candidate<'a>>,
}

impl Classification<'_> {
    pub fn checked(&self) -> usize {
        self.fresh + self.stale.len() + self.failures.len()
    }
}

enum Classified {
    Fresh,
    Stale,
    Failed(RefreshFailure),
    Cancelled,
}

enum Fetched {
    Saved(WriteOutcome),
    Failed(RefreshFailure),
    Cancelled,
}

impl Coordinator {
    /// Reads each candidate's detail artifact and sorts it into fresh or
    /// stale. No network I/O.
    pub(super) async fn classify<'a>(
        &self,
        candidates: Vec<Candidate<'a>>,
        now: DateTime<Utc>,
    ) -> Classification<'a> {
        let results: Vec<(Candidate<'a>, Classified)> = stream::iter(
            candidates
                .into_iter()
                .map(|candidate| async move {
                    let classified = self.classify_one(&candidate, now).await;
                    (candidate, classified)
                })
                .collect::<Vec<_>>(),
        )
        .buffer_unordered(self.config.concurrency)
        .collect()
        .await;

        let mut classification = Classification {
            fresh: 0,
            stale: Vec::new(),
            failures: Vec::new(),
            cancelled: Vec::new(),
        };
        for (candidate, classified) in results {
            match classified {
                Classified::Fresh => classification.fresh += 1,
                Classified::Stale => classification.stale.push(candidate),
                Classified::Failed(failure) => classification.failures.push(failure),
                Classified::Cancelled => classification.cancelled.push(candidate),
            }
        }
        classification
    }

    async fn classify_one(&self, candidate: &Candidate<'_>, now: DateTime<Utc>) -> Classified {
        if self.cancel.is_cancelled() {
            return Classified::Cancelled;
        }
        match self
            .store
            .detail_freshness(&candidate.key, &candidate.plan_id)
            .await
        {
            Ok(freshness) if freshness.is_stale(self.config.detail_ttl, now) => Classified::Stale,
            Ok(_) => Classified::Fresh,
            Err(e) => Classified::Failed(RefreshFailure::detail(
                &candidate.provider.brand_name,
                &candidate.plan_id,
                FailureKind::Persistence,
                &e,
            )),
        }
    }

    /// Fetches and persists every stale candidate, at most
    /// `config.concurrency` at a time.
    pub(super) async fn detail_phase(
        &self,
        stale: Vec<Candidate<'_>>,
        summary: &mut RefreshSummary,
    ) {
        let results: Vec<(Candidate<'_>, Fetched)> = stream::iter(
            stale
                .into_iter()
                .map(|candidate| async move {
                    let fetched = self.fetch_one(&candidate).await;
                    (candidate, fetched)
                })
                .collect::<Vec<_>>(),
        )
        .buffer_unordered(self.config.concurrency)
        .collect()
        .await;

        for (candidate, fetched) in results {
            match fetched {
                Fetched::Saved(WriteOutcome::Written) => {
                    summary.details_fetched += 1;
                    self.emit(RefreshEvent::DetailFetched {
                        brand: candidate.provider.brand_name.clone(),
                        plan_id: candidate.plan_id,
                    });
                }
                Fetched::Saved(WriteOutcome::Superseded { existing }) => {
                    summary.details_fetched += 1;
                    self.emit(RefreshEvent::ArtifactSuperseded {
                        brand: candidate.provider.brand_name.clone(),
                        plan_id: Some(candidate.plan_id),
                        existing,
                    });
                }
                Fetched::Failed(failure) => {
                    self.emit(RefreshEvent::DetailFailed(failure.clone()));
                    summary.failures.push(failure);
                }
                Fetched::Cancelled => {
                    summary.tasks_cancelled += 1;
                    self.emit(candidate.cancelled_event());
                }
            }
        }
    }

    async fn fetch_one(&self, candidate: &Candidate<'_>) -> Fetched {
        if self.cancel.is_cancelled() {
            return Fetched::Cancelled;
        }
        match self
            .fetch_and_save(candidate.provider, &candidate.plan_id)
            .await
        {
            Ok(outcome) => Fetched::Saved(outcome),
            Err(e) => Fetched::Failed(detail_failure(candidate.provider, &candidate.plan_id, &e)),
        }
    }

    async fn fetch_and_save(
        &self,
        provider: &Provider,
        plan_id: &str,
    ) -> Result<WriteOutcome, RefreshError> {
        let detail = self
            .client
            .fetch_plan_detail(provider, plan_id)
            .await
            .map_err(|source| RefreshError::Fetch {
                brand: provider.brand_name.clone(),
                plan_id: plan_id.to_owned(),
                source,
            })?;
        let outcome = self
            .store
            .write_detail(&provider.key(), detail, Utc::now())
            .await?;
        Ok(outcome)
    }

    /// Refreshes one plan detail if it is stale, or unconditionally when
    /// `force` is set.
    ///
    /// # Errors
    ///
    /// - [`RefreshError::Cancelled`] if the coordinator was cancelled.
    /// - [`RefreshError::Store`] for an unusable plan id or a failed read/write.
    /// - [`RefreshError::Fetch`] if the provider request fails.
    pub async fn refresh_plan(
        &self,
        provider: &Provider,
        plan_id: &str,
        force: bool,
    ) -> Result<DetailOutcome, RefreshError> {
        if self.cancel.is_cancelled() {
            return Err(RefreshError::Cancelled);
        }
        validate_plan_id(plan_id)?;
        self.store.ensure_root().await?;

        if !force {
            let freshness = self
                .store
                .detail_freshness(&provider.key(), plan_id)
                .await?;
            if !freshness.is_stale(self.config.detail_ttl, Utc::now()) {
                tracing::debug!(brand = %provider.brand_name, plan_id, "plan detail fresh");
                return Ok(DetailOutcome::Fresh);
            }
        }

        match self.fetch_and_save(provider, plan_id).await {
            Ok(WriteOutcome::Written) => {
                self.emit(RefreshEvent::DetailFetched {
                    brand: provider.brand_name.clone(),
                    plan_id: plan_id.to_owned(),
                });
                Ok(DetailOutcome::Fetched)
            }
            Ok(WriteOutcome::Superseded { existing }) => {
                self.emit(RefreshEvent::ArtifactSuperseded {
                    brand: provider.brand_name.clone(),
                    plan_id: Some(plan_id.to_owned()),
                    existing,
                });
                Ok(DetailOutcome::Fetched)
            }
            Err(e) => {
                self.emit(RefreshEvent::DetailFailed(detail_failure(
                    provider, plan_id, &e,
                )));
                Err(e)
            }
        }
    }
}

fn detail_failure(provider: &Provider, plan_id: &str, error: &RefreshError) -> RefreshFailure {
    let kind = error.kind().unwrap_or(FailureKind::Persistence);
    match error {
        RefreshError::Fetch { source, .. } => {
            RefreshFailure::detail(&provider.brand_name, plan_id, kind, source)
        }
        other => RefreshFailure::detail(&provider.brand_name, plan_id, kind, other),
    }
}
