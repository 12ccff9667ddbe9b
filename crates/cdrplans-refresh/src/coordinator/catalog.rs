//! Catalog phase: reuse fresh catalogs, fetch and persist stale ones.

use cdrplans_core::{PlanSummary, Provider};
use cdrplans_store::WriteOutcome;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};

use super::Coordinator;
use crate::events::RefreshEvent;
use crate::{FailureKind, RefreshFailure, RefreshSummary};

/// A provider's current plan list, the source of its detail candidates.
pub(super) struct ProviderCatalog<'a> {
    pub provider: &'a Provider,
    pub plans: Vec<PlanSummary>,
}

enum CatalogOutcome {
    Reused {
        last_downloaded: Option<DateTime<Utc>>,
        plans: Vec<PlanSummary>,
    },
    /// Fetched. A failed write is recorded, but the fetched plans still feed
    /// the detail phase.
    Refreshed {
        plans: Vec<PlanSummary>,
        write: Result<WriteOutcome, RefreshFailure>,
    },
    Emptied(Result<bool, RefreshFailure>),
    Failed(RefreshFailure),
    Cancelled,
}

impl Coordinator {
    pub(super) async fn catalog_phase<'a>(
        &self,
        providers: &[&'a Provider],
        now: DateTime<Utc>,
        summary: &mut RefreshSummary,
    ) -> Vec<ProviderCatalog<'a>> {
        let outcomes: Vec<(&'a Provider, CatalogOutcome)> = stream::iter(
            providers
                .iter()
                .copied()
                .map(
                    |provider| async move { (provider, self.refresh_catalog(provider, now).await) },
                )
                .collect::<Vec<_>>(),
        )
        .buffer_unordered(self.config.concurrency)
        .collect()
        .await;

        let mut catalogs = Vec::with_capacity(outcomes.len());
        for (provider, outcome) in outcomes {
            let brand = provider.brand_name.clone();
            if !matches!(outcome, CatalogOutcome::Cancelled) {
                summary.providers_processed += 1;
            }

            match outcome {
                CatalogOutcome::Reused {
                    last_downloaded,
                    plans,
                } => {
                    summary.catalogs_reused += 1;
                    self.emit(RefreshEvent::CatalogReused {
                        brand,
                        last_downloaded,
                        plans: plans.len(),
                    });
                    catalogs.push(ProviderCatalog { provider, plans });
                }
                CatalogOutcome::Refreshed { plans, write } => {
                    match write {
                        Ok(WriteOutcome::Written) => {
                            summary.catalogs_refreshed += 1;
                            self.emit(RefreshEvent::CatalogRefreshed {
                                brand,
                                plans: plans.len(),
                            });
                        }
                        Ok(WriteOutcome::Superseded { existing }) => {
                            summary.catalogs_refreshed += 1;
                            self.emit(RefreshEvent::ArtifactSuperseded {
                                brand,
                                plan_id: None,
                                existing,
                            });
                        }
                        Err(failure) => {
                            self.emit(RefreshEvent::CatalogFailed(failure.clone()));
                            summary.failures.push(failure);
                        }
                    }
                    catalogs.push(ProviderCatalog { provider, plans });
                }
                CatalogOutcome::Emptied(Ok(removed)) => {
                    summary.catalogs_emptied += 1;
                    self.emit(RefreshEvent::CatalogEmptied { brand, removed });
                }
                CatalogOutcome::Emptied(Err(failure)) | CatalogOutcome::Failed(failure) => {
                    self.emit(RefreshEvent::CatalogFailed(failure.clone()));
                    summary.failures.push(failure);
                }
                CatalogOutcome::Cancelled => {
                    summary.tasks_cancelled += 1;
                    self.emit(RefreshEvent::TaskCancelled {
                        brand,
                        plan_id: None,
                    });
                }
            }
        }
        catalogs
    }

    async fn refresh_catalog(&self, provider: &Provider, now: DateTime<Utc>) -> CatalogOutcome {
        if self.cancel.is_cancelled() {
            return CatalogOutcome::Cancelled;
        }

        let key = provider.key();
        match self.store.catalog_freshness(&key).await {
            Ok(freshness) if !freshness.is_stale(self.config.catalog_ttl, now) => {
                match self.store.read_catalog(&key).await {
                    Ok(Some(catalog)) => {
                        return CatalogOutcome::Reused {
                            last_downloaded: catalog.last_downloaded,
                            plans: catalog.plans,
                        };
                    }
                    Ok(None) => {}
                    Err(e) => {
                        tracing::warn!(brand = %key, error = %e, "cached catalog unreadable; refetching");
                    }
                }
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(brand = %key, error = %e, "cannot read catalog freshness; refetching");
            }
        }

        let plans = match self
            .client
            .fetch_catalog(provider, self.config.page_size)
            .await
        {
            Ok(plans) => plans,
            Err(e) => {
                return CatalogOutcome::Failed(RefreshFailure::catalog(
                    &provider.brand_name,
                    FailureKind::for_catalog(&e),
                    &e,
                ));
            }
        };

        if plans.is_empty() {
            let removed = self.store.remove_catalog(&key).await.map_err(|e| {
                RefreshFailure::catalog(&provider.brand_name, FailureKind::Persistence, &e)
            });
            return CatalogOutcome::Emptied(removed);
        }

        let write = self
            .store
            .write_catalog(&key, &plans, Utc::now())
            .await
            .map_err(|e| {
                RefreshFailure::catalog(&provider.brand_name, FailureKind::Persistence, &e)
            });
        CatalogOutcome::Refreshed { plans, write }
    }
}
