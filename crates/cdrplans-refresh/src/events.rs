//! Progress side-channel for refresh cycles.

use chrono::{DateTime, Utc};

use crate::{RefreshFailure, RefreshSummary};

#[derive(Debug, Clone, PartialEq)]
pub enum RefreshEvent {
    CycleStarted {
        providers: usize,
    },
    CatalogReused {
        brand: String,
        last_downloaded: Option<DateTime<Utc>>,
        plans: usize,
    },
    CatalogRefreshed {
        brand: String,
        plans: usize,
    },
    CatalogEmptied {
        brand: String,
        removed: bool,
    },
    CatalogFailed(RefreshFailure),
    DetailsClassified {
        checked: usize,
        fresh: usize,
        stale: usize,
    },
    DetailFetched {
        brand: String,
        plan_id: String,
    },
    DetailFailed(RefreshFailure),
    /// A write was skipped because a newer artifact was already on disk.
    ArtifactSuperseded {
        brand: String,
        plan_id: Option<String>,
        existing: DateTime<Utc>,
    },
    TaskCancelled {
        brand: String,
        plan_id: Option<String>,
    },
    CycleFinished(RefreshSummary),
}

/// Receives every [`RefreshEvent`] a coordinator emits. Called from the
/// coordinator's tasks, possibly concurrently.
pub trait RefreshObserver: Send + Sync {
    fn on_event(&self, event: &RefreshEvent);
}

/// Default observer: per-item outcomes at `debug`, phase totals at `info`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl RefreshObserver for TracingObserver {
    fn on_event(&self, event: &RefreshEvent) {
        match event {
            RefreshEvent::CycleStarted { providers } => {
                tracing::info!(providers, "refresh cycle started");
            }
            RefreshEvent::CatalogReused {
                brand,
                last_downloaded,
                plans,
            } => {
                tracing::debug!(brand = %brand, ?last_downloaded, plans, "catalog fresh; reused");
            }
            RefreshEvent::CatalogRefreshed { brand, plans } => {
                tracing::debug!(brand = %brand, plans, "catalog refreshed");
            }
            RefreshEvent::CatalogEmptied { brand, removed } => {
                tracing::debug!(brand = %brand, removed, "provider lists no plans");
            }
            RefreshEvent::CatalogFailed(failure) | RefreshEvent::DetailFailed(failure) => {
                tracing::debug!(
                    brand = %failure.brand,
                    plan_id = failure.plan_id.as_deref().unwrap_or("-"),
                    kind = %failure.kind,
                    error = %failure.message,
                    "refresh failed"
                );
            }
            RefreshEvent::DetailsClassified {
                checked,
                fresh,
                stale,
            } => {
                tracing::info!(checked, fresh, stale, "plan details classified");
            }
            RefreshEvent::DetailFetched { brand, plan_id } => {
                tracing::debug!(brand = %brand, plan_id = %plan_id, "plan detail saved");
            }
            RefreshEvent::ArtifactSuperseded {
                brand,
                plan_id,
                existing,
            } => {
                tracing::debug!(
                    brand = %brand,
                    plan_id = plan_id.as_deref().unwrap_or("-"),
                    %existing,
                    "newer artifact already on disk"
                );
            }
            RefreshEvent::TaskCancelled { brand, plan_id } => {
                tracing::debug!(
                    brand = %brand,
                    plan_id = plan_id.as_deref().unwrap_or("-"),
                    "task cancelled"
                );
            }
            RefreshEvent::CycleFinished(summary) => {
                tracing::info!(
                    providers = summary.providers_processed,
                    catalogs_refreshed = summary.catalogs_refreshed,
                    catalogs_reused = summary.catalogs_reused,
                    catalogs_emptied = summary.catalogs_emptied,
                    details_checked = summary.details_checked,
                    details_fresh = summary.details_fresh,
                    details_fetched = summary.details_fetched,
                    cancelled = summary.tasks_cancelled,
                    failures = summary.failures.len(),
                    "refresh cycle finished"
                );
            }
        }
    }
}
