//! Outcome reporting for refresh cycles.

use std::fmt;

use cdrplans_client::ClientError;
use serde::Serialize;

/// Why one provider or plan could not be refreshed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Transport failure, timeout, or non-2xx status.
    Network,
    /// Non-JSON body or missing expected fields.
    MalformedResponse,
    /// The provider no longer lists the plan.
    NotFound,
    /// Artifact could not be read or written.
    Persistence,
}

impl FailureKind {
    /// Classifies a catalog fetch error.
    #[must_use]
    pub fn for_catalog(error: &ClientError) -> Self {
        if error.is_malformed_response() {
            FailureKind::MalformedResponse
        } else {
            FailureKind::Network
        }
    }

    /// Classifies a detail fetch error. A 404 for a plan id the provider's own
    /// catalog listed means the plan was withdrawn.
    #[must_use]
    pub fn for_detail(error: &ClientError) -> Self {
        match error {
            ClientError::UnexpectedStatus { status: 404, .. } => FailureKind::NotFound,
            other => Self::for_catalog(other),
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FailureKind::Network => "network",
            FailureKind::MalformedResponse => "malformed response",
            FailureKind::NotFound => "not found",
            FailureKind::Persistence => "persistence",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshFailure {
    pub brand: String,
    /// `None` for catalog-level failures.
    pub plan_id: Option<String>,
    pub kind: FailureKind,
    pub message: String,
}

impl RefreshFailure {
    pub(crate) fn catalog(brand: &str, kind: FailureKind, error: &impl fmt::Display) -> Self {
        Self {
            brand: brand.to_owned(),
            plan_id: None,
            kind,
            message: error.to_string(),
        }
    }

    pub(crate) fn detail(
        brand: &str,
        plan_id: &str,
        kind: FailureKind,
        error: &impl fmt::Display,
    ) -> Self {
        Self {
            brand: brand.to_owned(),
            plan_id: Some(plan_id.to_owned()),
            kind,
            message: error.to_string(),
        }
    }
}

impl fmt::Display for RefreshFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.plan_id {
            Some(plan_id) => write!(
                f,
                "{} / {plan_id}: {}: {}",
                self.brand, self.kind, self.message
            ),
            None => write!(f, "{}: {}: {}", self.brand, self.kind, self.message),
        }
    }
}

/// Totals for one [`crate::Coordinator::refresh`] cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RefreshSummary {
    pub providers_processed: usize,
    pub catalogs_refreshed: usize,
    pub catalogs_reused: usize,
    pub catalogs_emptied: usize,
    pub details_checked: usize,
    pub details_fresh: usize,
    pub details_fetched: usize,
    /// Catalog, classification and detail tasks skipped after cancellation.
    pub tasks_cancelled: usize,
    pub failures: Vec<RefreshFailure>,
}

impl RefreshSummary {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.tasks_cancelled == 0
    }

    #[must_use]
    pub fn failures_of(&self, kind: FailureKind) -> usize {
        self.failures.iter().filter(|f| f.kind == kind).count()
    }
}

/// What a refresh would do right now, computed without network I/O.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RefreshPlan {
    /// Brand names whose catalogs are stale or missing.
    pub catalogs_to_fetch: Vec<String>,
    pub catalogs_fresh: usize,
    /// Detail candidates from cached catalogs. Providers without a cached
    /// catalog contribute none until their catalog has been fetched.
    pub details_checked: usize,
    pub details_fresh: usize,
    pub details_to_fetch: usize,
    /// Candidates whose artifact could not be classified (e.g. unusable plan id).
    pub details_unreadable: usize,
}
