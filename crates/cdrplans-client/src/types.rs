//! Response types for the CDR energy plan listing endpoint.
//!
//! ## Observed shape
//!
//! ```text
//! { "data": { "plans": [ ... ] },
//!   "links": { "self": "...", "next": "..." },
//!   "meta": { "totalRecords": 101, "totalPages": 2 } }
//! ```
//!
//! `data` has been seen missing entirely on empty pages from some retailers;
//! it is treated as "no plans on this page". `meta.totalPages` is the only
//! pagination signal we trust, so its absence is a hard error for the caller.
//!
//! Plans are kept as raw JSON here. Turning them into
//! [`cdrplans_core::PlanSummary`] happens per entry so one malformed plan does
//! not sink the whole page.

use serde::Deserialize;
use serde_json::Value;

/// Top-level response from `GET {base}cds-au/v1/energy/plans`.
#[derive(Debug, Deserialize)]
pub struct PlanListResponse {
    #[serde(default)]
    pub data: Option<PlanListData>,
    #[serde(default)]
    pub meta: Option<PageMeta>,
}

#[derive(Debug, Deserialize)]
pub struct PlanListData {
    #[serde(default)]
    pub plans: Vec<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    #[serde(default)]
    pub total_pages: Option<u32>,
    #[serde(default)]
    pub total_records: Option<u64>,
}

impl PlanListResponse {
    /// Server-reported page count, if the response carried one.
    #[must_use]
    pub fn total_pages(&self) -> Option<u32> {
        self.meta.as_ref().and_then(|m| m.total_pages)
    }

    /// Consumes the response, yielding the raw plan entries.
    #[must_use]
    pub fn into_plans(self) -> Vec<Value> {
        self.data.map(|d| d.plans).unwrap_or_default()
    }
}
