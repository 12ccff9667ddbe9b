//! Plan types shared by the client, the artifact store and the CLI.
//!
//! Only the fields the cache itself needs are typed; everything else a
//! provider returns is preserved in `extra` so `plans.json` keeps the full
//! catalog entry.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Geographic availability of a plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanGeography {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub distributors: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub included_postcodes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excluded_postcodes: Vec<String>,
}

/// One entry of a provider's plan listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSummary {
    pub plan_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geography: Option<PlanGeography>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PlanSummary {
    /// Whether the plan lists `postcode` among its included postcodes.
    #[must_use]
    pub fn serves_postcode(&self, postcode: &str) -> bool {
        self.geography
            .as_ref()
            .is_some_and(|g| g.included_postcodes.iter().any(|p| p == postcode))
    }

    /// Distributor names, empty when the provider omitted geography.
    #[must_use]
    pub fn distributors(&self) -> &[String] {
        self.geography
            .as_ref()
            .map_or(&[], |g| g.distributors.as_slice())
    }
}

/// The full record for one plan, as returned by the detail endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanDetail {
    pub plan_id: String,
    /// The response document, untouched.
    pub payload: Map<String, Value>,
}
