//! Deterministic artifact paths.

use std::path::PathBuf;

use cdrplans_core::brand_key;

use crate::{ArtifactStore, StoreError};

pub const CATALOG_FILE: &str = "plans.json";
const CATALOG_STEM: &str = "plans";

/// Checks that `plan_id` can be used as a file stem inside a brand directory
/// without escaping it or colliding with the catalog artifact.
///
/// # Errors
///
/// Returns [`StoreError::InvalidPlanId`] naming the violated rule.
pub fn validate_plan_id(plan_id: &str) -> Result<(), StoreError> {
    let reason = if plan_id.is_empty() {
        Some("plan id is empty")
    } else if plan_id.contains(['/', '\\']) {
        Some("plan id contains a path separator")
    } else if plan_id == "." || plan_id == ".." {
        Some("plan id is a relative path component")
    } else if plan_id == CATALOG_STEM {
        Some("plan id collides with the catalog file")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(StoreError::InvalidPlanId {
            plan_id: plan_id.to_owned(),
            reason,
        }),
        None => Ok(()),
    }
}

impl ArtifactStore {
    /// `{root}/{brand_key(brand)}`. Accepts a display name or an
    /// already-normalized key.
    #[must_use]
    pub fn brand_dir(&self, brand: &str) -> PathBuf {
        self.root().join(brand_key(brand))
    }

    #[must_use]
    pub fn catalog_path(&self, brand: &str) -> PathBuf {
        self.brand_dir(brand).join(CATALOG_FILE)
    }

    /// # Errors
    ///
    /// Returns [`StoreError::InvalidPlanId`] if `plan_id` is not a safe file stem.
    pub fn detail_path(&self, brand: &str, plan_id: &str) -> Result<PathBuf, StoreError> {
        validate_plan_id(plan_id)?;
        Ok(self.brand_dir(brand).join(format!("{plan_id}.json")))
    }
}
