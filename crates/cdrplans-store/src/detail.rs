//! Per-plan detail artifacts (`{planId}.json`).

use cdrplans_core::PlanDetail;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::atomic::{persist_stamped, read_document, read_freshness};
use crate::freshness::{stamp_document, Freshness};
use crate::{ArtifactStore, StoreError, WriteOutcome};

impl ArtifactStore {
    /// # Errors
    ///
    /// - [`StoreError::InvalidPlanId`] if `plan_id` is not a safe file stem.
    /// - [`StoreError::Io`] if the artifact exists but cannot be read.
    pub async fn detail_freshness(
        &self,
        brand: &str,
        plan_id: &str,
    ) -> Result<Freshness, StoreError> {
        read_freshness(&self.detail_path(brand, plan_id)?).await
    }

    /// Reads a stored detail document, including its `meta.lastDownloaded`.
    ///
    /// # Errors
    ///
    /// - [`StoreError::InvalidPlanId`] if `plan_id` is not a safe file stem.
    /// - [`StoreError::Io`] / [`StoreError::Deserialize`] on unreadable files.
    pub async fn read_detail(
        &self,
        brand: &str,
        plan_id: &str,
    ) -> Result<Option<Value>, StoreError> {
        read_document(&self.detail_path(brand, plan_id)?).await
    }

    /// Stamps the provider's document with `meta.lastDownloaded = at` and
    /// writes it atomically.
    ///
    /// # Errors
    ///
    /// - [`StoreError::InvalidPlanId`] if the plan id is not a safe file stem.
    /// - [`StoreError::Io`] / [`StoreError::Serialize`] if the write fails.
    pub async fn write_detail(
        &self,
        brand: &str,
        detail: PlanDetail,
        at: DateTime<Utc>,
    ) -> Result<WriteOutcome, StoreError> {
        let path = self.detail_path(brand, &detail.plan_id)?;
        let mut payload = detail.payload;
        stamp_document(&mut payload, at);
        persist_stamped(path, &Value::Object(payload), at).await
    }
}
