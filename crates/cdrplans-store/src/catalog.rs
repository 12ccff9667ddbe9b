//! Per-brand catalog artifacts (`plans.json`).

use std::io::ErrorKind;

use cdrplans_core::{brand_key, PlanSummary};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use crate::atomic::{persist_stamped, read_document, read_freshness};
use crate::freshness::{format_timestamp, Freshness};
use crate::{ArtifactStore, StoreError, WriteOutcome};

/// A catalog as read back from disk.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedCatalog {
    pub brand_key: String,
    /// `None` for legacy bare-array catalogs.
    pub last_downloaded: Option<DateTime<Utc>>,
    pub plans: Vec<PlanSummary>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredCatalog {
    // Tried first: a derived struct would also accept a sequence.
    Legacy(Vec<PlanSummary>),
    Enveloped { data: StoredPlans },
}

#[derive(Deserialize)]
struct StoredPlans {
    #[serde(default)]
    plans: Vec<PlanSummary>,
}

impl ArtifactStore {
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the artifact exists but cannot be read.
    pub async fn catalog_freshness(&self, brand: &str) -> Result<Freshness, StoreError> {
        read_freshness(&self.catalog_path(brand)).await
    }

    /// Reads a brand's cached catalog. `Ok(None)` when there is none.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Io`] if the file cannot be read.
    /// - [`StoreError::Deserialize`] if it is neither an enveloped catalog nor
    ///   a legacy array of plans.
    pub async fn read_catalog(&self, brand: &str) -> Result<Option<CachedCatalog>, StoreError> {
        let path = self.catalog_path(brand);
        let Some(doc) = read_document(&path).await? else {
            return Ok(None);
        };

        let last_downloaded = Freshness::of_document(&doc).last_downloaded();
        let stored: StoredCatalog =
            serde_json::from_value(doc).map_err(|source| StoreError::Deserialize {
                path: path.display().to_string(),
                source,
            })?;
        let plans = match stored {
            StoredCatalog::Enveloped { data } => data.plans,
            StoredCatalog::Legacy(plans) => plans,
        };

        Ok(Some(CachedCatalog {
            brand_key: brand_key(brand),
            last_downloaded,
            plans,
        }))
    }

    /// Replaces a brand's catalog with `plans`, stamped `at`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] or [`StoreError::Serialize`] if the
    /// artifact cannot be written; the previous catalog is then untouched.
    pub async fn write_catalog(
        &self,
        brand: &str,
        plans: &[PlanSummary],
        at: DateTime<Utc>,
    ) -> Result<WriteOutcome, StoreError> {
        let path = self.catalog_path(brand);
        let plans = serde_json::to_value(plans).map_err(|source| StoreError::Serialize {
            path: path.display().to_string(),
            source,
        })?;
        let doc = json!({
            "data": { "plans": plans },
            "meta": { "lastDownloaded": format_timestamp(at) },
        });
        persist_stamped(path, &doc, at).await
    }

    /// Deletes a brand's catalog artifact. Returns whether one existed.
    /// Detail artifacts in the brand directory are left in place.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file exists but cannot be removed.
    pub async fn remove_catalog(&self, brand: &str) -> Result<bool, StoreError> {
        let path = self.catalog_path(brand);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::io(&path, e)),
        }
    }
}
