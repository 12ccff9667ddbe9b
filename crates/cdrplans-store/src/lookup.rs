//! Read-only queries across every cached catalog.

use std::io::ErrorKind;

use cdrplans_core::{brand_key, PlanSummary};

use crate::catalog::CachedCatalog;
use crate::{ArtifactStore, StoreError};

impl ArtifactStore {
    /// Every readable catalog under the store root, sorted by brand key.
    ///
    /// Brand directories without a catalog are skipped. Directories whose
    /// name is not a normalized brand key, and corrupt catalogs, are skipped
    /// with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the root exists but cannot be listed.
    pub async fn list_catalogs(&self) -> Result<Vec<CachedCatalog>, StoreError> {
        let mut entries = match tokio::fs::read_dir(self.root()).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(self.root(), e)),
        };

        let mut keys = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StoreError::io(self.root(), e))?
        {
            let is_dir = entry
                .file_type()
                .await
                .map_err(|e| StoreError::io(&entry.path(), e))?
                .is_dir();
            if !is_dir {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                continue;
            };
            if brand_key(&name) != name {
                tracing::warn!(
                    path = %entry.path().display(),
                    "skipping directory that is not a normalized brand key"
                );
                continue;
            }
            keys.push(name);
        }
        keys.sort();

        let mut catalogs = Vec::with_capacity(keys.len());
        for key in keys {
            match self.read_catalog(&key).await {
                Ok(Some(catalog)) => catalogs.push(catalog),
                Ok(None) => {}
                Err(StoreError::Deserialize { path, source }) => {
                    tracing::warn!(path = %path, error = %source, "skipping unreadable catalog");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(catalogs)
    }

    /// Finds the first cached catalog listing `plan_id`.
    /// Returns the brand key and the catalog entry.
    ///
    /// # Errors
    ///
    /// Propagates [`ArtifactStore::list_catalogs`] errors.
    pub async fn find_plan(
        &self,
        plan_id: &str,
    ) -> Result<Option<(String, PlanSummary)>, StoreError> {
        let found = self.list_catalogs().await?.into_iter().find_map(|catalog| {
            let brand_key = catalog.brand_key;
            catalog
                .plans
                .into_iter()
                .find(|p| p.plan_id == plan_id)
                .map(|plan| (brand_key, plan))
        });
        Ok(found)
    }

    /// Cached plans whose geography includes `postcode`, paired with their
    /// brand key, in brand-key order.
    ///
    /// # Errors
    ///
    /// Propagates [`ArtifactStore::list_catalogs`] errors.
    pub async fn plans_for_postcode(
        &self,
        postcode: &str,
    ) -> Result<Vec<(String, PlanSummary)>, StoreError> {
        let mut matches = Vec::new();
        for catalog in self.list_catalogs().await? {
            for plan in catalog.plans {
                if plan.serves_postcode(postcode) {
                    matches.push((catalog.brand_key.clone(), plan));
                }
            }
        }
        Ok(matches)
    }
}
