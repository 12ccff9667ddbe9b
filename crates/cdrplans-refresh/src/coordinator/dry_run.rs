//! Dry run: report what a refresh would fetch without fetching anything.

use cdrplans_core::Provider;
use cdrplans_store::StoreError;
use chrono::Utc;

use super::catalog::ProviderCatalog;
use super::{detail, unique_providers, Coordinator};
use crate::{RefreshError, RefreshPlan};

impl Coordinator {
    /// Classifies catalogs and details exactly as [`Coordinator::refresh`]
    /// would, using only the artifact store.
    ///
    /// Stale catalogs still contribute their cached plans as detail
    /// candidates, so the detail counts are an estimate for those providers.
    ///
    /// # Errors
    ///
    /// Returns [`RefreshError::Store`] if a catalog cannot be read for a
    /// reason other than corrupt content.
    pub async fn plan_refresh(&self, providers: &[Provider]) -> Result<RefreshPlan, RefreshError> {
        let now = Utc::now();
        let mut plan = RefreshPlan::default();
        let mut catalogs = Vec::new();

        for provider in unique_providers(providers) {
            let key = provider.key();
            let freshness = self.store.catalog_freshness(&key).await?;
            if freshness.is_stale(self.config.catalog_ttl, now) {
                plan.catalogs_to_fetch.push(provider.brand_name.clone());
            } else {
                plan.catalogs_fresh += 1;
            }

            let cached = match self.store.read_catalog(&key).await {
                Ok(cached) => cached,
                Err(StoreError::Deserialize { .. }) => None,
                Err(e) => return Err(e.into()),
            };
            if let Some(cached) = cached {
                catalogs.push(ProviderCatalog {
                    provider,
                    plans: cached.plans,
                });
            }
        }

        let classification = self.classify(detail::candidates(&catalogs), now).await;
        plan.details_checked = classification.checked();
        plan.details_fresh = classification.fresh;
        plan.details_to_fetch = classification.stale.len();
        plan.details_unreadable = classification.failures.len();
        Ok(plan)
    }
}
