//! Multi-page plan listing for `CdrClient`.

use cdrplans_core::{PlanSummary, Provider};

use crate::error::ClientError;
use crate::pagination::next_page;
use crate::types::PlanListResponse;

use super::urls::plans_page_url;
use super::CdrClient;
use super::MAX_PAGES;

impl CdrClient {
    /// Fetches one page of a provider's current plan listing.
    ///
    /// # Errors
    ///
    /// - [`ClientError::UnexpectedStatus`] for any non-2xx status.
    /// - [`ClientError::Http`] on network or TLS failure, including timeouts.
    /// - [`ClientError::Deserialize`] if the body is not JSON of the listing shape.
    /// - [`ClientError::InvalidBaseUrl`] if the provider's base URL is unusable.
    pub async fn fetch_plans_page(
        &self,
        provider: &Provider,
        page: u32,
        page_size: u32,
    ) -> Result<PlanListResponse, ClientError> {
        let url = plans_page_url(&provider.base_url, page, page_size)?;
        let context = format!("plans page {page} from {}", provider.brand_name);
        let body = self.get_json(url, &context).await?;
        serde_json::from_value::<PlanListResponse>(body)
            .map_err(|e| ClientError::Deserialize { context, source: e })
    }

    /// Fetches a provider's complete current plan listing, page by page.
    ///
    /// Starts at page 1 and stops once the page number reaches the
    /// server-reported `meta.totalPages`. Entries that do not carry a
    /// `planId` are skipped with a warning. An empty listing is only
    /// returned when the server listed no entries at all.
    ///
    /// **All-or-nothing semantics**: on any page failure the plans collected
    /// from earlier pages are discarded and the error is returned, so callers
    /// never persist a partial catalog.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::fetch_plans_page`].
    /// Returns [`ClientError::MalformedResponse`] if a page lacks
    /// `meta.totalPages` or if it listed entries of which none was a valid
    /// plan summary, and [`ClientError::PaginationLimit`] past [`MAX_PAGES`]
    /// pages.
    pub async fn fetch_catalog(
        &self,
        provider: &Provider,
        page_size: u32,
    ) -> Result<Vec<PlanSummary>, ClientError> {
        let mut plans: Vec<PlanSummary> = Vec::new();
        let mut skipped = 0usize;
        let mut page = 1u32;

        loop {
            if page > MAX_PAGES {
                return Err(ClientError::PaginationLimit {
                    base_url: provider.base_url.clone(),
                    max_pages: MAX_PAGES,
                });
            }

            let response = self.fetch_plans_page(provider, page, page_size).await?;
            let Some(total_pages) = response.total_pages() else {
                return Err(ClientError::MalformedResponse {
                    context: format!("plans page {page} from {}", provider.brand_name),
                    reason: "missing meta.totalPages".to_owned(),
                });
            };

            let raw_plans = response.into_plans();
            tracing::debug!(
                brand = %provider.brand_name,
                page,
                total_pages,
                plans = raw_plans.len(),
                "fetched plan listing page"
            );

            for raw in raw_plans {
                match serde_json::from_value::<PlanSummary>(raw) {
                    Ok(plan) => plans.push(plan),
                    Err(e) => {
                        skipped += 1;
                        tracing::warn!(
                            brand = %provider.brand_name,
                            page,
                            error = %e,
                            "skipping plan listing entry that is not a valid plan summary"
                        );
                    }
                }
            }

            match next_page(page, total_pages) {
                Some(next) => page = next,
                None => break,
            }
        }

        if plans.is_empty() && skipped > 0 {
            return Err(ClientError::MalformedResponse {
                context: format!("plan listing from {}", provider.brand_name),
                reason: format!("none of the {skipped} listed entries is a valid plan summary"),
            });
        }

        Ok(plans)
    }
}
