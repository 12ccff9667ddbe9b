//! `cdrplans search`: postcode lookups over cached catalogs.

use std::collections::BTreeSet;

use cdrplans_core::{AppConfig, PlanSummary};
use cdrplans_store::ArtifactStore;

use crate::output::{print_json, OutputFormat};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SearchTarget {
    Providers,
    Plans,
}

/// Prints the providers (distinct brand names) or plans (display names)
/// available at `postcode`, according to the cached catalogs.
///
/// # Errors
///
/// Returns an error if the store root cannot be listed.
pub(crate) async fn run_search(
    config: &AppConfig,
    postcode: &str,
    target: SearchTarget,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let store = ArtifactStore::new(&config.brands_dir);
    let matches = store.plans_for_postcode(postcode).await?;
    let names = match target {
        SearchTarget::Providers => provider_names(&matches),
        SearchTarget::Plans => plan_names(&matches),
    };

    match format {
        OutputFormat::Json => print_json(&names)?,
        OutputFormat::Text => {
            if names.is_empty() {
                println!("no cached plans serve postcode {postcode}");
            }
            for name in &names {
                println!("{name}");
            }
        }
    }
    Ok(())
}

/// Distinct brand names, sorted. Falls back to the brand key when a catalog
/// entry omits `brandName`.
pub(crate) fn provider_names(matches: &[(String, PlanSummary)]) -> Vec<String> {
    matches
        .iter()
        .map(|(brand_key, plan)| plan.brand_name.clone().unwrap_or_else(|| brand_key.clone()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Plan display names in catalog order, falling back to the plan id.
pub(crate) fn plan_names(matches: &[(String, PlanSummary)]) -> Vec<String> {
    matches
        .iter()
        .map(|(_, plan)| plan.display_name.clone().unwrap_or_else(|| plan.plan_id.clone()))
        .collect()
}
