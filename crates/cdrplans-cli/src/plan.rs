//! `cdrplans plan`: refresh and print a single plan detail.

use anyhow::Context;
use cdrplans_core::{AppConfig, Provider};
use cdrplans_refresh::DetailOutcome;
use cdrplans_store::ArtifactStore;

use crate::output::{format_detail, print_json, OutputFormat};
use crate::{build_coordinator, load_directory};

/// Refreshes `plan_id` if its cached detail is stale (or `force` is set) and
/// prints the stored document.
///
/// # Errors
///
/// Returns an error if the brand or plan cannot be resolved, or if the
/// fetch or write fails.
pub(crate) async fn run_plan(
    config: &AppConfig,
    plan_id: &str,
    brand_filter: Option<&str>,
    force: bool,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let directory = load_directory(config)?;
    let store = ArtifactStore::new(&config.brands_dir);

    let provider = resolve_provider(&directory, &store, plan_id, brand_filter).await?;
    let coordinator = build_coordinator(config, None)?;

    let outcome = coordinator
        .refresh_plan(&provider, plan_id, force)
        .await
        .with_context(|| format!("failed to refresh plan '{plan_id}'"))?;
    match outcome {
        DetailOutcome::Fresh => tracing::info!(plan_id, "cached plan detail is fresh"),
        DetailOutcome::Fetched => tracing::info!(plan_id, "plan detail downloaded"),
    }

    let doc = store
        .read_detail(&provider.key(), plan_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("plan detail for '{plan_id}' missing after refresh"))?;

    match format {
        OutputFormat::Json => print_json(&doc)?,
        OutputFormat::Text => println!("{}", format_detail(&provider.brand_name, &doc)),
    }
    Ok(())
}

/// The provider named by `brand_filter`, or the one whose cached catalog
/// lists `plan_id`.
async fn resolve_provider(
    directory: &cdrplans_core::ProviderDirectory,
    store: &ArtifactStore,
    plan_id: &str,
    brand_filter: Option<&str>,
) -> anyhow::Result<Provider> {
    if let Some(brand) = brand_filter {
        return directory
            .find(brand)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("brand '{brand}' not found in provider directory"));
    }

    let (brand_key, _) = store.find_plan(plan_id).await?.ok_or_else(|| {
        anyhow::anyhow!(
            "plan '{plan_id}' not found in any cached catalog; run `cdrplans refresh` or pass --brand"
        )
    })?;
    directory.find(&brand_key).cloned().ok_or_else(|| {
        anyhow::anyhow!("plan '{plan_id}' is cached under '{brand_key}', which is no longer a configured provider")
    })
}
