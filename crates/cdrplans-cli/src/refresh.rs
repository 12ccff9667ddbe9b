//! `cdrplans refresh`: one refresh cycle over the provider directory.

use cdrplans_core::AppConfig;
use cdrplans_refresh::Coordinator;
use tokio_util::sync::CancellationToken;

use crate::output::{format_refresh_plan, format_summary};
use crate::{build_coordinator, load_directory, select_providers};

/// Refreshes stale catalogs and details for all providers, or for the one
/// named by `brand_filter`.
///
/// When `dry_run` is `true` the function prints what would be fetched and
/// returns without any network request or write. Per-failure lines are
/// printed only when `show_failures` is set (`--debug`).
///
/// # Errors
///
/// Returns an error if the provider directory cannot be loaded, the brand
/// filter matches nothing, or the store root cannot be created. Per-provider
/// and per-plan failures are reported in the summary, not propagated.
pub(crate) async fn run_refresh(
    config: &AppConfig,
    brand_filter: Option<&str>,
    concurrency: Option<usize>,
    dry_run: bool,
    show_failures: bool,
) -> anyhow::Result<()> {
    let providers = select_providers(load_directory(config)?, brand_filter)?;
    if providers.is_empty() {
        println!(
            "no providers configured in {}; nothing to refresh",
            config.providers_path.display()
        );
        return Ok(());
    }

    let coordinator = build_coordinator(config, concurrency)?;

    if dry_run {
        let plan = coordinator.plan_refresh(&providers).await?;
        println!("{}", format_refresh_plan(&plan));
        return Ok(());
    }

    let summary = run_cancellable(&coordinator, &providers).await?;
    println!("{}", format_summary(&summary, show_failures));
    Ok(())
}

/// Runs one cycle; Ctrl-C cancels tasks that have not started yet.
pub(crate) async fn run_cancellable(
    coordinator: &Coordinator,
    providers: &[cdrplans_core::Provider],
) -> anyhow::Result<cdrplans_refresh::RefreshSummary> {
    let watcher = spawn_ctrl_c_watcher(coordinator.cancellation_token());
    let result = coordinator.refresh(providers).await;
    watcher.abort();
    Ok(result?)
}

fn spawn_ctrl_c_watcher(token: CancellationToken) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received; cancelling tasks that have not started");
            token.cancel();
        }
    })
}
