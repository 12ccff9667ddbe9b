//! `cdrplans schedule`: periodic refresh cycles driven by a cron expression.
//!
//! The next scheduled cycle is the retry for anything that failed in the
//! previous one.

use std::sync::Arc;

use anyhow::Context;
use cdrplans_core::AppConfig;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler};
use tokio_util::sync::CancellationToken;

use crate::output::format_summary;
use crate::{build_coordinator, load_directory, select_providers};

/// Registers the refresh job and blocks until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the cron expression is invalid or the scheduler cannot
/// be started.
pub(crate) async fn run_schedule(config: AppConfig, cron: Option<&str>) -> anyhow::Result<()> {
    let cron = cron.unwrap_or(&config.refresh_cron).to_owned();
    let config = Arc::new(config);
    let shutdown = CancellationToken::new();
    let running = Arc::new(Mutex::new(()));

    let mut scheduler = JobScheduler::new()
        .await
        .context("failed to create job scheduler")?;

    let job = {
        let config = Arc::clone(&config);
        let shutdown = shutdown.clone();
        Job::new_async(cron.as_str(), move |_uuid, _lock| {
            let config = Arc::clone(&config);
            let shutdown = shutdown.clone();
            let running = Arc::clone(&running);

            Box::pin(async move {
                // Skip a tick that fires while the previous cycle is still running.
                let Ok(_guard) = running.try_lock() else {
                    tracing::warn!("scheduler: previous refresh still running; skipping tick");
                    return;
                };
                tracing::info!("scheduler: starting refresh cycle");
                run_scheduled_cycle(&config, shutdown.child_token()).await;
            })
        })
        .with_context(|| format!("invalid cron expression '{cron}'"))?
    };

    scheduler.add(job).await.context("failed to register refresh job")?;
    scheduler.start().await.context("failed to start job scheduler")?;
    tracing::info!(cron = %cron, "scheduler: registered refresh job; press Ctrl-C to stop");

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl-c")?;
    tracing::info!("scheduler: interrupt received, shutting down");
    shutdown.cancel();
    scheduler
        .shutdown()
        .await
        .context("failed to shut down job scheduler")?;
    Ok(())
}

/// One scheduled cycle. Errors are logged, never propagated, so the schedule
/// keeps running.
async fn run_scheduled_cycle(config: &AppConfig, cancel: CancellationToken) {
    let providers = match load_directory(config).and_then(|d| select_providers(d, None)) {
        Ok(providers) => providers,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "scheduler: cannot load providers");
            return;
        }
    };
    let coordinator = match build_coordinator(config, None) {
        Ok(coordinator) => coordinator.with_cancellation(cancel),
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "scheduler: cannot build coordinator");
            return;
        }
    };

    match coordinator.refresh(&providers).await {
        Ok(summary) => {
            tracing::info!("scheduler: refresh cycle complete");
            tracing::debug!("{}", format_summary(&summary, true));
        }
        Err(e) => tracing::error!(error = %e, "scheduler: refresh cycle failed"),
    }
}
