mod output;
mod plan;
mod providers;
mod refresh;
mod schedule;
mod search;

use anyhow::Context;
use cdrplans_client::CdrClient;
use cdrplans_core::{AppConfig, Provider, ProviderDirectory};
use cdrplans_refresh::{Coordinator, RefreshConfig};
use cdrplans_store::ArtifactStore;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::output::OutputFormat;

#[derive(Debug, Parser)]
#[command(name = "cdrplans")]
#[command(about = "Incremental cache of CDR energy plan catalogs and plan details")]
struct Cli {
    /// Force debug-level logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Refresh stale catalogs and plan details for every provider
    Refresh {
        /// Restrict the refresh to one provider (brand name)
        #[arg(long)]
        brand: Option<String>,

        /// Maximum in-flight requests (overrides CDRPLANS_CONCURRENCY)
        #[arg(long)]
        concurrency: Option<usize>,

        /// Report what would be fetched without any network requests
        #[arg(long)]
        dry_run: bool,
    },
    /// Refresh one plan detail if stale and print it
    Plan {
        plan_id: String,

        /// Provider owning the plan; looked up in cached catalogs when omitted
        #[arg(long)]
        brand: Option<String>,

        /// Fetch even if the cached detail is fresh
        #[arg(long)]
        force: bool,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Search cached catalogs by postcode
    Search {
        #[arg(long)]
        postcode: String,

        /// List distinct provider brand names
        #[arg(long, conflicts_with = "plans", required_unless_present = "plans")]
        providers: bool,

        /// List plan display names
        #[arg(long)]
        plans: bool,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Print the configured provider directory
    Providers {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Run `refresh` on a cron schedule until interrupted
    Schedule {
        /// Six-field cron expression (overrides CDRPLANS_REFRESH_CRON)
        #[arg(long)]
        cron: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cdrplans_core::load_app_config()?;
    init_tracing(&config.log_level, cli.debug)?;

    match cli.command {
        Commands::Refresh {
            brand,
            concurrency,
            dry_run,
        } => {
            refresh::run_refresh(&config, brand.as_deref(), concurrency, dry_run, cli.debug).await
        }
        Commands::Plan {
            plan_id,
            brand,
            force,
            format,
        } => plan::run_plan(&config, &plan_id, brand.as_deref(), force, format).await,
        Commands::Search {
            postcode,
            providers,
            plans: _,
            format,
        } => {
            let target = if providers {
                search::SearchTarget::Providers
            } else {
                search::SearchTarget::Plans
            };
            search::run_search(&config, &postcode, target, format).await
        }
        Commands::Providers { format } => providers::run_providers(&config, format),
        Commands::Schedule { cron } => {
            schedule::run_schedule(config, cron.as_deref()).await
        }
    }
}

/// `RUST_LOG` wins over `CDRPLANS_LOG_LEVEL`; `--debug` wins over both.
fn init_tracing(log_level: &str, debug: bool) -> anyhow::Result<()> {
    let env_filter = if debug {
        EnvFilter::try_new("debug")?
    } else {
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_level))?
    };
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    Ok(())
}

pub(crate) fn load_directory(config: &AppConfig) -> anyhow::Result<ProviderDirectory> {
    cdrplans_core::load_providers(&config.providers_path).with_context(|| {
        format!(
            "failed to load provider directory from {}",
            config.providers_path.display()
        )
    })
}

/// Every provider, or the single provider named by `brand_filter`.
///
/// # Errors
///
/// Returns an error if `brand_filter` names no configured provider.
pub(crate) fn select_providers(
    directory: ProviderDirectory,
    brand_filter: Option<&str>,
) -> anyhow::Result<Vec<Provider>> {
    match brand_filter {
        Some(brand) => {
            let provider = directory
                .find(brand)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("brand '{brand}' not found in provider directory"))?;
            Ok(vec![provider])
        }
        None => Ok(directory.into_providers()),
    }
}

pub(crate) fn build_coordinator(
    config: &AppConfig,
    concurrency: Option<usize>,
) -> anyhow::Result<Coordinator> {
    let client = CdrClient::new(config.request_timeout_secs, &config.user_agent)
        .context("failed to build CDR client")?;
    let mut refresh_config = RefreshConfig::from(config);
    if let Some(concurrency) = concurrency {
        refresh_config.concurrency = concurrency;
    }
    let coordinator = Coordinator::new(
        client,
        ArtifactStore::new(&config.brands_dir),
        refresh_config,
    )?;
    Ok(coordinator)
}

#[cfg(test)]
mod tests;
