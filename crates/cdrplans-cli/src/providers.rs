//! `cdrplans providers`: show the loaded provider directory.

use cdrplans_core::AppConfig;
use serde_json::json;

use crate::load_directory;
use crate::output::{print_json, OutputFormat};

/// # Errors
///
/// Returns an error if the provider directory cannot be loaded.
pub(crate) fn run_providers(config: &AppConfig, format: OutputFormat) -> anyhow::Result<()> {
    let directory = load_directory(config)?;

    match format {
        OutputFormat::Json => {
            let rows: Vec<_> = directory
                .providers()
                .iter()
                .map(|p| json!({ "brand_name": p.brand_name, "brand_key": p.key(), "base_url": p.base_url }))
                .collect();
            print_json(&rows)?;
        }
        OutputFormat::Text => {
            for p in directory.providers() {
                println!("{}\t{}\t{}", p.key(), p.brand_name, p.base_url);
            }
            println!("{} providers", directory.len());
        }
    }
    Ok(())
}
