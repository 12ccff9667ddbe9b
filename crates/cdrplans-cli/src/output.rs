//! Plain-text and JSON rendering of command results.

use cdrplans_refresh::{RefreshPlan, RefreshSummary};
use clap::ValueEnum;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Summary counts, followed by one line per failure when `with_failures` is set.
pub(crate) fn format_summary(summary: &RefreshSummary, with_failures: bool) -> String {
    let mut out = format!(
        "providers processed: {}\n\
         catalogs: {} refreshed, {} reused, {} emptied\n\
         details: {} checked, {} fresh, {} fetched\n\
         cancelled tasks: {}\n\
         failures: {}",
        summary.providers_processed,
        summary.catalogs_refreshed,
        summary.catalogs_reused,
        summary.catalogs_emptied,
        summary.details_checked,
        summary.details_fresh,
        summary.details_fetched,
        summary.tasks_cancelled,
        summary.failures.len(),
    );
    if with_failures {
        for failure in &summary.failures {
            out.push_str("\n  ");
            out.push_str(&failure.to_string());
        }
    }
    out
}

pub(crate) fn format_refresh_plan(plan: &RefreshPlan) -> String {
    let brands = if plan.catalogs_to_fetch.is_empty() {
        "none".to_owned()
    } else {
        plan.catalogs_to_fetch.join(", ")
    };
    format!(
        "dry-run: {} catalogs fresh; would fetch {} catalogs: [{brands}]\n\
         dry-run: {} cached details checked, {} fresh, would fetch {}, {} unreadable",
        plan.catalogs_fresh,
        plan.catalogs_to_fetch.len(),
        plan.details_checked,
        plan.details_fresh,
        plan.details_to_fetch,
        plan.details_unreadable,
    )
}

/// One `key: value` line per headline field of a stored plan detail.
pub(crate) fn format_detail(brand: &str, doc: &Value) -> String {
    let field = |pointer: &str| {
        doc.pointer(pointer)
            .and_then(Value::as_str)
            .unwrap_or("-")
            .to_owned()
    };
    [
        ("plan", field("/data/planId")),
        ("brand", brand.to_owned()),
        ("name", field("/data/displayName")),
        ("fuel", field("/data/fuelType")),
        ("customer", field("/data/customerType")),
        ("effective from", field("/data/effectiveFrom")),
        ("last downloaded", field("/meta/lastDownloaded")),
    ]
    .iter()
    .map(|(label, value)| format!("{label}: {value}"))
    .collect::<Vec<_>>()
    .join("\n")
}
