use super::*;

use cdrplans_core::PlanSummary;
use serde_json::json;

#[test]
fn refresh_defaults_to_all_brands() {
    let cli = Cli::try_parse_from(["cdrplans", "refresh"]).expect("expected valid cli args");
    assert!(!cli.debug);
    assert!(matches!(
        cli.command,
        Commands::Refresh {
            brand: None,
            concurrency: None,
            dry_run: false
        }
    ));
}

#[test]
fn refresh_with_brand_concurrency_and_dry_run() {
    let cli = Cli::try_parse_from([
        "cdrplans",
        "refresh",
        "--brand",
        "Acme Energy",
        "--concurrency",
        "4",
        "--dry-run",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Commands::Refresh {
            brand: Some(ref b),
            concurrency: Some(4),
            dry_run: true
        } if b == "Acme Energy"
    ));
}

#[test]
fn debug_flag_is_global() {
    let cli = Cli::try_parse_from(["cdrplans", "refresh", "--debug"]).unwrap();
    assert!(cli.debug);
    let cli = Cli::try_parse_from(["cdrplans", "--debug", "providers"]).unwrap();
    assert!(cli.debug);
}

#[test]
fn missing_subcommand_is_an_error() {
    assert!(Cli::try_parse_from(["cdrplans"]).is_err());
}

#[test]
fn plan_takes_positional_id() {
    let cli = Cli::try_parse_from(["cdrplans", "plan", "ACME001MR@EME"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Plan {
            ref plan_id,
            brand: None,
            force: false,
            format: OutputFormat::Text
        } if plan_id == "ACME001MR@EME"
    ));
}

#[test]
fn plan_with_brand_force_and_json() {
    let cli = Cli::try_parse_from([
        "cdrplans", "plan", "A1", "--brand", "Acme Energy", "--force", "--format", "json",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Commands::Plan {
            brand: Some(_),
            force: true,
            format: OutputFormat::Json,
            ..
        }
    ));
}

#[test]
fn plan_requires_id() {
    assert!(Cli::try_parse_from(["cdrplans", "plan"]).is_err());
}

#[test]
fn search_requires_exactly_one_target() {
    assert!(Cli::try_parse_from(["cdrplans", "search", "--postcode", "2000"]).is_err());
    assert!(Cli::try_parse_from([
        "cdrplans",
        "search",
        "--postcode",
        "2000",
        "--providers",
        "--plans"
    ])
    .is_err());

    let cli =
        Cli::try_parse_from(["cdrplans", "search", "--postcode", "2000", "--plans"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Search {
            providers: false,
            plans: true,
            ..
        }
    ));
}

#[test]
fn search_requires_postcode() {
    assert!(Cli::try_parse_from(["cdrplans", "search", "--providers"]).is_err());
}

#[test]
fn schedule_cron_override() {
    let cli = Cli::try_parse_from(["cdrplans", "schedule", "--cron", "0 */30 * * * *"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Schedule { cron: Some(ref c) } if c == "0 */30 * * * *"
    ));
}

#[test]
fn unknown_format_is_rejected() {
    assert!(Cli::try_parse_from(["cdrplans", "providers", "--format", "xml"]).is_err());
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn directory() -> ProviderDirectory {
    ProviderDirectory::from_providers(vec![
        Provider::new("Acme Energy", "https://api.acme.example/").unwrap(),
        Provider::new("Bolt Power", "https://cdr.bolt.example/").unwrap(),
    ])
    .unwrap()
}

#[test]
fn select_providers_without_filter_returns_all() {
    let providers = select_providers(directory(), None).unwrap();
    assert_eq!(providers.len(), 2);
}

#[test]
fn select_providers_matches_brand_loosely() {
    let providers = select_providers(directory(), Some("bolt  POWER")).unwrap();
    assert_eq!(providers.len(), 1);
    assert_eq!(providers[0].brand_name, "Bolt Power");
}

#[test]
fn select_providers_unknown_brand_is_error() {
    let err = select_providers(directory(), Some("Nobody")).unwrap_err();
    assert!(err.to_string().contains("brand 'Nobody' not found"));
}

fn summary(brand: Option<&str>, id: &str, name: Option<&str>) -> PlanSummary {
    let mut value = json!({ "planId": id });
    if let Some(brand) = brand {
        value["brandName"] = json!(brand);
    }
    if let Some(name) = name {
        value["displayName"] = json!(name);
    }
    serde_json::from_value(value).unwrap()
}

#[test]
fn provider_names_are_distinct_and_sorted() {
    let matches = vec![
        ("bolt_power".to_owned(), summary(Some("Bolt Power"), "B1", None)),
        ("acme_energy".to_owned(), summary(Some("Acme Energy"), "A1", None)),
        ("acme_energy".to_owned(), summary(Some("Acme Energy"), "A2", None)),
        ("zed".to_owned(), summary(None, "Z1", None)),
    ];
    assert_eq!(
        search::provider_names(&matches),
        ["Acme Energy", "Bolt Power", "zed"]
    );
}

#[test]
fn plan_names_fall_back_to_plan_id() {
    let matches = vec![
        ("acme_energy".to_owned(), summary(None, "A1", Some("Acme Saver"))),
        ("acme_energy".to_owned(), summary(None, "A2", None)),
    ];
    assert_eq!(search::plan_names(&matches), ["Acme Saver", "A2"]);
}

fn app_config(brands_dir: &std::path::Path) -> AppConfig {
    AppConfig {
        providers_path: brands_dir.join("providers.csv"),
        brands_dir: brands_dir.to_path_buf(),
        log_level: "info".to_owned(),
        catalog_ttl: chrono::TimeDelta::days(1),
        detail_ttl: chrono::TimeDelta::days(7),
        concurrency: 10,
        page_size: 1000,
        request_timeout_secs: 30,
        user_agent: "cdrplans-test/0.1".to_owned(),
        refresh_cron: "0 0 3 * * *".to_owned(),
    }
}

#[test]
fn build_coordinator_applies_concurrency_override() {
    let dir = tempfile::tempdir().unwrap();
    let config = app_config(dir.path());

    let coordinator = build_coordinator(&config, Some(3)).unwrap();
    assert_eq!(coordinator.config().concurrency, 3);
    let coordinator = build_coordinator(&config, None).unwrap();
    assert_eq!(coordinator.config().concurrency, 10);
    assert!(build_coordinator(&config, Some(0)).is_err());
}

#[test]
fn load_directory_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_directory(&app_config(dir.path())).unwrap_err();
    assert!(format!("{err:#}").contains("failed to load provider directory"));
}
