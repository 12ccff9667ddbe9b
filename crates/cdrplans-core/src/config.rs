use crate::app_config::AppConfig;
use crate::ConfigError;

/// Largest page size the CDR plan listing endpoints accept.
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is present but holds an invalid value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is present but holds an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_ttl = |var: &str, default: &str| -> Result<chrono::TimeDelta, ConfigError> {
        let secs = parse_u64(var, default)?;
        i64::try_from(secs)
            .ok()
            .and_then(chrono::TimeDelta::try_seconds)
            .ok_or_else(|| invalid(var, format!("{secs} seconds is out of range")))
    };

    let providers_path = PathBuf::from(or_default(
        "CDRPLANS_PROVIDERS_PATH",
        "./config/providers.csv",
    ));
    let brands_dir = PathBuf::from(or_default("CDRPLANS_BRANDS_DIR", "./brands"));
    let log_level = or_default("CDRPLANS_LOG_LEVEL", "info");

    let catalog_ttl = parse_ttl("CDRPLANS_CATALOG_TTL_SECS", "86400")?;
    let detail_ttl = parse_ttl("CDRPLANS_DETAIL_TTL_SECS", "604800")?;

    let concurrency = parse_usize("CDRPLANS_CONCURRENCY", "10")?;
    if concurrency == 0 {
        return Err(invalid(
            "CDRPLANS_CONCURRENCY",
            "must be at least 1".to_string(),
        ));
    }

    let page_size = parse_u32("CDRPLANS_PAGE_SIZE", "1000")?;
    if page_size == 0 || page_size > MAX_PAGE_SIZE {
        return Err(invalid(
            "CDRPLANS_PAGE_SIZE",
            format!("must be between 1 and {MAX_PAGE_SIZE}, got {page_size}"),
        ));
    }

    let request_timeout_secs = parse_u64("CDRPLANS_REQUEST_TIMEOUT_SECS", "30")?;
    if request_timeout_secs == 0 {
        return Err(invalid(
            "CDRPLANS_REQUEST_TIMEOUT_SECS",
            "must be at least 1".to_string(),
        ));
    }

    let user_agent = or_default("CDRPLANS_USER_AGENT", "cdrplans/0.1 (plan-catalog-cache)");
    let refresh_cron = or_default("CDRPLANS_REFRESH_CRON", "0 0 3 * * *");

    Ok(AppConfig {
        providers_path,
        brands_dir,
        log_level,
        catalog_ttl,
        detail_ttl,
        concurrency,
        page_size,
        request_timeout_secs,
        user_agent,
        refresh_cron,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
