use std::path::PathBuf;

use chrono::TimeDelta;

#[derive(Clone)]
pub struct AppConfig {
    pub providers_path: PathBuf,
    pub brands_dir: PathBuf,
    pub log_level: String,
    /// How long a provider's `plans.json` stays fresh.
    pub catalog_ttl: TimeDelta,
    /// How long a single `{planId}.json` stays fresh.
    pub detail_ttl: TimeDelta,
    pub concurrency: usize,
    pub page_size: u32,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub refresh_cron: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("providers_path", &self.providers_path)
            .field("brands_dir", &self.brands_dir)
            .field("log_level", &self.log_level)
            .field("catalog_ttl_secs", &self.catalog_ttl.num_seconds())
            .field("detail_ttl_secs", &self.detail_ttl.num_seconds())
            .field("concurrency", &self.concurrency)
            .field("page_size", &self.page_size)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("refresh_cron", &self.refresh_cron)
            .finish()
    }
}
