use cdrplans_core::config::MAX_PAGE_SIZE;
use cdrplans_core::AppConfig;
use chrono::TimeDelta;

use crate::RefreshError;

/// Tuning for one [`crate::Coordinator`], fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshConfig {
    pub catalog_ttl: TimeDelta,
    pub detail_ttl: TimeDelta,
    /// Maximum in-flight tasks per phase.
    pub concurrency: usize,
    pub page_size: u32,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            catalog_ttl: TimeDelta::days(1),
            detail_ttl: TimeDelta::days(7),
            concurrency: 10,
            page_size: MAX_PAGE_SIZE,
        }
    }
}

impl From<&AppConfig> for RefreshConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            catalog_ttl: config.catalog_ttl,
            detail_ttl: config.detail_ttl,
            concurrency: config.concurrency,
            page_size: config.page_size,
        }
    }
}

impl RefreshConfig {
    pub(crate) fn validate(&self) -> Result<(), RefreshError> {
        if self.concurrency == 0 {
            return Err(RefreshError::InvalidConfig(
                "concurrency must be at least 1".to_owned(),
            ));
        }
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(RefreshError::InvalidConfig(format!(
                "page size must be between 1 and {MAX_PAGE_SIZE}, got {}",
                self.page_size
            )));
        }
        if self.catalog_ttl < TimeDelta::zero() || self.detail_ttl < TimeDelta::zero() {
            return Err(RefreshError::InvalidConfig(
                "TTLs must not be negative".to_owned(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(RefreshConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_concurrency_is_rejected() {
        let config = RefreshConfig {
            concurrency: 0,
            ..RefreshConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(RefreshError::InvalidConfig(_))
        ));
    }

    #[test]
    fn oversized_page_is_rejected() {
        let config = RefreshConfig {
            page_size: MAX_PAGE_SIZE + 1,
            ..RefreshConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn negative_ttl_is_rejected() {
        let config = RefreshConfig {
            detail_ttl: TimeDelta::seconds(-1),
            ..RefreshConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
