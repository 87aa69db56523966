use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const MAX_DAYS: i64 = 36_500;

/// Category cache settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Directory holding one `<lang>.json` file per language (None = memory only)
    pub dir: Option<PathBuf>,

    /// Age after which a cached category is looked up again
    pub staleness_days: i64,

    /// Age after which a remembered taxonomy failure is retried
    pub error_ttl_days: i64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: None,
            staleness_days: 30,
            error_ttl_days: 30,
        }
    }
}

impl CacheConfig {
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
            ..Default::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(1..=MAX_DAYS).contains(&self.staleness_days) {
            return Err(format!(
                "staleness_days ({}) must be between 1 and {MAX_DAYS}",
                self.staleness_days
            ));
        }

        if !(0..=MAX_DAYS).contains(&self.error_ttl_days) {
            return Err(format!(
                "error_ttl_days ({}) must be between 0 and {MAX_DAYS}",
                self.error_ttl_days
            ));
        }

        Ok(())
    }

    pub(crate) fn staleness(&self) -> chrono::Duration {
        chrono::Duration::days(self.staleness_days)
    }

    pub(crate) fn error_ttl(&self) -> chrono::Duration {
        chrono::Duration::days(self.error_ttl_days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = CacheConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.staleness(), chrono::Duration::days(30));
    }

    #[test]
    fn test_config_validation() {
        let mut config = CacheConfig::with_dir("cache");
        config.staleness_days = 0;
        assert!(config.validate().is_err());

        config.staleness_days = 7;
        config.error_ttl_days = -1;
        assert!(config.validate().is_err());

        config.error_ttl_days = 0;
        assert!(config.validate().is_ok());
    }
}
