//! Configuration shared by every list view.
//!
//! # Defaults
//!
//! | Setting | Default | Description |
//! |---------|---------|-------------|
//! | `defaultPageSize` | 10 | Rows per page when a view starts |
//! | `maxPageSize` | 100 | Largest page size a view may switch to |
//! | `debounceMs` | 300 | Search debounce delay in milliseconds |

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{QueryError, QueryResult};
use crate::search::DEFAULT_DEBOUNCE;

/// List view configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListConfig {
    /// Rows per page when a view starts.
    pub default_page_size: usize,

    /// Largest page size a view may switch to.
    pub max_page_size: usize,

    /// Search debounce delay in milliseconds.
    pub debounce_ms: u64,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            max_page_size: 100,
            debounce_ms: DEFAULT_DEBOUNCE.as_millis() as u64,
        }
    }
}

impl ListConfig {
    /// The debounce delay.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Checks a page size against this configuration.
    pub fn check_page_size(&self, page_size: usize) -> QueryResult<()> {
        if page_size == 0 {
            return Err(QueryError::InvalidPageSize);
        }
        if page_size > self.max_page_size {
            return Err(QueryError::PageSizeTooLarge {
                requested: page_size,
                max: self.max_page_size,
            });
        }
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> QueryResult<()> {
        if self.max_page_size == 0 {
            return Err(QueryError::InvalidPageSize);
        }
        self.check_page_size(self.default_page_size)?;
        if self.debounce_ms == 0 {
            return Err(QueryError::InvalidDebounce);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ListConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.debounce(), Duration::from_millis(300));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = ListConfig {
            default_page_size: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(QueryError::InvalidPageSize));

        let config = ListConfig {
            default_page_size: 500,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(QueryError::PageSizeTooLarge {
                requested: 500,
                max: 100
            })
        );

        let config = ListConfig {
            debounce_ms: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(QueryError::InvalidDebounce));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ListConfig = serde_json::from_str(r#"{"defaultPageSize": 5}"#).unwrap();
        assert_eq!(config.default_page_size, 5);
        assert_eq!(config.max_page_size, 100);
    }
}
