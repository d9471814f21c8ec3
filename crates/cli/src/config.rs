//! Command-line configuration.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `MEDIDESK_LOG_LEVEL` | warn | Log level |
//! | `MEDIDESK_PAGE_SIZE` | 10 | Rows per page |
//! | `MEDIDESK_MAX_PAGE_SIZE` | 100 | Largest accepted page size |

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;
use medidesk_query::ListConfig;
use medidesk_query::domain::Entity;

/// Runs one list query over a JSON file and prints the resulting page.
#[derive(Debug, Clone, Parser)]
#[command(name = "medidesk")]
#[command(about = "Filter, search and paginate Medidesk records")]
pub struct CliConfig {
    /// Entity the records describe (patients, appointments, medicines,
    /// prescriptions, medical-records).
    #[arg(short, long)]
    pub entity: Entity,

    /// JSON file holding an array of records.
    #[arg(short, long)]
    pub data: PathBuf,

    /// Filter selection as `name=value`. Repeatable. Sets use `a,b`, ranges
    /// use `from..to`.
    #[arg(short, long = "filter", value_name = "NAME=VALUE")]
    pub filters: Vec<String>,

    /// Search term.
    #[arg(short, long, default_value = "")]
    pub search: String,

    /// Zero-based page index. Out-of-range values are clamped.
    #[arg(short, long, default_value = "0", allow_negative_numbers = true)]
    pub page: i64,

    /// Rows per page.
    #[arg(long, env = "MEDIDESK_PAGE_SIZE", default_value = "10")]
    pub page_size: usize,

    /// Largest accepted page size.
    #[arg(long, env = "MEDIDESK_MAX_PAGE_SIZE", default_value = "100")]
    pub max_page_size: usize,

    /// Date age filters are evaluated on (defaults to today).
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub as_of: Option<NaiveDate>,

    /// Treat records as untyped JSON objects instead of the entity's schema.
    #[arg(long)]
    pub untyped: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "MEDIDESK_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            entity: Entity::Patients,
            data: PathBuf::from("records.json"),
            filters: Vec::new(),
            search: String::new(),
            page: 0,
            page_size: 10,
            max_page_size: 100,
            as_of: None,
            untyped: false,
            log_level: "warn".to_string(),
        }
    }
}

impl CliConfig {
    /// The list configuration implied by the flags.
    pub fn list_config(&self) -> ListConfig {
        ListConfig {
            default_page_size: self.page_size,
            max_page_size: self.max_page_size,
            ..Default::default()
        }
    }

    /// Validates the configuration, collecting every problem.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.page_size == 0 {
            errors.push("Page size cannot be 0".to_string());
        }

        if self.page_size > self.max_page_size {
            errors.push(format!(
                "Page size {} exceeds the maximum of {}",
                self.page_size, self.max_page_size
            ));
        }

        for filter in &self.filters {
            if !filter.contains('=') {
                errors.push(format!("Filter '{}' is not of the form name=value", filter));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.list_config().default_page_size, 10);
    }

    #[test]
    fn test_parse_flags() {
        let config = CliConfig::try_parse_from([
            "medidesk",
            "--entity",
            "medical-records",
            "--data",
            "notes.json",
            "-f",
            "doctor=Dr. Osei",
            "--filter",
            "recorded=2024-01-01..",
            "--page",
            "-1",
            "--page-size",
            "5",
        ])
        .unwrap();

        assert_eq!(config.entity, Entity::MedicalRecords);
        assert_eq!(config.filters.len(), 2);
        assert_eq!(config.page, -1);
        assert_eq!(config.page_size, 5);
    }

    #[test]
    fn test_unknown_entity_is_rejected() {
        let result = CliConfig::try_parse_from(["medidesk", "-e", "wards", "-d", "x.json"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_invalid_page_sizes() {
        let config = CliConfig {
            page_size: 500,
            filters: vec!["gender".to_string()],
            ..Default::default()
        };
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("exceeds"));
        assert!(errors[1].contains("name=value"));
    }
}
