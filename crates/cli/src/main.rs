//! Medidesk list query runner.
//!
//! Loads a JSON array of records, applies filters, search and pagination
//! the same way the dashboards do, and prints the page as JSON.

mod config;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::info;

use medidesk_query::core::decode_records;
use medidesk_query::domain::{Appointment, Entity, MedicalRecord, Medicine, Patient, Prescription};
use medidesk_query::types::JsonRecord;
use medidesk_query::{FilterCriteria, ListQuery, Record};

use crate::config::CliConfig;

/// Largest number of page links printed with a result.
const MAX_PAGE_CONTROLS: usize = 7;

/// Initializes the tracing subscriber, logging to stderr so stdout stays
/// valid JSON.
fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("medidesk={0},medidesk_query={0}", level)));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Runs the configured query over `bytes`, decoded as records of type `R`.
fn run_query<R>(config: &CliConfig, bytes: &[u8]) -> anyhow::Result<Value>
where
    R: Record + Serialize + DeserializeOwned,
{
    let records: Arc<[R]> = decode_records::<R>(bytes)
        .with_context(|| format!("Failed to decode {} records", config.entity))?
        .into();

    let profile = config.entity.profile();
    let criteria =
        FilterCriteria::parse_assignments(&profile, config.filters.iter().map(String::as_str));

    let mut query = ListQuery::new(profile, &config.list_config());
    if let Some(as_of) = config.as_of {
        query = query.with_as_of(as_of);
    }
    query.replace_criteria(criteria);
    query.set_search(config.search.as_str());
    query.go_to_page(config.page);

    let page = query.view(&records);
    info!(
        entity = %config.entity,
        loaded = records.len(),
        matched = page.state.total_items,
        page = page.state.current_page,
        "Query complete"
    );

    Ok(json!({
        "entity": config.entity,
        "criteria": query.criteria(),
        "search": query.search_term(),
        "page": page.state,
        "controls": page.state.controls_window(MAX_PAGE_CONTROLS),
        "items": serde_json::to_value(&page.items)?,
    }))
}

fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    let bytes = std::fs::read(&config.data)
        .with_context(|| format!("Failed to read {}", config.data.display()))?;

    let output = if config.untyped {
        run_query::<JsonRecord>(&config, &bytes)?
    } else {
        match config.entity {
            Entity::Patients => run_query::<Patient>(&config, &bytes)?,
            Entity::Appointments => run_query::<Appointment>(&config, &bytes)?,
            Entity::Medicines => run_query::<Medicine>(&config, &bytes)?,
            Entity::Prescriptions => run_query::<Prescription>(&config, &bytes)?,
            Entity::MedicalRecords => run_query::<MedicalRecord>(&config, &bytes)?,
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
