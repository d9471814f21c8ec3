//! Medidesk List Query Pipeline
//!
//! Every list page of the Medidesk front desk (patients, appointments,
//! medicines, prescriptions, medical records) runs the same pipeline:
//!
//! ```text
//! search input -> SearchController -> PredicateBuilder -> filter -> paginate -> view
//! ```
//!
//! This crate provides that pipeline once, parameterized per entity by an
//! [`EntityProfile`](types::EntityProfile).
//!
//! # Architecture
//!
//! - [`types`] - Records, filter criteria, entity profiles and page state
//! - [`search`] - Predicate building, stable filtering and debounced search
//! - [`state`] - [`ListQuery`], the per-view state machine
//! - [`view`] - [`ListView`], a query wired to its search box and fetcher
//! - [`core`] - Record sources and latest-wins fetch coordination
//! - [`domain`] - Hospital records and their list profiles
//! - [`calc`] - Age and BMI calculators
//! - [`config`] - Shared list configuration
//! - [`error`] - Error types
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//!
//! use medidesk_query::{ListConfig, ListQuery};
//! use medidesk_query::types::{
//!     Dimension, DimensionKind, EntityProfile, FilterValue, JsonRecord,
//! };
//! use serde_json::json;
//!
//! let profile = EntityProfile::new("patients")
//!     .searchable(["name"])
//!     .with_dimension(Dimension::on("gender", DimensionKind::OneOf));
//!
//! let records: Arc<[JsonRecord]> = [
//!     json!({"id": "1", "name": "Jane Smith", "gender": "Female"}),
//!     json!({"id": "2", "name": "Jan Doe", "gender": "Male"}),
//!     json!({"id": "3", "name": "Ajane Lee", "gender": "Female"}),
//! ]
//! .into_iter()
//! .map(|value| JsonRecord::new(value).unwrap())
//! .collect();
//!
//! let mut query = ListQuery::new(profile, &ListConfig::default());
//! query.set_filter("gender", FilterValue::one_of(["Female"]));
//! query.set_search("jane");
//!
//! let page = query.view(&records);
//! assert_eq!(page.state.total_items, 2);
//! ```
//!
//! # Remote sources
//!
//! When records come from a backend, the criteria travel in a
//! [`RemoteQuery`](core::RemoteQuery) and the server's page is used as-is;
//! nothing is filtered twice. [`FetchCoordinator`](core::FetchCoordinator)
//! guarantees a slow, superseded response never overwrites a newer one.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod calc;
pub mod config;
pub mod core;
pub mod domain;
pub mod error;
pub mod search;
pub mod state;
pub mod types;
pub mod view;

// Re-export commonly used types at crate root
pub use config::ListConfig;
pub use error::{FetchError, QueryError, QueryResult};
pub use state::ListQuery;
pub use types::{FilterCriteria, FilterValue, Page, PageState, Record};
pub use view::ListView;

// Re-export the pipeline stages
pub use core::{FetchCoordinator, FetchState, InMemorySource, RecordSource, RemoteQuery};
pub use search::{Predicate, PredicateBuilder, SearchController, SearchState, filter_records};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
