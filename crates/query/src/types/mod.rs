//! Core types for the list query pipeline.
//!
//! - [`Record`], [`FieldValue`], [`JsonRecord`] - What the pipeline filters over
//! - [`FilterCriteria`], [`FilterValue`] - User-selected filter values
//! - [`EntityProfile`], [`Dimension`] - Per-entity search and filter configuration
//! - [`PageState`], [`Page`], [`RemotePage`] - Pagination types
//!
//! # Example
//!
//! ```
//! use medidesk_query::types::{
//!     Dimension, DimensionKind, EntityProfile, FilterCriteria, FilterValue, PageState,
//! };
//!
//! let profile = EntityProfile::new("patients")
//!     .searchable(["name", "phone"])
//!     .with_dimension(Dimension::on("gender", DimensionKind::OneOf));
//!
//! let criteria = FilterCriteria::new().with("gender", FilterValue::one_of(["Female"]));
//! assert_eq!(criteria.len(), 1);
//!
//! let state = PageState::new(7, 5, 5);
//! assert_eq!(state.total_pages, 2);
//! assert_eq!(state.current_page, 1);
//! ```

mod criteria;
mod pagination;
mod profile;
mod record;

pub use criteria::{DateRange, FilterCriteria, FilterValue, NumberRange};
pub use pagination::{Page, PageState, RemotePage, paginate};
pub use profile::{Dimension, DimensionKind, EntityProfile, Threshold};
pub use record::{DATE_FORMAT, FieldValue, JsonRecord, Record};
