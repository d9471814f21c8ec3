//! Per-entity list configuration.
//!
//! Every list page (patients, appointments, medicines, ...) is the same
//! pipeline instantiated with a different [`EntityProfile`]: which fields
//! free-text search looks at, and which filter dimensions exist.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The shape a filter dimension takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DimensionKind {
    /// Single selected category compared case-insensitively.
    Exact,
    /// Set of selected categories; the record value must be a member.
    OneOf,
    /// Inclusive date range over a date field.
    DateRange,
    /// Inclusive numeric range over a number field.
    NumberRange,
    /// Inclusive range over the age in whole years derived from a birth
    /// date field.
    AgeRange,
    /// Boolean flag that must equal the selected value.
    Flag,
}

impl fmt::Display for DimensionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DimensionKind::Exact => write!(f, "exact"),
            DimensionKind::OneOf => write!(f, "one-of"),
            DimensionKind::DateRange => write!(f, "date-range"),
            DimensionKind::NumberRange => write!(f, "number-range"),
            DimensionKind::AgeRange => write!(f, "age-range"),
            DimensionKind::Flag => write!(f, "flag"),
        }
    }
}

/// A numeric test behind a derived flag, such as "low stock" over a stock
/// count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "value", rename_all = "camelCase")]
pub enum Threshold {
    /// The field is strictly below the value.
    Below(f64),
    /// The field is at or above the value.
    AtLeast(f64),
}

impl Threshold {
    /// True when `value` passes the test.
    pub fn holds(&self, value: f64) -> bool {
        match *self {
            Threshold::Below(limit) => value < limit,
            Threshold::AtLeast(limit) => value >= limit,
        }
    }
}

/// A filter dimension: a criteria key bound to a record field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    /// The criteria key the view uses (e.g. `"age"`).
    pub name: String,

    /// The record field the dimension reads (e.g. `"dateOfBirth"`).
    pub field: String,

    /// How selected values are interpreted.
    pub kind: DimensionKind,

    /// For flag dimensions derived from a number field: the test the flag
    /// stands for. Without it, a flag reads a boolean field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<Threshold>,
}

impl Dimension {
    /// Creates a dimension.
    pub fn new(name: impl Into<String>, field: impl Into<String>, kind: DimensionKind) -> Self {
        Self {
            name: name.into(),
            field: field.into(),
            kind,
            threshold: None,
        }
    }

    /// Dimension whose criteria key equals the field name.
    pub fn on(field: impl Into<String>, kind: DimensionKind) -> Self {
        let field = field.into();
        Self {
            name: field.clone(),
            field,
            kind,
            threshold: None,
        }
    }

    /// Flag dimension computed from a stored number field, so typed and
    /// untyped records answer it the same way.
    pub fn threshold(
        name: impl Into<String>,
        field: impl Into<String>,
        threshold: Threshold,
    ) -> Self {
        Self {
            threshold: Some(threshold),
            ..Self::new(name, field, DimensionKind::Flag)
        }
    }
}

/// Search and filter configuration for one entity type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityProfile {
    /// Entity name, used in logs and remote queries.
    pub entity: String,

    /// Fields free-text search matches against.
    pub searchable_fields: Vec<String>,

    /// Available filter dimensions.
    pub dimensions: Vec<Dimension>,
}

impl EntityProfile {
    /// Creates an empty profile for the named entity.
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            searchable_fields: Vec::new(),
            dimensions: Vec::new(),
        }
    }

    /// Adds searchable fields.
    pub fn searchable<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.searchable_fields
            .extend(fields.into_iter().map(Into::into));
        self
    }

    /// Adds a filter dimension.
    pub fn with_dimension(mut self, dimension: Dimension) -> Self {
        self.dimensions.push(dimension);
        self
    }

    /// Finds a dimension by criteria key.
    pub fn dimension(&self, name: &str) -> Option<&Dimension> {
        self.dimensions.iter().find(|d| d.name == name)
    }
}
