//! Predicate building.
//!
//! [`PredicateBuilder`] turns a [`FilterCriteria`] and a committed search term
//! into a [`Predicate`]: a list of [`Clause`]s that must all hold. Only active
//! dimensions produce a clause, so empty criteria and a blank term yield a
//! predicate that matches everything.
//!
//! Predicates are plain values. Two predicates built from equal inputs
//! compare equal, which is what the filter cache keys on.

use std::collections::BTreeSet;

use chrono::{NaiveDate, Utc};
use tracing::{debug, warn};

use crate::calc::age_on;
use crate::types::{
    DateRange, Dimension, DimensionKind, EntityProfile, FilterCriteria, FilterValue, NumberRange,
    Record, Threshold,
};

/// One condition of a predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// Text field equals the value, ignoring case.
    Exact {
        /// Record field.
        field: String,
        /// Lowercased expected value.
        value: String,
    },

    /// Text field is one of the values, ignoring case.
    OneOf {
        /// Record field.
        field: String,
        /// Lowercased accepted values; never empty.
        values: BTreeSet<String>,
    },

    /// Date field lies in the range.
    DateRange {
        /// Record field.
        field: String,
        /// Inclusive range.
        range: DateRange,
    },

    /// Number field lies in the range.
    NumberRange {
        /// Record field.
        field: String,
        /// Inclusive range.
        range: NumberRange,
    },

    /// Age derived from a birth date field lies in the range.
    AgeRange {
        /// Birth date field.
        field: String,
        /// Inclusive range in whole years.
        range: NumberRange,
        /// Date the age is computed on.
        as_of: NaiveDate,
    },

    /// Boolean field equals the expected value.
    Flag {
        /// Record field.
        field: String,
        /// Expected value.
        expected: bool,
    },

    /// A number field passes (or fails) a threshold test.
    Threshold {
        /// Record field.
        field: String,
        /// The test.
        threshold: Threshold,
        /// Whether the test must hold.
        expected: bool,
    },

    /// Any of the fields contains the needle, ignoring case.
    Search {
        /// Searchable fields.
        fields: Vec<String>,
        /// Lowercased, trimmed search term; never empty.
        needle: String,
    },
}

impl Clause {
    /// Evaluates the clause against a record.
    ///
    /// A record without the field an active clause reads does not match.
    pub fn matches<R: Record + ?Sized>(&self, record: &R) -> bool {
        match self {
            Clause::Exact { field, value } => record
                .field(field)
                .and_then(|v| v.as_text().map(|t| t.to_lowercase() == *value))
                .unwrap_or(false),
            Clause::OneOf { field, values } => record
                .field(field)
                .and_then(|v| v.as_text().map(|t| values.contains(&t.to_lowercase())))
                .unwrap_or(false),
            Clause::DateRange { field, range } => record
                .field(field)
                .and_then(|v| v.as_date())
                .is_some_and(|date| range.contains(date)),
            Clause::NumberRange { field, range } => record
                .field(field)
                .and_then(|v| v.as_number())
                .is_some_and(|n| range.contains(n)),
            Clause::AgeRange {
                field,
                range,
                as_of,
            } => record
                .field(field)
                .and_then(|v| v.as_date())
                .and_then(|birth| age_on(birth, *as_of))
                .is_some_and(|age| range.contains(f64::from(age))),
            Clause::Flag { field, expected } => record
                .field(field)
                .and_then(|v| v.as_bool())
                .is_some_and(|b| b == *expected),
            Clause::Threshold {
                field,
                threshold,
                expected,
            } => record
                .field(field)
                .and_then(|v| v.as_number())
                .is_some_and(|n| threshold.holds(n) == *expected),
            Clause::Search { fields, needle } => fields.iter().any(|field| {
                record
                    .field(field)
                    .is_some_and(|v| v.display().to_lowercase().contains(needle.as_str()))
            }),
        }
    }
}

/// A conjunction of clauses. The empty predicate matches every record.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Predicate {
    clauses: Vec<Clause>,
}

impl Predicate {
    /// A predicate that matches everything.
    pub fn always() -> Self {
        Self::default()
    }

    /// Adds a clause.
    pub fn and(mut self, clause: Clause) -> Self {
        self.clauses.push(clause);
        self
    }

    /// The clauses, in the order they are evaluated.
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Returns true when the predicate has no clauses.
    pub fn is_trivial(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Evaluates every clause against the record.
    pub fn matches<R: Record + ?Sized>(&self, record: &R) -> bool {
        self.clauses.iter().all(|clause| clause.matches(record))
    }
}

/// Builds predicates for one entity profile.
#[derive(Debug, Clone)]
pub struct PredicateBuilder<'a> {
    profile: &'a EntityProfile,
    as_of: NaiveDate,
}

impl<'a> PredicateBuilder<'a> {
    /// Creates a builder; age ranges are computed as of today (UTC).
    pub fn new(profile: &'a EntityProfile) -> Self {
        Self {
            profile,
            as_of: Utc::now().date_naive(),
        }
    }

    /// Sets the reference date for age ranges.
    pub fn with_as_of(mut self, as_of: NaiveDate) -> Self {
        self.as_of = as_of;
        self
    }

    /// Builds the predicate for the given criteria and committed term.
    pub fn build(&self, criteria: &FilterCriteria, search_term: &str) -> Predicate {
        let mut predicate = Predicate::always();

        for (name, value) in criteria.iter() {
            let Some(dimension) = self.profile.dimension(name) else {
                debug!(entity = %self.profile.entity, filter = name, "no such dimension, ignoring");
                continue;
            };

            match self.clause_for(dimension, value) {
                Ok(Some(clause)) => predicate = predicate.and(clause),
                Ok(None) => {}
                Err(reason) => {
                    warn!(
                        entity = %self.profile.entity,
                        filter = name,
                        kind = %dimension.kind,
                        reason,
                        "filter value ignored"
                    );
                }
            }
        }

        let needle = search_term.trim().to_lowercase();
        if !needle.is_empty() && !self.profile.searchable_fields.is_empty() {
            predicate = predicate.and(Clause::Search {
                fields: self.profile.searchable_fields.clone(),
                needle,
            });
        }

        predicate
    }

    /// Maps one selected value to a clause. `Ok(None)` means the selection
    /// does not constrain anything; `Err` means it was unusable.
    fn clause_for(
        &self,
        dimension: &Dimension,
        value: &FilterValue,
    ) -> Result<Option<Clause>, &'static str> {
        let field = dimension.field.clone();
        let kind = dimension.kind;
        match (kind, value) {
            (DimensionKind::Exact, FilterValue::Exact(v))
            | (DimensionKind::OneOf, FilterValue::Exact(v)) => {
                let v = v.trim();
                if v.is_empty() {
                    return Ok(None);
                }
                Ok(Some(Clause::Exact {
                    field,
                    value: v.to_lowercase(),
                }))
            }
            (DimensionKind::OneOf, FilterValue::OneOf(values)) => {
                let values: BTreeSet<String> = values
                    .iter()
                    .map(|v| v.trim().to_lowercase())
                    .filter(|v| !v.is_empty())
                    .collect();
                if values.is_empty() {
                    return Ok(None);
                }
                Ok(Some(Clause::OneOf { field, values }))
            }
            (DimensionKind::DateRange, FilterValue::DateRange(range)) => {
                if range.is_inverted() {
                    return Err("range start is after its end");
                }
                if range.is_open() {
                    return Ok(None);
                }
                Ok(Some(Clause::DateRange {
                    field,
                    range: *range,
                }))
            }
            (DimensionKind::NumberRange, FilterValue::NumberRange(range))
            | (DimensionKind::AgeRange, FilterValue::NumberRange(range)) => {
                if range.is_malformed() {
                    return Err("range bounds are not finite or out of order");
                }
                if range.is_open() {
                    return Ok(None);
                }
                if kind == DimensionKind::AgeRange {
                    Ok(Some(Clause::AgeRange {
                        field,
                        range: *range,
                        as_of: self.as_of,
                    }))
                } else {
                    Ok(Some(Clause::NumberRange {
                        field,
                        range: *range,
                    }))
                }
            }
            (DimensionKind::Flag, FilterValue::Flag(expected)) => match dimension.threshold {
                Some(threshold) => Ok(Some(Clause::Threshold {
                    field,
                    threshold,
                    expected: *expected,
                })),
                None => Ok(Some(Clause::Flag {
                    field,
                    expected: *expected,
                })),
            },
            _ => Err("value does not fit the dimension kind"),
        }
    }
}
