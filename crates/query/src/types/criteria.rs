//! Filter criteria types.
//!
//! A [`FilterCriteria`] maps dimension names to the value the user picked.
//! A dimension with no entry is unconstrained; there is no "all" sentinel,
//! so a category literally named `all` is just another value.
//!
//! # Control syntax
//!
//! Criteria can also be read from the compact text form used on the
//! command line (`name=value`):
//!
//! | Kind | Syntax | Example |
//! |------|--------|---------|
//! | exact | text | `category=Antibiotic` |
//! | one-of | comma-separated | `gender=Female,Other` |
//! | date-range | `from..to`, either side optional | `date=2024-01-01..` |
//! | number-range, age-range | `min..max`, either side optional | `age=18..65` |
//! | flag | `true` / `false` | `lowStock=true` |

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::profile::{DimensionKind, EntityProfile};
use super::record::DATE_FORMAT;

/// Inclusive date range; a missing bound is unbounded on that side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DateRange {
    /// Earliest date included.
    pub from: Option<NaiveDate>,
    /// Latest date included.
    pub to: Option<NaiveDate>,
}

impl DateRange {
    /// Creates a range.
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    /// Returns true when both bounds are set and `from` is after `to`.
    pub fn is_inverted(&self) -> bool {
        matches!((self.from, self.to), (Some(from), Some(to)) if from > to)
    }

    /// Returns true when neither bound is set.
    pub fn is_open(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// Inclusive containment check.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }
}

/// Inclusive numeric range; a missing bound is unbounded on that side.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NumberRange {
    /// Smallest value included.
    pub min: Option<f64>,
    /// Largest value included.
    pub max: Option<f64>,
}

impl NumberRange {
    /// Creates a range.
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    /// Returns true when a bound is NaN or infinite, or `min > max`.
    pub fn is_malformed(&self) -> bool {
        let bad = |b: Option<f64>| b.is_some_and(|v| !v.is_finite());
        bad(self.min)
            || bad(self.max)
            || matches!((self.min, self.max), (Some(min), Some(max)) if min > max)
    }

    /// Returns true when neither bound is set.
    pub fn is_open(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Inclusive containment check.
    pub fn contains(&self, value: f64) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

/// The value selected for one filter dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum FilterValue {
    /// A single category.
    Exact(String),
    /// A set of categories. Empty means no constraint.
    OneOf(BTreeSet<String>),
    /// A date range.
    DateRange(DateRange),
    /// A numeric range (also used for age ranges).
    NumberRange(NumberRange),
    /// A boolean flag.
    Flag(bool),
}

impl FilterValue {
    /// Builds a set value from any iterator of strings.
    pub fn one_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FilterValue::OneOf(values.into_iter().map(Into::into).collect())
    }

    /// Builds an exact value.
    pub fn exact(value: impl Into<String>) -> Self {
        FilterValue::Exact(value.into())
    }

    /// Parses the control syntax for a dimension of the given kind.
    ///
    /// Returns `Ok(None)` when the input expresses no constraint (blank
    /// text, `..`) and `Err` with a reason when it cannot be read.
    pub fn parse(kind: DimensionKind, raw: &str) -> Result<Option<FilterValue>, String> {
        let raw = raw.trim();
        match kind {
            DimensionKind::Exact => {
                if raw.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(FilterValue::Exact(raw.to_string())))
                }
            }
            DimensionKind::OneOf => {
                let values: BTreeSet<String> = raw
                    .split(',')
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(String::from)
                    .collect();
                if values.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(FilterValue::OneOf(values)))
                }
            }
            DimensionKind::DateRange => {
                let (from, to) = split_range(raw, |s| {
                    NaiveDate::parse_from_str(s, DATE_FORMAT)
                        .map_err(|_| format!("invalid date: {}", s))
                })?;
                let range = DateRange::new(from, to);
                if range.is_open() {
                    Ok(None)
                } else {
                    Ok(Some(FilterValue::DateRange(range)))
                }
            }
            DimensionKind::NumberRange | DimensionKind::AgeRange => {
                let (min, max) = split_range(raw, |s| {
                    s.parse::<f64>()
                        .ok()
                        .filter(|v| v.is_finite())
                        .ok_or_else(|| format!("invalid number: {}", s))
                })?;
                let range = NumberRange::new(min, max);
                if range.is_open() {
                    Ok(None)
                } else {
                    Ok(Some(FilterValue::NumberRange(range)))
                }
            }
            DimensionKind::Flag => match raw.to_lowercase().as_str() {
                "" => Ok(None),
                "true" | "yes" | "1" => Ok(Some(FilterValue::Flag(true))),
                "false" | "no" | "0" => Ok(Some(FilterValue::Flag(false))),
                other => Err(format!("invalid flag: {}", other)),
            },
        }
    }
}

/// Splits `a..b` (or a single value meaning `a..a`) into parsed bounds.
fn split_range<T, F>(raw: &str, parse: F) -> Result<(Option<T>, Option<T>), String>
where
    T: Copy,
    F: Fn(&str) -> Result<T, String>,
{
    let bound = |s: &str| -> Result<Option<T>, String> {
        let s = s.trim();
        if s.is_empty() { Ok(None) } else { parse(s).map(Some) }
    };

    match raw.split_once("..") {
        Some((lo, hi)) => Ok((bound(lo)?, bound(hi)?)),
        None => {
            let single = bound(raw)?;
            Ok((single, single))
        }
    }
}

/// The full set of active filter selections for a list view.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterCriteria {
    values: BTreeMap<String, FilterValue>,
}

impl FilterCriteria {
    /// Creates empty criteria (no constraints).
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a selection, builder style.
    pub fn with(mut self, name: impl Into<String>, value: FilterValue) -> Self {
        self.values.insert(name.into(), value);
        self
    }

    /// Sets a selection, returning the previous one.
    pub fn set(&mut self, name: impl Into<String>, value: FilterValue) -> Option<FilterValue> {
        self.values.insert(name.into(), value)
    }

    /// Removes a selection, making the dimension unconstrained.
    pub fn remove(&mut self, name: &str) -> Option<FilterValue> {
        self.values.remove(name)
    }

    /// Removes every selection.
    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Returns the selection for a dimension.
    pub fn get(&self, name: &str) -> Option<&FilterValue> {
        self.values.get(name)
    }

    /// Iterates over selections in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns true when nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of selections.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Reads `name=value` assignments against a profile.
    ///
    /// Unknown names and unreadable values are logged and skipped, so a bad
    /// control value widens the result instead of failing the list.
    pub fn parse_assignments<'a, I>(profile: &EntityProfile, assignments: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut criteria = Self::new();

        for assignment in assignments {
            let Some((name, raw)) = assignment.split_once('=') else {
                warn!(assignment, "ignoring filter without '='");
                continue;
            };
            let name = name.trim();

            let Some(dimension) = profile.dimension(name) else {
                warn!(entity = %profile.entity, filter = name, "ignoring unknown filter");
                continue;
            };

            match FilterValue::parse(dimension.kind, raw) {
                Ok(Some(value)) => {
                    criteria.set(name, value);
                }
                Ok(None) => {}
                Err(reason) => {
                    warn!(filter = name, %reason, "ignoring unreadable filter value");
                }
            }
        }

        criteria
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::profile::Dimension;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_date_range_inclusive() {
        let range = DateRange::new(Some(date(2024, 1, 1)), Some(date(2024, 1, 31)));
        assert!(range.contains(date(2024, 1, 1)));
        assert!(range.contains(date(2024, 1, 31)));
        assert!(!range.contains(date(2024, 2, 1)));

        let open_end = DateRange::new(Some(date(2024, 1, 1)), None);
        assert!(open_end.contains(date(2099, 12, 31)));
        assert!(!open_end.contains(date(2023, 12, 31)));
    }

    #[test]
    fn test_number_range_malformed() {
        assert!(NumberRange::new(Some(65.0), Some(18.0)).is_malformed());
        assert!(NumberRange::new(Some(f64::NAN), None).is_malformed());
        assert!(!NumberRange::new(Some(18.0), Some(18.0)).is_malformed());
    }

    #[test]
    fn test_parse_one_of() {
        let value = FilterValue::parse(DimensionKind::OneOf, "Female, Other,,").unwrap();
        assert_eq!(value, Some(FilterValue::one_of(["Female", "Other"])));

        assert_eq!(FilterValue::parse(DimensionKind::OneOf, " , ").unwrap(), None);
    }

    #[test]
    fn test_parse_ranges() {
        let value = FilterValue::parse(DimensionKind::DateRange, "2024-01-01..").unwrap();
        assert_eq!(
            value,
            Some(FilterValue::DateRange(DateRange::new(
                Some(date(2024, 1, 1)),
                None
            )))
        );

        let value = FilterValue::parse(DimensionKind::AgeRange, "18..65").unwrap();
        assert_eq!(
            value,
            Some(FilterValue::NumberRange(NumberRange::new(
                Some(18.0),
                Some(65.0)
            )))
        );

        let value = FilterValue::parse(DimensionKind::NumberRange, "5").unwrap();
        assert_eq!(
            value,
            Some(FilterValue::NumberRange(NumberRange::new(
                Some(5.0),
                Some(5.0)
            )))
        );

        assert_eq!(FilterValue::parse(DimensionKind::DateRange, "..").unwrap(), None);
        assert!(FilterValue::parse(DimensionKind::DateRange, "yesterday..").is_err());
        assert!(FilterValue::parse(DimensionKind::NumberRange, "inf..").is_err());
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(
            FilterValue::parse(DimensionKind::Flag, "Yes").unwrap(),
            Some(FilterValue::Flag(true))
        );
        assert!(FilterValue::parse(DimensionKind::Flag, "maybe").is_err());
    }

    #[test]
    fn test_all_is_a_literal_value() {
        let value = FilterValue::parse(DimensionKind::Exact, "all").unwrap();
        assert_eq!(value, Some(FilterValue::exact("all")));
    }

    #[test]
    fn test_parse_assignments_fail_open() {
        let profile = EntityProfile::new("patients")
            .with_dimension(Dimension::on("gender", DimensionKind::OneOf))
            .with_dimension(Dimension::new("age", "dateOfBirth", DimensionKind::AgeRange));

        let criteria = FilterCriteria::parse_assignments(
            &profile,
            [
                "gender=Female",
                "age=abc..",
                "ward=3",
                "no-equals-sign",
            ],
        );

        assert_eq!(criteria.len(), 1);
        assert_eq!(
            criteria.get("gender"),
            Some(&FilterValue::one_of(["Female"]))
        );
    }

    #[test]
    fn test_criteria_json_shape() {
        let criteria = FilterCriteria::new()
            .with("gender", FilterValue::one_of(["Male"]))
            .with("lowStock", FilterValue::Flag(true));

        let json = serde_json::to_value(&criteria).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "gender": {"kind": "oneOf", "value": ["Male"]},
                "lowStock": {"kind": "flag", "value": true}
            })
        );

        let back: FilterCriteria = serde_json::from_value(json).unwrap();
        assert_eq!(back, criteria);
    }
}
