//! The record abstraction the pipeline filters over.
//!
//! Domain shapes (patients, appointments, medicines, ...) are opaque to the
//! pipeline. All it needs is an identity key and named field lookup, which
//! is what [`Record`] provides.

use std::borrow::Cow;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FetchError;

/// Date format used for date fields and date filter bounds.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single field value read from a record.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<'a> {
    /// Free text or an enumerated category.
    Text(Cow<'a, str>),
    /// Numeric value.
    Number(f64),
    /// Calendar date.
    Date(NaiveDate),
    /// Boolean flag.
    Bool(bool),
}

impl<'a> FieldValue<'a> {
    /// Borrowed text value.
    pub fn text(value: &'a str) -> Self {
        FieldValue::Text(Cow::Borrowed(value))
    }

    /// Returns the text if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text.as_ref()),
            _ => None,
        }
    }

    /// Returns the number if this is a numeric value.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the date, parsing ISO text (`2024-01-31` or an RFC 3339
    /// timestamp) when the record stores dates as strings.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(date) => Some(*date),
            FieldValue::Text(text) => parse_date(text),
            _ => None,
        }
    }

    /// Returns the flag if this is a boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Renders the value the way it is shown in a list cell, which is also
    /// what free-text search matches against.
    pub fn display(&self) -> Cow<'_, str> {
        match self {
            FieldValue::Text(text) => Cow::Borrowed(text.as_ref()),
            FieldValue::Number(n) if n.fract() == 0.0 && n.is_finite() => {
                Cow::Owned(format!("{}", *n as i64))
            }
            FieldValue::Number(n) => Cow::Owned(n.to_string()),
            FieldValue::Date(date) => Cow::Owned(date.format(DATE_FORMAT).to_string()),
            FieldValue::Bool(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
        }
    }
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, DATE_FORMAT).ok().or_else(|| {
        text.get(..10)
            .and_then(|head| NaiveDate::parse_from_str(head, DATE_FORMAT).ok())
    })
}

/// A read-only record with an opaque identity and named fields.
pub trait Record {
    /// The identity key.
    fn id(&self) -> &str;

    /// Looks up a field by name. Returns `None` when the field is absent or
    /// null.
    fn field(&self, name: &str) -> Option<FieldValue<'_>>;
}

impl<R: Record + ?Sized> Record for &R {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        (**self).field(name)
    }
}

/// A record backed by an arbitrary JSON object.
///
/// Field names may use dots to reach into nested objects
/// (`address.city`). The `id` member is required and may be a string or a
/// number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct JsonRecord {
    id: String,
    value: Value,
}

impl JsonRecord {
    /// Wraps a JSON object, failing when it has no usable `id`.
    pub fn new(value: Value) -> Result<Self, FetchError> {
        let id = match value.get("id") {
            Some(Value::String(id)) => id.clone(),
            Some(Value::Number(id)) => id.to_string(),
            _ => {
                return Err(FetchError::Decode {
                    message: "record is missing a string or numeric `id`".to_string(),
                });
            }
        };
        Ok(Self { id, value })
    }

    /// The underlying JSON value.
    pub fn value(&self) -> &Value {
        &self.value
    }
}

impl TryFrom<Value> for JsonRecord {
    type Error = FetchError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        JsonRecord::new(value)
    }
}

impl From<JsonRecord> for Value {
    fn from(record: JsonRecord) -> Self {
        record.value
    }
}

impl Record for JsonRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        let mut current = &self.value;
        for segment in name.split('.') {
            current = current.get(segment)?;
        }
        match current {
            Value::String(s) => Some(FieldValue::text(s)),
            Value::Number(n) => n.as_f64().map(FieldValue::Number),
            Value::Bool(b) => Some(FieldValue::Bool(*b)),
            _ => None,
        }
    }
}
