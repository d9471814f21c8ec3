use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calc::age_on;
use crate::types::{Dimension, DimensionKind, EntityProfile, FieldValue, Record};

/// A registered patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    /// Medical record number.
    pub id: String,
    /// Full name.
    pub name: String,
    /// Gender as recorded at registration.
    pub gender: String,
    /// ABO/Rh blood type, e.g. `O+`.
    pub blood_type: String,
    /// Date of birth.
    pub date_of_birth: NaiveDate,
    /// Contact phone number.
    pub phone: String,
    /// Contact email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Postal address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Patient {
    /// Search by name, id, phone and email; filter by gender, blood type and
    /// age.
    pub fn profile() -> EntityProfile {
        EntityProfile::new("patients")
            .searchable(["name", "id", "phone", "email"])
            .with_dimension(Dimension::on("gender", DimensionKind::OneOf))
            .with_dimension(Dimension::on("bloodType", DimensionKind::OneOf))
            .with_dimension(Dimension::new("age", "dateOfBirth", DimensionKind::AgeRange))
    }

    /// Age in whole years on the given date.
    pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
        age_on(self.date_of_birth, today)
    }
}

impl Record for Patient {
    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "id" => Some(FieldValue::text(&self.id)),
            "name" => Some(FieldValue::text(&self.name)),
            "gender" => Some(FieldValue::text(&self.gender)),
            "bloodType" => Some(FieldValue::text(&self.blood_type)),
            "dateOfBirth" => Some(FieldValue::Date(self.date_of_birth)),
            "phone" => Some(FieldValue::text(&self.phone)),
            "email" => self.email.as_deref().map(FieldValue::text),
            "address" => self.address.as_deref().map(FieldValue::text),
            _ => None,
        }
    }
}
