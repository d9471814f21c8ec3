use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{Dimension, DimensionKind, EntityProfile, FieldValue, Record};

/// Whether a prescription can still be dispensed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrescriptionStatus {
    /// Can be dispensed.
    Active,
    /// Fully dispensed.
    Completed,
    /// Withdrawn by the prescriber.
    Cancelled,
}

impl PrescriptionStatus {
    /// The status as displayed and filtered on.
    pub fn as_str(self) -> &'static str {
        match self {
            PrescriptionStatus::Active => "Active",
            PrescriptionStatus::Completed => "Completed",
            PrescriptionStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for PrescriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A prescription issued to a patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prescription {
    /// Prescription number.
    pub id: String,
    /// Patient's full name.
    pub patient_name: String,
    /// Prescriber.
    pub doctor_name: String,
    /// Medication and dosage, free text.
    pub medication: String,
    /// Issue date.
    pub issued_on: NaiveDate,
    /// Current status.
    pub status: PrescriptionStatus,
}

impl Prescription {
    /// Search by patient, prescriber, medication and number; filter by
    /// status, prescriber and issue date.
    pub fn profile() -> EntityProfile {
        EntityProfile::new("prescriptions")
            .searchable(["patientName", "doctorName", "medication", "id"])
            .with_dimension(Dimension::on("status", DimensionKind::OneOf))
            .with_dimension(Dimension::new("doctor", "doctorName", DimensionKind::Exact))
            .with_dimension(Dimension::new("issued", "issuedOn", DimensionKind::DateRange))
    }
}

impl Record for Prescription {
    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "id" => Some(FieldValue::text(&self.id)),
            "patientName" => Some(FieldValue::text(&self.patient_name)),
            "doctorName" => Some(FieldValue::text(&self.doctor_name)),
            "medication" => Some(FieldValue::text(&self.medication)),
            "issuedOn" => Some(FieldValue::Date(self.issued_on)),
            "status" => Some(FieldValue::text(self.status.as_str())),
            _ => None,
        }
    }
}
