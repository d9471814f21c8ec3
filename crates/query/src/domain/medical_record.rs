use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{Dimension, DimensionKind, EntityProfile, FieldValue, Record};

/// A clinical note from a consultation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecord {
    /// Note identifier.
    pub id: String,
    /// Patient's full name.
    pub patient_name: String,
    /// Authoring doctor.
    pub doctor_name: String,
    /// Diagnosis.
    pub diagnosis: String,
    /// Treatment plan.
    pub treatment: String,
    /// Consultation date.
    pub recorded_on: NaiveDate,
}

impl MedicalRecord {
    /// Search by patient, diagnosis, treatment, doctor and identifier; filter
    /// by doctor and consultation date.
    pub fn profile() -> EntityProfile {
        EntityProfile::new("medical-records")
            .searchable(["patientName", "diagnosis", "treatment", "doctorName", "id"])
            .with_dimension(Dimension::new("doctor", "doctorName", DimensionKind::Exact))
            .with_dimension(Dimension::new("recorded", "recordedOn", DimensionKind::DateRange))
    }
}

impl Record for MedicalRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "id" => Some(FieldValue::text(&self.id)),
            "patientName" => Some(FieldValue::text(&self.patient_name)),
            "doctorName" => Some(FieldValue::text(&self.doctor_name)),
            "diagnosis" => Some(FieldValue::text(&self.diagnosis)),
            "treatment" => Some(FieldValue::text(&self.treatment)),
            "recordedOn" => Some(FieldValue::Date(self.recorded_on)),
            _ => None,
        }
    }
}
