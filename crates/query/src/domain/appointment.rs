use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{Dimension, DimensionKind, EntityProfile, FieldValue, Record};

/// Lifecycle of an appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppointmentStatus {
    /// Booked, not yet confirmed.
    Scheduled,
    /// Confirmed with the patient.
    Confirmed,
    /// The visit took place.
    Completed,
    /// Cancelled by either side.
    Cancelled,
    /// The patient did not attend.
    #[serde(rename = "No-Show")]
    NoShow,
}

/// Colour family of a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BadgeTone {
    /// Blue.
    Info,
    /// Green.
    Success,
    /// Grey.
    Neutral,
    /// Red.
    Danger,
    /// Amber.
    Warning,
}

impl AppointmentStatus {
    /// The status as displayed and filtered on.
    pub fn as_str(self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "Scheduled",
            AppointmentStatus::Confirmed => "Confirmed",
            AppointmentStatus::Completed => "Completed",
            AppointmentStatus::Cancelled => "Cancelled",
            AppointmentStatus::NoShow => "No-Show",
        }
    }

    /// Badge tone for the status column.
    pub fn badge(self) -> BadgeTone {
        match self {
            AppointmentStatus::Scheduled => BadgeTone::Info,
            AppointmentStatus::Confirmed => BadgeTone::Success,
            AppointmentStatus::Completed => BadgeTone::Neutral,
            AppointmentStatus::Cancelled => BadgeTone::Danger,
            AppointmentStatus::NoShow => BadgeTone::Warning,
        }
    }

    /// True when the appointment can still take place.
    pub fn is_open(self) -> bool {
        matches!(
            self,
            AppointmentStatus::Scheduled | AppointmentStatus::Confirmed
        )
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "scheduled" => Ok(AppointmentStatus::Scheduled),
            "confirmed" => Ok(AppointmentStatus::Confirmed),
            "completed" => Ok(AppointmentStatus::Completed),
            "cancelled" | "canceled" => Ok(AppointmentStatus::Cancelled),
            "no-show" | "noshow" | "no show" => Ok(AppointmentStatus::NoShow),
            _ => Err(format!("unknown appointment status '{s}'")),
        }
    }
}

/// A booked visit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    /// Booking reference.
    pub id: String,
    /// Patient's full name.
    pub patient_name: String,
    /// Attending doctor.
    pub doctor_name: String,
    /// Department the visit is booked with.
    pub department: String,
    /// Day of the visit.
    pub date: NaiveDate,
    /// Slot start, `HH:MM`.
    pub time: String,
    /// Current status.
    pub status: AppointmentStatus,
}

impl Appointment {
    /// Search by patient, doctor, department and reference; filter by
    /// status, department, doctor and date.
    pub fn profile() -> EntityProfile {
        EntityProfile::new("appointments")
            .searchable(["patientName", "doctorName", "department", "id"])
            .with_dimension(Dimension::on("status", DimensionKind::OneOf))
            .with_dimension(Dimension::on("department", DimensionKind::OneOf))
            .with_dimension(Dimension::new("doctor", "doctorName", DimensionKind::Exact))
            .with_dimension(Dimension::on("date", DimensionKind::DateRange))
    }
}

impl Record for Appointment {
    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "id" => Some(FieldValue::text(&self.id)),
            "patientName" => Some(FieldValue::text(&self.patient_name)),
            "doctorName" => Some(FieldValue::text(&self.doctor_name)),
            "department" => Some(FieldValue::text(&self.department)),
            "date" => Some(FieldValue::Date(self.date)),
            "time" => Some(FieldValue::text(&self.time)),
            "status" => Some(FieldValue::text(self.status.as_str())),
            _ => None,
        }
    }
}
