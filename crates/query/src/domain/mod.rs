//! Hospital domain records and their list profiles.
//!
//! Each record type implements [`Record`](crate::types::Record) and exposes
//! a `profile()` describing what its list page searches and filters on.
//! Field names are the camelCase names the records serialize with, so the
//! same profile works over [`JsonRecord`](crate::types::JsonRecord) data.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::EntityProfile;

mod appointment;
mod medical_record;
mod medicine;
mod patient;
mod prescription;

pub use appointment::{Appointment, AppointmentStatus, BadgeTone};
pub use medical_record::MedicalRecord;
pub use medicine::{LOW_STOCK_THRESHOLD, Medicine};
pub use patient::Patient;
pub use prescription::{Prescription, PrescriptionStatus};

/// The entity types that have a list page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Entity {
    /// Patient registry.
    Patients,
    /// Appointment book.
    Appointments,
    /// Pharmacy inventory.
    Medicines,
    /// Issued prescriptions.
    Prescriptions,
    /// Clinical notes.
    MedicalRecords,
}

impl Entity {
    /// Every entity, in menu order.
    pub const ALL: [Entity; 5] = [
        Entity::Patients,
        Entity::Appointments,
        Entity::Medicines,
        Entity::Prescriptions,
        Entity::MedicalRecords,
    ];

    /// The list profile for this entity.
    pub fn profile(self) -> EntityProfile {
        match self {
            Entity::Patients => Patient::profile(),
            Entity::Appointments => Appointment::profile(),
            Entity::Medicines => Medicine::profile(),
            Entity::Prescriptions => Prescription::profile(),
            Entity::MedicalRecords => MedicalRecord::profile(),
        }
    }

    /// The name used in profiles, queries and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Entity::Patients => "patients",
            Entity::Appointments => "appointments",
            Entity::Medicines => "medicines",
            Entity::Prescriptions => "prescriptions",
            Entity::MedicalRecords => "medical-records",
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Entity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        Entity::ALL
            .into_iter()
            .find(|entity| entity.as_str() == normalized)
            .ok_or_else(|| {
                let known: Vec<&str> = Entity::ALL.iter().map(|e| e.as_str()).collect();
                format!("unknown entity '{s}', expected one of: {}", known.join(", "))
            })
    }
}
