//! The patient registry used across integration tests.
//!
//! Twelve patients, seven of them female. Three names exercise substring
//! search: "Jane Smith", "Jan Doe" and "Ajane Lee".

#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;

use medidesk_query::domain::Patient;
use medidesk_query::types::JsonRecord;

/// Date all age filters in tests are evaluated on.
pub fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

/// Builds a patient.
pub struct PatientFixture {
    id: String,
    name: String,
    gender: String,
    blood_type: String,
    date_of_birth: NaiveDate,
}

impl PatientFixture {
    /// A patient with a placeholder profile.
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            gender: "Female".to_string(),
            blood_type: "O+".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
        }
    }

    /// Sets gender.
    pub fn gender(mut self, gender: &str) -> Self {
        self.gender = gender.to_string();
        self
    }

    /// Sets blood type.
    pub fn blood(mut self, blood_type: &str) -> Self {
        self.blood_type = blood_type.to_string();
        self
    }

    /// Sets the date of birth (`YYYY-MM-DD`).
    pub fn born(mut self, date: &str) -> Self {
        self.date_of_birth = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
        self
    }

    /// Builds the record. Phone numbers are derived from the id digits and
    /// emails from the name.
    pub fn build(self) -> Patient {
        let digits: String = self.id.chars().filter(char::is_ascii_digit).collect();
        let email = format!("{}@mail.test", self.name.to_lowercase().replace(' ', "."));
        Patient {
            phone: format!("555-01{digits}"),
            email: Some(email),
            address: None,
            id: self.id,
            name: self.name,
            gender: self.gender,
            blood_type: self.blood_type,
            date_of_birth: self.date_of_birth,
        }
    }
}

/// The twelve-patient registry, in registration order.
pub fn patients() -> Vec<Patient> {
    vec![
        PatientFixture::new("P-01", "Jane Smith").born("1990-04-12").build(),
        PatientFixture::new("P-02", "Jan Doe").gender("Male").blood("A+").born("1985-09-30").build(),
        PatientFixture::new("P-03", "Ajane Lee").blood("B+").born("2001-01-15").build(),
        PatientFixture::new("P-04", "Maria Garcia").blood("O-").born("1972-06-05").build(),
        PatientFixture::new("P-05", "Ahmed Khan").gender("Male").blood("AB+").born("1968-11-20").build(),
        PatientFixture::new("P-06", "Li Wei").blood("A-").born("1995-02-28").build(),
        PatientFixture::new("P-07", "Tom Becker").gender("Male").born("2010-07-07").build(),
        PatientFixture::new("P-08", "Priya Nair").blood("B-").born("1988-03-14").build(),
        PatientFixture::new("P-09", "Samuel Okoro").gender("Male").blood("A+").born("1979-12-01").build(),
        PatientFixture::new("P-10", "Emma Johansson").born("1999-08-23").build(),
        PatientFixture::new("P-11", "Carlos Mendes").gender("Male").blood("B+").born("1955-05-19").build(),
        PatientFixture::new("P-12", "Fatima Zahra").blood("AB-").born("2003-10-10").build(),
    ]
}

/// The registry as a shared collection, the way a view holds it.
pub fn patient_records() -> Arc<[Patient]> {
    patients().into()
}

/// The registry as untyped JSON records.
pub fn patient_json_records() -> Arc<[JsonRecord]> {
    patients()
        .into_iter()
        .map(|p| JsonRecord::new(serde_json::to_value(p).unwrap()).unwrap())
        .collect()
}

/// Ids of the female patients, in registration order.
pub const FEMALE_IDS: [&str; 7] = ["P-01", "P-03", "P-04", "P-06", "P-08", "P-10", "P-12"];
