//! Patient records.
//!
//! A [`Patient`] is one clinical encounter as held by a store. Callers never
//! build one directly: they submit a [`NewPatient`] (validated creation
//! input) and the store assigns the id. Later edits arrive as a
//! [`PatientPatch`], which only touches the fields it carries.
//!
//! Optional text fields use `None` as the single "no value" marker. Empty
//! strings coming from a form are folded into `None` during validation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validation::{self, FieldViolation, ValidationError};

/// Administrative gender as captured by the registration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| format!("Invalid gender '{s}'"))
    }
}

/// A stored patient record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: Uuid,
    pub name: String,
    pub age: i32,
    pub gender: Gender,
    pub contact_number: Option<String>,
    pub visit_date: Option<String>,
    pub followup_date: Option<String>,
    pub disease_symptoms: String,
    pub prescription_treatment: Option<String>,
    pub dose: Option<String>,
    /// Decimal amount kept as text, e.g. `"150.00"`.
    pub fee: Option<String>,
}

impl Patient {
    /// Builds the stored form of a validated creation input.
    pub fn from_new(id: Uuid, input: NewPatient) -> Self {
        Self {
            id,
            name: input.name,
            age: input.age,
            gender: input.gender,
            contact_number: input.contact_number,
            visit_date: input.visit_date,
            followup_date: input.followup_date,
            disease_symptoms: input.disease_symptoms,
            prescription_treatment: input.prescription_treatment,
            dose: input.dose,
            fee: input.fee,
        }
    }

    /// Case-insensitive substring match against name, contact number and
    /// disease/symptoms. `needle` must already be lowercase.
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self
                .contact_number
                .as_deref()
                .is_some_and(|c| c.to_lowercase().contains(needle))
            || self.disease_symptoms.to_lowercase().contains(needle)
    }
}

/// Validated input for creating a patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPatient {
    pub name: String,
    pub age: i32,
    pub gender: Gender,
    #[serde(default)]
    pub contact_number: Option<String>,
    #[serde(default)]
    pub visit_date: Option<String>,
    #[serde(default)]
    pub followup_date: Option<String>,
    pub disease_symptoms: String,
    #[serde(default)]
    pub prescription_treatment: Option<String>,
    #[serde(default)]
    pub dose: Option<String>,
    #[serde(default)]
    pub fee: Option<String>,
}

impl NewPatient {
    /// Creates an input with the required fields set and every optional
    /// field absent.
    pub fn new(
        name: impl Into<String>,
        age: i32,
        gender: Gender,
        disease_symptoms: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            age,
            gender,
            contact_number: None,
            visit_date: None,
            followup_date: None,
            disease_symptoms: disease_symptoms.into(),
            prescription_treatment: None,
            dose: None,
            fee: None,
        }
    }

    #[must_use]
    pub fn with_contact_number(mut self, value: impl Into<String>) -> Self {
        self.contact_number = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_visit_date(mut self, value: impl Into<String>) -> Self {
        self.visit_date = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_followup_date(mut self, value: impl Into<String>) -> Self {
        self.followup_date = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_prescription_treatment(mut self, value: impl Into<String>) -> Self {
        self.prescription_treatment = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_dose(mut self, value: impl Into<String>) -> Self {
        self.dose = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_fee(mut self, value: impl Into<String>) -> Self {
        self.fee = Some(value.into());
        self
    }

    /// Checks an already-typed input against the same rules as
    /// [`validation::validate_new_patient`], and folds empty optional
    /// strings into `None`.
    pub fn validate(mut self) -> Result<Self, ValidationError> {
        let mut violations = Vec::new();
        let mut check = |field: &'static str, outcome: Option<&'static str>| {
            if let Some(message) = outcome {
                violations.push(FieldViolation::new(field, message));
            }
        };
        check("name", validation::check_name(&self.name));
        check("age", validation::check_age(i64::from(self.age)));
        check(
            "diseaseSymptoms",
            validation::check_disease_symptoms(&self.disease_symptoms),
        );

        for slot in [
            &mut self.contact_number,
            &mut self.visit_date,
            &mut self.followup_date,
            &mut self.prescription_treatment,
            &mut self.dose,
            &mut self.fee,
        ] {
            if slot.as_deref().is_some_and(str::is_empty) {
                *slot = None;
            }
        }
        if let Some(fee) = self.fee.take() {
            match validation::normalize_fee(&fee) {
                Ok(normalized) => self.fee = Some(normalized),
                Err(message) => {
                    check("fee", Some(message));
                    self.fee = Some(fee);
                }
            }
        }

        if violations.is_empty() {
            Ok(self)
        } else {
            Err(ValidationError::new(violations))
        }
    }
}

/// Validated partial update.
///
/// Required fields are `None` when untouched. Optional fields are
/// `None` when untouched, `Some(None)` to clear and `Some(Some(v))` to set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientPatch {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<Gender>,
    pub contact_number: Option<Option<String>>,
    pub visit_date: Option<Option<String>>,
    pub followup_date: Option<Option<String>>,
    pub disease_symptoms: Option<String>,
    pub prescription_treatment: Option<Option<String>>,
    pub dose: Option<Option<String>>,
    pub fee: Option<Option<String>>,
}

impl PatientPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merges the provided fields into `patient`. The id is never touched.
    pub fn apply_to(self, patient: &mut Patient) {
        if let Some(name) = self.name {
            patient.name = name;
        }
        if let Some(age) = self.age {
            patient.age = age;
        }
        if let Some(gender) = self.gender {
            patient.gender = gender;
        }
        if let Some(disease_symptoms) = self.disease_symptoms {
            patient.disease_symptoms = disease_symptoms;
        }
        merge(&mut patient.contact_number, self.contact_number);
        merge(&mut patient.visit_date, self.visit_date);
        merge(&mut patient.followup_date, self.followup_date);
        merge(
            &mut patient.prescription_treatment,
            self.prescription_treatment,
        );
        merge(&mut patient.dose, self.dose);
        merge(&mut patient.fee, self.fee);
    }
}

fn merge(slot: &mut Option<String>, change: Option<Option<String>>) {
    if let Some(value) = change {
        *slot = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Patient {
        Patient::from_new(
            Uuid::nil(),
            NewPatient::new("John Smith", 42, Gender::Male, "Persistent cough")
                .with_contact_number("555-0101")
                .with_fee("150.00"),
        )
    }

    #[test]
    fn test_gender_round_trip() {
        for gender in Gender::ALL {
            assert_eq!(gender.as_str().parse::<Gender>().unwrap(), gender);
        }
        assert!("Unknown".parse::<Gender>().is_err());
        assert!("male".parse::<Gender>().is_err());
    }

    #[test]
    fn test_patient_serializes_absent_as_null() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["contactNumber"], "555-0101");
        assert_eq!(json["gender"], "Male");
        assert!(json["visitDate"].is_null());
        assert!(json.get("visitDate").is_some());
    }

    #[test]
    fn test_empty_patch_is_noop() {
        let mut patient = sample();
        let before = patient.clone();
        let patch = PatientPatch::default();
        assert!(patch.is_empty());
        patch.apply_to(&mut patient);
        assert_eq!(patient, before);
    }

    #[test]
    fn test_patch_sets_and_clears() {
        let mut patient = sample();
        PatientPatch {
            age: Some(43),
            contact_number: Some(None),
            dose: Some(Some("5ml".into())),
            ..Default::default()
        }
        .apply_to(&mut patient);

        assert_eq!(patient.age, 43);
        assert_eq!(patient.contact_number, None);
        assert_eq!(patient.dose.as_deref(), Some("5ml"));
        assert_eq!(patient.name, "John Smith");
        assert_eq!(patient.fee.as_deref(), Some("150.00"));
    }

    #[test]
    fn test_matches_lowercase() {
        let patient = sample();
        assert!(patient.matches_lowercase("smith"));
        assert!(patient.matches_lowercase("0101"));
        assert!(patient.matches_lowercase("cough"));
        assert!(patient.matches_lowercase(""));
        assert!(!patient.matches_lowercase("fever"));
    }

    #[test]
    fn test_typed_validation_normalizes_empty_optionals() {
        let input = NewPatient::new("Ada", 30, Gender::Female, "Migraine")
            .with_visit_date("")
            .with_fee("");
        let input = input.validate().unwrap();
        assert_eq!(input.visit_date, None);
        assert_eq!(input.fee, None);
    }

    #[test]
    fn test_typed_validation_canonicalizes_fee() {
        let input = NewPatient::new("Ada", 30, Gender::Female, "Migraine")
            .with_fee("25")
            .validate()
            .unwrap();
        assert_eq!(input.fee.as_deref(), Some("25.00"));
    }

    #[test]
    fn test_typed_validation_collects_violations() {
        let err = NewPatient::new("", 0, Gender::Other, "")
            .with_fee("abc")
            .validate()
            .unwrap_err();
        assert_eq!(err.fields(), vec!["name", "age", "diseaseSymptoms", "fee"]);
    }
}
