//! Input validation for record creation and update.
//!
//! Every entry point (CLI, tests, any future API) sends raw JSON through
//! these functions before it reaches a store. Validation never stops at the
//! first problem: a [`ValidationError`] lists every violated field.
//!
//! # Example
//!
//! ```
//! use clinic_core::validation::validate_new_patient;
//! use serde_json::json;
//!
//! let err = validate_new_patient(&json!({
//!     "name": "",
//!     "age": 151,
//!     "gender": "Unknown",
//!     "diseaseSymptoms": "Fever"
//! }))
//! .unwrap_err();
//!
//! assert_eq!(err.fields(), vec!["name", "age", "gender"]);
//! ```

use serde::Serialize;
use serde_json::{Map, Value};

use crate::patient::{Gender, NewPatient, PatientPatch};
use crate::user::NewUser;

pub const MIN_AGE: i64 = 1;
pub const MAX_AGE: i64 = 150;

/// Largest number of integer digits a `decimal(10,2)` fee can hold.
const FEE_INTEGER_DIGITS: usize = 8;
const FEE_FRACTION_DIGITS: usize = 2;

/// One violated rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    /// Field name as it appears in the JSON input; `$` for the input itself.
    pub field: &'static str,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Validation failed: {}", render(.violations))]
pub struct ValidationError {
    violations: Vec<FieldViolation>,
}

fn render(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{}: {}", v.field, v.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    pub fn new(violations: Vec<FieldViolation>) -> Self {
        Self { violations }
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// Names of the violated fields, in input order.
    pub fn fields(&self) -> Vec<&'static str> {
        self.violations.iter().map(|v| v.field).collect()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }

    /// First message recorded for `field`.
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.violations
            .iter()
            .find(|v| v.field == field)
            .map(|v| v.message.as_str())
    }
}

// ==================== Field rules ====================

pub(crate) fn check_name(name: &str) -> Option<&'static str> {
    name.is_empty().then_some("Patient name is required")
}

pub(crate) fn check_age(age: i64) -> Option<&'static str> {
    if age < MIN_AGE {
        Some("Age must be greater than 0")
    } else if age > MAX_AGE {
        Some("Age must be less than 150")
    } else {
        None
    }
}

pub(crate) fn check_disease_symptoms(value: &str) -> Option<&'static str> {
    value
        .is_empty()
        .then_some("Disease/Symptoms description is required")
}

fn check_username(value: &str) -> Option<&'static str> {
    value.is_empty().then_some("Username is required")
}

fn check_password(value: &str) -> Option<&'static str> {
    value.is_empty().then_some("Password is required")
}

/// Validates a fee and returns it in canonical `decimal(10,2)` text: no
/// leading zeros and exactly two fraction digits (`"150"` becomes
/// `"150.00"`). Backends store this form as is.
pub(crate) fn normalize_fee(fee: &str) -> Result<String, &'static str> {
    const INVALID: &str = "Fee must be a valid amount";

    let (integer, fraction) = match fee.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (fee, None),
    };
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !digits(integer) || fraction.is_some_and(|f| !digits(f) || f.len() > FEE_FRACTION_DIGITS)
    {
        return Err(INVALID);
    }

    let integer = match integer.trim_start_matches('0') {
        "" => "0",
        trimmed => trimmed,
    };
    if integer.len() > FEE_INTEGER_DIGITS {
        return Err(INVALID);
    }
    let fraction = fraction.unwrap_or("");
    Ok(format!("{integer}.{fraction:0<width$}", width = FEE_FRACTION_DIGITS))
}

// ==================== JSON readers ====================

/// Collects violations while reading fields out of a JSON object.
struct Reader<'a> {
    object: &'a Map<String, Value>,
    violations: Vec<FieldViolation>,
}

impl<'a> Reader<'a> {
    fn new(input: &'a Value) -> Result<Self, ValidationError> {
        let object = input.as_object().ok_or_else(|| {
            ValidationError::new(vec![FieldViolation::new("$", "Expected a JSON object")])
        })?;
        Ok(Self {
            object,
            violations: Vec::new(),
        })
    }

    fn reject(&mut self, field: &'static str, message: impl Into<String>) {
        self.violations.push(FieldViolation::new(field, message));
    }

    fn is_present(&self, field: &str) -> bool {
        self.object.contains_key(field)
    }

    /// Reads a required, non-empty string.
    fn text(
        &mut self,
        field: &'static str,
        label: &str,
        rule: fn(&str) -> Option<&'static str>,
    ) -> Option<String> {
        let object = self.object;
        match object.get(field) {
            Some(Value::String(s)) => match rule(s) {
                Some(message) => {
                    self.reject(field, message);
                    None
                }
                None => Some(s.clone()),
            },
            None | Some(Value::Null) => {
                // The emptiness rule carries the "is required" message.
                let message = rule("").unwrap_or("is required");
                self.reject(field, message);
                None
            }
            Some(_) => {
                self.reject(field, format!("{label} must be a string"));
                None
            }
        }
    }

    fn age(&mut self) -> Option<i32> {
        let object = self.object;
        let value = match object.get("age") {
            None | Some(Value::Null) => {
                self.reject("age", "Age is required");
                return None;
            }
            Some(Value::Number(n)) => n,
            Some(_) => {
                self.reject("age", "Age must be a number");
                return None;
            }
        };
        let age = match value.as_i64() {
            Some(age) => age,
            None => match value.as_f64() {
                // Past the i64 range every finite float is whole; the cast
                // saturates, so check_age reports it as out of range.
                Some(f) if f.is_finite() && f.fract() == 0.0 => f as i64,
                _ => {
                    self.reject("age", "Age must be a whole number");
                    return None;
                }
            },
        };
        match check_age(age) {
            Some(message) => {
                self.reject("age", message);
                None
            }
            // check_age bounds the value to 1..=150.
            None => i32::try_from(age).ok(),
        }
    }

    fn gender(&mut self) -> Option<Gender> {
        let object = self.object;
        match object.get("gender") {
            None | Some(Value::Null) => {
                self.reject("gender", "Gender is required");
                None
            }
            Some(Value::String(s)) => match s.parse() {
                Ok(gender) => Some(gender),
                Err(_) => {
                    self.reject("gender", "Gender must be one of Male, Female, Other");
                    None
                }
            },
            Some(_) => {
                self.reject("gender", "Gender must be one of Male, Female, Other");
                None
            }
        }
    }

    /// Reads an optional string. `Ok(None)` covers absent, `null` and `""`.
    fn optional_text(&mut self, field: &'static str, label: &str) -> Result<Option<String>, ()> {
        let object = self.object;
        match object.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) if s.is_empty() => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => {
                self.reject(field, format!("{label} must be a string"));
                Err(())
            }
        }
    }

    fn optional_fee(&mut self) -> Result<Option<String>, ()> {
        let Some(fee) = self.optional_text("fee", "Fee")? else {
            return Ok(None);
        };
        match normalize_fee(&fee) {
            Ok(normalized) => Ok(Some(normalized)),
            Err(message) => {
                self.reject("fee", message);
                Err(())
            }
        }
    }

    fn finish<T>(self, value: impl FnOnce() -> Option<T>) -> Result<T, ValidationError> {
        if !self.violations.is_empty() {
            return Err(ValidationError::new(self.violations));
        }
        value().ok_or_else(|| {
            ValidationError::new(vec![FieldViolation::new("$", "Incomplete input")])
        })
    }
}

// Optional fields share the same reading rules; labels feed the messages.
const CONTACT_NUMBER: (&str, &str) = ("contactNumber", "Contact number");
const VISIT_DATE: (&str, &str) = ("visitDate", "Visit date");
const FOLLOWUP_DATE: (&str, &str) = ("followupDate", "Follow-up date");
const PRESCRIPTION_TREATMENT: (&str, &str) = ("prescriptionTreatment", "Prescription/treatment");
const DOSE: (&str, &str) = ("dose", "Dose");

// ==================== Public validators ====================

/// Validates a patient creation payload.
///
/// Rules: `name` non-empty; `age` a whole number in 1..=150; `gender` one of
/// `Male`, `Female`, `Other`; `diseaseSymptoms` non-empty; every other field
/// an optional string, with `fee` a decimal amount.
pub fn validate_new_patient(input: &Value) -> Result<NewPatient, ValidationError> {
    let mut r = Reader::new(input)?;

    let name = r.text("name", "Patient name", check_name);
    let age = r.age();
    let gender = r.gender();
    let contact_number = r.optional_text(CONTACT_NUMBER.0, CONTACT_NUMBER.1);
    let visit_date = r.optional_text(VISIT_DATE.0, VISIT_DATE.1);
    let followup_date = r.optional_text(FOLLOWUP_DATE.0, FOLLOWUP_DATE.1);
    let disease_symptoms = r.text(
        "diseaseSymptoms",
        "Disease/Symptoms",
        check_disease_symptoms,
    );
    let prescription_treatment =
        r.optional_text(PRESCRIPTION_TREATMENT.0, PRESCRIPTION_TREATMENT.1);
    let dose = r.optional_text(DOSE.0, DOSE.1);
    let fee = r.optional_fee();

    r.finish(|| {
        Some(NewPatient {
            name: name?,
            age: age?,
            gender: gender?,
            contact_number: contact_number.ok()?,
            visit_date: visit_date.ok()?,
            followup_date: followup_date.ok()?,
            disease_symptoms: disease_symptoms?,
            prescription_treatment: prescription_treatment.ok()?,
            dose: dose.ok()?,
            fee: fee.ok()?,
        })
    })
}

/// Validates a partial patient update.
///
/// Only keys present in `input` are checked and carried. For optional fields
/// `null` or `""` clears the stored value.
pub fn validate_patient_patch(input: &Value) -> Result<PatientPatch, ValidationError> {
    let mut r = Reader::new(input)?;
    let mut patch = PatientPatch::default();

    if r.is_present("name") {
        patch.name = r.text("name", "Patient name", check_name);
    }
    if r.is_present("age") {
        patch.age = r.age();
    }
    if r.is_present("gender") {
        patch.gender = r.gender();
    }
    if r.is_present("diseaseSymptoms") {
        patch.disease_symptoms = r.text(
            "diseaseSymptoms",
            "Disease/Symptoms",
            check_disease_symptoms,
        );
    }
    for ((field, label), slot) in [
        (CONTACT_NUMBER, &mut patch.contact_number),
        (VISIT_DATE, &mut patch.visit_date),
        (FOLLOWUP_DATE, &mut patch.followup_date),
        (PRESCRIPTION_TREATMENT, &mut patch.prescription_treatment),
        (DOSE, &mut patch.dose),
    ] {
        if r.is_present(field) {
            *slot = r.optional_text(field, label).ok();
        }
    }
    if r.is_present("fee") {
        patch.fee = r.optional_fee().ok();
    }

    r.finish(|| Some(patch))
}

/// Validates a user creation payload: `username` and `password` are both
/// required non-empty strings.
pub fn validate_new_user(input: &Value) -> Result<NewUser, ValidationError> {
    let mut r = Reader::new(input)?;
    let username = r.text("username", "Username", check_username);
    let password = r.text("password", "Password", check_password);
    r.finish(|| Some(NewUser::new(username?, password?)))
}
