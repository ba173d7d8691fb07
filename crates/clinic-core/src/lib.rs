pub mod credentials;
pub mod error;
pub mod id;
pub mod patient;
pub mod time;
pub mod user;
pub mod validation;

pub use credentials::{hash_password, verify_password};
pub use error::{CoreError, ErrorCategory, Result};
pub use id::{generate_id, parse_id};
pub use patient::{Gender, NewPatient, Patient, PatientPatch};
pub use self::time::{parse_date, parse_visit_date};
pub use user::{NewUser, User};
pub use validation::{
    FieldViolation, ValidationError, validate_new_patient, validate_new_user,
    validate_patient_patch,
};
