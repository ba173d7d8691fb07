use async_trait::async_trait;
use clinic_core::{NewPatient, NewUser, Patient, PatientPatch, User, generate_id, hash_password};
use clinic_storage::{ClinicStorage, StorageError, filter_by_query, sort_for_listing};
use indexmap::IndexMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory clinic storage.
///
/// Each collection is an insertion-ordered map behind its own `RwLock`:
/// - reads share the lock and see a consistent snapshot
/// - every create/update/delete holds the write lock of its collection, so
///   id assignment and read-modify-write on one record are serialized
/// - deletes use `shift_remove`, keeping the remaining insertion order
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    users: RwLock<IndexMap<Uuid, User>>,
    patients: RwLock<IndexMap<Uuid, Patient>>,
}

impl InMemoryStorage {
    /// Creates a new, empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Picks an id not already present in `map`.
    fn fresh_id<T>(map: &IndexMap<Uuid, T>) -> Uuid {
        loop {
            let id = generate_id();
            if !map.contains_key(&id) {
                return id;
            }
        }
    }
}

#[async_trait]
impl ClinicStorage for InMemoryStorage {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>, StorageError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StorageError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn create_user(&self, input: NewUser) -> Result<User, StorageError> {
        // Hash outside the lock.
        let password_hash = hash_password(&input.password)?;

        let mut users = self.users.write().await;
        if users.values().any(|u| u.username == input.username) {
            return Err(StorageError::already_exists("User", input.username));
        }
        let user = User {
            id: Self::fresh_id(&users),
            username: input.username,
            password_hash,
        };
        users.insert(user.id, user.clone());
        tracing::debug!(user.id = %user.id, "User created");
        Ok(user)
    }

    async fn get_patient(&self, id: Uuid) -> Result<Option<Patient>, StorageError> {
        Ok(self.patients.read().await.get(&id).cloned())
    }

    async fn get_all_patients(&self) -> Result<Vec<Patient>, StorageError> {
        let snapshot: Vec<Patient> = self.patients.read().await.values().cloned().collect();
        Ok(sort_for_listing(snapshot))
    }

    async fn create_patient(&self, input: NewPatient) -> Result<Patient, StorageError> {
        let mut patients = self.patients.write().await;
        let patient = Patient::from_new(Self::fresh_id(&patients), input);
        patients.insert(patient.id, patient.clone());
        tracing::debug!(patient.id = %patient.id, "Patient created");
        Ok(patient)
    }

    async fn update_patient(
        &self,
        id: Uuid,
        patch: PatientPatch,
    ) -> Result<Option<Patient>, StorageError> {
        let mut patients = self.patients.write().await;
        let Some(patient) = patients.get_mut(&id) else {
            return Ok(None);
        };
        patch.apply_to(patient);
        tracing::debug!(patient.id = %id, "Patient updated");
        Ok(Some(patient.clone()))
    }

    async fn delete_patient(&self, id: Uuid) -> Result<bool, StorageError> {
        let removed = self.patients.write().await.shift_remove(&id).is_some();
        if removed {
            tracing::debug!(patient.id = %id, "Patient deleted");
        }
        Ok(removed)
    }

    async fn search_patients(&self, query: &str) -> Result<Vec<Patient>, StorageError> {
        let patients = self.patients.read().await;
        Ok(filter_by_query(patients.values(), query))
    }

    async fn count_patients(&self) -> Result<usize, StorageError> {
        Ok(self.patients.read().await.len())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinic_core::{Gender, validate_new_patient};
    use serde_json::json;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn new_patient(name: &str) -> NewPatient {
        NewPatient::new(name, 30, Gender::Female, "Headache")
    }

    fn dated(name: &str, visit_date: &str) -> NewPatient {
        new_patient(name).with_visit_date(visit_date)
    }

    #[tokio::test]
    async fn test_create_and_get_patient() {
        let storage = InMemoryStorage::new();
        let input = NewPatient::new("John Smith", 42, Gender::Male, "Persistent cough")
            .with_contact_number("555-0101")
            .with_visit_date("2024-06-01")
            .with_followup_date("2024-06-15")
            .with_prescription_treatment("Syrup")
            .with_dose("10ml")
            .with_fee("150.00");

        let created = storage.create_patient(input.clone()).await.unwrap();
        assert_eq!(created, Patient::from_new(created.id, input));

        let fetched = storage.get_patient(created.id).await.unwrap();
        assert_eq!(fetched, Some(created));
        assert_eq!(storage.count_patients().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_created_ids_are_unique() {
        let storage = InMemoryStorage::new();
        let mut ids = HashSet::new();
        for i in 0..20 {
            let created = storage
                .create_patient(new_patient(&format!("Patient {i}")))
                .await
                .unwrap();
            assert!(ids.insert(created.id));
        }
    }

    #[tokio::test]
    async fn test_absent_optionals_stay_absent() {
        let storage = InMemoryStorage::new();
        let input = validate_new_patient(&json!({
            "name": "Ada",
            "age": 30,
            "gender": "Female",
            "diseaseSymptoms": "Migraine",
            "contactNumber": ""
        }))
        .unwrap();
        let created = storage.create_patient(input).await.unwrap();
        assert_eq!(created.contact_number, None);
        assert_eq!(created.visit_date, None);
        assert_eq!(created.fee, None);
    }

    #[tokio::test]
    async fn test_fee_stored_in_canonical_form() {
        let storage = InMemoryStorage::new();
        let input = validate_new_patient(&json!({
            "name": "Ada",
            "age": 30,
            "gender": "Female",
            "diseaseSymptoms": "Migraine",
            "fee": "150"
        }))
        .unwrap();
        let created = storage.create_patient(input).await.unwrap();
        assert_eq!(created.fee.as_deref(), Some("150.00"));

        let patch = clinic_core::validate_patient_patch(&json!({"fee": "7.5"})).unwrap();
        let updated = storage
            .update_patient(created.id, patch)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.fee.as_deref(), Some("7.50"));
    }

    #[tokio::test]
    async fn test_get_unknown_patient() {
        let storage = InMemoryStorage::new();
        assert_eq!(storage.get_patient(Uuid::new_v4()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_empty_update_returns_record_unchanged() {
        let storage = InMemoryStorage::new();
        let created = storage.create_patient(new_patient("Ada")).await.unwrap();

        let updated = storage
            .update_patient(created.id, PatientPatch::default())
            .await
            .unwrap();
        assert_eq!(updated, Some(created));
    }

    #[tokio::test]
    async fn test_update_merges_only_provided_fields() {
        let storage = InMemoryStorage::new();
        let created = storage
            .create_patient(new_patient("Ada").with_contact_number("555-0199"))
            .await
            .unwrap();

        let patch = PatientPatch {
            age: Some(31),
            dose: Some(Some("2 tablets".into())),
            ..Default::default()
        };
        let updated = storage
            .update_patient(created.id, patch)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.age, 31);
        assert_eq!(updated.dose.as_deref(), Some("2 tablets"));
        assert_eq!(updated.name, "Ada");
        assert_eq!(updated.contact_number.as_deref(), Some("555-0199"));
        assert_eq!(
            storage.get_patient(created.id).await.unwrap(),
            Some(updated)
        );
    }

    #[tokio::test]
    async fn test_update_unknown_id_changes_nothing() {
        let storage = InMemoryStorage::new();
        storage.create_patient(new_patient("Ada")).await.unwrap();

        let patch = PatientPatch {
            name: Some("Ghost".into()),
            ..Default::default()
        };
        let result = storage.update_patient(Uuid::new_v4(), patch).await.unwrap();
        assert_eq!(result, None);
        assert_eq!(storage.count_patients().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let storage = InMemoryStorage::new();
        let created = storage.create_patient(new_patient("Ada")).await.unwrap();

        assert!(storage.delete_patient(created.id).await.unwrap());
        assert_eq!(storage.get_patient(created.id).await.unwrap(), None);
        assert!(!storage.delete_patient(created.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_keeps_insertion_order() {
        let storage = InMemoryStorage::new();
        let a = storage.create_patient(new_patient("First")).await.unwrap();
        let b = storage.create_patient(new_patient("Second")).await.unwrap();
        let c = storage.create_patient(new_patient("Third")).await.unwrap();

        storage.delete_patient(b.id).await.unwrap();
        let remaining: Vec<Uuid> = storage
            .search_patients("")
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(remaining, vec![a.id, c.id]);
    }

    #[tokio::test]
    async fn test_get_all_patients_ordering() {
        let storage = InMemoryStorage::new();
        let d = storage.create_patient(new_patient("Zeller")).await.unwrap();
        let a = storage
            .create_patient(dated("Abel", "2024-01-01"))
            .await
            .unwrap();
        let c = storage.create_patient(new_patient("Adams")).await.unwrap();
        let b = storage
            .create_patient(dated("Abbott", "2024-06-01"))
            .await
            .unwrap();

        let order: Vec<Uuid> = storage
            .get_all_patients()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(order, vec![b.id, a.id, c.id, d.id]);
    }

    #[tokio::test]
    async fn test_search_matches_any_field_case_insensitively() {
        let storage = InMemoryStorage::new();
        let by_name = storage
            .create_patient(new_patient("John Smith"))
            .await
            .unwrap();
        let by_contact = storage
            .create_patient(new_patient("Mary Major").with_contact_number("smith-clinic"))
            .await
            .unwrap();
        let by_symptoms = storage
            .create_patient(NewPatient::new(
                "Tom Tailor",
                50,
                Gender::Male,
                "Blacksmith injury",
            ))
            .await
            .unwrap();
        storage
            .create_patient(new_patient("Nobody Else"))
            .await
            .unwrap();

        let found: Vec<Uuid> = storage
            .search_patients("SMITH")
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(found, vec![by_name.id, by_contact.id, by_symptoms.id]);
    }

    #[tokio::test]
    async fn test_empty_search_matches_everything() {
        let storage = InMemoryStorage::new();
        storage.create_patient(new_patient("A")).await.unwrap();
        storage.create_patient(new_patient("B")).await.unwrap();
        assert_eq!(storage.search_patients("").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_user_lifecycle() {
        let storage = InMemoryStorage::new();
        let user = storage
            .create_user(NewUser::new("reception", "s3cret"))
            .await
            .unwrap();

        assert_ne!(user.password_hash, "s3cret");
        assert_eq!(
            storage.get_user(user.id).await.unwrap(),
            Some(user.clone())
        );
        assert_eq!(
            storage.get_user_by_username("reception").await.unwrap(),
            Some(user.clone())
        );
        assert_eq!(storage.get_user_by_username("Reception").await.unwrap(), None);
        assert_eq!(storage.get_user(Uuid::new_v4()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let storage = InMemoryStorage::new();
        storage
            .create_user(NewUser::new("reception", "a"))
            .await
            .unwrap();
        let err = storage
            .create_user(NewUser::new("reception", "b"))
            .await
            .unwrap_err();
        assert!(err.is_already_exists());
    }

    #[tokio::test]
    async fn test_verify_user_password() {
        let storage = InMemoryStorage::new();
        let user = storage
            .create_user(NewUser::new("doctor", "stethoscope"))
            .await
            .unwrap();

        let ok = storage
            .verify_user_password("doctor", "stethoscope")
            .await
            .unwrap();
        assert_eq!(ok.map(|u| u.id), Some(user.id));
        assert_eq!(
            storage.verify_user_password("doctor", "wrong").await.unwrap(),
            None
        );
        assert_eq!(
            storage.verify_user_password("nobody", "x").await.unwrap(),
            None
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_get_distinct_ids() {
        let storage = Arc::new(InMemoryStorage::new());
        let handles: Vec<_> = (0..64)
            .map(|i| {
                let storage = Arc::clone(&storage);
                tokio::spawn(async move {
                    storage
                        .create_patient(new_patient(&format!("P{i}")))
                        .await
                        .unwrap()
                        .id
                })
            })
            .collect();

        let mut ids = HashSet::new();
        for handle in handles {
            ids.insert(handle.await.unwrap());
        }
        assert_eq!(ids.len(), 64);
        assert_eq!(storage.count_patients().await.unwrap(), 64);
    }

    #[test]
    fn test_backend_name() {
        assert_eq!(InMemoryStorage::new().backend_name(), "memory");
    }
}
