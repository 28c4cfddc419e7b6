//! In-memory store backing the pipeline and handler tests. Applies the same
//! ownership scoping and ordering rules as the Postgres implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::entry::{DiaryEntryRow, EnrichmentUpdate, NewDiaryEntry};
use crate::models::user::{ClinicianRow, PatientRow};
use crate::storage::{EntryStore, StoreError};

#[derive(Default)]
pub struct MemoryEntryStore {
    entries: RwLock<HashMap<Uuid, DiaryEntryRow>>,
    patients: RwLock<HashMap<Uuid, PatientRow>>,
    clinicians: RwLock<HashMap<Uuid, ClinicianRow>>,
}

impl MemoryEntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_patient(&self, patient: PatientRow) {
        self.patients.write().await.insert(patient.id, patient);
    }

    pub async fn add_clinician(&self, clinician: ClinicianRow) {
        self.clinicians.write().await.insert(clinician.id, clinician);
    }

    /// Inserts a fully formed row, bypassing the creation defaults. Used to
    /// seed history with explicit timestamps.
    pub async fn seed_entry(&self, row: DiaryEntryRow) {
        self.entries.write().await.insert(row.id, row);
    }
}

#[async_trait]
impl EntryStore for MemoryEntryStore {
    async fn insert_entry(&self, new: NewDiaryEntry) -> Result<DiaryEntryRow, StoreError> {
        let row = DiaryEntryRow {
            id: Uuid::new_v4(),
            patient_id: new.patient_id,
            text: new.text,
            created_at: Utc::now(),
            support_text: None,
            clinical_note: None,
            emotion: None,
            emotion_explanation: None,
            social_context: None,
            context_explanation: None,
            is_emergency: new.is_emergency,
            emergency_kind: new.emergency_kind,
            emergency_message: new.emergency_message,
            generation_in_progress: true,
        };
        self.entries.write().await.insert(row.id, row.clone());
        Ok(row)
    }

    async fn entry_for_patient(
        &self,
        id: Uuid,
        patient_id: Uuid,
    ) -> Result<Option<DiaryEntryRow>, StoreError> {
        Ok(self
            .entries
            .read()
            .await
            .get(&id)
            .filter(|e| e.patient_id == patient_id)
            .cloned())
    }

    async fn entries_for_patient(
        &self,
        patient_id: Uuid,
    ) -> Result<Vec<DiaryEntryRow>, StoreError> {
        let mut rows: Vec<DiaryEntryRow> = self
            .entries
            .read()
            .await
            .values()
            .filter(|e| e.patient_id == patient_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn recent_entries(
        &self,
        patient_id: Uuid,
        before: Option<DateTime<Utc>>,
        exclude: Option<Uuid>,
        limit: i64,
    ) -> Result<Vec<DiaryEntryRow>, StoreError> {
        let mut rows: Vec<DiaryEntryRow> = self
            .entries
            .read()
            .await
            .values()
            .filter(|e| e.patient_id == patient_id)
            .filter(|e| before.map_or(true, |ts| e.created_at < ts))
            .filter(|e| exclude.map_or(true, |id| e.id != id))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows.truncate(limit.max(0) as usize);
        Ok(rows)
    }

    async fn complete_enrichment(
        &self,
        id: Uuid,
        update: EnrichmentUpdate,
    ) -> Result<(), StoreError> {
        let mut entries = self.entries.write().await;
        let row = entries.get_mut(&id).ok_or(StoreError::EntryNotFound(id))?;
        row.support_text = update.support_text;
        row.clinical_note = update.clinical_note;
        row.emotion = update.emotion;
        row.emotion_explanation = update.emotion_explanation;
        row.social_context = update.social_context;
        row.context_explanation = update.context_explanation;
        row.generation_in_progress = false;
        Ok(())
    }

    async fn delete_entry(&self, id: Uuid, patient_id: Uuid) -> Result<bool, StoreError> {
        let mut entries = self.entries.write().await;
        match entries.get(&id) {
            Some(e) if e.patient_id == patient_id => {
                entries.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn patient(&self, id: Uuid) -> Result<Option<PatientRow>, StoreError> {
        Ok(self.patients.read().await.get(&id).cloned())
    }

    async fn clinician(&self, id: Uuid) -> Result<Option<ClinicianRow>, StoreError> {
        Ok(self.clinicians.read().await.get(&id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn make_row(patient_id: Uuid, created_at: DateTime<Utc>) -> DiaryEntryRow {
        DiaryEntryRow {
            id: Uuid::new_v4(),
            patient_id,
            text: "entry".to_string(),
            created_at,
            support_text: None,
            clinical_note: None,
            emotion: None,
            emotion_explanation: None,
            social_context: None,
            context_explanation: None,
            is_emergency: false,
            emergency_kind: None,
            emergency_message: None,
            generation_in_progress: false,
        }
    }

    #[tokio::test]
    async fn test_recent_entries_strictly_before_cutoff() {
        let store = MemoryEntryStore::new();
        let patient_id = Uuid::new_v4();
        let cutoff = Utc::now();

        let older = make_row(patient_id, cutoff - Duration::hours(1));
        let at_cutoff = make_row(patient_id, cutoff);
        let newer = make_row(patient_id, cutoff + Duration::hours(1));
        store.seed_entry(older.clone()).await;
        store.seed_entry(at_cutoff).await;
        store.seed_entry(newer).await;

        let rows = store
            .recent_entries(patient_id, Some(cutoff), None, 10)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, older.id);
    }

    #[tokio::test]
    async fn test_recent_entries_excludes_id_and_limits() {
        let store = MemoryEntryStore::new();
        let patient_id = Uuid::new_v4();
        let base = Utc::now();

        let mut ids = Vec::new();
        for i in 0..4 {
            let row = make_row(patient_id, base - Duration::minutes(i));
            ids.push(row.id);
            store.seed_entry(row).await;
        }

        let rows = store
            .recent_entries(patient_id, None, Some(ids[0]), 2)
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.id != ids[0]));
        // Newest first among the remaining three
        assert_eq!(rows[0].id, ids[1]);
        assert_eq!(rows[1].id, ids[2]);
    }

    #[tokio::test]
    async fn test_delete_requires_owning_patient() {
        let store = MemoryEntryStore::new();
        let patient_id = Uuid::new_v4();
        let row = make_row(patient_id, Utc::now());
        let id = row.id;
        store.seed_entry(row).await;

        assert!(!store.delete_entry(id, Uuid::new_v4()).await.unwrap());
        assert!(store.delete_entry(id, patient_id).await.unwrap());
        assert!(!store.delete_entry(id, patient_id).await.unwrap());
    }

    #[tokio::test]
    async fn test_complete_enrichment_missing_entry_errors() {
        let store = MemoryEntryStore::new();
        let err = store
            .complete_enrichment(Uuid::new_v4(), EnrichmentUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::EntryNotFound(_)));
    }
}
