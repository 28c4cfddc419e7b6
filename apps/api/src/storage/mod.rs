//! Entry storage — the persistence seam between handlers, the enrichment
//! workers, and Postgres.
//!
//! `AppState` holds an `Arc<dyn EntryStore>` so the pipeline can be exercised
//! against the in-memory implementation without a database.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::entry::{DiaryEntryRow, EnrichmentUpdate, NewDiaryEntry};
use crate::models::user::{ClinicianRow, PatientRow};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("entry {0} not found")]
    EntryNotFound(Uuid),
}

#[async_trait]
pub trait EntryStore: Send + Sync {
    /// Inserts a new entry with `generation_in_progress = true` and returns
    /// the stored row.
    async fn insert_entry(&self, new: NewDiaryEntry) -> Result<DiaryEntryRow, StoreError>;

    /// Fetches one entry scoped to its owning patient.
    async fn entry_for_patient(
        &self,
        id: Uuid,
        patient_id: Uuid,
    ) -> Result<Option<DiaryEntryRow>, StoreError>;

    /// All of a patient's entries, newest first.
    async fn entries_for_patient(
        &self,
        patient_id: Uuid,
    ) -> Result<Vec<DiaryEntryRow>, StoreError>;

    /// Up to `limit` of a patient's entries, newest first, optionally
    /// strictly older than `before` and excluding a single id.
    async fn recent_entries(
        &self,
        patient_id: Uuid,
        before: Option<DateTime<Utc>>,
        exclude: Option<Uuid>,
        limit: i64,
    ) -> Result<Vec<DiaryEntryRow>, StoreError>;

    /// The single terminal write of the enrichment job: applies all result
    /// fields and clears `generation_in_progress` in one statement, so a
    /// reader never observes a half-enriched entry.
    async fn complete_enrichment(
        &self,
        id: Uuid,
        update: EnrichmentUpdate,
    ) -> Result<(), StoreError>;

    /// Deletes a patient's own entry. Returns false when nothing matched.
    async fn delete_entry(&self, id: Uuid, patient_id: Uuid) -> Result<bool, StoreError>;

    async fn patient(&self, id: Uuid) -> Result<Option<PatientRow>, StoreError>;

    async fn clinician(&self, id: Uuid) -> Result<Option<ClinicianRow>, StoreError>;
}
