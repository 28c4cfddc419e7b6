use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::entry::{DiaryEntryRow, EnrichmentUpdate, NewDiaryEntry};
use crate::models::user::{ClinicianRow, PatientRow};
use crate::storage::{EntryStore, StoreError};

/// Postgres-backed entry store. Every call checks a connection out of the
/// pool for just that operation, so background jobs never hold a handle that
/// outlives the work.
pub struct PgEntryStore {
    pool: PgPool,
}

impl PgEntryStore {
    /// Connects a pool and wraps it.
    pub async fn connect(database_url: &str) -> Result<Self> {
        info!("Connecting to PostgreSQL...");

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        info!("PostgreSQL connection pool established");
        Ok(Self { pool })
    }

    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntryStore for PgEntryStore {
    async fn insert_entry(&self, new: NewDiaryEntry) -> Result<DiaryEntryRow, StoreError> {
        let row = sqlx::query_as::<_, DiaryEntryRow>(
            r#"
            INSERT INTO diary_entries
                (id, patient_id, text, created_at, is_emergency, emergency_kind,
                 emergency_message, generation_in_progress)
            VALUES ($1, $2, $3, NOW(), $4, $5, $6, TRUE)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.patient_id)
        .bind(&new.text)
        .bind(new.is_emergency)
        .bind(&new.emergency_kind)
        .bind(&new.emergency_message)
        .fetch_one(&self.pool)
        .await?;

        info!("Inserted diary entry {} for patient {}", row.id, row.patient_id);
        Ok(row)
    }

    async fn entry_for_patient(
        &self,
        id: Uuid,
        patient_id: Uuid,
    ) -> Result<Option<DiaryEntryRow>, StoreError> {
        Ok(sqlx::query_as::<_, DiaryEntryRow>(
            "SELECT * FROM diary_entries WHERE id = $1 AND patient_id = $2",
        )
        .bind(id)
        .bind(patient_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn entries_for_patient(
        &self,
        patient_id: Uuid,
    ) -> Result<Vec<DiaryEntryRow>, StoreError> {
        Ok(sqlx::query_as::<_, DiaryEntryRow>(
            "SELECT * FROM diary_entries WHERE patient_id = $1 ORDER BY created_at DESC",
        )
        .bind(patient_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn recent_entries(
        &self,
        patient_id: Uuid,
        before: Option<DateTime<Utc>>,
        exclude: Option<Uuid>,
        limit: i64,
    ) -> Result<Vec<DiaryEntryRow>, StoreError> {
        Ok(sqlx::query_as::<_, DiaryEntryRow>(
            r#"
            SELECT * FROM diary_entries
            WHERE patient_id = $1
              AND ($2::timestamptz IS NULL OR created_at < $2)
              AND ($3::uuid IS NULL OR id <> $3)
            ORDER BY created_at DESC
            LIMIT $4
            "#,
        )
        .bind(patient_id)
        .bind(before)
        .bind(exclude)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn complete_enrichment(
        &self,
        id: Uuid,
        update: EnrichmentUpdate,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE diary_entries
            SET support_text = $2,
                clinical_note = $3,
                emotion = $4,
                emotion_explanation = $5,
                social_context = $6,
                context_explanation = $7,
                generation_in_progress = FALSE
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&update.support_text)
        .bind(&update.clinical_note)
        .bind(&update.emotion)
        .bind(&update.emotion_explanation)
        .bind(&update.social_context)
        .bind(&update.context_explanation)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::EntryNotFound(id));
        }
        Ok(())
    }

    async fn delete_entry(&self, id: Uuid, patient_id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM diary_entries WHERE id = $1 AND patient_id = $2")
            .bind(id)
            .bind(patient_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn patient(&self, id: Uuid) -> Result<Option<PatientRow>, StoreError> {
        Ok(
            sqlx::query_as::<_, PatientRow>("SELECT * FROM patients WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn clinician(&self, id: Uuid) -> Result<Option<ClinicianRow>, StoreError> {
        Ok(
            sqlx::query_as::<_, ClinicianRow>("SELECT * FROM clinicians WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }
}
