use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A diary entry row. The raw text is immutable after creation; every
/// enrichment field stays `None` until the background job finishes.
///
/// While `generation_in_progress` is true the enrichment fields must be
/// treated as undefined by readers.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DiaryEntryRow {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub support_text: Option<String>,
    pub clinical_note: Option<String>,
    pub emotion: Option<String>,
    pub emotion_explanation: Option<String>,
    pub social_context: Option<String>,
    pub context_explanation: Option<String>,
    pub is_emergency: bool,
    pub emergency_kind: Option<String>,
    pub emergency_message: Option<String>,
    pub generation_in_progress: bool,
}

/// Payload for inserting a new entry. Everything the submission path knows
/// synchronously: the text, the crisis screening outcome and the templated
/// emergency message. Enrichment fields are filled in later by the job.
#[derive(Debug, Clone)]
pub struct NewDiaryEntry {
    pub patient_id: Uuid,
    pub text: String,
    pub is_emergency: bool,
    pub emergency_kind: Option<String>,
    pub emergency_message: Option<String>,
}

/// The single terminal write performed by the enrichment job. Applied as one
/// update that also clears `generation_in_progress`, so readers never see a
/// half-enriched entry.
#[derive(Debug, Clone, Default)]
pub struct EnrichmentUpdate {
    pub support_text: Option<String>,
    pub clinical_note: Option<String>,
    pub emotion: Option<String>,
    pub emotion_explanation: Option<String>,
    pub social_context: Option<String>,
    pub context_explanation: Option<String>,
}

/// Placeholder stored in the clinical-note field when the job aborts.
pub const ENRICHMENT_FAILED_PLACEHOLDER: &str =
    "An error occurred while generating the clinical analysis.";

impl EnrichmentUpdate {
    /// Terminal state for a job that hit an unexpected error: a diagnostic
    /// placeholder in the clinical note, everything else left empty. The
    /// flag is still cleared so the entry never stays stuck in progress.
    pub fn failed() -> Self {
        EnrichmentUpdate {
            clinical_note: Some(ENRICHMENT_FAILED_PLACEHOLDER.to_string()),
            ..Default::default()
        }
    }
}
