use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::enrichment::vocabulary::{context_emoji, emotion_emoji, emotion_polarity};
use crate::enrichment::EnrichmentJob;
use crate::errors::AppError;
use crate::models::entry::{DiaryEntryRow, NewDiaryEntry};
use crate::screening;
use crate::state::AppState;

// Display fallbacks for labels the vocabulary tables do not cover
// (unverified classifier output stored as-is).
const UNKNOWN_EMOTION_EMOJI: &str = "💭";
const UNKNOWN_CONTEXT_EMOJI: &str = "📝";
const UNKNOWN_POLARITY: &str = "neutral";

#[derive(Deserialize)]
pub struct PatientIdQuery {
    pub patient_id: Uuid,
}

#[derive(Deserialize)]
pub struct CreateEntryRequest {
    pub patient_id: Uuid,
    pub text: String,
    #[serde(default)]
    pub request_support: bool,
}

#[derive(Serialize)]
pub struct EntryCreatedResponse {
    pub entry_id: Uuid,
}

/// List item. Enrichment fields appear as they become available; while
/// `generation_in_progress` is true the client shows a spinner instead.
#[derive(Serialize)]
pub struct EntrySummary {
    pub id: Uuid,
    pub text: String,
    pub created_at: String,
    pub emotion: Option<String>,
    pub emotion_emoji: Option<String>,
    pub generation_in_progress: bool,
}

/// Full patient-facing view of one entry. The clinical note is deliberately
/// absent: it is written for the clinician, not the patient.
#[derive(Serialize)]
pub struct EntryDetail {
    pub id: Uuid,
    pub date: String,
    pub time: String,
    pub text: String,
    pub support_text: Option<String>,
    pub emotion: Option<String>,
    pub emotion_emoji: Option<String>,
    pub emotion_category: Option<String>,
    pub emotion_explanation: Option<String>,
    pub social_context: Option<String>,
    pub context_emoji: Option<String>,
    pub context_explanation: Option<String>,
    pub is_emergency: bool,
    pub emergency_kind: Option<String>,
    pub emergency_message: Option<String>,
    pub generation_in_progress: bool,
}

impl From<DiaryEntryRow> for EntrySummary {
    fn from(row: DiaryEntryRow) -> Self {
        let local = row.created_at.with_timezone(&Local);
        EntrySummary {
            id: row.id,
            text: row.text,
            created_at: local.to_rfc3339(),
            emotion_emoji: row
                .emotion
                .as_deref()
                .map(|e| emotion_emoji(e).unwrap_or(UNKNOWN_EMOTION_EMOJI).to_string()),
            emotion: row.emotion,
            generation_in_progress: row.generation_in_progress,
        }
    }
}

impl From<DiaryEntryRow> for EntryDetail {
    fn from(row: DiaryEntryRow) -> Self {
        let local = row.created_at.with_timezone(&Local);
        EntryDetail {
            id: row.id,
            date: local.format("%A, %d %B %Y").to_string(),
            time: local.format("%H:%M").to_string(),
            text: row.text,
            support_text: row.support_text,
            emotion_emoji: row
                .emotion
                .as_deref()
                .map(|e| emotion_emoji(e).unwrap_or(UNKNOWN_EMOTION_EMOJI).to_string()),
            emotion_category: row
                .emotion
                .as_deref()
                .map(|e| emotion_polarity(e).unwrap_or(UNKNOWN_POLARITY).to_string()),
            emotion: row.emotion,
            emotion_explanation: row.emotion_explanation,
            context_emoji: row
                .social_context
                .as_deref()
                .map(|c| context_emoji(c).unwrap_or(UNKNOWN_CONTEXT_EMOJI).to_string()),
            social_context: row.social_context,
            context_explanation: row.context_explanation,
            is_emergency: row.is_emergency,
            emergency_kind: row.emergency_kind,
            emergency_message: row.emergency_message,
            generation_in_progress: row.generation_in_progress,
        }
    }
}

/// POST /api/v1/entries
///
/// Screens the text for crisis content, stores the entry with
/// `generation_in_progress = true` and hands it to the enrichment queue.
/// Returns 201 as soon as the entry is durable; enrichment results land
/// later via the background workers.
pub async fn handle_create_entry(
    State(state): State<AppState>,
    Json(req): Json<CreateEntryRequest>,
) -> Result<(StatusCode, Json<EntryCreatedResponse>), AppError> {
    let text = req.text.trim();
    if text.is_empty() {
        return Err(AppError::Validation(
            "Entry text must not be empty".to_string(),
        ));
    }

    let patient = state
        .store
        .patient(req.patient_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Patient {} not found", req.patient_id)))?;
    let clinician = state.store.clinician(patient.clinician_id).await?;

    // Screening runs on the request path so the emergency message is
    // already stored when the client renders the confirmation screen.
    let detection = screening::screen(text);
    let emergency_message =
        detection.map(|d| screening::emergency_message(d.signal, clinician.as_ref()));

    let row = state
        .store
        .insert_entry(NewDiaryEntry {
            patient_id: patient.id,
            text: text.to_string(),
            is_emergency: detection.is_some(),
            emergency_kind: detection.map(|d| d.signal.as_str().to_string()),
            emergency_message,
        })
        .await?;

    state
        .enrichment
        .dispatch(EnrichmentJob {
            entry_id: row.id,
            created_at: row.created_at,
            text: row.text.clone(),
            patient,
            clinician,
            want_support: req.request_support,
            is_emergency: row.is_emergency,
        })
        .await;

    Ok((
        StatusCode::CREATED,
        Json(EntryCreatedResponse { entry_id: row.id }),
    ))
}

/// GET /api/v1/entries
pub async fn handle_list_entries(
    State(state): State<AppState>,
    Query(params): Query<PatientIdQuery>,
) -> Result<Json<Vec<EntrySummary>>, AppError> {
    let patient = state
        .store
        .patient(params.patient_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Patient {} not found", params.patient_id)))?;

    let rows = state.store.entries_for_patient(patient.id).await?;
    Ok(Json(rows.into_iter().map(EntrySummary::from).collect()))
}

/// GET /api/v1/entries/:id
pub async fn handle_get_entry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<PatientIdQuery>,
) -> Result<Json<EntryDetail>, AppError> {
    let row = state
        .store
        .entry_for_patient(id, params.patient_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Entry {id} not found")))?;

    Ok(Json(EntryDetail::from(row)))
}

/// DELETE /api/v1/entries/:id
pub async fn handle_delete_entry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<PatientIdQuery>,
) -> Result<StatusCode, AppError> {
    let deleted = state.store.delete_entry(id, params.patient_id).await?;
    if !deleted {
        return Err(AppError::NotFound(format!("Entry {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}
