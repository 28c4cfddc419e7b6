//! Runs the full enrichment for one entry: clinical note, emotion and
//! context classification, and (when requested) a supportive reply.
//!
//! Generation failures never escape this module: each failed call is
//! logged and replaced with its user-safe fallback text, so the update
//! handed back to the worker is always complete. Only storage errors
//! propagate.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::enrichment::history;
use crate::enrichment::parser::parse_classification;
use crate::enrichment::prompts::{self, PromptSpec};
use crate::enrichment::vocabulary::{CONTEXT_TAXONOMY, EMOTION_TAXONOMY};
use crate::llm_client::TextGenerator;
use crate::models::entry::EnrichmentUpdate;
use crate::models::user::{ClinicianRow, PatientRow};
use crate::storage::{EntryStore, StoreError};

/// Everything a worker needs to enrich one entry, captured at submission
/// time so the job never re-reads patient or clinician state.
#[derive(Debug, Clone)]
pub struct EnrichmentJob {
    pub entry_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub text: String,
    pub patient: PatientRow,
    pub clinician: Option<ClinicianRow>,
    pub want_support: bool,
    pub is_emergency: bool,
}

/// Produces the terminal update for one entry. The supportive reply is
/// only generated when the patient asked for it and the entry did not
/// trip crisis screening; emergency entries already carry a templated
/// message with real contacts instead.
pub async fn run_enrichment(
    store: &dyn EntryStore,
    generator: &dyn TextGenerator,
    job: &EnrichmentJob,
) -> Result<EnrichmentUpdate, StoreError> {
    let history = history::assemble_history(
        store,
        job.patient.id,
        Some(job.created_at),
        Some(job.entry_id),
    )
    .await?;

    let prefs = job
        .clinician
        .as_ref()
        .map(ClinicianRow::note_preferences)
        .unwrap_or_default();

    let mut update = EnrichmentUpdate::default();

    let clinical = prompts::clinical_prompt(&job.patient, &prefs, &job.text, &history);
    update.clinical_note = Some(generate_or_fallback(generator, clinical, "clinical note").await);

    let emotion_raw = generate_or_fallback(
        generator,
        prompts::emotion_prompt(&job.patient, &job.text),
        "emotion classification",
    )
    .await;
    let emotion = parse_classification(&emotion_raw, &EMOTION_TAXONOMY);
    update.emotion = emotion.label;
    update.emotion_explanation = Some(emotion.explanation);

    let context_raw = generate_or_fallback(
        generator,
        prompts::context_prompt(&job.patient, &job.text),
        "context classification",
    )
    .await;
    let context = parse_classification(&context_raw, &CONTEXT_TAXONOMY);
    update.social_context = context.label;
    update.context_explanation = Some(context.explanation);

    if job.want_support && !job.is_emergency {
        let support = prompts::support_prompt(&job.patient, &job.text);
        update.support_text =
            Some(generate_or_fallback(generator, support, "supportive reply").await);
    }

    Ok(update)
}

async fn generate_or_fallback(
    generator: &dyn TextGenerator,
    spec: PromptSpec,
    stage: &str,
) -> String {
    debug!("Generating {stage}");
    match generator
        .generate(&spec.prompt, Some(spec.max_chars), spec.temperature)
        .await
    {
        Ok(text) => text,
        Err(err) => {
            warn!("Generation failed for {stage}, storing fallback text: {err}");
            err.fallback_text().to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::llm_client::GenerationError;
    use crate::models::entry::DiaryEntryRow;
    use crate::storage::memory::MemoryEntryStore;

    struct ScriptedGenerator {
        prompts: Mutex<Vec<String>>,
        fail: bool,
    }

    impl ScriptedGenerator {
        fn new() -> Self {
            ScriptedGenerator {
                prompts: Mutex::new(Vec::new()),
                fail: false,
            }
        }

        fn failing() -> Self {
            ScriptedGenerator {
                prompts: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        fn recorded(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(
            &self,
            prompt: &str,
            _max_chars: Option<u32>,
            _temperature: f32,
        ) -> Result<String, GenerationError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            if self.fail {
                return Err(GenerationError::Connection);
            }
            let response = if prompt.contains("expert in emotion analysis") {
                "Emotion: anxiety\nExplanation: The phrase \"I can't stop worrying\" signals anticipatory fear."
            } else if prompt.contains("expert in social context analysis") {
                "Context: work\nExplanation: The entry centres on a deadline set by \"my boss\"."
            } else if prompt.contains("emotional-support assistant") {
                "That sounds like a heavy day. Be kind to yourself tonight, you handled a lot."
            } else {
                "The entry shows a marked preoccupation with workplace evaluation."
            };
            Ok(response.to_string())
        }
    }

    fn make_patient() -> PatientRow {
        PatientRow {
            id: Uuid::new_v4(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            date_of_birth: None,
            clinician_id: Uuid::new_v4(),
        }
    }

    fn make_clinician(structured: bool, verbose: bool) -> ClinicianRow {
        ClinicianRow {
            id: Uuid::new_v4(),
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            email: "grace@example.com".to_string(),
            mobile_phone: Some("+1 555 0100".to_string()),
            office_phone: None,
            office_address: None,
            structured_notes: structured,
            verbose_notes: verbose,
            parameter_labels: vec!["Mood".to_string()],
            parameter_examples: vec!["discouraged".to_string()],
        }
    }

    fn make_job(patient: PatientRow, want_support: bool, is_emergency: bool) -> EnrichmentJob {
        EnrichmentJob {
            entry_id: Uuid::new_v4(),
            created_at: Utc::now(),
            text: "Deadline pressure all week and I cannot switch off.".to_string(),
            patient,
            clinician: Some(make_clinician(false, false)),
            want_support,
            is_emergency,
        }
    }

    fn make_prior_entry(patient_id: Uuid, emotion: &str) -> DiaryEntryRow {
        DiaryEntryRow {
            id: Uuid::new_v4(),
            patient_id,
            text: "Last week the same project kept me up at night.".to_string(),
            created_at: Utc::now() - chrono::Duration::hours(24),
            support_text: None,
            clinical_note: None,
            emotion: Some(emotion.to_string()),
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
    async fn test_enrichment_fills_every_field() {
        let store = MemoryEntryStore::new();
        let generator = ScriptedGenerator::new();
        let job = make_job(make_patient(), true, false);

        let update = run_enrichment(&store, &generator, &job).await.unwrap();

        assert!(update
            .clinical_note
            .as_deref()
            .unwrap()
            .contains("preoccupation"));
        assert_eq!(update.emotion.as_deref(), Some("anxiety"));
        assert!(update
            .emotion_explanation
            .as_deref()
            .unwrap()
            .contains("anticipatory fear"));
        assert_eq!(update.social_context.as_deref(), Some("work"));
        assert!(update.context_explanation.is_some());
        assert!(update.support_text.is_some());
        assert_eq!(generator.recorded().len(), 4);
    }

    #[tokio::test]
    async fn test_emergency_entry_never_requests_support() {
        let store = MemoryEntryStore::new();
        let generator = ScriptedGenerator::new();
        let job = make_job(make_patient(), true, true);

        let update = run_enrichment(&store, &generator, &job).await.unwrap();

        assert!(update.support_text.is_none());
        let prompts = generator.recorded();
        assert_eq!(prompts.len(), 3);
        assert!(
            !prompts.iter().any(|p| p.contains("emotional-support assistant")),
            "no support prompt may be sent for an emergency entry"
        );
    }

    #[tokio::test]
    async fn test_support_skipped_when_not_requested() {
        let store = MemoryEntryStore::new();
        let generator = ScriptedGenerator::new();
        let job = make_job(make_patient(), false, false);

        let update = run_enrichment(&store, &generator, &job).await.unwrap();

        assert!(update.support_text.is_none());
        assert_eq!(generator.recorded().len(), 3);
    }

    #[tokio::test]
    async fn test_generation_failure_degrades_to_fallback_texts() {
        let store = MemoryEntryStore::new();
        let generator = ScriptedGenerator::failing();
        let job = make_job(make_patient(), true, false);

        let update = run_enrichment(&store, &generator, &job).await.unwrap();

        let unreachable = GenerationError::Connection.fallback_text();
        assert_eq!(update.clinical_note.as_deref(), Some(unreachable));
        assert_eq!(update.support_text.as_deref(), Some(unreachable));
        assert_eq!(update.emotion, None, "fallback text must not classify");
        assert_eq!(
            update.emotion_explanation.as_deref(),
            Some(EMOTION_TAXONOMY.generic_filler)
        );
        assert_eq!(update.social_context, None);
        assert_eq!(
            update.context_explanation.as_deref(),
            Some(CONTEXT_TAXONOMY.generic_filler)
        );
    }

    #[tokio::test]
    async fn test_prior_entries_flow_into_clinical_prompt() {
        let store = MemoryEntryStore::new();
        let generator = ScriptedGenerator::new();
        let patient = make_patient();
        store.seed_entry(make_prior_entry(patient.id, "joy")).await;
        let job = make_job(patient, false, false);

        run_enrichment(&store, &generator, &job).await.unwrap();

        let prompts = generator.recorded();
        let clinical = &prompts[0];
        assert!(clinical.contains("] - Emotion: joy"));
        assert!(clinical.contains("kept me up at night"));
        assert!(clinical.contains("(10%)"), "short notes weight history at 10%");
    }

    #[tokio::test]
    async fn test_missing_clinician_defaults_to_short_narrative_note() {
        let store = MemoryEntryStore::new();
        let generator = ScriptedGenerator::new();
        let mut job = make_job(make_patient(), false, false);
        job.clinician = None;

        run_enrichment(&store, &generator, &job).await.unwrap();

        let prompts = generator.recorded();
        assert!(prompts[0].contains("BRIEF discursive"));
        assert!(!prompts[0].contains("Parameters to use"));
    }
}
