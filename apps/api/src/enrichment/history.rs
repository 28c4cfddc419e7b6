//! Builds the prior-entry context block injected into clinical prompts.

use chrono::{DateTime, Local, Utc};
use uuid::Uuid;

use crate::storage::{EntryStore, StoreError};

/// Sentinel returned when the patient has no prior entries. Prompt
/// composition branches on it to emit first-entry rules instead of a
/// context section.
pub const NO_HISTORY: &str = "No previous entries available.";

/// How many prior entries a prompt may reference.
pub const HISTORY_LIMIT: i64 = 5;

const SNIPPET_MAX_CHARS: usize = 150;

/// Renders the most recent entries strictly older than the one being
/// enriched as one block per entry, oldest first:
///
/// ```text
/// [15/12/2025 at 14:30] - Emotion: anxiety
/// Text: <first 150 chars>...
/// ```
pub async fn assemble_history(
    store: &dyn EntryStore,
    patient_id: Uuid,
    before: Option<DateTime<Utc>>,
    exclude: Option<Uuid>,
) -> Result<String, StoreError> {
    let recent = store
        .recent_entries(patient_id, before, exclude, HISTORY_LIMIT)
        .await?;

    if recent.is_empty() {
        return Ok(NO_HISTORY.to_string());
    }

    let blocks: Vec<String> = recent
        .iter()
        .rev()
        .map(|entry| {
            let stamp = entry
                .created_at
                .with_timezone(&Local)
                .format("%d/%m/%Y at %H:%M");
            let emotion = entry
                .emotion
                .as_deref()
                .filter(|e| !e.is_empty())
                .unwrap_or("not specified");
            format!(
                "[{}] - Emotion: {}\nText: {}",
                stamp,
                emotion,
                snippet(&entry.text)
            )
        })
        .collect();

    Ok(blocks.join("\n\n"))
}

fn snippet(text: &str) -> String {
    if text.chars().count() <= SNIPPET_MAX_CHARS {
        text.to_string()
    } else {
        let head: String = text.chars().take(SNIPPET_MAX_CHARS).collect();
        format!("{head}...")
    }
}
