//! Crisis screening — synchronous keyword detection run on every submission
//! before anything else, plus the emergency message templating.
//!
//! Screening gates supportive-text generation and never defers: it must run
//! on the request path so the emergency message can be stored at creation.

pub mod keywords;

use tracing::warn;

use crate::models::user::ClinicianRow;
use keywords::{
    SELF_HARM_KEYWORDS, SELF_HARM_MESSAGE, SUICIDE_KEYWORDS, SUICIDE_MESSAGE, VIOLENCE_KEYWORDS,
    VIOLENCE_MESSAGE,
};

/// Risk category, ordered by screening priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrisisSignal {
    Suicide,
    Violence,
    SelfHarm,
}

impl CrisisSignal {
    pub fn as_str(&self) -> &'static str {
        match self {
            CrisisSignal::Suicide => "suicide",
            CrisisSignal::Violence => "violence",
            CrisisSignal::SelfHarm => "self_harm",
        }
    }
}

/// A positive screening outcome: the category and the keyword that fired.
/// The keyword is diagnostic only and must never be surfaced to the subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrisisDetection {
    pub signal: CrisisSignal,
    pub keyword: &'static str,
}

/// Case-insensitive substring screening against the three keyword sets in
/// fixed priority order: suicide, then violence/stalking, then self-harm.
/// The first match in the highest-priority set wins; matches are never
/// aggregated across sets. Empty or whitespace text is never an emergency.
pub fn screen(text: &str) -> Option<CrisisDetection> {
    if text.trim().is_empty() {
        return None;
    }

    let lowered = text.to_lowercase();

    let sets: [(CrisisSignal, &[&str]); 3] = [
        (CrisisSignal::Suicide, SUICIDE_KEYWORDS),
        (CrisisSignal::Violence, VIOLENCE_KEYWORDS),
        (CrisisSignal::SelfHarm, SELF_HARM_KEYWORDS),
    ];

    for (signal, set) in sets {
        for keyword in set {
            if lowered.contains(keyword) {
                warn!(
                    "Crisis content detected - category: {} - keyword: {}",
                    signal.as_str(),
                    keyword
                );
                return Some(CrisisDetection { signal, keyword });
            }
        }
    }

    None
}

/// Builds the emergency message for a detected category, substituting the
/// clinician's display name and best reachable phone number into the
/// category template.
pub fn emergency_message(signal: CrisisSignal, clinician: Option<&ClinicianRow>) -> String {
    let name = clinician
        .map(|c| c.display_name())
        .unwrap_or_else(|| "your clinician".to_string());
    let phone = clinician
        .and_then(|c| c.contact_phone())
        .unwrap_or("(reach them by email)")
        .to_string();

    let template = match signal {
        CrisisSignal::Suicide => SUICIDE_MESSAGE,
        CrisisSignal::Violence => VIOLENCE_MESSAGE,
        CrisisSignal::SelfHarm => SELF_HARM_MESSAGE,
    };

    template
        .replace("{clinician_name}", &name)
        .replace("{clinician_phone}", &phone)
}
