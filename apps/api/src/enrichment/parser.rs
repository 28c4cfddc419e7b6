//! Interprets classifier completions.
//!
//! The models are instructed to answer in a fixed two-line format
//! ("Emotion: ..." / "Explanation: ..."), but completions drift: labels
//! arrive with punctuation or as synonyms, explanations wrap across lines
//! or go missing entirely. Everything here is a total function over
//! arbitrary text, so a degenerate completion can never fail the pipeline.

use tracing::warn;

use crate::enrichment::vocabulary::Taxonomy;

const EXPLANATION_MARKER: &str = "Explanation";
const MIN_EXPLANATION_CHARS: usize = 10;

// An explanation this short is usually a truncation artefact; a completion
// that still contains one of these connectives is worth salvaging whole.
const REASONING_CONNECTIVES: &[&str] = &["because", "indicates", "expresses", "suggests", "reflects"];

/// How the label was matched against the taxonomy, strongest tier first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelResolution {
    /// Candidate is a canonical label.
    Exact,
    /// A canonical label was embedded in the candidate.
    Substring,
    /// Candidate matched the synonym table.
    Synonym,
    /// Candidate kept as-is; it matched nothing known.
    Unverified,
    /// The completion had no label line at all.
    Missing,
}

#[derive(Debug, Clone)]
pub struct Classification {
    pub label: Option<String>,
    pub resolution: LabelResolution,
    pub explanation: String,
}

/// Extracts the label and explanation from a classifier completion.
///
/// Marker lines are matched case-insensitively; explanation text may
/// continue over following lines until another marker appears. The label
/// is lowercased, stripped of trailing punctuation and resolved against
/// the taxonomy. A usable explanation always comes back, falling back to
/// the taxonomy's filler strings when the completion offers none.
pub fn parse_classification(raw: &str, taxonomy: &Taxonomy) -> Classification {
    let mut candidate: Option<String> = None;
    let mut explanation_parts: Vec<&str> = Vec::new();
    let mut in_explanation = false;

    for line in raw.lines() {
        let line = line.trim();
        if let Some(value) = marker_value(line, taxonomy.marker) {
            let normalized = value.trim().to_lowercase();
            let normalized = normalized
                .trim_end_matches(['.', '!', '?', ',', ';', ':'])
                .trim()
                .to_string();
            candidate = Some(normalized);
            in_explanation = false;
        } else if let Some(value) = marker_value(line, EXPLANATION_MARKER) {
            let value = value.trim();
            if !value.is_empty() {
                explanation_parts.push(value);
            }
            in_explanation = true;
        } else if in_explanation && !line.is_empty() {
            explanation_parts.push(line);
        }
    }

    let candidate = candidate.filter(|c| !c.is_empty());
    let (label, resolution) = resolve_label(candidate.as_deref(), taxonomy);
    let explanation = ensure_explanation(explanation_parts.join(" "), raw, label.as_deref(), taxonomy);

    Classification {
        label,
        resolution,
        explanation,
    }
}

/// Pure tiered lookup of a normalized label candidate.
fn resolve_label(candidate: Option<&str>, taxonomy: &Taxonomy) -> (Option<String>, LabelResolution) {
    let Some(candidate) = candidate else {
        return (None, LabelResolution::Missing);
    };

    if taxonomy.vocabulary.contains(&candidate) {
        return (Some(candidate.to_string()), LabelResolution::Exact);
    }

    if let Some(word) = taxonomy.vocabulary.iter().find(|word| candidate.contains(**word)) {
        return (Some((*word).to_string()), LabelResolution::Substring);
    }

    if let Some((_, canonical)) = taxonomy.synonyms.iter().find(|(key, _)| *key == candidate) {
        return (Some((*canonical).to_string()), LabelResolution::Synonym);
    }

    warn!(
        "Classifier returned a label outside the {} vocabulary: '{}'",
        taxonomy.marker.to_lowercase(),
        candidate
    );
    (Some(candidate.to_string()), LabelResolution::Unverified)
}

/// Case-insensitive `"Marker:"` prefix match, returning the rest of the line.
fn marker_value<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    if line.len() <= marker.len() || !line.is_char_boundary(marker.len()) {
        return None;
    }
    let (head, tail) = line.split_at(marker.len());
    if head.eq_ignore_ascii_case(marker) && tail.starts_with(':') {
        Some(&tail[1..])
    } else {
        None
    }
}

/// Guarantees a presentable explanation. Recovery order: keep what was
/// parsed if it is long enough, then salvage the flattened completion when
/// it reads like reasoning, then fill from the taxonomy.
fn ensure_explanation(
    parsed: String,
    raw: &str,
    label: Option<&str>,
    taxonomy: &Taxonomy,
) -> String {
    if parsed.chars().count() >= MIN_EXPLANATION_CHARS {
        return parsed;
    }

    let lowered = raw.to_lowercase();
    if REASONING_CONNECTIVES.iter().any(|c| lowered.contains(c)) {
        let flat = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        let lower_flat = flat.to_ascii_lowercase();
        let marker = "explanation:";
        let recovered = match lower_flat.find(marker) {
            Some(at) => flat[at + marker.len()..].trim().to_string(),
            None => flat,
        };
        if !recovered.is_empty() {
            return recovered;
        }
    }

    match label {
        Some(label) => taxonomy.labeled_filler.replace("{label}", label),
        None => taxonomy.generic_filler.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrichment::vocabulary::{CONTEXT_TAXONOMY, EMOTION_TAXONOMY};

    #[test]
    fn test_well_formed_completion_parses_exactly() {
        let raw = "Emotion: anxiety\nExplanation: The phrases \"what if\" and \"I can't stop worrying\" signal anticipatory fear.";
        let parsed = parse_classification(raw, &EMOTION_TAXONOMY);

        assert_eq!(parsed.label.as_deref(), Some("anxiety"));
        assert_eq!(parsed.resolution, LabelResolution::Exact);
        assert!(parsed.explanation.starts_with("The phrases"));
    }

    #[test]
    fn test_markers_match_case_insensitively() {
        let raw = "EMOTION: Sadness\nEXPLANATION: A quiet, heavy tone runs through the entry.";
        let parsed = parse_classification(raw, &EMOTION_TAXONOMY);

        assert_eq!(parsed.label.as_deref(), Some("sadness"));
        assert_eq!(parsed.resolution, LabelResolution::Exact);
    }

    #[test]
    fn test_trailing_punctuation_is_stripped_from_label() {
        let raw = "Emotion: anxiety.\nExplanation: Worrying thoughts dominate throughout the text.";
        let parsed = parse_classification(raw, &EMOTION_TAXONOMY);

        assert_eq!(parsed.label.as_deref(), Some("anxiety"));
        assert_eq!(parsed.resolution, LabelResolution::Exact);
    }

    #[test]
    fn test_wrapped_label_resolves_via_substring() {
        let raw = "Emotion: [anxiety]\nExplanation: The bracketed answer still names a known emotion.";
        let parsed = parse_classification(raw, &EMOTION_TAXONOMY);

        assert_eq!(parsed.label.as_deref(), Some("anxiety"));
        assert_eq!(parsed.resolution, LabelResolution::Substring);
    }

    #[test]
    fn test_synonym_resolves_to_canonical_label() {
        let raw = "Emotion: happy\nExplanation: The exam result brought \"pure joy\" to the writer.";
        let parsed = parse_classification(raw, &EMOTION_TAXONOMY);

        assert_eq!(parsed.label.as_deref(), Some("happiness"));
        assert_eq!(parsed.resolution, LabelResolution::Synonym);
    }

    #[test]
    fn test_unknown_label_passes_through_unverified() {
        let raw = "Emotion: flabbergasted\nExplanation: The writer seems taken aback by the sudden news.";
        let parsed = parse_classification(raw, &EMOTION_TAXONOMY);

        assert_eq!(parsed.label.as_deref(), Some("flabbergasted"));
        assert_eq!(parsed.resolution, LabelResolution::Unverified);
    }

    #[test]
    fn test_missing_label_line_yields_missing() {
        let raw = "I am unable to classify this text.";
        let parsed = parse_classification(raw, &EMOTION_TAXONOMY);

        assert_eq!(parsed.label, None);
        assert_eq!(parsed.resolution, LabelResolution::Missing);
        assert_eq!(parsed.explanation, EMOTION_TAXONOMY.generic_filler);
    }

    #[test]
    fn test_explanation_continues_across_lines() {
        let raw = "Emotion: guilt\nExplanation: The writer blames themselves\nfor missing the appointment\n\nand cannot let it go.";
        let parsed = parse_classification(raw, &EMOTION_TAXONOMY);

        assert_eq!(
            parsed.explanation,
            "The writer blames themselves for missing the appointment and cannot let it go."
        );
    }

    #[test]
    fn test_explanation_marker_alone_then_continuation() {
        let raw = "Emotion: hope\nExplanation:\nThere is a forward-looking tone in the closing sentences.";
        let parsed = parse_classification(raw, &EMOTION_TAXONOMY);

        assert_eq!(
            parsed.explanation,
            "There is a forward-looking tone in the closing sentences."
        );
    }

    #[test]
    fn test_unmarked_reasoning_is_salvaged_whole() {
        // No explanation marker, but the completion reads like reasoning:
        // the flattened text is kept rather than replaced by a filler.
        let raw = "Emotion: sadness\nThe text indicates a persistent low mood after the move.";
        let parsed = parse_classification(raw, &EMOTION_TAXONOMY);

        assert_eq!(parsed.label.as_deref(), Some("sadness"));
        assert_eq!(
            parsed.explanation,
            "Emotion: sadness The text indicates a persistent low mood after the move."
        );
    }

    #[test]
    fn test_short_explanation_without_reasoning_falls_back_to_labeled_filler() {
        let raw = "Emotion: anger\nExplanation: Angry.";
        let parsed = parse_classification(raw, &EMOTION_TAXONOMY);

        assert_eq!(
            parsed.explanation,
            "The text expresses an emotional state consistent with anger."
        );
    }

    #[test]
    fn test_no_label_and_no_explanation_falls_back_to_generic_filler() {
        let parsed = parse_classification("", &EMOTION_TAXONOMY);

        assert_eq!(parsed.label, None);
        assert_eq!(parsed.resolution, LabelResolution::Missing);
        assert_eq!(parsed.explanation, EMOTION_TAXONOMY.generic_filler);
    }

    #[test]
    fn test_context_taxonomy_uses_its_own_marker() {
        let raw = "Context: work\nExplanation: The entry revolves around a deadline and a tense meeting.";
        let parsed = parse_classification(raw, &CONTEXT_TAXONOMY);

        assert_eq!(parsed.label.as_deref(), Some("work"));
        assert_eq!(parsed.resolution, LabelResolution::Exact);

        // An emotion-format completion means nothing to the context taxonomy.
        let mismatched = parse_classification("Emotion: joy", &CONTEXT_TAXONOMY);
        assert_eq!(mismatched.resolution, LabelResolution::Missing);
    }

    #[test]
    fn test_two_word_label_resolves_via_synonym() {
        let raw = "Context: physical activity\nExplanation: The run and the push-ups mentioned are sports.";
        let parsed = parse_classification(raw, &CONTEXT_TAXONOMY);

        assert_eq!(parsed.label.as_deref(), Some("sport"));
        assert_eq!(parsed.resolution, LabelResolution::Synonym);
    }

    #[test]
    fn test_empty_label_value_counts_as_missing() {
        let raw = "Emotion:\nExplanation: No label was given on the first line at all.";
        let parsed = parse_classification(raw, &EMOTION_TAXONOMY);

        assert_eq!(parsed.label, None);
        assert_eq!(parsed.resolution, LabelResolution::Missing);
        assert!(parsed.explanation.starts_with("No label"));
    }

    #[test]
    fn test_later_label_line_wins() {
        let raw = "Emotion: maybe joy\nEmotion: serenity\nExplanation: A calm and settled tone throughout.";
        let parsed = parse_classification(raw, &EMOTION_TAXONOMY);

        assert_eq!(parsed.label.as_deref(), Some("serenity"));
        assert_eq!(parsed.resolution, LabelResolution::Exact);
    }

    #[test]
    fn test_fallback_text_from_failed_generation_degrades_cleanly() {
        // When generation fails upstream, the stored fallback string flows
        // through here; it must classify as missing with a generic filler.
        let raw = "The text generation service is temporarily unavailable. Please try again later.";
        let parsed = parse_classification(raw, &EMOTION_TAXONOMY);

        assert_eq!(parsed.label, None);
        assert_eq!(parsed.resolution, LabelResolution::Missing);
        assert_eq!(parsed.explanation, EMOTION_TAXONOMY.generic_filler);
    }
}
