//! Closed label vocabularies for the emotion and social-context
//! classifiers, plus the synonym tables and the display metadata attached
//! to resolved labels in API responses.
//!
//! Everything here is static configuration. Slice order matters: the
//! substring tier of label resolution scans each vocabulary front to back.

/// A closed vocabulary packaged with the marker and fallback strings the
/// classifier parser needs to interpret one response format.
pub struct Taxonomy {
    /// Line marker the model is instructed to answer with, e.g. "Emotion".
    pub marker: &'static str,
    /// Canonical labels, in resolution scan order.
    pub vocabulary: &'static [&'static str],
    /// Exact-match alternates mapped back to canonical labels.
    pub synonyms: &'static [(&'static str, &'static str)],
    /// Explanation used when the model gave none but a label was resolved.
    /// `{label}` is substituted.
    pub labeled_filler: &'static str,
    /// Explanation of last resort.
    pub generic_filler: &'static str,
}

// ─────────────────────────────────────────────────────────────────────────────
// Emotions
// ─────────────────────────────────────────────────────────────────────────────

pub const EMOTIONS: &[&str] = &[
    "joy",
    "happiness",
    "sadness",
    "anger",
    "fear",
    "anxiety",
    "surprise",
    "disgust",
    "shame",
    "guilt",
    "frustration",
    "hope",
    "gratitude",
    "love",
    "loneliness",
    "confusion",
    "exhaustion",
    "serenity",
    "nostalgia",
    "disappointment",
    "enthusiasm",
    "worry",
    "calm",
    "nervousness",
    "melancholy",
    "inadequacy",
    "despair",
    "pride",
    "embarrassment",
];

/// Alternate wordings models answer with despite the instructions.
/// Keys must not be resolvable by the exact or substring tiers, otherwise
/// the entry is dead weight.
pub const EMOTION_SYNONYMS: &[(&str, &str)] = &[
    ("happy", "happiness"),
    ("glad", "joy"),
    ("cheerful", "joy"),
    ("content", "joy"),
    ("sad", "sadness"),
    ("unhappy", "sadness"),
    ("angry", "anger"),
    ("furious", "anger"),
    ("scared", "fear"),
    ("frightened", "fear"),
    ("anxious", "anxiety"),
    ("agitated", "anxiety"),
    ("anguish", "anxiety"),
    ("anguished", "anxiety"),
    ("stressed", "anxiety"),
    ("nervous", "nervousness"),
    ("tense", "nervousness"),
    ("worried", "worry"),
    ("tired", "exhaustion"),
    ("fatigued", "exhaustion"),
    ("exhausted", "exhaustion"),
    ("drained", "exhaustion"),
    ("confused", "confusion"),
    ("nostalgic", "nostalgia"),
    ("disappointed", "disappointment"),
    ("lonely", "loneliness"),
    ("alone", "loneliness"),
    ("isolated", "loneliness"),
    ("frustrated", "frustration"),
    ("grateful", "gratitude"),
    ("thankful", "gratitude"),
    ("proud", "pride"),
    ("embarrassed", "embarrassment"),
    ("inadequate", "inadequacy"),
    ("desperate", "despair"),
];

pub const EMOTION_TAXONOMY: Taxonomy = Taxonomy {
    marker: "Emotion",
    vocabulary: EMOTIONS,
    synonyms: EMOTION_SYNONYMS,
    labeled_filler: "The text expresses an emotional state consistent with {label}.",
    generic_filler: "Emotion detected from the overall tone of the text.",
};

// ─────────────────────────────────────────────────────────────────────────────
// Social contexts
// ─────────────────────────────────────────────────────────────────────────────

pub const CONTEXTS: &[&str] = &[
    "work",
    "university",
    "school",
    "family",
    "friendship",
    "relationship",
    "health",
    "sport",
    "gym",
    "leisure",
    "travel",
    "home",
    "finances",
    "spirituality",
    "social",
    "solitude",
    "study",
    "food",
    "sleep",
    "other",
];

pub const CONTEXT_SYNONYMS: &[(&str, &str)] = &[
    ("office", "work"),
    ("company", "work"),
    ("profession", "work"),
    ("career", "work"),
    ("college", "university"),
    ("campus", "university"),
    ("elementary", "school"),
    ("parents", "family"),
    ("siblings", "family"),
    ("relatives", "family"),
    ("children", "family"),
    ("father", "family"),
    ("mom", "family"),
    ("dad", "family"),
    ("sister", "family"),
    ("friend", "friendship"),
    ("friends", "friendship"),
    ("classmates", "friendship"),
    ("partner", "relationship"),
    ("boyfriend", "relationship"),
    ("girlfriend", "relationship"),
    ("husband", "relationship"),
    ("wife", "relationship"),
    ("couple", "relationship"),
    ("romantic", "relationship"),
    ("sentimental", "relationship"),
    ("love", "relationship"),
    ("in love", "relationship"),
    ("doctor", "health"),
    ("hospital", "health"),
    ("illness", "health"),
    ("training", "gym"),
    ("fitness", "gym"),
    ("weights", "gym"),
    ("cardio", "gym"),
    ("crossfit", "gym"),
    ("yoga", "gym"),
    ("pilates", "gym"),
    ("exercise", "gym"),
    ("exercises", "gym"),
    ("running", "sport"),
    ("swimming", "sport"),
    ("soccer", "sport"),
    ("football", "sport"),
    ("tennis", "sport"),
    ("basketball", "sport"),
    ("volleyball", "sport"),
    ("cycling", "sport"),
    ("bicycle", "sport"),
    ("physical activity", "sport"),
    ("fun", "leisure"),
    ("recreation", "leisure"),
    ("pastime", "leisure"),
    ("vacation", "travel"),
    ("trip", "travel"),
    ("apartment", "home"),
    ("money", "finances"),
    ("economy", "finances"),
    ("meditation", "spirituality"),
    ("religion", "spirituality"),
    ("exam", "study"),
    ("exams", "study"),
    ("diet", "food"),
    ("eating", "food"),
    ("meal", "food"),
    ("nutrition", "food"),
    ("insomnia", "sleep"),
];

pub const CONTEXT_TAXONOMY: Taxonomy = Taxonomy {
    marker: "Context",
    vocabulary: CONTEXTS,
    synonyms: CONTEXT_SYNONYMS,
    labeled_filler: "The situations described in the text are consistent with {label}.",
    generic_filler: "Context detected from the overall content of the text.",
};

// ─────────────────────────────────────────────────────────────────────────────
// Display metadata
// ─────────────────────────────────────────────────────────────────────────────

const EMOTION_EMOJI: &[(&str, &str)] = &[
    ("joy", "😊"),
    ("happiness", "😄"),
    ("sadness", "😢"),
    ("anger", "😠"),
    ("fear", "😨"),
    ("anxiety", "😰"),
    ("surprise", "😲"),
    ("disgust", "🤢"),
    ("shame", "😳"),
    ("guilt", "😔"),
    ("frustration", "😤"),
    ("hope", "🌟"),
    ("gratitude", "🙏"),
    ("love", "❤️"),
    ("loneliness", "😞"),
    ("confusion", "😕"),
    ("exhaustion", "😩"),
    ("serenity", "😌"),
    ("nostalgia", "🥺"),
    ("disappointment", "😞"),
    ("enthusiasm", "🤩"),
    ("worry", "😟"),
    ("calm", "🙂"),
    ("nervousness", "😬"),
    ("melancholy", "🥀"),
    ("inadequacy", "😔"),
    ("despair", "😰"),
    ("pride", "😌"),
    ("embarrassment", "😳"),
];

/// Polarity grouping used by clients to colour emotion chips.
const EMOTION_POLARITY: &[(&str, &str)] = &[
    ("joy", "positive"),
    ("happiness", "positive"),
    ("hope", "positive"),
    ("gratitude", "positive"),
    ("love", "positive"),
    ("serenity", "positive"),
    ("enthusiasm", "positive"),
    ("calm", "positive"),
    ("pride", "positive"),
    ("sadness", "negative"),
    ("anger", "negative"),
    ("disgust", "negative"),
    ("frustration", "negative"),
    ("loneliness", "negative"),
    ("disappointment", "negative"),
    ("melancholy", "negative"),
    ("despair", "negative"),
    ("inadequacy", "negative"),
    ("shame", "negative"),
    ("guilt", "negative"),
    ("embarrassment", "negative"),
    ("exhaustion", "negative"),
    ("worry", "negative"),
    ("anxiety", "anxious"),
    ("nervousness", "anxious"),
    ("fear", "anxious"),
    ("surprise", "neutral"),
    ("confusion", "neutral"),
    ("nostalgia", "neutral"),
];

const CONTEXT_EMOJI: &[(&str, &str)] = &[
    ("work", "💼"),
    ("university", "🎓"),
    ("school", "📚"),
    ("family", "👨‍👩‍👧‍👦"),
    ("friendship", "👥"),
    ("relationship", "💑"),
    ("health", "🏥"),
    ("sport", "⚽"),
    ("gym", "💪"),
    ("leisure", "🎮"),
    ("travel", "✈️"),
    ("home", "🏠"),
    ("finances", "💰"),
    ("spirituality", "🧘"),
    ("social", "🌐"),
    ("solitude", "🚶"),
    ("study", "📖"),
    ("food", "🍽️"),
    ("sleep", "😴"),
    ("other", "📝"),
];

pub fn emotion_emoji(label: &str) -> Option<&'static str> {
    lookup(EMOTION_EMOJI, label)
}

pub fn emotion_polarity(label: &str) -> Option<&'static str> {
    lookup(EMOTION_POLARITY, label)
}

pub fn context_emoji(label: &str) -> Option<&'static str> {
    lookup(CONTEXT_EMOJI, label)
}

fn lookup(table: &'static [(&'static str, &'static str)], label: &str) -> Option<&'static str> {
    table.iter().find(|(key, _)| *key == label).map(|(_, value)| *value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_emotion_has_emoji_and_polarity() {
        for label in EMOTIONS {
            assert!(
                emotion_emoji(label).is_some(),
                "emotion '{}' has no emoji",
                label
            );
            assert!(
                emotion_polarity(label).is_some(),
                "emotion '{}' has no polarity",
                label
            );
        }
        assert_eq!(EMOTION_EMOJI.len(), EMOTIONS.len());
        assert_eq!(EMOTION_POLARITY.len(), EMOTIONS.len());
    }

    #[test]
    fn test_every_context_has_emoji() {
        for label in CONTEXTS {
            assert!(
                context_emoji(label).is_some(),
                "context '{}' has no emoji",
                label
            );
        }
        assert_eq!(CONTEXT_EMOJI.len(), CONTEXTS.len());
    }

    #[test]
    fn test_polarity_values_are_known() {
        let known = ["positive", "negative", "anxious", "neutral"];
        for (label, polarity) in EMOTION_POLARITY {
            assert!(
                known.contains(polarity),
                "emotion '{}' has unknown polarity '{}'",
                label,
                polarity
            );
        }
    }

    #[test]
    fn test_synonyms_map_to_canonical_labels() {
        for (key, target) in EMOTION_SYNONYMS {
            assert!(
                EMOTIONS.contains(target),
                "emotion synonym '{}' maps outside the vocabulary: '{}'",
                key,
                target
            );
        }
        for (key, target) in CONTEXT_SYNONYMS {
            assert!(
                CONTEXTS.contains(target),
                "context synonym '{}' maps outside the vocabulary: '{}'",
                key,
                target
            );
        }
    }

    // A synonym key the exact or substring tier already resolves is never
    // consulted, so its presence would only mislead maintainers.
    #[test]
    fn test_synonym_keys_are_not_resolvable_by_earlier_tiers() {
        for (taxonomy, name) in [(&EMOTION_TAXONOMY, "emotion"), (&CONTEXT_TAXONOMY, "context")] {
            for (key, _) in taxonomy.synonyms {
                assert!(
                    !taxonomy.vocabulary.contains(key),
                    "{} synonym '{}' is already a canonical label",
                    name,
                    key
                );
                assert!(
                    !taxonomy.vocabulary.iter().any(|word| key.contains(word)),
                    "{} synonym '{}' is already caught by the substring tier",
                    name,
                    key
                );
            }
        }
    }

    #[test]
    fn test_lookup_misses_return_none() {
        assert!(emotion_emoji("flabbergasted").is_none());
        assert!(emotion_polarity("").is_none());
        assert!(context_emoji("weather").is_none());
    }
}
