//! Prompt composition for every generation the enrichment pipeline runs.
//!
//! Templates use `{placeholder}` markers filled with `str::replace`. Every
//! prompt embeds an author identity block so the model never attributes a
//! quoted name in the entry to the narrator, and every composer returns the
//! sampling parameters its prompt was written for.

use crate::enrichment::history::NO_HISTORY;
use crate::enrichment::vocabulary::{CONTEXTS, EMOTIONS};
use crate::models::user::{NotePreferences, PatientRow};

// Soft output budgets, in characters. The backend is asked for roughly
// twice as many tokens, the prompt text enforces the rest.
pub const LONG_NOTE_MAX_CHARS: u32 = 500;
pub const SHORT_NOTE_MAX_CHARS: u32 = 300;
pub const SUPPORT_MAX_CHARS: u32 = 500;
pub const EMOTION_MAX_CHARS: u32 = 300;
pub const CONTEXT_MAX_CHARS: u32 = 400;

pub const CLINICAL_TEMPERATURE: f32 = 0.6;
pub const SUPPORT_TEMPERATURE: f32 = 0.3;
pub const CLASSIFIER_TEMPERATURE: f32 = 0.2;

/// A composed prompt paired with the sampling parameters to send it with.
#[derive(Debug, Clone)]
pub struct PromptSpec {
    pub prompt: String,
    pub max_chars: u32,
    pub temperature: f32,
}

// ─────────────────────────────────────────────────────────────────────────────
// Shared fragments
// ─────────────────────────────────────────────────────────────────────────────

const HISTORY_SECTION_TEMPLATE: &str = "CONTEXT - The patient's previous entries (for reference ONLY, do NOT describe each one):
{history}

";

// Weighting rules appended to rule 1 when prior entries exist. Short notes
// lean harder on the current entry than long ones.
const HISTORY_RULES_LIGHT: &str = "
2. Previous entries are supporting context ONLY (10%) - do NOT describe them one by one
3. Use generic phrasing such as \"compared with previous entries\" or \"unlike before\"
4. If you mention a specific entry, use ONLY its date and time (e.g. \"compared with 15/12/2025 at 14:30\")
5. STRICTLY FORBIDDEN: never write \"Entry 1\", \"Entry 2\", \"(Entry 3)\" or similar - the clinician does not know what they mean
6. Do NOT spend whole sentences summarising previous entries";

const HISTORY_RULES_HEAVY: &str = "
2. Previous entries are supporting context ONLY (20%) - do NOT describe them one by one
3. You may make references such as \"an evolution from the earlier pattern can be seen\" or \"unlike past situations\"
4. If you mention a specific entry, use ONLY its date and time (e.g. \"as noted on 15/12/2025 at 14:30\")
5. STRICTLY FORBIDDEN: never write \"Entry 1\", \"Entry 2\", \"(Entry 3)\" or similar - the clinician does not know what they mean
6. Do NOT dedicate whole paragraphs to summarising previous entries
7. You may use generic phrasing such as \"in previous entries\", \"in the past\", \"compared with similar situations\"";

const FIRST_ENTRY_RULE: &str = "
2. This is the patient's FIRST entry - do NOT reference previous entries that do not exist";

/// Disambiguates the narrator from people named in the entry. `focus_line`
/// tailors the last line to what the prompt asks the model to do.
fn author_identity(patient: &PatientRow, focus_line: &str) -> String {
    let mut block = format!(
        "IMPORTANT INFORMATION ABOUT THE AUTHOR:
The author of this text is {full_name}.
This text is written in the first person by {full_name}.
Any other name mentioned (even one identical to \"{first_name}\") refers to someone else (a friend, family member, colleague), NOT the author.
",
        full_name = patient.full_name(),
        first_name = patient.first_name,
    );
    if !focus_line.is_empty() {
        block.push_str(focus_line);
        block.push('\n');
    }
    block.push('\n');
    block
}

// ─────────────────────────────────────────────────────────────────────────────
// Clinical note
// ─────────────────────────────────────────────────────────────────────────────

/// Structured, short. Replace: {author_identity}, {history_section},
/// {parameter_example}, {parameter_labels}, {max_chars}, {history_rules}, {text}
const STRUCTURED_SHORT_TEMPLATE: &str = r#"You are an assistant to a psychotherapist. Analyze the following text and provide a structured, CONCISE clinical assessment.

{author_identity}{history_section}Example:
Text: "Today I failed my exam and I feel like giving up."
Response:
{parameter_example}

Parameters to use:
{parameter_labels}

CORE INSTRUCTIONS:
- The response must be BRIEF and TO THE POINT (at most {max_chars} characters)
- MANDATORY FORMAT: each parameter goes on a NEW LINE as "ParameterName: value"
- Break the line after every parameter

ANALYSIS RULES:
1. FOCUS 90% ON THE CURRENT ENTRY - analyze mainly the text below{history_rules}

DO:
- Analyze the emotional, cognitive and behavioural aspects of the CURRENT entry
- Note changes or patterns relative to the past, in generic terms
- Focus on what emerges TODAY in the text

DO NOT:
- Do NOT use markdown, bullet lists or symbols
- Do NOT open with phrases like "Here is the clinical note" or "Here is the assessment"

Always finish the sentence, never stop midway. Start DIRECTLY with the first parameter.

Now analyze this text (FOCUS ON THIS):
{text}"#;

/// Structured, long. Same placeholders as the short variant.
const STRUCTURED_LONG_TEMPLATE: &str = r#"You are an assistant to a psychotherapist. Analyze the following text and provide a structured, DETAILED clinical assessment.

{author_identity}{history_section}Example:
Text: "Today I failed my exam and I feel like giving up."
Response:
{parameter_example}

Parameters to use:
{parameter_labels}

CORE INSTRUCTIONS:
- The response must be DETAILED and THOROUGH (at most {max_chars} characters)
- MANDATORY FORMAT: each parameter goes on a NEW LINE as "ParameterName: value"
- Break the line after every parameter
- Provide a complete analysis for every parameter

ANALYSIS RULES:
1. FOCUS 80% ON THE CURRENT ENTRY - analyze mainly the text below, in depth{history_rules}

DO:
- Analyze the CURRENT entry in depth: emotions, thoughts, behaviours
- Identify cognitive schemas and behavioural patterns visible TODAY
- Note progress or regression relative to the overall past
- Provide detailed clinical observations on the CURRENT situation

DO NOT:
- Do NOT use markdown, bullet lists or symbols
- Do NOT open with phrases like "Here is the clinical note"

Always finish the sentence, never stop midway. Start DIRECTLY with the first parameter.

Now analyze this text in depth (THIS IS THE MAIN FOCUS):
{text}"#;

/// Narrative, short. Replace: {author_identity}, {history_section},
/// {max_chars}, {history_rules}, {text}
const NARRATIVE_SHORT_TEMPLATE: &str = r#"You are an assistant to a specialised psychotherapist. Analyze the following text and provide a BRIEF discursive clinical assessment.

{author_identity}{history_section}CORE INSTRUCTIONS:
- The response must be BRIEF and TO THE POINT (at most {max_chars} characters)
- Write discursively, like a professional clinical comment
- Do NOT use lists, bold, markdown, symbols or headings

ANALYSIS RULES:
1. FOCUS 90% ON THE CURRENT ENTRY - analyze mainly the text below{history_rules}

DO:
- Analyze the emotional and psychological content of the CURRENT entry
- Identify the feelings emerging TODAY
- Note general changes relative to the past
- Write fluidly and professionally

DO NOT:
- Do NOT open with phrases like "Here is the clinical note" or "The assessment is"

Start DIRECTLY with the analysis of the emotional and psychological content. Always finish the sentence.

Text to analyze (THIS IS THE FOCUS):
{text}"#;

/// Narrative, long. Same placeholders as the short variant.
const NARRATIVE_LONG_TEMPLATE: &str = r#"You are an assistant to a specialised psychotherapist. Analyze the following text and provide a DETAILED and THOROUGH discursive clinical assessment.

{author_identity}{history_section}CORE INSTRUCTIONS:
- The response must be DETAILED and COMPLETE (at most {max_chars} characters)
- Write discursively and professionally, like a narrative clinical note
- Go deeper into the emotional, cognitive and behavioural aspects
- Do NOT use lists, bold, markdown, symbols or headings

ANALYSIS RULES:
1. FOCUS 80% ON THE CURRENT ENTRY - analyze the current text in depth{history_rules}

DO:
- Analyze the emotional content of the CURRENT entry in depth
- Explore the cognitive mechanisms and behavioural patterns visible TODAY
- Identify the feelings, psychological defences and recurring schemas in the CURRENT situation
- Contextualise in generic terms against the patient's overall evolution
- Write fluidly, professionally and with clinical accuracy

DO NOT:
- Do NOT open with phrases like "Here is the clinical note" or "The assessment is"

Start DIRECTLY with the analysis of the CURRENT emotional and psychological content. Always finish the sentence.

Text to analyze in depth (THIS IS THE MAIN FOCUS):
{text}"#;

/// Composes the clinical-note prompt for the clinician's configured style:
/// structured or narrative, short or long. Prior-entry context is injected
/// when `history` is not the no-history sentinel, otherwise the rules tell
/// the model this is the patient's first entry.
pub fn clinical_prompt(
    patient: &PatientRow,
    prefs: &NotePreferences,
    text: &str,
    history: &str,
) -> PromptSpec {
    let max_chars = if prefs.verbose {
        LONG_NOTE_MAX_CHARS
    } else {
        SHORT_NOTE_MAX_CHARS
    };

    let template = match (prefs.structured, prefs.verbose) {
        (true, true) => STRUCTURED_LONG_TEMPLATE,
        (true, false) => STRUCTURED_SHORT_TEMPLATE,
        (false, true) => NARRATIVE_LONG_TEMPLATE,
        (false, false) => NARRATIVE_SHORT_TEMPLATE,
    };

    let has_history = !history.is_empty() && history != NO_HISTORY;
    let history_section = if has_history {
        HISTORY_SECTION_TEMPLATE.replace("{history}", history)
    } else {
        String::new()
    };
    let history_rules = if !has_history {
        FIRST_ENTRY_RULE
    } else if prefs.verbose {
        HISTORY_RULES_HEAVY
    } else {
        HISTORY_RULES_LIGHT
    };

    let mut prompt = template
        .replace("{author_identity}", &author_identity(patient, ""))
        .replace("{history_section}", &history_section)
        .replace("{history_rules}", history_rules)
        .replace("{max_chars}", &max_chars.to_string())
        .replace("{text}", text);

    if prefs.structured {
        let parameter_example: Vec<String> = prefs
            .parameter_labels
            .iter()
            .zip(prefs.parameter_examples.iter())
            .map(|(label, example)| format!("{label}: {example}"))
            .collect();
        prompt = prompt
            .replace("{parameter_example}", &parameter_example.join("\n"))
            .replace("{parameter_labels}", &prefs.parameter_labels.join(", "));
    }

    PromptSpec {
        prompt,
        max_chars,
        temperature: CLINICAL_TEMPERATURE,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Supportive reply
// ─────────────────────────────────────────────────────────────────────────────

/// Replace: {author_identity}, {text}
const SUPPORT_TEMPLATE: &str = r#"You are an empathetic emotional-support assistant. Your task is to respond with warmth and understanding to people going through difficult moments.

{author_identity}Example:
Patient text: "I failed my exam and I feel like giving up."
Support reply: "I'm really sorry about your exam. It's normal to feel disappointed, but this does not define your worth as a person. You could try reviewing your study method and ask for help if you need it. You can do this!"

INSTRUCTIONS:
- Respond in a warm, empathetic and encouraging tone
- Acknowledge and validate the emotions expressed
- Offer a positive perspective without minimising the feelings
- Gently suggest possible strategies or helpful reflections
- Do not use a clinical or detached tone
- Always complete the reply, never stop midway
- Do NOT confuse the author of the text with other people mentioned in the entry

Patient text:
{text}

Reply with a supportive message:"#;

pub fn support_prompt(patient: &PatientRow, text: &str) -> PromptSpec {
    let focus_line = format!(
        "When replying, address {} directly (or use \"you\" without naming them).",
        patient.first_name
    );
    let prompt = SUPPORT_TEMPLATE
        .replace("{author_identity}", &author_identity(patient, &focus_line))
        .replace("{text}", text);
    PromptSpec {
        prompt,
        max_chars: SUPPORT_MAX_CHARS,
        temperature: SUPPORT_TEMPERATURE,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Classifiers
// ─────────────────────────────────────────────────────────────────────────────

/// Replace: {author_identity}, {emotions}, {text}
const EMOTION_TEMPLATE: &str = r#"You are an expert in emotion analysis. Your task is to identify the predominant emotion in a text and explain why.

{author_identity}AVAILABLE EMOTIONS (choose ONLY from these):
{emotions}

RESPONSE FORMAT (MANDATORY):
Emotion: [a single word from the list]
Explanation: [brief 1-2 sentence explanation quoting specific elements of the text]

FUNDAMENTAL RULES:
1. The first line MUST start with "Emotion:" followed by ONE WORD from the list
2. The second line MUST start with "Explanation:" followed by the reasoning
3. In the explanation, you MUST quote specific words or phrases from the original text in quotation marks
4. Keep the explanation brief (2 sentences at most)
5. Do NOT invent emotions that are not in the list
6. Use "confusion" ONLY if the text explicitly expresses uncertainty, doubt or disorientation
7. The explanation MUST ALWAYS contain direct quotes from the text

ABOUT "CONFUSION":
- "confusion" means mental disorientation, not knowing what to do or think
- Do NOT use "confusion" as a default when you cannot decide
- If the text expresses several emotions, pick the PREDOMINANT one (the strongest and most evident)
- If the text is neutral or descriptive, still look for the underlying emotional tone

CORRECT EXAMPLES:
Text: "Today I passed my exam, I'm over the moon and so happy!"
Emotion: happiness
Explanation: The text expresses happiness through the words "over the moon" and "so happy", tied to succeeding at the exam.

Text: "I feel alone and nobody understands me, it's awful"
Emotion: loneliness
Explanation: The phrases "I feel alone" and "nobody understands me" indicate a feeling of emotional isolation.

Text: "I can't take it anymore, everything goes wrong and I'm fed up"
Emotion: frustration
Explanation: The phrases "I can't take it anymore" and "everything goes wrong" indicate a sense of powerlessness and irritation.

Text: "I don't know what to do, I can't decide whether to accept or refuse"
Emotion: confusion
Explanation: The phrases "I don't know what to do" and "I can't decide" indicate a state of uncertainty and decisional disorientation.

Text to analyze:
{text}

Respond now in the required format (remember: the explanation MUST quote specific words from the text):"#;

pub fn emotion_prompt(patient: &PatientRow, text: &str) -> PromptSpec {
    let focus_line = format!(
        "Analyze the emotions of {}, the author of the text.",
        patient.full_name()
    );
    let prompt = EMOTION_TEMPLATE
        .replace("{author_identity}", &author_identity(patient, &focus_line))
        .replace("{emotions}", &EMOTIONS.join(", "))
        .replace("{text}", text);
    PromptSpec {
        prompt,
        max_chars: EMOTION_MAX_CHARS,
        temperature: CLASSIFIER_TEMPERATURE,
    }
}

/// Replace: {author_identity}, {contexts}, {text}
const CONTEXT_TEMPLATE: &str = r#"You are an expert in social context analysis. Your task is to identify the main social context in which a patient's account takes place and explain why.

{author_identity}AVAILABLE CONTEXTS (choose ONLY from these):
{contexts}

RESPONSE FORMAT (MANDATORY):
Context: [one or two words from the list]
Explanation: [brief 1-2 sentence explanation quoting specific elements of the text]

FUNDAMENTAL RULES:
1. The first line MUST start with "Context:" followed by ONE or TWO WORDS from the list
2. The second line MUST start with "Explanation:" followed by the reasoning
3. In the explanation, quote specific words or phrases from the original text
4. Keep the explanation brief (2 sentences at most)
5. Do NOT invent contexts that are not in the list
6. If the text does not clearly indicate a context, use "other"

IMPORTANT SPECIFIC RULES:
- Physical activity (gym, training, running, swimming, football, fitness, yoga, exercises, weights, cardio, crossfit and similar) is ALWAYS classified as "gym" or "sport", NEVER as "leisure"
- "leisure" is only for non-sport recreation such as video games, TV, cinema, reading, going out for fun, shopping

HOW TO TELL RELATIONAL CONTEXTS APART (VERY IMPORTANT):
- "family": use ONLY if the text EXPLICITLY mentions family members (mother, father, brother, sister, son, daughter, grandparent, uncle, aunt, cousin)
- "relationship": use when the text is about a romantic partner (boyfriend, girlfriend, partner, romantic feelings, kisses, intimacy, fear of investing in a relationship, romantic jealousy)
- "friendship": use for friends, classmates and acquaintances with no romantic connotation
- If a person is described with romantic dynamics (e.g. "investing in someone", "jealousy", "love", affectionate romantic gestures) = "relationship"
- Do NOT assume someone is a family member just because they are a loved one

CORRECT EXAMPLES:
Text: "Today at work my boss criticised me in front of all my colleagues"
Context: work
Explanation: The account clearly takes place at work, with explicit references to "work", "boss" and "colleagues".

Text: "I argued with my mother because she does not understand my choices"
Context: family
Explanation: The text describes a family dynamic, with an explicit reference to "my mother" and an intergenerational conflict.

Text: "I spent the evening with Marco and we played PlayStation"
Context: friendship
Explanation: The text describes a moment of fun with a friend, with no romantic or family connotation.

Text: "Last night Laura and I kissed for the first time, my heart was racing"
Context: relationship
Explanation: The text clearly describes a romantic moment, with "kissed" and references to feelings of love.

Text: "I went to the gym and trained hard"
Context: gym
Explanation: The text explicitly mentions the "gym" and physical training.

Text: "Today I went for a nice run in the park and then did exercises at home"
Context: sport
Explanation: The text describes physical activity such as the "run" and "exercises", which fall under the sport context.

Text to analyze:
{text}

Respond now in the required format:"#;

pub fn context_prompt(patient: &PatientRow, text: &str) -> PromptSpec {
    let focus_line = format!(
        "Identify the social context {} is in, as the author of the text.",
        patient.full_name()
    );
    let prompt = CONTEXT_TEMPLATE
        .replace("{author_identity}", &author_identity(patient, &focus_line))
        .replace("{contexts}", &CONTEXTS.join(", "))
        .replace("{text}", text);
    PromptSpec {
        prompt,
        max_chars: CONTEXT_MAX_CHARS,
        temperature: CLASSIFIER_TEMPERATURE,
    }
}
