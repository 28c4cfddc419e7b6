// Crisis screening configuration data: keyword lists checked in priority
// order and the per-category emergency message templates. Keywords are
// lowercase because screening lowercases the text before matching.

/// Suicide-risk phrases. Highest priority; checked first.
pub const SUICIDE_KEYWORDS: &[&str] = &[
    "suicide",
    "suicidal",
    "kill myself",
    "killing myself",
    "end my life",
    "end it all",
    "take my own life",
    "don't want to live",
    "do not want to live",
    "better off dead",
    "want to die",
    "wish i were dead",
    "wish i was dead",
    "thoughts of death",
    "jump off",
    "hang myself",
    "slit my wrists",
    "overdose",
    "swallow all the pills",
    "can't go on living",
    "everyone would be better off without me",
    "be better if i wasn't here",
    "i'm worthless",
    "no reason to live",
    "life has no meaning",
    "soon i won't be a problem",
    "i've decided to end it",
    "i have a plan",
    "thought about how to do it",
    "this is my last",
];

/// Violence and stalking phrases. Second priority.
pub const VIOLENCE_KEYWORDS: &[&str] = &[
    "beats me",
    "beating me",
    "hits me",
    "hitting me",
    "mistreats me",
    "abuses me",
    "stalking",
    "stalker",
    "stalks me",
    "follows me everywhere",
    "keeps following me",
    "threatens me",
    "threatening me",
    "violence",
    "abuse",
    "abused",
    "rape",
    "raped",
    "harassment",
    "harassed",
    "molested",
    "assaulted",
    "attacked me",
    "hurts me",
    "afraid of him",
    "afraid of her",
    "scared of him",
    "scared of her",
    "controls me",
    "controlling me",
    "obsessive control",
    "won't let me go out",
    "won't let me leave",
    "isolates me",
    "terrorizes me",
    "toxic relationship",
    "domestic violence",
];

/// Self-harm phrases. Lowest priority so suicide/violence signals win when
/// categories co-occur.
pub const SELF_HARM_KEYWORDS: &[&str] = &[
    "cut myself",
    "cutting myself",
    "hurt myself",
    "hurting myself",
    "self-harm",
    "self harm",
    "burn myself",
    "scratch myself",
    "punish myself physically",
    "hit myself",
    "make myself bleed",
];

// Emergency message templates. `{clinician_name}` and `{clinician_phone}`
// are substituted at send time; the hotline numbers are fixed.

pub const SUICIDE_MESSAGE: &str = "\
I can see you are going through a moment of deep pain. What you are feeling \
is real and it matters, and you do not have to face it alone.

Right now it is important that you talk to someone who can help. Please \
contact your clinician {clinician_name} at {clinician_phone} right away, or \
reach out to:

- 988 Suicide & Crisis Lifeline: call or text 988 (available 24/7)
- Crisis Text Line: text HOME to 741741 (available 24/7)

You are not alone. There are people ready to listen and to help you through \
this difficult moment. Your life has value.";

pub const VIOLENCE_MESSAGE: &str = "\
I am worried about your safety. What you are going through is not right and \
you do not have to face it alone.

It is important that you get support and protection. Please contact your \
clinician {clinician_name} at {clinician_phone} right away, or reach out to:

- National Domestic Violence Hotline: 1-800-799-7233 (free, available 24/7)

The hotline offers professional, anonymous and free support. They can help \
you find a safe way out. You are not alone and you deserve to live without \
fear.";

pub const SELF_HARM_MESSAGE: &str = "\
I can see you are hurting and may feel the need to let the pain out. There \
are safer ways to cope with emotions this intense.

Please talk to someone who can help. Contact your clinician {clinician_name} \
at {clinician_phone}, or reach out to:

- 988 Suicide & Crisis Lifeline: call or text 988 (available 24/7)
- Crisis Text Line: text HOME to 741741 (available 24/7)

You do not have to face this alone. There are people ready to listen without \
judging you.";
