// Patient diary API: entry submission with synchronous crisis screening and
// enrichment handoff, plus the patient-facing read and delete endpoints.

pub mod handlers;
