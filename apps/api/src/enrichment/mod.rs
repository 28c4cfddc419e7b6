//! Asynchronous enrichment of diary entries.
//!
//! Submission inserts the entry with `generation_in_progress = true` and
//! queues an [`EnrichmentJob`]; a worker then produces the clinical note,
//! the emotion and social-context classifications and, when requested, a
//! supportive reply, and applies them in a single terminal write.

pub mod history;
pub mod parser;
pub mod pipeline;
pub mod prompts;
pub mod vocabulary;
pub mod worker;

pub use pipeline::EnrichmentJob;
pub use worker::{spawn_enrichment_workers, EnrichmentDispatcher};
