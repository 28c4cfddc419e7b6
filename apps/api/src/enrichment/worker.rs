//! Bounded background execution of enrichment jobs.
//!
//! Entry submission stays synchronous and fast; every model call happens
//! here. Jobs flow through a bounded channel into a small pool of workers
//! sharing one receiver, and every job ends in exactly one terminal write
//! that clears `generation_in_progress`, whatever happened on the way.

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tracing::{error, info};

use crate::enrichment::pipeline::{run_enrichment, EnrichmentJob};
use crate::llm_client::TextGenerator;
use crate::models::entry::EnrichmentUpdate;
use crate::storage::EntryStore;

/// Queue depth before `dispatch` starts applying backpressure to the
/// submission path.
const QUEUE_CAPACITY: usize = 64;

/// Handle the submission path uses to queue jobs. Cheap to clone.
#[derive(Clone)]
pub struct EnrichmentDispatcher {
    sender: mpsc::Sender<EnrichmentJob>,
    store: Arc<dyn EntryStore>,
}

impl EnrichmentDispatcher {
    /// Queues a job, waiting when the queue is full. If the worker pool is
    /// gone the entry is marked failed on the spot, so it can never stay
    /// stuck in progress.
    pub async fn dispatch(&self, job: EnrichmentJob) {
        let entry_id = job.entry_id;
        if self.sender.send(job).await.is_err() {
            error!("Enrichment queue is closed, marking entry {entry_id} as failed");
            if let Err(err) = self
                .store
                .complete_enrichment(entry_id, EnrichmentUpdate::failed())
                .await
            {
                error!("Could not mark entry {entry_id} as failed: {err}");
            }
        }
    }
}

/// Spawns `workers` tasks draining a shared queue and returns the
/// dispatcher feeding it.
pub fn spawn_enrichment_workers(
    store: Arc<dyn EntryStore>,
    generator: Arc<dyn TextGenerator>,
    workers: usize,
) -> EnrichmentDispatcher {
    let (sender, receiver) = mpsc::channel::<EnrichmentJob>(QUEUE_CAPACITY);
    let receiver = Arc::new(Mutex::new(receiver));

    for worker_id in 0..workers.max(1) {
        let receiver = Arc::clone(&receiver);
        let store = Arc::clone(&store);
        let generator = Arc::clone(&generator);
        tokio::spawn(async move {
            loop {
                // Lock only to dequeue; processing runs unlocked so the
                // other workers keep draining the queue.
                let job = { receiver.lock().await.recv().await };
                let Some(job) = job else {
                    info!("Enrichment worker {worker_id} shutting down");
                    break;
                };
                process_job(store.as_ref(), generator.as_ref(), job).await;
            }
        });
    }

    info!("Spawned {} enrichment workers", workers.max(1));
    EnrichmentDispatcher { sender, store }
}

async fn process_job(store: &dyn EntryStore, generator: &dyn TextGenerator, job: EnrichmentJob) {
    let entry_id = job.entry_id;
    info!("Enrichment started for entry {entry_id}");

    let update = match run_enrichment(store, generator, &job).await {
        Ok(update) => update,
        Err(err) => {
            error!("Enrichment failed for entry {entry_id}: {err}");
            EnrichmentUpdate::failed()
        }
    };

    // The terminal write happens on both arms above; skipping it would
    // leave the entry in progress forever.
    match store.complete_enrichment(entry_id, update).await {
        Ok(()) => info!("Enrichment completed for entry {entry_id}"),
        Err(err) => error!("Could not persist enrichment for entry {entry_id}: {err}"),
    }
}
