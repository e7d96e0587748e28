//! Builds the de-duplicated triage queue.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info};

use super::model::{Candidate, Filter, TrackedItem, TrackedList};
use super::notes::extract_reference_id;
use super::queue::TriageQueue;
use crate::client::{MessageSource, TaskStore};
use crate::error::ClientError;

/// Candidate ids already referenced by tracked items.
pub fn tracked_reference_ids(items: &[TrackedItem]) -> HashSet<String> {
    items
        .iter()
        .filter_map(|item| extract_reference_id(item.notes.as_deref()))
        .map(str::to_string)
        .collect()
}

/// Keep candidates whose id is not in `tracked`, preserving source order.
pub fn dedup_candidates(candidates: Vec<Candidate>, tracked: &HashSet<String>) -> Vec<Candidate> {
    candidates
        .into_iter()
        .filter(|c| {
            let seen = tracked.contains(&c.id);
            if seen {
                debug!(candidate_id = %c.id, "Candidate already tracked");
            }
            !seen
        })
        .collect()
}

/// Produces triage queues from the mail source and task store.
#[derive(Clone)]
pub struct CandidateFetcher {
    source: Arc<dyn MessageSource>,
    store: Arc<dyn TaskStore>,
}

impl CandidateFetcher {
    pub fn new(source: Arc<dyn MessageSource>, store: Arc<dyn TaskStore>) -> Self {
        Self { source, store }
    }

    /// Fetch candidates for `filter` and drop the ones `tracked` already covers.
    ///
    /// Errors propagate unchanged; no queue is produced on failure.
    pub async fn build_queue(
        &self,
        filter: &Filter,
        tracked: &TrackedList,
    ) -> Result<TriageQueue, ClientError> {
        let candidates = self.source.fetch_candidates(filter).await?;
        Ok(self.assemble(candidates, tracked))
    }

    /// Fetch the tracked list and the candidates concurrently, then build.
    pub async fn load(&self, filter: &Filter) -> Result<TriageQueue, ClientError> {
        let (tracked, candidates) = tokio::try_join!(
            self.store.fetch_tracked_items(),
            self.source.fetch_candidates(filter),
        )?;
        Ok(self.assemble(candidates, &tracked))
    }

    fn assemble(&self, candidates: Vec<Candidate>, tracked: &TrackedList) -> TriageQueue {
        let fetched = candidates.len();
        let tracked_ids = tracked_reference_ids(&tracked.items);
        let items = dedup_candidates(candidates, &tracked_ids);

        info!(
            fetched,
            tracked = tracked_ids.len(),
            queued = items.len(),
            task_list_id = %tracked.task_list_id,
            "Built triage queue"
        );

        TriageQueue::new(
            items,
            tracked_ids,
            tracked.task_list_id.clone(),
            Arc::clone(&self.store),
        )
    }
}
