//! Single-pass accept/skip queue over de-duplicated candidates.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::info;

use super::model::{Candidate, NewTrackedItem, TrackedItem};
use super::notes::format_tracked_notes;
use crate::client::TaskStore;
use crate::error::{ClientError, TriageError};

/// Externally visible queue state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueState {
    /// Nothing loaded, or every candidate has been decided.
    Empty,
    /// At least one candidate remains; the head is current.
    Presenting,
}

/// In-flight persistence of an accepted candidate.
///
/// Dropping the handle does not cancel the write.
pub struct PersistHandle {
    candidate: Candidate,
    task: JoinHandle<Result<TrackedItem, ClientError>>,
}

impl PersistHandle {
    /// The candidate that was accepted.
    pub fn candidate(&self) -> &Candidate {
        &self.candidate
    }

    /// Whether the store has answered.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the store's answer.
    pub async fn outcome(self) -> Result<TrackedItem, TriageError> {
        match self.task.await {
            Ok(result) => result.map_err(TriageError::from),
            Err(e) => Err(TriageError::PersistAborted(e.to_string())),
        }
    }
}

/// FIFO of candidates awaiting an accept/skip decision.
pub struct TriageQueue {
    items: VecDeque<Candidate>,
    tracked_ids: HashSet<String>,
    task_list_id: String,
    store: Arc<dyn TaskStore>,
}

impl TriageQueue {
    /// Build a queue from already de-duplicated candidates.
    pub fn new(
        items: Vec<Candidate>,
        tracked_ids: HashSet<String>,
        task_list_id: impl Into<String>,
        store: Arc<dyn TaskStore>,
    ) -> Self {
        Self {
            items: items.into(),
            tracked_ids,
            task_list_id: task_list_id.into(),
            store,
        }
    }

    pub fn state(&self) -> QueueState {
        if self.items.is_empty() {
            QueueState::Empty
        } else {
            QueueState::Presenting
        }
    }

    /// The candidate being presented, if any.
    pub fn current_item(&self) -> Option<&Candidate> {
        self.items.front()
    }

    pub fn remaining_count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Id of the task list accepted candidates are written to.
    pub fn task_list_id(&self) -> &str {
        &self.task_list_id
    }

    /// Whether `candidate_id` was tracked at build time or accepted since.
    pub fn is_tracked(&self, candidate_id: &str) -> bool {
        self.tracked_ids.contains(candidate_id)
    }

    /// Dequeue the current candidate and persist it as a tracked item.
    ///
    /// The candidate is removed before the write starts and is not re-offered
    /// if the write fails; the failure surfaces through the returned handle.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime, since the write is spawned.
    pub fn accept_current(&mut self) -> Result<PersistHandle, TriageError> {
        let candidate = self.items.pop_front().ok_or(TriageError::QueueEmpty)?;

        let item = NewTrackedItem {
            title: candidate.subject.clone(),
            notes: format_tracked_notes(&candidate.id),
        };
        self.tracked_ids.insert(candidate.id.clone());

        info!(
            candidate_id = %candidate.id,
            remaining = self.items.len(),
            "Accepted candidate"
        );

        let store = Arc::clone(&self.store);
        let task_list_id = self.task_list_id.clone();
        let task =
            tokio::spawn(async move { store.persist_tracked_item(&task_list_id, &item).await });

        Ok(PersistHandle { candidate, task })
    }

    /// Dequeue the current candidate without persisting anything.
    pub fn skip_current(&mut self) -> Result<Candidate, TriageError> {
        let candidate = self.items.pop_front().ok_or(TriageError::QueueEmpty)?;
        info!(
            candidate_id = %candidate.id,
            remaining = self.items.len(),
            "Skipped candidate"
        );
        Ok(candidate)
    }
}

impl std::fmt::Debug for TriageQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TriageQueue")
            .field("items", &self.items)
            .field("tracked_ids", &self.tracked_ids)
            .field("task_list_id", &self.task_list_id)
            .finish_non_exhaustive()
    }
}
