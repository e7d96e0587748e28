//! In-memory collaborators for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::client::{MessageSource, TaskListsSnapshot, TaskStore};
use crate::error::ClientError;
use crate::triage::model::{Candidate, Filter, NewTrackedItem, TaskList, TrackedItem};

/// Task store backed by a map of list id to items.
#[derive(Default)]
pub struct FakeStore {
    lists: Mutex<Vec<TaskList>>,
    tasks: Mutex<HashMap<String, Vec<TrackedItem>>>,
    persisted: Mutex<Vec<(String, NewTrackedItem)>>,
    list_error: Option<ClientError>,
    persist_error: Option<ClientError>,
    persist_delay: Option<Duration>,
    list_calls: AtomicUsize,
    create_calls: AtomicUsize,
    persist_calls: AtomicUsize,
}

impl FakeStore {
    pub fn with_list(id: &str, title: &str, items: Vec<TrackedItem>) -> Self {
        let store = Self::default();
        store.lists.lock().unwrap().push(TaskList {
            id: id.into(),
            title: title.into(),
        });
        store.tasks.lock().unwrap().insert(id.into(), items);
        store
    }

    pub fn failing_list(err: ClientError) -> Self {
        Self {
            list_error: Some(err),
            ..Self::default()
        }
    }

    pub fn failing_persist(err: ClientError) -> Self {
        Self {
            persist_error: Some(err),
            ..Self::default()
        }
    }

    /// Make every write wait `delay` before answering.
    pub fn slow_persist(mut self, delay: Duration) -> Self {
        self.persist_delay = Some(delay);
        self
    }

    pub fn persisted(&self) -> Vec<(String, NewTrackedItem)> {
        self.persisted.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn persist_calls(&self) -> usize {
        self.persist_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TaskStore for FakeStore {
    async fn list_task_lists(&self) -> Result<TaskListsSnapshot, ClientError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = &self.list_error {
            return Err(err.clone());
        }
        Ok(TaskListsSnapshot {
            task_lists: self.lists.lock().unwrap().clone(),
            tasks: self.tasks.lock().unwrap().clone(),
        })
    }

    async fn create_task_list(&self, title: &str) -> Result<TaskList, ClientError> {
        let n = self.create_calls.fetch_add(1, Ordering::SeqCst);
        let list = TaskList {
            id: format!("created-{n}"),
            title: title.into(),
        };
        self.lists.lock().unwrap().push(list.clone());
        Ok(list)
    }

    async fn persist_tracked_item(
        &self,
        task_list_id: &str,
        item: &NewTrackedItem,
    ) -> Result<TrackedItem, ClientError> {
        let n = self.persist_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.persist_delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(err) = &self.persist_error {
            return Err(err.clone());
        }
        self.persisted
            .lock()
            .unwrap()
            .push((task_list_id.to_string(), item.clone()));
        Ok(TrackedItem {
            id: format!("task-{n}"),
            title: item.title.clone(),
            notes: Some(item.notes.clone()),
        })
    }
}

/// Message source returning a fixed answer.
pub struct FakeSource {
    result: Mutex<Result<Vec<Candidate>, ClientError>>,
    calls: AtomicUsize,
    last_filter: Mutex<Option<Filter>>,
}

impl FakeSource {
    pub fn returning(candidates: Vec<Candidate>) -> Self {
        Self {
            result: Mutex::new(Ok(candidates)),
            calls: AtomicUsize::new(0),
            last_filter: Mutex::new(None),
        }
    }

    pub fn failing(err: ClientError) -> Self {
        Self {
            result: Mutex::new(Err(err)),
            calls: AtomicUsize::new(0),
            last_filter: Mutex::new(None),
        }
    }

    /// Make later fetches fail with `err`.
    pub fn start_failing(&self, err: ClientError) {
        *self.result.lock().unwrap() = Err(err);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_filter(&self) -> Option<Filter> {
        self.last_filter.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageSource for FakeSource {
    async fn fetch_candidates(&self, filter: &Filter) -> Result<Vec<Candidate>, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_filter.lock().unwrap() = Some(filter.clone());
        self.result.lock().unwrap().clone()
    }
}

/// Candidates with the given ids and placeholder subject/sender.
pub fn candidates(ids: &[&str]) -> Vec<Candidate> {
    ids.iter()
        .map(|id| Candidate::new(*id, format!("subject {id}"), "sender"))
        .collect()
}

/// A tracked item whose notes reference `candidate_id`.
pub fn tracked_for(candidate_id: &str) -> TrackedItem {
    TrackedItem {
        id: format!("t-{candidate_id}"),
        title: format!("subject {candidate_id}"),
        notes: Some(crate::triage::notes::format_tracked_notes(candidate_id)),
    }
}
