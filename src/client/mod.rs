//! External collaborators: the mail search and task store services.

pub mod http;

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use crate::error::ClientError;
use crate::triage::model::{Candidate, Filter, NewTrackedItem, TaskList, TrackedItem, TrackedList};

pub use http::HttpDashboardClient;

/// Title of the task list that holds accepted candidates.
pub const ASSIGN_TASK_LIST_TITLE: &str = "Actionable Emails (Blueprint)";

/// Every task list with its items, as returned by the task store.
///
/// A list id missing from `tasks` means the list is empty.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskListsSnapshot {
    pub task_lists: Vec<TaskList>,
    pub tasks: HashMap<String, Vec<TrackedItem>>,
}

/// Source of candidate messages.
#[async_trait]
pub trait MessageSource: Send + Sync {
    /// Messages matching `filter`, in server order.
    async fn fetch_candidates(&self, filter: &Filter) -> Result<Vec<Candidate>, ClientError>;
}

/// Store of tracked work items.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// All task lists and their items.
    async fn list_task_lists(&self) -> Result<TaskListsSnapshot, ClientError>;

    /// Create a task list with the given title.
    async fn create_task_list(&self, title: &str) -> Result<TaskList, ClientError>;

    /// Append an item to a task list.
    async fn persist_tracked_item(
        &self,
        task_list_id: &str,
        item: &NewTrackedItem,
    ) -> Result<TrackedItem, ClientError>;

    /// The triage work-list and its items, creating the list if it is absent.
    async fn fetch_tracked_items(&self) -> Result<TrackedList, ClientError> {
        let mut snapshot = self.list_task_lists().await?;

        if let Some(list) = snapshot
            .task_lists
            .iter()
            .find(|l| l.title == ASSIGN_TASK_LIST_TITLE)
        {
            let items = snapshot.tasks.remove(&list.id).unwrap_or_default();
            return Ok(TrackedList {
                task_list_id: list.id.clone(),
                items,
            });
        }

        let created = self.create_task_list(ASSIGN_TASK_LIST_TITLE).await?;
        info!(task_list_id = %created.id, "Created assign task list");
        Ok(TrackedList {
            task_list_id: created.id,
            items: Vec::new(),
        })
    }
}
