//! HTTP client for the dashboard server's JSON endpoints.
//!
//! Session credentials travel as the `idToken` / `accessToken` cookies the
//! server's authenticated endpoints expect. All endpoints share one status
//! contract: 200 is success, 403 means the session is no longer valid, and
//! anything else is a fetch failure carrying the status.

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::COOKIE;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::client::{MessageSource, TaskListsSnapshot, TaskStore};
use crate::error::ClientError;
use crate::triage::model::{Candidate, Filter, NewTrackedItem, TaskList, TrackedItem};

const ACTIONABLE_EMAILS_PATH: &str = "/gmail-actionable-emails";
const TASK_LISTS_PATH: &str = "/taskLists";
const TASKS_PATH: &str = "/tasks";

/// Session cookies issued by Google Sign-In.
#[derive(Clone)]
pub struct SessionTokens {
    pub id_token: SecretString,
    pub access_token: SecretString,
}

impl SessionTokens {
    pub fn new(id_token: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            id_token: SecretString::from(id_token.into()),
            access_token: SecretString::from(access_token.into()),
        }
    }

    fn cookie_header(&self) -> String {
        format!(
            "idToken={}; accessToken={}",
            self.id_token.expose_secret(),
            self.access_token.expose_secret()
        )
    }
}

impl std::fmt::Debug for SessionTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTokens").finish_non_exhaustive()
    }
}

/// reqwest-backed implementation of both collaborator traits.
#[derive(Clone)]
pub struct HttpDashboardClient {
    client: reqwest::Client,
    base_url: String,
    tokens: SessionTokens,
}

impl HttpDashboardClient {
    pub fn new(base_url: impl Into<String>, tokens: SessionTokens) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, tokens)
    }

    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        tokens: SessionTokens,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            tokens,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = request
            .header(COOKIE, self.tokens.cookie_header())
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        check_status(response.status())?;

        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }
}

/// Map a response status onto the shared contract.
pub fn check_status(status: StatusCode) -> Result<(), ClientError> {
    match status {
        StatusCode::OK => Ok(()),
        StatusCode::FORBIDDEN => Err(ClientError::Auth),
        other => Err(ClientError::Fetch {
            status: other.as_u16(),
            status_text: other.canonical_reason().unwrap_or_default().to_string(),
        }),
    }
}

/// Query pairs for the actionable emails endpoint.
pub fn candidate_query(filter: &Filter) -> [(&'static str, String); 3] {
    [
        ("subjectLinePhrases", filter.subject_phrases().join(",")),
        ("unreadOnly", filter.unread_only().to_string()),
        ("nDays", filter.day_window().to_string()),
    ]
}

#[async_trait]
impl MessageSource for HttpDashboardClient {
    async fn fetch_candidates(&self, filter: &Filter) -> Result<Vec<Candidate>, ClientError> {
        let request = self
            .client
            .get(self.url(ACTIONABLE_EMAILS_PATH))
            .query(&candidate_query(filter));

        let candidates: Vec<Candidate> = self.send(request).await?;
        debug!(count = candidates.len(), "Fetched actionable emails");
        Ok(candidates)
    }
}

#[async_trait]
impl TaskStore for HttpDashboardClient {
    async fn list_task_lists(&self) -> Result<TaskListsSnapshot, ClientError> {
        let request = self.client.get(self.url(TASK_LISTS_PATH));
        let snapshot: TaskListsSnapshot = self.send(request).await?;
        debug!(lists = snapshot.task_lists.len(), "Fetched task lists");
        Ok(snapshot)
    }

    async fn create_task_list(&self, title: &str) -> Result<TaskList, ClientError> {
        let request = self
            .client
            .post(self.url(TASK_LISTS_PATH))
            .query(&[("taskListTitle", title)]);
        self.send(request).await
    }

    async fn persist_tracked_item(
        &self,
        task_list_id: &str,
        item: &NewTrackedItem,
    ) -> Result<TrackedItem, ClientError> {
        let request = self
            .client
            .post(self.url(TASKS_PATH))
            .query(&[("taskListId", task_list_id)])
            .json(item);
        self.send(request).await
    }
}
