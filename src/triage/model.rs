//! Triage data model: candidates, tracked items, task lists and the filter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Largest day window the settings editor allows.
pub const MAX_DAY_WINDOW: u32 = 30;

/// Server-assigned urgency of a candidate. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessagePriority {
    High,
    Medium,
    Low,
}

/// A message the mail service considers possibly actionable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: String,
    pub subject: String,
    pub sender: String,
    /// Epoch milliseconds when the mail service received the message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_date: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<MessagePriority>,
}

impl Candidate {
    pub fn new(
        id: impl Into<String>,
        subject: impl Into<String>,
        sender: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            subject: subject.into(),
            sender: sender.into(),
            internal_date: None,
            priority: None,
        }
    }

    /// One-line rendering shown to the user while triaging.
    pub fn display_line(&self) -> String {
        format!("(From: {}) {}", self.sender, self.subject)
    }

    /// Receive time, if the server reported one.
    pub fn received_at(&self) -> Option<DateTime<Utc>> {
        self.internal_date.and_then(DateTime::from_timestamp_millis)
    }
}

/// A persisted work item in the external task store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedItem {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Body of a task creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTrackedItem {
    pub title: String,
    pub notes: String,
}

/// A task list in the external task store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskList {
    pub id: String,
    #[serde(default)]
    pub title: String,
}

/// The triage work-list and its current items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedList {
    pub task_list_id: String,
    pub items: Vec<TrackedItem>,
}

/// Which messages to triage. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    subject_phrases: Vec<String>,
    unread_only: bool,
    day_window: u32,
}

impl Filter {
    /// Build a validated filter.
    ///
    /// Phrases are trimmed and blanks dropped. At least one phrase must remain,
    /// none may contain a comma (the wire format joins them with commas), and
    /// the day window must be positive.
    pub fn new<I, S>(
        subject_phrases: I,
        unread_only: bool,
        day_window: u32,
    ) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let subject_phrases: Vec<String> = subject_phrases
            .into_iter()
            .map(|p| p.as_ref().trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();

        if subject_phrases.is_empty() {
            return Err(ConfigError::InvalidFilter(
                "at least one subject line phrase is required".into(),
            ));
        }
        if let Some(bad) = subject_phrases.iter().find(|p| p.contains(',')) {
            return Err(ConfigError::InvalidFilter(format!(
                "phrase must not contain a comma: {bad}"
            )));
        }
        if day_window == 0 {
            return Err(ConfigError::InvalidFilter("day window must be positive".into()));
        }

        Ok(Self {
            subject_phrases,
            unread_only,
            day_window,
        })
    }

    pub fn subject_phrases(&self) -> &[String] {
        &self.subject_phrases
    }

    pub fn unread_only(&self) -> bool {
        self.unread_only
    }

    pub fn day_window(&self) -> u32 {
        self.day_window
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_decodes_server_shape() {
        let json = r#"{"id":"m1","subject":"Action Required: sign","internalDate":1593561600000,"priority":"HIGH","sender":"Alice"}"#;
        let c: Candidate = serde_json::from_str(json).unwrap();
        assert_eq!(c.id, "m1");
        assert_eq!(c.priority, Some(MessagePriority::High));
        assert_eq!(c.received_at().unwrap().timestamp(), 1_593_561_600);
    }

    #[test]
    fn candidate_decodes_minimal_shape() {
        let c: Candidate =
            serde_json::from_str(r#"{"id":"42","subject":"Re: Q3","sender":"a@b.com"}"#).unwrap();
        assert_eq!(c, Candidate::new("42", "Re: Q3", "a@b.com"));
        assert!(c.received_at().is_none());
    }

    #[test]
    fn display_line_shows_sender_then_subject() {
        let c = Candidate::new("1", "Please review", "Bob");
        assert_eq!(c.display_line(), "(From: Bob) Please review");
    }

    #[test]
    fn tracked_item_tolerates_missing_notes() {
        let t: TrackedItem = serde_json::from_str(r#"{"id":"t1","title":"x"}"#).unwrap();
        assert!(t.notes.is_none());
    }

    #[test]
    fn filter_trims_and_drops_blank_phrases() {
        let f = Filter::new(["  Action Required ", "", "   "], true, 3).unwrap();
        assert_eq!(f.subject_phrases(), ["Action Required".to_string()]);
        assert!(f.unread_only());
        assert_eq!(f.day_window(), 3);
    }

    #[test]
    fn filter_rejects_bad_input() {
        assert!(Filter::new(Vec::<String>::new(), false, 7).is_err());
        assert!(Filter::new(["a,b"], false, 7).is_err());
        assert!(Filter::new(["ok"], false, 0).is_err());
    }
}
