//! Settings editor for the triage panel.
//!
//! Holds the confirmed filter plus a draft being edited. Nothing in the draft
//! takes effect until `confirm()`; `revert()` throws it away.

use super::model::{Filter, MAX_DAY_WINDOW};
use crate::error::ConfigError;

/// Which face of the panel is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsView {
    Content,
    Settings,
}

/// Editable copy of a filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterDraft {
    pub subject_phrases: Vec<String>,
    pub unread_only: bool,
    pub day_window: u32,
}

impl From<&Filter> for FilterDraft {
    fn from(filter: &Filter) -> Self {
        Self {
            subject_phrases: filter.subject_phrases().to_vec(),
            unread_only: filter.unread_only(),
            day_window: filter.day_window(),
        }
    }
}

/// Settings state for the assign panel.
#[derive(Debug, Clone)]
pub struct TriageSettings {
    confirmed: Filter,
    draft: FilterDraft,
    view: SettingsView,
}

impl TriageSettings {
    pub fn new(filter: Filter) -> Self {
        let draft = FilterDraft::from(&filter);
        Self {
            confirmed: filter,
            draft,
            view: SettingsView::Content,
        }
    }

    /// The filter queues should currently be built with.
    pub fn filter(&self) -> &Filter {
        &self.confirmed
    }

    pub fn draft(&self) -> &FilterDraft {
        &self.draft
    }

    pub fn view(&self) -> SettingsView {
        self.view
    }

    pub fn open_settings(&mut self) {
        self.view = SettingsView::Settings;
    }

    /// Add a phrase to the draft. Returns `false` if it is blank or already present.
    pub fn add_phrase(&mut self, phrase: &str) -> Result<bool, ConfigError> {
        let phrase = phrase.trim();
        if phrase.is_empty() || self.draft.subject_phrases.iter().any(|p| p == phrase) {
            return Ok(false);
        }
        if phrase.contains(',') {
            return Err(ConfigError::InvalidFilter(format!(
                "phrase must not contain a comma: {phrase}"
            )));
        }
        self.draft.subject_phrases.push(phrase.to_string());
        Ok(true)
    }

    /// Remove a phrase from the draft. Returns whether it was present.
    pub fn remove_phrase(&mut self, phrase: &str) -> bool {
        let phrase = phrase.trim();
        let before = self.draft.subject_phrases.len();
        self.draft.subject_phrases.retain(|p| p != phrase);
        self.draft.subject_phrases.len() != before
    }

    pub fn toggle_unread_only(&mut self) -> bool {
        self.draft.unread_only = !self.draft.unread_only;
        self.draft.unread_only
    }

    /// Widen the day window, stopping at the maximum.
    pub fn increment_days(&mut self) -> u32 {
        if self.draft.day_window < MAX_DAY_WINDOW {
            self.draft.day_window += 1;
        }
        self.draft.day_window
    }

    /// Narrow the day window, stopping at one.
    pub fn decrement_days(&mut self) -> u32 {
        if self.draft.day_window > 1 {
            self.draft.day_window -= 1;
        }
        self.draft.day_window
    }

    /// Discard the draft and go back to the content view.
    pub fn revert(&mut self) {
        self.draft = FilterDraft::from(&self.confirmed);
        self.view = SettingsView::Content;
    }

    /// Validate the draft and make it the active filter.
    ///
    /// Returns whether the filter changed, i.e. whether the queue should be
    /// rebuilt. On error the draft and view are left as they were.
    pub fn confirm(&mut self) -> Result<bool, ConfigError> {
        let filter = Filter::new(
            &self.draft.subject_phrases,
            self.draft.unread_only,
            self.draft.day_window,
        )?;
        let changed = filter != self.confirmed;
        self.confirmed = filter;
        self.draft = FilterDraft::from(&self.confirmed);
        self.view = SettingsView::Content;
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> TriageSettings {
        TriageSettings::new(Filter::new(["Action Required"], false, 7).unwrap())
    }

    #[test]
    fn starts_on_content_view() {
        let s = settings();
        assert_eq!(s.view(), SettingsView::Content);
        assert_eq!(s.draft(), &FilterDraft::from(s.filter()));
    }

    #[test]
    fn add_phrase_dedups_and_rejects_commas() {
        let mut s = settings();
        assert!(s.add_phrase(" Please respond ").unwrap());
        assert!(!s.add_phrase("Please respond").unwrap());
        assert!(!s.add_phrase("   ").unwrap());
        assert!(s.add_phrase("a, b").is_err());
        assert_eq!(s.draft().subject_phrases, ["Action Required", "Please respond"]);
    }

    #[test]
    fn day_window_is_clamped() {
        let mut s = TriageSettings::new(Filter::new(["x"], false, 1).unwrap());
        assert_eq!(s.decrement_days(), 1);
        for _ in 0..40 {
            s.increment_days();
        }
        assert_eq!(s.draft().day_window, MAX_DAY_WINDOW);
    }

    #[test]
    fn revert_discards_draft() {
        let mut s = settings();
        s.open_settings();
        s.add_phrase("Urgent").unwrap();
        s.toggle_unread_only();
        s.increment_days();
        s.revert();

        assert_eq!(s.view(), SettingsView::Content);
        assert_eq!(s.draft(), &FilterDraft::from(s.filter()));
        assert_eq!(s.filter().subject_phrases(), ["Action Required".to_string()]);
    }

    #[test]
    fn confirm_applies_draft() {
        let mut s = settings();
        s.open_settings();
        s.toggle_unread_only();
        s.decrement_days();

        assert!(s.confirm().unwrap());
        assert_eq!(s.view(), SettingsView::Content);
        assert!(s.filter().unread_only());
        assert_eq!(s.filter().day_window(), 6);
    }

    #[test]
    fn confirm_without_changes_reports_unchanged() {
        let mut s = settings();
        s.open_settings();
        assert!(!s.confirm().unwrap());
    }

    #[test]
    fn confirm_rejects_empty_phrase_list() {
        let mut s = settings();
        s.open_settings();
        assert!(s.remove_phrase("Action Required"));
        assert!(s.confirm().is_err());
        assert_eq!(s.view(), SettingsView::Settings);
        assert_eq!(s.filter().subject_phrases().len(), 1);
    }
}
