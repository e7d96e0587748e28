//! Actionable-email triage.

pub mod fetcher;
pub mod model;
pub mod notes;
pub mod queue;
pub mod settings;

#[cfg(test)]
pub(crate) mod testing;

pub use fetcher::CandidateFetcher;
pub use model::{Candidate, Filter, TrackedItem, TrackedList};
pub use queue::{PersistHandle, QueueState, TriageQueue};
pub use settings::{SettingsView, TriageSettings};
