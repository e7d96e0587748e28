//! Error types for the Assign triage core.

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Client error: {0}")]
    Client(#[from] ClientError),

    #[error("Triage error: {0}")]
    Triage(#[from] TriageError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),
}

/// Errors reported by the external mail/task services.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// The server rejected the session credentials (HTTP 403).
    #[error("Not authenticated, sign in again")]
    Auth,

    /// Any other non-success response.
    #[error("Request failed: {status} {status_text}")]
    Fetch { status: u16, status_text: String },

    /// The request never produced a response.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The response body was not the expected JSON.
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl ClientError {
    /// Whether this error should send the user back through sign-in.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth)
    }
}

/// Triage queue errors.
#[derive(Debug, thiserror::Error)]
pub enum TriageError {
    #[error("No candidates left in the queue")]
    QueueEmpty,

    #[error("Persisting the accepted item was aborted: {0}")]
    PersistAborted(String),

    #[error(transparent)]
    Client(#[from] ClientError),
}

impl TriageError {
    /// Whether the underlying cause was an authorization failure.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Client(e) if e.is_auth())
    }
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;
