use thiserror::Error;

use crate::domain::image::ImageReferenceError;
use crate::domain::monitor::MonitorError;
use crate::domain::RESERVED_DEBUG_APP_ID;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Failures surfaced by the scheduler API.
///
/// These are passed through unchanged; nothing in the crate retries them.
#[derive(Error, Debug)]
pub enum RemoteError {
    /// The request never produced a usable response (connect, TLS, timeout, body decode).
    #[error("scheduler request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The scheduler answered with a non-success status.
    #[error("scheduler rejected request ({status}): {message}")]
    Rejected {
        status: u16,
        /// The scheduler's error type name, e.g. `DesiredLRPAlreadyExists`.
        kind: Option<String>,
        message: String,
    },
}

impl RemoteError {
    /// The scheduler's error type name, when it sent one.
    #[must_use]
    pub fn kind(&self) -> Option<&str> {
        match self {
            Self::Rejected { kind, .. } => kind.as_deref(),
            Self::Transport(_) => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("{} is a reserved app name. It is used internally to stream debug logs for lattice components.", RESERVED_DEBUG_APP_ID)]
    ReservedName,

    #[error("{name} is already running")]
    AlreadyExists { name: String },

    #[error("{name} is not started.")]
    NotStarted { name: String },

    #[error("invalid desired LRP: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("invalid {flag}: {reason}")]
    InvalidArgument { flag: &'static str, reason: String },

    #[error(transparent)]
    InvalidMonitor(#[from] MonitorError),

    #[error(transparent)]
    ImageReference(#[from] ImageReferenceError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Remote(RemoteError::Transport(err))
    }
}

/// Failure of a raw descriptor submission.
///
/// Carries the process guid whenever the descriptor decoded far enough to
/// have one, so callers can report which record was attempted.
#[derive(Error, Debug)]
#[error("{source}")]
pub struct SubmitError {
    pub process_guid: Option<String>,
    #[source]
    pub source: Error,
}

impl SubmitError {
    pub(crate) fn attempted(process_guid: &str, source: impl Into<Error>) -> Self {
        Self {
            process_guid: Some(process_guid.to_string()),
            source: source.into(),
        }
    }

    pub(crate) fn undecodable(source: serde_json::Error) -> Self {
        Self {
            process_guid: None,
            source: Error::Decode(source),
        }
    }
}
