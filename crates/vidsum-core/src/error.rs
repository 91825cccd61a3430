use thiserror::Error;

use crate::api::Endpoint;

/// Input rejected before any request is sent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// URL does not point at a recognized video host
    #[error("Please enter a valid YouTube URL")]
    InvalidUrl,

    /// No video language was chosen
    #[error("Please select the video language")]
    MissingLanguage,

    /// Language code is not one the service transcribes
    #[error("Unsupported video language: {0}")]
    UnsupportedLanguage(String),
}

/// Unified error type for vidsum-core
///
/// Covers:
/// - Input validation (caught before any network call)
/// - Remote API failures (non-2xx, transport, malformed replies)
/// - Configuration loading and validation
/// - General I/O
#[derive(Error, Debug)]
pub enum Error {
    // ==========================================================================
    // Validation Errors
    // ==========================================================================
    #[error(transparent)]
    Validation(#[from] ValidationError),

    // ==========================================================================
    // API Errors
    // ==========================================================================
    /// The API answered with a non-2xx status.
    /// `message` is the server's `error` field, or the operation fallback.
    #[error("{endpoint} request failed: {message}")]
    Request { endpoint: String, message: String },

    /// The request never produced a response
    #[error("{endpoint} request could not be sent: {reason}")]
    Transport { endpoint: String, reason: String },

    /// The request timed out
    #[error("{endpoint} request timed out")]
    Timeout { endpoint: String },

    /// The API answered 2xx with a body we could not decode
    #[error("invalid {endpoint} response: {reason}")]
    InvalidResponse { endpoint: String, reason: String },

    // ==========================================================================
    // Configuration Errors
    // ==========================================================================
    /// Failed to load configuration file
    #[error("failed to load config: {0}")]
    ConfigLoad(String),

    /// Invalid configuration value
    #[error("invalid config value for '{field}': {reason}")]
    ConfigInvalid { field: String, reason: String },

    // ==========================================================================
    // I/O Errors
    // ==========================================================================
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Text suitable for a user-facing notification.
    ///
    /// Server-supplied messages are shown verbatim. Undecodable replies get the
    /// endpoint's fallback text; everything else uses the display form.
    pub fn user_message(&self) -> String {
        match self {
            Self::Request { message, .. } => message.clone(),
            Self::Validation(e) => e.to_string(),
            Self::InvalidResponse { endpoint, .. } => Endpoint::from_path(endpoint)
                .map_or_else(|| self.to_string(), |e| e.fallback_message().to_string()),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
