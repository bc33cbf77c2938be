//! Core error types for redacta-core.
//!
//! One thiserror hierarchy shared across the library: storage,
//! configuration, gateway and validation failures all fold into
//! [`CoreError`] at the application boundary.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for redacta-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// AI gateway errors
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// Local input validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Storage-specific errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the on-device database
    #[error("Failed to open store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A stored record could not be decoded
    #[error("Stored record under '{key}' is not decodable: {message}")]
    CorruptRecord { key: String, message: String },

    /// The data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Errors from the generative-model gateway.
///
/// Network failures and malformed bodies are distinct variants but are
/// handled identically by callers: no retry, previous state preserved.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Transport-level failure (connect, timeout, TLS, ...)
    #[error("HTTP error: {0}")]
    Http(String),

    /// Non-success status from the service
    #[error("Service returned HTTP {status}")]
    Status { status: u16 },

    /// The response body did not match the declared schema
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The service returned no usable candidate text
    #[error("Service returned an empty response")]
    EmptyResponse,

    /// GEMINI_API_KEY is not set in the environment
    #[error("No API key configured (set GEMINI_API_KEY)")]
    MissingApiKey,
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::Http(err.to_string())
    }
}

/// Local input validation errors, rejected before any network call.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Essay shorter than the configured minimum
    #[error("Essay too short: {len} chars (minimum {min})")]
    EssayTooShort { len: usize, min: usize },

    /// Simulation requested with no subjects selected
    #[error("At least one subject must be selected")]
    NoSubjects,

    /// Simulation requested with a zero question count
    #[error("Question count must be greater than zero")]
    ZeroQuestions,

    /// Answer list does not cover the question list
    #[error("Expected {expected} answers, got {got}")]
    AnswerCountMismatch { expected: usize, got: usize },
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        StorageError::QueryFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
