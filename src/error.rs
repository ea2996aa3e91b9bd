//! Error types for the keyword bot.

use std::path::PathBuf;
use std::time::Duration;

use crate::dialogue::DialoguePhase;

/// Errors surfaced by the running bot.
///
/// Startup failures (configuration, dictionary, HTTP client) are reported
/// by `main` through `anyhow` and never reach this type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    #[error("Dialogue error: {0}")]
    Dialogue(#[from] DialogueError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Channel-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("Channel {name} failed to start: {reason}")]
    StartupFailed { name: String, reason: String },

    #[error("Failed to send response on channel {name}: {reason}")]
    SendFailed { name: String, reason: String },

    #[error("No channel registered under {name}")]
    UnknownChannel { name: String },

    #[error("Channel health check failed: {name}")]
    HealthCheckFailed { name: String },
}

/// Lexical dictionary errors.
///
/// A word that is simply not in the dictionary is never an error; these
/// cover dictionaries that cannot be read at all.
#[derive(Debug, thiserror::Error)]
pub enum LexiconError {
    #[error("Dictionary file not found: {}", path.display())]
    MissingFile { path: PathBuf },

    #[error("Malformed dictionary entry in {file} line {line}: {reason}")]
    Malformed {
        file: String,
        line: usize,
        reason: String,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Page fetch errors.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP client setup failed: {0}")]
    Client(String),

    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    #[error("Request to {url} failed: {reason}")]
    Request { url: String, reason: String },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to read body of {url}: {reason}")]
    Body { url: String, reason: String },
}

/// Dialogue state machine errors.
#[derive(Debug, thiserror::Error)]
pub enum DialogueError {
    #[error("Cannot transition from {from} to {to}")]
    InvalidTransition {
        from: DialoguePhase,
        to: DialoguePhase,
    },

    #[error("Dialogue already finished in phase {phase}")]
    AlreadyFinished { phase: DialoguePhase },

    #[error("Missing answer for {field}")]
    MissingAnswer { field: &'static str },
}
