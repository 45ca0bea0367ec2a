use std::fmt::Write;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApiTestError>;

#[derive(Error, Debug)]
pub enum ApiTestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Collection not found: {0}")]
    CollectionNotFound(String),

    #[error("Test case not found: {0}")]
    TestCaseNotFound(String),

    #[error("Interface not found: {0}")]
    InterfaceNotFound(String),

    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Store error: {0}")]
    Store(String),
}

/// Transport-level failure of the HTTP call. Non-2xx responses are not errors.
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Request timed out after {timeout_ms} ms")]
    Timeout {
        timeout_ms: u64,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Raised only when strict resolution is enabled.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    #[error("No execution record for key '{key}' (in '{reference}')")]
    UnknownKey { key: String, reference: String },

    #[error("Path '{path}' not found in '{reference}'")]
    MissingPath { path: String, reference: String },
}

#[derive(Error, Debug)]
pub enum SandboxError {
    #[error("Failed to set up script context: {0}")]
    Setup(String),

    #[error("Script timed out after {0} ms")]
    Timeout(u64),

    #[error("Script worker stopped unexpectedly")]
    WorkerLost,
}

#[derive(Error, Debug)]
#[error("{0}")]
pub struct HookError(pub String);

impl From<String> for HookError {
    fn from(msg: String) -> Self {
        HookError(msg)
    }
}

impl From<&str> for HookError {
    fn from(msg: &str) -> Self {
        HookError(msg.to_string())
    }
}

/// Renders the `source()` chain below `err`, one cause per line.
pub fn source_chain(err: &dyn std::error::Error) -> Option<String> {
    let mut out = String::new();
    let mut current = err.source();
    while let Some(cause) = current {
        let _ = writeln!(out, "caused by: {cause}");
        current = cause.source();
    }
    if out.is_empty() {
        None
    } else {
        Some(out.trim_end().to_string())
    }
}
