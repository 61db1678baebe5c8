//! Error handling for flowstate
//!
//! This module defines custom error types and a Result alias for use
//! throughout the crate. Most engine operations are deliberately
//! infallible (they degrade to warnings per the configured policies);
//! the error type covers the genuinely fallible edges: config files,
//! (de)serialization, and decoding the store out of a graph's extra data.

use thiserror::Error;

/// Main error type for flowstate operations
#[derive(Error, Debug)]
pub enum FlowStateError {
    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// Errors related to the preset store (corrupt persisted data)
    #[error("Preset store error: {0}")]
    Store(String),

    /// Errors related to graph serialization round-trips
    #[error("Graph error: {0}")]
    Graph(String),

    /// Errors related to channel communication
    #[error("Channel error: {0}")]
    Channel(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<FlowStateError>,
    },
}

impl FlowStateError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        FlowStateError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

/// Result type alias for flowstate operations
pub type Result<T> = std::result::Result<T, FlowStateError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}
