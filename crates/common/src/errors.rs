//! Error types for the Flowdeck backend.

use thiserror::Error;

/// Error taxonomy shared by the store client, the AI pipeline, and the
/// HTTP handlers.
#[derive(Error, Debug, Clone)]
pub enum FlowdeckError {
    // Entity lookups
    #[error("Board not found")]
    BoardNotFound { board_id: String },

    #[error("Card not found")]
    CardNotFound { card_id: String },

    // Datastore errors
    #[error("Store error: {reason}")]
    Store { reason: String },

    // LLM gateway errors
    #[error("Gateway error: {reason}")]
    Gateway { reason: String },

    #[error("Malformed model response: {reason}")]
    MalformedResponse { reason: String },

    // Configuration errors
    #[error("Configuration error: {reason}")]
    Config { reason: String },

    // General errors
    #[error("Internal error: {reason}")]
    Internal { reason: String },
}

impl FlowdeckError {
    /// Shorthand for a store failure.
    pub fn store(reason: impl Into<String>) -> Self {
        Self::Store {
            reason: reason.into(),
        }
    }

    /// Shorthand for a gateway failure.
    pub fn gateway(reason: impl Into<String>) -> Self {
        Self::Gateway {
            reason: reason.into(),
        }
    }

    /// Shorthand for an unparsable or wrong-shape model response.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            reason: reason.into(),
        }
    }
}

/// Result type alias for Flowdeck operations
pub type FlowdeckResult<T> = Result<T, FlowdeckError>;
