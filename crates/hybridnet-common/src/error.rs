//! Unified error types for the hybridnet workspace.
//!
//! Configuration problems are reported before any resource node is built,
//! so a returned error always means no topology was produced.

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum HybridnetError {
    /// A required parameter is absent or empty.
    #[error("missing required parameter: {name}")]
    MissingParameter {
        /// Name of the missing parameter.
        name: String,
    },

    /// A cross-field rule was violated, or a token was rejected under the
    /// strict parse policy.
    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        /// Description of the violated rule.
        message: String,
    },

    /// The DNS zone collaborator could not resolve the root domain.
    #[error("zone lookup failed for {domain}: {message}")]
    ZoneLookup {
        /// Root domain that was looked up.
        domain: String,
        /// Message reported by the collaborator.
        message: String,
    },

    /// Serialization or deserialization failed.
    #[error("serialization error: {source}")]
    Serialization {
        /// Underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}

impl HybridnetError {
    /// Builds a [`HybridnetError::MissingParameter`] for `name`.
    #[must_use]
    pub fn missing(name: impl Into<String>) -> Self {
        Self::MissingParameter { name: name.into() }
    }

    /// Builds a [`HybridnetError::InvalidConfiguration`] with `message`.
    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, HybridnetError>;
