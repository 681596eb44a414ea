//! Error taxonomy for the generation layer.
//!
//! Every failure a provider call can produce is one of these variants.
//! They are caught at the provider boundary and converted into a
//! `success:false` envelope; none of them propagate as faults to the
//! caller.

use thiserror::Error;

/// Errors that can occur while servicing a generation operation.
#[derive(Debug, Error)]
pub enum AiError {
    /// The active provider has no usable credential. Fails fast, before
    /// any network I/O.
    #[error("provider '{provider}' is not configured: {reason}")]
    Configuration { provider: String, reason: String },

    /// A transport-level failure reaching the backend.
    #[error("network error: {0}")]
    Network(String),

    /// The outbound call exceeded its deadline.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// The backend was reachable but returned a non-success status or a
    /// malformed native envelope.
    #[error("upstream error (HTTP {status}): {message}")]
    Upstream { status: u16, message: String },

    /// No extraction strategy recovered parseable JSON from the reply.
    /// Carries the original text for diagnostics.
    #[error("no parseable JSON in model reply ({} bytes)", raw.len())]
    Parse { raw: String },

    /// The content is structurally valid but missing required fields.
    #[error("missing required content: {0}")]
    Validation(String),
}

impl AiError {
    /// Returns `true` for failures that occurred before any network I/O.
    pub fn is_configuration(&self) -> bool {
        matches!(self, AiError::Configuration { .. })
    }

    /// Returns `true` when the reply text was fetched but could not be
    /// turned into the expected response type.
    pub fn is_malformed_reply(&self) -> bool {
        matches!(self, AiError::Parse { .. } | AiError::Validation(_))
    }
}
