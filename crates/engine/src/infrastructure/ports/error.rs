// Port error helpers define the full contract - some are for future use
#![allow(dead_code)]

//! Error types for port operations.

/// Repository operation errors with context for debugging.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// Entity not found - includes entity type and ID for actionable error messages.
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Database operation failed - includes operation name for tracing.
    #[error("Database error in {operation}: {message}")]
    Database {
        operation: &'static str,
        message: String,
    },

    /// Serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Store-level constraint violated (e.g. duplicate external generation id).
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

impl RepoError {
    /// Create a NotFound error with entity type and ID context.
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    /// Create a Database error with operation context.
    pub fn database(operation: &'static str, message: impl ToString) -> Self {
        Self::Database {
            operation,
            message: message.to_string(),
        }
    }

    /// Create a Serialization error.
    pub fn serialization(message: impl ToString) -> Self {
        Self::Serialization(message.to_string())
    }

    /// Check if this is a NotFound error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Classified failures from the generative-service client.
///
/// The three variants are deliberately distinct: a transport failure means no
/// response arrived at all, an upstream error carries the service's own status
/// and body verbatim for diagnostic forwarding, and a malformed response means
/// the service answered successfully but the payload is unusable for the
/// requested kind.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GeneratorError {
    #[error("No response from the generative service: {0}")]
    Transport(String),

    #[error("Generative service error (status {status}): {details}")]
    Upstream { status: u16, details: String },

    #[error("Malformed response from the generative service: {0}")]
    MalformedResponse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_carries_entity_context() {
        let err = RepoError::not_found("Simulation", "abc123");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Simulation not found: abc123");
    }

    #[test]
    fn upstream_error_preserves_status_and_details() {
        let err = GeneratorError::Upstream {
            status: 503,
            details: "model overloaded".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("503"));
        assert!(display.contains("model overloaded"));
    }
}
