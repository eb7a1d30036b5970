//! Error types for envshape
//!
//! Malformed transform input and schema validation failures surface
//! synchronously while the environment module starts up. Nothing here is
//! retried or downgraded to a warning: either the whole validated environment
//! is produced or initialization stops. `NotRegistered` is a lookup error,
//! returned when a consumer resolves a shape the container never received.

use thiserror::Error;

/// Top-level envshape error
#[derive(Error, Debug)]
pub enum EnvError {
    /// A field marked for transformation could not be parsed
    #[error("Malformed value for environment variable '{field}': {source}")]
    MalformedTransformInput {
        field: String,
        #[source]
        source: serde_json::Error,
    },

    /// The preprocessed environment was rejected by the schema
    #[error("Environment validation failed: {}", .messages.join("; "))]
    SchemaValidation { messages: Vec<String> },

    /// A service was looked up in a container it was never registered in
    #[error("Service not registered: {service}")]
    NotRegistered { service: String },
}

impl EnvError {
    /// Build a validation failure, falling back to a generic message when
    /// the schema reported none.
    pub fn validation(messages: Vec<String>) -> Self {
        let messages = if messages.is_empty() {
            vec!["environment rejected by schema".to_string()]
        } else {
            messages
        };
        EnvError::SchemaValidation { messages }
    }

    pub fn not_registered<T: ?Sized>() -> Self {
        EnvError::NotRegistered {
            service: std::any::type_name::<T>().to_string(),
        }
    }

    /// Messages carried by a validation failure, empty for other kinds.
    pub fn messages(&self) -> &[String] {
        match self {
            EnvError::SchemaValidation { messages } => messages,
            _ => &[],
        }
    }
}

/// Result type alias for envshape operations
pub type Result<T> = std::result::Result<T, EnvError>;
