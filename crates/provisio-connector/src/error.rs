//! Connector layer error types
//!
//! Error definitions with communication/permanent classification. The layer
//! never retries; classification exists so the surrounding scheduler can.

use thiserror::Error;

/// Error that can occur while talking to a resource through a connector.
#[derive(Debug, Error)]
pub enum ConnectorError {
    // Communication errors (transient)
    /// Failed to reach the resource or the connector rejected the call at
    /// the transport/authentication layer.
    #[error("connection failed: {message}")]
    ConnectionFailed {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A native call did not complete within the configured timeout.
    #[error("{operation} timed out after {timeout_secs} seconds")]
    ConnectionTimeout {
        operation: String,
        timeout_secs: u64,
    },

    /// The connector binding was cancelled while a native call was pending.
    #[error("{operation} cancelled")]
    Cancelled { operation: String },

    /// Resource is temporarily unavailable.
    #[error("resource unavailable: {message}")]
    TargetUnavailable { message: String },

    // Caller errors (permanent)
    /// Caller supplied an argument the layer cannot work with.
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    /// The connector does not provide the requested capability.
    #[error("operation not supported: {operation}")]
    Unsupported { operation: String },

    /// A persisted synchronization token could not be reconstructed.
    #[error("invalid synchronization token: {message}")]
    InvalidToken { message: String },

    // Resource/state errors (permanent)
    /// The native schema call failed for a non-transport reason.
    #[error("schema discovery failed: {message}")]
    SchemaDiscoveryFailed {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Object already exists on the resource.
    #[error("object already exists: {identifier}")]
    ObjectAlreadyExists { identifier: String },

    /// Object targeted by a modify/delete does not exist.
    #[error("object not found: {identifier}")]
    ObjectNotFound { identifier: String },

    /// Resource or connector configuration is invalid.
    #[error("invalid configuration: {message}")]
    ConfigurationInvalid { message: String },

    // Internal errors
    /// Internal error.
    #[error("internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Serialization error.
    #[error("serialization error: {message}")]
    Serialization { message: String },
}

impl ConnectorError {
    /// Check if this error belongs to the communication class.
    ///
    /// Communication errors are always surfaced to the caller; a retry
    /// policy, if any, lives outside this crate.
    pub fn is_communication(&self) -> bool {
        matches!(
            self,
            ConnectorError::ConnectionFailed { .. }
                | ConnectorError::ConnectionTimeout { .. }
                | ConnectorError::Cancelled { .. }
                | ConnectorError::TargetUnavailable { .. }
        )
    }

    /// Check if this error is transient and the operation may be retried
    /// by an external scheduler.
    pub fn is_transient(&self) -> bool {
        self.is_communication()
    }

    /// Check if this error is permanent and retry won't help.
    pub fn is_permanent(&self) -> bool {
        !self.is_transient()
    }

    /// Get an error code for classification.
    pub fn error_code(&self) -> &'static str {
        match self {
            ConnectorError::ConnectionFailed { .. } => "CONNECTION_FAILED",
            ConnectorError::ConnectionTimeout { .. } => "CONNECTION_TIMEOUT",
            ConnectorError::Cancelled { .. } => "CANCELLED",
            ConnectorError::TargetUnavailable { .. } => "TARGET_UNAVAILABLE",
            ConnectorError::InvalidArgument { .. } => "INVALID_ARGUMENT",
            ConnectorError::Unsupported { .. } => "UNSUPPORTED_OPERATION",
            ConnectorError::InvalidToken { .. } => "INVALID_TOKEN",
            ConnectorError::SchemaDiscoveryFailed { .. } => "SCHEMA_DISCOVERY_FAILED",
            ConnectorError::ObjectAlreadyExists { .. } => "OBJECT_EXISTS",
            ConnectorError::ObjectNotFound { .. } => "OBJECT_NOT_FOUND",
            ConnectorError::ConfigurationInvalid { .. } => "INVALID_CONFIG",
            ConnectorError::Internal { .. } => "INTERNAL_ERROR",
            ConnectorError::Serialization { .. } => "SERIALIZATION_ERROR",
        }
    }

    // Convenience constructors

    /// Create a connection failed error.
    pub fn connection_failed(message: impl Into<String>) -> Self {
        ConnectorError::ConnectionFailed {
            message: message.into(),
            source: None,
        }
    }

    /// Create a connection failed error with source.
    pub fn connection_failed_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ConnectorError::ConnectionFailed {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        ConnectorError::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create an unsupported operation error.
    pub fn unsupported(operation: impl Into<String>) -> Self {
        ConnectorError::Unsupported {
            operation: operation.into(),
        }
    }

    /// Create an invalid token error.
    pub fn invalid_token(message: impl Into<String>) -> Self {
        ConnectorError::InvalidToken {
            message: message.into(),
        }
    }

    /// Create a schema discovery error.
    pub fn schema_discovery_failed(message: impl Into<String>) -> Self {
        ConnectorError::SchemaDiscoveryFailed {
            message: message.into(),
            source: None,
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ConnectorError::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Create an internal error with source.
    pub fn internal_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ConnectorError::Internal {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Render the error together with its source chain, outermost first.
    pub fn chain_description(&self) -> String {
        let mut out = self.to_string();
        let mut current = std::error::Error::source(self);
        while let Some(cause) = current {
            out.push_str(": ");
            out.push_str(&cause.to_string());
            current = cause.source();
        }
        out
    }
}

impl From<serde_json::Error> for ConnectorError {
    fn from(err: serde_json::Error) -> Self {
        ConnectorError::Serialization {
            message: err.to_string(),
        }
    }
}

/// Result type for connector operations.
pub type ConnectorResult<T> = Result<T, ConnectorError>;
