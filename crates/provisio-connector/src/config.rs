//! Connector binding configuration
//!
//! Resource identity, schema namespace, and timeouts for a bound connector.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{ConnectorError, ConnectorResult};
use crate::ids::ResourceOid;

/// Configuration of one resource a connector instance is bound to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// Resource OID.
    #[serde(default)]
    pub oid: ResourceOid,

    /// Human-readable resource name.
    pub name: String,

    /// Namespace URI of the resource schema. Every object class and ordinary
    /// attribute of this resource is qualified with it.
    pub namespace: String,

    /// Timeouts and paging.
    #[serde(default)]
    pub settings: ConnectionSettings,
}

impl ResourceConfig {
    /// Create a configuration with default settings.
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            oid: ResourceOid::new(),
            name: name.into(),
            namespace: namespace.into(),
            settings: ConnectionSettings::default(),
        }
    }

    /// Set the resource OID.
    #[must_use]
    pub fn with_oid(mut self, oid: ResourceOid) -> Self {
        self.oid = oid;
        self
    }

    /// Replace the connection settings.
    #[must_use]
    pub fn with_settings(mut self, settings: ConnectionSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Parse a configuration from JSON and validate it.
    pub fn from_json(json: &str) -> ConnectorResult<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| {
            ConnectorError::ConfigurationInvalid {
                message: e.to_string(),
            }
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ConnectorResult<()> {
        if self.name.trim().is_empty() {
            return Err(ConnectorError::ConfigurationInvalid {
                message: "resource name must not be empty".to_string(),
            });
        }
        if self.namespace.is_empty() || self.namespace.chars().any(char::is_whitespace) {
            return Err(ConnectorError::ConfigurationInvalid {
                message: format!(
                    "resource namespace '{}' must be a non-empty URI without whitespace",
                    self.namespace
                ),
            });
        }
        self.settings.validate()
    }

    /// Short description used in log and error messages.
    pub fn describe(&self) -> String {
        format!("{}(OID:{})", self.name, self.oid)
    }
}

/// Timeouts and paging applied to every native call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionSettings {
    /// Timeout for schema, object and synchronization calls, in seconds.
    #[serde(default = "default_operation_timeout")]
    pub operation_timeout_secs: u64,

    /// Timeout for the connectivity probe, in seconds.
    #[serde(default = "default_test_timeout")]
    pub test_timeout_secs: u64,

    /// Page size hint passed to native searches.
    #[serde(default = "default_search_page_size")]
    pub search_page_size: u32,
}

fn default_operation_timeout() -> u64 {
    60
}

fn default_test_timeout() -> u64 {
    30
}

fn default_search_page_size() -> u32 {
    100
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            operation_timeout_secs: default_operation_timeout(),
            test_timeout_secs: default_test_timeout(),
            search_page_size: default_search_page_size(),
        }
    }
}

impl ConnectionSettings {
    /// Create new connection settings with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the operation timeout.
    #[must_use]
    pub fn with_operation_timeout(mut self, secs: u64) -> Self {
        self.operation_timeout_secs = secs;
        self
    }

    /// Set the probe timeout.
    #[must_use]
    pub fn with_test_timeout(mut self, secs: u64) -> Self {
        self.test_timeout_secs = secs;
        self
    }

    /// Set the search page size.
    #[must_use]
    pub fn with_search_page_size(mut self, size: u32) -> Self {
        self.search_page_size = size;
        self
    }

    /// Get operation timeout as Duration.
    pub fn operation_timeout(&self) -> Duration {
        Duration::from_secs(self.operation_timeout_secs)
    }

    /// Get probe timeout as Duration.
    pub fn test_timeout(&self) -> Duration {
        Duration::from_secs(self.test_timeout_secs)
    }

    /// Validate the settings.
    pub fn validate(&self) -> ConnectorResult<()> {
        if self.operation_timeout_secs == 0 || self.test_timeout_secs == 0 {
            return Err(ConnectorError::ConfigurationInvalid {
                message: "timeouts must be greater than zero".to_string(),
            });
        }
        if self.search_page_size == 0 {
            return Err(ConnectorError::ConfigurationInvalid {
                message: "search page size must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}
