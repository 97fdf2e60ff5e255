//! In-memory connector configuration
//!
//! Declares the object classes the store accepts and which capabilities the
//! connector advertises.

use serde::{Deserialize, Serialize};

use provisio_connector::error::{ConnectorError, ConnectorResult};
use provisio_connector::native::{
    AttributeFlag, NativeAttributeInfo, NativeObjectClass, NativeObjectClassInfo, NativeType,
    NAME_NAME, PASSWORD_NAME,
};

/// Configuration for [`MemoryConnector`](crate::MemoryConnector).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Display name of the connector instance.
    #[serde(default = "default_display_name")]
    pub display_name: String,

    /// Hide the create, update and delete capabilities.
    #[serde(default)]
    pub read_only: bool,

    /// Advertise live synchronization.
    #[serde(default = "default_true")]
    pub supports_sync: bool,

    /// Object classes reported as the native schema.
    #[serde(default = "default_object_classes")]
    pub object_classes: Vec<NativeObjectClassInfo>,
}

fn default_display_name() -> String {
    "In-memory store".to_string()
}

fn default_true() -> bool {
    true
}

fn default_object_classes() -> Vec<NativeObjectClassInfo> {
    vec![
        NativeObjectClassInfo::new(NativeObjectClass::ACCOUNT)
            .with_attribute(NativeAttributeInfo::new(NAME_NAME, NativeType::String).required())
            .with_attribute(
                NativeAttributeInfo::new(PASSWORD_NAME, NativeType::GuardedString)
                    .with_flag(AttributeFlag::NotReadable)
                    .with_flag(AttributeFlag::NotReturnedByDefault),
            )
            .with_attribute(NativeAttributeInfo::new("fullName", NativeType::String))
            .with_attribute(NativeAttributeInfo::new("mail", NativeType::String).multi_valued()),
        NativeObjectClassInfo::new(NativeObjectClass::GROUP)
            .with_attribute(NativeAttributeInfo::new(NAME_NAME, NativeType::String).required())
            .with_attribute(NativeAttributeInfo::new("member", NativeType::String).multi_valued()),
    ]
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            display_name: default_display_name(),
            read_only: false,
            supports_sync: true,
            object_classes: default_object_classes(),
        }
    }
}

impl MemoryConfig {
    /// Create a configuration with the default account and group classes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the display name.
    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    /// Hide the mutating capabilities.
    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Enable or disable live synchronization.
    #[must_use]
    pub fn with_sync(mut self, enabled: bool) -> Self {
        self.supports_sync = enabled;
        self
    }

    /// Add an object class.
    #[must_use]
    pub fn with_object_class(mut self, info: NativeObjectClassInfo) -> Self {
        self.object_classes.push(info);
        self
    }

    /// Parse from JSON and validate.
    pub fn from_json(json: &str) -> ConnectorResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConnectorError::ConfigurationInvalid {
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ConnectorResult<()> {
        for (i, info) in self.object_classes.iter().enumerate() {
            if info.object_class.as_str().is_empty() {
                return Err(ConnectorError::ConfigurationInvalid {
                    message: "object class name must not be empty".to_string(),
                });
            }
            if self.object_classes[..i]
                .iter()
                .any(|other| other.object_class == info.object_class)
            {
                return Err(ConnectorError::ConfigurationInvalid {
                    message: format!("object class {} declared twice", info.object_class),
                });
            }
        }
        Ok(())
    }

    /// Find the declaration of an object class.
    pub fn find_class(&self, object_class: &NativeObjectClass) -> Option<&NativeObjectClassInfo> {
        self.object_classes
            .iter()
            .find(|info| &info.object_class == object_class)
    }
}
