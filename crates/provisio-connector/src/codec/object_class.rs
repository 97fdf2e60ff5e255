//! Object class codec
//!
//! Maps native object class names onto qualified names in the resource
//! namespace and back:
//!
//! | native        | canonical local name          |
//! |---------------|-------------------------------|
//! | `__ACCOUNT__` | `AccountObjectClass`          |
//! | `__GROUP__`   | `GroupObjectClass`            |
//! | `printer`     | `CustomprinterObjectClass`    |
//!
//! A native name that already looks like `Custom...ObjectClass` cannot be
//! told apart from an encoded one, so it is rejected in both directions.

use crate::error::{ConnectorError, ConnectorResult};
use crate::native::NativeObjectClass;
use crate::qname::QualifiedName;
use crate::vocabulary::{ICF_SCHEMA_PREFIX, RESOURCE_INSTANCE_PREFIX};

/// Local name of the account object class.
pub const ACCOUNT_OBJECTCLASS_LOCAL_NAME: &str = "AccountObjectClass";

/// Local name of the group object class.
pub const GROUP_OBJECTCLASS_LOCAL_NAME: &str = "GroupObjectClass";

/// Prefix marking an encoded custom object class.
pub const CUSTOM_OBJECTCLASS_PREFIX: &str = "Custom";

/// Suffix marking an encoded custom object class.
pub const CUSTOM_OBJECTCLASS_SUFFIX: &str = "ObjectClass";

/// Element name of account instances.
const ACCOUNT_ELEMENT_LOCAL_NAME: &str = "account";

/// Element name of group instances.
const GROUP_ELEMENT_LOCAL_NAME: &str = "group";

fn looks_encoded(name: &str) -> bool {
    name.len() >= CUSTOM_OBJECTCLASS_PREFIX.len() + CUSTOM_OBJECTCLASS_SUFFIX.len()
        && name.starts_with(CUSTOM_OBJECTCLASS_PREFIX)
        && name.ends_with(CUSTOM_OBJECTCLASS_SUFFIX)
}

/// Stateless object class name codec for one resource namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectClassCodec {
    namespace: String,
}

impl ObjectClassCodec {
    /// Create a codec for the given resource namespace.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    /// The resource namespace.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Encode a native object class as a qualified name.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for an empty name, a name containing `:` or
    /// whitespace, or a name that already matches the custom marker pattern.
    pub fn encode(&self, object_class: &NativeObjectClass) -> ConnectorResult<QualifiedName> {
        if object_class.is_account() {
            return Ok(self.well_known(ACCOUNT_OBJECTCLASS_LOCAL_NAME));
        }
        if object_class.is_group() {
            return Ok(self.well_known(GROUP_OBJECTCLASS_LOCAL_NAME));
        }

        let native = object_class.as_str();
        validate_native_name(native)?;
        Ok(QualifiedName::with_prefix(
            &self.namespace,
            format!("{CUSTOM_OBJECTCLASS_PREFIX}{native}{CUSTOM_OBJECTCLASS_SUFFIX}"),
            RESOURCE_INSTANCE_PREFIX,
        ))
    }

    /// Decode a qualified name back to the native object class.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when the name is in a foreign namespace, or its
    /// local part is neither well-known nor a valid custom encoding.
    pub fn decode(&self, name: &QualifiedName) -> ConnectorResult<NativeObjectClass> {
        if !name.is_in_namespace(&self.namespace) {
            return Err(ConnectorError::invalid_argument(format!(
                "object class {} is not in the resource namespace {}",
                name, self.namespace
            )));
        }

        let local = name.local_part();
        if local == ACCOUNT_OBJECTCLASS_LOCAL_NAME {
            return Ok(NativeObjectClass::account());
        }
        if local == GROUP_OBJECTCLASS_LOCAL_NAME {
            return Ok(NativeObjectClass::group());
        }

        let inner = local
            .strip_prefix(CUSTOM_OBJECTCLASS_PREFIX)
            .and_then(|rest| rest.strip_suffix(CUSTOM_OBJECTCLASS_SUFFIX))
            .ok_or_else(|| {
                ConnectorError::invalid_argument(format!(
                    "cannot decode object class {name}: expected {ACCOUNT_OBJECTCLASS_LOCAL_NAME}, \
                     {GROUP_OBJECTCLASS_LOCAL_NAME} or \
                     {CUSTOM_OBJECTCLASS_PREFIX}<name>{CUSTOM_OBJECTCLASS_SUFFIX}"
                ))
            })?;
        validate_native_name(inner)?;
        Ok(NativeObjectClass::new(inner))
    }

    /// Element name of instances of the given class.
    pub fn element_name(&self, object_class: &NativeObjectClass) -> QualifiedName {
        let local = if object_class.is_account() {
            ACCOUNT_ELEMENT_LOCAL_NAME
        } else if object_class.is_group() {
            GROUP_ELEMENT_LOCAL_NAME
        } else {
            object_class.as_str()
        };
        QualifiedName::with_prefix(&self.namespace, local, RESOURCE_INSTANCE_PREFIX)
    }

    fn well_known(&self, local: &str) -> QualifiedName {
        QualifiedName::with_prefix(&self.namespace, local, ICF_SCHEMA_PREFIX)
    }
}

fn validate_native_name(native: &str) -> ConnectorResult<()> {
    if native.is_empty() {
        return Err(ConnectorError::invalid_argument(
            "native object class name is empty",
        ));
    }
    if native.contains(':') || native.chars().any(char::is_whitespace) {
        return Err(ConnectorError::invalid_argument(format!(
            "native object class name '{native}' contains ':' or whitespace"
        )));
    }
    if looks_encoded(native) {
        return Err(ConnectorError::invalid_argument(format!(
            "native object class name '{native}' is ambiguous with the \
             {CUSTOM_OBJECTCLASS_PREFIX}<name>{CUSTOM_OBJECTCLASS_SUFFIX} encoding"
        )));
    }
    Ok(())
}
