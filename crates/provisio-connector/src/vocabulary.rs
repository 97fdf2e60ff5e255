//! Canonical vocabulary
//!
//! The fixed table of qualified names the codecs translate into. The table
//! is owned by whoever owns the canonical object model; this crate only
//! consumes it. Build it once at startup and hand it out by `Arc`.

use serde::{Deserialize, Serialize};

use crate::qname::QualifiedName;

/// W3C XML Schema namespace, home of the primitive value types.
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

/// Namespace of the connector-framework structural attributes (uid, name, password).
pub const ICF_SCHEMA_NAMESPACE: &str = "urn:provisio:connector:icf:resource-schema-1";

/// Namespace of canonical resource types (protected string).
pub const RESOURCE_NAMESPACE: &str = "urn:provisio:resource:resource-schema-1";

/// Namespace of the common model (diagnostics messages).
pub const COMMON_NAMESPACE: &str = "urn:provisio:common:common-1";

/// Namespace of live synchronization elements.
pub const LIVE_SYNC_NAMESPACE: &str = "urn:provisio:provisioning:live-sync-1";

/// Preferred prefix for XML Schema names.
pub const XSD_PREFIX: &str = "xsd";

/// Preferred prefix for connector-framework structural names.
pub const ICF_SCHEMA_PREFIX: &str = "icfs";

/// Preferred prefix for names in a resource instance namespace.
pub const RESOURCE_INSTANCE_PREFIX: &str = "ri";

/// Qualified names the connector layer maps native concepts onto.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalVocabulary {
    /// Namespace of the structural attribute names.
    pub icf_schema_namespace: String,
    /// The identifier attribute every resource object carries.
    pub uid_attribute: QualifiedName,
    /// The primary login name attribute.
    pub name_attribute: QualifiedName,
    /// The password attribute.
    pub password_attribute: QualifiedName,
    /// Type of security-sensitive string values.
    pub protected_string_type: QualifiedName,
    pub xsd_string: QualifiedName,
    pub xsd_int: QualifiedName,
    pub xsd_long: QualifiedName,
    pub xsd_integer: QualifiedName,
    pub xsd_decimal: QualifiedName,
    pub xsd_float: QualifiedName,
    pub xsd_double: QualifiedName,
    pub xsd_boolean: QualifiedName,
    pub xsd_base64_binary: QualifiedName,
    pub xsd_date_time: QualifiedName,
    pub xsd_any_type: QualifiedName,
    /// Element name of an error entry in a diagnostics result.
    pub diagnostics_error: QualifiedName,
    /// Element name of a warning entry in a diagnostics result.
    pub diagnostics_warning: QualifiedName,
    /// Element name under which synchronization tokens are persisted.
    pub sync_token: QualifiedName,
}

fn xsd(local: &str) -> QualifiedName {
    QualifiedName::with_prefix(XSD_NAMESPACE, local, XSD_PREFIX)
}

fn icfs(local: &str) -> QualifiedName {
    QualifiedName::with_prefix(ICF_SCHEMA_NAMESPACE, local, ICF_SCHEMA_PREFIX)
}

impl CanonicalVocabulary {
    /// The standard vocabulary.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            icf_schema_namespace: ICF_SCHEMA_NAMESPACE.to_string(),
            uid_attribute: icfs("uid"),
            name_attribute: icfs("name"),
            password_attribute: icfs("password"),
            protected_string_type: QualifiedName::new(RESOURCE_NAMESPACE, "ProtectedStringType"),
            xsd_string: xsd("string"),
            xsd_int: xsd("int"),
            xsd_long: xsd("long"),
            xsd_integer: xsd("integer"),
            xsd_decimal: xsd("decimal"),
            xsd_float: xsd("float"),
            xsd_double: xsd("double"),
            xsd_boolean: xsd("boolean"),
            xsd_base64_binary: xsd("base64Binary"),
            xsd_date_time: xsd("dateTime"),
            xsd_any_type: xsd("anyType"),
            diagnostics_error: QualifiedName::new(COMMON_NAMESPACE, "error"),
            diagnostics_warning: QualifiedName::new(COMMON_NAMESPACE, "warning"),
            sync_token: QualifiedName::new(LIVE_SYNC_NAMESPACE, "token"),
        }
    }

    /// Check whether a name is one of the structural attribute names.
    #[must_use]
    pub fn is_structural_attribute(&self, name: &QualifiedName) -> bool {
        *name == self.uid_attribute
            || *name == self.name_attribute
            || *name == self.password_attribute
    }
}

impl Default for CanonicalVocabulary {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_structural_names_share_namespace() {
        let vocabulary = CanonicalVocabulary::standard();
        for name in [
            &vocabulary.uid_attribute,
            &vocabulary.name_attribute,
            &vocabulary.password_attribute,
        ] {
            assert_eq!(name.namespace(), vocabulary.icf_schema_namespace);
            assert!(vocabulary.is_structural_attribute(name));
        }
    }

    #[test]
    fn test_protected_string_is_not_an_xsd_type() {
        let vocabulary = CanonicalVocabulary::standard();
        assert_ne!(vocabulary.protected_string_type.namespace(), XSD_NAMESPACE);
        assert_ne!(vocabulary.protected_string_type, vocabulary.xsd_string);
    }

    #[test]
    fn test_vocabulary_serialization() {
        let vocabulary = CanonicalVocabulary::standard();
        let json = serde_json::to_string(&vocabulary).unwrap();
        let parsed: CanonicalVocabulary = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, vocabulary);
    }
}
