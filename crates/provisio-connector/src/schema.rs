//! Canonical schema model
//!
//! Resource-agnostic representation of object classes and their attributes.
//! A `Schema` is built once per discovery call and is read-only afterwards;
//! share it behind an `Arc` across concurrent operations.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::{ConnectorError, ConnectorResult};
use crate::native::NativeObjectClass;
use crate::qname::QualifiedName;

/// Upper bound on the number of values an attribute may hold.
///
/// Serialized as a number, or as the string `"unbounded"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaxOccurs {
    /// At most this many values.
    Bounded(u32),
    /// Any number of values.
    Unbounded,
}

/// Serialized sentinel for [`MaxOccurs::Unbounded`].
pub const UNBOUNDED: &str = "unbounded";

impl MaxOccurs {
    /// Check whether more than one value is allowed.
    pub fn is_multi_valued(&self) -> bool {
        match self {
            MaxOccurs::Bounded(n) => *n > 1,
            MaxOccurs::Unbounded => true,
        }
    }
}

impl fmt::Display for MaxOccurs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaxOccurs::Bounded(n) => write!(f, "{n}"),
            MaxOccurs::Unbounded => f.write_str(UNBOUNDED),
        }
    }
}

impl Serialize for MaxOccurs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MaxOccurs::Bounded(n) => serializer.serialize_u32(*n),
            MaxOccurs::Unbounded => serializer.serialize_str(UNBOUNDED),
        }
    }
}

impl<'de> Deserialize<'de> for MaxOccurs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(u32),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Number(n) => Ok(MaxOccurs::Bounded(n)),
            Repr::Text(s) if s == UNBOUNDED => Ok(MaxOccurs::Unbounded),
            Repr::Text(s) => Err(serde::de::Error::custom(format!(
                "expected a number or \"{UNBOUNDED}\", got \"{s}\""
            ))),
        }
    }
}

/// Canonical schema of one resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Namespace of the resource this schema describes.
    pub namespace: String,

    /// Object class definitions, in native discovery order.
    pub definitions: Vec<ResourceObjectDefinition>,
}

impl Schema {
    /// Create an empty schema for the given namespace.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            definitions: Vec::new(),
        }
    }

    /// Add a definition.
    pub fn add_definition(&mut self, definition: ResourceObjectDefinition) {
        self.definitions.push(definition);
    }

    /// Find a definition by its type name (the object class).
    pub fn find_definition(&self, type_name: &QualifiedName) -> Option<&ResourceObjectDefinition> {
        self.definitions.iter().find(|d| &d.type_name == type_name)
    }

    /// Find a definition by its element name.
    pub fn definition_by_element(
        &self,
        element_name: &QualifiedName,
    ) -> Option<&ResourceObjectDefinition> {
        self.definitions
            .iter()
            .find(|d| &d.element_name == element_name)
    }

    /// The definition marked as the default account type, if any.
    pub fn default_account_definition(&self) -> Option<&ResourceObjectDefinition> {
        self.definitions.iter().find(|d| d.default_account_type)
    }

    /// All definitions of the account kind.
    pub fn account_definitions(&self) -> Vec<&ResourceObjectDefinition> {
        self.definitions.iter().filter(|d| d.account_type).collect()
    }

    /// All object class names.
    pub fn object_class_names(&self) -> Vec<&QualifiedName> {
        self.definitions.iter().map(|d| &d.type_name).collect()
    }

    /// Check the structural invariants of the schema.
    ///
    /// - every definition has at least one identifier,
    /// - every identifier names an attribute definition of the same class,
    /// - at most one definition is the default account type.
    pub fn validate(&self) -> ConnectorResult<()> {
        for definition in &self.definitions {
            if definition.identifiers.is_empty() {
                return Err(ConnectorError::internal(format!(
                    "object class {} has no identifier",
                    definition.type_name
                )));
            }
            for identifier in &definition.identifiers {
                if definition.find_attribute(identifier).is_none() {
                    return Err(ConnectorError::internal(format!(
                        "identifier {} of object class {} has no attribute definition",
                        identifier, definition.type_name
                    )));
                }
            }
        }
        let defaults = self
            .definitions
            .iter()
            .filter(|d| d.default_account_type)
            .count();
        if defaults > 1 {
            return Err(ConnectorError::internal(format!(
                "{defaults} object classes are marked as the default account type"
            )));
        }
        Ok(())
    }
}

/// A canonical object class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceObjectDefinition {
    /// The object class name.
    pub type_name: QualifiedName,

    /// Element name of instances of this class.
    pub element_name: QualifiedName,

    /// Native object class this definition was translated from.
    pub native_object_class: NativeObjectClass,

    /// Attribute definitions, in native discovery order.
    pub attributes: Vec<ResourceObjectAttributeDefinition>,

    /// Names of the attributes that uniquely address an instance.
    pub identifiers: Vec<QualifiedName>,

    /// Whether this is an account object class.
    #[serde(default)]
    pub account_type: bool,

    /// Whether this is the default account object class.
    #[serde(default)]
    pub default_account_type: bool,
}

impl ResourceObjectDefinition {
    /// Create a definition without attributes.
    pub fn new(
        type_name: QualifiedName,
        element_name: QualifiedName,
        native_object_class: NativeObjectClass,
    ) -> Self {
        Self {
            type_name,
            element_name,
            native_object_class,
            attributes: Vec::new(),
            identifiers: Vec::new(),
            account_type: false,
            default_account_type: false,
        }
    }

    /// Add an attribute definition.
    pub fn add_attribute(&mut self, attribute: ResourceObjectAttributeDefinition) {
        self.attributes.push(attribute);
    }

    /// Add an attribute definition and mark it as an identifier.
    pub fn add_identifier(&mut self, attribute: ResourceObjectAttributeDefinition) {
        self.identifiers.push(attribute.name.clone());
        self.attributes.push(attribute);
    }

    /// Find an attribute definition by name.
    pub fn find_attribute(
        &self,
        name: &QualifiedName,
    ) -> Option<&ResourceObjectAttributeDefinition> {
        self.attributes.iter().find(|a| &a.name == name)
    }

    /// Check if an attribute is an identifier.
    pub fn is_identifier(&self, name: &QualifiedName) -> bool {
        self.identifiers.contains(name)
    }

    /// Attribute definitions of the identifiers.
    pub fn identifier_definitions(&self) -> Vec<&ResourceObjectAttributeDefinition> {
        self.identifiers
            .iter()
            .filter_map(|id| self.find_attribute(id))
            .collect()
    }

    /// All required attributes.
    pub fn required_attributes(&self) -> Vec<&ResourceObjectAttributeDefinition> {
        self.attributes.iter().filter(|a| a.is_required()).collect()
    }

    /// All multi-valued attributes.
    pub fn multi_valued_attributes(&self) -> Vec<&ResourceObjectAttributeDefinition> {
        self.attributes
            .iter()
            .filter(|a| a.is_multi_valued())
            .collect()
    }
}

fn default_true() -> bool {
    true
}

/// A canonical attribute definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceObjectAttributeDefinition {
    /// Attribute name.
    pub name: QualifiedName,

    /// Value type.
    pub type_name: QualifiedName,

    /// Native attribute name this definition was translated from.
    pub native_name: String,

    /// Minimum number of values (0 optional, 1 required).
    pub min_occurs: u32,

    /// Maximum number of values.
    pub max_occurs: MaxOccurs,

    /// Whether the attribute may be set on create.
    #[serde(default = "default_true")]
    pub creatable: bool,

    /// Whether the attribute may be modified.
    #[serde(default = "default_true")]
    pub updateable: bool,

    /// Whether the attribute can be read back.
    #[serde(default = "default_true")]
    pub readable: bool,

    /// Whether the attribute is returned without being asked for.
    #[serde(default = "default_true")]
    pub returned_by_default: bool,
}

impl ResourceObjectAttributeDefinition {
    /// Create an optional, single-valued attribute definition.
    pub fn new(
        name: QualifiedName,
        type_name: QualifiedName,
        native_name: impl Into<String>,
    ) -> Self {
        Self {
            name,
            type_name,
            native_name: native_name.into(),
            min_occurs: 0,
            max_occurs: MaxOccurs::Bounded(1),
            creatable: true,
            updateable: true,
            readable: true,
            returned_by_default: true,
        }
    }

    /// Set the cardinality.
    #[must_use]
    pub fn with_occurs(mut self, min_occurs: u32, max_occurs: MaxOccurs) -> Self {
        self.min_occurs = min_occurs;
        self.max_occurs = max_occurs;
        self
    }

    /// Check if at least one value is required.
    pub fn is_required(&self) -> bool {
        self.min_occurs > 0
    }

    /// Check if more than one value is allowed.
    pub fn is_multi_valued(&self) -> bool {
        self.max_occurs.is_multi_valued()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NS: &str = "http://example.com/resource";

    fn qn(local: &str) -> QualifiedName {
        QualifiedName::new(NS, local)
    }

    fn string_type() -> QualifiedName {
        QualifiedName::new("http://www.w3.org/2001/XMLSchema", "string")
    }

    fn account_definition() -> ResourceObjectDefinition {
        let mut definition = ResourceObjectDefinition::new(
            qn("AccountObjectClass"),
            qn("account"),
            NativeObjectClass::account(),
        );
        definition.add_identifier(
            ResourceObjectAttributeDefinition::new(qn("uid"), string_type(), "__UID__")
                .with_occurs(1, MaxOccurs::Bounded(1)),
        );
        definition.add_attribute(
            ResourceObjectAttributeDefinition::new(qn("mail"), string_type(), "mail")
                .with_occurs(0, MaxOccurs::Unbounded),
        );
        definition.account_type = true;
        definition.default_account_type = true;
        definition
    }

    #[test]
    fn test_max_occurs_serialization() {
        assert_eq!(serde_json::to_string(&MaxOccurs::Bounded(1)).unwrap(), "1");
        assert_eq!(
            serde_json::to_string(&MaxOccurs::Unbounded).unwrap(),
            "\"unbounded\""
        );
        assert_eq!(
            serde_json::from_str::<MaxOccurs>("\"unbounded\"").unwrap(),
            MaxOccurs::Unbounded
        );
        assert_eq!(
            serde_json::from_str::<MaxOccurs>("3").unwrap(),
            MaxOccurs::Bounded(3)
        );
        assert!(serde_json::from_str::<MaxOccurs>("\"many\"").is_err());
    }

    #[test]
    fn test_definition_lookups() {
        let mut schema = Schema::new(NS);
        schema.add_definition(account_definition());

        let account = schema.find_definition(&qn("AccountObjectClass")).unwrap();
        assert!(account.is_identifier(&qn("uid")));
        assert!(!account.is_identifier(&qn("mail")));
        assert_eq!(account.identifier_definitions().len(), 1);
        assert_eq!(account.required_attributes().len(), 1);
        assert_eq!(account.multi_valued_attributes()[0].name, qn("mail"));

        assert!(schema.definition_by_element(&qn("account")).is_some());
        assert_eq!(
            schema.default_account_definition().map(|d| &d.type_name),
            Some(&qn("AccountObjectClass"))
        );
        assert_eq!(schema.account_definitions().len(), 1);
    }

    #[test]
    fn test_validate_accepts_well_formed_schema() {
        let mut schema = Schema::new(NS);
        schema.add_definition(account_definition());
        assert!(schema.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_definition_without_identifier() {
        let mut schema = Schema::new(NS);
        schema.add_definition(ResourceObjectDefinition::new(
            qn("CustomthingObjectClass"),
            qn("thing"),
            NativeObjectClass::new("thing"),
        ));
        assert!(schema.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_two_default_accounts() {
        let mut schema = Schema::new(NS);
        schema.add_definition(account_definition());
        let mut second = account_definition();
        second.type_name = qn("CustomotherObjectClass");
        schema.add_definition(second);
        assert!(schema.validate().is_err());
    }

    #[test]
    fn test_schema_serialization() {
        let mut schema = Schema::new(NS);
        schema.add_definition(account_definition());

        let json = serde_json::to_string(&schema).unwrap();
        let parsed: Schema = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, schema);
    }
}
