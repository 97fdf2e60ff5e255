//! Resource objects
//!
//! Canonical, resource-agnostic representations of object instances and the
//! modifications applied to them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::qname::QualifiedName;
use crate::schema::ResourceObjectDefinition;

/// A string value carrying a security capability (passwords and similar).
///
/// The clear value is never rendered by `Debug`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GuardedString(String);

impl GuardedString {
    /// Wrap a clear-text value.
    pub fn new(clear: impl Into<String>) -> Self {
        Self(clear.into())
    }

    /// Access the clear-text value.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for GuardedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("GuardedString(***)")
    }
}

/// A single attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum AttributeValue {
    /// A string value.
    String(String),
    /// An integer value.
    Integer(i64),
    /// A floating-point value.
    Float(f64),
    /// A boolean value.
    Boolean(bool),
    /// Binary data.
    Binary(Vec<u8>),
    /// A point in time.
    DateTime(DateTime<Utc>),
    /// A guarded string.
    Protected(GuardedString),
}

impl AttributeValue {
    /// Get as a string if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as an integer if this is an integer value.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            AttributeValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as a boolean if this is a boolean value.
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            AttributeValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as a guarded string if this is a protected value.
    pub fn as_protected(&self) -> Option<&GuardedString> {
        match self {
            AttributeValue::Protected(p) => Some(p),
            _ => None,
        }
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        AttributeValue::String(s)
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::String(s.to_string())
    }
}

impl From<i64> for AttributeValue {
    fn from(i: i64) -> Self {
        AttributeValue::Integer(i)
    }
}

impl From<i32> for AttributeValue {
    fn from(i: i32) -> Self {
        AttributeValue::Integer(i64::from(i))
    }
}

impl From<bool> for AttributeValue {
    fn from(b: bool) -> Self {
        AttributeValue::Boolean(b)
    }
}

impl From<f64> for AttributeValue {
    fn from(f: f64) -> Self {
        AttributeValue::Float(f)
    }
}

impl From<Vec<u8>> for AttributeValue {
    fn from(bytes: Vec<u8>) -> Self {
        AttributeValue::Binary(bytes)
    }
}

impl From<DateTime<Utc>> for AttributeValue {
    fn from(ts: DateTime<Utc>) -> Self {
        AttributeValue::DateTime(ts)
    }
}

impl From<GuardedString> for AttributeValue {
    fn from(p: GuardedString) -> Self {
        AttributeValue::Protected(p)
    }
}

/// A named attribute with zero or more values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceObjectAttribute {
    pub name: QualifiedName,
    #[serde(default)]
    pub values: Vec<AttributeValue>,
}

impl ResourceObjectAttribute {
    /// Create an attribute without values.
    pub fn new(name: QualifiedName) -> Self {
        Self {
            name,
            values: Vec::new(),
        }
    }

    /// Create an attribute holding a single value.
    pub fn single(name: QualifiedName, value: impl Into<AttributeValue>) -> Self {
        Self {
            name,
            values: vec![value.into()],
        }
    }

    /// Add a value using builder pattern.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<AttributeValue>) -> Self {
        self.values.push(value.into());
        self
    }

    /// The value, if the attribute holds exactly one.
    pub fn single_value(&self) -> Option<&AttributeValue> {
        match self.values.as_slice() {
            [value] => Some(value),
            _ => None,
        }
    }

    /// The string value, if the attribute holds exactly one string.
    pub fn string_value(&self) -> Option<&str> {
        self.single_value().and_then(AttributeValue::as_str)
    }
}

/// A snapshot of one object on a resource.
///
/// Attributes are keyed by name; the order they are stored in carries no
/// meaning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceObject {
    attributes: Vec<ResourceObjectAttribute>,
}

impl ResourceObject {
    /// Create an empty object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute, replacing any attribute with the same name.
    pub fn set_attribute(&mut self, attribute: ResourceObjectAttribute) {
        match self.attributes.iter_mut().find(|a| a.name == attribute.name) {
            Some(existing) => *existing = attribute,
            None => self.attributes.push(attribute),
        }
    }

    /// Set an attribute using builder pattern.
    #[must_use]
    pub fn with_attribute(mut self, attribute: ResourceObjectAttribute) -> Self {
        self.set_attribute(attribute);
        self
    }

    /// Find an attribute by name.
    pub fn attribute(&self, name: &QualifiedName) -> Option<&ResourceObjectAttribute> {
        self.attributes.iter().find(|a| &a.name == name)
    }

    /// The string value of a single-valued attribute.
    pub fn string_value(&self, name: &QualifiedName) -> Option<&str> {
        self.attribute(name)
            .and_then(ResourceObjectAttribute::string_value)
    }

    /// Check if an attribute exists.
    pub fn has_attribute(&self, name: &QualifiedName) -> bool {
        self.attribute(name).is_some()
    }

    /// All attributes.
    pub fn attributes(&self) -> &[ResourceObjectAttribute] {
        &self.attributes
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Check if the object has no attributes.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// The string value of the uid attribute.
    pub fn uid(&self, uid_attribute: &QualifiedName) -> Option<&str> {
        self.string_value(uid_attribute)
    }

    /// The identifier attributes of `definition` present on this object.
    pub fn identifiers(&self, definition: &ResourceObjectDefinition) -> Vec<ResourceObjectAttribute> {
        self.select(definition.identifiers.iter())
    }

    /// The attributes whose names appear in `names`, in the order of `names`.
    pub fn select<'a>(
        &self,
        names: impl IntoIterator<Item = &'a QualifiedName>,
    ) -> Vec<ResourceObjectAttribute> {
        names
            .into_iter()
            .filter_map(|name| self.attribute(name).cloned())
            .collect()
    }
}

/// How a modification treats the values it carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModificationKind {
    /// Add the values to the attribute.
    Add,
    /// Remove the values from the attribute.
    Delete,
    /// Replace all values of the attribute.
    Replace,
}

/// One attribute-level change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeModification {
    pub kind: ModificationKind,
    pub attribute: ResourceObjectAttribute,
}

impl AttributeModification {
    /// Add values.
    pub fn add(attribute: ResourceObjectAttribute) -> Self {
        Self {
            kind: ModificationKind::Add,
            attribute,
        }
    }

    /// Remove values.
    pub fn delete(attribute: ResourceObjectAttribute) -> Self {
        Self {
            kind: ModificationKind::Delete,
            attribute,
        }
    }

    /// Replace all values.
    pub fn replace(attribute: ResourceObjectAttribute) -> Self {
        Self {
            kind: ModificationKind::Replace,
            attribute,
        }
    }
}

/// An operation carried alongside add/modify requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum Operation {
    /// Change an attribute.
    Modify(AttributeModification),
    /// Set the password credential.
    SetPassword { password: GuardedString },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qn(local: &str) -> QualifiedName {
        QualifiedName::new("http://example.com/ns", local)
    }

    #[test]
    fn test_guarded_string_debug_is_redacted() {
        let secret = GuardedString::new("hunter2");
        assert_eq!(format!("{secret:?}"), "GuardedString(***)");
        assert_eq!(secret.expose(), "hunter2");

        let value = AttributeValue::from(secret);
        assert!(!format!("{value:?}").contains("hunter2"));
    }

    #[test]
    fn test_set_attribute_replaces_by_name() {
        let mut object = ResourceObject::new()
            .with_attribute(ResourceObjectAttribute::single(qn("mail"), "a@example.com"));
        object.set_attribute(ResourceObjectAttribute::single(qn("mail"), "b@example.com"));

        assert_eq!(object.len(), 1);
        assert_eq!(object.string_value(&qn("mail")), Some("b@example.com"));
    }

    #[test]
    fn test_single_value_requires_exactly_one() {
        let empty = ResourceObjectAttribute::new(qn("mail"));
        assert!(empty.single_value().is_none());

        let multi = ResourceObjectAttribute::new(qn("mail"))
            .with_value("a@example.com")
            .with_value("b@example.com");
        assert!(multi.single_value().is_none());
        assert!(multi.string_value().is_none());

        let one = ResourceObjectAttribute::single(qn("age"), 42i64);
        assert_eq!(one.single_value().and_then(AttributeValue::as_integer), Some(42));
        assert!(one.string_value().is_none());
    }

    #[test]
    fn test_select_keeps_requested_order() {
        let object = ResourceObject::new()
            .with_attribute(ResourceObjectAttribute::single(qn("a"), "1"))
            .with_attribute(ResourceObjectAttribute::single(qn("b"), "2"));

        let names = [qn("b"), qn("missing"), qn("a")];
        let selected = object.select(names.iter());
        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].name, qn("b"));
        assert_eq!(selected[1].name, qn("a"));
    }

    #[test]
    fn test_attribute_value_serialization_is_tagged() {
        let value = AttributeValue::from("jack");
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "string", "value": "jack" }));

        let parsed: AttributeValue = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, value);
    }
}
