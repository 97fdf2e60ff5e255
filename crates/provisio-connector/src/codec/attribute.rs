//! Attribute codec
//!
//! Translates native attribute descriptors and values into canonical
//! attribute definitions and values. Structural native names (`__UID__`,
//! `__NAME__`, `__PASSWORD__`) map onto fixed vocabulary names; every other
//! attribute is qualified with the resource namespace.

use std::sync::Arc;

use crate::error::{ConnectorError, ConnectorResult};
use crate::native::{
    AttributeFlag, NativeAttribute, NativeAttributeInfo, NativeObject, NativeType, NAME_NAME,
    PASSWORD_NAME, UID_NAME,
};
use crate::object::{AttributeValue, ResourceObject, ResourceObjectAttribute};
use crate::qname::QualifiedName;
use crate::schema::{MaxOccurs, ResourceObjectAttributeDefinition};
use crate::vocabulary::{CanonicalVocabulary, RESOURCE_INSTANCE_PREFIX};

/// Stateless attribute codec for one resource namespace.
#[derive(Debug, Clone)]
pub struct AttributeCodec {
    namespace: String,
    vocabulary: Arc<CanonicalVocabulary>,
}

impl AttributeCodec {
    /// Create a codec for the given resource namespace.
    pub fn new(namespace: impl Into<String>, vocabulary: Arc<CanonicalVocabulary>) -> Self {
        Self {
            namespace: namespace.into(),
            vocabulary,
        }
    }

    /// The vocabulary this codec maps onto.
    pub fn vocabulary(&self) -> &CanonicalVocabulary {
        &self.vocabulary
    }

    /// Canonical name of a native attribute.
    pub fn attribute_name(&self, native_name: &str) -> QualifiedName {
        match native_name {
            UID_NAME => self.vocabulary.uid_attribute.clone(),
            NAME_NAME => self.vocabulary.name_attribute.clone(),
            PASSWORD_NAME => self.vocabulary.password_attribute.clone(),
            other => QualifiedName::with_prefix(&self.namespace, other, RESOURCE_INSTANCE_PREFIX),
        }
    }

    /// Native name of a canonical attribute.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when the name is neither structural nor in the
    /// resource namespace.
    pub fn native_attribute_name(&self, name: &QualifiedName) -> ConnectorResult<String> {
        if *name == self.vocabulary.uid_attribute {
            return Ok(UID_NAME.to_string());
        }
        if *name == self.vocabulary.name_attribute {
            return Ok(NAME_NAME.to_string());
        }
        if *name == self.vocabulary.password_attribute {
            return Ok(PASSWORD_NAME.to_string());
        }
        if name.is_in_namespace(&self.namespace) {
            return Ok(name.local_part().to_string());
        }
        Err(ConnectorError::invalid_argument(format!(
            "attribute {} is not in the resource namespace {}",
            name, self.namespace
        )))
    }

    /// Canonical value type of a native type.
    pub fn type_name(&self, value_type: &NativeType) -> QualifiedName {
        let v = &self.vocabulary;
        match value_type {
            NativeType::GuardedString => v.protected_string_type.clone(),
            NativeType::String | NativeType::Character => v.xsd_string.clone(),
            NativeType::Integer => v.xsd_int.clone(),
            NativeType::Long => v.xsd_long.clone(),
            NativeType::Float => v.xsd_float.clone(),
            NativeType::Double => v.xsd_double.clone(),
            NativeType::BigInteger => v.xsd_integer.clone(),
            NativeType::BigDecimal => v.xsd_decimal.clone(),
            NativeType::Boolean => v.xsd_boolean.clone(),
            NativeType::Binary | NativeType::GuardedBinary => v.xsd_base64_binary.clone(),
            NativeType::DateTime => v.xsd_date_time.clone(),
            NativeType::Other(_) => v.xsd_any_type.clone(),
        }
    }

    /// Cardinality implied by native flags. Flags other than `Required` and
    /// `MultiValued` do not affect it.
    pub fn cardinality(&self, flags: &[AttributeFlag]) -> (u32, MaxOccurs) {
        let mut min_occurs = 0;
        let mut max_occurs = MaxOccurs::Bounded(1);
        for flag in flags {
            match flag {
                AttributeFlag::Required => min_occurs = 1,
                AttributeFlag::MultiValued => max_occurs = MaxOccurs::Unbounded,
                _ => {}
            }
        }
        (min_occurs, max_occurs)
    }

    /// Canonical definition of a native attribute.
    pub fn attribute_definition(
        &self,
        info: &NativeAttributeInfo,
    ) -> ResourceObjectAttributeDefinition {
        let (min_occurs, max_occurs) = self.cardinality(&info.flags);
        let mut definition = ResourceObjectAttributeDefinition::new(
            self.attribute_name(&info.name),
            self.type_name(&info.value_type),
            &info.name,
        )
        .with_occurs(min_occurs, max_occurs);

        for flag in &info.flags {
            match flag {
                AttributeFlag::NotCreatable => definition.creatable = false,
                AttributeFlag::NotUpdateable => definition.updateable = false,
                AttributeFlag::NotReadable => definition.readable = false,
                AttributeFlag::NotReturnedByDefault => definition.returned_by_default = false,
                _ => {}
            }
        }
        definition
    }

    /// Definition of the identifier attribute every object class carries.
    ///
    /// The uid is assigned by the resource, so it is neither creatable nor
    /// updateable.
    pub fn uid_definition(&self) -> ResourceObjectAttributeDefinition {
        let mut definition = ResourceObjectAttributeDefinition::new(
            self.vocabulary.uid_attribute.clone(),
            self.vocabulary.xsd_string.clone(),
            UID_NAME,
        )
        .with_occurs(1, MaxOccurs::Bounded(1));
        definition.creatable = false;
        definition.updateable = false;
        definition
    }

    /// Canonical copy of a native attribute. Values are copied as-is.
    pub fn to_resource_attribute(&self, attribute: &NativeAttribute) -> ResourceObjectAttribute {
        ResourceObjectAttribute {
            name: self.attribute_name(&attribute.name),
            values: attribute.values.clone(),
        }
    }

    /// Native copy of a canonical attribute.
    pub fn to_native_attribute(
        &self,
        attribute: &ResourceObjectAttribute,
    ) -> ConnectorResult<NativeAttribute> {
        Ok(NativeAttribute::new(
            self.native_attribute_name(&attribute.name)?,
            attribute.values.clone(),
        ))
    }

    /// Canonical snapshot of a native object.
    ///
    /// The uid is materialized from the object identity; a generic `__UID__`
    /// attribute, if the connector also returns one, is not copied twice.
    pub fn to_resource_object(&self, object: &NativeObject) -> ResourceObject {
        let mut resource_object = ResourceObject::new().with_attribute(
            ResourceObjectAttribute::single(
                self.vocabulary.uid_attribute.clone(),
                AttributeValue::String(object.uid.as_str().to_string()),
            ),
        );
        for attribute in object.attributes.iter().filter(|a| a.name != UID_NAME) {
            resource_object.set_attribute(self.to_resource_attribute(attribute));
        }
        resource_object
    }
}
