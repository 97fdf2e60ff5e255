//! Schema translation
//!
//! Builds the canonical schema from the native one. Translation itself is
//! pure; [`ConnectorInstance::fetch_resource_schema`] adds the native call.

use std::collections::HashSet;
use tracing::{debug, info, instrument, warn};

use crate::codec::{AttributeCodec, ObjectClassCodec};
use crate::error::{ConnectorError, ConnectorResult};
use crate::instance::ConnectorInstance;
use crate::native::{NativeSchema, UID_NAME};
use crate::qname::QualifiedName;
use crate::schema::{ResourceObjectDefinition, Schema};

/// Translates a native schema into a canonical one.
#[derive(Debug, Clone)]
pub struct SchemaTranslator {
    object_class_codec: ObjectClassCodec,
    attribute_codec: AttributeCodec,
}

impl SchemaTranslator {
    pub fn new(object_class_codec: ObjectClassCodec, attribute_codec: AttributeCodec) -> Self {
        Self {
            object_class_codec,
            attribute_codec,
        }
    }

    /// Translate every native object class, in native order.
    ///
    /// Classes whose names cannot be encoded are skipped, as are repeated
    /// classes and repeated attributes within a class (the first one wins).
    /// Each definition gets the synthesized uid identifier first, followed
    /// by the native attributes.
    pub fn translate(&self, native: &NativeSchema) -> ConnectorResult<Schema> {
        let mut schema = Schema::new(self.object_class_codec.namespace());
        let mut seen: HashSet<QualifiedName> = HashSet::new();

        for class_info in &native.object_classes {
            let type_name = match self.object_class_codec.encode(&class_info.object_class) {
                Ok(name) => name,
                Err(e) => {
                    warn!(
                        object_class = %class_info.object_class,
                        error = %e,
                        "Skipping object class that cannot be represented canonically"
                    );
                    continue;
                }
            };
            if !seen.insert(type_name.clone()) {
                warn!(
                    object_class = %class_info.object_class,
                    "Skipping duplicate object class in native schema"
                );
                continue;
            }

            let mut definition = ResourceObjectDefinition::new(
                type_name,
                self.object_class_codec
                    .element_name(&class_info.object_class),
                class_info.object_class.clone(),
            );
            definition.add_identifier(self.attribute_codec.uid_definition());

            for attribute in &class_info.attributes {
                if attribute.name == UID_NAME {
                    continue;
                }
                let translated = self.attribute_codec.attribute_definition(attribute);
                if definition.find_attribute(&translated.name).is_some() {
                    warn!(
                        object_class = %class_info.object_class,
                        attribute = %attribute.name,
                        "Skipping duplicate attribute in native object class"
                    );
                    continue;
                }
                definition.add_attribute(translated);
            }

            if class_info.object_class.is_account() {
                definition.account_type = true;
                definition.default_account_type = true;
            }

            debug!(
                object_class = %definition.type_name,
                attributes = definition.attributes.len(),
                "Translated object class"
            );
            schema.add_definition(definition);
        }

        schema.validate()?;
        Ok(schema)
    }
}

impl ConnectorInstance {
    /// Discover the native schema and translate it.
    ///
    /// No caching is done; callers keep the returned schema and share it.
    ///
    /// # Errors
    ///
    /// Communication errors from the native call are returned as-is. Any
    /// other native failure becomes `SchemaDiscoveryFailed`.
    #[instrument(skip(self), fields(resource = %self.config().describe()))]
    pub async fn fetch_resource_schema(&self) -> ConnectorResult<Schema> {
        let native = self
            .call(
                "fetch_resource_schema",
                self.config().settings.operation_timeout(),
                self.native().schema(),
            )
            .await
            .map_err(|e| {
                if e.is_communication() {
                    e
                } else {
                    ConnectorError::SchemaDiscoveryFailed {
                        message: format!("{} returned an unusable schema", self.display_name()),
                        source: Some(Box::new(e)),
                    }
                }
            })?;

        let schema = self.schema_translator().translate(&native)?;
        info!(
            object_classes = schema.definitions.len(),
            "Resource schema discovered"
        );
        Ok(schema)
    }

    /// Translator bound to this instance's codecs.
    pub fn schema_translator(&self) -> SchemaTranslator {
        SchemaTranslator::new(
            self.object_class_codec().clone(),
            self.attribute_codec().clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::{
        AttributeFlag, NativeAttributeInfo, NativeObjectClass, NativeObjectClassInfo, NativeType,
        NAME_NAME, PASSWORD_NAME,
    };
    use crate::schema::MaxOccurs;
    use crate::vocabulary::CanonicalVocabulary;
    use std::sync::Arc;

    const NS: &str = "http://example.com/resource/hr";

    fn translator() -> SchemaTranslator {
        SchemaTranslator::new(
            ObjectClassCodec::new(NS),
            AttributeCodec::new(NS, Arc::new(CanonicalVocabulary::standard())),
        )
    }

    #[test]
    fn test_user_with_required_name() {
        let native = NativeSchema::new().with_object_class(
            NativeObjectClassInfo::new("User")
                .with_attribute(NativeAttributeInfo::new(NAME_NAME, NativeType::String).required()),
        );

        let schema = translator().translate(&native).unwrap();
        let vocabulary = CanonicalVocabulary::standard();

        assert_eq!(schema.definitions.len(), 1);
        let user = &schema.definitions[0];
        assert_eq!(user.type_name.local_part(), "CustomUserObjectClass");
        assert_eq!(user.identifiers, vec![vocabulary.uid_attribute.clone()]);

        let uid = user.find_attribute(&vocabulary.uid_attribute).unwrap();
        assert_eq!(uid.type_name, vocabulary.xsd_string);
        assert_eq!((uid.min_occurs, uid.max_occurs), (1, MaxOccurs::Bounded(1)));

        let name = user.find_attribute(&vocabulary.name_attribute).unwrap();
        assert_eq!((name.min_occurs, name.max_occurs), (1, MaxOccurs::Bounded(1)));
        assert_eq!(user.attributes.len(), 2);
        assert!(!user.account_type);
    }

    #[test]
    fn test_account_is_default_account_type() {
        let native = NativeSchema::new()
            .with_object_class(
                NativeObjectClassInfo::new(NativeObjectClass::ACCOUNT)
                    .with_attribute(NativeAttributeInfo::new(NAME_NAME, NativeType::String))
                    .with_attribute(NativeAttributeInfo::new(
                        PASSWORD_NAME,
                        NativeType::GuardedString,
                    )),
            )
            .with_object_class(NativeObjectClassInfo::new(NativeObjectClass::GROUP));

        let schema = translator().translate(&native).unwrap();
        let account = schema.default_account_definition().unwrap();
        assert_eq!(account.type_name.local_part(), "AccountObjectClass");
        assert!(account.account_type);
        assert_eq!(schema.account_definitions().len(), 1);

        let password = account
            .find_attribute(&CanonicalVocabulary::standard().password_attribute)
            .unwrap();
        assert_eq!(
            password.type_name,
            CanonicalVocabulary::standard().protected_string_type
        );

        let group = &schema.definitions[1];
        assert_eq!(group.type_name.local_part(), "GroupObjectClass");
        assert_eq!(group.identifiers.len(), 1);
    }

    #[test]
    fn test_declared_uid_is_not_duplicated() {
        let native = NativeSchema::new().with_object_class(
            NativeObjectClassInfo::new("printer")
                .with_attribute(
                    NativeAttributeInfo::new(UID_NAME, NativeType::Long)
                        .with_flag(AttributeFlag::MultiValued),
                )
                .with_attribute(NativeAttributeInfo::new("location", NativeType::String)),
        );

        let schema = translator().translate(&native).unwrap();
        let printer = &schema.definitions[0];
        let uid_name = &CanonicalVocabulary::standard().uid_attribute;

        assert_eq!(
            printer.attributes.iter().filter(|a| &a.name == uid_name).count(),
            1
        );
        let uid = printer.find_attribute(uid_name).unwrap();
        assert_eq!(uid.max_occurs, MaxOccurs::Bounded(1));
    }

    #[test]
    fn test_duplicate_attribute_first_wins() {
        let native = NativeSchema::new().with_object_class(
            NativeObjectClassInfo::new("printer")
                .with_attribute(NativeAttributeInfo::new("location", NativeType::String))
                .with_attribute(NativeAttributeInfo::new("tray", NativeType::Integer))
                .with_attribute(
                    NativeAttributeInfo::new("location", NativeType::Integer).multi_valued(),
                ),
        );

        let schema = translator().translate(&native).unwrap();
        let printer = &schema.definitions[0];
        let natives: Vec<&str> = printer
            .attributes
            .iter()
            .map(|a| a.native_name.as_str())
            .collect();
        assert_eq!(natives, vec![UID_NAME, "location", "tray"]);

        let location = printer
            .attributes
            .iter()
            .find(|a| a.native_name == "location")
            .unwrap();
        assert_eq!(location.type_name, CanonicalVocabulary::standard().xsd_string);
        assert_eq!(location.max_occurs, MaxOccurs::Bounded(1));
    }

    #[test]
    fn test_ambiguous_class_is_skipped() {
        let native = NativeSchema::new()
            .with_object_class(NativeObjectClassInfo::new("CustomthingObjectClass"))
            .with_object_class(NativeObjectClassInfo::new("thing"));

        let schema = translator().translate(&native).unwrap();
        assert_eq!(schema.definitions.len(), 1);
        assert_eq!(schema.definitions[0].native_object_class.as_str(), "thing");
    }

    #[test]
    fn test_order_follows_native_schema() {
        let native = NativeSchema::new()
            .with_object_class(
                NativeObjectClassInfo::new("b")
                    .with_attribute(NativeAttributeInfo::new("z", NativeType::String))
                    .with_attribute(NativeAttributeInfo::new("a", NativeType::String)),
            )
            .with_object_class(NativeObjectClassInfo::new("a"));

        let schema = translator().translate(&native).unwrap();
        let names: Vec<&str> = schema
            .object_class_names()
            .iter()
            .map(|n| n.local_part())
            .collect();
        assert_eq!(names, vec!["CustombObjectClass", "CustomaObjectClass"]);

        let attrs: Vec<&str> = schema.definitions[0]
            .attributes
            .iter()
            .map(|a| a.native_name.as_str())
            .collect();
        assert_eq!(attrs, vec![UID_NAME, "z", "a"]);
    }
}
