//! Native connector contract
//!
//! The data model a native connector speaks and the capability traits it
//! implements, in the style of `ConnId`: a mandatory base trait plus optional
//! operations discovered through accessors returning `Option<&dyn ...>`.
//!
//! Native names are plain strings. Structural attributes use the
//! double-underscore convention (`__UID__`, `__NAME__`, `__PASSWORD__`).

use async_trait::async_trait;
use futures_util::stream::BoxStream;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::error::{ConnectorError, ConnectorResult};
use crate::object::AttributeValue;

/// Native name of the unique identifier attribute.
pub const UID_NAME: &str = "__UID__";

/// Native name of the primary login name attribute.
pub const NAME_NAME: &str = "__NAME__";

/// Native name of the password attribute.
pub const PASSWORD_NAME: &str = "__PASSWORD__";

/// A native object class name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NativeObjectClass(String);

impl NativeObjectClass {
    /// Native name of the account object class.
    pub const ACCOUNT: &'static str = "__ACCOUNT__";

    /// Native name of the group object class.
    pub const GROUP: &'static str = "__GROUP__";

    /// Create an object class from its native name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The account object class.
    pub fn account() -> Self {
        Self::new(Self::ACCOUNT)
    }

    /// The group object class.
    pub fn group() -> Self {
        Self::new(Self::GROUP)
    }

    /// The native name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check if this is the account object class.
    pub fn is_account(&self) -> bool {
        self.0 == Self::ACCOUNT
    }

    /// Check if this is the group object class.
    pub fn is_group(&self) -> bool {
        self.0 == Self::GROUP
    }
}

impl fmt::Display for NativeObjectClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NativeObjectClass {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Value type of a native attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NativeType {
    String,
    Character,
    Integer,
    Long,
    Float,
    Double,
    BigInteger,
    BigDecimal,
    Boolean,
    Binary,
    DateTime,
    /// Security-sensitive string (passwords).
    GuardedString,
    /// Security-sensitive binary data.
    GuardedBinary,
    /// A type this layer has no specific mapping for.
    Other(String),
}

/// Flag attached to a native attribute.
///
/// Serialized as its native string. Flags this layer does not know are
/// kept as [`AttributeFlag::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AttributeFlag {
    Required,
    MultiValued,
    NotCreatable,
    NotUpdateable,
    NotReadable,
    NotReturnedByDefault,
    /// A flag this layer does not interpret.
    Other(String),
}

impl fmt::Display for AttributeFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeFlag::Required => f.write_str("REQUIRED"),
            AttributeFlag::MultiValued => f.write_str("MULTIVALUED"),
            AttributeFlag::NotCreatable => f.write_str("NOT_CREATABLE"),
            AttributeFlag::NotUpdateable => f.write_str("NOT_UPDATEABLE"),
            AttributeFlag::NotReadable => f.write_str("NOT_READABLE"),
            AttributeFlag::NotReturnedByDefault => f.write_str("NOT_RETURNED_BY_DEFAULT"),
            AttributeFlag::Other(s) => f.write_str(s),
        }
    }
}

impl FromStr for AttributeFlag {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "REQUIRED" => AttributeFlag::Required,
            "MULTIVALUED" | "MULTI_VALUED" => AttributeFlag::MultiValued,
            "NOT_CREATABLE" => AttributeFlag::NotCreatable,
            "NOT_UPDATEABLE" => AttributeFlag::NotUpdateable,
            "NOT_READABLE" => AttributeFlag::NotReadable,
            "NOT_RETURNED_BY_DEFAULT" => AttributeFlag::NotReturnedByDefault,
            other => AttributeFlag::Other(other.to_string()),
        })
    }
}

impl From<String> for AttributeFlag {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(flag) => flag,
            Err(never) => match never {},
        }
    }
}

impl From<AttributeFlag> for String {
    fn from(flag: AttributeFlag) -> Self {
        flag.to_string()
    }
}

/// Native description of one attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeAttributeInfo {
    pub name: String,
    pub value_type: NativeType,
    #[serde(default)]
    pub flags: Vec<AttributeFlag>,
}

impl NativeAttributeInfo {
    /// Create an attribute description without flags.
    pub fn new(name: impl Into<String>, value_type: NativeType) -> Self {
        Self {
            name: name.into(),
            value_type,
            flags: Vec::new(),
        }
    }

    /// Add a flag.
    #[must_use]
    pub fn with_flag(mut self, flag: AttributeFlag) -> Self {
        self.flags.push(flag);
        self
    }

    /// Mark as required.
    #[must_use]
    pub fn required(self) -> Self {
        self.with_flag(AttributeFlag::Required)
    }

    /// Mark as multi-valued.
    #[must_use]
    pub fn multi_valued(self) -> Self {
        self.with_flag(AttributeFlag::MultiValued)
    }

    /// Check if a flag is present.
    pub fn has_flag(&self, flag: &AttributeFlag) -> bool {
        self.flags.contains(flag)
    }
}

/// Native description of one object class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeObjectClassInfo {
    pub object_class: NativeObjectClass,
    /// Attributes in the connector's iteration order.
    #[serde(default)]
    pub attributes: Vec<NativeAttributeInfo>,
    /// Whether instances may contain other objects.
    #[serde(default)]
    pub container: bool,
}

impl NativeObjectClassInfo {
    /// Create an object class description without attributes.
    pub fn new(object_class: impl Into<NativeObjectClass>) -> Self {
        Self {
            object_class: object_class.into(),
            attributes: Vec::new(),
            container: false,
        }
    }

    /// Add an attribute description.
    #[must_use]
    pub fn with_attribute(mut self, attribute: NativeAttributeInfo) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Mark as a container class.
    #[must_use]
    pub fn as_container(mut self) -> Self {
        self.container = true;
        self
    }

    /// Find an attribute description by native name.
    pub fn find_attribute(&self, name: &str) -> Option<&NativeAttributeInfo> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

/// The full native schema as reported by a connector.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NativeSchema {
    pub object_classes: Vec<NativeObjectClassInfo>,
}

impl NativeSchema {
    /// Create an empty native schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object class description.
    #[must_use]
    pub fn with_object_class(mut self, info: NativeObjectClassInfo) -> Self {
        self.object_classes.push(info);
        self
    }

    /// Find an object class description.
    pub fn find(&self, object_class: &NativeObjectClass) -> Option<&NativeObjectClassInfo> {
        self.object_classes
            .iter()
            .find(|oc| &oc.object_class == object_class)
    }
}

/// Unique identifier of an object in the native resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NativeUid(String);

impl NativeUid {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NativeUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A native attribute with its values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeAttribute {
    pub name: String,
    #[serde(default)]
    pub values: Vec<AttributeValue>,
}

impl NativeAttribute {
    /// Create an attribute from a list of values.
    pub fn new(name: impl Into<String>, values: Vec<AttributeValue>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Create an attribute holding a single value.
    pub fn single(name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        Self::new(name, vec![value.into()])
    }
}

/// An object as returned by a native connector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeObject {
    pub object_class: NativeObjectClass,
    pub uid: NativeUid,
    #[serde(default)]
    pub attributes: Vec<NativeAttribute>,
}

impl NativeObject {
    /// Create an object without attributes.
    pub fn new(object_class: NativeObjectClass, uid: NativeUid) -> Self {
        Self {
            object_class,
            uid,
            attributes: Vec::new(),
        }
    }

    /// Add an attribute using builder pattern.
    #[must_use]
    pub fn with_attribute(mut self, attribute: NativeAttribute) -> Self {
        self.set_attribute(attribute);
        self
    }

    /// Set an attribute, replacing any attribute with the same name.
    pub fn set_attribute(&mut self, attribute: NativeAttribute) {
        match self.attributes.iter_mut().find(|a| a.name == attribute.name) {
            Some(existing) => *existing = attribute,
            None => self.attributes.push(attribute),
        }
    }

    /// Find an attribute by native name.
    pub fn attribute(&self, name: &str) -> Option<&NativeAttribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Values of an attribute. `__UID__` resolves to the object uid.
    pub fn values_of(&self, name: &str) -> Vec<AttributeValue> {
        if name == UID_NAME {
            return vec![AttributeValue::String(self.uid.as_str().to_string())];
        }
        self.attribute(name)
            .map(|a| a.values.clone())
            .unwrap_or_default()
    }
}

/// Attribute changes for a native update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NativeAttributeDelta {
    /// Values to add.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub add: Vec<NativeAttribute>,

    /// Values to remove.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub remove: Vec<NativeAttribute>,

    /// Attributes whose values are replaced entirely. An empty value list
    /// clears the attribute.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub replace: Vec<NativeAttribute>,
}

impl NativeAttributeDelta {
    /// Create an empty delta.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the delta changes nothing.
    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty() && self.replace.is_empty()
    }

    /// Names of all attributes touched by the delta.
    pub fn affected_attributes(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for attr in self.add.iter().chain(&self.remove).chain(&self.replace) {
            if !names.contains(&attr.name.as_str()) {
                names.push(&attr.name);
            }
        }
        names
    }
}

/// A connector's own serialized synchronization token.
///
/// Opaque outside the connector that issued it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NativeSyncToken(String);

impl NativeSyncToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NativeSyncToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kind of a native change record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NativeSyncDeltaType {
    CreateOrUpdate,
    Delete,
    Create,
    Update,
}

/// One native change record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeSyncDelta {
    /// Token positioned just after this change.
    pub token: NativeSyncToken,
    pub delta_type: NativeSyncDeltaType,
    pub uid: NativeUid,
    pub object_class: NativeObjectClass,
    /// State of the object after the change. Absent for deletions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<NativeObject>,
}

/// Options passed to native read and create calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationOptions {
    /// Native attribute names to return. `None` means the connector default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes_to_get: Option<Vec<String>>,

    /// Page size hint for searches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

impl OperationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_attributes_to_get(mut self, names: Vec<String>) -> Self {
        self.attributes_to_get = Some(names);
        self
    }

    #[must_use]
    pub fn with_page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size);
        self
    }
}

/// A native search filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum NativeFilter {
    /// Attribute has a value equal to `value`.
    Equals {
        attribute: String,
        value: AttributeValue,
    },
    And { filters: Vec<NativeFilter> },
    Or { filters: Vec<NativeFilter> },
    Not { filter: Box<NativeFilter> },
}

impl NativeFilter {
    /// Equality filter.
    pub fn eq(attribute: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        NativeFilter::Equals {
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    /// Filter matching one uid.
    pub fn uid(uid: &NativeUid) -> Self {
        Self::eq(UID_NAME, uid.as_str())
    }

    /// Evaluate the filter against an object held in memory.
    pub fn matches(&self, object: &NativeObject) -> bool {
        match self {
            NativeFilter::Equals { attribute, value } => {
                object.values_of(attribute).iter().any(|v| v == value)
            }
            NativeFilter::And { filters } => filters.iter().all(|f| f.matches(object)),
            NativeFilter::Or { filters } => filters.iter().any(|f| f.matches(object)),
            NativeFilter::Not { filter } => !filter.matches(object),
        }
    }
}

/// Base contract every native connector implements.
#[async_trait]
pub trait NativeConnector: Send + Sync {
    /// Display name of this connector instance.
    fn display_name(&self) -> &str;

    /// Report the native schema.
    async fn schema(&self) -> ConnectorResult<NativeSchema>;

    /// Fetch one object by uid. Absence is `Ok(None)`, not an error.
    async fn get_object(
        &self,
        object_class: &NativeObjectClass,
        uid: &NativeUid,
        options: &OperationOptions,
    ) -> ConnectorResult<Option<NativeObject>>;

    /// Open a search over one object class.
    ///
    /// The returned stream yields objects lazily; dropping it stops the
    /// search.
    async fn search(
        &self,
        object_class: &NativeObjectClass,
        filter: Option<NativeFilter>,
        options: &OperationOptions,
    ) -> ConnectorResult<BoxStream<'static, ConnectorResult<NativeObject>>>;

    /// Check connectivity to the resource.
    async fn test(&self) -> ConnectorResult<()>;

    /// Create capability, if supported.
    fn create_op(&self) -> Option<&dyn NativeCreateOp> {
        None
    }

    /// Update capability, if supported.
    fn update_op(&self) -> Option<&dyn NativeUpdateOp> {
        None
    }

    /// Delete capability, if supported.
    fn delete_op(&self) -> Option<&dyn NativeDeleteOp> {
        None
    }

    /// Live synchronization capability, if supported.
    fn sync_op(&self) -> Option<&dyn NativeSyncOp> {
        None
    }
}

/// Capability for creating objects.
#[async_trait]
pub trait NativeCreateOp: Send + Sync {
    /// Create an object and return its uid.
    async fn create(
        &self,
        object_class: &NativeObjectClass,
        attributes: Vec<NativeAttribute>,
        options: &OperationOptions,
    ) -> ConnectorResult<NativeUid>;
}

/// Capability for updating objects.
#[async_trait]
pub trait NativeUpdateOp: Send + Sync {
    /// Apply attribute changes. Returns the uid, which may change.
    async fn update(
        &self,
        object_class: &NativeObjectClass,
        uid: &NativeUid,
        changes: NativeAttributeDelta,
    ) -> ConnectorResult<NativeUid>;
}

/// Capability for deleting objects.
#[async_trait]
pub trait NativeDeleteOp: Send + Sync {
    async fn delete(&self, object_class: &NativeObjectClass, uid: &NativeUid)
        -> ConnectorResult<()>;
}

/// Capability for live synchronization.
#[async_trait]
pub trait NativeSyncOp: Send + Sync {
    /// Token positioned at the current end of the change log.
    async fn latest_token(&self, object_class: &NativeObjectClass)
        -> ConnectorResult<NativeSyncToken>;

    /// Changes strictly after `token`, oldest first.
    async fn sync(
        &self,
        object_class: &NativeObjectClass,
        token: &NativeSyncToken,
    ) -> ConnectorResult<Vec<NativeSyncDelta>>;

    /// Rebuild a token from its serialized form without contacting the
    /// resource.
    fn parse_token(&self, serialized: &str) -> ConnectorResult<NativeSyncToken> {
        if serialized.is_empty() {
            return Err(ConnectorError::invalid_token("token is empty"));
        }
        Ok(NativeSyncToken::new(serialized))
    }
}
