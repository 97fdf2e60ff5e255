//! # Resource Connector Layer
//!
//! Binds a native identity-resource connector to the canonical provisioning
//! model.
//!
//! A native connector speaks its own vocabulary: object classes such as
//! `__ACCOUNT__`, attributes such as `__NAME__`, and resource-specific
//! value types. This crate translates that vocabulary into canonical,
//! namespace-qualified schema definitions and objects, and exposes the
//! connector's operations in canonical terms.
//!
//! ## Architecture
//!
//! - [`native`] - The contract a native connector implements
//!   ([`NativeConnector`](native::NativeConnector) plus optional capabilities)
//! - [`codec`] - Stateless object class and attribute name codecs
//! - [`translator`] - Native schema to canonical [`Schema`](schema::Schema)
//! - [`instance`] - [`ConnectorInstance`](instance::ConnectorInstance), a
//!   connector bound to one resource, with timeouts and cancellation
//! - [`operations`] - Fetch, search, add, modify, delete
//! - [`sync`] - Live synchronization tokens and change batches
//! - [`probe`] - Connectivity test reported as data
//!
//! ## Example
//!
//! ```ignore
//! use provisio_connector::prelude::*;
//!
//! let vocabulary = Arc::new(CanonicalVocabulary::standard());
//! let config = ResourceConfig::new("Corporate LDAP", "http://example.com/resource/ldap");
//! let instance = ConnectorInstance::new(Arc::new(native), config, vocabulary)?;
//!
//! let schema = instance.fetch_resource_schema().await?;
//! let account = schema.default_account_definition().unwrap();
//!
//! let summary = instance
//!     .search_with_handler(&account.type_name, |object| {
//!         println!("{object:?}");
//!         true
//!     })
//!     .await?;
//!
//! let token = instance.fetch_current_token(&account.type_name).await?;
//! persist(token.serialized());
//! ```
//!
//! ## Errors
//!
//! Every fallible call returns [`ConnectorError`](error::ConnectorError).
//! Communication errors (unreachable, timed out, cancelled) are surfaced
//! immediately; this crate never retries. Add, modify and delete report a
//! missing capability as
//! [`OperationSupport::Unsupported`](operations::OperationSupport) rather
//! than as an error.

pub mod codec;
pub mod config;
pub mod error;
pub mod ids;
pub mod instance;
pub mod native;
pub mod object;
pub mod operations;
pub mod probe;
pub mod qname;
pub mod schema;
pub mod sync;
pub mod translator;
pub mod vocabulary;

/// Prelude module for convenient imports.
///
/// ```
/// use provisio_connector::prelude::*;
/// ```
pub mod prelude {
    // IDs and names
    pub use crate::ids::ResourceOid;
    pub use crate::qname::QualifiedName;

    // Error handling
    pub use crate::error::{ConnectorError, ConnectorResult};

    // Configuration
    pub use crate::config::{ConnectionSettings, ResourceConfig};
    pub use crate::vocabulary::CanonicalVocabulary;

    // Native contract
    pub use crate::native::{
        AttributeFlag, NativeAttribute, NativeAttributeDelta, NativeAttributeInfo,
        NativeConnector, NativeCreateOp, NativeDeleteOp, NativeFilter, NativeObject,
        NativeObjectClass, NativeObjectClassInfo, NativeSchema, NativeSyncDelta,
        NativeSyncDeltaType, NativeSyncOp, NativeSyncToken, NativeType, NativeUid,
        NativeUpdateOp, OperationOptions,
    };

    // Canonical model
    pub use crate::object::{
        AttributeModification, AttributeValue, GuardedString, ModificationKind, Operation,
        ResourceObject, ResourceObjectAttribute,
    };
    pub use crate::schema::{
        MaxOccurs, ResourceObjectAttributeDefinition, ResourceObjectDefinition, Schema,
    };

    // Codecs and translation
    pub use crate::codec::{AttributeCodec, ObjectClassCodec};
    pub use crate::translator::SchemaTranslator;

    // Bound instance
    pub use crate::instance::ConnectorInstance;
    pub use crate::operations::{OperationSupport, ResourceObjectStream, SearchSummary};
    pub use crate::probe::{DiagnosticsMessage, ResourceTestResult, TestResult};
    pub use crate::sync::{Change, ChangeBatch, ChangeType, Token, TokenOrigin};
}

// Re-export async_trait for connector implementors
pub use async_trait::async_trait;

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_prelude_imports() {
        let _oid = ResourceOid::new();
        let _vocabulary = CanonicalVocabulary::standard();
        let _config = ResourceConfig::new("test", "http://example.com/resource/test");
        let _class = NativeObjectClass::account();
        let _filter = NativeFilter::eq("__NAME__", "jack");
        let _support: OperationSupport<()> = OperationSupport::Unsupported;
    }
}
