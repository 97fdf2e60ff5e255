//! Object operations
//!
//! Fetch, search, and the capability-conditional add/modify/delete
//! operations, expressed in canonical terms and delegated to the native
//! connector.

use std::time::Duration;

use futures_util::stream::{self, BoxStream, StreamExt};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use crate::codec::AttributeCodec;
use crate::error::{ConnectorError, ConnectorResult};
use crate::instance::ConnectorInstance;
use crate::native::{
    NativeAttribute, NativeAttributeDelta, NativeObject, NativeUid, OperationOptions,
    PASSWORD_NAME,
};
use crate::object::{
    AttributeValue, ModificationKind, Operation, ResourceObject, ResourceObjectAttribute,
};
use crate::qname::QualifiedName;

/// Outcome of a capability-conditional operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "result", rename_all = "snake_case")]
pub enum OperationSupport<T> {
    /// The connector performed the operation.
    Supported(T),
    /// The connector does not provide this operation. Permanent.
    Unsupported,
}

impl<T> OperationSupport<T> {
    pub fn is_supported(&self) -> bool {
        matches!(self, OperationSupport::Supported(_))
    }

    /// The result, if the operation was supported.
    pub fn supported(self) -> Option<T> {
        match self {
            OperationSupport::Supported(value) => Some(value),
            OperationSupport::Unsupported => None,
        }
    }

    /// Map the supported result.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> OperationSupport<U> {
        match self {
            OperationSupport::Supported(value) => OperationSupport::Supported(f(value)),
            OperationSupport::Unsupported => OperationSupport::Unsupported,
        }
    }

    /// Convert into a result, turning `Unsupported` into an error.
    pub fn into_result(self, operation: &str) -> ConnectorResult<T> {
        self.supported()
            .ok_or_else(|| ConnectorError::unsupported(operation))
    }
}

/// Summary of a handler-driven search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSummary {
    /// Number of objects passed to the handler.
    pub handled: usize,
    /// Whether the handler asked to stop before the search was exhausted.
    pub stopped_early: bool,
}

/// Stream of canonical objects produced by a search.
pub type ResourceObjectStream = BoxStream<'static, ConnectorResult<ResourceObject>>;

/// Native search stream guarded by the binding's timeout and cancellation.
struct SearchCursor {
    native: BoxStream<'static, ConnectorResult<NativeObject>>,
    codec: AttributeCodec,
    cancellation: CancellationToken,
    timeout: Duration,
}

impl SearchCursor {
    /// Pull the next object. A `None` cursor in the result ends the stream
    /// after the yielded error.
    async fn pull(mut self) -> Option<(ConnectorResult<ResourceObject>, Option<Self>)> {
        let next = tokio::select! {
            biased;
            () = self.cancellation.cancelled() => {
                debug!("Search cancelled");
                Err(ConnectorError::Cancelled {
                    operation: "search".to_string(),
                })
            }
            next = tokio::time::timeout(self.timeout, self.native.next()) => {
                next.map_err(|_| ConnectorError::ConnectionTimeout {
                    operation: "search".to_string(),
                    timeout_secs: self.timeout.as_secs(),
                })
            }
        };

        match next {
            Ok(Some(item)) => {
                let item = item.map(|native| self.codec.to_resource_object(&native));
                Some((item, Some(self)))
            }
            Ok(None) => None,
            Err(err) => Some((Err(err), None)),
        }
    }
}

impl ConnectorInstance {
    /// Fetch one object by its identifiers.
    ///
    /// The identifiers must include the uid attribute with exactly one
    /// string value. A missing object is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a foreign or unrecognized object class or a
    /// missing uid; communication errors from the native call.
    #[instrument(skip_all, fields(object_class = %object_class))]
    pub async fn fetch_object(
        &self,
        object_class: &QualifiedName,
        identifiers: &[ResourceObjectAttribute],
    ) -> ConnectorResult<Option<ResourceObject>> {
        let native_class = self.object_class_codec().decode(object_class)?;
        let uid = self.uid_from_identifiers(identifiers)?;

        let found = self
            .call(
                "fetch_object",
                self.config().settings.operation_timeout(),
                self.native()
                    .get_object(&native_class, &uid, &OperationOptions::default()),
            )
            .await?;

        match found {
            Some(native) => {
                debug!(uid = %uid, "Object fetched");
                Ok(Some(self.attribute_codec().to_resource_object(&native)))
            }
            None => {
                debug!(uid = %uid, "Object not found");
                Ok(None)
            }
        }
    }

    /// Open a lazy search over all objects of a class.
    ///
    /// Objects are translated as they are pulled; dropping the stream stops
    /// the native search. Each pull is subject to the operation timeout and
    /// to cancellation: once the binding is cancelled the stream yields one
    /// `Cancelled` error and ends, and a pull that times out yields
    /// `ConnectionTimeout` and ends.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a bad object class; communication errors from
    /// opening the native search.
    #[instrument(skip_all, fields(object_class = %object_class))]
    pub async fn search(
        &self,
        object_class: &QualifiedName,
    ) -> ConnectorResult<ResourceObjectStream> {
        let native_class = self.object_class_codec().decode(object_class)?;
        let options =
            OperationOptions::new().with_page_size(self.config().settings.search_page_size);

        let native_stream = self
            .call(
                "search",
                self.config().settings.operation_timeout(),
                self.native().search(&native_class, None, &options),
            )
            .await?;

        let cursor = SearchCursor {
            native: native_stream,
            codec: self.attribute_codec().clone(),
            cancellation: self.cancellation_token(),
            timeout: self.config().settings.operation_timeout(),
        };
        Ok(stream::unfold(Some(cursor), |cursor| async move { cursor?.pull().await }).boxed())
    }

    /// Search and feed each object to `handler` until it returns `false`.
    pub async fn search_with_handler<F>(
        &self,
        object_class: &QualifiedName,
        mut handler: F,
    ) -> ConnectorResult<SearchSummary>
    where
        F: FnMut(ResourceObject) -> bool,
    {
        let mut stream = self.search(object_class).await?;
        let mut summary = SearchSummary::default();

        while let Some(item) = stream.next().await {
            summary.handled += 1;
            if !handler(item?) {
                summary.stopped_early = true;
                break;
            }
        }

        debug!(
            object_class = %object_class,
            handled = summary.handled,
            stopped_early = summary.stopped_early,
            "Search finished"
        );
        Ok(summary)
    }

    /// Create an object.
    ///
    /// `additional` operations are merged into the creation attributes:
    /// `Add`/`Replace` modifications contribute values and `SetPassword`
    /// sets the password. Returns the identifiers of the new object.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a bad object class, attribute names outside the
    /// resource namespace, or a `Delete` modification.
    #[instrument(skip_all, fields(object_class = %object_class))]
    pub async fn add_object(
        &self,
        object_class: &QualifiedName,
        object: &ResourceObject,
        additional: &[Operation],
    ) -> ConnectorResult<OperationSupport<Vec<ResourceObjectAttribute>>> {
        let native_class = self.object_class_codec().decode(object_class)?;
        let Some(create_op) = self.native().create_op() else {
            debug!("Connector does not support create");
            return Ok(OperationSupport::Unsupported);
        };

        let uid_attribute = &self.vocabulary().uid_attribute;
        let mut attributes: Vec<NativeAttribute> = Vec::new();
        for attribute in object.attributes() {
            if attribute.name == *uid_attribute {
                continue;
            }
            merge_attribute(
                &mut attributes,
                self.attribute_codec().to_native_attribute(attribute)?,
                ModificationKind::Replace,
            );
        }
        for operation in additional {
            let (kind, native) = self.native_operation(operation)?;
            if kind == ModificationKind::Delete {
                return Err(ConnectorError::invalid_argument(
                    "delete modifications cannot be applied to a new object",
                ));
            }
            merge_attribute(&mut attributes, native, kind);
        }

        let uid = self
            .call(
                "add_object",
                self.config().settings.operation_timeout(),
                create_op.create(&native_class, attributes, &OperationOptions::default()),
            )
            .await?;

        info!(uid = %uid, "Object created");
        Ok(OperationSupport::Supported(vec![self.uid_attribute(&uid)]))
    }

    /// Modify an object.
    ///
    /// Returns the identifiers after the change; the uid may differ from the
    /// one passed in.
    #[instrument(skip_all, fields(object_class = %object_class))]
    pub async fn modify_object(
        &self,
        object_class: &QualifiedName,
        identifiers: &[ResourceObjectAttribute],
        changes: &[Operation],
    ) -> ConnectorResult<OperationSupport<Vec<ResourceObjectAttribute>>> {
        let native_class = self.object_class_codec().decode(object_class)?;
        let Some(update_op) = self.native().update_op() else {
            debug!("Connector does not support update");
            return Ok(OperationSupport::Unsupported);
        };
        let uid = self.uid_from_identifiers(identifiers)?;

        let mut delta = NativeAttributeDelta::new();
        for operation in changes {
            let (kind, native) = self.native_operation(operation)?;
            match kind {
                ModificationKind::Add => delta.add.push(native),
                ModificationKind::Delete => delta.remove.push(native),
                ModificationKind::Replace => delta.replace.push(native),
            }
        }

        let new_uid = self
            .call(
                "modify_object",
                self.config().settings.operation_timeout(),
                update_op.update(&native_class, &uid, delta),
            )
            .await?;

        info!(uid = %uid, new_uid = %new_uid, "Object modified");
        Ok(OperationSupport::Supported(vec![self.uid_attribute(&new_uid)]))
    }

    /// Delete an object.
    #[instrument(skip_all, fields(object_class = %object_class))]
    pub async fn delete_object(
        &self,
        object_class: &QualifiedName,
        identifiers: &[ResourceObjectAttribute],
    ) -> ConnectorResult<OperationSupport<()>> {
        let native_class = self.object_class_codec().decode(object_class)?;
        let Some(delete_op) = self.native().delete_op() else {
            debug!("Connector does not support delete");
            return Ok(OperationSupport::Unsupported);
        };
        let uid = self.uid_from_identifiers(identifiers)?;

        self.call(
            "delete_object",
            self.config().settings.operation_timeout(),
            delete_op.delete(&native_class, &uid),
        )
        .await?;

        info!(uid = %uid, "Object deleted");
        Ok(OperationSupport::Supported(()))
    }

    /// Extract the native uid from an identifier set.
    pub(crate) fn uid_from_identifiers(
        &self,
        identifiers: &[ResourceObjectAttribute],
    ) -> ConnectorResult<NativeUid> {
        let uid_attribute = &self.vocabulary().uid_attribute;
        let attribute = identifiers
            .iter()
            .find(|a| a.name == *uid_attribute)
            .ok_or_else(|| {
                ConnectorError::invalid_argument(format!(
                    "required attribute {} not found in identifiers of resource {}",
                    uid_attribute,
                    self.config().describe()
                ))
            })?;
        let value = attribute.string_value().ok_or_else(|| {
            ConnectorError::invalid_argument(format!(
                "attribute {uid_attribute} must hold exactly one string value"
            ))
        })?;
        Ok(NativeUid::new(value))
    }

    /// Canonical uid attribute for a native uid.
    pub(crate) fn uid_attribute(&self, uid: &NativeUid) -> ResourceObjectAttribute {
        ResourceObjectAttribute::single(
            self.vocabulary().uid_attribute.clone(),
            AttributeValue::String(uid.as_str().to_string()),
        )
    }

    fn native_operation(
        &self,
        operation: &Operation,
    ) -> ConnectorResult<(ModificationKind, NativeAttribute)> {
        match operation {
            Operation::Modify(modification) => Ok((
                modification.kind,
                self.attribute_codec()
                    .to_native_attribute(&modification.attribute)?,
            )),
            Operation::SetPassword { password } => Ok((
                ModificationKind::Replace,
                NativeAttribute::single(PASSWORD_NAME, password.clone()),
            )),
        }
    }
}

fn merge_attribute(
    attributes: &mut Vec<NativeAttribute>,
    attribute: NativeAttribute,
    kind: ModificationKind,
) {
    match attributes.iter_mut().find(|a| a.name == attribute.name) {
        Some(existing) if kind == ModificationKind::Add => {
            existing.values.extend(attribute.values);
        }
        Some(existing) => *existing = attribute,
        None => attributes.push(attribute),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::NativeObjectClass;
    use crate::vocabulary::CanonicalVocabulary;
    use std::sync::Arc;

    fn cursor(native: BoxStream<'static, ConnectorResult<NativeObject>>) -> SearchCursor {
        SearchCursor {
            native,
            codec: AttributeCodec::new(
                "http://example.com/resource/sandbox",
                Arc::new(CanonicalVocabulary::standard()),
            ),
            cancellation: CancellationToken::new(),
            timeout: Duration::from_secs(5),
        }
    }

    fn jack() -> NativeObject {
        NativeObject::new(NativeObjectClass::account(), NativeUid::new("1"))
            .with_attribute(NativeAttribute::single("__NAME__", "jack"))
    }

    #[tokio::test]
    async fn test_search_cursor_translates_objects() {
        let objects = stream::iter(vec![Ok::<_, ConnectorError>(jack())]).boxed();
        let (item, rest) = cursor(objects)
            .pull()
            .await
            .unwrap();
        let object = item.unwrap();
        assert!(object.has_attribute(&CanonicalVocabulary::standard().name_attribute));
        assert!(rest.unwrap().pull().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_cursor_times_out_stalled_pull() {
        let stalled = stream::pending::<ConnectorResult<NativeObject>>().boxed();
        let (item, rest) = cursor(stalled).pull().await.unwrap();
        assert!(matches!(
            item.unwrap_err(),
            ConnectorError::ConnectionTimeout {
                timeout_secs: 5,
                ..
            }
        ));
        assert!(rest.is_none());
    }

    #[tokio::test]
    async fn test_search_cursor_stops_when_cancelled() {
        let guarded = cursor(stream::iter(vec![Ok::<_, ConnectorError>(jack())]).boxed());
        guarded.cancellation.cancel();

        let (item, rest) = guarded.pull().await.unwrap();
        assert_eq!(item.unwrap_err().error_code(), "CANCELLED");
        assert!(rest.is_none());
    }

    #[test]
    fn test_operation_support() {
        let supported = OperationSupport::Supported(3);
        assert!(supported.is_supported());
        assert_eq!(supported.clone().supported(), Some(3));
        assert_eq!(supported.clone().map(|n| n * 2), OperationSupport::Supported(6));
        assert_eq!(supported.into_result("add_object").unwrap(), 3);

        let unsupported: OperationSupport<i32> = OperationSupport::Unsupported;
        assert!(!unsupported.is_supported());
        let err = unsupported.into_result("add_object").unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_OPERATION");
        assert!(err.is_permanent());
    }

    #[test]
    fn test_merge_attribute() {
        let mut attributes = vec![NativeAttribute::single("mail", "a@example.com")];

        merge_attribute(
            &mut attributes,
            NativeAttribute::single("mail", "b@example.com"),
            ModificationKind::Add,
        );
        assert_eq!(attributes[0].values.len(), 2);

        merge_attribute(
            &mut attributes,
            NativeAttribute::single("mail", "c@example.com"),
            ModificationKind::Replace,
        );
        assert_eq!(attributes[0].values, vec![AttributeValue::from("c@example.com")]);

        merge_attribute(
            &mut attributes,
            NativeAttribute::single("fullName", "Jack"),
            ModificationKind::Add,
        );
        assert_eq!(attributes.len(), 2);
    }

    #[test]
    fn test_operation_support_serialization() {
        let json = serde_json::to_value(OperationSupport::<()>::Unsupported).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "unsupported" }));
    }
}
