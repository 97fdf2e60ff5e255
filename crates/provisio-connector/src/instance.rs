//! Bound connector instance
//!
//! A native connector bound to one resource configuration. Every native
//! call goes through [`ConnectorInstance::call`], which applies the
//! configured timeout and the binding-level cancellation signal.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::codec::{AttributeCodec, ObjectClassCodec};
use crate::config::ResourceConfig;
use crate::error::{ConnectorError, ConnectorResult};
use crate::native::NativeConnector;
use crate::vocabulary::CanonicalVocabulary;

/// A native connector bound to one resource.
///
/// Cheap to share behind an `Arc`; read operations may run concurrently.
/// Mutating calls against the same object are not serialized here.
pub struct ConnectorInstance {
    native: Arc<dyn NativeConnector>,
    config: ResourceConfig,
    object_class_codec: ObjectClassCodec,
    attribute_codec: AttributeCodec,
    cancellation: CancellationToken,
}

impl ConnectorInstance {
    /// Bind a native connector to a resource.
    ///
    /// # Errors
    ///
    /// `ConfigurationInvalid` when the resource configuration does not
    /// validate.
    pub fn new(
        native: Arc<dyn NativeConnector>,
        config: ResourceConfig,
        vocabulary: Arc<CanonicalVocabulary>,
    ) -> ConnectorResult<Self> {
        config.validate()?;
        info!(
            resource = %config.describe(),
            connector = native.display_name(),
            "Binding connector instance"
        );
        Ok(Self {
            object_class_codec: ObjectClassCodec::new(&config.namespace),
            attribute_codec: AttributeCodec::new(&config.namespace, vocabulary),
            native,
            config,
            cancellation: CancellationToken::new(),
        })
    }

    /// The resource configuration.
    pub fn config(&self) -> &ResourceConfig {
        &self.config
    }

    /// Namespace of the resource schema.
    pub fn namespace(&self) -> &str {
        &self.config.namespace
    }

    /// Display name of the native connector.
    pub fn display_name(&self) -> &str {
        self.native.display_name()
    }

    /// The bound native connector.
    pub fn native(&self) -> &dyn NativeConnector {
        self.native.as_ref()
    }

    /// The canonical vocabulary.
    pub fn vocabulary(&self) -> &CanonicalVocabulary {
        self.attribute_codec.vocabulary()
    }

    pub fn object_class_codec(&self) -> &ObjectClassCodec {
        &self.object_class_codec
    }

    pub fn attribute_codec(&self) -> &AttributeCodec {
        &self.attribute_codec
    }

    /// Cancel the binding.
    ///
    /// Pending native calls fail with `Cancelled`, and so does every later
    /// call on this instance.
    pub fn cancel(&self) {
        debug!(resource = %self.config.describe(), "Cancelling connector instance");
        self.cancellation.cancel();
    }

    /// Check if the binding has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// A handle that cancels this binding when triggered.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// Run a native call under the given timeout and the binding's
    /// cancellation signal.
    pub(crate) async fn call<T, F>(
        &self,
        operation: &str,
        timeout: Duration,
        fut: F,
    ) -> ConnectorResult<T>
    where
        F: Future<Output = ConnectorResult<T>>,
    {
        tokio::select! {
            biased;
            () = self.cancellation.cancelled() => {
                debug!(operation, "Native call cancelled");
                Err(ConnectorError::Cancelled {
                    operation: operation.to_string(),
                })
            }
            result = tokio::time::timeout(timeout, fut) => match result {
                Ok(inner) => inner,
                Err(_) => {
                    debug!(operation, timeout_secs = timeout.as_secs(), "Native call timed out");
                    Err(ConnectorError::ConnectionTimeout {
                        operation: operation.to_string(),
                        timeout_secs: timeout.as_secs(),
                    })
                }
            },
        }
    }
}

impl std::fmt::Debug for ConnectorInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectorInstance")
            .field("connector", &self.native.display_name())
            .field("resource", &self.config.describe())
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::{
        NativeFilter, NativeObject, NativeObjectClass, NativeSchema, NativeUid, OperationOptions,
    };
    use async_trait::async_trait;
    use futures_util::stream::{self, BoxStream};

    struct SlowConnector {
        delay: Duration,
    }

    #[async_trait]
    impl NativeConnector for SlowConnector {
        fn display_name(&self) -> &str {
            "slow"
        }

        async fn schema(&self) -> ConnectorResult<NativeSchema> {
            tokio::time::sleep(self.delay).await;
            Ok(NativeSchema::new())
        }

        async fn get_object(
            &self,
            _object_class: &NativeObjectClass,
            _uid: &NativeUid,
            _options: &OperationOptions,
        ) -> ConnectorResult<Option<NativeObject>> {
            Ok(None)
        }

        async fn search(
            &self,
            _object_class: &NativeObjectClass,
            _filter: Option<NativeFilter>,
            _options: &OperationOptions,
        ) -> ConnectorResult<BoxStream<'static, ConnectorResult<NativeObject>>> {
            Ok(Box::pin(stream::empty()))
        }

        async fn test(&self) -> ConnectorResult<()> {
            Ok(())
        }
    }

    fn instance(delay: Duration) -> ConnectorInstance {
        ConnectorInstance::new(
            Arc::new(SlowConnector { delay }),
            ResourceConfig::new("Slow", "http://example.com/resource/slow"),
            Arc::new(CanonicalVocabulary::standard()),
        )
        .unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let err = ConnectorInstance::new(
            Arc::new(SlowConnector {
                delay: Duration::ZERO,
            }),
            ResourceConfig::new("", "http://example.com/resource/slow"),
            Arc::new(CanonicalVocabulary::standard()),
        )
        .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }

    #[tokio::test(start_paused = true)]
    async fn test_call_times_out() {
        let instance = instance(Duration::from_secs(120));
        let err = instance
            .call("schema", Duration::from_secs(5), instance.native().schema())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ConnectorError::ConnectionTimeout {
                timeout_secs: 5,
                ..
            }
        ));
        assert!(err.is_communication());
    }

    #[tokio::test(start_paused = true)]
    async fn test_call_completes_within_timeout() {
        let instance = instance(Duration::from_secs(1));
        let schema = instance
            .call("schema", Duration::from_secs(5), instance.native().schema())
            .await
            .unwrap();
        assert!(schema.object_classes.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_interrupts_pending_call() {
        let instance = Arc::new(instance(Duration::from_secs(30)));
        let token = instance.cancellation_token();

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            token.cancel();
        });

        let err = instance
            .call("schema", Duration::from_secs(60), instance.native().schema())
            .await
            .unwrap_err();
        canceller.await.unwrap();

        assert_eq!(err.error_code(), "CANCELLED");
        assert!(err.is_communication());
        assert!(instance.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancelled_instance_rejects_new_calls() {
        let instance = instance(Duration::ZERO);
        instance.cancel();

        let err = instance
            .call("schema", Duration::from_secs(5), instance.native().schema())
            .await
            .unwrap_err();
        assert!(matches!(err, ConnectorError::Cancelled { .. }));
    }
}
