//! In-memory connector implementation
//!
//! Implements the native connector contract over a process-local store with
//! a sequential change log. Reachability and latency can be controlled at
//! runtime to exercise the failure paths of callers.

use async_trait::async_trait;
use futures_util::stream::{self, BoxStream, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use provisio_connector::error::{ConnectorError, ConnectorResult};
use provisio_connector::native::{
    AttributeFlag, NativeAttribute, NativeAttributeDelta, NativeConnector, NativeCreateOp,
    NativeDeleteOp, NativeFilter, NativeObject, NativeObjectClass, NativeObjectClassInfo,
    NativeSchema, NativeSyncDelta, NativeSyncDeltaType, NativeSyncOp, NativeSyncToken, NativeUid,
    NativeUpdateOp, OperationOptions, NAME_NAME, UID_NAME,
};
use provisio_connector::object::AttributeValue;

use crate::config::MemoryConfig;

/// Store contents guarded by one lock.
#[derive(Debug, Default)]
struct MemoryState {
    /// Objects in insertion order.
    objects: Vec<NativeObject>,

    /// Sequence number of the last change.
    sequence: u64,

    /// Every change, oldest first.
    change_log: Vec<NativeSyncDelta>,
}

impl MemoryState {
    fn position(&self, object_class: &NativeObjectClass, uid: &NativeUid) -> Option<usize> {
        self.objects
            .iter()
            .position(|o| &o.object_class == object_class && &o.uid == uid)
    }

    fn name_taken(
        &self,
        object_class: &NativeObjectClass,
        name: &[AttributeValue],
        except: Option<&NativeUid>,
    ) -> bool {
        self.objects.iter().any(|o| {
            &o.object_class == object_class
                && Some(&o.uid) != except
                && o.attribute(NAME_NAME).is_some_and(|a| a.values == name)
        })
    }

    fn record(
        &mut self,
        delta_type: NativeSyncDeltaType,
        object_class: &NativeObjectClass,
        uid: &NativeUid,
        object: Option<NativeObject>,
    ) {
        self.sequence += 1;
        self.change_log.push(NativeSyncDelta {
            token: NativeSyncToken::new(self.sequence.to_string()),
            delta_type,
            uid: uid.clone(),
            object_class: object_class.clone(),
            object,
        });
    }
}

/// Native connector backed by process memory.
pub struct MemoryConnector {
    /// Configuration.
    config: MemoryConfig,

    /// Store contents.
    state: Arc<RwLock<MemoryState>>,

    /// Whether calls reach the store.
    reachable: Arc<RwLock<bool>>,

    /// Delay applied before every call.
    latency: Arc<RwLock<Duration>>,
}

impl std::fmt::Debug for MemoryConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryConnector")
            .field("display_name", &self.config.display_name)
            .field("read_only", &self.config.read_only)
            .field("supports_sync", &self.config.supports_sync)
            .finish()
    }
}

impl MemoryConnector {
    /// Create a connector with an empty store.
    pub fn new(config: MemoryConfig) -> ConnectorResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: Arc::new(RwLock::new(MemoryState::default())),
            reachable: Arc::new(RwLock::new(true)),
            latency: Arc::new(RwLock::new(Duration::ZERO)),
        })
    }

    /// The configuration.
    pub fn config(&self) -> &MemoryConfig {
        &self.config
    }

    /// Make the store reachable or unreachable.
    pub async fn set_reachable(&self, reachable: bool) {
        *self.reachable.write().await = reachable;
    }

    /// Delay every subsequent call by `latency`.
    pub async fn set_latency(&self, latency: Duration) {
        *self.latency.write().await = latency;
    }

    /// Number of stored objects of a class.
    pub async fn object_count(&self, object_class: &NativeObjectClass) -> usize {
        self.state
            .read()
            .await
            .objects
            .iter()
            .filter(|o| &o.object_class == object_class)
            .count()
    }

    /// Apply latency, then fail if the store is unreachable.
    async fn check_available(&self) -> ConnectorResult<()> {
        let latency = *self.latency.read().await;
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        if !*self.reachable.read().await {
            return Err(ConnectorError::connection_failed(format!(
                "{} is unreachable",
                self.config.display_name
            )));
        }
        Ok(())
    }

    fn class_info(
        &self,
        object_class: &NativeObjectClass,
    ) -> ConnectorResult<&NativeObjectClassInfo> {
        self.config.find_class(object_class).ok_or_else(|| {
            ConnectorError::invalid_argument(format!("unknown object class {object_class}"))
        })
    }

    /// Check attribute names against the class and reject writes to
    /// attributes the class marks as not writable.
    fn check_writable(
        info: &NativeObjectClassInfo,
        attributes: &[&NativeAttribute],
        forbidden: &AttributeFlag,
    ) -> ConnectorResult<()> {
        for attribute in attributes {
            let declared = info.find_attribute(&attribute.name).ok_or_else(|| {
                ConnectorError::invalid_argument(format!(
                    "attribute {} is not defined for object class {}",
                    attribute.name, info.object_class
                ))
            })?;
            if declared.has_flag(forbidden) {
                return Err(ConnectorError::invalid_argument(format!(
                    "attribute {} cannot be written ({forbidden})",
                    attribute.name
                )));
            }
            if !declared.has_flag(&AttributeFlag::MultiValued) && attribute.values.len() > 1 {
                return Err(ConnectorError::invalid_argument(format!(
                    "attribute {} is single-valued",
                    attribute.name
                )));
            }
        }
        Ok(())
    }

    /// Copy of `object` holding only the attributes a read may return.
    fn project(
        info: &NativeObjectClassInfo,
        object: &NativeObject,
        options: &OperationOptions,
    ) -> NativeObject {
        let mut projected = NativeObject::new(object.object_class.clone(), object.uid.clone());
        for attribute in &object.attributes {
            let declared = info.find_attribute(&attribute.name);
            let readable = declared.map_or(true, |d| !d.has_flag(&AttributeFlag::NotReadable));
            let wanted = match &options.attributes_to_get {
                Some(names) => names.contains(&attribute.name),
                None => declared
                    .map_or(true, |d| !d.has_flag(&AttributeFlag::NotReturnedByDefault)),
            };
            if readable && wanted {
                projected.attributes.push(attribute.clone());
            }
        }
        projected
    }
}

fn apply_delta(object: &mut NativeObject, delta: NativeAttributeDelta) {
    for attribute in delta.replace {
        if attribute.values.is_empty() {
            object.attributes.retain(|a| a.name != attribute.name);
        } else {
            object.set_attribute(attribute);
        }
    }
    for attribute in delta.add {
        match object.attributes.iter_mut().find(|a| a.name == attribute.name) {
            Some(existing) => {
                for value in attribute.values {
                    if !existing.values.contains(&value) {
                        existing.values.push(value);
                    }
                }
            }
            None => object.attributes.push(attribute),
        }
    }
    for attribute in delta.remove {
        if let Some(existing) = object.attributes.iter_mut().find(|a| a.name == attribute.name) {
            existing.values.retain(|v| !attribute.values.contains(v));
        }
    }
    object.attributes.retain(|a| !a.values.is_empty());
}

#[async_trait]
impl NativeConnector for MemoryConnector {
    fn display_name(&self) -> &str {
        &self.config.display_name
    }

    #[instrument(skip(self))]
    async fn schema(&self) -> ConnectorResult<NativeSchema> {
        self.check_available().await?;
        Ok(NativeSchema {
            object_classes: self.config.object_classes.clone(),
        })
    }

    #[instrument(skip(self, options), fields(object_class = %object_class, uid = %uid))]
    async fn get_object(
        &self,
        object_class: &NativeObjectClass,
        uid: &NativeUid,
        options: &OperationOptions,
    ) -> ConnectorResult<Option<NativeObject>> {
        self.check_available().await?;
        let info = self.class_info(object_class)?;

        let state = self.state.read().await;
        let found = state
            .position(object_class, uid)
            .map(|i| Self::project(info, &state.objects[i], options));
        debug!(found = found.is_some(), "Looked up object");
        Ok(found)
    }

    #[instrument(skip(self, filter, options), fields(object_class = %object_class))]
    async fn search(
        &self,
        object_class: &NativeObjectClass,
        filter: Option<NativeFilter>,
        options: &OperationOptions,
    ) -> ConnectorResult<BoxStream<'static, ConnectorResult<NativeObject>>> {
        self.check_available().await?;
        let info = self.class_info(object_class)?;

        let matches: Vec<NativeObject> = {
            let state = self.state.read().await;
            state
                .objects
                .iter()
                .filter(|o| &o.object_class == object_class)
                .filter(|o| filter.as_ref().map_or(true, |f| f.matches(o)))
                .map(|o| Self::project(info, o, options))
                .collect()
        };

        debug!(count = matches.len(), "Search opened");
        Ok(stream::iter(matches.into_iter().map(Ok)).boxed())
    }

    #[instrument(skip(self))]
    async fn test(&self) -> ConnectorResult<()> {
        self.check_available().await?;
        info!(connector = %self.config.display_name, "In-memory connection test successful");
        Ok(())
    }

    fn create_op(&self) -> Option<&dyn NativeCreateOp> {
        (!self.config.read_only).then_some(self as &dyn NativeCreateOp)
    }

    fn update_op(&self) -> Option<&dyn NativeUpdateOp> {
        (!self.config.read_only).then_some(self as &dyn NativeUpdateOp)
    }

    fn delete_op(&self) -> Option<&dyn NativeDeleteOp> {
        (!self.config.read_only).then_some(self as &dyn NativeDeleteOp)
    }

    fn sync_op(&self) -> Option<&dyn NativeSyncOp> {
        self.config
            .supports_sync
            .then_some(self as &dyn NativeSyncOp)
    }
}

#[async_trait]
impl NativeCreateOp for MemoryConnector {
    #[instrument(skip(self, attributes, _options), fields(object_class = %object_class))]
    async fn create(
        &self,
        object_class: &NativeObjectClass,
        attributes: Vec<NativeAttribute>,
        _options: &OperationOptions,
    ) -> ConnectorResult<NativeUid> {
        self.check_available().await?;
        let info = self.class_info(object_class)?;

        let attributes: Vec<NativeAttribute> = attributes
            .into_iter()
            .filter(|a| a.name != UID_NAME)
            .collect();
        Self::check_writable(
            info,
            &attributes.iter().collect::<Vec<_>>(),
            &AttributeFlag::NotCreatable,
        )?;
        for required in info
            .attributes
            .iter()
            .filter(|a| a.has_flag(&AttributeFlag::Required))
        {
            let present = attributes
                .iter()
                .any(|a| a.name == required.name && !a.values.is_empty());
            if !present {
                return Err(ConnectorError::invalid_argument(format!(
                    "required attribute {} is missing",
                    required.name
                )));
            }
        }

        let mut state = self.state.write().await;
        if let Some(name) = attributes.iter().find(|a| a.name == NAME_NAME) {
            if state.name_taken(object_class, &name.values, None) {
                return Err(ConnectorError::ObjectAlreadyExists {
                    identifier: format!("{:?}", name.values),
                });
            }
        }

        let uid = NativeUid::new(Uuid::new_v4().to_string());
        let mut object = NativeObject::new(object_class.clone(), uid.clone());
        for attribute in attributes {
            object.set_attribute(attribute);
        }
        let recorded = Self::project(info, &object, &OperationOptions::default());
        state.record(NativeSyncDeltaType::Create, object_class, &uid, Some(recorded));
        state.objects.push(object);

        info!(uid = %uid, "Object created in memory");
        Ok(uid)
    }
}

#[async_trait]
impl NativeUpdateOp for MemoryConnector {
    #[instrument(skip(self, changes), fields(object_class = %object_class, uid = %uid))]
    async fn update(
        &self,
        object_class: &NativeObjectClass,
        uid: &NativeUid,
        changes: NativeAttributeDelta,
    ) -> ConnectorResult<NativeUid> {
        self.check_available().await?;
        let info = self.class_info(object_class)?;

        let touched: Vec<&NativeAttribute> = changes
            .add
            .iter()
            .chain(&changes.remove)
            .chain(&changes.replace)
            .collect();
        if touched.iter().any(|a| a.name == UID_NAME) {
            return Err(ConnectorError::invalid_argument(format!(
                "{UID_NAME} cannot be modified"
            )));
        }
        Self::check_writable(info, &touched, &AttributeFlag::NotUpdateable)?;

        let mut state = self.state.write().await;
        let index = state
            .position(object_class, uid)
            .ok_or_else(|| ConnectorError::ObjectNotFound {
                identifier: uid.to_string(),
            })?;

        let mut updated = state.objects[index].clone();
        apply_delta(&mut updated, changes);

        if info
            .attributes
            .iter()
            .filter(|a| a.has_flag(&AttributeFlag::Required))
            .any(|a| updated.attribute(&a.name).is_none())
        {
            return Err(ConnectorError::invalid_argument(
                "update would remove a required attribute",
            ));
        }
        if let Some(attribute) = updated.attributes.iter().find(|a| {
            a.values.len() > 1
                && info
                    .find_attribute(&a.name)
                    .is_some_and(|d| !d.has_flag(&AttributeFlag::MultiValued))
        }) {
            return Err(ConnectorError::invalid_argument(format!(
                "attribute {} is single-valued",
                attribute.name
            )));
        }
        if let Some(name) = updated.attribute(NAME_NAME) {
            if state.name_taken(object_class, &name.values, Some(uid)) {
                return Err(ConnectorError::ObjectAlreadyExists {
                    identifier: format!("{:?}", name.values),
                });
            }
        }

        let recorded = Self::project(info, &updated, &OperationOptions::default());
        state.record(NativeSyncDeltaType::Update, object_class, uid, Some(recorded));
        state.objects[index] = updated;

        debug!("Object updated in memory");
        Ok(uid.clone())
    }
}

#[async_trait]
impl NativeDeleteOp for MemoryConnector {
    #[instrument(skip(self), fields(object_class = %object_class, uid = %uid))]
    async fn delete(
        &self,
        object_class: &NativeObjectClass,
        uid: &NativeUid,
    ) -> ConnectorResult<()> {
        self.check_available().await?;

        let mut state = self.state.write().await;
        let index = state
            .position(object_class, uid)
            .ok_or_else(|| ConnectorError::ObjectNotFound {
                identifier: uid.to_string(),
            })?;
        state.objects.remove(index);
        state.record(NativeSyncDeltaType::Delete, object_class, uid, None);

        debug!("Object deleted from memory");
        Ok(())
    }
}

#[async_trait]
impl NativeSyncOp for MemoryConnector {
    async fn latest_token(
        &self,
        _object_class: &NativeObjectClass,
    ) -> ConnectorResult<NativeSyncToken> {
        self.check_available().await?;
        let sequence = self.state.read().await.sequence;
        Ok(NativeSyncToken::new(sequence.to_string()))
    }

    #[instrument(skip(self), fields(object_class = %object_class, token = %token))]
    async fn sync(
        &self,
        object_class: &NativeObjectClass,
        token: &NativeSyncToken,
    ) -> ConnectorResult<Vec<NativeSyncDelta>> {
        self.check_available().await?;
        let since = parse_sequence(token.as_str())?;

        let state = self.state.read().await;
        if since > state.sequence {
            warn!(since, current = state.sequence, "Token is ahead of the change log");
        }
        let deltas: Vec<NativeSyncDelta> = state
            .change_log
            .iter()
            .skip(usize::try_from(since).unwrap_or(usize::MAX))
            .filter(|d| &d.object_class == object_class)
            .cloned()
            .collect();

        debug!(count = deltas.len(), "Collected changes");
        Ok(deltas)
    }

    fn parse_token(&self, serialized: &str) -> ConnectorResult<NativeSyncToken> {
        parse_sequence(serialized)?;
        Ok(NativeSyncToken::new(serialized))
    }
}

/// Tokens are the decimal sequence number of the last seen change.
fn parse_sequence(serialized: &str) -> ConnectorResult<u64> {
    serialized.parse::<u64>().map_err(|e| {
        ConnectorError::invalid_token(format!("'{serialized}' is not a change sequence: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use provisio_connector::native::PASSWORD_NAME;
    use provisio_connector::object::GuardedString;

    fn account_attributes(name: &str) -> Vec<NativeAttribute> {
        vec![
            NativeAttribute::single(NAME_NAME, name),
            NativeAttribute::single(PASSWORD_NAME, GuardedString::new("secret")),
            NativeAttribute::new(
                "mail",
                vec![
                    AttributeValue::from(format!("{name}@example.com")),
                    AttributeValue::from(format!("{name}@corp.example.com")),
                ],
            ),
        ]
    }

    async fn create_account(connector: &MemoryConnector, name: &str) -> NativeUid {
        connector
            .create(
                &NativeObjectClass::account(),
                account_attributes(name),
                &OperationOptions::default(),
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let connector = MemoryConnector::new(MemoryConfig::default()).unwrap();
        let uid = create_account(&connector, "jack").await;

        let object = connector
            .get_object(&NativeObjectClass::account(), &uid, &OperationOptions::default())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(object.uid, uid);
        assert_eq!(object.attribute("mail").unwrap().values.len(), 2);
        assert!(object.attribute(PASSWORD_NAME).is_none());
        assert_eq!(connector.object_count(&NativeObjectClass::account()).await, 1);
    }

    #[tokio::test]
    async fn test_attributes_to_get() {
        let connector = MemoryConnector::new(MemoryConfig::default()).unwrap();
        let uid = create_account(&connector, "jack").await;

        let options = OperationOptions::new().with_attributes_to_get(vec!["mail".to_string()]);
        let object = connector
            .get_object(&NativeObjectClass::account(), &uid, &options)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(object.attributes.len(), 1);
        assert_eq!(object.attributes[0].name, "mail");
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected() {
        let connector = MemoryConnector::new(MemoryConfig::default()).unwrap();
        create_account(&connector, "jack").await;

        let err = connector
            .create(
                &NativeObjectClass::account(),
                account_attributes("jack"),
                &OperationOptions::default(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "OBJECT_EXISTS");
    }

    #[tokio::test]
    async fn test_missing_required_attribute_rejected() {
        let connector = MemoryConnector::new(MemoryConfig::default()).unwrap();
        let err = connector
            .create(
                &NativeObjectClass::account(),
                vec![NativeAttribute::single("fullName", "Jack Sparrow")],
                &OperationOptions::default(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_ARGUMENT");
    }

    #[tokio::test]
    async fn test_unknown_attribute_rejected() {
        let connector = MemoryConnector::new(MemoryConfig::default()).unwrap();
        let mut attributes = account_attributes("jack");
        attributes.push(NativeAttribute::single("shoeSize", 44i64));

        let err = connector
            .create(
                &NativeObjectClass::account(),
                attributes,
                &OperationOptions::default(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_ARGUMENT");
    }

    #[tokio::test]
    async fn test_update_applies_delta() {
        let connector = MemoryConnector::new(MemoryConfig::default()).unwrap();
        let uid = create_account(&connector, "jack").await;

        let delta = NativeAttributeDelta {
            add: vec![NativeAttribute::single("mail", "captain@example.com")],
            remove: vec![NativeAttribute::single("mail", "jack@corp.example.com")],
            replace: vec![NativeAttribute::single("fullName", "Jack Sparrow")],
        };
        connector
            .update(&NativeObjectClass::account(), &uid, delta)
            .await
            .unwrap();

        let object = connector
            .get_object(&NativeObjectClass::account(), &uid, &OperationOptions::default())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            object.attribute("mail").unwrap().values,
            vec![
                AttributeValue::from("jack@example.com"),
                AttributeValue::from("captain@example.com"),
            ]
        );
        assert_eq!(
            object.attribute("fullName").unwrap().values,
            vec![AttributeValue::from("Jack Sparrow")]
        );
    }

    #[tokio::test]
    async fn test_update_cannot_clear_required() {
        let connector = MemoryConnector::new(MemoryConfig::default()).unwrap();
        let uid = create_account(&connector, "jack").await;

        let delta = NativeAttributeDelta {
            replace: vec![NativeAttribute::new(NAME_NAME, Vec::new())],
            ..NativeAttributeDelta::default()
        };
        let err = connector
            .update(&NativeObjectClass::account(), &uid, delta)
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_ARGUMENT");
    }

    #[tokio::test]
    async fn test_update_add_to_single_valued_rejected() {
        let connector = MemoryConnector::new(MemoryConfig::default()).unwrap();
        let uid = create_account(&connector, "jack").await;
        let set_full_name = NativeAttributeDelta {
            replace: vec![NativeAttribute::single("fullName", "Jack")],
            ..NativeAttributeDelta::default()
        };
        connector
            .update(&NativeObjectClass::account(), &uid, set_full_name)
            .await
            .unwrap();

        let delta = NativeAttributeDelta {
            add: vec![NativeAttribute::single("fullName", "Jacky")],
            ..NativeAttributeDelta::default()
        };
        let err = connector
            .update(&NativeObjectClass::account(), &uid, delta)
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_ARGUMENT");

        let object = connector
            .get_object(&NativeObjectClass::account(), &uid, &OperationOptions::default())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            object.attribute("fullName").unwrap().values,
            vec![AttributeValue::from("Jack")]
        );
    }

    #[tokio::test]
    async fn test_delete_missing_object() {
        let connector = MemoryConnector::new(MemoryConfig::default()).unwrap();
        let err = connector
            .delete(&NativeObjectClass::account(), &NativeUid::new("nope"))
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "OBJECT_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_change_log_is_per_class_and_after_token() {
        let connector = MemoryConnector::new(MemoryConfig::default()).unwrap();
        let start = connector
            .latest_token(&NativeObjectClass::account())
            .await
            .unwrap();

        let uid = create_account(&connector, "jack").await;
        connector
            .create(
                &NativeObjectClass::group(),
                vec![NativeAttribute::single(NAME_NAME, "pirates")],
                &OperationOptions::default(),
            )
            .await
            .unwrap();
        connector
            .delete(&NativeObjectClass::account(), &uid)
            .await
            .unwrap();

        let deltas = connector
            .sync(&NativeObjectClass::account(), &start)
            .await
            .unwrap();
        assert_eq!(deltas.len(), 2);
        assert_eq!(deltas[0].delta_type, NativeSyncDeltaType::Create);
        assert_eq!(deltas[1].delta_type, NativeSyncDeltaType::Delete);
        assert_eq!(deltas[1].token.as_str(), "3");

        let after = connector
            .sync(&NativeObjectClass::account(), &deltas[1].token)
            .await
            .unwrap();
        assert!(after.is_empty());
    }

    #[tokio::test]
    async fn test_parse_token() {
        let connector = MemoryConnector::new(MemoryConfig::default()).unwrap();
        assert_eq!(connector.parse_token("12").unwrap().as_str(), "12");
        assert_eq!(
            connector.parse_token("twelve").unwrap_err().error_code(),
            "INVALID_TOKEN"
        );
    }

    #[tokio::test]
    async fn test_unreachable() {
        let connector = MemoryConnector::new(MemoryConfig::default()).unwrap();
        connector.set_reachable(false).await;
        let err = connector.test().await.unwrap_err();
        assert!(err.is_communication());
    }

    #[test]
    fn test_read_only_hides_mutations() {
        let connector = MemoryConnector::new(MemoryConfig::default().read_only()).unwrap();
        assert!(connector.create_op().is_none());
        assert!(connector.update_op().is_none());
        assert!(connector.delete_op().is_none());
        assert!(connector.sync_op().is_some());

        let connector = MemoryConnector::new(MemoryConfig::default().with_sync(false)).unwrap();
        assert!(connector.sync_op().is_none());
        assert!(connector.create_op().is_some());
    }
}
