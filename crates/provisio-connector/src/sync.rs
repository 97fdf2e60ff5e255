//! Change synchronization
//!
//! Tokens and change batches for live synchronization. Token values are
//! owned by the native connector: this module stores and forwards them but
//! never parses or compares them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::error::{ConnectorError, ConnectorResult};
use crate::instance::ConnectorInstance;
use crate::native::{NativeSyncDelta, NativeSyncDeltaType, NativeSyncOp, NativeSyncToken};
use crate::object::{ResourceObject, ResourceObjectAttribute};
use crate::qname::QualifiedName;

/// Where a token came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenOrigin {
    /// Obtained from the resource.
    Current,
    /// Rebuilt from a persisted string.
    Deserialized,
}

/// Opaque position in a resource's change feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    value: NativeSyncToken,
    origin: TokenOrigin,
}

impl Token {
    pub(crate) fn new(value: NativeSyncToken, origin: TokenOrigin) -> Self {
        Self { value, origin }
    }

    /// The form to persist. Pass it back to `deserialize_token` unchanged.
    pub fn serialized(&self) -> &str {
        self.value.as_str()
    }

    pub fn origin(&self) -> TokenOrigin {
        self.origin
    }

    /// The native token.
    pub fn native(&self) -> &NativeSyncToken {
        &self.value
    }
}

/// Kind of a detected change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    Add,
    Modify,
    Delete,
    /// The resource does not tell creation and update apart.
    AddOrModify,
}

impl From<NativeSyncDeltaType> for ChangeType {
    fn from(delta_type: NativeSyncDeltaType) -> Self {
        match delta_type {
            NativeSyncDeltaType::Create => ChangeType::Add,
            NativeSyncDeltaType::Update => ChangeType::Modify,
            NativeSyncDeltaType::Delete => ChangeType::Delete,
            NativeSyncDeltaType::CreateOrUpdate => ChangeType::AddOrModify,
        }
    }
}

/// One change detected on the resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Change {
    /// Identifiers of the changed object.
    pub identifiers: Vec<ResourceObjectAttribute>,
    pub object_class: QualifiedName,
    pub change_type: ChangeType,
    /// State after the change, when the resource provides it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_state: Option<ResourceObject>,
    /// Position just after this change.
    pub token: Token,
}

/// Changes since a token, plus the token to resume from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeBatch {
    /// Changes, oldest first.
    pub changes: Vec<Change>,
    /// Token to persist for the next call: the last native delta's token,
    /// or the input token when there were none.
    pub token: Token,
    pub fetched_at: DateTime<Utc>,
}

impl ChangeBatch {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }
}

impl ConnectorInstance {
    fn sync_capability(&self) -> ConnectorResult<&dyn NativeSyncOp> {
        self.native()
            .sync_op()
            .ok_or_else(|| ConnectorError::unsupported("live synchronization"))
    }

    /// Obtain a token representing "now" on the resource.
    ///
    /// # Errors
    ///
    /// `Unsupported` when the connector cannot synchronize; communication
    /// errors from the native call.
    #[instrument(skip_all, fields(object_class = %object_class))]
    pub async fn fetch_current_token(
        &self,
        object_class: &QualifiedName,
    ) -> ConnectorResult<Token> {
        let native_class = self.object_class_codec().decode(object_class)?;
        let sync_op = self.sync_capability()?;

        let value = self
            .call(
                "fetch_current_token",
                self.config().settings.operation_timeout(),
                sync_op.latest_token(&native_class),
            )
            .await?;

        debug!(token = %value, "Fetched current token");
        Ok(Token::new(value, TokenOrigin::Current))
    }

    /// Rebuild a token from its persisted form without contacting the
    /// resource.
    ///
    /// # Errors
    ///
    /// `InvalidToken` when the connector does not recognize the string;
    /// `Unsupported` when it cannot synchronize.
    pub fn deserialize_token(&self, serialized: &str) -> ConnectorResult<Token> {
        let value = self.sync_capability()?.parse_token(serialized)?;
        Ok(Token::new(value, TokenOrigin::Deserialized))
    }

    /// Fetch changes strictly after `since`.
    ///
    /// An empty batch is a normal result and carries `since` forward as its
    /// token.
    #[instrument(skip_all, fields(object_class = %object_class, since = %since.serialized()))]
    pub async fn fetch_changes(
        &self,
        object_class: &QualifiedName,
        since: &Token,
    ) -> ConnectorResult<ChangeBatch> {
        let native_class = self.object_class_codec().decode(object_class)?;
        let sync_op = self.sync_capability()?;

        let deltas = self
            .call(
                "fetch_changes",
                self.config().settings.operation_timeout(),
                sync_op.sync(&native_class, since.native()),
            )
            .await?;

        // Resume after the last delta even when it was skipped below.
        let token = deltas.last().map_or_else(
            || since.clone(),
            |d| Token::new(d.token.clone(), TokenOrigin::Current),
        );
        let changes: Vec<Change> = deltas
            .into_iter()
            .filter_map(|delta| self.to_change(delta))
            .collect();

        if changes.is_empty() {
            debug!("No changes");
        } else {
            info!(changes = changes.len(), token = %token.serialized(), "Fetched changes");
        }

        Ok(ChangeBatch {
            changes,
            token,
            fetched_at: Utc::now(),
        })
    }

    fn to_change(&self, delta: NativeSyncDelta) -> Option<Change> {
        let object_class = match self.object_class_codec().encode(&delta.object_class) {
            Ok(name) => name,
            Err(e) => {
                warn!(
                    object_class = %delta.object_class,
                    uid = %delta.uid,
                    error = %e,
                    "Skipping change for object class that cannot be represented canonically"
                );
                return None;
            }
        };

        let current_state = match delta.delta_type {
            NativeSyncDeltaType::Delete => None,
            _ => delta
                .object
                .as_ref()
                .map(|object| self.attribute_codec().to_resource_object(object)),
        };

        Some(Change {
            identifiers: vec![self.uid_attribute(&delta.uid)],
            object_class,
            change_type: delta.delta_type.into(),
            current_state,
            token: Token::new(delta.token, TokenOrigin::Current),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_serialized_form_is_unchanged() {
        let token = Token::new(NativeSyncToken::new("{\"seq\":7}"), TokenOrigin::Current);
        assert_eq!(token.serialized(), "{\"seq\":7}");
        assert_eq!(token.origin(), TokenOrigin::Current);
    }

    #[test]
    fn test_change_type_mapping() {
        assert_eq!(ChangeType::from(NativeSyncDeltaType::Create), ChangeType::Add);
        assert_eq!(ChangeType::from(NativeSyncDeltaType::Update), ChangeType::Modify);
        assert_eq!(ChangeType::from(NativeSyncDeltaType::Delete), ChangeType::Delete);
        assert_eq!(
            ChangeType::from(NativeSyncDeltaType::CreateOrUpdate),
            ChangeType::AddOrModify
        );
    }
}
