//! Qualified names
//!
//! A `(namespace, local part)` pair identifying a canonical element. The
//! optional prefix is presentation only; it takes no part in equality.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::ConnectorError;

/// A namespace-qualified name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualifiedName {
    namespace: String,
    local_part: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    prefix: Option<String>,
}

impl QualifiedName {
    /// Create a qualified name without a preferred prefix.
    pub fn new(namespace: impl Into<String>, local_part: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            local_part: local_part.into(),
            prefix: None,
        }
    }

    /// Create a qualified name with a preferred prefix.
    pub fn with_prefix(
        namespace: impl Into<String>,
        local_part: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            local_part: local_part.into(),
            prefix: Some(prefix.into()),
        }
    }

    /// The namespace URI.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The local part.
    pub fn local_part(&self) -> &str {
        &self.local_part
    }

    /// The preferred prefix, if any.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Check whether this name lives in the given namespace.
    pub fn is_in_namespace(&self, namespace: &str) -> bool {
        self.namespace == namespace
    }
}

impl PartialEq for QualifiedName {
    fn eq(&self, other: &Self) -> bool {
        self.namespace == other.namespace && self.local_part == other.local_part
    }
}

impl Eq for QualifiedName {}

impl Hash for QualifiedName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.namespace.hash(state);
        self.local_part.hash(state);
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}{}", self.namespace, self.local_part)
    }
}

impl FromStr for QualifiedName {
    type Err = ConnectorError;

    /// Parse the `{namespace}local` form produced by `Display`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s.strip_prefix('{').ok_or_else(|| {
            ConnectorError::invalid_argument(format!("'{s}' is not in {{namespace}}local form"))
        })?;
        let (namespace, local) = rest.split_once('}').ok_or_else(|| {
            ConnectorError::invalid_argument(format!("'{s}' has an unterminated namespace"))
        })?;
        if local.is_empty() {
            return Err(ConnectorError::invalid_argument(format!(
                "'{s}' has an empty local part"
            )));
        }
        Ok(Self::new(namespace, local))
    }
}
