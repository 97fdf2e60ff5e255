//! Resource identity

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// OID of a resource definition. Serialized as the bare UUID string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceOid(Uuid);

impl ResourceOid {
    /// Allocate a fresh random OID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ResourceOid {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ResourceOid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_oids_differ() {
        assert_ne!(ResourceOid::new(), ResourceOid::new());
    }

    #[test]
    fn test_oid_serializes_as_plain_uuid() {
        let json = "\"ef2bc95b-76e0-59e2-86d6-3d4f02d3ffff\"";
        let oid: ResourceOid = serde_json::from_str(json).unwrap();
        assert_eq!(oid.to_string(), "ef2bc95b-76e0-59e2-86d6-3d4f02d3ffff");
        assert_eq!(serde_json::to_string(&oid).unwrap(), json);
    }
}
