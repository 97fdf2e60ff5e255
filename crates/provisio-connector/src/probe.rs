//! Connectivity probe
//!
//! Runs the native connectivity check and reports the outcome as data.
//! Failures of any kind become diagnostics; `test` itself never fails.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::error::ConnectorError;
use crate::instance::ConnectorInstance;
use crate::qname::QualifiedName;

/// One diagnostic entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticsMessage {
    /// Severity element name (error or warning).
    pub kind: QualifiedName,
    /// `<ERROR_CODE>: <description>`.
    pub message: String,
    /// Full cause chain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Outcome of one test step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResult {
    pub success: bool,
    #[serde(default)]
    pub messages: Vec<DiagnosticsMessage>,
}

impl TestResult {
    pub fn success() -> Self {
        Self {
            success: true,
            messages: Vec::new(),
        }
    }

    pub fn failure(message: DiagnosticsMessage) -> Self {
        Self {
            success: false,
            messages: vec![message],
        }
    }
}

/// Result of testing a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceTestResult {
    /// Connection and authentication check of the connector.
    pub connector_connection: TestResult,
    pub tested_at: DateTime<Utc>,
}

impl ResourceTestResult {
    /// Whether every step succeeded.
    pub fn is_success(&self) -> bool {
        self.connector_connection.success
    }
}

impl ConnectorInstance {
    /// Test connectivity to the resource.
    ///
    /// Safe to call repeatedly and concurrently. Timeouts and cancellation
    /// are reported like any other failure.
    #[instrument(skip(self), fields(resource = %self.config().describe()))]
    pub async fn test(&self) -> ResourceTestResult {
        let outcome = self
            .call(
                "test",
                self.config().settings.test_timeout(),
                self.native().test(),
            )
            .await;

        let connector_connection = match outcome {
            Ok(()) => {
                info!("Connection test succeeded");
                TestResult::success()
            }
            Err(e) => {
                warn!(error = %e, code = e.error_code(), "Connection test failed");
                TestResult::failure(self.diagnostic(&e))
            }
        };

        ResourceTestResult {
            connector_connection,
            tested_at: Utc::now(),
        }
    }

    fn diagnostic(&self, error: &ConnectorError) -> DiagnosticsMessage {
        let description = error.to_string();
        let chain = error.chain_description();
        DiagnosticsMessage {
            kind: self.vocabulary().diagnostics_error.clone(),
            message: format!("{}: {}", error.error_code(), description),
            details: (chain != description).then_some(chain),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::CanonicalVocabulary;

    #[test]
    fn test_result_constructors() {
        assert!(TestResult::success().success);
        assert!(TestResult::success().messages.is_empty());

        let failure = TestResult::failure(DiagnosticsMessage {
            kind: CanonicalVocabulary::standard().diagnostics_error,
            message: "CONNECTION_FAILED: connection failed: refused".to_string(),
            details: None,
        });
        assert!(!failure.success);
        assert_eq!(failure.messages.len(), 1);
    }
}
