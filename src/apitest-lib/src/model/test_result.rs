use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Pending,
    Running,
    Passed,
    Failed,
    Error,
}

impl TestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for TestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The request as it was actually sent, after resolution.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CapturedRequest {
    pub method: String,
    pub url: String,
    pub query: Map<String, Value>,
    pub body: Value,
    pub headers: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapturedResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: Value,
    pub duration: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssertionResult {
    pub passed: bool,
    pub message: String,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl AssertionResult {
    pub fn pass(message: impl Into<String>) -> Self {
        Self {
            passed: true,
            message: message.into(),
            errors: Vec::new(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            passed: false,
            errors: vec![message.clone()],
            message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl ErrorInfo {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stack: None,
        }
    }

    pub fn from_error(err: &dyn std::error::Error) -> Self {
        Self {
            message: err.to_string(),
            stack: crate::core::error::source_chain(err),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    pub id: String,
    pub test_case_id: String,
    pub test_case_name: String,
    pub collection_id: String,
    pub status: TestStatus,
    pub request: Option<CapturedRequest>,
    pub response: Option<CapturedResponse>,
    pub assertion_result: Option<AssertionResult>,
    pub error: Option<ErrorInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hook_error: Option<String>,
    pub duration: u64,
    pub created_at: DateTime<Utc>,
}

impl TestResult {
    pub fn pending(test_case_id: &str, test_case_name: &str, collection_id: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            test_case_id: test_case_id.to_string(),
            test_case_name: test_case_name.to_string(),
            collection_id: collection_id.to_string(),
            status: TestStatus::Pending,
            request: None,
            response: None,
            assertion_result: None,
            error: None,
            hook_error: None,
            duration: 0,
            created_at: Utc::now(),
        }
    }
}
