use super::{TestResult, TestStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub collection_id: String,
    pub collection_name: String,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
    pub duration: u64,
    pub results: Vec<TestResult>,
    pub run_at: DateTime<Utc>,
}

impl RunReport {
    /// Tallies terminal statuses from `results`.
    pub fn from_results(
        collection_id: &str,
        collection_name: &str,
        results: Vec<TestResult>,
        duration: u64,
        run_at: DateTime<Utc>,
    ) -> Self {
        let count = |status: TestStatus| results.iter().filter(|r| r.status == status).count();
        Self {
            collection_id: collection_id.to_string(),
            collection_name: collection_name.to_string(),
            total: results.len(),
            passed: count(TestStatus::Passed),
            failed: count(TestStatus::Failed),
            errors: count(TestStatus::Error),
            duration,
            results,
            run_at,
        }
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.errors == 0
    }
}
