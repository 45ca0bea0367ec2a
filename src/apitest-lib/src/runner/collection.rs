use super::case::TestCaseRunner;
use super::hooks::RunHooks;
use crate::core::config::RunnerConfig;
use crate::core::error::Result;
use crate::model::{RunReport, TestResult};
use crate::resolve::ExecutionRecord;
use crate::store::Store;
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;

/// Runs the enabled cases of a collection in `order`, one after another.
pub struct CollectionRunner {
    store: Arc<dyn Store>,
    cases: TestCaseRunner,
}

impl CollectionRunner {
    pub fn new(store: Arc<dyn Store>, config: RunnerConfig) -> Self {
        Self {
            cases: TestCaseRunner::new(store.clone(), config),
            store,
        }
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn RunHooks>) -> Self {
        self.cases = self.cases.with_hooks(hooks);
        self
    }

    pub async fn run(&self, collection_id: &str, env_name: Option<&str>) -> Result<RunReport> {
        let collection = self.store.collection(collection_id)?;
        let mut cases: Vec<_> = self
            .store
            .test_cases(collection_id)?
            .into_iter()
            .filter(|case| case.enabled)
            .collect();
        cases.sort_by_key(|case| case.order);

        tracing::info!(
            collection = %collection.id,
            cases = cases.len(),
            "running collection '{}'",
            collection.name
        );

        let run_at = Utc::now();
        let started = Instant::now();
        let mut record = ExecutionRecord::new();
        let mut results = Vec::with_capacity(cases.len());
        for case in &cases {
            results.push(self.cases.run(case, env_name, &mut record).await);
        }
        let duration = started.elapsed().as_millis() as u64;

        for result in &results {
            self.persist(result);
        }

        let report =
            RunReport::from_results(&collection.id, &collection.name, results, duration, run_at);
        tracing::info!(
            total = report.total,
            passed = report.passed,
            failed = report.failed,
            errors = report.errors,
            duration = report.duration,
            "collection finished"
        );
        Ok(report)
    }

    /// Runs one case on its own, enabled or not, with an empty execution record.
    pub async fn run_case(&self, case_id: &str, env_name: Option<&str>) -> Result<TestResult> {
        let case = self.store.test_case(case_id)?;
        let mut record = ExecutionRecord::new();
        let result = self.cases.run(&case, env_name, &mut record).await;
        self.persist(&result);
        Ok(result)
    }

    fn persist(&self, result: &TestResult) {
        if !self.cases.config().persist_results {
            return;
        }
        if let Err(e) = self.store.save_result(result) {
            tracing::warn!(result = %result.id, "failed to persist result: {e}");
        }
    }
}
