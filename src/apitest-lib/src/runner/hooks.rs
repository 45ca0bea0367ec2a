use crate::core::error::HookError;
use crate::model::{TestCase, TestResult};
use async_trait::async_trait;

/// Callbacks around each executed case. Both default to no-ops.
#[async_trait]
pub trait RunHooks: Send + Sync {
    /// An error here turns the case into an `error` result before any HTTP call.
    async fn before_case(&self, _case: &TestCase) -> Result<(), HookError> {
        Ok(())
    }

    /// Sees the final result. An error is recorded but never changes the status.
    async fn after_case(&self, _case: &TestCase, _result: &TestResult) -> Result<(), HookError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl RunHooks for NoHooks {}
