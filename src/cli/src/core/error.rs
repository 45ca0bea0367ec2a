use thiserror::Error;

/// Raised after the report is printed so the process exits non-zero.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{failed} failed and {errors} errored out of {total} test cases")]
pub struct TestsFailed {
    pub total: usize,
    pub failed: usize,
    pub errors: usize,
}
