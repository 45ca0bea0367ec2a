//! Persistence seam for projects, test definitions and results.

pub mod file;
pub mod memory;

use crate::core::error::Result;
use crate::model::{Interface, Project, TestCase, TestCollection, TestResult};

pub use file::{FileStore, ProjectDocument, PROJECT_FILE, RESULTS_DIR};
pub use memory::MemoryStore;

pub trait Store: Send + Sync {
    fn project(&self, id: &str) -> Result<Project>;

    fn interface(&self, id: &str) -> Result<Interface>;

    fn collections(&self) -> Result<Vec<TestCollection>>;

    fn collection(&self, id: &str) -> Result<TestCollection>;

    /// All cases of a collection, enabled or not, in storage order.
    fn test_cases(&self, collection_id: &str) -> Result<Vec<TestCase>>;

    fn test_case(&self, id: &str) -> Result<TestCase>;

    fn save_result(&self, result: &TestResult) -> Result<()>;

    /// Stored results of a collection, oldest first.
    fn results(&self, collection_id: &str) -> Result<Vec<TestResult>>;

    /// Removes the collection together with its cases and results.
    fn delete_collection(&self, id: &str) -> Result<()>;
}
