use super::Store;
use crate::core::error::{ApiTestError, Result};
use crate::model::{Interface, Project, TestCase, TestCollection, TestResult};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
struct Tables {
    projects: Vec<Project>,
    interfaces: Vec<Interface>,
    collections: Vec<TestCollection>,
    test_cases: Vec<TestCase>,
    results: Vec<TestResult>,
}

/// In-process store, mainly for embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_project(self, project: Project) -> Self {
        self.write().projects.push(project);
        self
    }

    pub fn with_interface(self, interface: Interface) -> Self {
        self.write().interfaces.push(interface);
        self
    }

    pub fn with_collection(self, collection: TestCollection) -> Self {
        self.write().collections.push(collection);
        self
    }

    pub fn with_test_case(self, test_case: TestCase) -> Self {
        self.write().test_cases.push(test_case);
        self
    }

    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Store for MemoryStore {
    fn project(&self, id: &str) -> Result<Project> {
        self.read()
            .projects
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| ApiTestError::ProjectNotFound(id.to_string()))
    }

    fn interface(&self, id: &str) -> Result<Interface> {
        self.read()
            .interfaces
            .iter()
            .find(|i| i.id == id)
            .cloned()
            .ok_or_else(|| ApiTestError::InterfaceNotFound(id.to_string()))
    }

    fn collections(&self) -> Result<Vec<TestCollection>> {
        Ok(self.read().collections.clone())
    }

    fn collection(&self, id: &str) -> Result<TestCollection> {
        self.read()
            .collections
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| ApiTestError::CollectionNotFound(id.to_string()))
    }

    fn test_cases(&self, collection_id: &str) -> Result<Vec<TestCase>> {
        Ok(self
            .read()
            .test_cases
            .iter()
            .filter(|c| c.collection_id == collection_id)
            .cloned()
            .collect())
    }

    fn test_case(&self, id: &str) -> Result<TestCase> {
        self.read()
            .test_cases
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| ApiTestError::TestCaseNotFound(id.to_string()))
    }

    fn save_result(&self, result: &TestResult) -> Result<()> {
        let mut tables = self.write();
        if tables.results.iter().any(|r| r.id == result.id) {
            return Err(ApiTestError::Store(format!(
                "result {} already exists",
                result.id
            )));
        }
        tables.results.push(result.clone());
        Ok(())
    }

    fn results(&self, collection_id: &str) -> Result<Vec<TestResult>> {
        Ok(self
            .read()
            .results
            .iter()
            .filter(|r| r.collection_id == collection_id)
            .cloned()
            .collect())
    }

    fn delete_collection(&self, id: &str) -> Result<()> {
        let mut tables = self.write();
        let before = tables.collections.len();
        tables.collections.retain(|c| c.id != id);
        if tables.collections.len() == before {
            return Err(ApiTestError::CollectionNotFound(id.to_string()));
        }
        tables.test_cases.retain(|c| c.collection_id != id);
        tables.results.retain(|r| r.collection_id != id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RequestTemplate;

    fn collection(id: &str) -> TestCollection {
        TestCollection {
            id: id.to_string(),
            project_id: "p1".to_string(),
            name: format!("collection {id}"),
            description: None,
        }
    }

    fn case(id: &str, collection_id: &str) -> TestCase {
        TestCase {
            id: id.to_string(),
            collection_id: collection_id.to_string(),
            interface_id: "i1".to_string(),
            name: id.to_string(),
            order: 0,
            enabled: true,
            request: RequestTemplate::default(),
            assertion_script: None,
        }
    }

    #[test]
    fn test_lookups_report_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.collection("nope"),
            Err(ApiTestError::CollectionNotFound(_))
        ));
        assert!(matches!(
            store.interface("nope"),
            Err(ApiTestError::InterfaceNotFound(_))
        ));
        assert!(matches!(
            store.test_case("nope"),
            Err(ApiTestError::TestCaseNotFound(_))
        ));
    }

    #[test]
    fn test_results_are_create_only() {
        let store = MemoryStore::new();
        let result = TestResult::pending("t1", "t1", "c1");
        store.save_result(&result).unwrap();
        assert!(store.save_result(&result).is_err());
        assert_eq!(store.results("c1").unwrap().len(), 1);
    }

    #[test]
    fn test_delete_collection_cascades() {
        let store = MemoryStore::new()
            .with_collection(collection("c1"))
            .with_collection(collection("c2"))
            .with_test_case(case("a", "c1"))
            .with_test_case(case("b", "c2"));
        store
            .save_result(&TestResult::pending("a", "a", "c1"))
            .unwrap();

        store.delete_collection("c1").unwrap();

        assert_eq!(store.collections().unwrap().len(), 1);
        assert!(store.test_cases("c1").unwrap().is_empty());
        assert!(store.results("c1").unwrap().is_empty());
        assert_eq!(store.test_cases("c2").unwrap().len(), 1);
        assert!(store.delete_collection("c1").is_err());
    }
}
