use super::Store;
use crate::core::error::{ApiTestError, Result};
use crate::model::{Interface, Project, TestCase, TestCollection, TestResult};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard};

pub const PROJECT_FILE: &str = "project.json";
pub const RESULTS_DIR: &str = "results";

/// On-disk shape of `project.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDocument {
    pub project: Project,
    #[serde(default)]
    pub interfaces: Vec<Interface>,
    #[serde(default)]
    pub collections: Vec<TestCollection>,
    #[serde(default)]
    pub test_cases: Vec<TestCase>,
}

/// Project directory store: definitions from `project.json`, results as one
/// file each under `results/<collection id>/`.
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
    document: RwLock<ProjectDocument>,
}

impl FileStore {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let path = root.join(PROJECT_FILE);
        if !path.is_file() {
            return Err(ApiTestError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} not found", path.display()),
            )));
        }
        let content = fs::read_to_string(&path)?;
        let document: ProjectDocument = serde_json::from_str(&content)?;
        tracing::debug!(
            project = %document.project.id,
            collections = document.collections.len(),
            cases = document.test_cases.len(),
            "loaded project from {}",
            path.display()
        );
        Ok(Self {
            root,
            document: RwLock::new(document),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The single project this directory describes.
    pub fn current_project(&self) -> Project {
        self.read().project.clone()
    }

    fn read(&self) -> RwLockReadGuard<'_, ProjectDocument> {
        self.document
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn results_dir(&self, collection_id: &str) -> PathBuf {
        self.root.join(RESULTS_DIR).join(collection_id)
    }

    fn write_document(&self, document: &ProjectDocument) -> Result<()> {
        let content = serde_json::to_string_pretty(document)?;
        fs::write(self.root.join(PROJECT_FILE), content)?;
        Ok(())
    }
}

impl Store for FileStore {
    fn project(&self, id: &str) -> Result<Project> {
        let document = self.read();
        if document.project.id == id {
            Ok(document.project.clone())
        } else {
            Err(ApiTestError::ProjectNotFound(id.to_string()))
        }
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
        let dir = self.results_dir(&result.collection_id);
        fs::create_dir_all(&dir)?;
        let path = dir.join(format!("{}.json", result.id));
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::AlreadyExists {
                    ApiTestError::Store(format!("result {} already exists", result.id))
                } else {
                    ApiTestError::Io(e)
                }
            })?;
        file.write_all(serde_json::to_string_pretty(result)?.as_bytes())?;
        tracing::debug!("saved result to {}", path.display());
        Ok(())
    }

    fn results(&self, collection_id: &str) -> Result<Vec<TestResult>> {
        let dir = self.results_dir(collection_id);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut results = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let content = fs::read_to_string(&path)?;
            match serde_json::from_str::<TestResult>(&content) {
                Ok(result) => results.push(result),
                Err(e) => tracing::warn!("skipping unreadable result {}: {e}", path.display()),
            }
        }
        results.sort_by_key(|r| r.created_at);
        Ok(results)
    }

    fn delete_collection(&self, id: &str) -> Result<()> {
        let mut document = self
            .document
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if !document.collections.iter().any(|c| c.id == id) {
            return Err(ApiTestError::CollectionNotFound(id.to_string()));
        }

        let mut updated = document.clone();
        updated.collections.retain(|c| c.id != id);
        updated.test_cases.retain(|c| c.collection_id != id);
        self.write_document(&updated)?;
        *document = updated;

        let dir = self.results_dir(id);
        if dir.is_dir() {
            fs::remove_dir_all(&dir)?;
        }
        Ok(())
    }
}
