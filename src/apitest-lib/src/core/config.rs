use crate::core::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const CONFIG_FILE: &str = "apitest.toml";

/// Tunables for one run. Loaded from `apitest.toml` next to the project file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Upper bound for a single HTTP call.
    pub request_timeout_ms: u64,
    /// Upper bound for a single assertion script.
    pub script_timeout_ms: u64,
    /// Fail the case instead of passing unresolved `$.` references through.
    pub strict_resolution: bool,
    /// Write one result file per executed case.
    pub persist_results: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: 30_000,
            script_timeout_ms: 10_000,
            strict_resolution: false,
            persist_results: true,
        }
    }
}

impl RunnerConfig {
    /// Reads `apitest.toml` from `dir`, falling back to defaults when absent.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: Self = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn script_timeout(&self) -> Duration {
        Duration::from_millis(self.script_timeout_ms)
    }
}
