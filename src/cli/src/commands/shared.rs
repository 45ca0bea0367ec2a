use crate::commands::validators;
use crate::core::formatter::OutputFormat;
use apitest_lib::{FileStore, RunnerConfig};
use clap::Args;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Args)]
pub struct OutputArgs {
    #[arg(
        short = 'o',
        long = "output",
        help = "Output format: text or json",
        default_value_t = OutputFormat::Text,
        value_enum,
        ignore_case = true
    )]
    pub output: OutputFormat,
}

#[derive(Debug, Args)]
pub struct SourceArgs {
    #[arg(
        short = 's',
        long = "source",
        default_value = ".",
        help = "Project directory or its project.json",
        value_parser = validators::validate_path_exists
    )]
    pub source: String,
}

impl SourceArgs {
    /// Directory holding `project.json` and `apitest.toml`.
    pub fn project_dir(&self) -> PathBuf {
        let path = Path::new(&self.source);
        if path.is_file() {
            path.parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."))
        } else {
            path.to_path_buf()
        }
    }

    pub fn open_store(&self) -> Result<Arc<FileStore>, apitest_lib::ApiTestError> {
        Ok(Arc::new(FileStore::open(self.project_dir())?))
    }
}

#[derive(Debug, Args)]
pub struct EnvArgs {
    #[arg(
        short = 'e',
        long = "env",
        alias = "environment",
        help = "Environment name",
        value_parser = validators::validate_name
    )]
    pub environment: Option<String>,
}

#[derive(Debug, Args)]
pub struct RunOverrides {
    #[arg(
        long = "request-timeout",
        value_name = "MS",
        help = "Timeout for each HTTP request",
        value_parser = validators::validate_millis
    )]
    pub request_timeout: Option<u64>,

    #[arg(
        long = "script-timeout",
        value_name = "MS",
        help = "Timeout for each assertion script",
        value_parser = validators::validate_millis
    )]
    pub script_timeout: Option<u64>,

    #[arg(long, help = "Treat unresolved references as errors")]
    pub strict: bool,

    #[arg(long = "no-save", help = "Do not write result files")]
    pub no_save: bool,
}

impl RunOverrides {
    /// `apitest.toml` from the project directory with command-line flags applied.
    pub fn config(&self, project_dir: &Path) -> Result<RunnerConfig, apitest_lib::ApiTestError> {
        let mut config = RunnerConfig::load(project_dir)?;
        if let Some(ms) = self.request_timeout {
            config.request_timeout_ms = ms;
        }
        if let Some(ms) = self.script_timeout {
            config.script_timeout_ms = ms;
        }
        if self.strict {
            config.strict_resolution = true;
        }
        if self.no_save {
            config.persist_results = false;
        }
        tracing::debug!(?config, "runner configuration");
        Ok(config)
    }
}
