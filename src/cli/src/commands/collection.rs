use crate::commands::shared::{EnvArgs, OutputArgs, RunOverrides, SourceArgs};
use crate::commands::validators;
use crate::core::error::TestsFailed;
use crate::core::formatter::{get_formatter, OutputFormat};
use apitest_lib::model::{RunReport, TestResult, TestStatus};
use apitest_lib::{CollectionRunner, Store};
use clap::{Args, Subcommand};
use serde::Serialize;

#[derive(Serialize)]
pub struct CollectionView {
    pub id: String,
    pub name: String,
    pub cases: usize,
    pub enabled: usize,
}

#[derive(Serialize)]
pub struct CaseOutcomeView {
    pub case: String,
    pub status: TestStatus,
    pub duration: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<&TestResult> for CaseOutcomeView {
    fn from(result: &TestResult) -> Self {
        let message = match result.status {
            TestStatus::Error => result.error.as_ref().map(|e| e.message.clone()),
            TestStatus::Failed => result.assertion_result.as_ref().map(|a| a.message.clone()),
            _ => None,
        };
        Self {
            case: result.test_case_name.clone(),
            status: result.status,
            duration: format!("{} ms", result.duration),
            message,
        }
    }
}

#[derive(Serialize)]
pub struct ReportView {
    pub collection: String,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
    pub duration: String,
    pub results: Vec<CaseOutcomeView>,
}

impl From<&RunReport> for ReportView {
    fn from(report: &RunReport) -> Self {
        Self {
            collection: report.collection_name.clone(),
            total: report.total,
            passed: report.passed,
            failed: report.failed,
            errors: report.errors,
            duration: format!("{} ms", report.duration),
            results: report.results.iter().map(CaseOutcomeView::from).collect(),
        }
    }
}

#[derive(Debug, Args)]
#[command(about = "Manage and run test collections")]
pub struct CollectionCommand {
    #[command(subcommand)]
    pub command: CollectionSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum CollectionSubcommand {
    #[command(about = "List collections")]
    List(ListArgs),
    #[command(about = "Run every enabled case of a collection")]
    Run(RunArgs),
    #[command(about = "Delete a collection with its cases and results")]
    Delete(DeleteArgs),
}

#[derive(Debug, Args)]
pub struct CollectionIdArgs {
    #[arg(
        short = 'c',
        long = "collection",
        help = "Collection id",
        value_parser = validators::validate_id
    )]
    pub collection: String,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub collection_args: CollectionIdArgs,

    #[command(flatten)]
    pub env_args: EnvArgs,

    #[command(flatten)]
    pub overrides: RunOverrides,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub collection_args: CollectionIdArgs,
}

pub fn execute_list(args: &ListArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = args.source.open_store()?;
    let mut views = Vec::new();
    for collection in store.collections()? {
        let cases = store.test_cases(&collection.id)?;
        views.push(CollectionView {
            enabled: cases.iter().filter(|c| c.enabled).count(),
            cases: cases.len(),
            id: collection.id,
            name: collection.name,
        });
    }

    let formatter = get_formatter(&args.output.output);
    print!(
        "{}",
        formatter.format_list(&views, "Collections found:", "No collections found")
    );
    Ok(())
}

pub async fn execute_run(args: &RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = args.source.open_store()?;
    let config = args.overrides.config(&args.source.project_dir())?;

    let runner = CollectionRunner::new(store, config);
    let report = runner
        .run(
            &args.collection_args.collection,
            args.env_args.environment.as_deref(),
        )
        .await?;

    let formatter = get_formatter(&args.output.output);
    match args.output.output {
        OutputFormat::Json => print!("{}", formatter.format(&report)),
        OutputFormat::Text => print!("{}", formatter.format(&ReportView::from(&report))),
    }

    if report.is_success() {
        Ok(())
    } else {
        Err(Box::new(TestsFailed {
            total: report.total,
            failed: report.failed,
            errors: report.errors,
        }))
    }
}

pub fn execute_delete(args: &DeleteArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = args.source.open_store()?;
    store.delete_collection(&args.collection_args.collection)?;
    println!("Deleted collection {}", args.collection_args.collection);
    Ok(())
}
