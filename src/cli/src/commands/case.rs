use crate::commands::collection::CaseOutcomeView;
use crate::commands::shared::{EnvArgs, OutputArgs, RunOverrides, SourceArgs};
use crate::commands::validators;
use crate::core::error::TestsFailed;
use crate::core::formatter::{get_formatter, OutputFormat};
use apitest_lib::model::TestStatus;
use apitest_lib::CollectionRunner;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
#[command(about = "Run single test cases")]
pub struct CaseCommand {
    #[command(subcommand)]
    pub command: CaseSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum CaseSubcommand {
    #[command(about = "Run one test case, even if it is disabled")]
    Run(RunArgs),
}

#[derive(Debug, Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[arg(
        short = 'n',
        long = "case",
        alias = "name",
        help = "Test case id",
        value_parser = validators::validate_id
    )]
    pub case: String,

    #[command(flatten)]
    pub env_args: EnvArgs,

    #[command(flatten)]
    pub overrides: RunOverrides,

    #[command(flatten)]
    pub output: OutputArgs,
}

pub async fn execute_run(args: &RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = args.source.open_store()?;
    let config = args.overrides.config(&args.source.project_dir())?;

    let runner = CollectionRunner::new(store, config);
    let result = runner
        .run_case(&args.case, args.env_args.environment.as_deref())
        .await?;

    let formatter = get_formatter(&args.output.output);
    match args.output.output {
        OutputFormat::Json => print!("{}", formatter.format(&result)),
        OutputFormat::Text => print!("{}", formatter.format(&CaseOutcomeView::from(&result))),
    }

    match result.status {
        TestStatus::Passed => Ok(()),
        status => Err(Box::new(TestsFailed {
            total: 1,
            failed: usize::from(status == TestStatus::Failed),
            errors: usize::from(status == TestStatus::Error),
        })),
    }
}
