use crate::commands::collection::CollectionIdArgs;
use crate::commands::shared::{OutputArgs, SourceArgs};
use apitest_lib::model::TestStatus;
use apitest_lib::Store;
use clap::{Args, Subcommand};
use serde::Serialize;

#[derive(Serialize)]
pub struct ResultView {
    pub id: String,
    pub case: String,
    pub status: TestStatus,
    pub duration: String,
    pub created_at: String,
}

#[derive(Debug, Args)]
#[command(about = "Inspect stored test results")]
pub struct ResultCommand {
    #[command(subcommand)]
    pub command: ResultSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum ResultSubcommand {
    #[command(about = "List stored results of a collection")]
    List(ListArgs),
}

#[derive(Debug, Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub collection_args: CollectionIdArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

pub fn execute_list(args: &ListArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = args.source.open_store()?;
    // Unknown ids should not look like "no results yet".
    store.collection(&args.collection_args.collection)?;

    let views: Vec<_> = store
        .results(&args.collection_args.collection)?
        .into_iter()
        .map(|result| ResultView {
            id: result.id,
            case: result.test_case_name,
            status: result.status,
            duration: format!("{} ms", result.duration),
            created_at: result.created_at.to_rfc3339(),
        })
        .collect();

    let formatter = crate::core::formatter::get_formatter(&args.output.output);
    print!(
        "{}",
        formatter.format_list(&views, "Results found:", "No results found")
    );
    Ok(())
}
