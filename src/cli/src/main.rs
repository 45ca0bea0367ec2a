use clap::Parser;

mod commands;
mod core;

use commands::Commands;
use crate::core::exit_code::ExitCode;

#[derive(Parser)]
#[command(name = "apitest")]
#[command(about = "Runs API test collections and scores responses with assertion scripts.")]
#[command(version = apitest_lib::core::version::app_version())]
struct Args {
    #[arg(short, long, help = "Enable debug logging", global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        let exit_code = ExitCode::from(&e);
        std::process::exit(exit_code.code());
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    crate::core::logger::init(args.debug);

    match args.command {
        Commands::Collection(collection_command) => match collection_command.command {
            commands::collection::CollectionSubcommand::List(list_args) => {
                commands::collection::execute_list(&list_args)
            }
            commands::collection::CollectionSubcommand::Run(run_args) => {
                commands::collection::execute_run(&run_args).await
            }
            commands::collection::CollectionSubcommand::Delete(delete_args) => {
                commands::collection::execute_delete(&delete_args)
            }
        },
        Commands::Case(case_command) => match case_command.command {
            commands::case::CaseSubcommand::Run(run_args) => {
                commands::case::execute_run(&run_args).await
            }
        },
        Commands::Env(env_command) => match env_command.command {
            commands::env::EnvSubcommand::List(list_args) => commands::env::execute_list(&list_args),
        },
        Commands::Result(result_command) => match result_command.command {
            commands::result::ResultSubcommand::List(list_args) => {
                commands::result::execute_list(&list_args)
            }
        },
    }
}
