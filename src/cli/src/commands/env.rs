use crate::commands::shared::{OutputArgs, SourceArgs};
use clap::{Args, Subcommand};
use serde::Serialize;

#[derive(Serialize)]
pub struct EnvironmentView {
    pub name: String,
    pub base_url: String,
    pub variables: Vec<String>,
}

#[derive(Debug, Args)]
#[command(about = "Manage environments")]
pub struct EnvCommand {
    #[command(subcommand)]
    pub command: EnvSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum EnvSubcommand {
    #[command(about = "List environments")]
    List(ListArgs),
}

#[derive(Debug, Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

pub fn execute_list(args: &ListArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = args.source.open_store()?;
    let project = store.current_project();
    let views: Vec<_> = project
        .environments
        .into_iter()
        .map(|env| EnvironmentView {
            name: env.name,
            base_url: env.base_url,
            variables: env.variables.into_keys().collect(),
        })
        .collect();

    let formatter = crate::core::formatter::get_formatter(&args.output.output);
    print!(
        "{}",
        formatter.format_list(
            &views,
            "Environments found:",
            "No environments found in project"
        )
    );
    Ok(())
}
