pub mod case;
pub mod collection;
pub mod env;
pub mod result;
pub mod shared;
pub mod validators;

use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    Collection(collection::CollectionCommand),
    Case(case::CaseCommand),
    Env(env::EnvCommand),
    Result(result::ResultCommand),
}
