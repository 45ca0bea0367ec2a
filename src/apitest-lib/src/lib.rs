pub mod client;
pub mod core;
pub mod model;
pub mod resolve;
pub mod runner;
pub mod sandbox;
pub mod store;

pub use client::execute_request;
pub use crate::core::config::RunnerConfig;
pub use crate::core::error::{ApiTestError, Result};
pub use resolve::{resolve_value, ExecutionRecord, Resolver};
pub use runner::{CollectionRunner, RunHooks, TestCaseRunner};
pub use sandbox::AssertionEvaluator;
pub use store::{FileStore, MemoryStore, Store};
