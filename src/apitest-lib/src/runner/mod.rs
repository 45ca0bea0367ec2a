pub mod case;
pub mod collection;
pub mod hooks;

pub use case::TestCaseRunner;
pub use collection::CollectionRunner;
pub use hooks::{NoHooks, RunHooks};
