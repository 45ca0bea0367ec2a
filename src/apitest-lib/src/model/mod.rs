pub mod collection;
pub mod http_method;
pub mod interface;
pub mod project;
pub mod report;
pub mod test_case;
pub mod test_result;

pub use collection::TestCollection;
pub use http_method::HttpMethod;
pub use interface::{Interface, InterfaceStatus, ParamSpec};
pub use project::{Environment, Project};
pub use report::RunReport;
pub use test_case::{RequestTemplate, TestCase};
pub use test_result::{
    AssertionResult, CapturedRequest, CapturedResponse, ErrorInfo, TestResult, TestStatus,
};
