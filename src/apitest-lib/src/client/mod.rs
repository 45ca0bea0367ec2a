pub mod http;
pub mod url;

pub use http::{execute_request, HttpResponse, RequestDescriptor};
pub use url::{build_url, fill_path_params};
