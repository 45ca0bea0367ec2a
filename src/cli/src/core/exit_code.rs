use crate::core::error::TestsFailed;
use apitest_lib::ApiTestError;

/// Exit codes for the apitest CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
pub enum ExitCode {
    Success = 0,
    /// General/unspecified error
    GeneralError = 1,
    /// Invalid project file or configuration
    ConfigError = 3,
    /// File not found or IO error
    FileError = 4,
    /// Collection, case, interface or project not found
    NotFoundError = 5,
    /// At least one test case failed or errored
    TestFailure = 9,
}

impl ExitCode {
    pub fn code(&self) -> i32 {
        *self as i32
    }
}

impl From<&ApiTestError> for ExitCode {
    fn from(error: &ApiTestError) -> Self {
        match error {
            ApiTestError::Io(_) => ExitCode::FileError,
            ApiTestError::Json(_) | ApiTestError::Config(_) | ApiTestError::Validation(_) => {
                ExitCode::ConfigError
            }
            ApiTestError::CollectionNotFound(_)
            | ApiTestError::TestCaseNotFound(_)
            | ApiTestError::InterfaceNotFound(_)
            | ApiTestError::ProjectNotFound(_) => ExitCode::NotFoundError,
            ApiTestError::Store(_) => ExitCode::GeneralError,
        }
    }
}

impl From<&Box<dyn std::error::Error>> for ExitCode {
    fn from(error: &Box<dyn std::error::Error>) -> Self {
        if error.downcast_ref::<TestsFailed>().is_some() {
            ExitCode::TestFailure
        } else if let Some(api_error) = error.downcast_ref::<ApiTestError>() {
            ExitCode::from(api_error)
        } else {
            ExitCode::GeneralError
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_errors_map_to_codes() {
        let not_found: Box<dyn std::error::Error> =
            Box::new(ApiTestError::CollectionNotFound("c".into()));
        assert_eq!(ExitCode::from(&not_found).code(), 5);

        let io: Box<dyn std::error::Error> = Box::new(ApiTestError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "gone",
        )));
        assert_eq!(ExitCode::from(&io).code(), 4);

        let invalid: Box<dyn std::error::Error> =
            Box::new(ApiTestError::Validation("bad".into()));
        assert_eq!(ExitCode::from(&invalid), ExitCode::ConfigError);
    }

    #[test]
    fn test_failures_and_unknown_errors() {
        let failed: Box<dyn std::error::Error> = Box::new(TestsFailed {
            total: 3,
            failed: 1,
            errors: 0,
        });
        assert_eq!(ExitCode::from(&failed).code(), 9);

        let other: Box<dyn std::error::Error> = "something else".into();
        assert_eq!(ExitCode::from(&other), ExitCode::GeneralError);
    }
}
