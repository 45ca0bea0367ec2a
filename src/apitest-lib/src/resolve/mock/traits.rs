use serde_json::Value;

/// A synthetic-data generator addressed as `@name` or `@name(args)`.
pub trait MockDirective: Send + Sync {
    fn name(&self) -> &str;

    fn validate_args(&self, _args: &[String]) -> Result<(), String> {
        Ok(())
    }

    fn generate(&self, args: &[String]) -> Result<Value, String>;
}
