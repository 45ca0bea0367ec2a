use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Unresolved request: every string leaf may carry `{{var}}`, `$.` or `@` expressions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestTemplate {
    pub method: String,
    pub path: String,
    pub query: Map<String, Value>,
    pub body: Value,
    pub headers: Map<String, Value>,
    pub path_params: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    pub id: String,
    pub collection_id: String,
    pub interface_id: String,
    pub name: String,
    #[serde(default)]
    pub order: i64,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default)]
    pub request: RequestTemplate,
    #[serde(default)]
    pub assertion_script: Option<String>,
}

fn enabled_by_default() -> bool {
    true
}

impl TestCase {
    pub fn has_script(&self) -> bool {
        self.assertion_script
            .as_deref()
            .is_some_and(|s| !s.trim().is_empty())
    }
}
