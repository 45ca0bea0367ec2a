use super::HttpMethod;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterfaceStatus {
    #[default]
    Design,
    Developing,
    Completed,
    Deprecated,
}

/// One declared query or header parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interface {
    pub id: String,
    pub project_id: String,
    pub name: String,
    pub method: HttpMethod,
    /// Path template with `{param}` placeholders.
    pub path: String,
    #[serde(default)]
    pub query: Vec<ParamSpec>,
    #[serde(default)]
    pub headers: Vec<ParamSpec>,
    #[serde(default)]
    pub body: Value,
    #[serde(default)]
    pub status: InterfaceStatus,
}
