use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_ENVIRONMENT: &str = "default";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    pub name: String,
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub environments: Vec<Environment>,
}

impl Project {
    /// Picks the requested environment, else one named `default`, else the first.
    pub fn select_environment(&self, requested: Option<&str>) -> Option<&Environment> {
        requested
            .and_then(|name| self.environments.iter().find(|env| env.name == name))
            .or_else(|| {
                self.environments
                    .iter()
                    .find(|env| env.name == DEFAULT_ENVIRONMENT)
            })
            .or_else(|| self.environments.first())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(name: &str, base_url: &str) -> Environment {
        Environment {
            name: name.to_string(),
            base_url: base_url.to_string(),
            variables: BTreeMap::new(),
            headers: BTreeMap::new(),
        }
    }

    fn project(envs: Vec<Environment>) -> Project {
        Project {
            id: "p1".to_string(),
            name: "Shop".to_string(),
            environments: envs,
        }
    }

    fn selected_url<'a>(p: &'a Project, requested: Option<&str>) -> &'a str {
        p.select_environment(requested)
            .map(|env| env.base_url.as_str())
            .unwrap_or_default()
    }

    #[test]
    fn test_select_by_name() {
        let p = project(vec![
            env("default", "http://default"),
            env("staging", "http://staging"),
        ]);
        assert_eq!(selected_url(&p, Some("staging")), "http://staging");
    }

    #[test]
    fn test_select_falls_back_to_default_name() {
        let p = project(vec![
            env("qa", "http://qa"),
            env("default", "http://default"),
        ]);
        assert_eq!(selected_url(&p, Some("missing")), "http://default");
        assert_eq!(selected_url(&p, None), "http://default");
    }

    #[test]
    fn test_select_falls_back_to_first() {
        let p = project(vec![env("qa", "http://qa"), env("prod", "http://prod")]);
        assert_eq!(selected_url(&p, Some("missing")), "http://qa");
    }

    #[test]
    fn test_no_environments_selects_nothing() {
        let p = project(vec![]);
        assert!(p.select_environment(Some("qa")).is_none());
    }
}
