use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::collections::BTreeMap;

lazy_static! {
    static ref PLACEHOLDER: Regex = Regex::new(r"\{\{\s*([a-zA-Z_][a-zA-Z0-9_.-]*)\s*\}\}").unwrap();
}

/// Replaces `{{ name }}` with the environment variable `name`; unknown names stay verbatim.
pub fn interpolate(input: &str, variables: &BTreeMap<String, String>) -> String {
    if variables.is_empty() || !input.contains("{{") {
        return input.to_string();
    }
    PLACEHOLDER
        .replace_all(input, |caps: &Captures| match variables.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}
