use crate::core::json::to_plain_string;
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde_json::{Map, Value};

lazy_static! {
    static ref PATH_PARAM: Regex = Regex::new(r"\{([a-zA-Z_][a-zA-Z0-9_-]*)\}").unwrap();
}

/// Substitutes `{name}` placeholders; placeholders without a value stay as-is.
pub fn fill_path_params(path: &str, params: &Map<String, Value>) -> String {
    if params.is_empty() {
        return path.to_string();
    }
    PATH_PARAM
        .replace_all(path, |caps: &Captures| match params.get(&caps[1]) {
            Some(Value::Null) | None => caps[0].to_string(),
            Some(value) => to_plain_string(value),
        })
        .into_owned()
}

/// Joins `base_url` and `path` with exactly one `/`. Absolute paths win.
pub fn build_url(base_url: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    let base = base_url.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    match (base.is_empty(), path.is_empty()) {
        (true, _) => format!("/{path}"),
        (false, true) => base.to_string(),
        (false, false) => format!("{base}/{path}"),
    }
}
