use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;

lazy_static! {
    static ref NAME_REGEX: Regex = Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_/-]*$").unwrap();
    static ref ID_REGEX: Regex = Regex::new(r"^[a-zA-Z0-9_][a-zA-Z0-9_.:-]*$").unwrap();
}

pub fn validate_path_exists(path: &str) -> Result<String, String> {
    if Path::new(path).exists() {
        Ok(path.to_string())
    } else {
        Err(format!("Path does not exist: {path}"))
    }
}

pub fn validate_name(name: &str) -> Result<String, String> {
    if name.len() > 50 {
        return Err("Name must be 50 characters or less".to_string());
    }
    if !NAME_REGEX.is_match(name) {
        return Err("Name must match pattern: ^[a-zA-Z_][a-zA-Z0-9_/-]*$".to_string());
    }
    Ok(name.to_string())
}

/// Ids end up in result file paths, so separators are rejected.
pub fn validate_id(id: &str) -> Result<String, String> {
    if id.len() > 64 {
        return Err("Id must be 64 characters or less".to_string());
    }
    if !ID_REGEX.is_match(id) {
        return Err("Id must match pattern: ^[a-zA-Z0-9_][a-zA-Z0-9_.:-]*$".to_string());
    }
    Ok(id.to_string())
}

pub fn validate_millis(value: &str) -> Result<u64, String> {
    match value.parse::<u64>() {
        Ok(0) => Err("Timeout must be greater than 0".to_string()),
        Ok(ms) => Ok(ms),
        Err(_) => Err(format!("Invalid number of milliseconds: {value}")),
    }
}
