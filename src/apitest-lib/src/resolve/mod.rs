//! Expansion of request templates before a call is issued.
//!
//! Every string leaf goes through, in order: environment `{{var}}`
//! interpolation, `$.<key>.<params|body|header>.<path>` substitution against
//! the execution record, and `@directive` mock-data expansion. A result that
//! starts with `{` or `[` is then parsed as JSON when possible.

pub mod mock;
pub mod record;
pub mod reference;
pub mod variables;

pub use record::{ExecutionRecord, RecordEntry};

use crate::core::error::ResolveError;
use crate::core::json::to_plain_string;
use reference::{find_references, Lookup};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub struct Resolver<'a> {
    record: &'a ExecutionRecord,
    variables: Option<&'a BTreeMap<String, String>>,
    strict: bool,
}

impl<'a> Resolver<'a> {
    pub fn new(record: &'a ExecutionRecord) -> Self {
        Self {
            record,
            variables: None,
            strict: false,
        }
    }

    pub fn with_variables(mut self, variables: &'a BTreeMap<String, String>) -> Self {
        self.variables = Some(variables);
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Resolves every string leaf of `value`. Object keys are left alone.
    pub fn resolve_value(&self, value: &Value) -> Result<Value, ResolveError> {
        match value {
            Value::String(s) => self.resolve_string(s),
            Value::Array(items) => items
                .iter()
                .map(|item| self.resolve_value(item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            Value::Object(map) => self.resolve_map(map).map(Value::Object),
            other => Ok(other.clone()),
        }
    }

    pub fn resolve_map(&self, map: &Map<String, Value>) -> Result<Map<String, Value>, ResolveError> {
        let mut out = Map::with_capacity(map.len());
        for (key, value) in map {
            out.insert(key.clone(), self.resolve_value(value)?);
        }
        Ok(out)
    }

    pub fn resolve_string(&self, input: &str) -> Result<Value, ResolveError> {
        let interpolated = match self.variables {
            Some(vars) => variables::interpolate(input, vars),
            None => input.to_string(),
        };

        let substituted = self.substitute_references(&interpolated)?;
        let text = match substituted {
            Value::String(s) => s,
            typed => return Ok(typed),
        };

        let expanded = if text.contains('@') {
            mock::expand(&text)
        } else {
            Value::String(text)
        };

        Ok(match expanded {
            Value::String(s) => parse_structured(s),
            typed => typed,
        })
    }

    fn substitute_references(&self, input: &str) -> Result<Value, ResolveError> {
        if !input.contains("$.") {
            return Ok(Value::String(input.to_string()));
        }
        let refs = find_references(input);
        if refs.is_empty() {
            return Ok(Value::String(input.to_string()));
        }

        let mut out = String::with_capacity(input.len());
        let mut last = 0;
        for reference in &refs {
            out.push_str(&input[last..reference.span.start]);
            last = reference.span.end;
            let text = reference.text(input);

            match reference.lookup(self.record) {
                Lookup::Found(value) => {
                    if refs.len() == 1 && reference.span == (0..input.len()) {
                        return Ok(value);
                    }
                    out.push_str(&to_plain_string(&value));
                }
                Lookup::UnknownKey => {
                    tracing::warn!(reference = text, "no execution record for key '{}'", reference.key);
                    if self.strict {
                        return Err(ResolveError::UnknownKey {
                            key: reference.key.clone(),
                            reference: text.to_string(),
                        });
                    }
                    out.push_str(text);
                }
                Lookup::MissingPath => {
                    tracing::debug!(reference = text, "path not found, keeping reference text");
                    if self.strict {
                        return Err(ResolveError::MissingPath {
                            path: reference.dotted_path(),
                            reference: text.to_string(),
                        });
                    }
                    out.push_str(text);
                }
            }
        }
        out.push_str(&input[last..]);
        Ok(Value::String(out))
    }
}

fn parse_structured(s: String) -> Value {
    if s.starts_with('{') || s.starts_with('[') {
        if let Ok(parsed) = serde_json::from_str::<Value>(&s) {
            return parsed;
        }
    }
    Value::String(s)
}

/// Best-effort resolution of `value` against `record`.
pub fn resolve_value(value: &Value, record: &ExecutionRecord) -> Value {
    Resolver::new(record)
        .resolve_value(value)
        .unwrap_or_else(|_| value.clone())
}
