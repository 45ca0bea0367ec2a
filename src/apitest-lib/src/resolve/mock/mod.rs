pub mod datetime;
pub mod identity;
pub mod number;
pub mod person;
pub mod text;
pub mod traits;
pub mod web;

use crate::core::json::to_plain_string;
use lazy_static::lazy_static;
use serde_json::Value;
use std::collections::HashMap;
use traits::MockDirective;

lazy_static! {
    static ref DIRECTIVES: HashMap<String, Box<dyn MockDirective>> = {
        let mut m = HashMap::new();
        register(person::Name, &mut m);
        register(person::First, &mut m);
        register(person::Last, &mut m);
        register(person::Email, &mut m);
        register(number::Integer, &mut m);
        register(number::Natural, &mut m);
        register(number::Float, &mut m);
        register(number::Boolean, &mut m);
        register(text::RandomString, &mut m);
        register(text::Word, &mut m);
        register(text::Sentence, &mut m);
        register(text::Paragraph, &mut m);
        register(identity::Guid, &mut m);
        register(identity::Uuid, &mut m);
        register(identity::ObjectId, &mut m);
        register(datetime::Date, &mut m);
        register(datetime::Time, &mut m);
        register(datetime::DateTime, &mut m);
        register(datetime::Now, &mut m);
        register(web::Url, &mut m);
        register(web::Domain, &mut m);
        register(web::Ip, &mut m);
        register(web::Color, &mut m);
        m
    };
}

fn register<D: MockDirective + 'static>(d: D, m: &mut HashMap<String, Box<dyn MockDirective>>) {
    m.insert(d.name().to_string(), Box::new(d));
}

pub fn get_directive(name: &str) -> Option<&'static dyn MockDirective> {
    DIRECTIVES.get(name).map(|d| d.as_ref())
}

/// A parsed `@name(args)` occurrence.
#[derive(Debug, Clone, PartialEq)]
struct Call {
    name: String,
    args: Vec<String>,
    span: std::ops::Range<usize>,
}

fn split_args(raw: &str) -> Vec<String> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    raw.split(',')
        .map(|a| a.trim().trim_matches(|c| c == '"' || c == '\'').to_string())
        .collect()
}

/// Finds `@name` / `@name(args)` for registered directives only. An `@` glued to a
/// preceding letter or digit (as in an e-mail address) is not a directive.
fn find_calls(input: &str) -> Vec<Call> {
    let bytes = input.as_bytes();
    let mut calls = Vec::new();
    let mut pos = 0;
    while pos < bytes.len() {
        if bytes[pos] != b'@' || (pos > 0 && bytes[pos - 1].is_ascii_alphanumeric()) {
            pos += 1;
            continue;
        }
        let name_start = pos + 1;
        let mut end = name_start;
        while end < bytes.len() && bytes[end].is_ascii_alphabetic() {
            end += 1;
        }
        let name = &input[name_start..end];
        if name.is_empty() || get_directive(name).is_none() {
            pos = end.max(pos + 1);
            continue;
        }

        let mut args = Vec::new();
        if bytes.get(end) == Some(&b'(') {
            if let Some(close) = input[end..].find(')') {
                args = split_args(&input[end + 1..end + close]);
                end += close + 1;
            }
        }
        calls.push(Call {
            name: name.to_string(),
            args,
            span: pos..end,
        });
        pos = end;
    }
    calls
}

fn run(call: &Call) -> Option<Value> {
    let directive = get_directive(&call.name)?;
    match directive
        .validate_args(&call.args)
        .and_then(|_| directive.generate(&call.args))
    {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(directive = %call.name, "mock directive skipped: {e}");
            None
        }
    }
}

/// Expands known directives. A string that is exactly one directive yields the
/// directive's own JSON type; otherwise values are spliced in as text.
pub fn expand(input: &str) -> Value {
    let calls = find_calls(input);
    if calls.is_empty() {
        return Value::String(input.to_string());
    }

    if calls.len() == 1 && calls[0].span == (0..input.len()) {
        return run(&calls[0]).unwrap_or_else(|| Value::String(input.to_string()));
    }

    let mut out = String::with_capacity(input.len());
    let mut last = 0;
    for call in &calls {
        out.push_str(&input[last..call.span.start]);
        match run(call) {
            Some(value) => out.push_str(&to_plain_string(&value)),
            None => out.push_str(&input[call.span.clone()]),
        }
        last = call.span.end;
    }
    out.push_str(&input[last..]);
    Value::String(out)
}

/// Parses `args[idx]` as a number, using `default` when absent.
pub(crate) fn arg_or<T: std::str::FromStr>(args: &[String], idx: usize, default: T) -> Result<T, String> {
    match args.get(idx).map(|a| a.trim()).filter(|a| !a.is_empty()) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|_| format!("invalid argument '{raw}'")),
        None => Ok(default),
    }
}
