use clap::ValueEnum;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

fn render_text<T: Serialize + ?Sized>(model: &T) -> String {
    let value = serde_json::to_value(model).unwrap_or(Value::Null);
    render_value(&value, 0)
}

fn inline(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn render_value(value: &Value, indent: usize) -> String {
    let pad = " ".repeat(indent);
    match value {
        Value::Null => String::new(),
        Value::Bool(_) | Value::Number(_) => format!("{pad}{value}\n"),
        Value::String(s) => s.lines().map(|line| format!("{pad}{line}\n")).collect(),
        Value::Array(items) => {
            let mut out = String::new();
            for item in items {
                match item {
                    Value::Array(_) | Value::Object(_) => {
                        out.push_str(&format!("{pad}-\n"));
                        out.push_str(&render_value(item, indent + 2));
                    }
                    _ => out.push_str(&format!("{pad}- {}\n", inline(item))),
                }
            }
            out
        }
        Value::Object(map) => {
            let mut out = String::new();
            for (key, v) in map {
                match v {
                    // Absent optional fields.
                    Value::Null => {}
                    Value::Array(a) if a.is_empty() => {}
                    Value::Array(_) | Value::Object(_) => {
                        out.push_str(&format!("{pad}{key}:\n"));
                        out.push_str(&render_value(v, indent + 2));
                    }
                    _ => out.push_str(&format!("{pad}{key}: {}\n", inline(v))),
                }
            }
            out
        }
    }
}

pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format<T: Serialize>(&self, model: &T) -> String {
        match self.format {
            OutputFormat::Text => render_text(model),
            OutputFormat::Json => {
                let mut out = serde_json::to_string_pretty(model).unwrap_or_default();
                out.push('\n');
                out
            }
        }
    }

    pub fn format_list<T: Serialize>(&self, list: &[T], title: &str, empty_msg: &str) -> String {
        match self.format {
            OutputFormat::Text => {
                if list.is_empty() {
                    format!("{empty_msg}\n")
                } else if title.is_empty() {
                    render_text(list)
                } else {
                    format!("{title}\n{}", render_text(list))
                }
            }
            OutputFormat::Json => {
                let mut out =
                    serde_json::to_string_pretty(list).unwrap_or_else(|_| "[]".to_string());
                out.push('\n');
                out
            }
        }
    }
}

pub fn get_formatter(output_format: &OutputFormat) -> Formatter {
    Formatter::new(*output_format)
}
