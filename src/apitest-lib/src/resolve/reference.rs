use super::record::ExecutionRecord;
use serde_json::Value;
use std::ops::Range;

const PREFIX: &[u8] = b"$.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefSource {
    Params,
    Body,
    Header,
}

impl RefSource {
    fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "params" => Some(Self::Params),
            "body" => Some(Self::Body),
            "header" => Some(Self::Header),
            _ => None,
        }
    }
}

/// One `$.<key>.<params|body|header>.<path>` occurrence inside a string.
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    pub key: String,
    pub source: RefSource,
    pub path: Vec<String>,
    pub span: Range<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    Found(Value),
    UnknownKey,
    MissingPath,
}

fn is_segment_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}

struct Scanner<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> Range<usize> {
        let start = self.pos;
        while self.pos < self.bytes.len() && pred(self.bytes[self.pos]) {
            self.pos += 1;
        }
        start..self.pos
    }

    fn eat(&mut self, b: u8) -> bool {
        if self.bytes.get(self.pos) == Some(&b) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn next_is_segment_after_dot(&self) -> bool {
        self.bytes.get(self.pos) == Some(&b'.')
            && self
                .bytes
                .get(self.pos + 1)
                .is_some_and(|b| is_segment_byte(*b))
    }
}

/// Parses a reference starting exactly at `start` (which must point at `$.`).
fn parse_at(input: &str, start: usize) -> Option<Reference> {
    let mut s = Scanner {
        bytes: input.as_bytes(),
        pos: start + PREFIX.len(),
    };

    let key = s.take_while(is_segment_byte);
    if key.is_empty() || !s.eat(b'.') {
        return None;
    }

    let keyword = s.take_while(|b| b.is_ascii_alphabetic());
    let source = RefSource::from_keyword(&input[keyword])?;
    if !s.next_is_segment_after_dot() {
        return None;
    }

    let mut path = Vec::new();
    while s.next_is_segment_after_dot() {
        s.pos += 1;
        let seg = s.take_while(is_segment_byte);
        path.push(input[seg].to_string());
    }

    Some(Reference {
        key: input[key].to_string(),
        source,
        path,
        span: start..s.pos,
    })
}

/// Finds every well-formed reference in `input`, left to right.
pub fn find_references(input: &str) -> Vec<Reference> {
    let bytes = input.as_bytes();
    let mut refs = Vec::new();
    let mut pos = 0;
    while pos + PREFIX.len() <= bytes.len() {
        if &bytes[pos..pos + PREFIX.len()] == PREFIX {
            if let Some(reference) = parse_at(input, pos) {
                pos = reference.span.end;
                refs.push(reference);
                continue;
            }
        }
        pos += 1;
    }
    refs
}

fn walk<'v>(mut current: &'v Value, path: &[String]) -> Option<&'v Value> {
    for segment in path {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

impl Reference {
    pub fn text<'a>(&self, input: &'a str) -> &'a str {
        &input[self.span.clone()]
    }

    pub fn dotted_path(&self) -> String {
        self.path.join(".")
    }

    pub fn lookup(&self, record: &ExecutionRecord) -> Lookup {
        let Some(entry) = record.get(&self.key) else {
            return Lookup::UnknownKey;
        };

        let found = match self.source {
            RefSource::Params => walk_object(&entry.request.query, &self.path).cloned(),
            RefSource::Body => entry
                .response
                .as_ref()
                .and_then(|response| walk(&response.body, &self.path))
                .cloned(),
            RefSource::Header => entry.response.as_ref().and_then(|response| {
                let (name, rest) = self.path.split_first()?;
                let value = response
                    .headers
                    .iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(name))
                    .map(|(_, v)| Value::String(v.clone()))?;
                walk(&value, rest).cloned()
            }),
        };

        match found {
            Some(value) => Lookup::Found(value),
            None => Lookup::MissingPath,
        }
    }
}

fn walk_object<'v>(
    map: &'v serde_json::Map<String, Value>,
    path: &[String],
) -> Option<&'v Value> {
    let (first, rest) = path.split_first()?;
    walk(map.get(first)?, rest)
}
