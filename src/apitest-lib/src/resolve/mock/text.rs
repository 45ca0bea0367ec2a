use super::arg_or;
use super::traits::MockDirective;
use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::Value;

const LOREM: &[&str] = &[
    "lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit", "sed", "do",
    "eiusmod", "tempor", "incididunt", "ut", "labore", "et", "dolore", "magna", "aliqua", "enim",
    "minim", "veniam", "quis", "nostrud", "exercitation", "ullamco", "laboris", "nisi", "aliquip",
    "commodo", "consequat", "duis", "aute", "irure", "reprehenderit", "voluptate", "velit",
];

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

const MAX_LEN: usize = 10_000;

/// `(min, max)` from `args`, where a single argument means an exact count.
fn range(args: &[String], default_min: usize, default_max: usize) -> Result<(usize, usize), String> {
    let min = arg_or(args, 0, default_min)?;
    let max = if args.len() > 1 {
        arg_or(args, 1, default_max)?
    } else if args.is_empty() {
        default_max
    } else {
        min
    };
    let (min, max) = (min.min(MAX_LEN), max.min(MAX_LEN));
    if min > max {
        return Err(format!("min {min} is greater than max {max}"));
    }
    Ok((min, max))
}

fn sentence(words: usize) -> String {
    let mut rng = rand::thread_rng();
    let mut out: Vec<String> = (0..words.max(1))
        .map(|_| LOREM.choose(&mut rng).copied().unwrap_or("lorem").to_string())
        .collect();
    if let Some(first) = out.first_mut() {
        let mut chars = first.chars();
        if let Some(c) = chars.next() {
            *first = c.to_uppercase().chain(chars).collect();
        }
    }
    format!("{}.", out.join(" "))
}

pub struct RandomString;

impl MockDirective for RandomString {
    fn name(&self) -> &str {
        "string"
    }

    fn generate(&self, args: &[String]) -> Result<Value, String> {
        let (min, max) = range(args, 3, 7)?;
        let mut rng = rand::thread_rng();
        let len = rng.gen_range(min..=max);
        let s: String = (0..len)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect();
        Ok(Value::String(s))
    }
}

pub struct Word;

impl MockDirective for Word {
    fn name(&self) -> &str {
        "word"
    }

    fn generate(&self, _args: &[String]) -> Result<Value, String> {
        let word = LOREM.choose(&mut rand::thread_rng()).copied().unwrap_or("lorem");
        Ok(Value::String(word.to_string()))
    }
}

pub struct Sentence;

impl MockDirective for Sentence {
    fn name(&self) -> &str {
        "sentence"
    }

    fn generate(&self, args: &[String]) -> Result<Value, String> {
        let (min, max) = range(args, 12, 18)?;
        let words = rand::thread_rng().gen_range(min..=max);
        Ok(Value::String(sentence(words)))
    }
}

pub struct Paragraph;

impl MockDirective for Paragraph {
    fn name(&self) -> &str {
        "paragraph"
    }

    fn generate(&self, args: &[String]) -> Result<Value, String> {
        let (min, max) = range(args, 3, 7)?;
        let mut rng = rand::thread_rng();
        let count = rng.gen_range(min..=max).max(1);
        let sentences: Vec<String> = (0..count)
            .map(|_| sentence(rng.gen_range(12..=18)))
            .collect();
        Ok(Value::String(sentences.join(" ")))
    }
}
