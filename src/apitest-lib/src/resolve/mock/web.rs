use super::traits::MockDirective;
use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::Value;

const HOSTS: &[&str] = &["acme", "globex", "initech", "umbrella", "hooli", "stark", "wayne"];
const TLDS: &[&str] = &["com", "net", "org", "io", "dev"];
const SCHEMES: &[&str] = &["http", "https"];
const PATHS: &[&str] = &["home", "about", "products", "orders", "docs", "status"];

fn pick(list: &[&'static str]) -> &'static str {
    list.choose(&mut rand::thread_rng()).copied().unwrap_or_default()
}

fn domain() -> String {
    format!("{}.{}", pick(HOSTS), pick(TLDS))
}

pub struct Domain;

impl MockDirective for Domain {
    fn name(&self) -> &str {
        "domain"
    }

    fn generate(&self, _args: &[String]) -> Result<Value, String> {
        Ok(Value::String(domain()))
    }
}

pub struct Url;

impl MockDirective for Url {
    fn name(&self) -> &str {
        "url"
    }

    fn generate(&self, args: &[String]) -> Result<Value, String> {
        let scheme = args
            .first()
            .filter(|s| !s.is_empty())
            .cloned()
            .unwrap_or_else(|| pick(SCHEMES).to_string());
        Ok(Value::String(format!("{scheme}://{}/{}", domain(), pick(PATHS))))
    }
}

pub struct Ip;

impl MockDirective for Ip {
    fn name(&self) -> &str {
        "ip"
    }

    fn generate(&self, _args: &[String]) -> Result<Value, String> {
        let octets: [u8; 4] = rand::thread_rng().gen();
        Ok(Value::String(format!(
            "{}.{}.{}.{}",
            octets[0], octets[1], octets[2], octets[3]
        )))
    }
}

pub struct Color;

impl MockDirective for Color {
    fn name(&self) -> &str {
        "color"
    }

    fn generate(&self, _args: &[String]) -> Result<Value, String> {
        let rgb: u32 = rand::thread_rng().gen_range(0..=0xFFFFFF);
        Ok(Value::String(format!("#{rgb:06x}")))
    }
}
