use super::traits::MockDirective;
use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::Value;

const FIRST_NAMES: &[&str] = &[
    "James", "Mary", "Robert", "Patricia", "John", "Jennifer", "Michael", "Linda", "David",
    "Elizabeth", "William", "Barbara", "Richard", "Susan", "Joseph", "Jessica", "Thomas", "Sarah",
    "Charles", "Karen", "Wei", "Aiko", "Mateo", "Priya", "Omar", "Sofia",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Rodriguez",
    "Martinez", "Hernandez", "Lopez", "Wilson", "Anderson", "Thomas", "Taylor", "Moore", "Jackson",
    "Martin", "Lee", "Chen", "Tanaka", "Rossi", "Singh", "Haddad", "Novak",
];

const MAIL_DOMAINS: &[&str] = &["example.com", "example.org", "example.net", "mail.test"];

fn pick(list: &[&'static str]) -> &'static str {
    list.choose(&mut rand::thread_rng()).copied().unwrap_or_default()
}

pub struct First;

impl MockDirective for First {
    fn name(&self) -> &str {
        "first"
    }

    fn generate(&self, _args: &[String]) -> Result<Value, String> {
        Ok(Value::String(pick(FIRST_NAMES).to_string()))
    }
}

pub struct Last;

impl MockDirective for Last {
    fn name(&self) -> &str {
        "last"
    }

    fn generate(&self, _args: &[String]) -> Result<Value, String> {
        Ok(Value::String(pick(LAST_NAMES).to_string()))
    }
}

pub struct Name;

impl MockDirective for Name {
    fn name(&self) -> &str {
        "name"
    }

    fn generate(&self, _args: &[String]) -> Result<Value, String> {
        Ok(Value::String(format!(
            "{} {}",
            pick(FIRST_NAMES),
            pick(LAST_NAMES)
        )))
    }
}

pub struct Email;

impl MockDirective for Email {
    fn name(&self) -> &str {
        "email"
    }

    fn validate_args(&self, args: &[String]) -> Result<(), String> {
        if args.len() > 1 {
            return Err("email takes at most one argument (domain)".to_string());
        }
        Ok(())
    }

    fn generate(&self, args: &[String]) -> Result<Value, String> {
        let domain = args
            .first()
            .filter(|d| !d.is_empty())
            .cloned()
            .unwrap_or_else(|| pick(MAIL_DOMAINS).to_string());
        let suffix: u16 = rand::thread_rng().gen_range(1..1000);
        Ok(Value::String(format!(
            "{}.{}{suffix}@{domain}",
            pick(FIRST_NAMES).to_lowercase(),
            pick(LAST_NAMES).to_lowercase()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_has_two_parts() {
        let name = Name.generate(&[]).unwrap();
        assert_eq!(name.as_str().unwrap().split(' ').count(), 2);
    }

    #[test]
    fn test_email_custom_domain() {
        let email = Email.generate(&["corp.test".to_string()]).unwrap();
        assert!(email.as_str().unwrap().ends_with("@corp.test"));
        assert!(Email
            .validate_args(&["a".to_string(), "b".to_string()])
            .is_err());
    }
}
