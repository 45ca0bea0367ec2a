use super::traits::MockDirective;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime as ChronoDateTime, Duration, Local};
use rand::Rng;
use serde_json::Value;

const TEN_YEARS_SECS: i64 = 10 * 365 * 24 * 60 * 60;

/// Accepts `yyyy-MM-dd HH:mm:ss` style patterns as well as strftime.
fn to_strftime(pattern: &str) -> String {
    pattern
        .replace("yyyy", "%Y")
        .replace("MM", "%m")
        .replace("dd", "%d")
        .replace("HH", "%H")
        .replace("mm", "%M")
        .replace("ss", "%S")
}

fn render(moment: &ChronoDateTime<Local>, format: &str) -> Result<Value, String> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(format!("invalid date format '{format}'"));
    }
    Ok(Value::String(moment.format(format).to_string()))
}

fn random_moment(args: &[String], default_format: &str) -> Result<Value, String> {
    if args.len() > 1 {
        return Err("takes at most one argument (format)".to_string());
    }
    let offset = rand::thread_rng().gen_range(0..TEN_YEARS_SECS);
    let moment = Local::now() - Duration::seconds(offset);
    let format = args
        .first()
        .map(|f| to_strftime(f))
        .unwrap_or_else(|| default_format.to_string());
    render(&moment, &format)
}

pub struct Date;

impl MockDirective for Date {
    fn name(&self) -> &str {
        "date"
    }

    fn generate(&self, args: &[String]) -> Result<Value, String> {
        random_moment(args, "%Y-%m-%d")
    }
}

pub struct Time;

impl MockDirective for Time {
    fn name(&self) -> &str {
        "time"
    }

    fn generate(&self, args: &[String]) -> Result<Value, String> {
        random_moment(args, "%H:%M:%S")
    }
}

pub struct DateTime;

impl MockDirective for DateTime {
    fn name(&self) -> &str {
        "datetime"
    }

    fn generate(&self, args: &[String]) -> Result<Value, String> {
        random_moment(args, "%Y-%m-%d %H:%M:%S")
    }
}

pub struct Now;

impl MockDirective for Now {
    fn name(&self) -> &str {
        "now"
    }

    fn validate_args(&self, args: &[String]) -> Result<(), String> {
        if args.len() > 1 {
            return Err("now takes at most one argument (format)".to_string());
        }
        Ok(())
    }

    fn generate(&self, args: &[String]) -> Result<Value, String> {
        let format = args
            .first()
            .map(|f| to_strftime(f))
            .unwrap_or_else(|| "%Y-%m-%d %H:%M:%S".to_string());
        render(&Local::now(), &format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_default_format() {
        let d = Date.generate(&[]).unwrap();
        let d = d.as_str().unwrap();
        assert!(chrono::NaiveDate::parse_from_str(d, "%Y-%m-%d").is_ok());
    }

    #[test]
    fn test_now_custom_format() {
        let year = Now.generate(&["yyyy".to_string()]).unwrap();
        assert_eq!(year.as_str().unwrap(), Local::now().format("%Y").to_string());
    }

    #[test]
    fn test_invalid_format_is_an_error() {
        assert!(Now.generate(&["%Q".to_string()]).is_err());
        assert!(Date.generate(&["%Q".to_string()]).is_err());
        assert!(DateTime.generate(&["yyyy %".to_string()]).is_err());
    }
}
