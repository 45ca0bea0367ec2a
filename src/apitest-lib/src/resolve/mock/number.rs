use super::arg_or;
use super::traits::MockDirective;
use rand::Rng;
use serde_json::{Number, Value};

const DEFAULT_MAX: i64 = 10_000;

fn bounds(args: &[String], default_min: i64) -> Result<(i64, i64), String> {
    let min = arg_or(args, 0, default_min)?;
    let max = arg_or(args, 1, DEFAULT_MAX.max(min))?;
    if min > max {
        return Err(format!("min {min} is greater than max {max}"));
    }
    Ok((min, max))
}

pub struct Integer;

impl MockDirective for Integer {
    fn name(&self) -> &str {
        "integer"
    }

    fn generate(&self, args: &[String]) -> Result<Value, String> {
        let (min, max) = bounds(args, 0)?;
        Ok(Value::from(rand::thread_rng().gen_range(min..=max)))
    }
}

pub struct Natural;

impl MockDirective for Natural {
    fn name(&self) -> &str {
        "natural"
    }

    fn validate_args(&self, args: &[String]) -> Result<(), String> {
        if arg_or(args, 0, 0i64)? < 0 {
            return Err("natural numbers start at 0".to_string());
        }
        Ok(())
    }

    fn generate(&self, args: &[String]) -> Result<Value, String> {
        let (min, max) = bounds(args, 0)?;
        Ok(Value::from(rand::thread_rng().gen_range(min..=max)))
    }
}

pub struct Float;

impl MockDirective for Float {
    fn name(&self) -> &str {
        "float"
    }

    fn generate(&self, args: &[String]) -> Result<Value, String> {
        let min = arg_or(args, 0, 0.0f64)?;
        let max = arg_or(args, 1, DEFAULT_MAX as f64)?;
        let decimals = arg_or(args, 2, 2u32)?.min(10);
        if !(max - min).is_finite() {
            return Err(format!("bounds {min} and {max} must be finite"));
        }
        if min > max {
            return Err(format!("min {min} is greater than max {max}"));
        }
        let raw = if min == max {
            min
        } else {
            rand::thread_rng().gen_range(min..max)
        };
        let scale = 10f64.powi(decimals as i32);
        Number::from_f64((raw * scale).round() / scale)
            .map(Value::Number)
            .ok_or_else(|| "generated a non-finite number".to_string())
    }
}

pub struct Boolean;

impl MockDirective for Boolean {
    fn name(&self) -> &str {
        "boolean"
    }

    fn generate(&self, _args: &[String]) -> Result<Value, String> {
        Ok(Value::Bool(rand::thread_rng().gen()))
    }
}
