use super::traits::MockDirective;
use rand::Rng;
use serde_json::Value;

pub struct Guid;

impl MockDirective for Guid {
    fn name(&self) -> &str {
        "guid"
    }

    fn generate(&self, _args: &[String]) -> Result<Value, String> {
        Ok(Value::String(uuid::Uuid::new_v4().to_string()))
    }
}

pub struct Uuid;

impl MockDirective for Uuid {
    fn name(&self) -> &str {
        "uuid"
    }

    fn generate(&self, args: &[String]) -> Result<Value, String> {
        Guid.generate(args)
    }
}

/// 24 hex characters, shaped like a document id.
pub struct ObjectId;

impl MockDirective for ObjectId {
    fn name(&self) -> &str {
        "id"
    }

    fn generate(&self, _args: &[String]) -> Result<Value, String> {
        let bits: u128 = rand::thread_rng().gen::<u128>() >> 32;
        Ok(Value::String(format!("{bits:024x}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_id_shape() {
        let id = ObjectId.generate(&[]).unwrap();
        let id = id.as_str().unwrap();
        assert_eq!(id.len(), 24);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_guid_parses() {
        let id = Guid.generate(&[]).unwrap();
        assert!(uuid::Uuid::parse_str(id.as_str().unwrap()).is_ok());
    }
}
