use serde_json::Value;

use crate::error::DispatchError;

pub fn validate_number(number: Option<&Value>) -> Result<(), DispatchError> {
    match number {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(()),
        Some(Value::Number(_)) => Ok(()),
        _ => Err(DispatchError::MissingNumber),
    }
}
