use serde_json::Value;

use super::error::{FusionError, Result};

/// Check that a decoded payload is a list of ranked lists and unwrap it.
pub fn ranked_lists_from_value(value: Value) -> Result<Vec<Vec<Value>>> {
    let Value::Array(lists) = value else {
        return Err(FusionError::InvalidInput(format!(
            "input must be a list of result lists, got {}",
            describe(&value)
        )));
    };

    lists
        .into_iter()
        .enumerate()
        .map(|(index, list)| match list {
            Value::Array(documents) => Ok(documents),
            other => Err(FusionError::InvalidInput(format!(
                "input must be a list of result lists, element {index} is {}",
                describe(&other)
            ))),
        })
        .collect()
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
