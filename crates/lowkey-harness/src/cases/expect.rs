//! Assertion helpers shared by the cases
//!
//! Structural problems (missing key, wrong JSON type) are `Schema` errors;
//! a well-formed value that differs from what was expected is an
//! `Assertion` error.

use std::fmt::Debug;

use lowkey_common::{HarnessError, HarnessResult};
use serde_json::Value;

/// Field `key` of a JSON object
pub fn field<'a>(value: &'a Value, key: &str) -> HarnessResult<&'a Value> {
    let object = value
        .as_object()
        .ok_or_else(|| HarnessError::schema(format!("expected a JSON object, got {value}")))?;
    object
        .get(key)
        .ok_or_else(|| HarnessError::schema(format!("missing field `{key}` in {value}")))
}

/// String field `key` of a JSON object
pub fn str_field<'a>(value: &'a Value, key: &str) -> HarnessResult<&'a str> {
    field(value, key)?
        .as_str()
        .ok_or_else(|| HarnessError::schema(format!("field `{key}` is not a string in {value}")))
}

/// Boolean field `key` of a JSON object
pub fn bool_field(value: &Value, key: &str) -> HarnessResult<bool> {
    field(value, key)?
        .as_bool()
        .ok_or_else(|| HarnessError::schema(format!("field `{key}` is not a boolean in {value}")))
}

/// The value must be a JSON object
pub fn object(value: &Value) -> HarnessResult<()> {
    if value.is_object() {
        Ok(())
    } else {
        Err(HarnessError::schema(format!(
            "expected a JSON object, got {value}"
        )))
    }
}

/// `actual` must equal `expected`
pub fn equal<T>(what: &str, actual: T, expected: T) -> HarnessResult<()>
where
    T: PartialEq + Debug,
{
    if actual == expected {
        Ok(())
    } else {
        Err(HarnessError::assertion(format!(
            "{what}: expected {expected:?}, got {actual:?}"
        )))
    }
}

/// `condition` must hold
pub fn that(condition: bool, msg: impl FnOnce() -> String) -> HarnessResult<()> {
    if condition {
        Ok(())
    } else {
        Err(HarnessError::assertion(msg()))
    }
}
