//! Field rules for create and update payloads. Reports diagnostics; the caller decides what to raise.

use crate::error::FieldError;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

pub struct RequestValidator;

impl RequestValidator {
    /// Create: `name` a non-empty string, `value` numeric. Sign is not checked here.
    pub fn create(body: &Value) -> Vec<FieldError> {
        let mut errors = Vec::new();
        let name = body.get("name");
        if !name.map(Value::is_string).unwrap_or(false) {
            errors.push(FieldError::body("name", "Invalid value", name));
        }
        // Emptiness applies to strings and absent values; other types only get "Invalid value".
        let blank = match name {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.is_empty(),
            Some(_) => false,
        };
        if blank {
            errors.push(FieldError::body("name", "Name is required", name));
        }
        let value = body.get("value");
        if !value.map(is_numeric).unwrap_or(false) {
            errors.push(FieldError::body("value", "Value must be a number", value));
        }
        errors
    }

    /// Update: every field optional, but a present key (even `null`) must have the right type.
    pub fn update(body: &Value) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if let Some(name) = body.get("name") {
            if !name.is_string() {
                errors.push(FieldError::body("name", "Name must be a string", Some(name)));
            }
        }
        if let Some(description) = body.get("description") {
            if !description.is_string() {
                errors.push(FieldError::body(
                    "description",
                    "Description must be a string",
                    Some(description),
                ));
            }
        }
        if let Some(value) = body.get("value") {
            if !is_numeric(value) {
                errors.push(FieldError::body("value", "Value must be a number", Some(value)));
            }
        }
        errors
    }
}

fn numeric_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[+-]?([0-9]*[.])?[0-9]+$").expect("numeric pattern compiles"))
}

/// A JSON number, or a string that spells a plain decimal number.
pub fn is_numeric(v: &Value) -> bool {
    match v {
        Value::Number(_) => true,
        Value::String(s) => numeric_pattern().is_match(s),
        _ => false,
    }
}

/// Numeric value as f64, accepting the same inputs as [`is_numeric`].
pub fn numeric_value(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if numeric_pattern().is_match(s) => s.parse().ok(),
        _ => None,
    }
}
