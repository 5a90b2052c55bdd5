//! Request validation for resource payloads.

mod validation;
pub use validation::{is_numeric, numeric_value, RequestValidator};
