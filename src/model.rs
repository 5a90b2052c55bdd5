//! The resource entity, its write-side payloads, and the list filter.

use crate::error::{AppError, FieldError};
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

/// A persisted resource. Serialized in camelCase; `description` is omitted when unset.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(serialize_with = "serialize_number")]
    pub value: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Whole numbers go out as JSON integers (`10`, not `10.0`).
fn serialize_number<S: Serializer>(v: &f64, s: S) -> Result<S::Ok, S::Error> {
    const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;
    if v.fract() == 0.0 && v.abs() <= MAX_SAFE_INTEGER {
        s.serialize_i64(*v as i64)
    } else {
        s.serialize_f64(*v)
    }
}

/// Fields accepted on create.
#[derive(Debug, Clone, PartialEq)]
pub struct NewResource {
    pub name: String,
    pub description: Option<String>,
    pub value: f64,
}

impl NewResource {
    pub fn new(name: impl Into<String>, description: Option<&str>, value: f64) -> Self {
        NewResource {
            name: name.into(),
            description: description.map(str::to_string),
            value,
        }
    }

    /// Trim text fields and enforce the record invariants. Used by every store before writing.
    pub fn normalized(self) -> Result<Self, AppError> {
        let record = NewResource {
            name: self.name.trim().to_string(),
            description: self.description.map(|d| d.trim().to_string()),
            value: self.value,
        };
        let errors = record_errors(&record.name, record.value);
        if errors.is_empty() {
            Ok(record)
        } else {
            Err(AppError::validation("Validation failed", errors))
        }
    }
}

/// Partial update. `None` leaves the stored field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourcePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub value: Option<f64>,
}

impl ResourcePatch {
    /// Merge onto an existing record, producing the full candidate record.
    pub fn apply_to(&self, current: &Resource) -> NewResource {
        NewResource {
            name: self.name.clone().unwrap_or_else(|| current.name.clone()),
            description: self
                .description
                .clone()
                .or_else(|| current.description.clone()),
            value: self.value.unwrap_or(current.value),
        }
    }
}

/// List constraints; every present bound must hold.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceFilter {
    pub name: Option<String>,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
}

impl ResourceFilter {
    /// Build from raw query parameters. Empty or unparseable values are ignored.
    pub fn from_query(params: &HashMap<String, String>) -> Self {
        ResourceFilter {
            name: params.get("name").filter(|s| !s.is_empty()).cloned(),
            min_value: params.get("minValue").and_then(|s| parse_bound("minValue", s)),
            max_value: params.get("maxValue").and_then(|s| parse_bound("maxValue", s)),
        }
    }

    pub fn matches(&self, resource: &Resource) -> bool {
        if let Some(needle) = &self.name {
            if !resource.name.to_lowercase().contains(&needle.to_lowercase()) {
                return false;
            }
        }
        if let Some(min) = self.min_value {
            if resource.value < min {
                return false;
            }
        }
        if let Some(max) = self.max_value {
            if resource.value > max {
                return false;
            }
        }
        true
    }
}

fn parse_bound(param: &str, raw: &str) -> Option<f64> {
    if raw.is_empty() {
        return None;
    }
    match raw.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => Some(n),
        _ => {
            tracing::debug!(param, raw, "ignoring unparseable list bound");
            None
        }
    }
}

fn record_errors(name: &str, value: f64) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if name.is_empty() {
        errors.push(FieldError::body("name", "Name is required", Some(&Value::String(name.to_string()))));
    }
    if !value.is_finite() || value < 0.0 {
        let shown = serde_json::Number::from_f64(value).map(Value::Number);
        errors.push(FieldError::body(
            "value",
            "Value must be a non-negative number",
            shown.as_ref(),
        ));
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(name: &str, value: f64) -> Resource {
        let now = Utc::now();
        Resource {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: Some("kept".into()),
            value,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn serializes_camel_case_with_integral_values() {
        let mut resource = sample("Test", 10.0);
        resource.description = None;
        let json = serde_json::to_value(&resource).unwrap();
        assert_eq!(json["value"], serde_json::json!(10));
        assert!(json.get("description").is_none());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        resource.value = 2.5;
        assert_eq!(serde_json::to_value(&resource).unwrap()["value"], serde_json::json!(2.5));
    }

    #[test]
    fn normalized_trims_text_fields() {
        let record = NewResource::new("  Cache  ", Some(" redis "), 1.0).normalized().unwrap();
        assert_eq!(record.name, "Cache");
        assert_eq!(record.description.as_deref(), Some("redis"));
    }

    #[test]
    fn normalized_rejects_blank_name_and_negative_value() {
        match NewResource::new("   ", None, -1.0).normalized() {
            Err(AppError::Validation { errors, .. }) => {
                let paths: Vec<_> = errors.iter().map(|e| e.path.as_str()).collect();
                assert_eq!(paths, vec!["name", "value"]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn patch_keeps_unspecified_fields() {
        let current = sample("Test", 10.0);
        let merged = ResourcePatch {
            value: Some(20.0),
            ..Default::default()
        }
        .apply_to(&current);
        assert_eq!(merged.name, "Test");
        assert_eq!(merged.description.as_deref(), Some("kept"));
        assert_eq!(merged.value, 20.0);
    }

    #[test]
    fn filter_from_query_ignores_empty_and_garbage() {
        let mut params = HashMap::new();
        params.insert("name".to_string(), String::new());
        params.insert("minValue".to_string(), "abc".to_string());
        params.insert("maxValue".to_string(), "500".to_string());
        let filter = ResourceFilter::from_query(&params);
        assert_eq!(
            filter,
            ResourceFilter {
                name: None,
                min_value: None,
                max_value: Some(500.0),
            }
        );
    }

    #[test]
    fn filter_name_is_case_insensitive_substring() {
        let filter = ResourceFilter {
            name: Some("LOAD".into()),
            ..Default::default()
        };
        assert!(filter.matches(&sample("Load Balancer", 1.0)));
        assert!(!filter.matches(&sample("Cache Layer", 1.0)));
    }

    #[test]
    fn filter_bounds_are_inclusive() {
        let filter = ResourceFilter {
            name: None,
            min_value: Some(1000.0),
            max_value: Some(1500.0),
        };
        assert!(filter.matches(&sample("a", 1000.0)));
        assert!(filter.matches(&sample("b", 1500.0)));
        assert!(!filter.matches(&sample("c", 999.0)));
        assert!(!filter.matches(&sample("d", 1500.5)));
    }
}
