use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Resource;

pub const FIELD_ID: &str = "Id";
pub const FIELD_NAME: &str = "Name";
pub const FIELD_PARENT: &str = "B25__Parent__c";
pub const FIELD_RESOURCE_TYPE: &str = "B25__Resource_Type__c";
pub const FIELD_RESOURCE_TYPE_NAME: &str = "B25__Resource_Type__r.Name";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    Equals,
    NotEquals,
    /// Literal is an array of candidates; a scalar acts as a one-element list.
    In,
    NotIn,
    GreaterThan,
    LessThan,
}

/// Atomic predicate over a resource field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub field: String,
    pub operator: Operator,
    pub value: Value,
}

/// Conjunction of conditions. A filter is a list of groups, any of which may match.
pub type ConditionGroup = Vec<Condition>;

impl Condition {
    pub fn new(field: impl Into<String>, operator: Operator, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }

    pub fn equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, Operator::Equals, value)
    }

    pub fn not_equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, Operator::NotEquals, value)
    }

    pub fn is_in<V: Into<Value>>(field: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        Self::new(field, Operator::In, values)
    }

    pub fn not_in<V: Into<Value>>(field: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        Self::new(field, Operator::NotIn, values)
    }

    pub fn greater_than(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, Operator::GreaterThan, value)
    }

    pub fn less_than(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, Operator::LessThan, value)
    }

    /// Absent (or null) fields fail every positive operator and pass the negated ones.
    pub fn matches(&self, resource: &Resource) -> bool {
        let actual = field_value(resource, &self.field);
        match (self.operator, actual) {
            (Operator::Equals, Some(v)) => values_equal(&v, &self.value),
            (Operator::NotEquals, Some(v)) => !values_equal(&v, &self.value),
            (Operator::In, Some(v)) => self.candidates().any(|c| values_equal(&v, c)),
            (Operator::NotIn, Some(v)) => !self.candidates().any(|c| values_equal(&v, c)),
            (Operator::GreaterThan, Some(v)) => compare(&v, &self.value) == Some(Ordering::Greater),
            (Operator::LessThan, Some(v)) => compare(&v, &self.value) == Some(Ordering::Less),
            (Operator::NotEquals | Operator::NotIn, None) => true,
            (_, None) => false,
        }
    }

    fn candidates(&self) -> impl Iterator<Item = &Value> {
        let items = match &self.value {
            Value::Array(items) => items.as_slice(),
            other => std::slice::from_ref(other),
        };
        items.iter()
    }
}

/// OR over groups, AND within a group. No groups means no filter.
pub fn matches_any(groups: &[ConditionGroup], resource: &Resource) -> bool {
    groups.is_empty()
        || groups
            .iter()
            .any(|group| group.iter().all(|c| c.matches(resource)))
}

/// Built-in fields first, then the custom property bag.
fn field_value(resource: &Resource, field: &str) -> Option<Value> {
    let value = match field {
        FIELD_ID => Some(Value::String(resource.id.clone())),
        FIELD_NAME => Some(Value::String(resource.name.clone())),
        FIELD_PARENT => resource.parent_id.clone().map(Value::String),
        FIELD_RESOURCE_TYPE => resource.resource_type.id.clone().map(Value::String),
        FIELD_RESOURCE_TYPE_NAME => resource.resource_type.name.clone().map(Value::String),
        other => resource.property(other).cloned(),
    };
    value.filter(|v| !v.is_null())
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) if a.is_number() && b.is_number() => x == y,
        _ => a == b,
    }
}

fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        _ => None,
    }
}
