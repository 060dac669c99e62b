//! The built-in comparer used when no comparer is registered for a lookup key.

use std::cmp::Ordering;

use serde::Serialize;
use serde_json::Value;

use crate::config::value_type_name;
use crate::error::ComparerError;

/// Outcome of comparing two values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ComparisonResult {
    Equal,
    NotEqual,
    LessThan,
    GreaterThan,
    /// The values could not be ordered; treated as "no comparer".
    Undetermined,
}

impl From<Ordering> for ComparisonResult {
    fn from(ordering: Ordering) -> Self {
        match ordering {
            Ordering::Less => ComparisonResult::LessThan,
            Ordering::Equal => ComparisonResult::Equal,
            Ordering::Greater => ComparisonResult::GreaterThan,
        }
    }
}

/// Compares numbers and strings, and tests booleans for equality.
///
/// `null` on either side is [`ComparisonResult::Undetermined`]. Arrays and
/// objects are [`ComparerError::UnsupportedValueType`]. Mixing kinds is a
/// [`ComparerError::Failed`].
pub fn default_compare(first: &Value, second: &Value) -> Result<ComparisonResult, ComparerError> {
    match (first, second) {
        (Value::Null, _) | (_, Value::Null) => Ok(ComparisonResult::Undetermined),
        (Value::Array(_) | Value::Object(_), _) => {
            Err(ComparerError::UnsupportedValueType(value_type_name(first).to_string()))
        }
        (_, Value::Array(_) | Value::Object(_)) => {
            Err(ComparerError::UnsupportedValueType(value_type_name(second).to_string()))
        }
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => Ok(a
                .partial_cmp(&b)
                .map(ComparisonResult::from)
                .unwrap_or(ComparisonResult::Undetermined)),
            _ => Ok(ComparisonResult::Undetermined),
        },
        (Value::String(a), Value::String(b)) => Ok(a.cmp(b).into()),
        (Value::Bool(a), Value::Bool(b)) => Ok(if a == b {
            ComparisonResult::Equal
        } else {
            ComparisonResult::NotEqual
        }),
        _ => Err(ComparerError::Failed(format!(
            "cannot compare a {} with a {}",
            value_type_name(first),
            value_type_name(second)
        ))),
    }
}
