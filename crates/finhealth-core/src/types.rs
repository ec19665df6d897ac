use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FinHealthError;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates and ratios expressed as decimals (0.05 = 5%).
pub type Rate = Decimal;

/// One loosely-shaped per-period provider record: a flat mapping from
/// provider field names to JSON values, with a mandatory `date` key.
pub type SourceRecord = serde_json::Map<String, Value>;

/// Outcome of a single scoring model: a result, or a human-readable
/// failure reason.
///
/// Serialized with a `status` tag so a failed model section still renders
/// as a well-formed object next to the successful ones, and bundle
/// assembly never has to abort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ModelOutcome<T> {
    Ok(T),
    Error { message: String },
}

impl<T> ModelOutcome<T> {
    /// The successful result, if any.
    pub fn ok(&self) -> Option<&T> {
        match self {
            Self::Ok(value) => Some(value),
            Self::Error { .. } => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

impl<T> From<Result<T, FinHealthError>> for ModelOutcome<T> {
    fn from(res: Result<T, FinHealthError>) -> Self {
        match res {
            Ok(value) => Self::Ok(value),
            Err(e) => Self::Error {
                message: e.to_string(),
            },
        }
    }
}

/// Convert a raw provider value to a Decimal, accepting JSON numbers and
/// numeric strings (plain or scientific notation).
pub(crate) fn decimal_from_value(value: &Value) -> Option<Decimal> {
    let repr = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };
    repr.parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(&repr))
        .ok()
}
