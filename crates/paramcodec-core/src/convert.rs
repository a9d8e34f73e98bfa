//! Type conversion from raw transport values into typed arguments.
//!
//! Raw values arrive as JSON: `Null` when absent, a `String` for a single
//! field, an `Array` of strings when every value bound to a name was read,
//! or arbitrary JSON for pre-parsed maps, defaults and bodies.

use serde_json::{Number, Value as JsonValue};

use crate::descriptor::{ScalarType, TargetType};
use crate::Error;

/// Converts a raw value into the shape of a target type
pub trait Converter: Send + Sync {
    fn convert(&self, name: &str, raw: JsonValue, target: &TargetType) -> crate::Result<JsonValue>;
}

/// String-to-scalar and sequence-to-collection coercion
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultConverter;

impl Converter for DefaultConverter {
    fn convert(&self, name: &str, raw: JsonValue, target: &TargetType) -> crate::Result<JsonValue> {
        match target {
            TargetType::Object => Ok(raw),
            TargetType::File => Err(Error::conversion(name, "file parts are not converted")),
            TargetType::Scalar(scalar) => convert_scalar(name, raw, *scalar),
            TargetType::Sequence(scalar) => {
                convert_collection(name, raw, *scalar).map(JsonValue::Array)
            }
            TargetType::Set(scalar) => {
                let items = convert_collection(name, raw, *scalar)?;
                let mut unique: Vec<JsonValue> = Vec::with_capacity(items.len());
                for item in items {
                    if !unique.contains(&item) {
                        unique.push(item);
                    }
                }
                Ok(JsonValue::Array(unique))
            }
        }
    }
}

fn convert_collection(name: &str, raw: JsonValue, scalar: ScalarType) -> crate::Result<Vec<JsonValue>> {
    match raw {
        JsonValue::Null => Ok(Vec::new()),
        JsonValue::Array(items) => items
            .into_iter()
            .map(|item| convert_scalar(name, item, scalar))
            .collect(),
        single => Ok(vec![convert_scalar(name, single, scalar)?]),
    }
}

fn convert_scalar(name: &str, raw: JsonValue, scalar: ScalarType) -> crate::Result<JsonValue> {
    match raw {
        JsonValue::Null => Ok(JsonValue::Null),
        JsonValue::Array(mut items) => match items.len() {
            0 => Ok(JsonValue::Null),
            1 => convert_scalar(name, items.remove(0), scalar),
            n => Err(Error::conversion(
                name,
                format!("expected a single {} value, got {}", scalar.as_str(), n),
            )),
        },
        JsonValue::String(s) => parse_str(name, s, scalar),
        JsonValue::Number(n) => match scalar {
            ScalarType::String => Ok(JsonValue::String(n.to_string())),
            ScalarType::Number => Ok(JsonValue::Number(n)),
            ScalarType::Integer if n.is_i64() || n.is_u64() => Ok(JsonValue::Number(n)),
            _ => Err(mismatch(name, &n.to_string(), scalar)),
        },
        JsonValue::Bool(b) => match scalar {
            ScalarType::String => Ok(JsonValue::String(b.to_string())),
            ScalarType::Boolean => Ok(JsonValue::Bool(b)),
            _ => Err(mismatch(name, &b.to_string(), scalar)),
        },
        JsonValue::Object(_) => Err(Error::conversion(
            name,
            format!("expected {}, got an object", scalar.as_str()),
        )),
    }
}

fn parse_str(name: &str, s: String, scalar: ScalarType) -> crate::Result<JsonValue> {
    if scalar == ScalarType::String {
        return Ok(JsonValue::String(s));
    }
    let trimmed = s.trim();
    // empty text is no value for every non-string scalar
    if trimmed.is_empty() {
        return Ok(JsonValue::Null);
    }
    match scalar {
        ScalarType::Integer => trimmed
            .parse::<i64>()
            .map(Number::from)
            .or_else(|_| trimmed.parse::<u64>().map(Number::from))
            .map(JsonValue::Number)
            .map_err(|_| mismatch(name, trimmed, scalar)),
        ScalarType::Number => trimmed
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(JsonValue::Number)
            .ok_or_else(|| mismatch(name, trimmed, scalar)),
        ScalarType::Boolean => {
            if trimmed.eq_ignore_ascii_case("true") {
                Ok(JsonValue::Bool(true))
            } else if trimmed.eq_ignore_ascii_case("false") {
                Ok(JsonValue::Bool(false))
            } else {
                Err(mismatch(name, trimmed, scalar))
            }
        }
        ScalarType::String => unreachable!("handled above"),
    }
}

fn mismatch(name: &str, value: &str, scalar: ScalarType) -> Error {
    Error::conversion(name, format!("'{}' is not a valid {}", value, scalar.as_str()))
}
