//! Parameter processors: per-parameter extraction and injection.
//!
//! A processor is built once per declared parameter by a
//! [`ProcessorCreator`](creator::ProcessorCreator) and then shared by every
//! call of the operation. It reads the parameter out of an inbound
//! [`ServerRequest`] and writes it into an outbound [`ClientRequest`].
//!
//! Extraction follows the same order for every variant: a non-empty
//! pre-parsed map for the location wins, otherwise the raw value(s) are read
//! from the request; an absent value (missing, null, or an empty sequence) is
//! replaced by the default, or rejected when the parameter is required; the
//! result is then converted into the target type.

pub mod body;
pub mod creator;
pub mod field;
pub mod form;
pub mod part;

// Internal imports (std, crate)
use std::fmt;
use std::sync::Arc;

use crate::convert::Converter;
use crate::descriptor::{ParamDescriptor, ParamLocation, TargetType};
use crate::request::{ClientRequest, FilePart, ServerRequest};
use crate::Error;

// External imports (alphabetized)
use serde::Serialize;
use serde_json::{json, Value as JsonValue};

pub use body::{BodyProcessor, BodyProcessorCreator};
pub use creator::{FieldProcessorCreator, ProcessorCreator};
pub use field::{CollectionProcessor, ScalarProcessor};
pub use form::FormProcessorCreator;
pub use part::PartProcessor;

/// A typed argument exchanged with the invocation pipeline
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Converted value; `Null` when absent
    Json(JsonValue),
    /// Multipart file handle, passed through untouched
    Part(Arc<FilePart>),
}

impl ParamValue {
    pub fn null() -> Self {
        Self::Json(JsonValue::Null)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Json(JsonValue::Null))
    }

    pub fn as_json(&self) -> Option<&JsonValue> {
        match self {
            Self::Json(value) => Some(value),
            Self::Part(_) => None,
        }
    }

    pub fn as_part(&self) -> Option<&Arc<FilePart>> {
        match self {
            Self::Part(part) => Some(part),
            Self::Json(_) => None,
        }
    }

    /// JSON rendering for diagnostics; file parts become metadata objects
    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::Json(value) => value.clone(),
            Self::Part(part) => json!({
                "name": part.name,
                "fileName": part.file_name,
                "contentType": part.content_type,
                "size": part.data.len(),
            }),
        }
    }
}

impl From<JsonValue> for ParamValue {
    fn from(value: JsonValue) -> Self {
        Self::Json(value)
    }
}

impl From<FilePart> for ParamValue {
    fn from(part: FilePart) -> Self {
        Self::Part(Arc::new(part))
    }
}

/// Concrete processor variant, fixed when the processor is created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessorKind {
    Scalar,
    Collection,
    Part,
    Body,
}

impl ProcessorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scalar => "scalar",
            Self::Collection => "collection",
            Self::Part => "part",
            Self::Body => "body",
        }
    }
}

impl fmt::Display for ProcessorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reads one parameter from a server request and writes it into a client request
pub trait ParamProcessor: fmt::Debug + Send + Sync {
    /// Wire-level parameter name
    fn name(&self) -> &str;

    fn location(&self) -> ParamLocation;

    fn kind(&self) -> ProcessorKind;

    /// Type extracted values are converted into
    fn target_type(&self) -> &TargetType;

    /// Read and convert the parameter from an inbound request
    fn extract(&self, request: &dyn ServerRequest) -> crate::Result<ParamValue>;

    /// Write `value` into an outbound request
    fn inject(&self, request: &mut dyn ClientRequest, value: &ParamValue) -> crate::Result<()>;
}

/// State and defaulting rules shared by the processor variants
#[derive(Clone)]
pub(crate) struct ProcessorBase {
    pub(crate) name: String,
    pub(crate) location: ParamLocation,
    pub(crate) target_type: TargetType,
    pub(crate) default_value: Option<JsonValue>,
    pub(crate) required: bool,
    converter: Arc<dyn Converter>,
}

impl fmt::Debug for ProcessorBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessorBase")
            .field("name", &self.name)
            .field("location", &self.location)
            .field("target_type", &self.target_type)
            .field("default_value", &self.default_value)
            .field("required", &self.required)
            .finish_non_exhaustive()
    }
}

impl ProcessorBase {
    pub(crate) fn new(
        descriptor: &ParamDescriptor,
        target_type: &TargetType,
        converter: Arc<dyn Converter>,
    ) -> Self {
        Self {
            name: descriptor.name.clone(),
            location: descriptor.location,
            target_type: *target_type,
            default_value: descriptor.default_value.clone(),
            required: descriptor.required,
            converter,
        }
    }

    /// Entry for this parameter in a non-empty pre-parsed map, `Null` if the map lacks it
    pub(crate) fn preparsed(&self, request: &dyn ServerRequest) -> Option<JsonValue> {
        request
            .preparsed(self.location)
            .filter(|values| !values.is_empty())
            .map(|values| values.get(&self.name).cloned().unwrap_or(JsonValue::Null))
    }

    /// Apply required/default handling, then convert
    pub(crate) fn resolve(&self, raw: JsonValue) -> crate::Result<JsonValue> {
        let raw = if is_absent(&raw) {
            self.check_required_and_default(raw)?
        } else {
            raw
        };
        self.converter.convert(&self.name, raw, &self.target_type)
    }

    pub(crate) fn check_required_and_default(&self, raw: JsonValue) -> crate::Result<JsonValue> {
        if self.required {
            return Err(self.missing());
        }
        Ok(self.default_value.clone().unwrap_or(raw))
    }

    pub(crate) fn missing(&self) -> Error {
        Error::bad_request(format!(
            "parameter required: {} '{}' is missing",
            self.location, self.name
        ))
    }

    pub(crate) fn expect_json<'a>(&self, value: &'a ParamValue) -> crate::Result<&'a JsonValue> {
        value.as_json().ok_or_else(|| {
            Error::conversion(&self.name, "expected a value, got a file part")
        })
    }
}

/// Missing, null and empty sequences are all "no value"
pub(crate) fn is_absent(raw: &JsonValue) -> bool {
    match raw {
        JsonValue::Null => true,
        JsonValue::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Text written on the wire for a scalar JSON value
pub(crate) fn wire_text(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_values() {
        assert!(is_absent(&JsonValue::Null));
        assert!(is_absent(&json!([])));
        assert!(!is_absent(&json!("")));
        assert!(!is_absent(&json!(["x"])));
    }

    #[test]
    fn test_wire_text() {
        assert_eq!(wire_text(&json!(3)).as_deref(), Some("3"));
        assert_eq!(wire_text(&json!(true)).as_deref(), Some("true"));
        assert_eq!(wire_text(&json!("a b")).as_deref(), Some("a b"));
        assert_eq!(wire_text(&JsonValue::Null), None);
    }

    #[test]
    fn test_part_renders_as_metadata() {
        let value = ParamValue::from(
            FilePart::new("avatar", b"abc".to_vec()).with_file_name("me.png"),
        );
        assert_eq!(
            value.to_json(),
            json!({"name": "avatar", "fileName": "me.png", "contentType": null, "size": 3})
        );
        assert!(value.as_json().is_none());
    }
}
