//! Scalar and collection processors for text fields.
//!
//! Both variants serve every text-valued location (query, form, header,
//! cookie, path); the location decides which part of the request is read.

use serde_json::Value as JsonValue;

use super::{wire_text, ParamProcessor, ParamValue, ProcessorBase, ProcessorKind};
use crate::descriptor::{ParamLocation, TargetType};
use crate::request::{ClientRequest, ServerRequest};

/// Binds a single raw value to a scalar
#[derive(Debug, Clone)]
pub struct ScalarProcessor {
    base: ProcessorBase,
}

impl ScalarProcessor {
    pub(crate) fn new(base: ProcessorBase) -> Self {
        Self { base }
    }
}

impl ParamProcessor for ScalarProcessor {
    fn name(&self) -> &str {
        &self.base.name
    }

    fn location(&self) -> ParamLocation {
        self.base.location
    }

    fn kind(&self) -> ProcessorKind {
        ProcessorKind::Scalar
    }

    fn target_type(&self) -> &TargetType {
        &self.base.target_type
    }

    fn extract(&self, request: &dyn ServerRequest) -> crate::Result<ParamValue> {
        let raw = match self.base.preparsed(request) {
            Some(value) => value,
            None => request
                .value(self.base.location, &self.base.name)
                .map(JsonValue::String)
                .unwrap_or(JsonValue::Null),
        };
        self.base.resolve(raw).map(ParamValue::Json)
    }

    fn inject(&self, request: &mut dyn ClientRequest, value: &ParamValue) -> crate::Result<()> {
        if let Some(text) = wire_text(self.base.expect_json(value)?) {
            request.add_field(self.base.location, &self.base.name, text);
        }
        Ok(())
    }
}

/// Binds every raw value under a name to an ordered collection
#[derive(Debug, Clone)]
pub struct CollectionProcessor {
    base: ProcessorBase,
}

impl CollectionProcessor {
    pub(crate) fn new(mut base: ProcessorBase) -> Self {
        base.default_value = base.default_value.take().map(split_csv_default);
        Self { base }
    }
}

/// Comma-separated string defaults are the declared form of collection defaults
fn split_csv_default(default_value: JsonValue) -> JsonValue {
    match default_value {
        JsonValue::String(s) if s.is_empty() => JsonValue::Array(Vec::new()),
        JsonValue::String(s) => JsonValue::Array(
            s.split(',')
                .map(|item| JsonValue::String(item.trim().to_string()))
                .collect(),
        ),
        other => other,
    }
}

impl ParamProcessor for CollectionProcessor {
    fn name(&self) -> &str {
        &self.base.name
    }

    fn location(&self) -> ParamLocation {
        self.base.location
    }

    fn kind(&self) -> ProcessorKind {
        ProcessorKind::Collection
    }

    fn target_type(&self) -> &TargetType {
        &self.base.target_type
    }

    fn extract(&self, request: &dyn ServerRequest) -> crate::Result<ParamValue> {
        let raw = match self.base.preparsed(request) {
            Some(value) => value,
            None => request
                .values(self.base.location, &self.base.name)
                .map(|values| JsonValue::Array(values.into_iter().map(JsonValue::String).collect()))
                .unwrap_or(JsonValue::Null),
        };
        self.base.resolve(raw).map(ParamValue::Json)
    }

    fn inject(&self, request: &mut dyn ClientRequest, value: &ParamValue) -> crate::Result<()> {
        match self.base.expect_json(value)? {
            JsonValue::Array(items) => {
                for text in items.iter().filter_map(wire_text) {
                    request.add_field(self.base.location, &self.base.name, text);
                }
            }
            single => {
                if let Some(text) = wire_text(single) {
                    request.add_field(self.base.location, &self.base.name, text);
                }
            }
        }
        Ok(())
    }
}
