//! JSON request body binding.

use std::sync::Arc;

use serde_json::Value as JsonValue;

use super::creator::validate;
use super::{ParamProcessor, ParamValue, ProcessorBase, ProcessorCreator, ProcessorKind};
use crate::convert::Converter;
use crate::descriptor::{ParamDescriptor, ParamLocation, ScalarType, TargetType};
use crate::request::{ClientRequest, ServerRequest};
use crate::Error;

const JSON_CONTENT_TYPE: &str = "application/json";

/// Binds the whole request body, parsed as JSON
#[derive(Debug, Clone)]
pub struct BodyProcessor {
    base: ProcessorBase,
}

impl BodyProcessor {
    fn parse(&self, body: &[u8]) -> crate::Result<JsonValue> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(JsonValue::Null);
        }
        match serde_json::from_slice(body) {
            Ok(value) => Ok(value),
            // plain text bodies are accepted for string targets
            Err(_) if self.base.target_type == TargetType::Scalar(ScalarType::String) => {
                String::from_utf8(body.to_vec())
                    .map(JsonValue::String)
                    .map_err(|e| Error::conversion(&self.base.name, format!("body is not UTF-8: {}", e)))
            }
            Err(e) => Err(Error::conversion(
                &self.base.name,
                format!("malformed JSON body: {}", e),
            )),
        }
    }
}

impl ParamProcessor for BodyProcessor {
    fn name(&self) -> &str {
        &self.base.name
    }

    fn location(&self) -> ParamLocation {
        ParamLocation::Body
    }

    fn kind(&self) -> ProcessorKind {
        ProcessorKind::Body
    }

    fn target_type(&self) -> &TargetType {
        &self.base.target_type
    }

    fn extract(&self, request: &dyn ServerRequest) -> crate::Result<ParamValue> {
        let raw = match request.body() {
            Some(body) => self.parse(body)?,
            None => JsonValue::Null,
        };
        self.base.resolve(raw).map(ParamValue::Json)
    }

    fn inject(&self, request: &mut dyn ClientRequest, value: &ParamValue) -> crate::Result<()> {
        let value = self.base.expect_json(value)?;
        if value.is_null() {
            return Ok(());
        }
        request.set_body(JSON_CONTENT_TYPE, serde_json::to_vec(value)?);
        Ok(())
    }
}

#[derive(Clone)]
pub struct BodyProcessorCreator {
    converter: Arc<dyn Converter>,
}

impl BodyProcessorCreator {
    pub fn new(converter: Arc<dyn Converter>) -> Self {
        Self { converter }
    }
}

impl ProcessorCreator for BodyProcessorCreator {
    fn location(&self) -> ParamLocation {
        ParamLocation::Body
    }

    fn create(
        &self,
        descriptor: &ParamDescriptor,
        target_type: &TargetType,
    ) -> crate::Result<Box<dyn ParamProcessor>> {
        validate(ParamLocation::Body, descriptor, target_type)?;
        log::debug!("created body processor '{}' ({})", descriptor.name, target_type);
        Ok(Box::new(BodyProcessor {
            base: ProcessorBase::new(descriptor, target_type, self.converter.clone()),
        }))
    }
}
