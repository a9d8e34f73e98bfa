//! Multipart file processor.

use super::{ParamProcessor, ParamValue, ProcessorBase, ProcessorKind};
use crate::descriptor::{ParamLocation, TargetType};
use crate::request::{ClientRequest, ServerRequest};
use crate::Error;

/// Passes multipart file handles through without conversion
///
/// The handle returned by [`extract`](ParamProcessor::extract) is the one the
/// request owns; the processor keeps no reference to it.
#[derive(Debug, Clone)]
pub struct PartProcessor {
    base: ProcessorBase,
}

impl PartProcessor {
    pub(crate) fn new(base: ProcessorBase) -> Self {
        Self { base }
    }
}

impl ParamProcessor for PartProcessor {
    fn name(&self) -> &str {
        &self.base.name
    }

    fn location(&self) -> ParamLocation {
        self.base.location
    }

    fn kind(&self) -> ProcessorKind {
        ProcessorKind::Part
    }

    fn target_type(&self) -> &TargetType {
        &self.base.target_type
    }

    fn extract(&self, request: &dyn ServerRequest) -> crate::Result<ParamValue> {
        match request.part(&self.base.name) {
            Some(part) => Ok(ParamValue::Part(part)),
            None if self.base.required => Err(self.base.missing()),
            None => Ok(ParamValue::null()),
        }
    }

    fn inject(&self, request: &mut dyn ClientRequest, value: &ParamValue) -> crate::Result<()> {
        match value {
            ParamValue::Part(part) => {
                request.attach(&self.base.name, part.clone());
                Ok(())
            }
            ParamValue::Json(serde_json::Value::Null) => Ok(()),
            ParamValue::Json(_) => Err(Error::conversion(
                &self.base.name,
                "file parameters accept only file parts",
            )),
        }
    }
}
