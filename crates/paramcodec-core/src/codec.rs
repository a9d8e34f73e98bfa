//! Per-operation codec: one processor per declared parameter.
//!
//! An [`OperationCodec`] is assembled once when an operation is registered
//! and reused for every call. Assembly fails if any parameter is unusable,
//! in which case the operation must not be served.
//!
//! # Examples
//!
//! ```
//! use paramcodec_core::codec::OperationCodec;
//! use paramcodec_core::descriptor::{ParamDescriptor, ParamLocation, ScalarType, TargetType};
//! use paramcodec_core::registry::ProcessorRegistry;
//! use paramcodec_core::request::HttpServerRequest;
//! use serde_json::json;
//!
//! let registry = ProcessorRegistry::with_defaults();
//! let codec = OperationCodec::build(
//!     "listPets",
//!     &registry,
//!     vec![
//!         ParamDescriptor::new("limit", ParamLocation::Query, TargetType::Scalar(ScalarType::Integer))
//!             .unwrap()
//!             .with_default(10),
//!     ],
//! )
//! .unwrap();
//!
//! let args = codec.decode_json(&HttpServerRequest::new()).unwrap();
//! assert_eq!(args["limit"], json!(10));
//! ```

// Internal imports (std, crate)
use std::collections::HashSet;

use crate::descriptor::{ParamDescriptor, ParamLocation};
use crate::processor::{ParamProcessor, ParamValue};
use crate::registry::ProcessorRegistry;
use crate::request::{ClientRequest, ServerRequest};
use crate::Error;

// External imports (alphabetized)
use serde_json::{Map as JsonMap, Value as JsonValue};

#[derive(Debug)]
pub struct OperationCodec {
    operation_id: String,
    processors: Vec<Box<dyn ParamProcessor>>,
}

impl OperationCodec {
    /// Build one processor per descriptor, in declaration order
    pub fn build<I>(
        operation_id: impl Into<String>,
        registry: &ProcessorRegistry,
        descriptors: I,
    ) -> crate::Result<Self>
    where
        I: IntoIterator<Item = ParamDescriptor>,
    {
        let operation_id = operation_id.into();
        let mut seen = HashSet::new();
        let mut processors = Vec::new();
        for descriptor in descriptors {
            if !seen.insert(descriptor.name.clone()) {
                return Err(Error::config(format!(
                    "operation '{}' declares parameter '{}' more than once",
                    operation_id, descriptor.name
                )));
            }
            let processor = registry
                .create(&descriptor, &descriptor.target_type)
                .map_err(|e| match e {
                    Error::Config(msg) => {
                        Error::config(format!("operation '{}': {}", operation_id, msg))
                    }
                    other => other,
                })?;
            processors.push(processor);
        }
        log::debug!(
            "built codec for operation '{}' with {} parameters",
            operation_id,
            processors.len()
        );
        Ok(Self {
            operation_id,
            processors,
        })
    }

    pub fn operation_id(&self) -> &str {
        &self.operation_id
    }

    pub fn processors(&self) -> &[Box<dyn ParamProcessor>] {
        &self.processors
    }

    pub fn len(&self) -> usize {
        self.processors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }

    /// Extract every argument in declaration order
    pub fn decode(&self, request: &dyn ServerRequest) -> crate::Result<Vec<ParamValue>> {
        self.processors
            .iter()
            .map(|processor| processor.extract(request))
            .collect()
    }

    /// Extract every argument keyed by parameter name; file parts become metadata
    pub fn decode_json(&self, request: &dyn ServerRequest) -> crate::Result<JsonMap<String, JsonValue>> {
        let values = self.decode(request)?;
        Ok(self
            .processors
            .iter()
            .zip(values)
            .map(|(processor, value)| (processor.name().to_string(), value.to_json()))
            .collect())
    }

    /// Inject positional arguments, one per parameter
    pub fn encode(&self, request: &mut dyn ClientRequest, args: &[ParamValue]) -> crate::Result<()> {
        if args.len() != self.processors.len() {
            return Err(Error::config(format!(
                "operation '{}' expects {} arguments, got {}",
                self.operation_id,
                self.processors.len(),
                args.len()
            )));
        }
        for (processor, value) in self.processors.iter().zip(args) {
            processor.inject(request, value)?;
        }
        Ok(())
    }

    /// Inject named JSON arguments; names without a value are skipped
    pub fn encode_json(
        &self,
        request: &mut dyn ClientRequest,
        args: &JsonMap<String, JsonValue>,
    ) -> crate::Result<()> {
        for name in args.keys() {
            if !self.processors.iter().any(|p| p.name() == name) {
                log::warn!(
                    "operation '{}' has no parameter '{}', ignoring it",
                    self.operation_id,
                    name
                );
            }
        }
        for processor in &self.processors {
            let value = args.get(processor.name()).cloned().unwrap_or(JsonValue::Null);
            processor.inject(request, &ParamValue::Json(value))?;
        }
        Ok(())
    }

    /// Parameter names and locations, in declaration order
    pub fn signature(&self) -> Vec<(&str, ParamLocation)> {
        self.processors
            .iter()
            .map(|p| (p.name(), p.location()))
            .collect()
    }

    /// Fail unless both codecs bind the same names to the same locations
    pub fn check_symmetry(&self, other: &OperationCodec) -> crate::Result<()> {
        let ours = self.signature();
        let theirs = other.signature();
        if ours == theirs {
            return Ok(());
        }
        Err(Error::config(format!(
            "operation '{}' is not symmetric with '{}': {:?} vs {:?}",
            self.operation_id, other.operation_id, ours, theirs
        )))
    }
}
