//! Creator for `formData` parameters.
//!
//! Form fields are either plain text (scalar or collection) or multipart
//! files. A parameter declared with the `file` type always gets a
//! [`PartProcessor`], whatever its target type would otherwise suggest.

use std::sync::Arc;

use super::creator::validate;
use super::{
    CollectionProcessor, ParamProcessor, PartProcessor, ProcessorBase, ProcessorCreator,
    ScalarProcessor,
};
use crate::convert::Converter;
use crate::descriptor::{ParamDescriptor, ParamLocation, TargetType};
use crate::Error;

#[derive(Clone)]
pub struct FormProcessorCreator {
    converter: Arc<dyn Converter>,
}

impl FormProcessorCreator {
    pub fn new(converter: Arc<dyn Converter>) -> Self {
        Self { converter }
    }
}

impl ProcessorCreator for FormProcessorCreator {
    fn location(&self) -> ParamLocation {
        ParamLocation::Form
    }

    fn create(
        &self,
        descriptor: &ParamDescriptor,
        target_type: &TargetType,
    ) -> crate::Result<Box<dyn ParamProcessor>> {
        validate(ParamLocation::Form, descriptor, target_type)?;
        let base = ProcessorBase::new(descriptor, target_type, self.converter.clone());

        if descriptor.target_type.is_file() {
            if !target_type.is_file() {
                return Err(Error::config(format!(
                    "file parameter '{}' must bind to a file target, not {}",
                    descriptor.name, target_type
                )));
            }
            if descriptor.default_value.is_some() {
                return Err(Error::config(format!(
                    "file parameter '{}' cannot declare a default value",
                    descriptor.name
                )));
            }
            log::debug!("created part processor for formData parameter '{}'", descriptor.name);
            return Ok(Box::new(PartProcessor::new(base)));
        }
        if target_type.is_file() {
            return Err(Error::config(format!(
                "formData parameter '{}' is declared as {} but binds to a file",
                descriptor.name, descriptor.target_type
            )));
        }

        let processor: Box<dyn ParamProcessor> = if target_type.is_container() {
            Box::new(CollectionProcessor::new(base))
        } else {
            Box::new(ScalarProcessor::new(base))
        };
        log::debug!(
            "created {} processor for formData parameter '{}' ({})",
            processor.kind(),
            descriptor.name,
            target_type
        );
        Ok(processor)
    }
}
