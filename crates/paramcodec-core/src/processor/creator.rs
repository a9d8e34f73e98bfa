//! Processor creators: one factory per parameter location.
//!
//! A creator validates a descriptor against what its location can carry and
//! picks the processor variant. All validation happens here so an operation
//! with an unusable parameter fails while its codec is assembled, never while
//! serving a call.

use std::sync::Arc;

use super::{CollectionProcessor, ParamProcessor, ProcessorBase, ScalarProcessor};
use crate::convert::Converter;
use crate::descriptor::{ParamDescriptor, ParamLocation, TargetType};
use crate::Error;

/// Builds the processor for one parameter of one location
pub trait ProcessorCreator: Send + Sync {
    /// Location this creator is registered for
    fn location(&self) -> ParamLocation;

    /// Build an immutable processor for `descriptor`, converting into `target_type`
    fn create(
        &self,
        descriptor: &ParamDescriptor,
        target_type: &TargetType,
    ) -> crate::Result<Box<dyn ParamProcessor>>;
}

/// Location-independent descriptor checks
pub(crate) fn validate(
    location: ParamLocation,
    descriptor: &ParamDescriptor,
    target_type: &TargetType,
) -> crate::Result<()> {
    if descriptor.name.is_empty() {
        return Err(Error::config(format!(
            "{} parameter declared without a name",
            location
        )));
    }
    if descriptor.location != location {
        return Err(Error::config(format!(
            "{} creator cannot build {} parameter '{}'",
            location, descriptor.location, descriptor.name
        )));
    }
    if (descriptor.target_type.is_file() || target_type.is_file()) && location != ParamLocation::Form {
        return Err(Error::config(format!(
            "{} parameter '{}' cannot be a file; files are only accepted as formData",
            location, descriptor.name
        )));
    }
    if (descriptor.target_type == TargetType::Object || *target_type == TargetType::Object)
        && location != ParamLocation::Body
    {
        return Err(Error::config(format!(
            "{} parameter '{}' cannot bind a JSON object",
            location, descriptor.name
        )));
    }
    Ok(())
}

/// Creator for the plain text locations: query, header, cookie and path
#[derive(Clone)]
pub struct FieldProcessorCreator {
    location: ParamLocation,
    converter: Arc<dyn Converter>,
}

impl FieldProcessorCreator {
    pub fn new(location: ParamLocation, converter: Arc<dyn Converter>) -> crate::Result<Self> {
        match location {
            ParamLocation::Form | ParamLocation::Body => Err(Error::config(format!(
                "{} parameters need their own creator",
                location
            ))),
            _ => Ok(Self {
                location,
                converter,
            }),
        }
    }

    pub fn query(converter: Arc<dyn Converter>) -> Self {
        Self {
            location: ParamLocation::Query,
            converter,
        }
    }

    pub fn header(converter: Arc<dyn Converter>) -> Self {
        Self {
            location: ParamLocation::Header,
            converter,
        }
    }

    pub fn cookie(converter: Arc<dyn Converter>) -> Self {
        Self {
            location: ParamLocation::Cookie,
            converter,
        }
    }

    pub fn path(converter: Arc<dyn Converter>) -> Self {
        Self {
            location: ParamLocation::Path,
            converter,
        }
    }
}

impl ProcessorCreator for FieldProcessorCreator {
    fn location(&self) -> ParamLocation {
        self.location
    }

    fn create(
        &self,
        descriptor: &ParamDescriptor,
        target_type: &TargetType,
    ) -> crate::Result<Box<dyn ParamProcessor>> {
        validate(self.location, descriptor, target_type)?;
        if self.location == ParamLocation::Path && target_type.is_container() {
            return Err(Error::config(format!(
                "path parameter '{}' cannot be a collection",
                descriptor.name
            )));
        }

        let base = ProcessorBase::new(descriptor, target_type, self.converter.clone());
        let processor: Box<dyn ParamProcessor> = if target_type.is_container() {
            Box::new(CollectionProcessor::new(base))
        } else {
            Box::new(ScalarProcessor::new(base))
        };
        log::debug!(
            "created {} processor for {} parameter '{}' ({})",
            processor.kind(),
            self.location,
            descriptor.name,
            target_type
        );
        Ok(processor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::DefaultConverter;
    use crate::descriptor::ScalarType;
    use crate::processor::{ParamValue, ProcessorKind};
    use crate::request::HttpServerRequest;
    use serde_json::json;

    fn converter() -> Arc<dyn Converter> {
        Arc::new(DefaultConverter)
    }

    #[test]
    fn test_variant_selection() -> crate::Result<()> {
        let creator = FieldProcessorCreator::query(converter());
        let scalar = ParamDescriptor::new("q", ParamLocation::Query, TargetType::default())?;
        assert_eq!(creator.create(&scalar, &scalar.target_type)?.kind(), ProcessorKind::Scalar);

        let list = ParamDescriptor::new("ids", ParamLocation::Query, TargetType::Set(ScalarType::Integer))?;
        assert_eq!(creator.create(&list, &list.target_type)?.kind(), ProcessorKind::Collection);
        Ok(())
    }

    #[test]
    fn test_rejects_unsupported_types() -> crate::Result<()> {
        let cookie = FieldProcessorCreator::cookie(converter());
        let file = ParamDescriptor::new("f", ParamLocation::Cookie, TargetType::File)?;
        assert!(matches!(cookie.create(&file, &TargetType::File), Err(Error::Config(_))));

        let path = FieldProcessorCreator::path(converter());
        let ids = ParamDescriptor::new("ids", ParamLocation::Path, TargetType::Sequence(ScalarType::Integer))?;
        assert!(matches!(path.create(&ids, &ids.target_type), Err(Error::Config(_))));

        let header = FieldProcessorCreator::header(converter());
        let obj = ParamDescriptor::new("h", ParamLocation::Header, TargetType::Object)?;
        assert!(matches!(header.create(&obj, &obj.target_type), Err(Error::Config(_))));
        Ok(())
    }

    #[test]
    fn test_rejects_foreign_location() -> crate::Result<()> {
        let creator = FieldProcessorCreator::header(converter());
        let desc = ParamDescriptor::new("q", ParamLocation::Query, TargetType::default())?;
        assert!(creator.create(&desc, &desc.target_type).is_err());
        assert!(FieldProcessorCreator::new(ParamLocation::Body, converter()).is_err());
        Ok(())
    }

    #[test]
    fn test_cookie_default() -> crate::Result<()> {
        let creator = FieldProcessorCreator::cookie(converter());
        let desc = ParamDescriptor::new("session", ParamLocation::Cookie, TargetType::default())?
            .with_default("anon");
        let processor = creator.create(&desc, &desc.target_type)?;
        let request = HttpServerRequest::new().with_cookie_header("theme=dark");
        assert_eq!(processor.extract(&request)?, ParamValue::Json(json!("anon")));

        let request = HttpServerRequest::new().with_cookie_header("session=s1");
        assert_eq!(processor.extract(&request)?, ParamValue::Json(json!("s1")));
        Ok(())
    }

    #[test]
    fn test_creation_is_deterministic() -> crate::Result<()> {
        let creator = FieldProcessorCreator::query(converter());
        let desc = ParamDescriptor::new("n", ParamLocation::Query, TargetType::Scalar(ScalarType::Number))?;
        let a = creator.create(&desc, &desc.target_type)?;
        let b = creator.create(&desc, &desc.target_type)?;
        assert_eq!(format!("{:?}", a), format!("{:?}", b));
        Ok(())
    }
}
