//! Registry mapping location tags to processor creators.
//!
//! A registry is built once during startup, populated through `&mut self`,
//! and then shared read-only (usually behind an `Arc`) by every codec
//! builder. Lookups after startup need no synchronization.
//!
//! # Examples
//!
//! ```
//! use paramcodec_core::descriptor::{ParamDescriptor, ParamLocation, TargetType};
//! use paramcodec_core::registry::ProcessorRegistry;
//!
//! let registry = ProcessorRegistry::with_defaults();
//! let creator = registry.resolve("cookie").unwrap();
//!
//! let desc = ParamDescriptor::new("session", ParamLocation::Cookie, TargetType::default()).unwrap();
//! let processor = creator.create(&desc, &desc.target_type).unwrap();
//! assert_eq!(processor.location(), ParamLocation::Cookie);
//!
//! assert!(registry.resolve("matrix").is_err());
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::convert::{Converter, DefaultConverter};
use crate::descriptor::{ParamDescriptor, ParamLocation, TargetType};
use crate::processor::{
    BodyProcessorCreator, FieldProcessorCreator, FormProcessorCreator, ParamProcessor,
    ProcessorCreator,
};
use crate::Error;

#[derive(Clone, Default)]
pub struct ProcessorRegistry {
    creators: BTreeMap<String, Arc<dyn ProcessorCreator>>,
}

impl fmt::Debug for ProcessorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessorRegistry")
            .field("locations", &self.locations())
            .finish()
    }
}

impl ProcessorRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in location, converting with [`DefaultConverter`]
    pub fn with_defaults() -> Self {
        Self::with_converter(Arc::new(DefaultConverter))
    }

    /// Registry with every built-in location sharing `converter`
    pub fn with_converter(converter: Arc<dyn Converter>) -> Self {
        let mut registry = Self::new();
        registry.register_creator(Arc::new(FieldProcessorCreator::query(converter.clone())));
        registry.register_creator(Arc::new(FormProcessorCreator::new(converter.clone())));
        registry.register_creator(Arc::new(FieldProcessorCreator::cookie(converter.clone())));
        registry.register_creator(Arc::new(FieldProcessorCreator::path(converter.clone())));
        registry.register_creator(Arc::new(FieldProcessorCreator::header(converter.clone())));
        registry.register_creator(Arc::new(BodyProcessorCreator::new(converter)));
        registry
    }

    /// Register `creator` for `location`; a later registration replaces an earlier one
    pub fn register(&mut self, location: impl Into<String>, creator: Arc<dyn ProcessorCreator>) {
        let location = location.into();
        if self.creators.contains_key(&location) {
            log::warn!("replacing processor creator for location '{}'", location);
        } else {
            log::debug!("registered processor creator for location '{}'", location);
        }
        self.creators.insert(location, creator);
    }

    /// Register `creator` under its own location tag
    pub fn register_creator(&mut self, creator: Arc<dyn ProcessorCreator>) {
        self.register(creator.location().as_str(), creator);
    }

    pub fn resolve(&self, location: &str) -> crate::Result<Arc<dyn ProcessorCreator>> {
        self.creators
            .get(location)
            .cloned()
            .ok_or_else(|| Error::UnknownLocation(location.to_string()))
    }

    /// Resolve the descriptor's creator and build its processor
    pub fn create(
        &self,
        descriptor: &ParamDescriptor,
        target_type: &TargetType,
    ) -> crate::Result<Box<dyn ParamProcessor>> {
        self.resolve(descriptor.location.as_str())?
            .create(descriptor, target_type)
    }

    /// Registered location tags in sorted order
    pub fn locations(&self) -> Vec<&str> {
        self.creators.keys().map(String::as_str).collect()
    }

    pub fn contains(&self, location: ParamLocation) -> bool {
        self.creators.contains_key(location.as_str())
    }
}
