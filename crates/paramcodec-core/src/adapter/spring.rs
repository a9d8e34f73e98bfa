//! Spring MVC style parameter declarations.
//!
//! Spring marks "no default declared" with a reserved sentinel string rather
//! than an absent attribute. This adapter maps that sentinel to an empty
//! default, so an undeclared default and a default declared as `""` look the
//! same to the codec. A non-empty default always makes the parameter
//! optional.
//!
//! # Examples
//!
//! ```
//! use paramcodec_core::adapter::{ParamAdapter, SpringAdapter, SpringAnnotation, SpringParamDecl};
//! use paramcodec_core::descriptor::{ParamLocation, TargetType};
//! use serde_json::json;
//!
//! let decl = SpringParamDecl::new(SpringAnnotation::CookieValue, TargetType::default())
//!     .with_name("session")
//!     .with_default("anon");
//! let desc = SpringAdapter::default().descriptor(&decl).unwrap();
//!
//! assert_eq!(desc.location, ParamLocation::Cookie);
//! assert_eq!(desc.default_value, Some(json!("anon")));
//! assert!(!desc.required);
//! ```

use serde_json::Value as JsonValue;

use super::ParamAdapter;
use crate::descriptor::{ParamDescriptor, ParamLocation, TargetType};
use crate::Error;

/// Spring's `ValueConstants.DEFAULT_NONE`
pub const DEFAULT_NONE: &str = "\n\t\t\n\t\t\n\u{E000}\u{E001}\u{E002}\n\t\t\t\t\n";

/// Parameter annotations understood by [`SpringAdapter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpringAnnotation {
    CookieValue,
    RequestParam,
    RequestHeader,
    PathVariable,
    RequestPart,
    RequestBody,
}

impl SpringAnnotation {
    /// Whether the annotation carries a `defaultValue` attribute
    fn has_default_attribute(&self) -> bool {
        matches!(
            self,
            Self::CookieValue | Self::RequestParam | Self::RequestHeader
        )
    }
}

/// Attribute values of one annotated method parameter
#[derive(Debug, Clone, PartialEq)]
pub struct SpringParamDecl {
    pub annotation: SpringAnnotation,
    pub value: String,
    pub name: String,
    pub default_value: String,
    pub required: bool,
    /// Type of the annotated method parameter
    pub target_type: TargetType,
}

impl SpringParamDecl {
    /// Declaration with Spring's attribute defaults: no name, no default, required
    pub fn new(annotation: SpringAnnotation, target_type: TargetType) -> Self {
        Self {
            annotation,
            value: String::new(),
            name: String::new(),
            default_value: DEFAULT_NONE.to_string(),
            required: true,
            target_type,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_default(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = default_value.into();
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }
}

/// Adapter for Spring MVC parameter annotations
#[derive(Debug, Clone, Copy)]
pub struct SpringAdapter {
    /// Where `@RequestParam` values are read from
    pub request_param_location: ParamLocation,
}

impl Default for SpringAdapter {
    fn default() -> Self {
        Self {
            request_param_location: ParamLocation::Query,
        }
    }
}

impl SpringAdapter {
    pub fn new(request_param_location: ParamLocation) -> crate::Result<Self> {
        match request_param_location {
            ParamLocation::Query | ParamLocation::Form => Ok(Self {
                request_param_location,
            }),
            other => Err(Error::config(format!(
                "@RequestParam cannot be read from {}",
                other
            ))),
        }
    }

    fn location(&self, annotation: SpringAnnotation) -> ParamLocation {
        match annotation {
            SpringAnnotation::CookieValue => ParamLocation::Cookie,
            SpringAnnotation::RequestParam => self.request_param_location,
            SpringAnnotation::RequestHeader => ParamLocation::Header,
            SpringAnnotation::PathVariable => ParamLocation::Path,
            SpringAnnotation::RequestPart => ParamLocation::Form,
            SpringAnnotation::RequestBody => ParamLocation::Body,
        }
    }
}

/// `value` wins over `name` unless it is empty
fn resolve_name(decl: &SpringParamDecl) -> &str {
    if decl.value.is_empty() {
        &decl.name
    } else {
        &decl.value
    }
}

/// The "unset" sentinel collapses to an empty default
fn resolve_default(decl: &SpringParamDecl) -> Option<String> {
    if !decl.annotation.has_default_attribute() {
        return None;
    }
    if decl.default_value == DEFAULT_NONE {
        return Some(String::new());
    }
    Some(decl.default_value.clone())
}

impl ParamAdapter for SpringAdapter {
    type Declaration = SpringParamDecl;

    fn descriptor(&self, decl: &SpringParamDecl) -> crate::Result<ParamDescriptor> {
        let name = resolve_name(decl);
        if name.is_empty() {
            return Err(Error::config(format!(
                "@{:?} parameter has neither value nor name",
                decl.annotation
            )));
        }

        let target_type = if decl.annotation == SpringAnnotation::RequestPart {
            TargetType::File
        } else {
            decl.target_type
        };
        let default_value = resolve_default(decl);
        let required = match &default_value {
            Some(default) if !default.is_empty() => false,
            _ => decl.required,
        };

        let mut descriptor = ParamDescriptor::new(name, self.location(decl.annotation), target_type)?
            .with_required(required);
        descriptor.default_value = default_value.map(JsonValue::String);
        Ok(descriptor)
    }
}
