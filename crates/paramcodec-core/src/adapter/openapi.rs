//! OpenAPI 3 and Swagger 2 parameter objects.
//!
//! OpenAPI 3 parameters carry their type in `schema`; Swagger 2 parameters
//! carry `type`, `items` and `default` inline and add the `formData` and
//! `body` locations plus the `file` type. Both shapes deserialize into
//! [`OpenApiParameter`].
//!
//! # Examples
//!
//! ```
//! use paramcodec_core::adapter::{OpenApiAdapter, OpenApiParameter, ParamAdapter};
//! use paramcodec_core::descriptor::{ParamLocation, ScalarType, TargetType};
//! use serde_json::json;
//!
//! let param: OpenApiParameter = serde_json::from_value(json!({
//!     "name": "ids",
//!     "in": "query",
//!     "schema": {"type": "array", "items": {"type": "integer"}}
//! })).unwrap();
//!
//! let desc = OpenApiAdapter.descriptor(&param).unwrap();
//! assert_eq!(desc.location, ParamLocation::Query);
//! assert_eq!(desc.target_type, TargetType::Sequence(ScalarType::Integer));
//! ```

// Internal imports (std, crate)
use std::collections::HashMap;
use std::str::FromStr;

use super::ParamAdapter;
use crate::descriptor::{ParamDescriptor, ParamLocation, ScalarType, TargetType};
use crate::Error;

// External imports (alphabetized)
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Information about a single parameter in an OpenAPI operation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OpenApiParameter {
    /// The name of the parameter. Parameter names are case sensitive.
    pub name: String,
    /// The location of the parameter: "query", "header", "path", "cookie", "formData" or "body".
    #[serde(rename = "in")]
    pub in_: String,
    /// A brief description of the parameter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether this parameter is mandatory. Path parameters are always required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    /// The schema defining the type used for the parameter (OpenAPI 3).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<JsonValue>,
    /// Inline parameter type (Swagger 2).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    /// Inline format (Swagger 2).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Inline element schema for arrays (Swagger 2).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<JsonValue>,
    /// Inline default value (Swagger 2).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<JsonValue>,
    /// Inline uniqueness flag for arrays (Swagger 2).
    #[serde(rename = "uniqueItems", default, skip_serializing_if = "Option::is_none")]
    pub unique_items: Option<bool>,
    /// Specification extensions (fields starting with `x-`).
    #[serde(flatten)]
    pub vendor_extensions: HashMap<String, JsonValue>,
}

impl OpenApiParameter {
    pub fn new(name: impl Into<String>, location: ParamLocation) -> Self {
        Self {
            name: name.into(),
            in_: location.as_str().to_string(),
            description: None,
            required: None,
            schema: None,
            type_: None,
            format: None,
            items: None,
            default: None,
            unique_items: None,
            vendor_extensions: HashMap::new(),
        }
    }

    /// The type-bearing object: `schema` when present, else the parameter itself
    fn type_info(&self) -> TypeInfo<'_> {
        match &self.schema {
            Some(schema) => TypeInfo {
                type_: schema.get("type").and_then(JsonValue::as_str),
                format: schema.get("format").and_then(JsonValue::as_str),
                items: schema.get("items"),
                default: schema.get("default"),
                unique_items: schema
                    .get("uniqueItems")
                    .and_then(JsonValue::as_bool)
                    .unwrap_or(false),
                is_ref: schema.get("$ref").is_some(),
            },
            None => TypeInfo {
                type_: self.type_.as_deref(),
                format: self.format.as_deref(),
                items: self.items.as_ref(),
                default: self.default.as_ref(),
                unique_items: self.unique_items.unwrap_or(false),
                is_ref: false,
            },
        }
    }
}

struct TypeInfo<'a> {
    type_: Option<&'a str>,
    format: Option<&'a str>,
    items: Option<&'a JsonValue>,
    default: Option<&'a JsonValue>,
    unique_items: bool,
    is_ref: bool,
}

/// Adapter for OpenAPI / Swagger parameter objects
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenApiAdapter;

fn scalar_type(name: &str, type_: &str) -> crate::Result<ScalarType> {
    ScalarType::from_str(type_)
        .map_err(|e| Error::config(format!("parameter '{}': {}", name, e)))
}

fn target_type(param: &OpenApiParameter, location: ParamLocation, info: &TypeInfo<'_>) -> crate::Result<TargetType> {
    if info.is_ref {
        return Ok(TargetType::Object);
    }
    match info.type_ {
        Some("file") => Ok(TargetType::File),
        Some("string") if info.format == Some("binary") && location == ParamLocation::Form => {
            Ok(TargetType::File)
        }
        Some("object") => Ok(TargetType::Object),
        Some("array") => {
            let item_type = info
                .items
                .and_then(|items| items.get("type"))
                .and_then(JsonValue::as_str)
                .unwrap_or("string");
            let scalar = scalar_type(&param.name, item_type)?;
            if info.unique_items {
                Ok(TargetType::Set(scalar))
            } else {
                Ok(TargetType::Sequence(scalar))
            }
        }
        Some(other) => Ok(TargetType::Scalar(scalar_type(&param.name, other)?)),
        None if location == ParamLocation::Body => Ok(TargetType::Object),
        None => Ok(TargetType::default()),
    }
}

impl ParamAdapter for OpenApiAdapter {
    type Declaration = OpenApiParameter;

    fn descriptor(&self, param: &OpenApiParameter) -> crate::Result<ParamDescriptor> {
        let location = ParamLocation::from_str(&param.in_)
            .map_err(|_| Error::UnknownLocation(param.in_.clone()))?;
        let info = param.type_info();
        let target_type = target_type(param, location, &info)?;
        let required = param
            .required
            .unwrap_or(location == ParamLocation::Path);

        let mut descriptor = ParamDescriptor::new(param.name.clone(), location, target_type)?
            .with_required(required);
        descriptor.default_value = info.default.cloned();
        Ok(descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: JsonValue) -> OpenApiParameter {
        serde_json::from_value(value).expect("valid parameter object")
    }

    #[test]
    fn test_swagger2_form_file() -> crate::Result<()> {
        let param = parse(json!({"name": "upload", "in": "formData", "type": "file", "required": true}));
        let desc = OpenApiAdapter.descriptor(&param)?;
        assert_eq!(desc.location, ParamLocation::Form);
        assert_eq!(desc.target_type, TargetType::File);
        assert!(desc.required);
        Ok(())
    }

    #[test]
    fn test_swagger2_inline_array_with_default() -> crate::Result<()> {
        let param = parse(json!({
            "name": "tags", "in": "query", "type": "array",
            "items": {"type": "string"}, "uniqueItems": true, "default": "a,b"
        }));
        let desc = OpenApiAdapter.descriptor(&param)?;
        assert_eq!(desc.target_type, TargetType::Set(ScalarType::String));
        assert_eq!(desc.default_value, Some(json!("a,b")));
        assert!(!desc.required);
        Ok(())
    }

    #[test]
    fn test_openapi3_schema_default() -> crate::Result<()> {
        let param = parse(json!({
            "name": "session", "in": "cookie",
            "schema": {"type": "string", "default": "anon"}
        }));
        let desc = OpenApiAdapter.descriptor(&param)?;
        assert_eq!(desc.location, ParamLocation::Cookie);
        assert_eq!(desc.default_value, Some(json!("anon")));
        Ok(())
    }

    #[test]
    fn test_path_defaults_to_required() -> crate::Result<()> {
        let param = parse(json!({"name": "id", "in": "path", "schema": {"type": "integer"}}));
        let desc = OpenApiAdapter.descriptor(&param)?;
        assert!(desc.required);
        assert_eq!(desc.target_type, TargetType::Scalar(ScalarType::Integer));
        Ok(())
    }

    #[test]
    fn test_body_ref_is_object() -> crate::Result<()> {
        let param = parse(json!({"name": "pet", "in": "body", "schema": {"$ref": "#/definitions/Pet"}}));
        assert_eq!(OpenApiAdapter.descriptor(&param)?.target_type, TargetType::Object);
        Ok(())
    }

    #[test]
    fn test_errors() {
        let param = parse(json!({"name": "x", "in": "matrix"}));
        assert!(matches!(OpenApiAdapter.descriptor(&param), Err(Error::UnknownLocation(_))));

        let param = parse(json!({"name": "x", "in": "query", "type": "date"}));
        assert!(matches!(OpenApiAdapter.descriptor(&param), Err(Error::Config(_))));
    }

    #[test]
    fn test_vendor_extensions_kept() {
        let param = parse(json!({"name": "x", "in": "header", "x-internal": true}));
        assert_eq!(param.vendor_extensions.get("x-internal"), Some(&json!(true)));
    }
}
