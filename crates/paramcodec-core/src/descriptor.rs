//! Canonical parameter metadata.
//!
//! A [`ParamDescriptor`] is the framework-neutral description of one declared
//! parameter. Adapters produce descriptors from framework declarations and
//! processor creators consume them.
//!
//! # Examples
//!
//! ```
//! use paramcodec_core::descriptor::{ParamDescriptor, ParamLocation, ScalarType, TargetType};
//! use std::str::FromStr;
//!
//! let location = ParamLocation::from_str("formData").unwrap();
//! assert_eq!(location, ParamLocation::Form);
//!
//! let desc = ParamDescriptor::new("ids", location, TargetType::Sequence(ScalarType::Integer))
//!     .unwrap();
//! assert!(desc.target_type.is_container());
//! assert!(!desc.required);
//! ```

// Internal imports (std, crate)
use std::fmt;
use std::str::FromStr;

use crate::Error;

// External imports (alphabetized)
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// The part of an HTTP request a parameter is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParamLocation {
    #[serde(rename = "query")]
    Query,
    #[serde(rename = "formData")]
    Form,
    #[serde(rename = "cookie")]
    Cookie,
    #[serde(rename = "path")]
    Path,
    #[serde(rename = "header")]
    Header,
    #[serde(rename = "body")]
    Body,
}

impl ParamLocation {
    /// Returns the registry tag for this location
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Form => "formData",
            Self::Cookie => "cookie",
            Self::Path => "path",
            Self::Header => "header",
            Self::Body => "body",
        }
    }

    /// Returns an iterator over all built-in locations
    pub fn all() -> impl Iterator<Item = ParamLocation> {
        [
            Self::Query,
            Self::Form,
            Self::Cookie,
            Self::Path,
            Self::Header,
            Self::Body,
        ]
        .into_iter()
    }
}

impl FromStr for ParamLocation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "query" => Ok(Self::Query),
            "formData" | "form" => Ok(Self::Form),
            "cookie" => Ok(Self::Cookie),
            "path" => Ok(Self::Path),
            "header" => Ok(Self::Header),
            "body" => Ok(Self::Body),
            _ => Err(format!("Unknown parameter location: {}", s)),
        }
    }
}

impl fmt::Display for ParamLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scalar wire types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarType {
    String,
    Integer,
    Number,
    Boolean,
}

impl ScalarType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }
}

impl FromStr for ScalarType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(Self::String),
            "integer" => Ok(Self::Integer),
            "number" => Ok(Self::Number),
            "boolean" => Ok(Self::Boolean),
            _ => Err(format!("Unknown scalar type: {}", s)),
        }
    }
}

/// Semantic type a raw parameter value is converted into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetType {
    /// A single string, number or boolean
    Scalar(ScalarType),
    /// Ordered sequence of scalars, duplicates kept
    Sequence(ScalarType),
    /// Ordered sequence of scalars, duplicates dropped
    Set(ScalarType),
    /// Arbitrary JSON document, only meaningful for bodies
    Object,
    /// Raw multipart file handle; never converted
    File,
}

impl TargetType {
    /// Whether all values bound to a name are read, not just the first
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Sequence(_) | Self::Set(_))
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Self::File)
    }
}

impl Default for TargetType {
    fn default() -> Self {
        Self::Scalar(ScalarType::String)
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(s) => f.write_str(s.as_str()),
            Self::Sequence(s) => write!(f, "array<{}>", s.as_str()),
            Self::Set(s) => write!(f, "set<{}>", s.as_str()),
            Self::Object => f.write_str("object"),
            Self::File => f.write_str("file"),
        }
    }
}

/// Canonical description of one declared parameter
#[derive(Debug, Clone, PartialEq)]
pub struct ParamDescriptor {
    /// Wire-level field name, unique within an operation
    pub name: String,
    /// Where the value lives in the request
    pub location: ParamLocation,
    /// Declared type; `File` selects the file-part processor
    pub target_type: TargetType,
    /// Value substituted when the request carries none
    pub default_value: Option<JsonValue>,
    /// Whether a missing value without a default is a bad request
    pub required: bool,
}

impl ParamDescriptor {
    /// Create an optional descriptor without a default value
    pub fn new(
        name: impl Into<String>,
        location: ParamLocation,
        target_type: TargetType,
    ) -> crate::Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::config(format!(
                "{} parameter declared without a name",
                location
            )));
        }
        Ok(Self {
            name,
            location,
            target_type,
            default_value: None,
            required: false,
        })
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_default(mut self, default_value: impl Into<JsonValue>) -> Self {
        self.default_value = Some(default_value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_tags_roundtrip() {
        for location in ParamLocation::all() {
            assert_eq!(ParamLocation::from_str(location.as_str()), Ok(location));
        }
        assert!(ParamLocation::from_str("matrix").is_err());
        assert_eq!(
            serde_json::to_value(ParamLocation::Form).unwrap(),
            serde_json::json!("formData")
        );
    }

    #[test]
    fn test_empty_name_rejected() {
        let err = ParamDescriptor::new("", ParamLocation::Query, TargetType::default()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_target_type_display() {
        assert_eq!(TargetType::Sequence(ScalarType::Integer).to_string(), "array<integer>");
        assert_eq!(TargetType::File.to_string(), "file");
        assert!(TargetType::Set(ScalarType::String).is_container());
        assert!(!TargetType::File.is_container());
    }
}
