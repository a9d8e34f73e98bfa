//! Service configuration: the operations of a service and their parameters.
//!
//! This module defines the `CodecConfig` struct describing every operation of
//! a service with OpenAPI-style parameter objects. The configuration can be
//! loaded from a YAML, JSON or TOML file, or created programmatically, and
//! turned into one [`OperationCodec`] per operation.
//!
//! # Examples
//!
//! ```no_run
//! use paramcodec_core::config::CodecConfig;
//! use paramcodec_core::registry::ProcessorRegistry;
//!
//! # #[tokio::main]
//! # async fn main() -> paramcodec_core::Result<()> {
//! let config = CodecConfig::from_file("petstore.yaml").await?;
//! let codecs = config.build_codecs(&ProcessorRegistry::with_defaults())?;
//! println!("{} operations ready", codecs.len());
//! # Ok(())
//! # }
//! ```

// Internal imports (std, crate)
use std::path::Path;

use crate::adapter::{OpenApiAdapter, OpenApiParameter, ParamAdapter};
use crate::codec::OperationCodec;
use crate::descriptor::ParamDescriptor;
use crate::registry::ProcessorRegistry;
use crate::Error;

// External imports (alphabetized)
use serde::{Deserialize, Serialize};
use tokio::fs;
use url::Url;

/// Parameter codec configuration for one service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Service name, used in diagnostics
    pub service_name: String,

    /// Base URL clients send requests to (Optional)
    #[serde(default)]
    pub base_url: Option<Url>,

    /// Operations exposed by the service
    #[serde(default)]
    pub operations: Vec<OperationConfig>,
}

/// One operation and its declared parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationConfig {
    /// Unique operation identifier
    pub id: String,

    /// HTTP method
    #[serde(default = "default_method")]
    pub method: String,

    /// Path template with `{name}` placeholders
    #[serde(default = "default_path")]
    pub path: String,

    /// Parameter declarations, in argument order
    #[serde(default)]
    pub parameters: Vec<OpenApiParameter>,
}

impl OperationConfig {
    pub fn new(id: impl Into<String>, method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            method: method.into(),
            path: path.into(),
            parameters: Vec::new(),
        }
    }

    /// Canonical descriptors for every declared parameter
    pub fn descriptors(&self) -> crate::Result<Vec<ParamDescriptor>> {
        OpenApiAdapter.descriptors(&self.parameters).map_err(|e| match e {
            Error::Config(msg) => Error::config(format!("operation '{}': {}", self.id, msg)),
            other => other,
        })
    }

    pub fn build_codec(&self, registry: &ProcessorRegistry) -> crate::Result<OperationCodec> {
        OperationCodec::build(self.id.clone(), registry, self.descriptors()?)
    }
}

impl CodecConfig {
    /// Create a new CodecConfig without operations
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            base_url: None,
            operations: Vec::new(),
        }
    }

    /// Load configuration from a file; the extension picks JSON, TOML or YAML
    pub async fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).await?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        let config: Self = match extension {
            "json" => serde_json::from_str(&content)?,
            "toml" => toml::from_str(&content)?,
            _ => serde_yaml::from_str(&content)?,
        };
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub async fn save<P: AsRef<Path>>(&self, path: P) -> crate::Result<()> {
        let content = serde_yaml::to_string(self)?;
        fs::write(path, content).await?;
        Ok(())
    }

    pub fn operation(&self, id: &str) -> Option<&OperationConfig> {
        self.operations.iter().find(|op| op.id == id)
    }

    /// Build a codec per operation; any invalid operation fails the whole service
    pub fn build_codecs(&self, registry: &ProcessorRegistry) -> crate::Result<Vec<OperationCodec>> {
        self.operations
            .iter()
            .map(|op| op.build_codec(registry))
            .collect()
    }
}

fn default_method() -> String {
    "GET".to_string()
}

fn default_path() -> String {
    "/".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{ParamLocation, TargetType};
    use tempfile::tempdir;

    fn petstore() -> CodecConfig {
        let mut op = OperationConfig::new("getPet", "GET", "/pets/{id}");
        op.parameters.push({
            let mut p = OpenApiParameter::new("id", ParamLocation::Path);
            p.type_ = Some("integer".into());
            p
        });
        op.parameters
            .push(OpenApiParameter::new("session", ParamLocation::Cookie));
        let mut config = CodecConfig::new("petstore");
        config.operations.push(op);
        config
    }

    #[tokio::test]
    async fn test_config_roundtrip() -> crate::Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("config.yaml");

        let config = petstore();
        config.save(&file_path).await?;

        let loaded = CodecConfig::from_file(&file_path).await?;
        assert_eq!(loaded.service_name, "petstore");
        assert_eq!(loaded.base_url, None);
        let op = loaded.operation("getPet").expect("operation present");
        assert_eq!(op.path, "/pets/{id}");
        assert_eq!(op.parameters, config.operations[0].parameters);

        Ok(())
    }

    #[tokio::test]
    async fn test_json_and_toml() -> crate::Result<()> {
        let dir = tempdir()?;

        let json_path = dir.path().join("svc.json");
        tokio::fs::write(
            &json_path,
            r#"{"service_name": "svc", "operations": [{"id": "search", "parameters": [{"name": "q", "in": "query", "required": true}]}]}"#,
        )
        .await?;
        let config = CodecConfig::from_file(&json_path).await?;
        let op = config.operation("search").unwrap();
        assert_eq!(op.method, "GET");
        assert!(op.descriptors()?[0].required);

        let toml_path = dir.path().join("svc.toml");
        tokio::fs::write(
            &toml_path,
            r#"
service_name = "svc"
base_url = "http://localhost:8080"

[[operations]]
id = "upload"
method = "POST"

[[operations.parameters]]
name = "file"
in = "formData"
type = "file"
"#,
        )
        .await?;
        let config = CodecConfig::from_file(&toml_path).await?;
        assert_eq!(config.base_url.as_ref().map(Url::as_str), Some("http://localhost:8080/"));
        let descriptors = config.operation("upload").unwrap().descriptors()?;
        assert_eq!(descriptors[0].target_type, TargetType::File);
        Ok(())
    }

    #[test]
    fn test_build_codecs() -> crate::Result<()> {
        let codecs = petstore().build_codecs(&ProcessorRegistry::with_defaults())?;
        assert_eq!(codecs.len(), 1);
        assert_eq!(codecs[0].operation_id(), "getPet");
        assert_eq!(codecs[0].len(), 2);
        Ok(())
    }

    #[test]
    fn test_invalid_operation_fails_build() {
        let mut config = petstore();
        let mut bad = OperationConfig::new("broken", "GET", "/");
        let mut p = OpenApiParameter::new("f", ParamLocation::Header);
        p.type_ = Some("file".into());
        bad.parameters.push(p);
        config.operations.push(bad);
        let err = config
            .build_codecs(&ProcessorRegistry::with_defaults())
            .unwrap_err();
        assert!(err.to_string().contains("broken"));
    }
}
