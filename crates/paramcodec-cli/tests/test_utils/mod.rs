//! Test utilities for paramcodec CLI integration tests

// Internal imports (std, crate)
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

// External imports (alphabetized)
use anyhow::Context;
use tempfile::TempDir;

/// Creates a temporary directory for test inputs
pub fn create_temp_dir() -> anyhow::Result<(TempDir, PathBuf)> {
    let temp_dir = tempfile::tempdir()?;
    let temp_path = temp_dir.path().to_path_buf();
    Ok((temp_dir, temp_path))
}

/// Writes a petstore service configuration into the given directory
pub fn create_test_config(dir: &Path) -> anyhow::Result<PathBuf> {
    let config_path = dir.join("petstore.yaml");
    let config_content = r#"
service_name: petstore
base_url: http://localhost:8080/api
operations:
  - id: updatePet
    method: POST
    path: /pets/{id}
    parameters:
      - name: id
        in: path
        schema:
          type: integer
      - name: tag
        in: formData
        type: string
        required: true
      - name: ids
        in: query
        schema:
          type: array
          items:
            type: integer
      - name: session
        in: cookie
        schema:
          type: string
          default: anon
      - name: x-trace
        in: header
        schema:
          type: string
  - id: uploadAvatar
    method: POST
    path: /pets/{id}/avatar
    parameters:
      - name: id
        in: path
        type: integer
      - name: avatar
        in: formData
        type: file
        required: true
  - id: createPet
    method: POST
    path: /pets
    parameters:
      - name: pet
        in: body
        schema:
          $ref: '#/definitions/Pet'
"#;
    fs::write(&config_path, config_content)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    Ok(config_path)
}

/// Runs the paramcodec binary with the given arguments
pub fn run_cli(args: &[&str]) -> anyhow::Result<Output> {
    Command::new(env!("CARGO_BIN_EXE_paramcodec"))
        .args(args)
        .output()
        .context("Failed to run paramcodec")
}

/// Parses the stdout of a successful run as JSON
pub fn stdout_json(output: &Output) -> anyhow::Result<serde_json::Value> {
    anyhow::ensure!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).context("stdout is not JSON")
}
