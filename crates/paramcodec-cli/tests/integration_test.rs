//! End-to-end integration tests for the paramcodec CLI

mod test_utils;

use anyhow::Result;
use serde_json::json;
use test_utils::{create_temp_dir, create_test_config, run_cli, stdout_json};

#[test]
fn test_inspect_lists_processors() -> Result<()> {
    let (_dir, path) = create_temp_dir()?;
    let config = create_test_config(&path)?;

    let output = run_cli(&["inspect", "--config", config.to_str().unwrap()])?;
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("updatePet POST /pets/{id}"));
    assert!(stdout.contains("array<integer>"));
    assert!(stdout.contains("default=\"anon\""));
    assert!(stdout.contains("uploadAvatar"));
    Ok(())
}

#[test]
fn test_decode_binds_every_location() -> Result<()> {
    let (_dir, path) = create_temp_dir()?;
    let config = create_test_config(&path)?;

    let output = run_cli(&[
        "decode",
        "--config",
        config.to_str().unwrap(),
        "--operation",
        "updatePet",
        "--path",
        "/pets/7",
        "--form",
        "tag=blue",
        "--query",
        "ids=1&ids=2",
        "--header",
        "X-Trace: t-1",
    ])?;
    let args = stdout_json(&output)?;
    assert_eq!(args["id"], json!(7));
    assert_eq!(args["tag"], json!("blue"));
    assert_eq!(args["ids"], json!([1, 2]));
    assert_eq!(args["session"], json!("anon"));
    assert_eq!(args["x-trace"], json!("t-1"));
    Ok(())
}

#[test]
fn test_decode_rejects_bad_request() -> Result<()> {
    let (_dir, path) = create_temp_dir()?;
    let config = create_test_config(&path)?;
    let config = config.to_str().unwrap();

    // required form field missing
    let output = run_cli(&[
        "decode", "--config", config, "--operation", "updatePet", "--path", "/pets/7",
    ])?;
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("400"));

    // path segment is not an integer
    let output = run_cli(&[
        "decode", "--config", config, "--operation", "updatePet", "--path", "/pets/abc",
        "--form", "tag=x",
    ])?;
    assert_eq!(output.status.code(), Some(2));
    Ok(())
}

#[test]
fn test_decode_file_part_and_body() -> Result<()> {
    let (_dir, path) = create_temp_dir()?;
    let config = create_test_config(&path)?;
    let config = config.to_str().unwrap();
    let avatar = path.join("avatar.png");
    std::fs::write(&avatar, b"\x89PNG")?;
    let part = format!("avatar={}", avatar.display());

    let output = run_cli(&[
        "decode", "--config", config, "--operation", "uploadAvatar", "--path", "/pets/3/avatar",
        "--part", &part,
    ])?;
    let args = stdout_json(&output)?;
    assert_eq!(args["avatar"]["fileName"], json!("avatar.png"));
    assert_eq!(args["avatar"]["size"], json!(4));

    let output = run_cli(&[
        "decode", "--config", config, "--operation", "createPet", "--body",
        r#"{"name": "rex"}"#,
    ])?;
    assert_eq!(stdout_json(&output)?["pet"], json!({"name": "rex"}));
    Ok(())
}

#[test]
fn test_encode_renders_request() -> Result<()> {
    let (_dir, path) = create_temp_dir()?;
    let config = create_test_config(&path)?;

    let output = run_cli(&[
        "encode",
        "--config",
        config.to_str().unwrap(),
        "--operation",
        "updatePet",
        "--args",
        r#"{"id": 7, "tag": "a b", "ids": [1, 2], "session": "s-1"}"#,
    ])?;
    let request = stdout_json(&output)?;
    assert_eq!(request["method"], json!("POST"));
    assert_eq!(request["path"], json!("/pets/7"));
    assert_eq!(request["url"], json!("http://localhost:8080/api/pets/7"));
    assert_eq!(request["query"], json!("ids=1&ids=2"));
    assert_eq!(request["form"], json!("tag=a+b"));
    assert_eq!(request["cookie"], json!("session=s-1"));
    assert_eq!(request["headers"], json!([]));
    Ok(())
}

#[test]
fn test_unknown_operation_fails() -> Result<()> {
    let (_dir, path) = create_temp_dir()?;
    let config = create_test_config(&path)?;

    let output = run_cli(&[
        "encode", "--config", config.to_str().unwrap(), "--operation", "deletePet", "--args", "{}",
    ])?;
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("deletePet"));
    Ok(())
}
