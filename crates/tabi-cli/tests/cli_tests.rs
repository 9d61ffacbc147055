//! CLI integration tests for tabi-cli
//!
//! Tests command parsing, output formatting, and config handling.

use std::path::Path;
use std::process::Command;

/// Helper to run the CLI with arguments
fn run_tabi(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_tabi"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute command")
}

/// Run with an isolated config file
fn run_tabi_with_config(config: &Path, args: &[&str]) -> std::process::Output {
    let config = config.to_str().expect("utf-8 temp path");
    let mut full = vec!["--config", config];
    full.extend_from_slice(args);
    run_tabi(&full)
}

fn stdout(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn json_stdout(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("JSON output")
}

// ==================== Help & Version Tests ====================

#[test]
fn test_cli_help() {
    let output = run_tabi(&["--help"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("tabi"));
    assert!(text.contains("encode"));
    assert!(text.contains("decode"));
    assert!(text.contains("selector"));
    assert!(text.contains("calldata"));
}

#[test]
fn test_cli_version() {
    let output = run_tabi(&["--version"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("tabi"));
}

#[test]
fn test_cli_calldata_help() {
    let output = run_tabi(&["calldata", "--help"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("encode"));
    assert!(text.contains("decode"));
}

// ==================== Encode & Decode Tests ====================

#[test]
fn test_encode_string() {
    let output = run_tabi(&["encode", "string", r#"["hi"]"#]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        concat!(
            "0x",
            "0000000000000000000000000000000000000000000000000000000000000020",
            "0000000000000000000000000000000000000000000000000000000000000002",
            "6869000000000000000000000000000000000000000000000000000000000000",
        )
    );
}

#[test]
fn test_encode_json_output() {
    let output = run_tabi(&["--json", "encode", "uint8,bool", "[7, true]"]);
    assert!(output.status.success());
    let json = json_stdout(&output);
    let data = json["data"].as_str().unwrap();
    assert_eq!(data.len(), 2 + 128);
}

#[test]
fn test_decode_round_trip() {
    let encoded = run_tabi(&["encode", "uint256[],string", r#"[[1, 2, 3], "abc"]"#]);
    assert!(encoded.status.success());
    let data = stdout(&encoded);

    let output = run_tabi(&["--json", "decode", "uint256[],string", &data]);
    assert!(output.status.success());
    let json = json_stdout(&output);
    assert_eq!(json["values"][0], serde_json::json!(["1", "2", "3"]));
    assert_eq!(json["values"][1], "abc");
}

#[test]
fn test_decode_text_output() {
    let output = run_tabi(&[
        "decode",
        "uint8",
        "0x0000000000000000000000000000000000000000000000000000000000000005",
    ]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "uint8: 5");
}

#[test]
fn test_encode_out_of_range_fails() {
    let output = run_tabi(&["encode", "uint8", "[256]"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid number value"));
}

#[test]
fn test_error_json_output() {
    let output = run_tabi(&["--json", "encode", "uint8[2]", "[[1]]"]);
    assert!(!output.status.success());
    let json = json_stdout(&output);
    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "MISSING_ARGUMENT");
}

#[test]
fn test_encode_rejects_non_array_values() {
    let output = run_tabi(&["encode", "uint8", "7"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("JSON array"));
}

// ==================== Signature Tests ====================

#[test]
fn test_selector() {
    let output = run_tabi(&["selector", "transfer(address,uint256)"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "0xa9059cbb");
}

#[test]
fn test_parse_function() {
    let output = run_tabi(&[
        "--json",
        "parse",
        "function balanceOf(address owner) view returns (uint)",
    ]);
    assert!(output.status.success());
    let json = json_stdout(&output);
    assert_eq!(json["kind"], "function");
    assert_eq!(json["signature"], "balanceOf(address)");
    assert_eq!(json["selector"], "0x70a08231");
    assert_eq!(json["fragment"]["outputs"][0]["type"], "uint256");
    assert_eq!(json["fragment"]["constant"], true);
}

#[test]
fn test_parse_event() {
    let output = run_tabi(&[
        "parse",
        "event Transfer(address indexed from, address indexed to, uint256 value)",
    ]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("event Transfer(address,address,uint256)"));
    assert!(text.contains("0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"));
}

#[test]
fn test_parse_invalid_signature() {
    let output = run_tabi(&["parse", "function 1bad()"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid identifier"));
}

// ==================== Address Tests ====================

#[test]
fn test_address_forms() {
    let output = run_tabi(&["--json", "address", "0x8ba1f109551bd432803012645ac136ddd64dba72"]);
    assert!(output.status.success());
    let json = json_stdout(&output);
    assert_eq!(json["address"], "0x8ba1f109551bD432803012645Ac136ddd64DBA72");
    assert_eq!(json["icap"], "XE65GB6LDNXYOFTX0NSV3FUWKOWIXAMJK36");
    assert_eq!(json["tron"], "418ba1f109551bd432803012645ac136ddd64dba72");
}

#[test]
fn test_address_bad_checksum() {
    let output = run_tabi(&["address", "0x8ba1f109551bD432803012645Ac136ddd64DBa72"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("bad address checksum"));
}

// ==================== Calldata Tests ====================

#[test]
fn test_calldata_round_trip() {
    let sig = "transfer(address to, uint256 value)";
    let encoded = run_tabi(&[
        "calldata",
        "encode",
        "--sig",
        sig,
        r#"["0x8ba1f109551bd432803012645ac136ddd64dba72", 1000]"#,
    ]);
    assert!(encoded.status.success());
    let data = stdout(&encoded);
    assert!(data.starts_with("0xa9059cbb"));

    let output = run_tabi(&[
        "--json",
        "calldata",
        "decode",
        "--sig",
        "approve(address,uint256)",
        "--sig",
        sig,
        &data,
    ]);
    assert!(output.status.success());
    let json = json_stdout(&output);
    assert_eq!(json["function"], "transfer");
    assert_eq!(json["names"], serde_json::json!(["to", "value"]));
    assert_eq!(json["inputs"][0], "0x8ba1f109551bD432803012645Ac136ddd64DBA72");
    assert_eq!(json["inputs"][1], "1000");
}

#[test]
fn test_calldata_unknown_selector() {
    let output = run_tabi(&["calldata", "decode", "--sig", "f(uint256)", "0x12345678"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no matching function"));
}

// ==================== Config Tests ====================

#[test]
fn test_config_show_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    let output = run_tabi_with_config(&path, &["--json", "config", "--show"]);
    assert!(output.status.success());
    let json = json_stdout(&output);
    assert_eq!(json["log_level"], "warn");
    assert_eq!(json["abi"]["coerce_small_integers"], true);
    assert_eq!(json["abi"]["tron_addresses"], false);
}

#[test]
fn test_config_set_and_use() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");

    let output = run_tabi_with_config(&path, &["config", "--set-tron-addresses", "true"]);
    assert!(output.status.success());
    assert!(path.exists());

    let data = stdout(&run_tabi(&[
        "calldata",
        "encode",
        "--sig",
        "f(address a)",
        r#"["0x8ba1f109551bd432803012645ac136ddd64dba72"]"#,
    ]));
    let output = run_tabi_with_config(
        &path,
        &["--json", "calldata", "decode", "--sig", "f(address a)", &data],
    );
    assert!(output.status.success());
    let json = json_stdout(&output);
    assert_eq!(json["inputs"][0], "418ba1f109551bd432803012645ac136ddd64dba72");
}

#[test]
fn test_config_rejects_bad_log_level() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    let output = run_tabi_with_config(&path, &["config", "--set-log-level", "tabi=loud"]);
    assert!(!output.status.success());
    assert!(!path.exists());
}
