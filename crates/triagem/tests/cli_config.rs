//! `triagem config` subcommands run against the built binary.

use std::path::PathBuf;
use std::process::{Command, Output};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("triagem_cli_{}_{}", name, std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn triagem(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_triagem"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn validate_reports_malformed_file_instead_of_aborting() {
    let dir = scratch_dir("malformed");
    let config = dir.join("config.toml");
    std::fs::write(&config, "[history]\ncommit_policy = \"sometimes\"\n").unwrap();

    let output = triagem(&["-c", config.to_str().unwrap(), "config", "validate"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains("Configuration error"), "stdout: {stdout}");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn validate_accepts_sectioned_file() {
    let dir = scratch_dir("valid");
    let config = dir.join("config.toml");
    std::fs::write(
        &config,
        "[storage]\non_corrupt = \"reset\"\n\n[history]\ncommit_policy = \"every_exit\"\n",
    )
    .unwrap();

    let output = triagem(&["config", "validate", "--file", config.to_str().unwrap()]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("Configuration is valid."), "stdout: {stdout}");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn show_reads_values_from_file() {
    let dir = scratch_dir("show");
    let config = dir.join("config.toml");
    std::fs::write(&config, "[history]\ncommit_policy = \"every_exit\"\nseed_samples = false\n")
        .unwrap();

    let output = triagem(&["-c", config.to_str().unwrap(), "config", "show", "--json"]);
    assert!(output.status.success());

    let shown: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(shown["history"]["commit_policy"], "every_exit");
    assert_eq!(shown["history"]["seed_samples"], false);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn path_prints_explicit_config_file() {
    let output = triagem(&["-c", "/tmp/elsewhere/triagem.toml", "config", "path"]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "/tmp/elsewhere/triagem.toml"
    );
}
