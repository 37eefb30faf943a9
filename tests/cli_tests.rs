//! End-to-end tests for the idlforge binary

mod common;

use common::{fixture, template, PYTHON_USER_SERVICE};
use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn idlforge() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_idlforge"));
    cmd.env_remove("IDLFORGE_OUTPUT_DIR")
        .env_remove("RUST_LOG")
        .env_remove("IDLFORGE_LOG_LEVEL");
    cmd
}

#[test]
fn test_cli_generate() {
    let out = TempDir::new().unwrap();
    let templates = format!(
        "{}, {}",
        template("python.tmpl").display(),
        template("go_client.tmpl").display()
    );

    let output = idlforge()
        .arg("generate")
        .arg("--input")
        .arg(fixture("user_service.yaml"))
        .arg("--templates")
        .arg(&templates)
        .arg("--output")
        .arg(out.path())
        .output()
        .expect("run cli");

    assert!(output.status.success(), "{:?}", output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Generated py code in"));
    assert!(stdout.contains("Generated go code in"));
    assert_eq!(
        fs::read_to_string(out.path().join("userservice.py")).unwrap(),
        PYTHON_USER_SERVICE
    );
    assert!(out.path().join("userservice_client.go").exists());
}

#[test]
fn test_cli_default_output_dir() {
    let cwd = TempDir::new().unwrap();
    let status = idlforge()
        .current_dir(cwd.path())
        .args(["generate", "-i"])
        .arg(fixture("user_service.yaml"))
        .arg("-t")
        .arg(template("python.tmpl"))
        .status()
        .expect("run cli");

    assert!(status.success());
    assert!(cwd.path().join("generated").join("userservice.py").exists());
}

#[test]
fn test_cli_output_dir_from_env() {
    let out = TempDir::new().unwrap();
    let target = out.path().join("from_env");
    let status = idlforge()
        .env("IDLFORGE_OUTPUT_DIR", &target)
        .args(["generate", "-i"])
        .arg(fixture("user_service.yaml"))
        .arg("-t")
        .arg(template("python.tmpl"))
        .status()
        .expect("run cli");

    assert!(status.success());
    assert!(target.join("userservice.py").exists());
}

#[test]
fn test_cli_failing_template_exits_nonzero() {
    let out = TempDir::new().unwrap();
    let output = idlforge()
        .args(["generate", "-i"])
        .arg(fixture("user_service.yaml"))
        .arg("-t")
        .arg(template("no_metadata.tmpl"))
        .arg("-o")
        .arg(out.path())
        .output()
        .expect("run cli");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error:"), "{stderr}");
    assert!(stderr.contains("metadata"), "{stderr}");
    assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
}

#[test]
fn test_cli_invalid_additional_context() {
    let out = TempDir::new().unwrap();
    let output = idlforge()
        .args(["generate", "-i"])
        .arg(fixture("user_service.yaml"))
        .arg("-t")
        .arg(template("python.tmpl"))
        .arg("-o")
        .arg(out.path())
        .args(["--additional-context-json", "{broken"])
        .output()
        .expect("run cli");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("additional context"));
}

#[test]
fn test_cli_validate() {
    let clean = idlforge()
        .args(["validate", "-i"])
        .arg(fixture("user_service.yaml"))
        .output()
        .expect("run cli");
    assert!(clean.status.success());
    assert!(String::from_utf8_lossy(&clean.stdout).contains("no issues found"));

    let warned = idlforge()
        .args(["validate", "-i"])
        .arg(fixture("unresolved_types.yaml"))
        .output()
        .expect("run cli");
    assert!(warned.status.success());
    assert!(String::from_utf8_lossy(&warned.stdout).contains("unresolved_type"));

    let strict = idlforge()
        .args(["validate", "--fail-on-warning", "-i"])
        .arg(fixture("unresolved_types.yaml"))
        .status()
        .expect("run cli");
    assert!(!strict.success());

    let invalid = idlforge()
        .args(["validate", "-i"])
        .arg(fixture("missing_field_type.yaml"))
        .output()
        .expect("run cli");
    assert!(!invalid.status.success());
    assert!(String::from_utf8_lossy(&invalid.stderr).contains("Order.total"));
}

#[test]
fn test_cli_version() {
    let output = idlforge().arg("version").output().expect("run cli");
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        format!("idlforge version {}", env!("CARGO_PKG_VERSION"))
    );
}
