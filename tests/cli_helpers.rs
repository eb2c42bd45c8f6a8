#![allow(dead_code)]

use anyhow::{bail, Context, Result};
use assert_cmd::cargo;
use serde_json::Value;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

pub fn db_path(home: &TempDir) -> PathBuf {
    home.path().join(".salary-tax").join("data.db")
}

pub fn conversation_log_path(home: &TempDir) -> PathBuf {
    home.path().join(".salary-tax").join("ai_conversation_log.json")
}

/// Command isolated in a temp HOME, without colors or an API key
pub fn base_cmd(home: &TempDir) -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("salary-tax"));
    cmd.env("HOME", home.path());
    cmd.env_remove("GEMINI_API_KEY");
    cmd.env_remove("SALARY_TAX_DB");
    cmd.env_remove("SALARY_TAX_GEMINI_URL");
    cmd.arg("--no-color");
    cmd
}

pub fn run_cmd(home: &TempDir, args: &[&str]) -> Result<Output> {
    let mut cmd = base_cmd(home);
    cmd.args(args);
    let output = cmd.output()?;
    if !output.status.success() {
        bail!(
            "command failed: {:?}\nstdout: {}\nstderr: {}",
            args,
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
    }
    Ok(output)
}

pub fn run_json(home: &TempDir, args: &[&str]) -> Result<Value> {
    let mut full_args = vec!["--json"];
    full_args.extend_from_slice(args);
    let output = run_cmd(home, &full_args)?;
    serde_json::from_slice(&output.stdout).context("stdout was not valid JSON")
}

/// Run `compare --save` on annual amounts and return the session id
pub fn save_comparison(home: &TempDir, session: &str, gross: &str) -> Result<Value> {
    run_json(
        home,
        &[
            "compare",
            "--period",
            "annual",
            "--gross-salary",
            gross,
            "--save",
            "--session",
            session,
        ],
    )
}
