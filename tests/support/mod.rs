#![allow(dead_code)]

use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::NamedTempFile;

/// Path to one of the crate's binaries, built by cargo for integration tests.
pub fn binary(name: &str) -> PathBuf {
    let path = match name {
        "directory-render" => env!("CARGO_BIN_EXE_directory-render"),
        "directory-search" => env!("CARGO_BIN_EXE_directory-search"),
        "directory-shell" => env!("CARGO_BIN_EXE_directory-shell"),
        other => panic!("unknown binary {other}"),
    };
    PathBuf::from(path)
}

/// Command for a binary with the config env var cleared so the host
/// environment cannot leak a real endpoint into a test.
pub fn command(name: &str) -> Command {
    let mut cmd = Command::new(binary(name));
    cmd.env_remove("DIRECTORIO_CONFIG").env("RUST_LOG", "off");
    cmd
}

/// Write a JSON value to a temp file that lives as long as the handle.
pub fn json_fixture(value: &Value) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new().context("creating fixture")?;
    serde_json::to_writer(&mut file, value).context("writing fixture")?;
    file.flush()?;
    Ok(file)
}

pub fn text_fixture(text: &str) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new().context("creating fixture")?;
    file.write_all(text.as_bytes())?;
    file.flush()?;
    Ok(file)
}

pub fn run_command(mut cmd: Command) -> Result<Output> {
    let output = cmd
        .output()
        .with_context(|| format!("failed to run command: {:?}", cmd))?;
    if output.status.success() {
        Ok(output)
    } else {
        bail!(
            "command {:?} failed: status {:?}\nstdout: {}\nstderr: {}",
            cmd,
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        )
    }
}

/// Run a command feeding `stdin`, returning its output regardless of status.
pub fn run_with_stdin(mut cmd: Command, stdin: &str) -> Result<Output> {
    let mut child = cmd
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("failed to spawn {:?}", cmd))?;
    child
        .stdin
        .take()
        .context("child stdin")?
        .write_all(stdin.as_bytes())?;
    child.wait_with_output().context("waiting for child")
}

pub fn render_page(input: &Path, extra: &[&str]) -> Result<String> {
    let mut cmd = command("directory-render");
    cmd.arg("--input").arg(input).args(extra);
    let output = run_command(cmd)?;
    Ok(String::from_utf8(output.stdout)?)
}

pub fn search_lines(input: &Path, extra: &[&str]) -> Result<Vec<Value>> {
    let mut cmd = command("directory-search");
    cmd.arg("--input").arg(input).args(extra);
    let output = run_command(cmd)?;
    String::from_utf8(output.stdout)?
        .lines()
        .map(|line| serde_json::from_str(line).context("parsing NDJSON line"))
        .collect()
}
