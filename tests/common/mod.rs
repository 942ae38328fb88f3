//! Shared integration-test harness for running the `tabata` binary.

#![allow(dead_code)]

use std::path::PathBuf;
use std::process::{Output, Stdio};
use std::time::Duration;

use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};

/// Default timeout for waiting on the child.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Path to the compiled binary.
#[must_use]
pub fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_tabata")
}

/// Returns the path to a test fixture.
#[must_use]
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Runs the binary to completion with stdin closed.
#[allow(clippy::missing_panics_doc)]
pub fn spawn_command(args: &[&str]) -> Output {
    std::process::Command::new(bin())
        .args(args)
        .env_remove("TABATA_CONFIG")
        .env_remove("TABATA_LOG_LEVEL")
        .stdin(Stdio::null())
        .output()
        .expect("failed to run tabata")
}

/// Parses every non-empty stdout line as JSON.
#[allow(clippy::missing_panics_doc)]
pub fn json_lines(bytes: &[u8]) -> Vec<Value> {
    String::from_utf8_lossy(bytes)
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| {
            serde_json::from_str(l).unwrap_or_else(|e| panic!("invalid JSON: {e}\nline: {l}"))
        })
        .collect()
}

/// A running `tabata run` process with piped stdin/stdout.
///
/// The child process is killed on drop.
pub struct TabataProcess {
    child: Child,
    stdin: ChildStdin,
    reader: BufReader<ChildStdout>,
}

impl TabataProcess {
    /// Spawns `tabata run` with the given extra arguments.
    #[allow(clippy::missing_panics_doc)]
    pub fn spawn_run(args: &[&str]) -> Self {
        let mut child = Command::new(bin())
            .arg("run")
            .args(args)
            .env_remove("TABATA_CONFIG")
            .env_remove("TABATA_LOG_LEVEL")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .expect("failed to spawn tabata");

        let stdin = child.stdin.take().expect("stdin not captured");
        let stdout = child.stdout.take().expect("stdout not captured");

        Self {
            child,
            stdin,
            reader: BufReader::new(stdout),
        }
    }

    /// Reads one JSON frame from stdout.
    #[allow(clippy::missing_panics_doc)]
    pub async fn read_frame(&mut self) -> Value {
        let mut line = String::new();
        tokio::time::timeout(DEFAULT_TIMEOUT, async {
            loop {
                line.clear();
                let n = self
                    .reader
                    .read_line(&mut line)
                    .await
                    .expect("read_line I/O error");
                assert!(n > 0, "unexpected EOF from tabata");
                let trimmed = line.trim();
                if !trimmed.is_empty() {
                    return serde_json::from_str::<Value>(trimmed)
                        .unwrap_or_else(|e| panic!("invalid JSON frame: {e}\nline: {line}"));
                }
            }
        })
        .await
        .expect("timed out waiting for a frame")
    }

    /// Writes one command line to stdin.
    #[allow(clippy::missing_panics_doc)]
    pub async fn send_line(&mut self, line: &str) {
        self.stdin
            .write_all(format!("{line}\n").as_bytes())
            .await
            .expect("failed to write to stdin");
        self.stdin.flush().await.expect("failed to flush stdin");
    }

    /// Waits for exit and returns the remaining output.
    #[allow(clippy::missing_panics_doc)]
    pub async fn wait(self) -> Output {
        let Self { child, stdin, .. } = self;
        drop(stdin);
        tokio::time::timeout(DEFAULT_TIMEOUT, child.wait_with_output())
            .await
            .expect("tabata did not exit")
            .expect("failed to collect output")
    }
}
