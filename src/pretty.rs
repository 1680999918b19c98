//! Optional pass through an external source formatter (`gofmt`, `rustfmt`).
//!
//! The formatter reads the source on stdin and writes the result to stdout.
//! Any failure hands back the unformatted source inside [`Error::Format`].
use std::io::Write;
use std::process::{Command, Stdio};

use crate::error::{Error, Result};

/// Pipe `source` through `command` (a program followed by whitespace-separated
/// arguments).
pub fn pretty(command: &str, source: &str) -> Result<String> {
    run(command, source).map_err(|message| {
        tracing::warn!(%command, %message, "formatter failed, keeping unformatted output");
        Error::Format {
            command: command.to_string(),
            message,
            unformatted: source.to_string(),
        }
    })
}

fn run(command: &str, source: &str) -> Result<String, String> {
    let mut words = command.split_whitespace();
    let program = words.next().ok_or_else(|| "empty formatter command".to_string())?;

    let mut child = Command::new(program)
        .args(words)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| format!("cannot start `{program}`: {e}"))?;

    // Feed stdin from another thread so a chatty formatter cannot deadlock us.
    let mut stdin = child.stdin.take().ok_or_else(|| "stdin not captured".to_string())?;
    let input = source.to_string();
    let writer = std::thread::spawn(move || stdin.write_all(input.as_bytes()));

    let output = child.wait_with_output().map_err(|e| e.to_string())?;
    match writer.join() {
        Ok(Ok(())) => {}
        Ok(Err(e)) => return Err(format!("writing to `{program}`: {e}")),
        Err(_) => return Err(format!("writing to `{program}` panicked")),
    }

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("{}: {}", output.status, stderr.trim()));
    }
    String::from_utf8(output.stdout).map_err(|e| format!("non UTF-8 output: {e}"))
}
