//! Running an external synthesis program with a hard deadline.

use std::borrow::Cow;
use std::io::{ErrorKind, Read, Write};
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use wait_timeout::ChildExt;

use crate::error::SynthesisCause;

/// Spawn `command`, optionally feed `stdin`, and collect its stdout.
///
/// The child is killed once `timeout` elapses. Output pipes are drained on
/// helper threads so a chatty child cannot block on a full pipe while we wait.
pub fn run_with_timeout(
    mut command: Command,
    stdin: Option<&str>,
    timeout: Duration,
) -> Result<Vec<u8>, SynthesisCause> {
    let program = command.get_program().to_string_lossy().into_owned();
    command
        .stdin(if stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = command.spawn().map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            SynthesisCause::BackendNotFound(program.clone())
        } else {
            SynthesisCause::Io(e)
        }
    })?;

    let stdout = child.stdout.take().map(drain);
    let stderr = child.stderr.take().map(drain);

    if let (Some(text), Some(mut pipe)) = (stdin, child.stdin.take()) {
        match pipe.write_all(stdin_payload(text).as_bytes()) {
            Ok(()) => {}
            // The child stopped reading; its exit status and stderr say why.
            Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                log::debug!("{program} closed stdin early");
            }
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(SynthesisCause::Io(e));
            }
        }
    }

    let status = match child.wait_timeout(timeout)? {
        Some(status) => status,
        None => {
            let _ = child.kill();
            let _ = child.wait();
            log::warn!("{program} timed out after {timeout:?}, killed");
            return Err(SynthesisCause::TimedOut(timeout));
        }
    };

    let stdout = collect(stdout);
    let stderr = collect(stderr);
    if !status.success() {
        return Err(SynthesisCause::Failed {
            code: status.code(),
            stderr: String::from_utf8_lossy(&stderr).trim().to_string(),
        });
    }
    Ok(stdout)
}

/// Line-oriented readers (espeak-ng, piper) can drop the last token when
/// input has no terminating newline.
fn stdin_payload(input: &str) -> Cow<'_, str> {
    if input.ends_with('\n') {
        Cow::Borrowed(input)
    } else {
        Cow::Owned(format!("{input}\n"))
    }
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        buf
    })
}

fn collect(handle: Option<JoinHandle<Vec<u8>>>) -> Vec<u8> {
    handle.and_then(|h| h.join().ok()).unwrap_or_default()
}
