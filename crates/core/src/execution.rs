use std::io::{BufRead, BufReader, Read, Write};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;

use log::{debug, warn};

use crate::error::{Error, Result, GENERIC_FAILURE_CODE};
use crate::host::Output;

/// Runs `executable` with `argv[1..]` as its arguments, relaying its output.
///
/// Standard output and standard error are piped and forwarded line by line to
/// `output`, each by its own thread, for as long as the child runs. Both
/// streams are drained completely before this returns, so a chatty child can
/// never block on a full pipe.
///
/// # Errors
///
/// Returns an error if:
/// - The program cannot be started
/// - Waiting for the child or reading its output fails
/// - The child exits with a non-success code ([`Error::ExternalCommandFailed`])
pub fn run(executable: &str, argv: &[String], output: &Output) -> Result<()> {
    let arguments = argv.get(1..).unwrap_or_default();

    let mut child = Command::new(executable)
        .args(arguments)
        .stdin(Stdio::inherit())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| Error::spawn_error(executable, e))?;

    let child_stdout = child.stdout.take();
    let child_stderr = child.stderr.take();

    let status = thread::scope(|scope| {
        let stdout_relay = scope.spawn(|| match child_stdout {
            Some(stream) => relay(stream, || output.stdout(), "stdout"),
            None => Ok(()),
        });
        let stderr_relay = scope.spawn(|| match child_stderr {
            Some(stream) => relay(stream, || output.stderr(), "stderr"),
            None => Ok(()),
        });

        let status = child.wait();

        let stdout_result = stdout_relay
            .join()
            .unwrap_or_else(|panic| std::panic::resume_unwind(panic));
        let stderr_result = stderr_relay
            .join()
            .unwrap_or_else(|panic| std::panic::resume_unwind(panic));

        stdout_result?;
        stderr_result?;
        status
    })
    .map_err(Error::SubProcess)?;

    check_status(argv, status)
}

/// Copies `stream` into the sink returned by `sink`, one line at a time.
///
/// A failing sink is reported once; reading carries on so the child is never
/// left writing into a full pipe.
fn relay<R, F, W>(stream: R, sink: F, stream_name: &str) -> std::io::Result<()>
where
    R: Read,
    F: Fn() -> W,
    W: std::ops::DerefMut,
    W::Target: Write,
{
    let mut reader = BufReader::new(stream);
    let mut line = Vec::new();
    let mut sink_broken = false;

    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }

        if sink_broken {
            continue;
        }

        let mut writer = sink();
        if let Err(e) = writer.write_all(&line).and_then(|()| writer.flush()) {
            warn!("Could not relay child {stream_name}, discarding the rest: {e}");
            sink_broken = true;
        }
    }

    debug!("Child {stream_name} closed");
    Ok(())
}

fn check_status(argv: &[String], status: ExitStatus) -> Result<()> {
    if status.success() {
        return Ok(());
    }

    Err(Error::ExternalCommandFailed {
        command: shell_words::join(argv),
        code: exit_code(status),
    })
}

#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;

    status
        .code()
        .or_else(|| status.signal().map(|signal| 128 + signal))
        .unwrap_or(GENERIC_FAILURE_CODE)
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(GENERIC_FAILURE_CODE)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::host::SharedBuffer;

    fn capture() -> (Output, SharedBuffer, SharedBuffer) {
        let out = SharedBuffer::default();
        let err = SharedBuffer::default();
        (
            Output::new(Box::new(out.clone()), Box::new(err.clone())),
            out,
            err,
        )
    }

    fn sh(script: &str) -> Vec<String> {
        vec!["sh".to_string(), "-c".to_string(), script.to_string()]
    }

    #[test]
    fn test_relays_both_streams() {
        let (output, out, err) = capture();
        run("sh", &sh("echo out; echo err >&2; printf tail"), &output).unwrap();

        assert_eq!(out.text(), "out\ntail");
        assert_eq!(err.text(), "err\n");
    }

    #[test]
    fn test_nonzero_exit_code() {
        let (output, _, _) = capture();
        let result = run("sh", &sh("exit 7"), &output);

        match result {
            Err(Error::ExternalCommandFailed { code, command }) => {
                assert_eq!(code, 7);
                assert_eq!(command, "sh -c 'exit 7'");
            }
            other => panic!("Expected external failure, got {other:?}"),
        }
    }

    #[test]
    fn test_signal_exit_code() {
        let (output, _, _) = capture();
        let result = run("sh", &sh("kill -9 $$"), &output);

        assert!(matches!(
            result,
            Err(Error::ExternalCommandFailed { code: 137, .. })
        ));
    }

    #[test]
    fn test_large_output_does_not_deadlock() {
        let (output, out, err) = capture();
        // Far more than a 64KiB pipe buffer on each stream
        let script = "i=0; while [ $i -lt 20000 ]; do \
                      echo \"line $i of stdout\"; echo \"line $i of stderr\" >&2; \
                      i=$((i+1)); done";
        run("sh", &sh(script), &output).unwrap();

        let stdout = out.text();
        let stderr = err.text();
        assert_eq!(stdout.lines().count(), 20000);
        assert_eq!(stderr.lines().count(), 20000);
        assert!(stdout.starts_with("line 0 of stdout\n"));
        assert!(stdout.ends_with("line 19999 of stdout\n"));
        assert!(stderr.ends_with("line 19999 of stderr\n"));
    }

    #[test]
    fn test_non_utf8_output_is_preserved() {
        let (output, out, _) = capture();
        run("sh", &sh("printf '\\377\\376\\n'"), &output).unwrap();

        assert_eq!(out.contents(), vec![0xff, 0xfe, b'\n']);
    }

    #[test]
    fn test_missing_program() {
        let (output, _, _) = capture();
        let result = run(
            "/this/program/does/not/exist",
            &["/this/program/does/not/exist".to_string()],
            &output,
        );

        assert!(matches!(result, Err(Error::Spawn { .. })));
    }
}
