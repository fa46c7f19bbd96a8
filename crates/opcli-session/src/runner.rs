//! Background runner that drives one signin subprocess to completion.
//!
//! Pipe I/O is blocking, so the child and its three stdio pumps each get a
//! dedicated OS thread rather than a runtime worker. The runner thread waits
//! for the child, joins the two output pumps (every chunk has been handed to
//! the protocol loop by then) and publishes the outcome exactly once on a
//! oneshot channel.

use std::io::{self, Read, Write};
use std::process::{Command, ExitStatus};
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, JoinHandle};

use thiserror::Error;
use tokio::sync::oneshot;

use crate::command::SigninCommand;
use crate::stream::{ChunkSink, InputFeed};

/// Why a signin run did not succeed.
#[derive(Debug, Error)]
pub enum ProcessFailure {
    #[error("failed to launch signin process: {0}")]
    Launch(#[source] io::Error),

    #[error("failed to wait for signin process: {0}")]
    Wait(#[source] io::Error),

    #[error("signin process failed with {0}")]
    Exit(ExitStatus),

    #[error("failed to start signin runner thread: {0}")]
    Runner(#[source] io::Error),

    #[error("signin runner exited without reporting a result")]
    Lost,
}

/// Terminal result of one run.
pub type Completion = Result<(), ProcessFailure>;

static NEXT_RUN: AtomicU64 = AtomicU64::new(1);

/// Start the subprocess on a dedicated runner thread.
///
/// `stdin` is copied into the child until its queue closes; child stdout and
/// stderr are copied into the two sinks. The returned receiver fires once
/// with the terminal result.
pub fn spawn(
    command: &SigninCommand,
    stdin: InputFeed,
    stdout: ChunkSink,
    stderr: ChunkSink,
) -> oneshot::Receiver<Completion> {
    let run_id = NEXT_RUN.fetch_add(1, Ordering::Relaxed);
    let cmd = command.to_command();
    let (done_tx, done_rx) = oneshot::channel();

    let spawned = thread::Builder::new()
        .name(format!("opcli-signin-{run_id}"))
        .spawn(move || {
            let outcome = run(run_id, cmd, stdin, stdout, stderr);
            let _ = done_tx.send(outcome);
        });

    match spawned {
        Ok(_) => done_rx,
        Err(e) => {
            log::warn!("failed to start signin runner thread: {e}");
            failed(ProcessFailure::Runner(e))
        }
    }
}

/// A completion signal that has already fired with `failure`.
fn failed(failure: ProcessFailure) -> oneshot::Receiver<Completion> {
    let (tx, rx) = oneshot::channel();
    let _ = tx.send(Err(failure));
    rx
}

fn run(
    run_id: u64,
    mut cmd: Command,
    stdin: InputFeed,
    stdout: ChunkSink,
    stderr: ChunkSink,
) -> Completion {
    let mut child = cmd.spawn().map_err(ProcessFailure::Launch)?;
    log::debug!("signin run {run_id} started (pid {})", child.id());

    // The stdin pump is left detached: it ends when the input queue closes
    // or the pipe breaks, neither of which is tied to the child exiting.
    if let Some(pipe) = child.stdin.take() {
        pump(run_id, "stdin", stdin, pipe);
    }
    let stdout_pump = child
        .stdout
        .take()
        .and_then(|pipe| pump(run_id, "stdout", pipe, stdout));
    let stderr_pump = child
        .stderr
        .take()
        .and_then(|pipe| pump(run_id, "stderr", pipe, stderr));

    let status = child.wait();

    for handle in [stdout_pump, stderr_pump].into_iter().flatten() {
        if handle.join().is_err() {
            log::warn!("signin run {run_id}: output pump panicked");
        }
    }

    let status = status.map_err(ProcessFailure::Wait)?;
    log::debug!("signin run {run_id} exited with {status}");
    if status.success() {
        Ok(())
    } else {
        Err(ProcessFailure::Exit(status))
    }
}

/// Copy `from` into `to` on its own thread until either side ends.
fn pump<R, W>(run_id: u64, label: &'static str, mut from: R, mut to: W) -> Option<JoinHandle<()>>
where
    R: Read + Send + 'static,
    W: Write + Send + 'static,
{
    thread::Builder::new()
        .name(format!("opcli-{label}-{run_id}"))
        .spawn(move || match io::copy(&mut from, &mut to) {
            Ok(n) => log::debug!("signin run {run_id}: {label} closed after {n} bytes"),
            Err(e) => log::debug!("signin run {run_id}: {label} pump stopped: {e}"),
        })
        .map_err(|e| log::warn!("signin run {run_id}: failed to start {label} pump: {e}"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::directory::AccountInfo;
    use crate::stream::{chunk_channel, input_channel};

    fn command_for(program: &str) -> SigninCommand {
        let config = SessionConfig::new(program, "/tmp/opcli-runner-test");
        SigninCommand::new(&config, &AccountInfo::default())
    }

    #[test]
    fn test_launch_failure_is_reported() {
        let (_queue, feed) = input_channel("");
        let (out_sink, _out_rx) = chunk_channel();
        let (err_sink, _err_rx) = chunk_channel();

        let done = spawn(
            &command_for("/nonexistent/opcli-test-binary"),
            feed,
            out_sink,
            err_sink,
        );
        let outcome = done.blocking_recv().unwrap();
        assert!(matches!(outcome, Err(ProcessFailure::Launch(_))));
    }

    #[test]
    fn test_runner_thread_failure_is_not_a_launch_failure() {
        let e = io::Error::new(io::ErrorKind::WouldBlock, "no threads left");
        let outcome = failed(ProcessFailure::Runner(e)).blocking_recv().unwrap();

        let failure = outcome.unwrap_err();
        assert!(matches!(failure, ProcessFailure::Runner(_)));
        assert_eq!(
            failure.to_string(),
            "failed to start signin runner thread: no threads left"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_is_failure() {
        let (mut queue, feed) = input_channel("");
        queue.close();
        let (out_sink, mut out_rx) = chunk_channel();
        let (err_sink, mut err_rx) = chunk_channel();

        // `false` ignores its arguments and exits 1.
        let done = spawn(&command_for("false"), feed, out_sink, err_sink);
        assert!(out_rx.blocking_recv().is_none());
        assert!(err_rx.blocking_recv().is_none());

        let outcome = done.blocking_recv().unwrap();
        match outcome {
            Err(ProcessFailure::Exit(status)) => assert_eq!(status.code(), Some(1)),
            other => panic!("expected exit failure, got {other:?}"),
        }
    }
}
