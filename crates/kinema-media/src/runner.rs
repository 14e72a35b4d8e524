//! Encoder subprocess runner with progress draining and cancellation.

use std::path::Path;
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::error::{MediaError, MediaResult};

/// Number of trailing diagnostic lines kept for failure reports.
const STDERR_TAIL_LINES: usize = 20;

/// Runner for encoder invocations.
///
/// The diagnostic stream is drained continuously line by line; failing to
/// drain it risks the subprocess stalling on a full pipe buffer.
pub struct EncoderRunner {
    cancel_rx: Option<watch::Receiver<bool>>,
}

impl Default for EncoderRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl EncoderRunner {
    /// Create a new runner.
    pub fn new() -> Self {
        Self { cancel_rx: None }
    }

    /// Set the cancellation signal. When it flips to `true`, the spawned
    /// subprocess is killed rather than left orphaned.
    pub fn with_cancel(mut self, cancel_rx: watch::Receiver<bool>) -> Self {
        self.cancel_rx = Some(cancel_rx);
        self
    }

    /// Run the program with the given arguments and working directory,
    /// feeding every diagnostic line to `on_line`.
    pub async fn run_with_progress<F>(
        &self,
        program: &Path,
        args: &[String],
        workdir: &Path,
        mut on_line: F,
    ) -> MediaResult<()>
    where
        F: FnMut(&str) + Send + 'static,
    {
        debug!(
            "Running {} {} (cwd {})",
            program.display(),
            args.join(" "),
            workdir.display()
        );

        let mut child = Command::new(program)
            .args(args)
            .current_dir(workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()?;

        let stderr = child.stderr.take().expect("stderr not captured");
        let mut reader = BufReader::new(stderr).lines();

        // Drain continuously on a separate task; keep a short tail for
        // failure reports.
        let drain_handle = tokio::spawn(async move {
            let mut tail: Vec<String> = Vec::new();
            while let Ok(Some(line)) = reader.next_line().await {
                on_line(&line);
                if tail.len() == STDERR_TAIL_LINES {
                    tail.remove(0);
                }
                tail.push(line);
            }
            tail
        });

        let mut cancel_rx = self.cancel_rx.clone();
        let status = loop {
            match cancel_rx.as_mut() {
                Some(cancel) => {
                    tokio::select! {
                        status = child.wait() => break status?,
                        changed = cancel.changed() => {
                            if changed.is_err() {
                                // Sender gone; nobody can cancel any more.
                                cancel_rx = None;
                            } else if *cancel.borrow() {
                                info!("Encode cancelled, killing subprocess");
                                let _ = child.kill().await;
                                drain_handle.abort();
                                return Err(MediaError::Cancelled);
                            }
                        }
                    }
                }
                None => break child.wait().await?,
            }
        };

        let tail = drain_handle.await.unwrap_or_default();

        if status.success() {
            Ok(())
        } else {
            Err(MediaError::encode_failed(
                status.code(),
                if tail.is_empty() {
                    None
                } else {
                    Some(tail.join("\n"))
                },
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    fn sh() -> PathBuf {
        PathBuf::from("sh")
    }

    #[tokio::test]
    async fn diagnostic_lines_reach_the_callback() {
        let dir = tempfile::tempdir().unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        EncoderRunner::new()
            .run_with_progress(
                &sh(),
                &["-c".into(), "echo 'time=00:00:01.00' >&2".into()],
                dir.path(),
                move |line| sink.lock().unwrap().push(line.to_string()),
            )
            .await
            .unwrap();

        assert!(seen
            .lock()
            .unwrap()
            .iter()
            .any(|l| l.contains("time=00:00:01.00")));
    }

    #[tokio::test]
    async fn nonzero_exit_is_encode_failed() {
        let dir = tempfile::tempdir().unwrap();
        let err = EncoderRunner::new()
            .run_with_progress(
                &sh(),
                &["-c".into(), "echo boom >&2; exit 3".into()],
                dir.path(),
                |_| {},
            )
            .await
            .unwrap_err();

        match err {
            MediaError::EncodeFailed {
                exit_code,
                stderr_tail,
            } => {
                assert_eq!(exit_code, Some(3));
                assert!(stderr_tail.unwrap().contains("boom"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn cancellation_kills_the_subprocess() {
        let dir = tempfile::tempdir().unwrap();
        let workdir = dir.path().to_path_buf();
        let (tx, rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            EncoderRunner::new()
                .with_cancel(rx)
                .run_with_progress(&sh(), &["-c".into(), "sleep 30".into()], &workdir, |_| {})
                .await
        });

        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        tx.send(true).unwrap();

        let err = handle.await.unwrap().unwrap_err();
        assert!(matches!(err, MediaError::Cancelled));
    }
}
