// decomp-forge: decompilation build pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Output streaming and capture.
//!
//! ```text
//! run_child()
//!   stdout/stderr reader tasks --> mpsc channels buffer lines
//!   wait | cancel
//!   --> ProcessOutput { stdout, stderr, exit_code, interrupted }
//! ```

use crate::error::Result;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Child;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{trace, warn};

use super::builder::{ProcessBuilder, ProcessOutput, StreamFlags};

/// Spawns a line reader for one stream when its output is wanted.
fn spawn_reader<R>(
    stream: Option<R>,
    flags: StreamFlags,
    process_name: &str,
    stream_name: &'static str,
    tx: mpsc::UnboundedSender<String>,
) -> Option<JoinHandle<()>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    if flags.is_empty() {
        return None;
    }
    stream.map(|stream| {
        let name = process_name.to_string();
        tokio::spawn(async move {
            let mut lines = BufReader::new(stream).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        if flags.contains(StreamFlags::FORWARD_TO_LOG) {
                            trace!(process = %name, stream = stream_name, line = %line, "output");
                        }
                        if flags.contains(StreamFlags::KEEP_IN_STRING) {
                            let _ = tx.send(line);
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        warn!(process = %name, stream = stream_name, error = %e, "error reading stream");
                        break;
                    }
                }
            }
        })
    })
}

/// Joins buffered lines with `\n`.
fn collect_output(rx: &mut mpsc::UnboundedReceiver<String>) -> String {
    let mut output = String::new();
    while let Ok(line) = rx.try_recv() {
        if !output.is_empty() {
            output.push('\n');
        }
        output.push_str(&line);
    }
    output
}

impl ProcessBuilder {
    /// Streams the child's output until it exits or `token` fires.
    pub(super) async fn run_child(
        &self,
        name: &str,
        child: &mut Child,
        token: CancellationToken,
    ) -> Result<ProcessOutput> {
        let (stdout_tx, mut stdout_rx) = mpsc::unbounded_channel();
        let (stderr_tx, mut stderr_rx) = mpsc::unbounded_channel();

        let readers = [
            spawn_reader(
                child.stdout.take(),
                self.stdout_config(),
                name,
                "stdout",
                stdout_tx,
            ),
            spawn_reader(
                child.stderr.take(),
                self.stderr_config(),
                name,
                "stderr",
                stderr_tx,
            ),
        ];

        let (exit_status, interrupted) = tokio::select! {
            status = child.wait() => (status?, false),
            () = token.cancelled() => {
                warn!(process = %name, "cancellation requested, terminating process");
                child.kill().await.ok();
                (child.wait().await?, true)
            }
        };

        for handle in readers.into_iter().flatten() {
            let _ = handle.await;
        }

        Ok(ProcessOutput::new(
            exit_status.code().unwrap_or(-1),
            collect_output(&mut stdout_rx),
            collect_output(&mut stderr_rx),
            interrupted,
        ))
    }
}
