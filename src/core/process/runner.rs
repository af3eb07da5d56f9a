// decomp-forge: decompilation build pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Process execution.
//!
//! ```text
//! run() / run_with_cancellation(token)
//!              |
//!     token already cancelled? --> interrupted output, nothing spawned
//!              |
//!          spawn() --> run_child()
//!              |
//!    exit code != 0 and not interrupted --> ProcessError::NonZeroExit
//!              |
//!       ProcessOutput { exit_code, stdout, stderr, interrupted }
//! ```

use crate::error::{ProcessError, Result};
use std::process::Stdio;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, trace};

use super::builder::{ProcessBuilder, ProcessOutput, StreamFlags};

impl ProcessBuilder {
    /// Name used in log events and errors.
    pub(super) fn display_name(&self) -> String {
        self.name_override().map_or_else(
            || {
                self.program().file_stem().map_or_else(
                    || "process".to_string(),
                    |s| s.to_string_lossy().into_owned(),
                )
            },
            String::from,
        )
    }

    /// The full command line, for logging.
    #[must_use]
    pub fn command_line(&self) -> String {
        use std::fmt::Write as _;

        let mut cmd = format!("{}", self.program().display());
        for arg in self.args_slice() {
            if arg.contains(' ') {
                let _ = write!(cmd, " \"{arg}\"");
            } else {
                let _ = write!(cmd, " {arg}");
            }
        }
        cmd
    }

    /// Spawns the process and waits for it.
    ///
    /// # Errors
    ///
    /// Returns a `ProcessError` if spawning fails or the process exits with a
    /// non-zero status.
    pub async fn run(self) -> Result<ProcessOutput> {
        self.run_with_cancellation(CancellationToken::new()).await
    }

    /// Spawns the process and waits for it or for `token`.
    ///
    /// A cancelled run kills the child and returns output with
    /// `interrupted = true`; its exit code is not checked.
    ///
    /// # Errors
    ///
    /// See [`ProcessBuilder::run`].
    pub async fn run_with_cancellation(self, token: CancellationToken) -> Result<ProcessOutput> {
        let name = self.display_name();
        let cmd_line = self.command_line();

        if token.is_cancelled() {
            return Ok(ProcessOutput::new(-1, String::new(), String::new(), true));
        }

        debug!(cmd = %cmd_line, "exec");
        let mut child = self
            .build_command()
            .spawn()
            .map_err(|source| ProcessError::SpawnFailed {
                command: cmd_line.clone(),
                source,
            })?;
        trace!(process = %name, pid = ?child.id(), "spawned");

        let output = self.run_child(&name, &mut child, token).await?;

        if !output.is_interrupted() && !output.success() {
            if !output.stderr().is_empty() {
                error!(process = %name, stderr = %output.stderr(), "process error output");
            }
            return Err(ProcessError::NonZeroExit {
                command: name,
                code: output.exit_code(),
            }
            .into());
        }

        trace!(
            process = %name,
            exit_code = output.exit_code(),
            interrupted = output.is_interrupted(),
            "completed"
        );
        Ok(output)
    }

    fn build_command(&self) -> Command {
        let mut command = Command::new(self.program());
        command
            .args(self.args_slice())
            .stdin(Stdio::null())
            .stdout(Self::stdio_from_flags(self.stdout_config()))
            .stderr(Self::stdio_from_flags(self.stderr_config()))
            .kill_on_drop(true);
        command
    }

    fn stdio_from_flags(flags: StreamFlags) -> Stdio {
        if flags.is_empty() {
            Stdio::null()
        } else {
            Stdio::piped()
        }
    }
}
