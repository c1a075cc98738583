//! External command execution utilities.
//!
//! Provides a builder API for running external processes asynchronously with
//! proper output handling and stdin piping.
//!
//! # Examples
//!
//! ```ignore
//! use crate::exec::Cmd;
//!
//! // Simple command
//! Cmd::new("node").args(["--version"]).run().await?;
//!
//! // With working directory and stdin piping
//! let output = Cmd::new("node")
//!     .args(["build.mjs", "server-config.json"])
//!     .cwd(work_dir)
//!     .run()
//!     .await?;
//! ```

use anyhow::{Context, Result};
use std::{
    ffi::{OsStr, OsString},
    path::{Path, PathBuf},
    process::{Output, Stdio},
};
use tokio::{io::AsyncWriteExt, process::Command};

// ============================================================================
// Builder API
// ============================================================================

/// Command builder for external process execution.
#[derive(Default)]
pub struct Cmd {
    program: OsString,
    args: Vec<OsString>,
    cwd: Option<PathBuf>,
    envs: Vec<(String, String)>,
    stdin_data: Option<Vec<u8>>,
    check_status: bool,
}

impl Cmd {
    /// Create a new command builder.
    pub fn new<S: AsRef<OsStr>>(program: S) -> Self {
        Self {
            program: program.as_ref().to_owned(),
            check_status: true,
            ..Default::default()
        }
    }

    /// Add a single argument. Empty arguments are dropped.
    pub fn arg<S: AsRef<OsStr>>(mut self, arg: S) -> Self {
        let arg = arg.as_ref();
        if !arg.is_empty() {
            self.args.push(arg.to_owned());
        }
        self
    }

    /// Add multiple arguments. Empty arguments are dropped.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        for arg in args {
            let arg = arg.as_ref();
            if !arg.is_empty() {
                self.args.push(arg.to_owned());
            }
        }
        self
    }

    /// Set working directory.
    pub fn cwd<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.cwd = Some(dir.as_ref().to_owned());
        self
    }

    /// Set environment variables for the subprocess.
    pub fn envs<K, V, I>(mut self, vars: I) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
        I: IntoIterator<Item = (K, V)>,
    {
        for (k, v) in vars {
            self.envs
                .push((k.as_ref().to_owned(), v.as_ref().to_owned()));
        }
        self
    }

    /// Set stdin data to pipe to the process.
    pub fn stdin<D: AsRef<[u8]>>(mut self, data: D) -> Self {
        self.stdin_data = Some(data.as_ref().to_vec());
        self
    }

    /// Return the output even on non-zero exit instead of failing.
    ///
    /// Callers that map exit codes onto their own error taxonomy use this.
    pub fn allow_failure(mut self) -> Self {
        self.check_status = false;
        self
    }

    /// Execute the command and collect its output.
    pub async fn run(self) -> Result<Output> {
        let name = self.program.to_string_lossy().to_string();

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .envs(self.envs.iter().cloned())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }

        let output = if let Some(stdin_data) = self.stdin_data {
            cmd.stdin(Stdio::piped());
            let mut child = cmd
                .spawn()
                .with_context(|| format!("Failed to spawn `{name}`"))?;

            if let Some(mut stdin) = child.stdin.take() {
                stdin
                    .write_all(&stdin_data)
                    .await
                    .with_context(|| format!("Failed to write stdin to `{name}`"))?;
            }

            child
                .wait_with_output()
                .await
                .with_context(|| format!("Failed to wait for `{name}`"))?
        } else {
            cmd.stdin(Stdio::null());
            cmd.output()
                .await
                .with_context(|| format!("Failed to execute `{name}`"))?
        };

        if self.check_status && !output.status.success() {
            anyhow::bail!(format_error(&name, &output));
        }

        Ok(output)
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Format error message for a failed command.
pub fn format_error(name: &str, output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);

    let mut msg = format!("Command `{name}` failed with {}\n", output.status);

    let stderr_trimmed = stderr.trim();
    if !stderr_trimmed.is_empty() {
        msg.push_str(stderr_trimmed);
    }

    let stdout_trimmed = stdout.trim();
    if !stdout_trimmed.is_empty() && !stdout_trimmed.starts_with('{') {
        msg.push_str("\nStdout:\n");
        msg.push_str(stdout_trimmed);
    }
    msg
}

// ============================================================================
// Tests
// ============================================================================
