//! Command execution
//!
//! Every external step (width probe, montage, copy, segmentation, conversion,
//! packaging) is a [`Job`] handed to a [`CommandExecutor`]. Jobs carry their
//! arguments as a list, so filenames never pass through a shell.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::process::Command;

use crate::error::PipelineError;

/// One unit of external work: a program and its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    program: OsString,
    args: Vec<OsString>,
}

impl Job {
    pub fn new(program: impl AsRef<OsStr>) -> Self {
        Self {
            program: program.as_ref().to_os_string(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    pub fn program(&self) -> &OsStr {
        &self.program
    }

    pub fn arguments(&self) -> &[OsString] {
        &self.args
    }
}

impl fmt::Display for Job {
    /// Renders the job the way it could be retyped in a terminal
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", quote(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", quote(arg))?;
        }
        Ok(())
    }
}

fn quote(value: &OsStr) -> String {
    let text = value.to_string_lossy();
    let plain = !text.is_empty()
        && text
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./%+=:,@".contains(c));
    if plain {
        text.into_owned()
    } else {
        format!("'{}'", text.replace('\'', r"'\''"))
    }
}

/// Captured output of a successful job
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionOutput {
    pub stdout: String,
    pub stderr: String,
}

impl ExecutionOutput {
    pub fn with_stdout(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }
}

/// Runs one job to completion
///
/// Implementations must be shareable between worker threads.
pub trait CommandExecutor: Send + Sync {
    fn execute(&self, job: &Job) -> Result<ExecutionOutput, PipelineError>;
}

impl<F> CommandExecutor for F
where
    F: Fn(&Job) -> Result<ExecutionOutput, PipelineError> + Send + Sync,
{
    fn execute(&self, job: &Job) -> Result<ExecutionOutput, PipelineError> {
        self(job)
    }
}

/// Executes jobs as child processes of this program
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemExecutor;

impl CommandExecutor for SystemExecutor {
    fn execute(&self, job: &Job) -> Result<ExecutionOutput, PipelineError> {
        tracing::debug!("running: {job}");

        let mut cmd = Command::new(job.program());
        cmd.args(job.arguments());

        let output = cmd.output().map_err(|source| PipelineError::Spawn {
            job: job.to_string(),
            source,
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            tracing::warn!("command failed ({}): {job}", output.status);
            return Err(PipelineError::Execution {
                job: job.to_string(),
                exit_code: output.status.code(),
                stderr,
            });
        }

        Ok(ExecutionOutput { stdout, stderr })
    }
}

/// Parse the output of a width probe into a pixel width
///
/// The probe prints the width as its only output. Anything else, including
/// zero, is rejected rather than replaced by a default.
pub fn parse_width(panel: &str, output: &str) -> Result<u32, PipelineError> {
    let text = output.trim();
    match text.parse::<u32>() {
        Ok(width) if width > 0 && text.bytes().all(|b| b.is_ascii_digit()) => Ok(width),
        _ => Err(PipelineError::ProbeParse {
            panel: panel.to_string(),
            output: output.to_string(),
        }),
    }
}
