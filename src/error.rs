//! Error types for the panel pipeline
//!
//! Library code returns [`PipelineError`]; the CLI wraps it in `anyhow` with
//! context about the phase that failed.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while planning, executing or orchestrating a phase
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Width probe printed something that is not a positive base-10 integer
    #[error("width probe for '{panel}' returned {output:?}, expected a positive integer")]
    ProbeParse { panel: String, output: String },

    /// External command ran but reported failure
    #[error("command failed ({}): {job}{}", describe_exit(.exit_code), describe_stderr(.stderr))]
    Execution {
        job: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    /// External command could not be started at all
    #[error("failed to start command: {job}")]
    Spawn {
        job: String,
        #[source]
        source: std::io::Error,
    },

    /// Invalid settings or missing input, detected before any worker starts
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A worker of a pool phase failed; carries the first failure received
    #[error("worker {worker} failed on job {index} of its batch")]
    PoolFailure {
        worker: usize,
        index: usize,
        #[source]
        source: Box<PipelineError>,
    },

    /// A worker thread panicked instead of reporting an outcome
    #[error("a worker thread panicked during the {phase} phase")]
    WorkerPanicked { phase: String },

    /// Filesystem access failed
    #[error("I/O error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    pub fn config(message: impl Into<String>) -> Self {
        PipelineError::Configuration(message.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::Io {
            path: path.into(),
            source,
        }
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}

fn describe_stderr(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("\n{trimmed}")
    }
}
