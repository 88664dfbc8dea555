//! External tool integration
//!
//! Everything outside this process is reached through [`CommandExecutor`].

pub mod command;
pub mod jobs;

pub use command::{CommandExecutor, ExecutionOutput, Job, SystemExecutor, parse_width};

use crate::config::ToolsConfig;
use crate::error::PipelineError;

/// Check that every configured program can be found on `PATH`
pub fn ensure_tools(tools: &ToolsConfig) -> Result<(), PipelineError> {
    let programs = [
        ("magick", &tools.magick),
        ("segmenter", &tools.segmenter),
        ("copy", &tools.copy),
        ("unzip", &tools.unzip),
        ("zip", &tools.zip),
    ];

    let missing: Vec<String> = programs
        .iter()
        .filter(|(_, program)| which::which(program.as_str()).is_err())
        .map(|(key, program)| format!("tools.{key} = '{program}'"))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(PipelineError::config(format!(
            "required tools not found on PATH: {}",
            missing.join(", ")
        )))
    }
}
