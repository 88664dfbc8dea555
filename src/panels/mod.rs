//! Panels and panel listings

pub mod natural;

use serde::Serialize;
use std::path::Path;

use crate::config::ToolsConfig;
use crate::error::PipelineError;
use crate::external::{CommandExecutor, jobs, parse_width};

/// One segmented image with its probed pixel width
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Panel {
    pub name: String,
    pub width: u32,
}

impl Panel {
    pub fn new(name: impl Into<String>, width: u32) -> Self {
        Self {
            name: name.into(),
            width,
        }
    }
}

/// Probe the width of every panel, in the given order
///
/// Probes run one after another. The first failure aborts the whole
/// listing so a plan is never built from partial widths.
pub fn probe_panels<E>(
    executor: &E,
    tools: &ToolsConfig,
    dir: &Path,
    names: &[String],
) -> Result<Vec<Panel>, PipelineError>
where
    E: CommandExecutor + ?Sized,
{
    names
        .iter()
        .map(|name| {
            let output = executor.execute(&jobs::width_probe(tools, &dir.join(name)))?;
            let width = parse_width(name, &output.stdout)?;
            tracing::debug!("probed {name}: {width}px");
            Ok(Panel::new(name.clone(), width))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::{ExecutionOutput, Job};
    use std::sync::Mutex;

    fn tools() -> ToolsConfig {
        ToolsConfig {
            magick: "magick".to_string(),
            segmenter: "kumiko".to_string(),
            copy: "cp".to_string(),
            unzip: "unzip".to_string(),
            zip: "zip".to_string(),
        }
    }

    #[test]
    fn test_probe_panels_in_order() {
        let seen = Mutex::new(Vec::new());
        let executor = |job: &Job| -> Result<ExecutionOutput, PipelineError> {
            let path = job.arguments().last().unwrap().to_string_lossy().into_owned();
            seen.lock().unwrap().push(path.clone());
            let width = if path.ends_with("a.jpg") { "2100" } else { "400\n" };
            Ok(ExecutionOutput::with_stdout(width))
        };

        let names = vec!["a.jpg".to_string(), "b.jpg".to_string()];
        let panels = probe_panels(&executor, &tools(), Path::new("panels"), &names).unwrap();

        assert_eq!(panels, vec![Panel::new("a.jpg", 2100), Panel::new("b.jpg", 400)]);
        assert_eq!(
            *seen.lock().unwrap(),
            vec!["panels/a.jpg".to_string(), "panels/b.jpg".to_string()]
        );
    }

    #[test]
    fn test_bad_probe_output_aborts_listing() {
        let calls = Mutex::new(0);
        let executor = |_: &Job| -> Result<ExecutionOutput, PipelineError> {
            *calls.lock().unwrap() += 1;
            Ok(ExecutionOutput::with_stdout("not a width"))
        };

        let names = vec!["a.jpg".to_string(), "b.jpg".to_string()];
        let err = probe_panels(&executor, &tools(), Path::new("p"), &names).unwrap_err();

        assert!(matches!(err, PipelineError::ProbeParse { ref panel, .. } if panel == "a.jpg"));
        assert_eq!(*calls.lock().unwrap(), 1);
    }
}
