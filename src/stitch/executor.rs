use serde::Serialize;
use std::path::PathBuf;

use super::planner::StitchDecision;
use crate::config::ToolsConfig;
use crate::error::PipelineError;
use crate::external::{CommandExecutor, Job, jobs};
use crate::parallel::ProgressSink;

/// Where panels are read from and strips are written to
#[derive(Debug, Clone)]
pub struct StitchLayout {
    pub source_dir: PathBuf,
    pub output_dir: PathBuf,
    pub spacer: PathBuf,
    pub geometry: String,
}

/// Counts of strips written by one stitch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StitchSummary {
    pub kept: usize,
    pub merged: usize,
}

impl StitchSummary {
    pub fn strips(&self) -> usize {
        self.kept + self.merged
    }
}

/// Carries out a stitch plan, one decision at a time, in plan order
pub struct StitchExecutor<'a, E: CommandExecutor + ?Sized> {
    executor: &'a E,
    tools: &'a ToolsConfig,
    layout: StitchLayout,
}

impl<'a, E: CommandExecutor + ?Sized> StitchExecutor<'a, E> {
    pub fn new(executor: &'a E, tools: &'a ToolsConfig, layout: StitchLayout) -> Self {
        Self {
            executor,
            tools,
            layout,
        }
    }

    /// The job that produces the strip for `decision`
    pub fn job_for(&self, decision: &StitchDecision) -> Job {
        let source = |name: &str| self.layout.source_dir.join(name);
        match decision {
            StitchDecision::Keep { panel } => {
                jobs::keep(self.tools, &source(&panel.name), &self.layout.output_dir)
            }
            StitchDecision::Merge { first, second } => jobs::merge(
                self.tools,
                &source(&first.name),
                &self.layout.spacer,
                &source(&second.name),
                &self.layout.geometry,
                &self.layout.output_dir.join(decision.output_name()),
            ),
        }
    }

    /// Execute every decision; the first failure stops the run
    pub fn execute(
        &self,
        decisions: &[StitchDecision],
        progress: &dyn ProgressSink,
    ) -> Result<StitchSummary, PipelineError> {
        progress.phase_started(&[decisions.len()]);
        let result = self.execute_all(decisions, progress);
        progress.phase_finished();
        result
    }

    fn execute_all(
        &self,
        decisions: &[StitchDecision],
        progress: &dyn ProgressSink,
    ) -> Result<StitchSummary, PipelineError> {
        let mut summary = StitchSummary::default();

        for decision in decisions {
            self.executor.execute(&self.job_for(decision))?;
            if decision.is_merge() {
                summary.merged += 1;
            } else {
                summary.kept += 1;
            }
            progress.unit_completed(0);
        }

        Ok(summary)
    }
}
