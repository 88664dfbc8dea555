//! Dry run of the stitch planner
//!
//! Probes every panel and prints the decisions without writing any strip.

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use std::path::PathBuf;

use crate::cli::Output;
use crate::config::ComicConfig;
use crate::external::SystemExecutor;
use crate::pipeline::Pipeline;
use crate::stitch::{StitchConfig, StitchDecision};

#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Panel directory (defaults to <data_dir>/panels)
    #[arg(value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = PlanFormat::Text)]
    pub format: PlanFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PlanFormat {
    Text,
    Json,
}

pub async fn execute(args: &PlanArgs, config: &ComicConfig, output: &Output) -> Result<()> {
    let executor = SystemExecutor;
    let pipeline = Pipeline::new(config, &executor);
    let dir = args
        .dir
        .clone()
        .unwrap_or_else(|| pipeline.workspace().panels());

    let decisions = pipeline
        .plan_dir(&dir)
        .with_context(|| format!("Failed to plan {}", dir.display()))?;

    match args.format {
        PlanFormat::Json => {
            let json = serde_json::to_string_pretty(&decisions)
                .context("Failed to serialize the plan")?;
            println!("{json}");
        }
        PlanFormat::Text => {
            let thresholds = config.stitch.thresholds();
            for decision in &decisions {
                println!("{}", describe(decision, &thresholds));
            }
            let merged = decisions.iter().filter(|d| d.is_merge()).count();
            output.verbose(&format!(
                "{} strips from {} panels",
                decisions.len(),
                decisions.len() + merged
            ));
        }
    }

    Ok(())
}

fn describe(decision: &StitchDecision, thresholds: &StitchConfig) -> String {
    match decision {
        StitchDecision::Keep { panel } => format!(
            "keep   {} ({:.1}%)",
            panel.name,
            thresholds.percent_of_page(u64::from(panel.width))
        ),
        StitchDecision::Merge { first, second } => format!(
            "merge  {} + {} -> {} ({:.1}% + {:.1}%)",
            first.name,
            second.name,
            decision.output_name(),
            thresholds.percent_of_page(u64::from(first.width)),
            thresholds.percent_of_page(u64::from(second.width))
        ),
    }
}
