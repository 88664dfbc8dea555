//! Stitch the panels already in the data directory

use anyhow::{Context, Result, bail};

use crate::cli::Output;
use crate::config::ComicConfig;
use crate::external::SystemExecutor;
use crate::pipeline::Pipeline;

pub async fn execute(config: &ComicConfig, output: &Output) -> Result<()> {
    output.header("🧵 Stitching Panels");

    let spacer = config.spacer_image();
    if !spacer.is_file() {
        bail!("Spacer image {} not found", spacer.display());
    }

    let executor = SystemExecutor;
    let pipeline = Pipeline::new(config, &executor);
    pipeline.workspace().ensure()?;

    let progress = output.phase_progress("stitch");
    let summary = pipeline.stitch(&progress).context("Stitching failed")?;

    output.success(&format!(
        "{} strips written to {}",
        summary.strips(),
        pipeline.workspace().stitched_color().display()
    ));
    output.table_row("Kept", &summary.kept.to_string());
    output.table_row("Merged", &summary.merged.to_string());

    Ok(())
}
