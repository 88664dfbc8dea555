//! Black & white conversion of the color strips

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::Output;
use crate::config::ComicConfig;
use crate::external::SystemExecutor;
use crate::pipeline::Pipeline;

#[derive(Args, Debug, Default)]
pub struct ConvertArgs {
    /// Keep the converted strips at their original size
    #[arg(long)]
    pub skip_resize: bool,
}

pub async fn execute(args: &ConvertArgs, config: &ComicConfig, output: &Output) -> Result<()> {
    output.header("🖤 Converting Strips");

    let executor = SystemExecutor;
    let pipeline = Pipeline::new(config, &executor);
    pipeline.workspace().ensure()?;

    let progress = output.phase_progress("grayscale");
    let converted = pipeline
        .convert_grayscale(&progress)
        .context("Grayscale conversion failed")?;
    output.success(&format!(
        "{converted} strips converted at quality {}",
        config.grayscale.quality
    ));

    if args.skip_resize || !config.resize.enabled {
        output.verbose("Resize skipped");
        return Ok(());
    }

    let progress = output.phase_progress("resize");
    let resized = pipeline.resize_bw(&progress).context("Resizing failed")?;
    output.success(&format!(
        "{resized} strips resized to {}x{}",
        config.resize.width, config.resize.height
    ));

    Ok(())
}
