//! Full pipeline run
//!
//! Extracts the book in the data directory, segments its pages into panels,
//! stitches the panels into strips and packages the resulting books. Two
//! manual checkpoints let the reader prune pages and panels before the
//! expensive phases run.

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::Output;
use crate::config::ComicConfig;
use crate::external::{SystemExecutor, ensure_tools};
use crate::pipeline::Pipeline;

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Pause after page extraction so unwanted pages can be removed
    #[arg(long)]
    pub review_pages: bool,

    /// Do not stop at the checkpoints
    #[arg(short, long)]
    pub yes: bool,

    /// Skip the check that the external tools are installed
    #[arg(long)]
    pub skip_tool_check: bool,
}

pub async fn execute(args: &RunArgs, config: &ComicConfig, output: &Output) -> Result<()> {
    output.header("📚 Comic-San");

    if !args.skip_tool_check {
        ensure_tools(&config.tools)?;
    }

    let executor = SystemExecutor;
    let pipeline = Pipeline::new(config, &executor);
    let workspace = pipeline.workspace();

    output.step("Preparing the data directory");
    workspace
        .reset()
        .context("Failed to prepare the data directory")?;

    let (book_name, book_path) = workspace.find_book(&config.general.book_extension)?;
    output.info(&format!("Processing book: {book_name}"));

    output.step("Extracting pages");
    pipeline
        .extract_pages(&book_path)
        .with_context(|| format!("Failed to extract {}", book_path.display()))?;

    if args.review_pages
        && !checkpoint(
            args,
            output,
            &format!(
                "Pages are in {}. Remove unwanted pages, then continue?",
                workspace.extracted_pages().display()
            ),
        )?
    {
        return stop(output);
    }

    output.step("Cutting pages into panels");
    let progress = output.phase_progress("segment");
    let pages = pipeline
        .segment_pages(&progress)
        .context("Panel extraction failed")?;
    output.success(&format!("{pages} pages segmented"));

    if !checkpoint(
        args,
        output,
        &format!(
            "Panels are in {}. Review them, then continue?",
            workspace.panels().display()
        ),
    )? {
        return stop(output);
    }

    output.step("Stitching panels");
    let progress = output.phase_progress("stitch");
    let summary = pipeline.stitch(&progress).context("Stitching failed")?;
    output.success(&format!(
        "{} strips written ({} kept, {} merged)",
        summary.strips(),
        summary.kept,
        summary.merged
    ));

    output.step("Converting strips to black & white");
    let progress = output.phase_progress("grayscale");
    let converted = pipeline
        .convert_grayscale(&progress)
        .context("Grayscale conversion failed")?;
    output.success(&format!("{converted} strips converted"));

    if config.resize.enabled {
        output.step("Resizing black & white strips");
        let progress = output.phase_progress("resize");
        let resized = pipeline.resize_bw(&progress).context("Resizing failed")?;
        output.success(&format!(
            "{resized} strips resized to {}x{}",
            config.resize.width, config.resize.height
        ));
    }

    output.step("Building books");
    let books = pipeline
        .build_books(&book_name)
        .context("Packaging failed")?;

    output.success("Done");
    output.table_row("Color", &books.color.display().to_string());
    output.table_row("Black & white", &books.bw.display().to_string());
    output.table_row("Panels", &books.panels.display().to_string());

    Ok(())
}

fn checkpoint(args: &RunArgs, output: &Output, message: &str) -> Result<bool> {
    if args.yes {
        return Ok(true);
    }
    output
        .confirm(message)
        .context("Failed to read confirmation")
}

fn stop(output: &Output) -> Result<()> {
    output.warning("Stopped at checkpoint; the data directory is left as is");
    Ok(())
}
