//! Configuration command implementations
//!
//! Commands for inspecting the effective Comic-San configuration.

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::cli::Output;
use crate::config::ComicConfig;
use crate::parallel::available_parallelism;

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the merged configuration as TOML
    Show,
    /// Check the configuration and summarize it
    Validate,
}

/// Execute config commands
pub async fn execute(args: &ConfigArgs, config: &ComicConfig, output: &Output) -> Result<()> {
    match args.command {
        ConfigCommands::Show => show(config),
        ConfigCommands::Validate => validate(config, output),
    }
}

fn show(config: &ComicConfig) -> Result<()> {
    print!("{}", config.to_toml()?);
    Ok(())
}

fn validate(config: &ComicConfig, output: &Output) -> Result<()> {
    // Loading already validated; this only reports
    output.success("Configuration is valid");

    output.step("Configuration Summary");
    output.table_row("Data directory", &config.general.data_dir.display().to_string());
    output.table_row(
        "Page width",
        &format!("{} px", config.stitch.original_page_width),
    );
    output.table_row(
        "Thresholds",
        &format!(
            "wide {}% / mid {}% / small {}% / combined {}%",
            config.stitch.wide_threshold,
            config.stitch.mid_threshold,
            config.stitch.small_next_threshold,
            config.stitch.combined_threshold
        ),
    );
    output.table_row("Workers", &available_parallelism(&config.parallel).to_string());

    let spacer = config.spacer_image();
    if !spacer.is_file() {
        output.warning(&format!("Spacer image {} not found", spacer.display()));
    }

    Ok(())
}
