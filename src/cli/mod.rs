//! Command-line interface for Comic-San
//!
//! This module provides the main CLI structure and command handling.
//! It uses clap for argument parsing; each subcommand lives in its own
//! module under `commands`.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;
mod output;

pub use output::Output;

use crate::config::ComicConfig;
use commands::{config, convert, plan, run};

/// Comic-San - turn comic books into strips for small e-book readers
#[derive(Parser)]
#[command(
    name = "comic-san",
    author,
    version,
    about = "Turn comic books into panel strips for small e-book readers",
    long_about = "Comic-San extracts the pages of a .cbz book, cuts them into panels, \
                  stitches narrow panels together into strips sized for small screens, \
                  and packages color and black & white books from the result."
)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<String>,

    /// Data directory holding the book (overrides general.data_dir)
    #[arg(long, value_name = "DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Width of one original page in pixels (overrides stitch.original_page_width)
    #[arg(long, value_name = "PX", global = true)]
    pub page_width: Option<u32>,

    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Run the whole pipeline on the book in the data directory
    Run(run::RunArgs),
    /// Show how the panels of a directory would be stitched
    Plan(plan::PlanArgs),
    /// Stitch the panels in <data_dir>/panels into color strips
    Stitch,
    /// Create black & white strips from the color strips
    Convert(convert::ConvertArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn run(self) -> Result<()> {
        setup_logging(self.verbose, self.quiet);

        let output = Output::new(self.verbose > 0, self.quiet);

        let Some(command) = self.command.as_ref() else {
            // Show help when no command is provided
            let mut cmd = Cli::command();
            cmd.print_help()?;
            return Ok(());
        };

        let config = self.load_config()?;

        match command {
            Commands::Run(args) => run::execute(args, &config, &output).await,
            Commands::Plan(args) => plan::execute(args, &config, &output).await,
            Commands::Stitch => commands::stitch::execute(&config, &output).await,
            Commands::Convert(args) => convert::execute(args, &config, &output).await,
            Commands::Config(args) => config::execute(args, &config, &output).await,
        }
    }

    /// Load the layered configuration and apply command-line overrides
    pub fn load_config(&self) -> Result<ComicConfig> {
        let mut config = ComicConfig::load(self.config.as_deref())?;

        if let Some(dir) = &self.data_dir {
            config.general.data_dir = dir.clone();
        }
        if let Some(width) = self.page_width {
            config.stitch.original_page_width = width;
        }

        config.validate()?;
        Ok(config)
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info"),
            2 => tracing_subscriber::EnvFilter::new("debug"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    // Progress bars and logs share stderr; stdout stays clean for `plan`
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from([
            "comic-san",
            "plan",
            "--page-width",
            "2400",
            "-vv",
            "--data-dir",
            "/books",
        ])
        .unwrap();

        assert_eq!(cli.page_width, Some(2400));
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/books")));
        assert!(matches!(cli.command, Some(Commands::Plan(_))));
    }

    #[test]
    fn test_run_flags() {
        let cli = Cli::try_parse_from(["comic-san", "run", "--review-pages", "--yes"]).unwrap();
        match cli.command {
            Some(Commands::Run(args)) => {
                assert!(args.review_pages);
                assert!(args.yes);
            }
            _ => panic!("expected run command"),
        }
    }
}
