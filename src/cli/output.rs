//! Terminal output for Comic-San
//!
//! Styled status lines, tables and the confirmation prompt used at the
//! manual checkpoints. Progress bars live in
//! [`crate::parallel::PhaseProgress`].

use console::style;
use std::io::{self, BufRead, Write};

use crate::parallel::PhaseProgress;

/// Output handler for consistent CLI formatting
pub struct Output {
    verbose: bool,
    quiet: bool,
}

impl Output {
    /// Create a new output handler
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("✔").green(), message);
        }
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("⚠").yellow(), message);
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("ℹ").blue(), message);
        }
    }

    /// Print a verbose message (only if verbose mode is enabled)
    pub fn verbose(&self, message: &str) {
        if self.verbose && !self.quiet {
            println!("{} {}", style("ℹ").dim(), style(message).dim());
        }
    }

    /// Print a header/title
    pub fn header(&self, title: &str) {
        if !self.quiet {
            println!("\n{}", style(title).bold().underlined());
        }
    }

    /// Print a step in a process
    pub fn step(&self, step: &str) {
        if !self.quiet {
            println!("{} {}", style("❯").cyan(), step);
        }
    }

    /// Print a table row
    pub fn table_row(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {:<20} {}", style(key).dim(), value);
        }
    }

    /// Progress display for one phase, hidden in quiet mode
    pub fn phase_progress(&self, label: &str) -> PhaseProgress {
        if self.quiet {
            PhaseProgress::hidden(label)
        } else {
            PhaseProgress::new(label)
        }
    }

    /// Ask for user confirmation
    pub fn confirm(&self, message: &str) -> io::Result<bool> {
        print!("{} {} (y/N): ", style("❯").cyan(), message);
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().lock().read_line(&mut input)?;

        Ok(is_yes(&input))
    }
}

fn is_yes(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y\n"));
        assert!(is_yes("  YES "));
        assert!(!is_yes("n"));
        assert!(!is_yes(""));
        assert!(!is_yes("yep"));
    }
}
