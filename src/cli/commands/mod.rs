//! Command implementations for the Comic-San CLI
//!
//! Each subcommand lives in its own module and exposes an async `execute`.

pub mod config;
pub mod convert;
pub mod plan;
pub mod run;
pub mod stitch;
