//! Library half of the `pilco-cost` command-line tool.
//!
//! The binary parses arguments and initializes logging; everything else
//! lives here so it can be tested without spawning a process.

pub mod commands;
pub mod error;
pub mod exit_codes;
pub mod logging;
pub mod output;

pub use error::CliError;
pub use exit_codes::ExitCode;
pub use output::OutputFormat;
