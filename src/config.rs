//! Configuration and CLI argument handling

use clap::Parser;

use crate::display::{OutputFormat, UnitSelection};

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "countdown")]
#[command(about = "A countdown timer that keeps time while suspended (Ctrl-Z / fg)")]
#[command(version)]
pub struct Config {
    /// Seconds to count down from; negative values finish immediately
    #[arg(short, long, default_value = "0", allow_negative_numbers = true)]
    pub until: i64,

    /// Digit groups to show, any of D (days), H (hours), M (minutes), S (seconds)
    #[arg(short, long, default_value = "DHMS")]
    pub show: UnitSelection,

    /// Print each update as a JSON object instead of digit groups
    #[arg(long)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Output format selected on the command line
    pub fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Digits
        }
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}
