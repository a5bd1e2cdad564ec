//! Configuration and CLI argument handling

use std::time::Duration;

use clap::Parser;

use crate::error::ConfigError;

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "timers")]
#[command(about = "A cancellable one-second timer with an HTTP control surface")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Interval between timer ticks in milliseconds
    #[arg(short = 'i', long, default_value = "1000")]
    pub tick_interval_ms: u64,

    /// Title shown by the child feature
    #[arg(long, default_value = "Child Feature")]
    pub child_title: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Reject values the controller cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        if self.child_title.trim().is_empty() {
            return Err(ConfigError::EmptyChildTitle);
        }
        Ok(())
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}
