use std::time::Duration;

use clap::Parser;
use tracing::warn;

use crate::error::StartupError;

/// Delays above this are accepted but logged as a warning.
pub const DELAY_WARNING_MS: u64 = 500;

/// Largest delay whose nanosecond count still fits the auctioneer's signed
/// 64-bit duration.
pub const MAX_DELAY_MS: u64 = i64::MAX as u64 / 1_000_000;

const LONG_FLAGS: [&str; 3] = ["name", "port", "delay"];

#[derive(Parser, Debug, Clone)]
#[command(name = "bidder", about = "Simulated auction bidder")]
pub struct Args {
    /// Bidder's name
    #[arg(long, default_value = "Sample")]
    pub name: String,

    /// Bidder's port
    #[arg(long, default_value_t = 0)]
    pub port: u16,

    /// Bidder's response delay in milliseconds
    #[arg(long, default_value_t = 0)]
    pub delay: u64,
}

impl Args {
    /// Parse from the process arguments, accepting `-port 8080` as well as
    /// `--port 8080`.
    pub fn from_env() -> Self {
        Self::parse_from(normalize_flags(std::env::args()))
    }

    pub fn try_from_iter<I>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = String>,
    {
        Self::try_parse_from(normalize_flags(args))
    }

    /// Reject a missing port or an unrepresentable delay; warn about long delays.
    pub fn validate(&self) -> Result<(), StartupError> {
        if self.port == 0 {
            return Err(StartupError::Validation(
                "invalid port or port required".to_string(),
            ));
        }
        if self.delay > MAX_DELAY_MS {
            return Err(StartupError::Validation(format!(
                "delay must be at most {MAX_DELAY_MS}ms"
            )));
        }
        if self.delay > DELAY_WARNING_MS {
            warn!(delay_ms = self.delay, "delay more than {DELAY_WARNING_MS}ms");
        }
        Ok(())
    }

    pub fn response_delay(&self) -> Duration {
        Duration::from_millis(self.delay)
    }
}

/// Rewrite single-dash long flags (`-name`, `-port=1`) to their double-dash form.
pub fn normalize_flags<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    args.into_iter()
        .enumerate()
        .map(|(position, arg)| {
            if position == 0 || arg.starts_with("--") {
                return arg;
            }
            let Some(rest) = arg.strip_prefix('-') else {
                return arg;
            };
            let flag = rest.split('=').next().unwrap_or(rest);
            if LONG_FLAGS.contains(&flag) {
                format!("-{arg}")
            } else {
                arg
            }
        })
        .collect()
}
