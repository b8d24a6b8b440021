// textswap - exact text block replacement for a single document
// Load, replace in order, report every rule, write back atomically

pub mod commands;
pub mod config;
pub mod core;
pub mod diff;
pub mod error;
pub mod utils;

use anyhow::Result;
use tracing::{debug, level_filters::LevelFilter};

pub use crate::core::document::Document;
pub use crate::core::types::{ReplacementRule, RuleOutcome, RuleStatus};
pub use crate::error::{TextSwapError, TextSwapResult};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Initialize logging on stderr so stdout carries only the report
///
/// @param verbose - Log at DEBUG instead of INFO
pub fn init_with_logger(verbose: bool) -> Result<()> {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .without_time()
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    debug!("Initialized textswap v{} logging at {}", version(), level);
    Ok(())
}
