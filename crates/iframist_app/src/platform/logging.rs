//! Platform logging initialization for iframist.
//!
//! The terminal UI owns the screen, so logs go to the configured file only.

use iframist_logging::{parse_level, LogDestination};

use super::config::AppConfig;

pub fn initialize(config: &AppConfig) {
    let level = parse_level(&config.log_level);
    if !iframist_logging::initialize(LogDestination::File, level, &config.log_file) {
        eprintln!("Warning: logging is disabled for this session.");
    }
}
