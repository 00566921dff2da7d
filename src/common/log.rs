//! Logging utility functions
//!
//! This module provides utility functions for the logging system.

/// Initialize the logging system from the given default level.
///
/// `RUST_LOG` always takes precedence if set; `level` is only used as the default
/// filter for this crate's own modules when no override is present.
pub fn init_logger(level: &str) {
    let log_level = if !level.contains('=') && !level.is_empty() {
        format!("router_reconciler={}", level)
    } else {
        level.to_string()
    };

    let env = env_logger::Env::default().filter_or("RUST_LOG", &log_level);

    if let Err(e) = env_logger::try_init_from_env(env) {
        eprintln!("failed to initialize logger: {}", e);
    } else {
        log::debug!("logger initialized with level: {}", log_level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_logger_does_not_panic() {
        init_logger("debug");
    }
}
