//! Logging initialization.
//!
//! Sets up a global `tracing` subscriber exactly once per process. The
//! verbosity comes from `RUST_LOG` when set, otherwise from the level the
//! caller passes in (with the redscan crates bumped to `debug`).
//!
//! By default logs go to a daily rolling file in the user cache directory so
//! the MCP stdio transport stays clean: stdout carries protocol frames and
//! must never receive log lines. With `log_to_file = false` (or when the
//! cache directory cannot be created) logs go to stderr with ANSI colors,
//! which is the right mode for interactive debugging.

use anyhow::Result;
use directories::ProjectDirs;
use std::{io::stderr, sync::Once};
use tracing_subscriber::{EnvFilter, fmt::layer, prelude::*};

static INIT: Once = Once::new();

/// Initializes the logging system. Safe to call more than once; only the
/// first call takes effect.
pub fn init_logging(log_level: &str, log_to_file: bool) -> Result<()> {
    INIT.call_once(|| {
        let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{log_level},redscan_server=debug,redscan_core=debug"
            ))
        });

        let file_appender = if log_to_file {
            ProjectDirs::from("com", "Redscan", "redscan").and_then(|proj_dirs| {
                let log_dir = proj_dirs.cache_dir();
                std::fs::create_dir_all(log_dir).ok()?;
                std::panic::catch_unwind(|| tracing_appender::rolling::daily(log_dir, "redscan.log"))
                    .ok()
            })
        } else {
            None
        };

        match file_appender {
            Some(file_appender) => {
                let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(layer().with_writer(non_blocking).with_ansi(false))
                    .init();
                // Leaked so buffered log lines are flushed at process exit.
                Box::leak(Box::new(guard));
            }
            None => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(layer().with_writer(stderr).with_ansi(true))
                    .init();
            }
        }
    });
    Ok(())
}
