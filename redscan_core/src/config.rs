//! Executor configuration.
//!
//! The default command timeout is operator-configured once at startup (from
//! the `--timeout` CLI flag) and passed into every [`crate::CommandExecutor`]
//! by value. There is no process-global mutable state: concurrent executions
//! each read their own copy of the config.

use std::time::Duration;

/// Default command execution timeout when the operator does not override it.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(15 * 60);

/// Settings for command execution.
#[derive(Debug, Clone)]
pub struct ExecConfig {
    /// Timeout applied to buffered executions that do not carry a per-call
    /// override. Must be greater than zero.
    pub default_timeout: Duration,
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            default_timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }
}

impl ExecConfig {
    /// Builds a config with the default timeout given in whole seconds.
    /// A zero value falls back to [`DEFAULT_COMMAND_TIMEOUT`].
    pub fn with_timeout_secs(secs: u64) -> Self {
        if secs == 0 {
            Self::default()
        } else {
            Self {
                default_timeout: Duration::from_secs(secs),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_seconds_falls_back_to_default() {
        let config = ExecConfig::with_timeout_secs(0);
        assert_eq!(config.default_timeout, DEFAULT_COMMAND_TIMEOUT);
    }

    #[test]
    fn explicit_seconds_are_honored() {
        let config = ExecConfig::with_timeout_secs(90);
        assert_eq!(config.default_timeout, Duration::from_secs(90));
    }
}
