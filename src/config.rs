//! Configuration for Cellar
//!
//! Centralized configuration with sensible defaults.

use std::time::Duration;

use crate::auth::{DEFAULT_BOOTSTRAP_PASSWORD, DEFAULT_BOOTSTRAP_USER};
use crate::error::{CellarError, Result};

/// Main configuration for a Cellar server instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address
    pub listen_addr: String,

    /// Largest accepted command line in bytes (excluding the newline).
    /// Longer lines are a read error and close the connection.
    pub max_line_length: usize,

    /// How often the accept loop checks for shutdown (milliseconds)
    pub accept_poll_interval_ms: u64,

    // -------------------------------------------------------------------------
    // Session Configuration
    // -------------------------------------------------------------------------
    /// Username seeded into every fresh session's database
    pub bootstrap_user: String,

    /// Password for the bootstrap user
    pub bootstrap_password: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:7379".to_string(),
            max_line_length: 4096,
            accept_poll_interval_ms: 50,
            bootstrap_user: DEFAULT_BOOTSTRAP_USER.to_string(),
            bootstrap_password: DEFAULT_BOOTSTRAP_PASSWORD.to_string(),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Accept loop poll interval as a Duration
    pub fn accept_poll_interval(&self) -> Duration {
        Duration::from_millis(self.accept_poll_interval_ms)
    }

    /// Check that the config can actually run a server
    pub fn validate(&self) -> Result<()> {
        if self.max_line_length == 0 {
            return Err(CellarError::Config(
                "max_line_length must be greater than zero".to_string(),
            ));
        }
        if self.bootstrap_user.is_empty() || self.bootstrap_user.contains(char::is_whitespace) {
            return Err(CellarError::Config(format!(
                "bootstrap user {:?} must be a single non-empty token",
                self.bootstrap_user
            )));
        }
        if self.bootstrap_password.contains(char::is_whitespace) {
            return Err(CellarError::Config(
                "bootstrap password must not contain whitespace".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the maximum command line length (in bytes)
    pub fn max_line_length(mut self, len: usize) -> Self {
        self.config.max_line_length = len;
        self
    }

    /// Set the accept loop poll interval (in milliseconds)
    pub fn accept_poll_interval_ms(mut self, ms: u64) -> Self {
        self.config.accept_poll_interval_ms = ms;
        self
    }

    /// Set the bootstrap credentials seeded into every session
    pub fn bootstrap_credentials(
        mut self,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.config.bootstrap_user = user.into();
        self.config.bootstrap_password = password.into();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
