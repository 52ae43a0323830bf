//! Server configuration.
//!
//! Values come from command-line flags, falling back to `BURRITO_*`
//! environment variables (a `.env` file is loaded first by `main`).

use std::path::Path;

use anyhow::Context;
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};

pub const DEFAULT_DATABASE_URL: &str = "sqlite:///burrito.db";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;

/// Stores and serves saved fractal configurations over HTTP.
#[derive(Debug, Clone, Parser)]
#[command(name = "burrito", version)]
pub struct ServerConfig {
    /// SQLite connection string (`sqlite:///relative.db`, `sqlite:////abs.db`, `sqlite://`).
    #[arg(long, env = "BURRITO_DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
    pub database_url: String,

    /// Debug mode: verbose logs and error details in 500 responses.
    #[arg(
        long,
        env = "BURRITO_DEBUG",
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new()
    )]
    pub debug: bool,

    #[arg(long, env = "BURRITO_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    #[arg(long, env = "BURRITO_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// trace|debug|info|warn|error; defaults to `debug` in debug mode, else `info`.
    #[arg(long, env = "BURRITO_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rotated log files; stderr only when unset.
    #[arg(long, env = "BURRITO_LOG_DIR")]
    pub log_dir: Option<String>,
}

impl ServerConfig {
    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn effective_log_level(&self) -> &str {
        match self.log_level.as_deref() {
            Some(level) => level,
            None if self.debug => "debug",
            None => "info",
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            debug: false,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            log_level: None,
            log_dir: None,
        }
    }
}

/// Loads `KEY=value` pairs from `path` into the process environment.
///
/// A missing file is fine; a file that exists but cannot be read or parsed
/// is an error.
pub fn load_env_file(path: impl AsRef<Path>) -> anyhow::Result<()> {
    let path = path.as_ref();
    match dotenvy::from_path(path) {
        Ok(()) => Ok(()),
        Err(err) if err.not_found() => Ok(()),
        Err(err) => {
            Err(err).with_context(|| format!("failed to load env file `{}`", path.display()))
        }
    }
}
