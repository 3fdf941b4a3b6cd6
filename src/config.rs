//! Server configuration
//!
//! Settings come from command-line flags. `PORT` in the environment, when it
//! holds a valid port number, takes precedence over `--port`.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use clap::Parser;
use tracing::warn;

use crate::event_store::{EventStoreConfig, BYTES_PER_MB};

/// Environment variable that overrides `--port`
pub const PORT_ENV: &str = "PORT";

/// Command-line flags for the server
#[derive(Parser, Debug, Clone)]
#[command(name = "baby-log-server", version, about = "Activity logging server")]
pub struct Cli {
    /// Path of the event log file
    #[arg(long = "file", default_value = "baby.log")]
    pub file: PathBuf,

    /// Rotate the log before an append once it reaches this many megabytes (0 = never)
    #[arg(long = "max-size", default_value_t = 10)]
    pub max_size_mb: u64,

    /// Number of rotated backups to keep (0 = keep all)
    #[arg(long = "max-backups", default_value_t = 5)]
    pub max_backups: usize,

    /// Port to listen on
    #[arg(long, default_value_t = 4011)]
    pub port: u16,

    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Directory with the UI's static files
    #[arg(long = "static-dir", default_value = "public")]
    pub static_dir: PathBuf,
}

/// Resolved server settings
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub file: PathBuf,
    pub max_size_mb: u64,
    pub max_backups: usize,
    pub addr: SocketAddr,
    pub static_dir: PathBuf,
}

impl ServerConfig {
    /// Parse flags from the process arguments and apply the environment
    pub fn from_env() -> Self {
        Self::resolve(Cli::parse(), std::env::var(PORT_ENV).ok().as_deref())
    }

    /// Combine parsed flags with the value of `PORT`, if any
    ///
    /// An unparseable `PORT` is logged and ignored.
    pub fn resolve(cli: Cli, port_env: Option<&str>) -> Self {
        let port = match port_env.map(str::trim).filter(|v| !v.is_empty()) {
            Some(raw) => match raw.parse::<u16>() {
                Ok(port) => port,
                Err(e) => {
                    warn!(value = raw, error = %e, "Ignoring invalid {}", PORT_ENV);
                    cli.port
                }
            },
            None => cli.port,
        };

        Self {
            file: cli.file,
            max_size_mb: cli.max_size_mb,
            max_backups: cli.max_backups,
            addr: SocketAddr::new(cli.host, port),
            static_dir: cli.static_dir,
        }
    }

    /// Store settings, with the size limit converted to bytes
    pub fn store_config(&self) -> EventStoreConfig {
        EventStoreConfig::new(&self.file).with_rotation(
            self.max_size_mb.saturating_mul(BYTES_PER_MB),
            self.max_backups,
        )
    }
}
