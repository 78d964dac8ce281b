//! Command-line arguments for the notebook binary.
//!
//! Store and logging flags fall back to `NOTEBOOK_*` environment variables
//! and override values from the config file.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use notebook_core::ConfigOverrides;

/// Notebook - answers JSON-RPC requests against a local note store
#[derive(Parser, Debug)]
#[command(name = "notebook")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// TOML configuration file
    #[arg(long, global = true, env = "NOTEBOOK_CONFIG")]
    pub config: Option<PathBuf>,

    /// SQLite database file
    #[arg(long, global = true, env = "NOTEBOOK_DB_PATH")]
    pub db_path: Option<PathBuf>,

    /// Log level (off|error|warn|info|debug|trace)
    #[arg(long, global = true, env = "NOTEBOOK_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files
    #[arg(long, global = true, env = "NOTEBOOK_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Answer the reachability check through the RPC layer
    Hello,

    /// Open the store and report its schema version and note count
    #[command(name = "test_db")]
    TestDb,

    /// Print crate and schema versions without opening the store
    Version,

    /// Dispatch one JSON-RPC request and print the response
    Request {
        /// Request JSON; read from stdin when omitted
        json: Option<String>,
    },
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            db_path: self.db_path.clone(),
            log_level: self.log_level.clone(),
            log_dir: self.log_dir.clone(),
        }
    }
}
