//! CLI argument parsing definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "Script job execution toolkit", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Set the log filter (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve jobs over stdio (spawned by process executors)
    Worker,

    /// Execute a script file with the built-in stub engine
    Run {
        /// Path to the script file
        script: PathBuf,

        /// Variable binding, NAME=VALUE (repeatable)
        #[arg(long = "var", value_name = "NAME=VALUE")]
        variables: Vec<String>,

        /// Output variable to capture after the run (repeatable)
        #[arg(long = "out", value_name = "NAME")]
        out_variables: Vec<String>,

        /// Forward the engine's debug stream to the log
        #[arg(long)]
        debug_logging: bool,

        /// Forward the engine's verbose stream to the log
        #[arg(long)]
        verbose_logging: bool,

        /// Buffer output lines and print them after the run
        #[arg(long)]
        collect: bool,

        /// Do not log output lines as they arrive
        #[arg(long)]
        no_log: bool,
    },

    /// Print a script's description, parameters, and referenced variables
    Inspect {
        /// Path to the script file
        script: PathBuf,
    },
}
