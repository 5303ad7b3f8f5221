use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for the tsmix binary.
#[derive(Parser, Debug)]
#[command(
    name = "tsmix",
    version,
    about = "Compose classes from a scenario file and inspect how members resolve"
)]
pub struct CliArgs {
    /// Enable color in the output. Defaults to on when stdout is a terminal.
    #[arg(long, global = true)]
    pub pretty: Option<bool>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print where each member of the composite instance resolves from,
    /// alongside its inferred type.
    Inspect {
        /// Path to the scenario JSON file.
        scenario: PathBuf,

        /// Print the report as JSON.
        #[arg(long)]
        json: bool,

        /// Only report these keys (repeatable).
        #[arg(long = "key", value_name = "KEY")]
        keys: Vec<String>,
    },

    /// Verify the runtime instance agrees with the inferred composite type.
    /// Exits with status 1 when an error is found.
    Check {
        /// Path to the scenario JSON file.
        scenario: PathBuf,

        /// Print the findings as JSON.
        #[arg(long)]
        json: bool,
    },
}
