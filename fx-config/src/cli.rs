use std::path::PathBuf;

use clap::Parser;

/// Command-line flags accepted by the service binary.
#[derive(Debug, Parser)]
#[command(name = "fx-rate-service", about = "FX rate aggregation service")]
pub struct CliArgs {
    /// Explicit path to the JSON config file, overriding the default search order.
    #[arg(long)]
    pub config: Option<PathBuf>,
}
