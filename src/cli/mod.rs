// CLI module
// Argument parsing and the interactive menu front-end

mod args;
pub mod menu;

pub use args::{CliArgs, StorageKind};

use clap::Parser;

/// Parse command-line arguments using clap
///
/// On invalid arguments or `--help`, clap prints the appropriate message
/// and exits the process.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}
