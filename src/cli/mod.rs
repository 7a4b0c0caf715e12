// CLI module
// Command-line interface and argument parsing

mod args;

pub use args::{CliArgs, StrategyType};

use clap::Parser;

/// Parse command-line arguments using clap
///
/// A `.env` file in the working directory is loaded first, so that the
/// statement and ledger paths can be supplied through
/// `CSV_LOCAL_FILE_PATH` and `EXPENSE_MANAGER_LOCAL_FILE_PATH` (and the log
/// filter through `RUST_LOG`). Variables already set in the environment take
/// precedence over the file.
///
/// If parsing fails (invalid arguments, missing required arguments, or
/// `--help`), clap displays an error message or help text and exits the
/// process.
pub fn parse_args() -> CliArgs {
    dotenvy::dotenv().ok();
    CliArgs::parse()
}
