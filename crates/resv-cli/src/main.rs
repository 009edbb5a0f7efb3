use resv_core::logging;

mod cli;

use crate::cli::CliCommand;

#[tokio::main]
async fn main() {
    // File logging is best-effort; fall back to stderr rather than abort.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    if let Err(err) = CliCommand::run_from_args().await {
        eprintln!("resv error: {:#}", err);
        std::process::exit(1);
    }
}
