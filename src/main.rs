use clap::Parser;
use traq::cli::{self, Cli};
use traq::logging::init_logging;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose, cli.quiet) {
        eprintln!("Failed to initialize logging: {e}");
    }

    if let Err(e) = cli::run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(if e.is_caller_error() { 2 } else { 1 });
    }
}
