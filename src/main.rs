//! Provides the main entry point to the program.
use ::log::error;
use genesys_input::cli::run_cli;
use genesys_input::log;
use human_panic::{metadata, setup_panic};

fn main() {
    setup_panic!(metadata!().support("Open an issue with the GENESYS-2 modelling team."));

    if let Err(err) = run_cli() {
        if log::is_logger_initialised() {
            error!("{err:?}");
        } else {
            // If we run into an error before the logger is initialised, print to stderr instead
            eprintln!("Error: {err:?}");
        }

        std::process::exit(1);
    }
}
