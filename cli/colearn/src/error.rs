//! Error display for the CLI.

use colored::Colorize;
use colearn_bus::BusError;

/// Print an error in a user-friendly format.
pub fn print_error(err: &anyhow::Error) {
    eprintln!("{} {}", "Error:".red().bold(), err);

    if let Some(bus_err) = err.downcast_ref::<BusError>() {
        if let BusError::Broker(_) = bus_err {
            eprintln!(
                "\n{}",
                "Hint: Is the broker reachable? Check COLEARN_BROKERS, or unset COLEARN_BUS to use the local log."
                    .yellow()
            );
        }
    }
}
