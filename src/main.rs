//! entryquery binary
//!
//! Argument parsing and command dispatch live in [`entryquery::cli`]. A
//! failed command has already written its error envelope to stdout; the
//! summary line on stderr and the exit status are all that remain.

use entryquery::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
