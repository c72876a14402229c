//! CLI module for entryquery
//!
//! Provides command-line access to:
//! - get / count: compile and execute against a JSON fixture
//! - explain: render the compiled query
//! - next / previous / older / newer: navigate from an anchor entry

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, NavigateArgs, QueryArgs};
pub use commands::{count, execute, explain, get, navigate, run, run_command};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_error, write_response};
