//! CLI argument definitions using clap
//!
//! Commands:
//! - entryquery get --fixture <path> [--param key=value]...
//! - entryquery count --fixture <path> [--param key=value]...
//! - entryquery explain --fixture <path> [--param key=value]...
//! - entryquery next|previous|older|newer --fixture <path> --anchor <id> [--param key=value]...

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// entryquery - compile content-tag parameters into entry queries
#[derive(Parser, Debug)]
#[command(name = "entryquery")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command
#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// Path to a JSON fixture with collections and entries
    #[arg(long)]
    pub fixture: PathBuf,

    /// Path to engine configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Tag parameter as key=value; may be repeated
    #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_param)]
    pub params: Vec<(String, String)>,

    /// Evaluate dates against this instant instead of the wall clock
    #[arg(long)]
    pub now: Option<String>,
}

/// Options for navigation commands
#[derive(Args, Debug, Clone)]
pub struct NavigateArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    /// Id of the entry to navigate from
    #[arg(long)]
    pub anchor: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Return matching entries
    Get(QueryArgs),

    /// Return the number of matching entries
    Count(QueryArgs),

    /// Describe the compiled query without executing it
    Explain(QueryArgs),

    /// Entries after the anchor
    Next(NavigateArgs),

    /// Entries before the anchor
    Previous(NavigateArgs),

    /// Entries dated before the anchor
    Older(NavigateArgs),

    /// Entries dated after the anchor
    Newer(NavigateArgs),
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

/// Splits `key=value` on the first `=`
pub fn parse_param(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{}'", raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_param() {
        assert_eq!(parse_param("from=blog"), Ok(("from".into(), "blog".into())));
        assert_eq!(
            parse_param("title:is=a=b"),
            Ok(("title:is".into(), "a=b".into()))
        );
        assert_eq!(parse_param("limit="), Ok(("limit".into(), "".into())));
        assert!(parse_param("noequals").is_err());
        assert!(parse_param("=value").is_err());
    }

    #[test]
    fn test_parse_navigation_command() {
        let cli = Cli::try_parse_from([
            "entryquery",
            "next",
            "--fixture",
            "site.json",
            "--anchor",
            "e1",
            "--param",
            "from=pages",
            "--param",
            "sort=order:desc",
        ])
        .unwrap();

        match cli.command {
            Command::Next(args) => {
                assert_eq!(args.anchor, "e1");
                assert_eq!(args.query.params.len(), 2);
                assert_eq!(args.query.params[1], ("sort".into(), "order:desc".into()));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_fixture_required() {
        assert!(Cli::try_parse_from(["entryquery", "get"]).is_err());
    }
}
