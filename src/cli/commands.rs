//! CLI command implementations
//!
//! Each command loads the fixture (and optional config), compiles the
//! parameters, and returns the response payload. [`run_command`] wraps the
//! payload or error in the JSON envelope.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use crate::compiler::QueryContext;
use crate::config::EngineConfig;
use crate::executor::MemoryRepository;
use crate::navigation::Direction;
use crate::observability::Logger;
use crate::params::ParameterSet;
use crate::planner::dates::parse_absolute;
use crate::tag::EntryQueryTag;

use super::args::{Command, NavigateArgs, QueryArgs};
use super::errors::{CliError, CliResult};
use super::io::{write_error, write_response};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run a command and write its response envelope to stdout
pub fn run_command(cmd: Command) -> CliResult<()> {
    match execute(cmd) {
        Ok(data) => write_response(data),
        Err(err) => {
            write_error(err.code_str(), err.message())?;
            Err(err)
        }
    }
}

/// Run a command and return its payload
pub fn execute(cmd: Command) -> CliResult<Value> {
    match cmd {
        Command::Get(args) => get(&args),
        Command::Count(args) => count(&args),
        Command::Explain(args) => explain(&args),
        Command::Next(args) => navigate(&args, Direction::Next),
        Command::Previous(args) => navigate(&args, Direction::Previous),
        Command::Older(args) => navigate(&args, Direction::Older),
        Command::Newer(args) => navigate(&args, Direction::Newer),
    }
}

/// Everything a command needs, loaded from disk
struct Session {
    config: EngineConfig,
    repository: MemoryRepository,
    now: DateTime<Utc>,
}

impl Session {
    fn open(args: &QueryArgs) -> CliResult<Self> {
        let config = load_config(args.config.as_deref())?;
        if let Some(severity) = config.severity() {
            Logger::set_min_severity(severity);
        }

        let repository = MemoryRepository::load(&args.fixture)?;
        let now = match &args.now {
            Some(raw) => parse_absolute(raw)
                .ok_or_else(|| CliError::invalid_argument(format!("Invalid --now value: '{}'", raw)))?,
            None => Utc::now(),
        };

        Ok(Self {
            config,
            repository,
            now,
        })
    }

    fn tag(&self, args: &QueryArgs) -> EntryQueryTag<'_, MemoryRepository> {
        let raw = args
            .params
            .iter()
            .map(|(key, value)| (key.clone(), Value::String(value.clone())));
        let params = ParameterSet::parse_with_ignored(raw, &self.config.ignored_params);
        let context = QueryContext::from_config(&self.config, self.now);
        EntryQueryTag::new(params, &self.repository, context)
    }
}

fn load_config(path: Option<&Path>) -> CliResult<EngineConfig> {
    match path {
        Some(path) => Ok(EngineConfig::load(path)?),
        None => Ok(EngineConfig::default()),
    }
}

/// Matching entries
pub fn get(args: &QueryArgs) -> CliResult<Value> {
    let session = Session::open(args)?;
    let entries = session.tag(args).get()?;
    Ok(serde_json::to_value(entries)?)
}

/// Number of matching entries
pub fn count(args: &QueryArgs) -> CliResult<Value> {
    let session = Session::open(args)?;
    let count = session.tag(args).count()?;
    Ok(json!(count))
}

/// Explain plan, both structured and rendered
pub fn explain(args: &QueryArgs) -> CliResult<Value> {
    let session = Session::open(args)?;
    let plan = session.tag(args).explain();
    let mut value = serde_json::to_value(&plan)?;
    if let Some(obj) = value.as_object_mut() {
        obj.insert("text".to_string(), Value::String(plan.to_string()));
    }
    Ok(value)
}

/// Entries relative to the anchor
pub fn navigate(args: &NavigateArgs, direction: Direction) -> CliResult<Value> {
    let session = Session::open(&args.query)?;
    let anchor = session
        .repository
        .find(&args.anchor)
        .cloned()
        .ok_or_else(|| CliError::anchor_not_found(&args.anchor))?;

    let entries = session.tag(&args.query).navigate(direction, &anchor)?;
    Ok(serde_json::to_value(entries)?)
}
