//! Command-line client for the threat-intelligence blacklist API.

use std::io::{self, Write};

use chrono::NaiveDateTime;
use clap::{Args, CommandFactory, Parser, Subcommand};
use riq_api::{BlacklistApi, DEFAULT_TIMEOUT};
use riq_telemetry::{LoggingConfig, build_sha, init_logging};
use tracing::{Instrument, debug, warn};
use uuid::Uuid;

use crate::client::{CliDependencies, CliError, CliResult, parse_datetime};
use crate::commands::blacklist::{
    handle_incident, handle_incident_list, handle_list, handle_lookup, handle_malware,
    validate_command,
};
use crate::output::Presentation;

const DEFAULT_TIMEOUT_SECS: u64 = DEFAULT_TIMEOUT.as_secs();

/// Parses CLI arguments, executes the requested command, and reports
/// failures. Returns the process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    if let Err(err) = init_logging(&LoggingConfig::default()) {
        eprintln!("warning: {err}");
    }

    let trace_id = Uuid::new_v4().to_string();
    let span = tracing::info_span!(
        "command",
        name = command_label(&cli.command),
        trace_id = %trace_id,
        build_sha = %build_sha()
    );

    async move {
        let mut stdout = io::stdout();
        execute_with(cli, &mut stdout, |cli| {
            CliDependencies::from_env(cli, &trace_id).map(|deps| deps.client)
        })
        .await
    }
    .instrument(span)
    .await
}

/// Validate local arguments, then build the API with `connect` and dispatch.
///
/// Configuration is only loaded once the arguments are known to be valid.
pub(crate) async fn execute_with<A, W, C>(cli: Cli, out: &mut W, connect: C) -> i32
where
    A: BlacklistApi,
    W: Write,
    C: FnOnce(&Cli) -> CliResult<A>,
{
    let command_name = command_label(&cli.command);
    if let Err(err) = validate_command(&cli.command) {
        return report(command_name, &err, out);
    }
    match connect(&cli) {
        Ok(api) => execute(cli, &api, out).await,
        Err(err) => report(command_name, &err, out),
    }
}

/// Dispatch a parsed invocation against `api`, writing command output to `out`.
pub(crate) async fn execute<A, W>(cli: Cli, api: &A, out: &mut W) -> i32
where
    A: BlacklistApi + ?Sized,
    W: Write,
{
    let command_name = command_label(&cli.command);
    let Err(err) = dispatch(cli, api, out).await else {
        debug!(command = command_name, "command completed");
        return 0;
    };
    report(command_name, &err, out)
}

/// Print `err` the way its kind requires and return the exit code.
fn report<W: Write>(command_name: &str, err: &CliError, out: &mut W) -> i32 {
    match err {
        CliError::Validation(message) => {
            let usage = subcommand_usage(command_name);
            if let Err(write_err) = writeln!(out, "{usage}\n{message}") {
                warn!(error = %write_err, "failed to write usage");
            }
        }
        CliError::Failure(_) => eprintln!("error: {}", err.display_message()),
    }
    err.exit_code()
}

async fn dispatch<A, W>(cli: Cli, api: &A, out: &mut W) -> CliResult<()>
where
    A: BlacklistApi + ?Sized,
    W: Write,
{
    let presentation = Presentation {
        oneline: cli.oneline,
        short: cli.short,
        as_json: cli.as_json,
    };

    match &cli.command {
        Command::Lookup(args) => handle_lookup(api, args, presentation, out).await,
        Command::Incident(args) => handle_incident(api, args, presentation, out).await,
        Command::IncidentList(args) => handle_incident_list(api, args, presentation, out).await,
        Command::List(args) => handle_list(api, args, presentation, out).await,
        Command::Malware(args) => handle_malware(api, args, presentation, out).await,
    }
}

#[derive(Parser)]
#[command(
    name = "riq-blacklist",
    version,
    about = "Query the threat-intelligence blacklist API"
)]
pub(crate) struct Cli {
    #[arg(
        short = 'l',
        long,
        global = true,
        help = "Output one line per entry"
    )]
    pub(crate) oneline: bool,
    #[arg(
        short = 's',
        long,
        help = "Output in short format (print matching input indicator only)"
    )]
    pub(crate) short: bool,
    #[arg(
        short = 'j',
        long = "json",
        global = true,
        help = "Output as JSON"
    )]
    pub(crate) as_json: bool,
    #[arg(
        long,
        global = true,
        env = "RIQ_HTTP_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS,
        help = "HTTP request timeout in seconds"
    )]
    pub(crate) timeout: u64,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    #[command(about = "Query blacklist on URL")]
    Lookup(UrlArgs),
    #[command(about = "Query blacklist incident on URL")]
    Incident(UrlArgs),
    #[command(
        name = "incidentlist",
        about = "Query blacklist incidents within timeframe"
    )]
    IncidentList(IncidentListArgs),
    #[command(about = "Query blacklisted resources")]
    List(ListArgs),
    #[command(
        about = "Query for all discovered malware resources generated within a particular period"
    )]
    Malware(MalwareArgs),
}

#[derive(Args)]
pub(crate) struct UrlArgs {
    #[arg(help = "URL to query")]
    pub(crate) url: String,
}

#[derive(Args)]
pub(crate) struct WindowArgs {
    #[arg(short = 'd', long, default_value_t = 1, help = "days to query")]
    pub(crate) days: u32,
    #[arg(
        short = 's',
        long,
        value_parser = parse_datetime,
        help = "start datetime in yyyy-mm-dd HH:MM:SS format"
    )]
    pub(crate) start: Option<NaiveDateTime>,
    #[arg(
        short = 'e',
        long,
        value_parser = parse_datetime,
        help = "end datetime in yyyy-mm-dd HH:MM:SS format"
    )]
    pub(crate) end: Option<NaiveDateTime>,
}

#[derive(Args)]
pub(crate) struct IncidentListArgs {
    #[arg(short = 'a', long, help = "Filter crawls to those on workspace")]
    pub(crate) all_workspace_crawls: bool,
    #[command(flatten)]
    pub(crate) window: WindowArgs,
}

#[derive(Args)]
pub(crate) struct ListArgs {
    #[arg(
        short = 'f',
        long,
        help = "Filter to one of \"blackhole\", \"sakura\" or \"exploitKit\""
    )]
    pub(crate) filter: Option<String>,
    #[command(flatten)]
    pub(crate) window: WindowArgs,
}

#[derive(Args)]
pub(crate) struct MalwareArgs {
    #[arg(
        short = 'f',
        long,
        help = "Filter to one of \"blackhole\", \"sakura\" or \"exploitKit\""
    )]
    pub(crate) filter: Option<String>,
    #[arg(
        short = 'c',
        long,
        help = "Restrict results to malicious probability of H, M, or L (high, medium or low)"
    )]
    pub(crate) confidence: Option<String>,
    #[command(flatten)]
    pub(crate) window: WindowArgs,
}

const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::Lookup(_) => "lookup",
        Command::Incident(_) => "incident",
        Command::IncidentList(_) => "incidentlist",
        Command::List(_) => "list",
        Command::Malware(_) => "malware",
    }
}

fn subcommand_usage(name: &str) -> String {
    let mut command = Cli::command();
    command.build();
    if let Some(subcommand) = command.find_subcommand_mut(name) {
        return subcommand.render_usage().to_string();
    }
    command.render_usage().to_string()
}
