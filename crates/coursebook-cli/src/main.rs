#![forbid(unsafe_code)]

mod output;

use std::env;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use coursebook_core::command::{CommandResult, Directive, PendingConfirmation};
use coursebook_core::config;
use coursebook_core::session::Session;
use coursebook_core::storage::JsonCourseBookStorage;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use output::{CliError, OutputMode, render_error, render_result};

#[derive(Parser)]
#[command(
    name = "cb",
    author,
    version,
    about = "cb: keep track of classmates and the courses they take",
    long_about = "Reads one command per line from stdin (`add`, `list`, `find`, `undo`, ...). \
                  Type `help` for the command list and `exit` to quit."
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Data file to load and save (overrides the config file).
    #[arg(long, value_name = "PATH")]
    data: Option<PathBuf>,

    /// Config file to read instead of the default location.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, hide = true)]
    json: bool,

    /// Confirm deletions without asking.
    #[arg(short, long)]
    yes: bool,

    /// Start empty instead of with sample persons when there is no data file.
    #[arg(long)]
    no_sample: bool,
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("COURSEBOOK_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "coursebook=debug,cb=debug,info"
        } else {
            "coursebook=info,cb=info,warn"
        })
    });

    let format = env::var("COURSEBOOK_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    coursebook_core::init();

    let cfg = config::load_config(cli.config.as_deref()).context("loading configuration")?;
    let mode = output::resolve_output_mode(cli.format, cli.json, cfg.output.as_deref());

    let data_file = cli.data.unwrap_or(cfg.data_file);
    info!(path = %data_file.display(), mode = mode.as_str(), "starting session");
    let storage = JsonCourseBookStorage::new(data_file);
    let mut session = Session::open(storage, cfg.load_sample_data && !cli.no_sample);

    let stdin = io::stdin();
    let interactive = stdin.is_terminal() && !mode.is_json();
    let mut lines = stdin.lock().lines();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    loop {
        if interactive {
            write!(out, "cb> ")?;
            out.flush()?;
        }
        let Some(line) = lines.next() else {
            debug!("end of input");
            break;
        };
        let line = line.context("reading input")?;
        if line.trim().is_empty() {
            continue;
        }

        let result = match session.execute(&line) {
            Ok(result) => result,
            Err(err) => {
                render_error(&mut io::stderr().lock(), mode, &CliError::from(&err))?;
                continue;
            }
        };
        render_result(&mut out, mode, &result, session.model())?;

        match &result.directive {
            Directive::Exit => break,
            Directive::PendingConfirmation(pending) => {
                let approved = cli.yes || ask_confirmation(&mut lines)?;
                resolve_pending(&mut session, &mut out, mode, pending, approved)?;
            }
            _ => {}
        }
    }

    out.flush()?;
    Ok(())
}

/// Prompt on stderr and read the answer from the next input line.
/// End of input counts as "no".
fn ask_confirmation(lines: &mut impl Iterator<Item = io::Result<String>>) -> anyhow::Result<bool> {
    let mut err = io::stderr().lock();
    write!(err, "Confirm? [y/N] ")?;
    err.flush()?;
    let answer = match lines.next() {
        Some(line) => line.context("reading confirmation")?,
        None => return Ok(false),
    };
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

fn resolve_pending(
    session: &mut Session<JsonCourseBookStorage>,
    out: &mut dyn Write,
    mode: OutputMode,
    pending: &PendingConfirmation,
    approved: bool,
) -> anyhow::Result<()> {
    if !approved {
        debug!(candidates = pending.candidates.len(), "deletion cancelled");
        return render_result(
            out,
            mode,
            &CommandResult::new("Deletion cancelled."),
            session.model(),
        );
    }
    match session.confirm(pending) {
        Ok(result) => render_result(out, mode, &result, session.model()),
        Err(err) => render_error(&mut io::stderr().lock(), mode, &CliError::from(&err)),
    }
}
