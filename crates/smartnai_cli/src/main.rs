//! SmartNAI command-line editor.
//!
//! # Responsibility
//! - Open the snapshot database and start one editing session.
//! - Read editor commands line by line until `quit` or end of input.

mod commands;
mod terminal;

use clap::Parser;
use log::{error, info};
use smartnai_core::db::open_db;
use smartnai_core::{
    core_version, default_log_level, init_logging, PromptSession, SessionConfig,
    SnapshotService, SqliteSnapshotRepository,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

/// Organize prompt fragments into topics and compile them.
#[derive(Debug, Parser)]
#[command(name = "smartnai", version)]
struct Args {
    /// SQLite database holding saved snapshots.
    #[arg(long)]
    db: Option<PathBuf>,
    /// Storage key of the snapshot to edit.
    #[arg(long)]
    key: Option<String>,
    /// Absolute directory for rolling log files; logging is off when unset.
    #[arg(long)]
    log_dir: Option<String>,
    /// Log level (trace|debug|info|warn|error).
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Some(log_dir) = args.log_dir.as_deref() {
        let level = args.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("warning: {err}");
        }
    }

    let config = SessionConfig::default().with_overrides(args.key, args.db);
    let conn = match open_db(&config.db_path) {
        Ok(conn) => conn,
        Err(err) => {
            error!("event=cli_start module=cli status=error error_code=db_open_failed error={err}");
            eprintln!("error: cannot open `{}`: {err}", config.db_path.display());
            return ExitCode::FAILURE;
        }
    };
    let repo = match SqliteSnapshotRepository::try_new(&conn) {
        Ok(repo) => repo,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let mut session = PromptSession::open(SnapshotService::new(repo), config.storage_key);
    info!(
        "event=cli_start module=cli status=ok key={} topics={}",
        session.key(),
        session.state().topics.len()
    );
    let stdin = io::stdin();
    let stdout = io::stdout();
    match run(&mut session, &mut stdin.lock(), &mut stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_exit module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run<R, I, O>(session: &mut PromptSession<R>, input: &mut I, out: &mut O) -> io::Result<()>
where
    R: smartnai_core::SnapshotRepository,
    I: BufRead,
    O: Write,
{
    writeln!(
        out,
        "smartnai {} editing `{}`; type `help` for commands",
        core_version(),
        session.key()
    )?;
    terminal::render(session, out)?;

    let mut line = String::new();
    loop {
        write!(out, "> ")?;
        out.flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Ok(());
        }
        if line.trim().is_empty() {
            continue;
        }
        match commands::parse(&line) {
            Ok(command) => {
                if commands::dispatch(command, session, input, out)?.is_break() {
                    return Ok(());
                }
            }
            Err(err) => writeln!(out, "{}", err.render())?,
        }
    }
}
