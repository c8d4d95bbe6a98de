//! history-replay: Replays recorded file-explorer observations.
//!
//! Feeds a script of create/rename/move/paste/delete observations through
//! element-history and prints the timeline of every queried entry.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Read};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use element_history::{DeleteLookup, HistoryConfig, HistoryService};
use history_replay::{OutputFormat, Replayer, load_script, parse_script, write_outcomes};

#[derive(Parser, Debug)]
#[command(name = "history-replay")]
#[command(about = "Replay file operations and print per-entry history")]
struct Args {
    /// Script to replay (JSON Lines), or "-" for stdin
    #[arg(short, long)]
    script: PathBuf,

    /// Output format for history queries
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Id assigned to the first identity
    #[arg(long, default_value_t = 1)]
    first_id: u64,

    /// Resolve deletes with (path, name) instead of (name, path)
    #[arg(long)]
    swapped_delete_lookup: bool,

    /// Enable verbose logging
    #[arg(long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr; stdout carries query output only.
    let default_filter = if args.verbose {
        "debug"
    } else {
        "info,history_replay=info,element_history=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let steps = if args.script.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read script from stdin")?;
        parse_script(&text)?
    } else {
        load_script(&args.script)
            .with_context(|| format!("Failed to load script {:?}", args.script))?
    };
    info!("Loaded {} step(s)", steps.len());

    let delete_lookup = if args.swapped_delete_lookup {
        DeleteLookup::SwappedArguments
    } else {
        DeleteLookup::CurrentEntry
    };
    let config = HistoryConfig::new()
        .first_id(args.first_id)
        .delete_lookup(delete_lookup);

    let replayer = Replayer::new(HistoryService::with_config(config));
    let outcomes = replayer.run(&steps);

    info!(
        "Replayed {} step(s): {} record(s) in log, {} backfilled, {} quer(ies)",
        steps.len(),
        replayer.service().len(),
        replayer.synthesized_count(),
        outcomes.len()
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_outcomes(&mut out, &outcomes, args.format).context("Failed to write output")?;

    Ok(())
}
