use std::path::PathBuf;

use clap::{ArgAction, Parser};
use resxsync_cli::{
    ReconcileCommand, default_error_log_path, logging::init_logging, run_reconcile_command,
    write_error_log,
};
use tracing::debug;

/// Copy missing entries between a default .resx file and its localized siblings.
///
/// Entries copied into a localized file get their value prefixed with a
/// marker such as `F_` so translators can spot them.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Folder containing the .resx files
    dir: PathBuf,

    /// Report what would change without writing any file
    #[arg(long)]
    dry_run: bool,

    /// Write a JSON report of the run to this file
    #[arg(long, value_name = "PATH")]
    report_json: Option<PathBuf>,

    /// Where to write the error record if the run fails [default: LastError.txt next to the executable]
    #[arg(long, value_name = "PATH", env = "RESXSYNC_ERROR_LOG")]
    error_log: Option<PathBuf>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    let command = ReconcileCommand {
        dir: args.dir.clone(),
        dry_run: args.dry_run,
        report_json: args.report_json.clone(),
    };

    if let Err(e) = run_reconcile_command(&command) {
        eprintln!("Error: {}", e);
        if let Some(path) = args.error_log.or_else(default_error_log_path) {
            let argv: Vec<String> = std::env::args().skip(1).collect();
            if let Err(log_err) = write_error_log(&path, &e, &argv) {
                debug!(error = %log_err, "could not write error log");
            }
        }
        std::process::exit(1);
    }
}
