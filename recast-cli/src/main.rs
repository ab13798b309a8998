// recast-cli/src/main.rs
//
// Entry point for the `recast` binary.
//
// Parses arguments, sets up logging and the terminal reporter, dispatches to
// the chosen subcommand and turns any error into a non-zero exit code.

use clap::Parser;
use recast_cli::logging::{get_timestamp, init_logging};
use recast_cli::terminal::CliReporter;
use recast_cli::{Cli, Commands, run_check, run_mp3, run_mp4, run_serve};
use recast_core::progress_reporting::{self, set_progress_reporter};
use std::process;
use std::time::Instant;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.global.verbose, cli.global.log_file.as_deref()) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
    set_progress_reporter(Box::new(CliReporter::new()));
    log::debug!("recast {} started at {}", env!("CARGO_PKG_VERSION"), get_timestamp());

    let start = Instant::now();
    let result = match &cli.command {
        Commands::Mp4(args) => run_mp4(&cli.global, args).map(|_| ()),
        Commands::Mp3(args) => run_mp3(&cli.global, args).map(|_| ()),
        Commands::Serve(args) => run_serve(&cli.global, args),
        Commands::Check => run_check(&cli.global),
    };

    match result {
        Ok(()) => {
            log::debug!("Finished in {:.1}s", start.elapsed().as_secs_f64());
        }
        Err(e) => {
            progress_reporting::clear_progress();
            progress_reporting::error(&e.to_string());
            process::exit(1);
        }
    }
}
