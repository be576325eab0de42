//! fsq application entry point
//!
//! Runs the interactive query shell, or executes a single query with
//! `-c` and exits.
//!
//! # Usage
//!
//! ```bash
//! # Interactive shell
//! fsq
//! fsq> select name, size[KiB] from 'src' where name like '.*\.rs'
//! fsq> r delete[type file] from '/tmp/scratch' where atime < '2024-01-01'
//! fsq> exit
//!
//! # One-shot query
//! fsq -c "export 'rust.csv' r select name, path from '.' where name like '.*\.rs'"
//! ```

use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::time::Instant;

use fsq::cli::Cli;
use fsq::config::FsqConfig;
use fsq::query::{self, ParsedQuery, QueryOutput};
use fsq::{export, output, FsqError};

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    let config = match FsqConfig::load() {
        Ok(config) => config,
        Err(err) => {
            output::error(&format!("Configuration error: {err}"));
            return ExitCode::FAILURE;
        }
    };
    let quiet = cli.quiet || config.quiet;

    if let Some(command) = cli.command {
        return match run_query(&command, &config, quiet) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                output::error(&err.to_string());
                ExitCode::FAILURE
            }
        };
    }

    if !quiet {
        print_banner();
    }
    shell(&config, quiet)
}

fn print_banner() {
    output::message(&format!(
        "fsq {} - filesystem query shell",
        env!("CARGO_PKG_VERSION")
    ));
    println!("Type a query, 'clear' to clear the screen, or 'exit' to leave.");
}

/// Read-eval-print loop. A failed query prints its error and leaves the
/// shell running.
fn shell(config: &FsqConfig, quiet: bool) -> ExitCode {
    let stdin = io::stdin();
    let mut input = String::new();

    loop {
        print!("{}", config.prompt);
        if io::stdout().flush().is_err() {
            return ExitCode::FAILURE;
        }

        input.clear();
        match stdin.lock().read_line(&mut input) {
            Ok(0) => break,
            Ok(_) => {}
            Err(err) => {
                output::error(&format!("Failed to read input: {err}"));
                return ExitCode::FAILURE;
            }
        }

        let line = input.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }
        if line.eq_ignore_ascii_case("clear") {
            print!("\x1b[2J\x1b[1;1H");
            continue;
        }

        if let Err(err) = run_query(line, config, quiet) {
            output::error(&err.to_string());
        }
    }

    ExitCode::SUCCESS
}

fn run_query(raw: &str, config: &FsqConfig, quiet: bool) -> Result<(), FsqError> {
    let started = Instant::now();

    let parsed = query::parse(raw)?;
    let outcome = query::execute(&parsed)?;

    match outcome {
        QueryOutput::Table(table) => {
            let export_target = match &parsed {
                ParsedQuery::Search(search) => search.export.as_ref(),
                ParsedQuery::Delete(_) => None,
            };
            match export_target {
                Some(target) => {
                    export::write_table(&table, target)?;
                    output::message(&format!(
                        "Exported {} rows to '{}'",
                        table.len(),
                        target.path.display()
                    ));
                }
                None => println!("{}", table.render(config.max_display_rows)),
            }
        }
        QueryOutput::Deleted(outcome) => {
            output::message(&format!(
                "Deleted {} entries ({} skipped)",
                outcome.removed, outcome.skipped
            ));
        }
    }

    if !quiet {
        output::message(&format!("Completed in {:.2?}", started.elapsed()));
    }

    Ok(())
}
