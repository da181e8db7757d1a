//! DayLog command line: record a daily entry or chart one question's trend.
//!
//! Every failure is converted to a readable message and a nonzero exit at
//! this boundary; nothing propagates as a crash and nothing is retried.

mod config;
mod prompt;
mod render;

use clap::{Parser, Subcommand};
use daylog_core::{
    render_trend, CsvEntryRepository, EntryDate, EntryService, Schema, DATE_COLUMN,
};
use prompt::ConsolePrompt;
use std::io::{BufRead, Write};

#[derive(Parser, Debug)]
#[command(name = "daylog", about = "Schema-driven daily wellbeing logger")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record one daily entry interactively.
    Entry {
        /// Entry date as YYYY-MM-DD; defaults to today.
        #[arg(long)]
        date: Option<String>,
    },
    /// Chart one question against the date column.
    Trend {
        /// The question column to chart.
        question: Option<String>,
        /// List the available columns instead of charting.
        #[arg(long)]
        list: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    if let Err(message) = run(cli) {
        eprintln!("error: {message}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let config = config::load_or_init()?;

    // A broken log setup should not block recording an entry.
    if let Err(message) = daylog_core::init_logging(&config.log_level, &config.log_dir) {
        eprintln!("warning: logging disabled: {message}");
    }

    let schema = match &config.schema_file {
        Some(path) => Schema::from_file(path).map_err(|err| err.to_string())?,
        None => Schema::builtin(),
    };
    let service = EntryService::new(
        schema.clone(),
        CsvEntryRepository::new(&config.data_file, &schema),
    );

    match cli.command {
        Command::Entry { date } => run_entry(&service, date),
        Command::Trend { question, list } => run_trend(&service, question, list),
    }
}

fn run_entry(service: &EntryService<CsvEntryRepository>, date: Option<String>) -> Result<(), String> {
    let date = match date {
        Some(text) => EntryDate::parse(&text).map_err(|err| err.to_string())?,
        None => EntryDate::today(),
    };

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    // Scoped so the form's stdin lock is released before the confirmation
    // prompt takes its own.
    let entry = {
        let mut provider = ConsolePrompt::new(stdin.lock(), stdout.lock());
        service
            .build_entry(date, &mut provider)
            .map_err(|err| err.to_string())?
    };

    if !confirm(&entry, stdin.lock(), stdout.lock())? {
        println!("Discarded; nothing was saved.");
        return Ok(());
    }

    service.submit(&entry).map_err(|err| err.to_string())?;
    println!("Saved entry for {}.", entry.date());
    Ok(())
}

fn confirm(
    entry: &daylog_core::Entry,
    mut input: impl BufRead,
    mut output: impl Write,
) -> Result<bool, String> {
    write!(output, "\nSave entry for {}? [Y/n]: ", entry.date()).map_err(|err| err.to_string())?;
    output.flush().map_err(|err| err.to_string())?;

    let mut line = String::new();
    input
        .read_line(&mut line)
        .map_err(|err| format!("cannot read input: {err}"))?;
    let reply = line.trim().to_ascii_lowercase();
    Ok(reply.is_empty() || reply == "y" || reply == "yes")
}

fn run_trend(
    service: &EntryService<CsvEntryRepository>,
    question: Option<String>,
    list: bool,
) -> Result<(), String> {
    let table = service.read_all().map_err(|err| err.to_string())?;

    if list {
        if table.columns().len() <= 1 {
            println!("No question columns recorded yet.");
        } else {
            for column in table.columns() {
                if column != DATE_COLUMN {
                    println!("{column}");
                }
            }
        }
        return Ok(());
    }

    let question =
        question.ok_or_else(|| "pass a question to chart, or --list to see columns".to_string())?;
    let trend = render_trend(&table, &question).map_err(|err| err.to_string())?;
    render::print_trend(&trend);
    Ok(())
}
