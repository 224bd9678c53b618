//! `triagem` - CLI for the local symptom assessment
//!
//! This binary drives the intake, results and history views against the
//! local store.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::PathBuf;

use anyhow::Context;
use chrono::{DateTime, Local};
use clap::Parser;
use serde::Serialize;

use triagem::cli::{
    AssessCommand, Cli, Command, ConfigCommand, FinishCommand, HistoryCommand, OpenCommand,
    OutputFormat,
};
use triagem::history::render_history;
use triagem::routes::{NOT_FOUND_MESSAGE, NOT_FOUND_TITLE};
use triagem::{
    init_logging, Clinic, CommitOutcome, Config, HistoryEntry, Page, ResultsView, Route,
    SqliteStore,
};

/// Warning shown under the intake form.
const INTAKE_WARNING: &str = "Aviso: Esta ferramenta utiliza IA para fornecer avaliação preliminar. Não substitui consulta médica profissional. Em emergências, procure atendimento imediatamente.";

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let now = Local::now();

    match cli.command {
        Command::Config(config_cmd) => handle_config(cli.config, config_cmd),
        Command::Assess(cmd) => handle_assess(&mut open_clinic(cli.config)?, &cmd, &now),
        Command::Results(cmd) => {
            let mut clinic = open_clinic(cli.config)?;
            let page = clinic.visit(&Route::Results, &now)?;
            print_page(&page, cmd.format)
        }
        Command::Finish(cmd) => handle_finish(&mut open_clinic(cli.config)?, &cmd, &now),
        Command::History(cmd) => handle_history(&mut open_clinic(cli.config)?, &cmd),
        Command::Open(cmd) => handle_open(&mut open_clinic(cli.config)?, &cmd, &now),
        Command::Status(cmd) => handle_status(&open_clinic(cli.config)?, cmd.format),
    }
}

fn open_clinic(config_path: Option<PathBuf>) -> anyhow::Result<Clinic<SqliteStore>> {
    let config = Config::load_from(config_path)?;
    let path = config.database_path();
    let store = SqliteStore::open(&path)
        .with_context(|| format!("opening local storage at {}", path.display()))?;
    Ok(Clinic::new(store, config))
}

fn handle_assess(
    clinic: &mut Clinic<SqliteStore>,
    cmd: &AssessCommand,
    now: &DateTime<Local>,
) -> anyhow::Result<()> {
    let next = clinic.submit(&cmd.to_record())?;
    let page = clinic.visit(&next, now)?;
    print_page(&page, cmd.format)
}

fn handle_finish(
    clinic: &mut Clinic<SqliteStore>,
    cmd: &FinishCommand,
    now: &DateTime<Local>,
) -> anyhow::Result<()> {
    let finish = clinic.finish(cmd.then.into(), now)?;

    if cmd.format == OutputFormat::Plain {
        match &finish.outcome {
            CommitOutcome::Appended(entry) => {
                println!("Consulta salva no histórico ({} {}).", entry.date, entry.time);
            }
            CommitOutcome::AlreadyCommitted => {
                println!("Esta avaliação já está no histórico.");
            }
            CommitOutcome::NothingPending => {
                println!("Nenhuma avaliação pendente.");
            }
        }
        println!();
    }

    let page = clinic.visit(&finish.next, now)?;
    if cmd.format == OutputFormat::Json {
        let saved = match &finish.outcome {
            CommitOutcome::Appended(entry) => Some(entry),
            _ => None,
        };
        let value = serde_json::json!({
            "saved": saved,
            "already_committed": finish.outcome == CommitOutcome::AlreadyCommitted,
            "next": finish.next,
            "page": page_json(&page)?,
        });
        return print_json(&value);
    }
    print_page(&page, cmd.format)
}

fn handle_history(clinic: &mut Clinic<SqliteStore>, cmd: &HistoryCommand) -> anyhow::Result<()> {
    let mut entries = clinic.history()?;
    if let Some(limit) = cmd.limit.or_else(|| clinic.config().display_limit()) {
        entries.truncate(limit);
    }
    print_page(&Page::History(entries), cmd.format)
}

fn handle_open(
    clinic: &mut Clinic<SqliteStore>,
    cmd: &OpenCommand,
    now: &DateTime<Local>,
) -> anyhow::Result<()> {
    let page = clinic.visit(&Route::parse(&cmd.route), now)?;
    print_page(&page, cmd.format)
}

fn handle_status(clinic: &Clinic<SqliteStore>, format: OutputFormat) -> anyhow::Result<()> {
    let status = clinic.status()?;
    let stats = clinic.store().stats()?;

    match format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "database_path": clinic.store().path(),
            "pending": status.pending,
            "committed": status.committed,
            "history_len": status.history_len,
            "keys": stats.key_count,
            "db_size_bytes": stats.db_size_bytes,
        })),
        OutputFormat::Plain => {
            println!("triagem status");
            println!("--------------");
            println!("Database:      {}", clinic.store().path().display());
            println!("Keys:          {}", stats.key_count);
            println!("Size:          {} bytes", stats.db_size_bytes);
            println!(
                "Pending:       {}",
                match (status.pending, status.committed) {
                    (false, _) => "none",
                    (true, false) => "yes (not yet in history)",
                    (true, true) => "yes (saved to history)",
                }
            );
            match status.history_len {
                Some(len) => println!("History:       {len} entries"),
                None => println!("History:       not created yet"),
            }
            Ok(())
        }
    }
}

fn handle_config(config_path: Option<PathBuf>, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = Config::load_from(config_path)?;
            if json {
                print_json(&config)?;
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:   {}", config.database_path().display());
                println!("  On corrupt:      {:?}", config.storage.on_corrupt);
                println!();
                println!("[History]");
                println!("  Seed samples:    {}", config.history.seed_samples);
                println!("  Commit policy:   {:?}", config.history.commit_policy);
                println!("  Display limit:   {}", config.history.display_limit);
            }
        }
        ConfigCommand::Path => {
            let path = config_path.unwrap_or_else(Config::default_config_path);
            println!("{}", path.display());
        }
        ConfigCommand::Validate { file } => {
            let path = file
                .or(config_path)
                .unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}

fn print_page(page: &Page, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => print_json(&page_json(page)?),
        OutputFormat::Plain => {
            print!("{}", page_text(page));
            Ok(())
        }
    }
}

fn page_text(page: &Page) -> String {
    match page {
        Page::Intake => format!(
            "Avaliação Médica Preliminar\n\nPreencha o questionário com `triagem assess --help`.\n\n{INTAKE_WARNING}\n"
        ),
        Page::Results(view) => view.to_text(),
        Page::History(entries) => render_history(entries),
        Page::NotFound(path) => {
            format!("{NOT_FOUND_TITLE}\n{NOT_FOUND_MESSAGE}: {path}\nVoltar ao Início: /\n")
        }
    }
}

fn page_json(page: &Page) -> anyhow::Result<serde_json::Value> {
    #[derive(Serialize)]
    #[serde(tag = "page", rename_all = "snake_case")]
    enum PageJson<'a> {
        Intake,
        Results { view: &'a ResultsView },
        History { entries: &'a [HistoryEntry] },
        NotFound { path: &'a str },
    }

    let page = match page {
        Page::Intake => PageJson::Intake,
        Page::Results(view) => PageJson::Results {
            view: view.as_ref(),
        },
        Page::History(entries) => PageJson::History {
            entries: entries.as_slice(),
        },
        Page::NotFound(path) => PageJson::NotFound {
            path: path.as_str(),
        },
    };
    Ok(serde_json::to_value(page)?)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
