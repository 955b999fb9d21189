#![warn(clippy::uninlined_format_args)]

mod bootstrap;
mod cli;

use std::{fs, process};

use billsplit_application::{BillScriptParser, HistoryService};
use billsplit_domain::Bill;
use billsplit_i18n as i18n;
use billsplit_infrastructure::{JsonFileSplitRepository, ScriptBillParser};
use billsplit_presentation::{
    HistoryPresenter, SummaryPresenter, format_history_error, format_script_error,
};

use crate::{
    bootstrap::{AppConfig, init_logging},
    cli::{CliResult, Command, parse_args},
};

fn main() {
    init_logging();

    if let Err(err) = run() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run() -> CliResult<()> {
    let command = parse_args(std::env::args().skip(1))?;
    let config = AppConfig::from_env();
    tracing::debug!(?command, history = %config.history_path.display(), "Starting");

    let history = HistoryService::new(JsonFileSplitRepository::new(&config.history_path));

    match command {
        Command::Show { path, detailed } => {
            let bill = load_bill(&path)?;
            println!("{}", render_bill(&bill, detailed));
        }
        Command::Save { path, name } => {
            let bill = load_bill(&path)?;
            let saved = history
                .save_split(&name, &bill)
                .map_err(|err| format_history_error(&err))?;
            println!(
                "{}: {}",
                i18n::SPLIT_SAVED,
                HistoryPresenter::render(std::slice::from_ref(&saved))
            );
        }
        Command::History => {
            let splits = history.list().map_err(|err| format_history_error(&err))?;
            println!("{}", HistoryPresenter::render(&splits));
        }
        Command::Recall { id, detailed } => {
            let bill = history
                .recall(&id)
                .map_err(|err| format_history_error(&err))?;
            println!("{}", render_bill(&bill, detailed));
        }
        Command::Forget { id } => {
            let removed = history
                .delete_split(&id)
                .map_err(|err| format_history_error(&err))?;
            println!(
                "{}: {}",
                i18n::SPLIT_DELETED,
                HistoryPresenter::render(std::slice::from_ref(&removed))
            );
        }
    }

    Ok(())
}

fn load_bill(path: &str) -> CliResult<Bill> {
    let source =
        fs::read_to_string(path).map_err(|err| format!("Failed to read '{path}': {err}"))?;
    ScriptBillParser
        .parse(&source)
        .map_err(|err| format_script_error(&err).into())
}

fn render_bill(bill: &Bill, detailed: bool) -> String {
    let results = bill.results();
    if detailed {
        SummaryPresenter::render_detailed(&results, &bill.itemized_breakdown())
    } else {
        SummaryPresenter::render(&results)
    }
}
