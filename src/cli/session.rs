use std::path::Path;

use colored::Colorize;
use dialoguer::{Confirm, Input, Select};
use tracing::debug;

use crate::error::Result;
use crate::models::{ColumnSelection, DateRange, ReconcileRequest};
use crate::reconciler::Reconciler;
use crate::settings::{save_settings, Settings};

use super::columns::print_columns;
use super::{parse_input_date, pick_column, print_result};

const ACTIONS: [&str; 3] = ["Beregn igen", "Indlæs en anden CSV", "Afslut"];

/// Interactive loop: load a file, pick columns, enter dates and counts,
/// show the result. Errors are reported and the loop carries on.
pub fn run(reconciler: &mut Reconciler, settings: &mut Settings) -> Result<()> {
    let mut selection: Option<ColumnSelection> = None;

    loop {
        if !reconciler.is_loaded() || selection.is_none() {
            match load_and_select(reconciler, settings) {
                Ok(s) => selection = Some(s),
                Err(e) => {
                    eprintln!("{} {e}", "Fejl:".red().bold());
                    if !Confirm::new()
                        .with_prompt("Prøv igen?")
                        .default(true)
                        .interact()?
                    {
                        return Ok(());
                    }
                    continue;
                }
            }
        }

        if let Some(cols) = &selection {
            if let Err(e) = compute(reconciler, cols) {
                eprintln!("{} {e}", "Kunne ikke beregne:".red().bold());
            }
        }

        let action = Select::new()
            .with_prompt("Hvad nu?")
            .items(&ACTIONS)
            .default(0)
            .interact()?;
        match action {
            0 => continue,
            1 => selection = None,
            _ => return Ok(()),
        }
    }
}

fn load_and_select(reconciler: &mut Reconciler, settings: &mut Settings) -> Result<ColumnSelection> {
    let path: String = Input::new()
        .with_prompt("Sti til CSV-fil")
        .interact_text()?;
    reconciler.load(Path::new(path.trim()))?;
    let columns = reconciler.columns();
    println!("{}", "CSV er indlæst succesfuldt!".green());
    print_columns(&columns, &reconciler.sample_row());

    let selection = ColumnSelection {
        date_column: pick_column("date", settings.date_column.as_deref(), &columns)?,
        amount_column: pick_column("amount", settings.amount_column.as_deref(), &columns)?,
    };
    debug!("Selected columns {selection:?}");

    let remembered = settings.date_column.as_deref() == Some(selection.date_column.as_str())
        && settings.amount_column.as_deref() == Some(selection.amount_column.as_str());
    if !remembered
        && Confirm::new()
            .with_prompt("Husk kolonnevalget til næste gang?")
            .default(false)
            .interact()?
    {
        settings.date_column = Some(selection.date_column.clone());
        settings.amount_column = Some(selection.amount_column.clone());
        save_settings(settings)?;
    }
    Ok(selection)
}

fn compute(reconciler: &Reconciler, columns: &ColumnSelection) -> Result<()> {
    let from: String = Input::new()
        .with_prompt("Startdato (DD/MM/YYYY, tom = i dag)")
        .allow_empty(true)
        .interact_text()?;
    let to: String = Input::new()
        .with_prompt("Slutdato (DD/MM/YYYY, tom = i dag)")
        .allow_empty(true)
        .interact_text()?;
    let start = parse_input_date(Some(&from))?;
    let end = parse_input_date(Some(&to))?;

    let soda = prompt_count("Antal sodavand solgt")?;
    let beer = prompt_count("Antal øl solgt")?;
    let energy = prompt_count("Antal energidrik solgt")?;

    let result = reconciler.reconcile(&ReconcileRequest {
        columns,
        range: DateRange::new(start, end),
        soda: &soda,
        beer: &beer,
        energy: &energy,
    })?;
    print_result(&result, reconciler.prices());
    Ok(())
}

fn prompt_count(prompt: &str) -> Result<String> {
    Ok(Input::<String>::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?)
}
