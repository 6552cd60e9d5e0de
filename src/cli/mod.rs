pub mod columns;
pub mod prices;
pub mod reconcile;
pub mod session;

use std::io::IsTerminal;

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use colored::Colorize;
use comfy_table::{Cell, Table};
use dialoguer::Select;
use rust_decimal::Decimal;
use tracing_subscriber::filter::LevelFilter;

use crate::error::{Result, TallyError};
use crate::fmt::{kroner, summary_line};
use crate::models::{Drink, PriceTable, ReconcileResult};
use crate::parse::parse_date_dmy;

#[derive(Debug, Parser)]
#[command(
    name = "bartally",
    about = "Reconcile bar drink-sale counts against a bank/POS CSV export."
)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace). RUST_LOG overrides this.
    #[arg(long, global = true, default_value_t = LevelFilter::WARN)]
    pub log_level: LevelFilter,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the columns of a semicolon-delimited CSV.
    Columns {
        /// Path to the CSV export
        file: String,
    },
    /// Compare counted drink sales with the CSV for a date range.
    Reconcile {
        /// Path to the CSV export
        file: String,
        /// First day, DD/MM/YYYY (default: today)
        #[arg(long = "from")]
        from_date: Option<String>,
        /// Last day, DD/MM/YYYY (default: today)
        #[arg(long = "to")]
        to_date: Option<String>,
        /// Column holding transaction dates
        #[arg(long = "date-column")]
        date_column: Option<String>,
        /// Column holding transaction amounts
        #[arg(long = "amount-column")]
        amount_column: Option<String>,
        /// Sodas sold
        #[arg(long, default_value = "")]
        soda: String,
        /// Beers sold
        #[arg(long, default_value = "")]
        beer: String,
        /// Energy drinks sold
        #[arg(long, default_value = "")]
        energy: String,
    },
    /// Load files and reconcile interactively until you quit.
    Session,
    /// Show the unit prices used for expected revenue.
    Prices,
}

/// Parse a date given on the command line or at a prompt. Blank means today.
pub(crate) fn parse_input_date(raw: Option<&str>) -> Result<NaiveDate> {
    match raw.map(str::trim) {
        None | Some("") => Ok(Local::now().date_naive()),
        Some(s) => parse_date_dmy(s).ok_or_else(|| TallyError::InvalidDate(s.to_string())),
    }
}

/// Resolve a column: an explicit name wins, then the configured default if
/// the file has it, then an interactive pick when a terminal is attached.
pub(crate) fn choose_column(
    what: &str,
    explicit: Option<String>,
    configured: Option<&str>,
    columns: &[String],
) -> Result<String> {
    if let Some(name) = explicit {
        return Ok(name);
    }
    if let Some(name) = configured.filter(|n| columns.iter().any(|c| c == n)) {
        return Ok(name.to_string());
    }
    pick_column(what, None, columns)
}

/// Interactive column picker, starting on `preferred` when the file has it.
pub(crate) fn pick_column(what: &str, preferred: Option<&str>, columns: &[String]) -> Result<String> {
    if !std::io::stdin().is_terminal() {
        return Err(TallyError::Column(format!(
            "no {what} column selected (use --{what}-column)"
        )));
    }
    let idx = Select::new()
        .with_prompt(format!("Vælg {} ", column_prompt(what)))
        .items(columns)
        .default(default_index(preferred, columns))
        .interact()?;
    Ok(columns[idx].clone())
}

pub(crate) fn default_index(preferred: Option<&str>, columns: &[String]) -> usize {
    preferred
        .and_then(|name| columns.iter().position(|c| c == name))
        .unwrap_or(0)
}

fn column_prompt(what: &str) -> &'static str {
    match what {
        "date" => "datokolonne",
        _ => "beløbskolonne",
    }
}

pub(crate) fn print_result(result: &ReconcileResult, prices: &PriceTable) {
    let mut table = Table::new();
    table.set_header(vec!["", "Antal", "Pris", "Beløb"]);
    for drink in Drink::ALL {
        let count = result.counts.get(drink);
        let price = prices.price(drink);
        table.add_row(vec![
            Cell::new(drink.label()),
            Cell::new(count),
            Cell::new(kroner(Decimal::from(price))),
            Cell::new(kroner(Decimal::from(count) * Decimal::from(price))),
        ]);
    }
    table.add_row(vec![
        Cell::new("Forventet".bold()),
        Cell::new(""),
        Cell::new(""),
        Cell::new(kroner(result.expected)),
    ]);
    table.add_row(vec![
        Cell::new("Reelt (minus fee)".bold()),
        Cell::new(format!("{}/{}", result.rows_summed, result.rows_in_range)),
        Cell::new(""),
        Cell::new(kroner(result.actual)),
    ]);
    let diff = kroner(result.difference);
    let diff = if result.difference < Decimal::ZERO {
        diff.red().bold()
    } else {
        diff.green().bold()
    };
    table.add_row(vec![
        Cell::new("Forskel".bold()),
        Cell::new(""),
        Cell::new(""),
        Cell::new(diff),
    ]);

    println!("{table}");
    if result.undated_rows > 0 {
        println!(
            "{}",
            format!("{} rækker uden gyldig dato blev sprunget over.", result.undated_rows).yellow()
        );
    }
    println!("{}", summary_line(result));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input_date() {
        assert_eq!(
            parse_input_date(Some("24/12/2025")).unwrap(),
            NaiveDate::from_ymd_opt(2025, 12, 24).unwrap()
        );
        assert_eq!(parse_input_date(None).unwrap(), Local::now().date_naive());
        assert_eq!(parse_input_date(Some("  ")).unwrap(), Local::now().date_naive());
        assert!(matches!(
            parse_input_date(Some("juleaften")),
            Err(TallyError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_choose_column_prefers_explicit() {
        let cols = vec!["Dato".to_string(), "Beløb".to_string()];
        let name = choose_column("date", Some("Other".into()), Some("Dato"), &cols).unwrap();
        assert_eq!(name, "Other");
    }

    #[test]
    fn test_choose_column_uses_configured_when_present() {
        let cols = vec!["Dato".to_string(), "Beløb".to_string()];
        let name = choose_column("amount", None, Some("Beløb"), &cols).unwrap();
        assert_eq!(name, "Beløb");
    }

    #[test]
    fn test_default_index_follows_remembered_column() {
        let cols = vec!["Dato".to_string(), "Tekst".to_string(), "Beløb".to_string()];
        assert_eq!(default_index(Some("Beløb"), &cols), 2);
        assert_eq!(default_index(Some("Dato"), &cols), 0);
        assert_eq!(default_index(Some("Amount"), &cols), 0);
        assert_eq!(default_index(None, &cols), 0);
    }

    #[test]
    fn test_cli_parses_reconcile() {
        let cli = Cli::parse_from([
            "bartally", "reconcile", "x.csv", "--from", "01/01/2025", "--soda", "3",
        ]);
        match cli.command {
            Commands::Reconcile { file, from_date, soda, beer, .. } => {
                assert_eq!(file, "x.csv");
                assert_eq!(from_date.as_deref(), Some("01/01/2025"));
                assert_eq!(soda, "3");
                assert_eq!(beer, "");
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert_eq!(cli.log_level, LevelFilter::WARN);
    }
}
