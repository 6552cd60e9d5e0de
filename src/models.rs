use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::parse::parse_count;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Drink {
    Soda,
    Beer,
    Energy,
}

impl Drink {
    pub const ALL: [Drink; 3] = [Drink::Soda, Drink::Beer, Drink::Energy];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Soda => "soda",
            Self::Beer => "beer",
            Self::Energy => "energy",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Soda => "Sodavand",
            Self::Beer => "Øl",
            Self::Energy => "Energidrik",
        }
    }
}

/// Unit prices in whole kroner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceTable {
    #[serde(default = "default_soda_price")]
    pub soda: u32,
    #[serde(default = "default_beer_price")]
    pub beer: u32,
    #[serde(default = "default_energy_price")]
    pub energy: u32,
}

fn default_soda_price() -> u32 {
    8
}

fn default_beer_price() -> u32 {
    10
}

fn default_energy_price() -> u32 {
    15
}

impl Default for PriceTable {
    fn default() -> Self {
        Self {
            soda: default_soda_price(),
            beer: default_beer_price(),
            energy: default_energy_price(),
        }
    }
}

impl PriceTable {
    pub fn price(&self, drink: Drink) -> u32 {
        match drink {
            Drink::Soda => self.soda,
            Drink::Beer => self.beer,
            Drink::Energy => self.energy,
        }
    }

    /// Revenue the counted units should have produced.
    pub fn expected(&self, counts: &UnitCounts) -> Decimal {
        Drink::ALL
            .iter()
            .map(|&d| Decimal::from(counts.get(d)) * Decimal::from(self.price(d)))
            .sum()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnitCounts {
    pub soda: u32,
    pub beer: u32,
    pub energy: u32,
}

impl UnitCounts {
    /// Parse the three manually entered counts. Blank fields count as zero.
    pub fn parse(soda: &str, beer: &str, energy: &str) -> Result<Self> {
        Ok(Self {
            soda: parse_count(Drink::Soda.key(), soda)?,
            beer: parse_count(Drink::Beer.key(), beer)?,
            energy: parse_count(Drink::Energy.key(), energy)?,
        })
    }

    pub fn get(&self, drink: Drink) -> u32 {
        match drink {
            Drink::Soda => self.soda,
            Drink::Beer => self.beer,
            Drink::Energy => self.energy,
        }
    }
}

/// Inclusive on both ends. A range with `start > end` matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSelection {
    pub date_column: String,
    pub amount_column: String,
}

/// Everything one reconciliation needs. Counts stay raw so that validation
/// happens in one place.
#[derive(Debug, Clone)]
pub struct ReconcileRequest<'a> {
    pub columns: &'a ColumnSelection,
    pub range: DateRange,
    pub soda: &'a str,
    pub beer: &'a str,
    pub energy: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileResult {
    pub expected: Decimal,
    pub actual: Decimal,
    pub difference: Decimal,
    pub counts: UnitCounts,
    /// Rows whose date fell inside the range.
    pub rows_in_range: usize,
    /// Rows in range with an amount above zero.
    pub rows_summed: usize,
    /// Rows anywhere in the file whose date cell did not parse.
    pub undated_rows: usize,
}
