use std::path::Path;

use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::dataset::{Column, Dataset};
use crate::error::{Result, TallyError};
use crate::models::{DateRange, PriceTable, ReconcileRequest, ReconcileResult, UnitCounts};
use crate::parse::{parse_amount, parse_date_dmy, CellPolicy, AMOUNT_CELLS, DATE_CELLS};

// ---------------------------------------------------------------------------
// Filtering and summation
// ---------------------------------------------------------------------------

pub struct RangeMatch {
    /// Indices of rows whose date lies inside the range.
    pub rows: Vec<usize>,
    /// Rows whose date cell could not be parsed.
    pub undated: usize,
}

pub fn rows_in_range(dates: &Column, range: &DateRange) -> Result<RangeMatch> {
    let mut rows = Vec::new();
    let mut undated = 0usize;
    for (i, cell) in dates.cells.iter().enumerate() {
        match parse_date_dmy(cell) {
            Some(date) if range.contains(date) => rows.push(i),
            Some(_) => {}
            None => match DATE_CELLS {
                CellPolicy::Skip => undated += 1,
                CellPolicy::Reject => return Err(TallyError::InvalidDate(cell.clone())),
            },
        }
    }
    Ok(RangeMatch { rows, undated })
}

pub struct PositiveSum {
    pub total: Decimal,
    pub summed: usize,
}

/// Sum amounts above zero for the given rows. A single bad cell, or a total
/// too large to represent, fails the whole sum.
pub fn sum_positive(amounts: &Column, rows: &[usize]) -> Result<PositiveSum> {
    let mut total = Decimal::ZERO;
    let mut summed = 0usize;
    for &i in rows {
        let cell = &amounts.cells[i];
        let value = match (parse_amount(cell), AMOUNT_CELLS) {
            (Some(v), _) => v,
            (None, CellPolicy::Skip) => continue,
            (None, CellPolicy::Reject) => {
                return Err(TallyError::Parse {
                    row: i + 1,
                    value: cell.clone(),
                })
            }
        };
        if value > Decimal::ZERO {
            total = total
                .checked_add(value)
                .ok_or(TallyError::Overflow { row: i + 1 })?;
            summed += 1;
        }
    }
    Ok(PositiveSum { total, summed })
}

// ---------------------------------------------------------------------------
// Reconciler
// ---------------------------------------------------------------------------

/// One reconciliation session: holds the price table and, once a file has
/// been loaded, the dataset it reconciles against.
#[derive(Debug, Clone)]
pub struct Reconciler {
    prices: PriceTable,
    dataset: Option<Dataset>,
}

impl Reconciler {
    pub fn new(prices: PriceTable) -> Self {
        Self {
            prices,
            dataset: None,
        }
    }

    pub fn prices(&self) -> &PriceTable {
        &self.prices
    }

    pub fn is_loaded(&self) -> bool {
        self.dataset.is_some()
    }

    /// Load a CSV, replacing the current dataset only if the load succeeds.
    pub fn load(&mut self, path: &Path) -> Result<Vec<String>> {
        let dataset = Dataset::load(path)?;
        let columns = dataset.column_names();
        info!("Loaded {} rows from {}", dataset.row_count(), path.display());
        self.dataset = Some(dataset);
        Ok(columns)
    }

    /// Column names of the loaded dataset, empty while nothing is loaded.
    pub fn columns(&self) -> Vec<String> {
        self.dataset
            .as_ref()
            .map(Dataset::column_names)
            .unwrap_or_default()
    }

    /// First data row's value for each column, for previews.
    pub fn sample_row(&self) -> Vec<String> {
        let Some(ds) = &self.dataset else {
            return Vec::new();
        };
        ds.column_names()
            .iter()
            .filter_map(|name| ds.column(name).ok())
            .map(|c| c.cells.first().cloned().unwrap_or_default())
            .collect()
    }

    pub fn reconcile(&self, req: &ReconcileRequest<'_>) -> Result<ReconcileResult> {
        let dataset = self.dataset.as_ref().ok_or(TallyError::NoDataset)?;
        let counts = UnitCounts::parse(req.soda, req.beer, req.energy)?;
        let expected = self.prices.expected(&counts);

        let dates = dataset.column(&req.columns.date_column)?;
        let amounts = dataset.column(&req.columns.amount_column)?;

        let matched = rows_in_range(dates, &req.range)?;
        debug!(
            "{} of {} rows between {} and {} ({} without a date)",
            matched.rows.len(),
            dataset.row_count(),
            req.range.start,
            req.range.end,
            matched.undated
        );

        let sum = sum_positive(amounts, &matched.rows)?;
        debug!(
            "Summed {} positive rows, excluded {} fee/refund rows",
            sum.summed,
            matched.rows.len() - sum.summed
        );

        Ok(ReconcileResult {
            expected,
            actual: sum.total,
            difference: sum.total - expected,
            counts,
            rows_in_range: matched.rows.len(),
            rows_summed: sum.summed,
            undated_rows: matched.undated,
        })
    }
}
