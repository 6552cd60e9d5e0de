use std::path::Path;

use crate::error::Result;
use crate::models::{ColumnSelection, DateRange, ReconcileRequest, UnitCounts};
use crate::reconciler::Reconciler;
use crate::settings::Settings;

use super::{choose_column, parse_input_date, print_result};

pub struct ReconcileArgs {
    pub file: String,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    pub date_column: Option<String>,
    pub amount_column: Option<String>,
    pub soda: String,
    pub beer: String,
    pub energy: String,
}

pub fn run(reconciler: &mut Reconciler, settings: &Settings, args: ReconcileArgs) -> Result<()> {
    let start = parse_input_date(args.from_date.as_deref())?;
    let end = parse_input_date(args.to_date.as_deref())?;
    UnitCounts::parse(&args.soda, &args.beer, &args.energy)?;

    let columns = reconciler.load(Path::new(&args.file))?;
    let selection = ColumnSelection {
        date_column: choose_column(
            "date",
            args.date_column,
            settings.date_column.as_deref(),
            &columns,
        )?,
        amount_column: choose_column(
            "amount",
            args.amount_column,
            settings.amount_column.as_deref(),
            &columns,
        )?,
    };

    let result = reconciler.reconcile(&ReconcileRequest {
        columns: &selection,
        range: DateRange::new(start, end),
        soda: &args.soda,
        beer: &args.beer,
        energy: &args.energy,
    })?;
    print_result(&result, reconciler.prices());
    Ok(())
}
