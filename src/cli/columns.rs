use std::path::Path;

use comfy_table::{Cell, Table};

use crate::error::Result;
use crate::reconciler::Reconciler;

pub fn run(reconciler: &mut Reconciler, file: &str) -> Result<()> {
    let columns = reconciler.load(Path::new(file))?;
    print_columns(&columns, &reconciler.sample_row());
    Ok(())
}

pub(crate) fn print_columns(columns: &[String], sample: &[String]) {
    let mut table = Table::new();
    table.set_header(vec!["#", "Kolonne", "Første række"]);
    for (i, name) in columns.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(name),
            Cell::new(sample.get(i).map(String::as_str).unwrap_or("")),
        ]);
    }
    println!("Kolonner\n{table}");
}
