use comfy_table::{Cell, Table};
use rust_decimal::Decimal;

use crate::error::Result;
use crate::fmt::kroner;
use crate::models::{Drink, PriceTable};
use crate::settings::settings_path;

pub fn run(prices: &PriceTable) -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["Drikkevare", "Nøgle", "Pris"]);
    for drink in Drink::ALL {
        table.add_row(vec![
            Cell::new(drink.label()),
            Cell::new(drink.key()),
            Cell::new(kroner(Decimal::from(prices.price(drink)))),
        ]);
    }
    println!("Priser\n{table}");
    println!("Settings: {}", settings_path().display());
    Ok(())
}
