use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::ReconcileResult;

pub const CURRENCY: &str = "DKK";

fn two_places(val: Decimal) -> Decimal {
    val.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Format an amount with thousands separators: 1,234.56 DKK
pub fn kroner(val: Decimal) -> String {
    let rounded = two_places(val);
    let negative = rounded < Decimal::ZERO;
    let fixed = format!("{:.2}", rounded.abs());
    let (int_part, dec_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut with_commas = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    let with_commas: String = with_commas.chars().rev().collect();

    if negative {
        format!("-{with_commas}.{dec_part} {CURRENCY}")
    } else {
        format!("{with_commas}.{dec_part} {CURRENCY}")
    }
}

/// The one-line result shown after each reconciliation.
pub fn summary_line(result: &ReconcileResult) -> String {
    format!(
        "Forventet beløb: {:.2} {CURRENCY} | Reelt beløb i CSV (minus fee): {:.2} {CURRENCY} | Forskel: {:.2} {CURRENCY}",
        two_places(result.expected),
        two_places(result.actual),
        two_places(result.difference),
    )
}
