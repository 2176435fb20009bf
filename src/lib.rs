#![deny(rust_2018_idioms)]

use rust_decimal::{Decimal, RoundingStrategy};

pub mod table;
pub use table::function::read_table;

pub mod columns;
pub use columns::function::resolve_columns;

pub mod mask;

pub mod reconcile;
pub use reconcile::function::reconcile;

pub mod export;
pub use export::function::write_report;

pub mod config;

pub mod check;
pub use check::function::check;

/// Parse a monetary value as printed in Brazilian ledger exports, like `1.234,56`.
///
/// `.` is dropped as thousands separator and `,` becomes the decimal separator.
/// Blank and malformed values count as zero, they never fail. This includes values with more
/// digits than a [`Decimal`] can hold.
pub fn parse_amount(value: &str) -> Decimal {
    let value = value.trim();
    if value.is_empty() {
        return Decimal::ZERO;
    }
    value
        .replace('.', "")
        .replace(',', ".")
        .parse()
        .unwrap_or(Decimal::ZERO)
}

/// Render `amount` as Brazilian currency with two decimal places, like `R$ 1.234,56` or `R$ -10,00`.
pub fn format_brl(amount: Decimal) -> String {
    let amount = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if amount.is_sign_negative() && !amount.is_zero() {
        "-"
    } else {
        ""
    };
    let digits = format!("{:.2}", amount.abs());
    let (integer, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (idx, digit) in integer.chars().enumerate() {
        if idx > 0 && (integer.len() - idx) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }
    format!("R$ {sign}{grouped},{fraction}")
}
