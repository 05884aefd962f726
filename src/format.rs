//! Display helpers for transaction rows. All of these are pure.

use crate::model::{DateError, TransactionType, TxnDate};
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

pub const INCOME_COLOR: &str = "#10B981";
pub const EXPENSE_COLOR: &str = "#EF4444";

/// Formats the absolute value of `amount` as US dollars with thousands separators and exactly two
/// decimals, e.g. `$1,234.56`. Half a cent rounds away from zero.
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount
        .abs()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let fixed = format!("{rounded:.2}");
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    format!("${}.{cents}", group_thousands(whole))
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (ix, c) in digits.chars().enumerate() {
        if ix > 0 && (digits.len() - ix) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Formats a date string as `Mon D, YYYY`, e.g. `Jan 15, 2024`.
pub fn format_date(date: &str) -> Result<String, DateError> {
    Ok(TxnDate::from_str(date)?.to_short_string())
}

/// The colour an amount is drawn in.
pub fn amount_color(kind: TransactionType) -> &'static str {
    match kind {
        TransactionType::Income => INCOME_COLOR,
        TransactionType::Expense => EXPENSE_COLOR,
    }
}

/// `+$12.00` for income and `-$12.00` for an expense.
pub fn format_amount_with_sign(amount: Decimal, kind: TransactionType) -> String {
    let sign = match kind {
        TransactionType::Income => '+',
        TransactionType::Expense => '-',
    };
    format!("{sign}{}", format_currency(amount))
}
