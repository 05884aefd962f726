//! Maps a `ViewState` onto what the transaction list screen shows.

use crate::format::{amount_color, format_amount_with_sign};
use crate::model::{Transaction, TransactionFilter};
use crate::view_model::ViewState;
use serde::Serialize;
use std::fmt::{Display, Formatter};

pub const LOADING_MESSAGE: &str = "Loading transactions...";
pub const EMPTY_MESSAGE: &str = "No transactions available";

/// One line of the transaction list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    pub id: String,
    pub merchant: String,
    /// `category • date`
    pub subtitle: String,
    /// The amount with its sign, e.g. `-$6.75`.
    pub amount: String,
    pub color: &'static str,
}

impl From<&Transaction> for Row {
    fn from(t: &Transaction) -> Self {
        Self {
            id: t.id().to_string(),
            merchant: t.merchant().to_string(),
            subtitle: format!("{} • {}", t.category(), t.date().to_short_string()),
            amount: format_amount_with_sign(t.amount().value(), t.kind()),
            color: amount_color(t.kind()),
        }
    }
}

/// The screen body. Loading takes precedence over an error, and an error over an empty list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "screen", content = "data", rename_all = "snake_case")]
pub enum Screen {
    Loading,
    Error(String),
    Empty,
    List(Vec<Row>),
}

impl From<&ViewState> for Screen {
    fn from(state: &ViewState) -> Self {
        if state.is_loading() {
            return Screen::Loading;
        }
        if let Some(error) = state.error() {
            return Screen::Error(error.to_string());
        }
        if state.filtered_transactions().is_empty() {
            return Screen::Empty;
        }
        Screen::List(state.filtered_transactions().iter().map(Row::from).collect())
    }
}

impl Display for Screen {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Screen::Loading => write!(f, "{LOADING_MESSAGE}"),
            Screen::Error(message) => write!(f, "Error: {message}"),
            Screen::Empty => write!(f, "{EMPTY_MESSAGE}"),
            Screen::List(rows) => {
                let merchant_width = rows
                    .iter()
                    .map(|r| r.merchant.chars().count())
                    .max()
                    .unwrap_or_default();
                let subtitle_width = rows
                    .iter()
                    .map(|r| r.subtitle.chars().count())
                    .max()
                    .unwrap_or_default();
                for (ix, row) in rows.iter().enumerate() {
                    if ix > 0 {
                        writeln!(f)?;
                    }
                    write!(
                        f,
                        "{:<merchant_width$}  {:<subtitle_width$}  {:>12}",
                        row.merchant, row.subtitle, row.amount
                    )?;
                }
                Ok(())
            }
        }
    }
}

/// The filter bar, with the active filter in brackets: `[All] Income Expenses`.
pub fn filter_bar(active: TransactionFilter) -> String {
    TransactionFilter::ALL
        .iter()
        .map(|filter| {
            if *filter == active {
                format!("[{}]", filter.label())
            } else {
                filter.label().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TransactionType;
    use crate::test::txn;

    #[test]
    fn test_row_from_transaction() {
        let row = Row::from(&txn("7", "Blue Bottle Coffee", "6.75", TransactionType::Expense));
        assert_eq!(row.id, "7");
        assert_eq!(row.subtitle, "Misc • Jan 15, 2024");
        assert_eq!(row.amount, "-$6.75");
        assert_eq!(row.color, "#EF4444");

        let row = Row::from(&txn("8", "Payroll", "4250", TransactionType::Income));
        assert_eq!(row.amount, "+$4,250.00");
        assert_eq!(row.color, "#10B981");
    }

    #[test]
    fn test_default_state_is_empty() {
        // Idle, before any fetch has started
        let screen = Screen::from(&ViewState::default());
        assert_eq!(screen, Screen::Empty);
        assert_eq!(screen.to_string(), "No transactions available");
    }

    #[test]
    fn test_messages() {
        assert_eq!(Screen::Loading.to_string(), "Loading transactions...");
        assert_eq!(
            Screen::Error("Failed to fetch transactions".into()).to_string(),
            "Error: Failed to fetch transactions"
        );
    }

    #[test]
    fn test_list_rendering_aligns_columns() {
        let screen = Screen::List(vec![
            Row::from(&txn("1", "Shell", "52.30", TransactionType::Expense)),
            Row::from(&txn("2", "Acme Payroll", "4250", TransactionType::Income)),
        ]);
        let rendered = screen.to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Shell         Misc"), "{rendered}");
        assert!(lines[0].ends_with("-$52.30"), "{rendered}");
        assert!(lines[1].ends_with("+$4,250.00"), "{rendered}");
        assert_eq!(lines[0].chars().count(), lines[1].chars().count());
    }

    #[test]
    fn test_filter_bar() {
        assert_eq!(filter_bar(TransactionFilter::All), "[All] Income Expenses");
        assert_eq!(
            filter_bar(TransactionFilter::Expense),
            "All Income [Expenses]"
        );
    }
}
