use getset::CopyGetters;
use rust_decimal::Decimal;

use crate::model::{Direction, ReportRow};

/// Credit and debit totals of a report; the balance is derived on demand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct ReportSummary {
    total_credits: Decimal,
    total_debits: Decimal,
    rows: usize,
}

impl ReportSummary {
    pub fn from_rows(rows: &[ReportRow]) -> ReportSummary {
        rows.iter().fold(
            ReportSummary {
                rows: rows.len(),
                ..ReportSummary::default()
            },
            |mut summary, row| {
                match row.direction() {
                    Some(Direction::Credit) => summary.total_credits += row.movement,
                    Some(Direction::Debit) => summary.total_debits += row.movement.abs(),
                    None => {},
                }
                summary
            },
        )
    }

    pub fn balance(&self) -> Decimal {
        self.total_credits - self.total_debits
    }
}
