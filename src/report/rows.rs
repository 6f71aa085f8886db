//! Turning transactions into the rows and summary shown in reports.

use crate::{
    aggregation::{Totals, compute_totals},
    locale::{PLACEHOLDER, format_short_date, format_signed_rupiah},
    transaction::{Transaction, TransactionKind},
};

/// The column headings shared by every report format.
pub const REPORT_COLUMNS: [&str; 7] = [
    "Tanggal",
    "Jenis",
    "Tipe Pembayaran",
    "Keterangan",
    "Nama Warga",
    "Status",
    "Jumlah",
];

/// A transaction formatted for display, one field per column of [REPORT_COLUMNS].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub date: String,
    pub kind: String,
    pub payment_category: String,
    pub note: String,
    pub counterparty_name: String,
    pub settlement: String,
    pub amount: String,
}

impl ReportRow {
    pub fn cells(&self) -> [&str; 7] {
        [
            &self.date,
            &self.kind,
            &self.payment_category,
            &self.note,
            &self.counterparty_name,
            &self.settlement,
            &self.amount,
        ]
    }
}

fn or_placeholder(text: &str) -> String {
    let text = text.trim();

    if text.is_empty() {
        PLACEHOLDER.to_owned()
    } else {
        text.to_owned()
    }
}

/// Format each transaction as a report row, keeping their order.
pub fn build_report_rows(transactions: &[Transaction]) -> Vec<ReportRow> {
    transactions
        .iter()
        .map(|transaction| ReportRow {
            date: format_short_date(transaction.date),
            kind: transaction.kind.label().to_owned(),
            payment_category: transaction.payment_category.label(),
            note: or_placeholder(&transaction.note),
            counterparty_name: or_placeholder(&transaction.counterparty_name),
            settlement: transaction.settlement.label(),
            amount: format_signed_rupiah(transaction.amount, transaction.is_income()),
        })
        .collect()
}

/// The figures printed above a report's table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportSummary {
    pub totals: Totals,
    pub income_count: usize,
    pub expense_count: usize,
    pub transaction_count: usize,
}

impl ReportSummary {
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let count_kind = |kind: TransactionKind| {
            transactions
                .iter()
                .filter(|transaction| transaction.kind == kind)
                .count()
        };

        Self {
            totals: compute_totals(transactions, |_| true),
            income_count: count_kind(TransactionKind::Income),
            expense_count: count_kind(TransactionKind::Expense),
            transaction_count: transactions.len(),
        }
    }

    /// "Surplus" when the balance is not negative, otherwise "Defisit".
    pub fn balance_description(&self) -> &'static str {
        if self.totals.balance >= 0 {
            "Surplus"
        } else {
            "Defisit"
        }
    }
}
