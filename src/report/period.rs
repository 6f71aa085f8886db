//! The month or year a report covers.

use serde::Deserialize;
use time::{Date, Month};

use crate::{
    filter::{parse_month, parse_year},
    locale::month_name,
    transaction::Transaction,
};

/// The span of time a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportPeriod {
    /// A single calendar month.
    Monthly { year: i32, month: Month },
    /// A whole calendar year.
    Annual { year: i32 },
}

impl ReportPeriod {
    /// The human readable period, e.g. "Januari 2024" or "Tahun 2024".
    pub fn label(&self) -> String {
        match self {
            ReportPeriod::Monthly { year, month } => format!("{} {year}", month_name(*month)),
            ReportPeriod::Annual { year } => format!("Tahun {year}"),
        }
    }

    /// The title printed at the top of the report document.
    pub fn title(&self) -> String {
        format!("Laporan Keuangan {}", self.label())
    }

    pub fn year(&self) -> i32 {
        match self {
            ReportPeriod::Monthly { year, .. } | ReportPeriod::Annual { year } => *year,
        }
    }

    pub fn month(&self) -> Option<Month> {
        match self {
            ReportPeriod::Monthly { month, .. } => Some(*month),
            ReportPeriod::Annual { .. } => None,
        }
    }

    /// Whether `transaction` happened during this period.
    ///
    /// Transactions with an invalid date belong to no period.
    pub fn contains(&self, transaction: &Transaction) -> bool {
        let Some(date) = transaction.date else {
            return false;
        };

        match self {
            ReportPeriod::Monthly { year, month } => date.year() == *year && date.month() == *month,
            ReportPeriod::Annual { year } => date.year() == *year,
        }
    }

    /// The file name of the PDF export, the title with spaces replaced by
    /// underscores, e.g. "Laporan_Keuangan_Januari_2024.pdf".
    pub fn document_file_name(&self) -> String {
        format!("{}.pdf", self.title().replace(' ', "_"))
    }

    /// The file name of the CSV export, e.g. "laporan_januari_2024.csv".
    ///
    /// Only the first space of the label is replaced, so annual reports are
    /// named like "laporan_tahun_2024.csv".
    pub fn delimited_file_name(&self) -> String {
        format!(
            "laporan_{}.csv",
            self.label().replacen(' ', "_", 1).to_lowercase()
        )
    }
}

/// The report selectors: `period` is "monthly" or "annual".
///
/// Missing or invalid values fall back to the current month.
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub period: Option<String>,
    pub year: Option<String>,
    pub month: Option<String>,
}

impl ReportQuery {
    /// The period selected by the query, defaulting to the month of `today`.
    pub fn to_period(&self, today: Date) -> ReportPeriod {
        let year = parse_year(self.year.as_deref()).unwrap_or(today.year());

        if self.period.as_deref().map(str::trim) == Some("annual") {
            return ReportPeriod::Annual { year };
        }

        let month = parse_month(self.month.as_deref())
            .and_then(|month| Month::try_from(month).ok())
            .unwrap_or(today.month());

        ReportPeriod::Monthly { year, month }
    }
}
