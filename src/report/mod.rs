//! Monthly and annual financial reports, viewable in the browser and
//! downloadable as PDF and CSV files.

mod delimited;
mod document;
mod page;
mod period;
mod rows;

pub use page::{export_report_csv, export_report_pdf, get_reports_page};
