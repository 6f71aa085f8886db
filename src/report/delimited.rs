//! Comma separated export of report rows for spreadsheet applications.

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::{
    Error,
    report::rows::{REPORT_COLUMNS, ReportRow},
};

/// Wrap `text` in double quotes, doubling any quotes inside it.
fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

/// Write the header and one line per row, separated by `\n` with no newline
/// at the end.
///
/// The note and resident name are always quoted, other fields never are.
pub fn render_delimited_text(rows: &[ReportRow]) -> Result<String, Error> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(vec![]);

    writer
        .write_record(REPORT_COLUMNS)
        .map_err(|error| Error::ExportError(error.to_string()))?;

    for row in rows {
        let note = quote(&row.note);
        let counterparty_name = quote(&row.counterparty_name);

        writer
            .write_record([
                row.date.as_str(),
                row.kind.as_str(),
                row.payment_category.as_str(),
                note.as_str(),
                counterparty_name.as_str(),
                row.settlement.as_str(),
                row.amount.as_str(),
            ])
            .map_err(|error| Error::ExportError(error.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|error| Error::ExportError(error.to_string()))?;
    let mut text =
        String::from_utf8(bytes).map_err(|error| Error::ExportError(error.to_string()))?;

    if text.ends_with('\n') {
        text.pop();
    }

    Ok(text)
}
