//! The reports page and the PDF and CSV downloads of the selected period.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    filter::distinct_years,
    html::{
        BUTTON_PRIMARY_STYLE, CARD_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE,
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
    },
    locale::{MONTHS, format_rupiah, month_name},
    navigation::NavBar,
    report::{
        delimited::render_delimited_text,
        document::render_document,
        period::{ReportPeriod, ReportQuery},
        rows::{REPORT_COLUMNS, ReportRow, ReportSummary, build_report_rows},
    },
    timezone::get_local_date,
    transaction::{Transaction, get_all_transactions},
};

/// The state needed for the reports page and its downloads.
#[derive(Debug, Clone)]
pub struct ReportState {
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Jakarta".
    pub local_timezone: String,
}

impl FromRef<AppState> for ReportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The transactions of the selected period, together with the period and
/// the years that can be selected.
struct ReportData {
    period: ReportPeriod,
    transactions: Vec<Transaction>,
    years: Vec<i32>,
}

fn load_report(state: &ReportState, query: &ReportQuery) -> Result<ReportData, Error> {
    let today = get_local_date(&state.local_timezone)
        .inspect_err(|error| tracing::error!("could not get today's date: {error}"))?;
    let period = query.to_period(today);

    let all_transactions = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_all_transactions(&connection)
            .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?
    };

    let mut years = distinct_years(&all_transactions, today.year());
    if !years.contains(&period.year()) {
        years.push(period.year());
        years.sort_unstable_by(|a, b| b.cmp(a));
    }

    let transactions = all_transactions
        .into_iter()
        .filter(|transaction| period.contains(transaction))
        .collect();

    Ok(ReportData {
        period,
        transactions,
        years,
    })
}

/// A report rendered as a file for the browser to download.
struct ExportFile {
    content_type: &'static str,
    file_name: String,
    body: Vec<u8>,
}

impl IntoResponse for ExportFile {
    fn into_response(self) -> Response {
        let disposition = format!("attachment; filename=\"{}\"", self.file_name);

        match HeaderValue::from_str(&disposition) {
            Ok(disposition) => (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, HeaderValue::from_static(self.content_type)),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                self.body,
            )
                .into_response(),
            Err(error) => {
                tracing::error!("invalid file name {}: {error}", self.file_name);
                Error::ExportError(error.to_string()).into_response()
            }
        }
    }
}

/// Download the report of the selected period as a PDF document.
pub async fn export_report_pdf(
    State(state): State<ReportState>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, Error> {
    let report = load_report(&state, &query)?;
    let rows = build_report_rows(&report.transactions);
    let summary = ReportSummary::from_transactions(&report.transactions);

    let body = render_document(&rows, &report.period.title(), &summary);
    tracing::info!(
        "Exported {} transactions for {} as PDF",
        rows.len(),
        report.period.label()
    );

    Ok(ExportFile {
        content_type: "application/pdf",
        file_name: report.period.document_file_name(),
        body,
    }
    .into_response())
}

/// Download the report of the selected period as comma separated values.
pub async fn export_report_csv(
    State(state): State<ReportState>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, Error> {
    let report = load_report(&state, &query)?;
    let rows = build_report_rows(&report.transactions);

    let body = render_delimited_text(&rows)
        .inspect_err(|error| tracing::error!("could not export CSV: {error}"))?;
    tracing::info!(
        "Exported {} transactions for {} as CSV",
        rows.len(),
        report.period.label()
    );

    Ok(ExportFile {
        content_type: "text/csv; charset=utf-8",
        file_name: report.period.delimited_file_name(),
        body: body.into_bytes(),
    }
    .into_response())
}

/// Render the summary and detailed list of transactions for the selected period.
pub async fn get_reports_page(
    State(state): State<ReportState>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, Error> {
    let report = load_report(&state, &query)?;
    let rows = build_report_rows(&report.transactions);
    let summary = ReportSummary::from_transactions(&report.transactions);

    Ok(reports_view(&report.period, &report.years, &rows, &summary).into_response())
}

/// The query string that selects `period`, shared by the download links.
fn period_query(period: &ReportPeriod) -> String {
    let year = period.year().to_string();
    let mut pairs = vec![
        (
            "period",
            match period {
                ReportPeriod::Monthly { .. } => "monthly".to_owned(),
                ReportPeriod::Annual { .. } => "annual".to_owned(),
            },
        ),
        ("year", year),
    ];

    if let Some(month) = period.month() {
        pairs.push(("month", u8::from(month).to_string()));
    }

    serde_urlencoded::to_string(pairs).unwrap_or_default()
}

fn period_form(period: &ReportPeriod, years: &[i32]) -> Markup {
    let is_annual = matches!(period, ReportPeriod::Annual { .. });
    let selected_month = period.month();

    html!(
        form
            method="get"
            action=(endpoints::REPORTS_VIEW)
            class="grid grid-cols-1 gap-4 md:grid-cols-4 items-end w-full"
        {
            div
            {
                label for="period" class=(FORM_LABEL_STYLE) { "Periode" }
                select name="period" id="period" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="monthly" selected[!is_annual] { "Bulanan" }
                    option value="annual" selected[is_annual] { "Tahunan" }
                }
            }

            div
            {
                label for="month" class=(FORM_LABEL_STYLE) { "Bulan" }
                select name="month" id="month" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for month in MONTHS {
                        option value=(u8::from(month)) selected[selected_month == Some(month)]
                        {
                            (month_name(month))
                        }
                    }
                }
            }

            div
            {
                label for="year" class=(FORM_LABEL_STYLE) { "Tahun" }
                select name="year" id="year" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for year in years {
                        option value=(year) selected[*year == period.year()] { (year) }
                    }
                }
            }

            div
            {
                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Tampilkan" }
            }
        }
    )
}

fn summary_card(id: &str, title: &str, value: &str, description: &str) -> Markup {
    html!(
        div id=(id) class=(CARD_STYLE)
        {
            p class="text-sm font-medium text-gray-600 dark:text-gray-400" { (title) }
            p data-value class="text-2xl font-bold" { (value) }
            p class="text-xs text-gray-500 dark:text-gray-400" { (description) }
        }
    )
}

fn report_row(row: &ReportRow) -> Markup {
    html!(
        tr class=(TABLE_ROW_STYLE) data-report-row="true"
        {
            @for (index, cell) in row.cells().into_iter().enumerate() {
                @if index == 6 {
                    td class={(TABLE_CELL_STYLE) " text-right font-semibold"} { (cell) }
                } @else {
                    td class=(TABLE_CELL_STYLE) { (cell) }
                }
            }
        }
    )
}

fn reports_view(
    period: &ReportPeriod,
    years: &[i32],
    rows: &[ReportRow],
    summary: &ReportSummary,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::REPORTS_VIEW).into_html();
    let label = period.label();
    let query = period_query(period);
    let pdf_url = format!("{}?{query}", endpoints::REPORT_PDF);
    let csv_url = format!("{}?{query}", endpoints::REPORT_CSV);
    let totals = summary.totals;

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-6 w-full lg:max-w-6xl"
            {
                header
                {
                    h1 class="text-xl font-bold" { "Laporan Keuangan" }
                    p class="text-sm text-gray-600 dark:text-gray-400"
                    {
                        "Laporan transparan keuangan RT 06"
                    }
                }

                (period_form(period, years))

                div class="grid grid-cols-1 gap-4 md:grid-cols-2 lg:grid-cols-4"
                {
                    (summary_card(
                        "income-summary",
                        "Total Pemasukan",
                        &format_rupiah(totals.income),
                        &format!("{} transaksi", summary.income_count),
                    ))
                    (summary_card(
                        "expense-summary",
                        "Total Pengeluaran",
                        &format_rupiah(totals.expense),
                        &format!("{} transaksi", summary.expense_count),
                    ))
                    (summary_card(
                        "balance-summary",
                        "Saldo Akhir",
                        &format_rupiah(totals.balance),
                        summary.balance_description(),
                    ))
                    (summary_card(
                        "count-summary",
                        "Total Transaksi",
                        &summary.transaction_count.to_string(),
                        &format!("Transaksi untuk {label}"),
                    ))
                }

                div class=(CARD_STYLE)
                {
                    div class="flex flex-wrap justify-between items-center gap-4 mb-4"
                    {
                        div
                        {
                            h2 class="text-lg font-semibold" { "Laporan Detail - " (label) }
                            p class="text-sm text-gray-600 dark:text-gray-400" { "Periode: " (label) }
                        }

                        div class="flex gap-4"
                        {
                            a id="export-pdf" href=(pdf_url) class=(LINK_STYLE) download { "Export PDF" }
                            a id="export-csv" href=(csv_url) class=(LINK_STYLE) download { "Export CSV (Excel)" }
                        }
                    }

                    @if rows.is_empty() {
                        p class="py-8 text-center text-gray-500 dark:text-gray-400"
                        {
                            "Tidak ada transaksi pada periode ini"
                        }
                    } @else {
                        div class="overflow-x-auto"
                        {
                            table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                            {
                                thead class=(TABLE_HEADER_STYLE)
                                {
                                    tr
                                    {
                                        @for heading in REPORT_COLUMNS {
                                            th scope="col" class=(TABLE_CELL_STYLE) { (heading) }
                                        }
                                    }
                                }

                                tbody
                                {
                                    @for row in rows {
                                        (report_row(row))
                                    }
                                }

                                tfoot
                                {
                                    tr class="font-semibold text-gray-900 dark:text-white"
                                    {
                                        td colspan="6" class={(TABLE_CELL_STYLE) " text-right"} { "Total Saldo" }
                                        td id="report-balance" class={(TABLE_CELL_STYLE) " text-right"}
                                        {
                                            (format_rupiah(totals.balance))
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Laporan", &[], &content)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Query, State},
        http::StatusCode,
    };
    use rusqlite::Connection;
    use scraper::{Html, Selector};
    use time::{Date, macros::date};

    use crate::{
        db::initialize,
        report::period::ReportQuery,
        test_utils::{
            assert_content_type, assert_status_ok, assert_valid_html, get_header,
            parse_html_document,
        },
        transaction::{
            NewTransaction, PaymentCategory, SettlementStatus, TransactionKind, create_transaction,
        },
    };

    use super::{ReportState, export_report_csv, export_report_pdf, get_reports_page};

    fn get_test_state() -> ReportState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        ReportState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: "Asia/Jakarta".to_owned(),
        }
    }

    fn add(state: &ReportState, kind: TransactionKind, amount: i64, note: &str, date: Date) {
        create_transaction(
            &NewTransaction {
                kind,
                payment_category: PaymentCategory::MonthlyDues,
                amount,
                date,
                counterparty_name: "Budi".to_owned(),
                note: note.to_owned(),
                settlement: SettlementStatus::Settled,
            },
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();
    }

    fn seeded_state() -> ReportState {
        let state = get_test_state();
        add(&state, TransactionKind::Income, 100_000, "Iuran Januari", date!(2024 - 01 - 10));
        add(&state, TransactionKind::Expense, 40_000, "Beli alat", date!(2024 - 01 - 15));
        add(&state, TransactionKind::Income, 75_000, "Iuran Februari", date!(2024 - 02 - 10));
        state
    }

    fn monthly(year: &str, month: &str) -> ReportQuery {
        ReportQuery {
            period: Some("monthly".to_owned()),
            year: Some(year.to_owned()),
            month: Some(month.to_owned()),
        }
    }

    fn card_value(document: &Html, id: &str) -> String {
        let selector = Selector::parse(&format!("#{id} [data-value]")).unwrap();

        document
            .select(&selector)
            .next()
            .unwrap_or_else(|| panic!("no card {id}"))
            .text()
            .collect()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        String::from_utf8_lossy(&body).to_string()
    }

    #[tokio::test]
    async fn monthly_report_summarises_period() {
        let response = get_reports_page(State(seeded_state()), Query(monthly("2024", "1")))
            .await
            .unwrap();

        assert_status_ok(&response);
        let document = parse_html_document(response).await;
        assert_valid_html(&document);
        assert_eq!(card_value(&document, "income-summary"), "Rp\u{a0}100.000");
        assert_eq!(card_value(&document, "expense-summary"), "Rp\u{a0}40.000");
        assert_eq!(card_value(&document, "balance-summary"), "Rp\u{a0}60.000");
        assert_eq!(card_value(&document, "count-summary"), "2");

        let rows = Selector::parse("tr[data-report-row]").unwrap();
        assert_eq!(document.select(&rows).count(), 2);

        let pdf_link = Selector::parse("#export-pdf").unwrap();
        let href = document
            .select(&pdf_link)
            .next()
            .and_then(|link| link.value().attr("href"))
            .unwrap();
        assert_eq!(href, "/reports/export.pdf?period=monthly&year=2024&month=1");
    }

    #[tokio::test]
    async fn annual_report_covers_whole_year() {
        let query = ReportQuery {
            period: Some("annual".to_owned()),
            year: Some("2024".to_owned()),
            month: None,
        };

        let response = get_reports_page(State(seeded_state()), Query(query))
            .await
            .unwrap();

        let document = parse_html_document(response).await;
        assert_eq!(card_value(&document, "income-summary"), "Rp\u{a0}175.000");
        assert_eq!(card_value(&document, "count-summary"), "3");
    }

    #[tokio::test]
    async fn empty_period_shows_message() {
        let response = get_reports_page(State(seeded_state()), Query(monthly("2023", "5")))
            .await
            .unwrap();

        let document = parse_html_document(response).await;
        let text = document.root_element().text().collect::<String>();
        assert!(text.contains("Tidak ada transaksi pada periode ini"));
        assert!(text.contains("Surplus"));
    }

    #[tokio::test]
    async fn exports_pdf_download() {
        let response = export_report_pdf(State(seeded_state()), Query(monthly("2024", "1")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_content_type(&response, "application/pdf");
        assert_eq!(
            get_header(&response, "content-disposition"),
            "attachment; filename=\"Laporan_Keuangan_Januari_2024.pdf\""
        );
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(body.starts_with(b"%PDF-"));
    }

    #[tokio::test]
    async fn exports_csv_download() {
        let response = export_report_csv(State(seeded_state()), Query(monthly("2024", "1")))
            .await
            .unwrap();

        assert_content_type(&response, "text/csv; charset=utf-8");
        assert_eq!(
            get_header(&response, "content-disposition"),
            "attachment; filename=\"laporan_januari_2024.csv\""
        );
        let text = body_text(response).await;
        assert_eq!(text.lines().count(), 3);
        assert!(text.contains("\"Iuran Januari\""));
    }

    #[tokio::test]
    async fn empty_csv_export_is_header_only() {
        let response = export_report_csv(State(seeded_state()), Query(monthly("2023", "5")))
            .await
            .unwrap();

        let text = body_text(response).await;
        assert_eq!(
            text,
            "Tanggal,Jenis,Tipe Pembayaran,Keterangan,Nama Warga,Status,Jumlah"
        );
    }
}
