//! Defines the route handler for the page that lists and filters transactions.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    aggregation::sort_by_date_descending,
    endpoints::{self, format_endpoint},
    filter::{TransactionFilter, distinct_years, filter_transactions, parse_month, parse_year},
    html::{
        BADGE_GRAY_STYLE, BADGE_GREEN_STYLE, BADGE_RED_STYLE, BADGE_STYLE, BUTTON_PRIMARY_STYLE,
        FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, edit_delete_action_links,
    },
    locale::{
        MONTHS, PLACEHOLDER, format_long_date, format_signed_rupiah, month_name, truncate_text,
    },
    navigation::NavBar,
    timezone::get_local_date,
    transaction::core::{SettlementStatus, Transaction, TransactionKind, get_all_transactions},
};

/// Notes longer than this are shortened in the table.
const NOTE_PREVIEW_LENGTH: usize = 32;

/// The state needed for the transactions page.
#[derive(Debug, Clone)]
pub struct TransactionsPageState {
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Jakarta".
    pub local_timezone: String,
}

impl FromRef<AppState> for TransactionsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The filter controls of the transactions page.
///
/// Values that are empty, "all" or cannot be parsed match every transaction.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionsQuery {
    pub search: Option<String>,
    pub year: Option<String>,
    pub month: Option<String>,
    pub kind: Option<String>,
}

impl TransactionsQuery {
    fn to_filter(&self) -> TransactionFilter {
        TransactionFilter {
            search_term: self.search.clone().unwrap_or_default(),
            year: parse_year(self.year.as_deref()),
            month: parse_month(self.month.as_deref()),
            kind: self.kind.as_deref().and_then(TransactionKind::from_key),
        }
    }
}

/// Render the list of transactions that match the query, newest first.
pub async fn get_transactions_page(
    State(state): State<TransactionsPageState>,
    Query(query): Query<TransactionsQuery>,
) -> Result<Response, Error> {
    let today = get_local_date(&state.local_timezone)
        .inspect_err(|error| tracing::error!("could not get today's date: {error}"))?;

    let transactions = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_all_transactions(&connection)
            .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?
    };

    let filter = query.to_filter();
    let mut filtered = filter_transactions(&transactions, &filter);
    sort_by_date_descending(&mut filtered);
    let years = distinct_years(&transactions, today.year());

    Ok(transactions_view(&filtered, transactions.len(), &filter, &years).into_response())
}

fn kind_badge(kind: TransactionKind) -> Markup {
    let color = match kind {
        TransactionKind::Income => BADGE_GREEN_STYLE,
        TransactionKind::Expense => BADGE_RED_STYLE,
    };

    html!(span class={(BADGE_STYLE) " " (color)} { (kind.label()) })
}

fn settlement_badge(settlement: SettlementStatus) -> Markup {
    let color = match settlement {
        SettlementStatus::Settled => BADGE_GREEN_STYLE,
        SettlementStatus::Unsettled => BADGE_GRAY_STYLE,
    };

    html!(span class={(BADGE_STYLE) " " (color)} { (settlement.label()) })
}

fn amount_class(kind: TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Income => "font-semibold text-green-600 dark:text-green-400",
        TransactionKind::Expense => "font-semibold text-red-600 dark:text-red-400",
    }
}

fn transaction_row(transaction: &Transaction) -> Markup {
    let edit_url = format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id);
    let delete_url = format_endpoint(endpoints::TRANSACTION, transaction.id);
    let confirm_message = format!(
        "Yakin ingin menghapus transaksi \"{}\"?",
        truncate_text(&transaction.note, NOTE_PREVIEW_LENGTH)
    );
    let counterparty = if transaction.counterparty_name.trim().is_empty() {
        PLACEHOLDER
    } else {
        &transaction.counterparty_name
    };

    html!(
        tr class=(TABLE_ROW_STYLE) data-transaction-row="true"
        {
            td class=(TABLE_CELL_STYLE) { (format_long_date(transaction.date)) }
            td class=(TABLE_CELL_STYLE) { (kind_badge(transaction.kind)) }
            td class=(TABLE_CELL_STYLE) { (transaction.payment_category.label()) }
            td class=(TABLE_CELL_STYLE) { (counterparty) }
            td class=(TABLE_CELL_STYLE) title=(transaction.note)
            {
                (truncate_text(&transaction.note, NOTE_PREVIEW_LENGTH))
            }
            td class={(TABLE_CELL_STYLE) " " (amount_class(transaction.kind))}
            {
                (format_signed_rupiah(transaction.amount, transaction.is_income()))
            }
            td class=(TABLE_CELL_STYLE) { (settlement_badge(transaction.settlement)) }
            td class=(TABLE_CELL_STYLE)
            {
                div class="flex gap-4"
                {
                    (edit_delete_action_links(&edit_url, &delete_url, &confirm_message))
                }
            }
        }
    )
}

fn filter_form(filter: &TransactionFilter, years: &[i32]) -> Markup {
    html!(
        form
            method="get"
            action=(endpoints::TRANSACTIONS_VIEW)
            class="grid grid-cols-1 gap-4 md:grid-cols-4 items-end w-full"
        {
            div
            {
                label for="search" class=(FORM_LABEL_STYLE) { "Cari" }
                input
                    type="search"
                    name="search"
                    id="search"
                    placeholder="Cari nama warga atau keterangan..."
                    value=(filter.search_term)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="year" class=(FORM_LABEL_STYLE) { "Tahun" }
                select name="year" id="year" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" { "Semua Tahun" }
                    @for year in years {
                        option value=(year) selected[filter.year == Some(*year)] { (year) }
                    }
                }
            }

            div
            {
                label for="month" class=(FORM_LABEL_STYLE) { "Bulan" }
                select name="month" id="month" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" { "Semua Bulan" }
                    @for month in MONTHS {
                        @let number = u8::from(month);
                        option value=(number) selected[filter.month == Some(number)]
                        {
                            (month_name(month))
                        }
                    }
                }
            }

            div
            {
                label for="kind" class=(FORM_LABEL_STYLE) { "Jenis" }
                select name="kind" id="kind" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" { "Semua Jenis" }
                    @for kind in [TransactionKind::Income, TransactionKind::Expense] {
                        option value=(kind.key()) selected[filter.kind == Some(kind)]
                        {
                            (kind.label())
                        }
                    }
                }
            }

            div class="md:col-span-4 flex flex-wrap gap-4 items-center"
            {
                div class="w-40"
                {
                    button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Terapkan" }
                }

                a href=(endpoints::TRANSACTIONS_VIEW) class=(LINK_STYLE) { "Reset Semua Filter" }
            }
        }
    )
}

fn transactions_view(
    transactions: &[Transaction],
    total_count: usize,
    filter: &TransactionFilter,
    years: &[i32],
) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-6xl"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Transaksi" }

                    a href=(endpoints::NEW_TRANSACTION_VIEW) class=(LINK_STYLE)
                    {
                        "Tambah Transaksi"
                    }
                }

                (filter_form(filter, years))

                p id="transaction-count" class="text-sm text-gray-600 dark:text-gray-400"
                {
                    "Menampilkan " (transactions.len()) " dari " (total_count) " transaksi"
                }

                div class="overflow-x-auto dark:bg-gray-800"
                {
                    table class="w-full text-sm text-left rtl:text-right
                        text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                @for heading in ["Tanggal", "Jenis", "Tipe Pembayaran", "Nama Warga", "Keterangan", "Jumlah", "Status", "Aksi"] {
                                    th scope="col" class=(TABLE_CELL_STYLE) { (heading) }
                                }
                            }
                        }

                        tbody
                        {
                            @for transaction in transactions {
                                (transaction_row(transaction))
                            }

                            @if transactions.is_empty() {
                                tr
                                {
                                    td
                                        colspan="8"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        "Tidak ada transaksi yang cocok dengan filter."
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Transaksi", &[], &content)
}
