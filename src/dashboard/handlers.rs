//! Dashboard HTTP handler and view rendering.
//!
//! This module contains:
//! - The route handler for displaying the dashboard
//! - HTML view functions for the filters, recent transactions and quick actions
//! - State and query types used by the handler

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::{Date, Month};

use crate::{
    AppState, Error,
    aggregation::{
        MonthlyBucket, Totals, compute_growth, compute_monthly_series, compute_totals,
        recent_activity,
    },
    dashboard::{cards::summary_cards, chart::monthly_chart},
    endpoints,
    filter::{TransactionFilter, distinct_years, parse_month, parse_year},
    html::{BUTTON_PRIMARY_STYLE, CARD_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE, base},
    locale::{MONTHS, format_full_date, format_long_date, format_signed_rupiah, short_month_name},
    navigation::NavBar,
    timezone::get_local_date,
    transaction::{Transaction, TransactionKind, get_all_transactions},
    user::count_users,
};

/// How many transactions the recent activity list shows.
const RECENT_TRANSACTION_COUNT: usize = 4;

/// The state needed for displaying the dashboard page.
///
/// Contains the database connection and timezone information required
/// by the dashboard handler.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading transactions and users.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Jakarta".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The year and month selectors of the dashboard.
///
/// "all", an empty value or anything unparseable selects every year or month.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// The selected year, e.g. "2024".
    pub year: Option<String>,
    /// The selected 1-based month, e.g. "3" for March.
    pub month: Option<String>,
}

/// Holds all the data needed to render the dashboard.
struct DashboardData {
    today: Date,
    years: Vec<i32>,
    filter: TransactionFilter,
    totals: Totals,
    income_growth: f64,
    expense_growth: f64,
    user_count: usize,
    series: [MonthlyBucket; 12],
    recent: Vec<Transaction>,
}

/// Display a page with an overview of the neighbourhood's finances.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, Error> {
    let today = get_local_date(&state.local_timezone)
        .inspect_err(|error| tracing::error!("could not get today's date: {error}"))?;

    let (transactions, user_count) = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        let transactions = get_all_transactions(&connection)
            .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;
        let user_count = count_users(&connection)
            .inspect_err(|error| tracing::error!("could not count users: {error}"))?;

        (transactions, user_count)
    };

    let data = build_dashboard_data(&transactions, user_count, &query, today);

    Ok(dashboard_view(&data).into_response())
}

/// Computes every figure shown on the dashboard.
///
/// # Arguments
/// * `transactions` - Every transaction in the ledger
/// * `user_count` - The number of registered users
/// * `query` - The year and month selected by the user
/// * `today` - The current local date, used for the growth figures
fn build_dashboard_data(
    transactions: &[Transaction],
    user_count: usize,
    query: &DashboardQuery,
    today: Date,
) -> DashboardData {
    let filter = TransactionFilter {
        year: parse_year(query.year.as_deref()),
        month: parse_month(query.month.as_deref()),
        ..Default::default()
    };
    let selected_month = filter.month.and_then(|month| Month::try_from(month).ok());

    let totals = compute_totals(transactions, |transaction| filter.matches(transaction));
    let filtered = transactions
        .iter()
        .filter(|transaction| filter.matches(transaction))
        .cloned()
        .collect::<Vec<_>>();

    // Growth always compares the current month with the one before it,
    // whatever the filter.
    let income_growth = compute_growth(
        transactions,
        TransactionKind::Income,
        today.month(),
        today.year(),
    );
    let expense_growth = compute_growth(
        transactions,
        TransactionKind::Expense,
        today.month(),
        today.year(),
    );

    DashboardData {
        today,
        years: distinct_years(transactions, today.year()),
        totals,
        income_growth,
        expense_growth,
        user_count,
        series: compute_monthly_series(transactions, filter.year, selected_month),
        recent: recent_activity(&filtered, RECENT_TRANSACTION_COUNT),
        filter,
    }
}

fn filter_form(filter: &TransactionFilter, years: &[i32]) -> Markup {
    html! {
        form
            method="get"
            action=(endpoints::DASHBOARD_VIEW)
            class="flex flex-wrap items-center gap-2"
        {
            select name="year" aria-label="Tahun" class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="all" selected[filter.year.is_none()] { "Semua Tahun" }
                @for year in years {
                    option value=(year) selected[filter.year == Some(*year)] { (year) }
                }
            }

            select name="month" aria-label="Bulan" class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="all" selected[filter.month.is_none()] { "Semua Bulan" }
                @for month in MONTHS {
                    @let number = u8::from(month);
                    option value=(number) selected[filter.month == Some(number)]
                    {
                        (short_month_name(month))
                    }
                }
            }

            div class="w-24"
            {
                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Terapkan" }
            }
        }
    }
}

fn recent_transactions(transactions: &[Transaction]) -> Markup {
    html! {
        section id="recent-transactions" class=(CARD_STYLE)
        {
            div class="flex justify-between items-center mb-6"
            {
                h3 class="text-lg font-semibold" { "Transaksi Terbaru" }
                a href=(endpoints::TRANSACTIONS_VIEW) class=(LINK_STYLE) { "Lihat Semua" }
            }

            @if transactions.is_empty() {
                p class="py-4 text-sm text-center text-gray-500" { "Belum ada transaksi." }
            } @else {
                ul class="space-y-4"
                {
                    @for transaction in transactions {
                        @let amount_class = if transaction.is_income() {
                            "font-semibold text-green-600 dark:text-green-400"
                        } else {
                            "font-semibold text-red-600 dark:text-red-400"
                        };

                        li
                            data-recent-transaction
                            class="flex justify-between items-center p-3 rounded-lg bg-gray-50 dark:bg-gray-700"
                        {
                            div
                            {
                                p class="text-sm font-medium" { (transaction.note) }
                                p class="text-xs text-gray-500 dark:text-gray-400"
                                {
                                    (format_long_date(transaction.date))
                                }
                            }

                            span class=(amount_class)
                            {
                                (format_signed_rupiah(transaction.amount, transaction.is_income()))
                            }
                        }
                    }
                }
            }
        }
    }
}

fn quick_actions() -> Markup {
    let new_income_url = format!(
        "{}?kind={}",
        endpoints::NEW_TRANSACTION_VIEW,
        TransactionKind::Income.key()
    );
    let new_expense_url = format!(
        "{}?kind={}",
        endpoints::NEW_TRANSACTION_VIEW,
        TransactionKind::Expense.key()
    );
    let action_style = "flex items-center justify-center p-4 rounded-lg text-sm font-medium";

    html! {
        section id="quick-actions" class={(CARD_STYLE) " w-full"}
        {
            h3 class="text-lg font-semibold mb-4" { "Aksi Cepat" }

            div class="grid grid-cols-2 md:grid-cols-4 gap-4"
            {
                a href=(new_income_url) class={(action_style) " bg-green-600 hover:bg-green-700 text-white"}
                {
                    "Tambah Pemasukan"
                }
                a href=(new_expense_url) class={(action_style) " bg-red-600 hover:bg-red-700 text-white"}
                {
                    "Tambah Pengeluaran"
                }
                a href=(endpoints::REPORTS_VIEW) class={(action_style) " border border-gray-300 hover:bg-gray-100 dark:hover:bg-gray-700"}
                {
                    "Lihat Laporan"
                }
                a href=(endpoints::USERS_VIEW) class={(action_style) " border border-gray-300 hover:bg-gray-100 dark:hover:bg-gray-700"}
                {
                    "Kelola Pengguna"
                }
            }
        }
    }
}

/// Renders the main dashboard page.
fn dashboard_view(data: &DashboardData) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class="flex flex-col items-center gap-6 px-2 lg:px-6 py-4 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            header class="flex flex-col sm:flex-row sm:justify-between sm:items-center gap-4 w-full"
            {
                div
                {
                    h1 class="text-2xl font-bold" { "Dashboard" }
                    p class="text-sm text-gray-600 dark:text-gray-400" { "Ringkasan keuangan RT 06" }
                }

                div class="flex flex-col items-start sm:items-end gap-2"
                {
                    (filter_form(&data.filter, &data.years))
                    span id="today" class="text-sm text-gray-600 dark:text-gray-400"
                    {
                        (format_full_date(data.today))
                    }
                }
            }

            (summary_cards(&data.totals, data.income_growth, data.expense_growth, data.user_count))

            div class="grid grid-cols-1 lg:grid-cols-2 gap-6 w-full"
            {
                (monthly_chart(&data.series))
                (recent_transactions(&data.recent))
            }

            (quick_actions())
        }
    );

    base("Dashboard", &[], &content)
}
