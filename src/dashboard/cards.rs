//! Summary cards for the figures at the top of the dashboard.
//!
//! Provides cards showing:
//! - The balance of the filtered transactions
//! - Total income and expenses with their change from last month
//! - The number of registered users

use maud::{Markup, html};

use crate::{
    aggregation::Totals,
    html::CARD_STYLE,
    locale::{PLACEHOLDER, format_rupiah},
};

/// Formats a month-over-month change, e.g. "+12.5% dari bulan lalu".
///
/// Positive changes get a plus sign, negative changes keep their minus sign.
pub(super) fn format_growth(growth: f64) -> String {
    let sign = if growth > 0.0 { "+" } else { "" };

    format!("{sign}{growth:.1}% dari bulan lalu")
}

fn growth_class(growth: f64) -> &'static str {
    if growth > 0.0 {
        "text-sm text-green-600 dark:text-green-400"
    } else if growth < 0.0 {
        "text-sm text-red-600 dark:text-red-400"
    } else {
        "text-sm text-gray-500 dark:text-gray-400"
    }
}

/// The amount, or the placeholder when it is zero.
fn amount_or_placeholder(amount: i64) -> String {
    if amount == 0 {
        PLACEHOLDER.to_owned()
    } else {
        format_rupiah(amount)
    }
}

fn stat_card(id: &str, title: &str, value: &str, growth: Option<f64>) -> Markup {
    html! {
        div id=(id) class=(CARD_STYLE)
        {
            p class="text-sm font-medium text-gray-600 dark:text-gray-400 mb-1" { (title) }
            p data-value class="text-2xl font-bold" { (value) }

            @if let Some(growth) = growth {
                p data-growth class=(growth_class(growth)) { (format_growth(growth)) }
            }
        }
    }
}

/// Renders the four summary cards.
///
/// # Arguments
/// * `totals` - Totals of the transactions that match the dashboard filter
/// * `income_growth` - Change in income from last month to this month, in percent
/// * `expense_growth` - Change in expenses from last month to this month, in percent
/// * `user_count` - The number of registered users
pub(super) fn summary_cards(
    totals: &Totals,
    income_growth: f64,
    expense_growth: f64,
    user_count: usize,
) -> Markup {
    let balance = if totals.income == 0 && totals.expense == 0 {
        PLACEHOLDER.to_owned()
    } else {
        format_rupiah(totals.balance)
    };

    html! {
        div class="grid grid-cols-1 gap-4 md:grid-cols-2 lg:grid-cols-4 w-full"
        {
            (stat_card("balance-card", "Total Saldo", &balance, None))
            (stat_card(
                "income-card",
                "Total Pemasukan",
                &amount_or_placeholder(totals.income),
                Some(income_growth),
            ))
            (stat_card(
                "expense-card",
                "Total Pengeluaran",
                &amount_or_placeholder(totals.expense),
                Some(expense_growth),
            ))
            (stat_card("user-card", "Total Warga", &format!("{user_count} Pengguna"), None))
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use crate::aggregation::Totals;

    use super::{format_growth, summary_cards};

    fn card_value(html: &Html, id: &str) -> String {
        let selector = Selector::parse(&format!("#{id} [data-value]")).unwrap();

        html.select(&selector)
            .next()
            .unwrap_or_else(|| panic!("no card {id}"))
            .text()
            .collect()
    }

    #[test]
    fn formats_growth_with_sign() {
        assert_eq!(format_growth(12.5), "+12.5% dari bulan lalu");
        assert_eq!(format_growth(0.0), "0.0% dari bulan lalu");
        assert_eq!(format_growth(-20.0), "-20.0% dari bulan lalu");
        assert_eq!(format_growth(100.0), "+100.0% dari bulan lalu");
    }

    #[test]
    fn zero_totals_show_placeholder() {
        let markup = summary_cards(&Totals::default(), 0.0, 0.0, 3).into_string();
        let html = Html::parse_fragment(&markup);

        assert_eq!(card_value(&html, "balance-card"), "-");
        assert_eq!(card_value(&html, "income-card"), "-");
        assert_eq!(card_value(&html, "expense-card"), "-");
        assert_eq!(card_value(&html, "user-card"), "3 Pengguna");
    }

    #[test]
    fn shows_balance_when_only_expenses() {
        let totals = Totals {
            income: 0,
            expense: 60_000,
            balance: -60_000,
        };

        let markup = summary_cards(&totals, 0.0, 100.0, 1).into_string();
        let html = Html::parse_fragment(&markup);

        assert_eq!(card_value(&html, "balance-card"), "-Rp\u{a0}60.000");
        assert_eq!(card_value(&html, "income-card"), "-");
        assert_eq!(card_value(&html, "expense-card"), "Rp\u{a0}60.000");
    }
}
