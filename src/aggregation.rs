//! Summaries computed from a list of transactions: totals, monthly series,
//! month-over-month growth and the latest activity.
//!
//! Everything here is a pure function over transactions that have already
//! been fetched, so the dashboard and report pages can share them.

use time::Month;

use crate::{
    locale::MONTHS,
    transaction::{Transaction, TransactionKind},
};

/// The income, expense and resulting balance of a set of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub income: i64,
    pub expense: i64,
    /// Income minus expense.
    pub balance: i64,
}

/// Sum the income and expenses of the transactions that satisfy `predicate`.
///
/// Unknown amounts count as zero.
pub fn compute_totals<P>(transactions: &[Transaction], predicate: P) -> Totals
where
    P: Fn(&Transaction) -> bool,
{
    let (income, expense) = transactions
        .iter()
        .filter(|transaction| predicate(transaction))
        .fold((0i64, 0i64), |(income, expense), transaction| {
            let amount = transaction.amount_or_zero();

            match transaction.kind {
                TransactionKind::Income => (income.saturating_add(amount), expense),
                TransactionKind::Expense => (income, expense.saturating_add(amount)),
            }
        });

    Totals {
        income,
        expense,
        balance: income.saturating_sub(expense),
    }
}

/// The income and expense of a single calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlyBucket {
    pub month: Month,
    pub income: i64,
    pub expense: i64,
}

/// Sum income and expenses per calendar month, January first.
///
/// Only transactions in `year` are counted, or in any year when `year` is
/// `None`. When `month` is set, every other month is left at zero.
/// Transactions with an invalid date are never counted.
pub fn compute_monthly_series(
    transactions: &[Transaction],
    year: Option<i32>,
    month: Option<Month>,
) -> [MonthlyBucket; 12] {
    MONTHS.map(|bucket_month| {
        let mut bucket = MonthlyBucket {
            month: bucket_month,
            income: 0,
            expense: 0,
        };

        if month.is_some_and(|selected| selected != bucket_month) {
            return bucket;
        }

        let in_bucket = |transaction: &Transaction| {
            transaction.date.is_some_and(|date| {
                date.month() == bucket_month && year.is_none_or(|year| date.year() == year)
            })
        };

        let totals = compute_totals(transactions, in_bucket);
        bucket.income = totals.income;
        bucket.expense = totals.expense;

        bucket
    })
}

/// The largest income or expense of any bucket.
pub fn max_bucket_value(series: &[MonthlyBucket]) -> i64 {
    series
        .iter()
        .map(|bucket| bucket.income.max(bucket.expense))
        .max()
        .unwrap_or(0)
}

/// `value` as a fraction of `max`, or 0 when `max` is not positive.
pub fn scale_ratio(value: i64, max: i64) -> f64 {
    if max <= 0 {
        return 0.0;
    }

    value as f64 / max as f64
}

/// The percentage change of the `kind` total from the month before
/// `reference_month` to `reference_month` of `reference_year`.
///
/// When the previous month's total is zero the change is 0% if this month is
/// also zero, and 100% otherwise.
pub fn compute_growth(
    transactions: &[Transaction],
    kind: TransactionKind,
    reference_month: Month,
    reference_year: i32,
) -> f64 {
    let (previous_month, previous_year) = match reference_month {
        Month::January => (Month::December, reference_year - 1),
        month => (month.previous(), reference_year),
    };

    let sum_for = |month: Month, year: i32| {
        transactions
            .iter()
            .filter(|transaction| {
                transaction.kind == kind
                    && transaction
                        .date
                        .is_some_and(|date| date.month() == month && date.year() == year)
            })
            .map(Transaction::amount_or_zero)
            .fold(0i64, i64::saturating_add)
    };

    let current = sum_for(reference_month, reference_year);
    let previous = sum_for(previous_month, previous_year);

    if previous == 0 {
        return if current == 0 { 0.0 } else { 100.0 };
    }

    (current - previous) as f64 / previous.abs() as f64 * 100.0
}

/// Sort newest first, keeping the original order of transactions on the
/// same day. Transactions with an invalid date go last.
pub fn sort_by_date_descending(transactions: &mut [Transaction]) {
    // `None < Some(_)`, so reversing the comparison puts invalid dates last.
    transactions.sort_by(|a, b| b.date.cmp(&a.date));
}

/// The `count` most recent transactions, newest first.
pub fn recent_activity(transactions: &[Transaction], count: usize) -> Vec<Transaction> {
    let mut sorted = transactions.to_vec();
    sort_by_date_descending(&mut sorted);
    sorted.truncate(count);

    sorted
}
