//! Narrowing lists of transactions and users down to what the user searched for.

use crate::{
    transaction::{Transaction, TransactionKind},
    user::User,
};

/// The criteria for narrowing down a list of transactions.
///
/// Every criterion that is empty matches every transaction, so the default
/// filter keeps the whole list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    /// Case-insensitive text to look for in the resident's name or the note.
    pub search_term: String,
    /// The calendar year the transaction happened in.
    pub year: Option<i32>,
    /// The 1-based calendar month the transaction happened in.
    pub month: Option<u8>,
    /// Whether the transaction is income or an expense.
    pub kind: Option<TransactionKind>,
}

impl TransactionFilter {
    /// Whether `transaction` meets every criterion.
    ///
    /// A transaction with an invalid date never matches a year or month criterion.
    pub fn matches(&self, transaction: &Transaction) -> bool {
        let needle = self.search_term.trim().to_lowercase();

        let matches_search = needle.is_empty()
            || contains_lowercase(&transaction.counterparty_name, &needle)
            || contains_lowercase(&transaction.note, &needle);

        let matches_year = match self.year {
            Some(year) => transaction.date.is_some_and(|date| date.year() == year),
            None => true,
        };

        let matches_month = match self.month {
            Some(month) => transaction
                .date
                .is_some_and(|date| u8::from(date.month()) == month),
            None => true,
        };

        let matches_kind = self.kind.is_none_or(|kind| transaction.kind == kind);

        matches_search && matches_year && matches_month && matches_kind
    }
}

fn contains_lowercase(haystack: &str, lowercase_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowercase_needle)
}

/// Parse a year selector value, where "", "all" or anything that is not a
/// year means every year.
pub fn parse_year(value: Option<&str>) -> Option<i32> {
    value.and_then(|value| value.trim().parse().ok())
}

/// Parse a 1-based month selector value, where "", "all" or anything outside
/// 1 to 12 means every month.
pub fn parse_month(value: Option<&str>) -> Option<u8> {
    value
        .and_then(|value| value.trim().parse().ok())
        .filter(|month| (1..=12).contains(month))
}

/// The transactions that meet every criterion of `filter`, in their original order.
pub fn filter_transactions(
    transactions: &[Transaction],
    filter: &TransactionFilter,
) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|transaction| filter.matches(transaction))
        .cloned()
        .collect()
}

/// The users whose full name, username or email contain `search_term`,
/// ignoring case. An empty search term keeps every user.
pub fn filter_users(users: &[User], search_term: &str) -> Vec<User> {
    let needle = search_term.trim().to_lowercase();

    if needle.is_empty() {
        return users.to_vec();
    }

    users
        .iter()
        .filter(|user| {
            contains_lowercase(&user.full_name, &needle)
                || contains_lowercase(&user.username, &needle)
                || contains_lowercase(&user.email, &needle)
        })
        .cloned()
        .collect()
}

/// The years that have transactions, newest first.
///
/// Falls back to `[current_year]` when no transaction has a valid date, so
/// year selectors always have at least one option.
pub fn distinct_years(transactions: &[Transaction], current_year: i32) -> Vec<i32> {
    let mut years = transactions
        .iter()
        .filter_map(|transaction| transaction.date.map(|date| date.year()))
        .collect::<Vec<_>>();

    years.sort_unstable_by(|a, b| b.cmp(a));
    years.dedup();

    if years.is_empty() {
        vec![current_year]
    } else {
        years
    }
}
