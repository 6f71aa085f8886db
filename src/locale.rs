//! Indonesian (id-ID) formatting of money, dates and labels.

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};
use time::{Date, Month, Weekday};
use unicode_segmentation::UnicodeSegmentation;

/// The placeholder shown for values that cannot be displayed, e.g., an
/// invalid date or an unknown amount.
pub const PLACEHOLDER: &str = "-";

const RUPIAH_PREFIX: &str = "Rp\u{a0}";

/// The months of the year in calendar order.
pub const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

pub fn month_name(month: Month) -> &'static str {
    match month {
        Month::January => "Januari",
        Month::February => "Februari",
        Month::March => "Maret",
        Month::April => "April",
        Month::May => "Mei",
        Month::June => "Juni",
        Month::July => "Juli",
        Month::August => "Agustus",
        Month::September => "September",
        Month::October => "Oktober",
        Month::November => "November",
        Month::December => "Desember",
    }
}

pub fn short_month_name(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "Mei",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Agu",
        Month::September => "Sep",
        Month::October => "Okt",
        Month::November => "Nov",
        Month::December => "Des",
    }
}

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Monday => "Senin",
        Weekday::Tuesday => "Selasa",
        Weekday::Wednesday => "Rabu",
        Weekday::Thursday => "Kamis",
        Weekday::Friday => "Jumat",
        Weekday::Saturday => "Sabtu",
        Weekday::Sunday => "Minggu",
    }
}

fn rupiah_formatter() -> Option<&'static Formatter> {
    static FORMATTER: OnceLock<Option<Formatter>> = OnceLock::new();

    FORMATTER
        .get_or_init(|| {
            Formatter::currency(RUPIAH_PREFIX)
                .and_then(|formatter| formatter.separator('.'))
                .map(|formatter| formatter.precision(Precision::Decimals(0)))
                .inspect_err(|error| tracing::error!("could not build Rupiah formatter: {error:?}"))
                .ok()
        })
        .as_ref()
}

/// Format whole Rupiah, e.g. "Rp 100.000" with a no-break space after "Rp".
///
/// Negative amounts are prefixed with a minus sign, e.g. "-Rp 60.000".
pub fn format_rupiah(amount: i64) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let magnitude = amount.unsigned_abs();

    // numfmt formats zero as a bare "0", so zero is spelled out here.
    if magnitude == 0 {
        return format!("{RUPIAH_PREFIX}0");
    }

    // numfmt goes through f64 and switches to scientific notation from 10^12.
    if magnitude >= NUMFMT_LIMIT {
        return format!("{sign}{RUPIAH_PREFIX}{}", group_thousands(magnitude));
    }

    match rupiah_formatter() {
        Some(formatter) => format!("{sign}{}", formatter.fmt_string(magnitude as f64)),
        None => format!("{sign}{RUPIAH_PREFIX}{}", group_thousands(magnitude)),
    }
}

const NUMFMT_LIMIT: u64 = 1_000_000_000_000;

/// Digits grouped in threes with dots, e.g. "1.000.000".
fn group_thousands(magnitude: u64) -> String {
    let digits = magnitude.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    grouped
}

/// Format an amount with a "+" for income or a "-" for expenses, e.g. "+Rp 50.000".
///
/// An unknown amount is rendered as [PLACEHOLDER].
pub fn format_signed_rupiah(amount: Option<i64>, is_income: bool) -> String {
    match amount {
        Some(amount) => {
            let sign = if is_income { "+" } else { "-" };
            format!("{sign}{}", format_rupiah(amount.abs()))
        }
        None => PLACEHOLDER.to_owned(),
    }
}

/// Format a date as "d/m/yyyy" without zero padding, e.g. "10/1/2024".
pub fn format_short_date(date: Option<Date>) -> String {
    match date {
        Some(date) => format!("{}/{}/{}", date.day(), u8::from(date.month()), date.year()),
        None => PLACEHOLDER.to_owned(),
    }
}

/// Format a date as "10 Januari 2024".
pub fn format_long_date(date: Option<Date>) -> String {
    match date {
        Some(date) => format!(
            "{} {} {}",
            date.day(),
            month_name(date.month()),
            date.year()
        ),
        None => PLACEHOLDER.to_owned(),
    }
}

/// Format a date with its weekday, e.g. "Minggu, 18 Oktober 2026".
pub fn format_full_date(date: Date) -> String {
    format!(
        "{}, {}",
        weekday_name(date.weekday()),
        format_long_date(Some(date))
    )
}

/// Turn a storage key into a label by replacing underscores with spaces and
/// capitalising each word, e.g. "iuran_bulanan" becomes "Iuran Bulanan".
pub fn humanize_key(key: &str) -> String {
    key.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Shorten `text` to at most `max_graphemes` user-perceived characters,
/// ending with "..." when anything was cut.
pub fn truncate_text(text: &str, max_graphemes: usize) -> String {
    let graphemes = text.graphemes(true).collect::<Vec<_>>();

    if graphemes.len() <= max_graphemes {
        return text.to_owned();
    }

    let keep = max_graphemes.saturating_sub(3);
    format!("{}...", graphemes[..keep].concat())
}

#[cfg(test)]
mod tests {
    use time::{Month, macros::date};

    use super::{
        format_full_date, format_long_date, format_rupiah, format_short_date,
        format_signed_rupiah, humanize_key, month_name, short_month_name, truncate_text,
    };

    #[test]
    fn formats_rupiah_with_dot_separators() {
        assert_eq!(format_rupiah(100_000), "Rp\u{a0}100.000");
        assert_eq!(format_rupiah(1_250_000), "Rp\u{a0}1.250.000");
        assert_eq!(format_rupiah(500), "Rp\u{a0}500");
    }

    #[test]
    fn formats_zero_and_negative_rupiah() {
        assert_eq!(format_rupiah(0), "Rp\u{a0}0");
        assert_eq!(format_rupiah(-60_000), "-Rp\u{a0}60.000");
    }

    #[test]
    fn formats_trillions_without_exponent() {
        assert_eq!(format_rupiah(999_999_999_999), "Rp\u{a0}999.999.999.999");
        assert_eq!(format_rupiah(1_000_000_000_000), "Rp\u{a0}1.000.000.000.000");
        assert_eq!(
            format_rupiah(999_999_999_999_998),
            "Rp\u{a0}999.999.999.999.998"
        );
        assert_eq!(
            format_rupiah(i64::MAX),
            "Rp\u{a0}9.223.372.036.854.775.807"
        );
        assert_eq!(
            format_rupiah(i64::MIN),
            "-Rp\u{a0}9.223.372.036.854.775.808"
        );
    }

    #[test]
    fn signed_amounts_follow_kind() {
        assert_eq!(format_signed_rupiah(Some(50_000), true), "+Rp\u{a0}50.000");
        assert_eq!(format_signed_rupiah(Some(40_000), false), "-Rp\u{a0}40.000");
        assert_eq!(format_signed_rupiah(None, true), "-");
    }

    #[test]
    fn formats_dates() {
        assert_eq!(format_short_date(Some(date!(2024 - 01 - 10))), "10/1/2024");
        assert_eq!(format_short_date(None), "-");
        assert_eq!(format_long_date(Some(date!(2024 - 01 - 10))), "10 Januari 2024");
        assert_eq!(
            format_full_date(date!(2026 - 10 - 18)),
            "Minggu, 18 Oktober 2026"
        );
    }

    #[test]
    fn month_names() {
        assert_eq!(month_name(Month::August), "Agustus");
        assert_eq!(short_month_name(Month::August), "Agu");
        assert_eq!(short_month_name(Month::May), "Mei");
    }

    #[test]
    fn humanizes_storage_keys() {
        assert_eq!(humanize_key("iuran_bulanan"), "Iuran Bulanan");
        assert_eq!(humanize_key("fasilitas_umum"), "Fasilitas Umum");
        assert_eq!(humanize_key("lunas"), "Lunas");
    }

    #[test]
    fn truncates_long_text() {
        assert_eq!(truncate_text("pendek", 32), "pendek");
        assert_eq!(truncate_text("abcdefghij", 8), "abcde...");
    }
}
