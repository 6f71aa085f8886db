//! The monthly income and expense bar chart.
//!
//! Bars are plain elements whose heights are set as a percentage of the
//! largest bucket, so the chart needs no JavaScript.

use maud::{Markup, html};

use crate::{
    aggregation::{MonthlyBucket, max_bucket_value, scale_ratio},
    html::CARD_STYLE,
    locale::{format_rupiah, short_month_name},
};

fn bar_height(value: i64, max: i64) -> String {
    format!("height: {:.1}%", scale_ratio(value, max) * 100.0)
}

fn chart_bar(bucket: &MonthlyBucket, max: i64) -> Markup {
    html! {
        div class="flex flex-col items-center gap-2" data-month=(u8::from(bucket.month))
        {
            div class="flex items-end gap-1 h-32"
            {
                div
                    data-bar="income"
                    class="w-3 md:w-4 rounded-t bg-green-500"
                    style=(bar_height(bucket.income, max))
                    title={"Pemasukan: " (format_rupiah(bucket.income))}
                {}
                div
                    data-bar="expense"
                    class="w-3 md:w-4 rounded-t bg-red-400"
                    style=(bar_height(bucket.expense, max))
                    title={"Pengeluaran: " (format_rupiah(bucket.expense))}
                {}
            }

            span class="text-xs font-medium text-gray-600 dark:text-gray-400"
            {
                (short_month_name(bucket.month))
            }
        }
    }
}

/// Renders the chart of the twelve monthly buckets, or a message when every
/// bucket is empty.
pub(super) fn monthly_chart(series: &[MonthlyBucket]) -> Markup {
    let max = max_bucket_value(series);
    let is_empty = series
        .iter()
        .all(|bucket| bucket.income == 0 && bucket.expense == 0);

    html! {
        section id="monthly-chart" class=(CARD_STYLE)
        {
            div class="flex justify-between items-center mb-6"
            {
                h3 class="text-lg font-semibold" { "Grafik Bulanan" }

                div class="flex items-center gap-4 text-sm"
                {
                    span class="flex items-center gap-2"
                    {
                        span class="w-3 h-3 rounded bg-green-500" {}
                        "Pemasukan"
                    }
                    span class="flex items-center gap-2"
                    {
                        span class="w-3 h-3 rounded bg-red-400" {}
                        "Pengeluaran"
                    }
                }
            }

            @if is_empty {
                p class="w-full py-12 text-center text-gray-400"
                {
                    "Tidak ada data grafik pada filter ini."
                }
            } @else {
                div class="flex items-end justify-between gap-1 overflow-x-auto"
                {
                    @for bucket in series {
                        (chart_bar(bucket, max))
                    }
                }
            }
        }
    }
}
