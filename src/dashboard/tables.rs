//! Table views for dashboard data display.

use maud::{Markup, html};

use crate::{
    dashboard::aggregation::CategoryTotal,
    html::{TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, empty_table_row, format_currency},
};

const TABLE_CELL_GREEN_STYLE: &str = "text-green-600 dark:text-green-400";
const TABLE_CELL_RED_STYLE: &str = "text-red-600 dark:text-red-400";

/// Gets the CSS class for coloring amounts (green for positive, red for negative).
pub(super) fn amount_color_class(amount: f64) -> &'static str {
    if amount >= 0.0 {
        TABLE_CELL_GREEN_STYLE
    } else {
        TABLE_CELL_RED_STYLE
    }
}

/// Renders the month's spending per expense category against what was planned.
pub(super) fn category_breakdown_table(totals: &[CategoryTotal]) -> Markup {
    html! {
        section class="w-full"
        {
            h3 class="text-xl font-semibold mb-4" { "Expenses by Category" }

            table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class="px-6 py-3 text-right" { "Expenses" }
                        th scope="col" class="px-6 py-3 text-right" { "Estimated" }
                        th scope="col" class="px-6 py-3 text-right" { "Actual" }
                        th scope="col" class="px-6 py-3 text-right" { "Remaining" }
                    }
                }

                tbody
                {
                    @for total in totals {
                        @let remaining = total.estimated - total.actual;

                        tr class=(TABLE_ROW_STYLE)
                        {
                            th
                                scope="row"
                                class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
                            {
                                (total.category_name)
                            }
                            td class="px-6 py-4 text-right" { (total.count) }
                            td class="px-6 py-4 text-right" { (format_currency(total.estimated)) }
                            td class="px-6 py-4 text-right" { (format_currency(total.actual)) }
                            td class={"px-6 py-4 text-right " (amount_color_class(remaining))}
                            {
                                (format_currency(remaining))
                            }
                        }
                    }

                    @if totals.is_empty() {
                        (empty_table_row(5, "No expenses recorded for this month."))
                    }
                }
            }
        }
    }
}
