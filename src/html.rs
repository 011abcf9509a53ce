//! Shared markup, styles and formatting for the server-rendered pages.

use std::sync::OnceLock;

use axum::extract::{FromRequestParts, Query};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use numfmt::{Formatter, Precision};
use serde::Deserialize;
use time::{format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    Error, database_id::DatabaseId, dates::Month, error_pages::PageRejection,
    summary::finite_or_zero,
};

// Link styles
pub const LINK_STYLE: &str = "text-blue-600 hover:text-blue-500 \
    dark:text-blue-500 dark:hover:text-blue-400 underline";

// Button styles
pub const BUTTON_PRIMARY_STYLE: &str = "px-4 py-2 bg-blue-500
    dark:bg-blue-600 disabled:bg-blue-700 hover:enabled:bg-blue-600 \
    hover:enabled:dark:bg-blue-700 text-white rounded";

// Form styles
pub const FORM_LABEL_STYLE: &str = "block mb-2 text-sm font-medium text-gray-900 dark:text-white";
pub const FORM_TEXT_INPUT_STYLE: &str = "block w-full p-2.5 rounded text-sm \
    text-gray-900 dark:text-white disabled:text-gray-500 bg-gray-50 \
    dark:bg-gray-700 border border-gray-300 dark:border-gray-600 \
    dark:placeholder-gray-400 focus:ring-blue-600 focus:border-blue-600 \
    focus:dark:border-blue-500 focus:dark:ring-blue-500";

// Table styles
pub const TABLE_HEADER_STYLE: &str = "text-xs text-gray-700 uppercase \
    bg-gray-50 dark:bg-gray-700 dark:text-gray-400";

pub const TABLE_ROW_STYLE: &str = "bg-white border-b dark:bg-gray-800 dark:border-gray-700";

pub const TABLE_CELL_STYLE: &str = "px-6 py-4";

// Badge style
pub const BADGE_STYLE: &str = "inline-flex items-center px-2.5 py-0.5 \
    text-xs font-semibold text-blue-800 bg-blue-100 rounded-full \
    dark:bg-blue-900 dark:text-blue-300";

// Page container
pub const PAGE_CONTAINER_STYLE: &str =
    "flex flex-col items-center px-6 py-8 mx-auto lg:py-5 text-gray-900 dark:text-white";

const MONTH_TITLE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[month repr:long] [year]");

/// Extra elements to place in a page's `<head>`.
pub enum HeadElement {
    /// The URL of a JavaScript script.
    ScriptLink(String),
    /// JavaScript source code.
    ScriptSource(PreEscaped<String>),
}

pub fn base(title: &str, head_elements: &[HeadElement], content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Household Ledger" }

                style
                {
                    (PreEscaped(r#"
                    body {
                        font-family: system-ui, sans-serif;
                    }

                    table {
                        border-collapse: collapse;
                    }

                    .text-right {
                        text-align: right;
                    }
                    "#))
                }

                @for head_element in head_elements {
                    @match head_element {
                        HeadElement::ScriptLink(url) => script src=(url) {}
                        HeadElement::ScriptSource(text) => script { (text) }
                    }
                }
            }

            body
                class="container max-w-full min-h-screen bg-gray-50 dark:bg-gray-900 pb-[calc(5rem+env(safe-area-inset-bottom))] lg:pb-0"
            {
                (content)
            }
        }
    }
}

pub fn error_view(title: &str, header: &str, description: &str, fix: &str) -> Markup {
    // Template adapted from https://flowbite.com/blocks/marketing/404/
    let content = html!(
        section class="bg-white dark:bg-gray-900"
        {
            div class="py-8 px-4 mx-auto max-w-screen-xl lg:py-16 lg:px-6"
            {
                div class="mx-auto max-w-screen-sm text-center"
                {
                    h1
                        class="mb-4 text-7xl tracking-tight font-extrabold
                            lg:text-9xl text-blue-600 dark:text-blue-500"
                    {
                        (header)
                    }

                    p
                        class="mb-4 text-3xl md:text-4xl tracking-tight
                            font-bold text-gray-900 dark:text-white"
                    {
                        (description)
                    }

                    p
                        class="mb-4 text-1xl md:text-2xl tracking-tight
                            text-gray-900 dark:text-white"
                    {
                        (fix)
                    }

                    a
                        href="/"
                        class="inline-flex text-white bg-blue-600
                            hover:bg-blue-800 focus:ring-4 focus:outline-hidden
                            focus:ring-blue-300 font-medium rounded text-sm px-5
                            py-2.5 text-center dark:focus:ring-blue-900 my-4"
                    {
                        "Back to Homepage"
                    }
                }
            }
        }
    );

    base(title, &[], &content)
}

/// A page query string whose parse failures are shown as an HTML error page.
#[derive(FromRequestParts)]
#[from_request(via(Query), rejection(PageRejection))]
pub(crate) struct HtmlQuery<T>(pub T);

/// The query string accepted by the list pages, e.g. `?month=2024-05&search=rent&edit=3`.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub month: Option<String>,
    pub search: Option<String>,
    /// The ID of the record to show in the edit form.
    pub edit: Option<String>,
}

impl PageQuery {
    /// The ID of the record being edited, or `None` if the form is for a new record.
    ///
    /// # Errors
    /// Returns [Error::InvalidField] if `edit` is given but is not an integer.
    pub fn edit(&self) -> Result<Option<DatabaseId>, Error> {
        match self.edit.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => text.parse().map(Some).map_err(|_| Error::InvalidField {
                field: "edit",
                reason: format!("\"{text}\" is not a valid ID"),
            }),
        }
    }

    /// The search term, or `None` if it is missing or blank.
    pub fn search(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|search| !search.is_empty())
    }
}

/// Build a link to `endpoint` for `month`, keeping the current search term.
pub fn month_url(endpoint: &str, month: Month, search: Option<&str>) -> String {
    page_url(endpoint, Some(month), search, None)
}

/// Build a link to `endpoint` with the query parameters that are given.
///
/// `edit` opens the edit form for the record with that ID.
pub fn page_url(
    endpoint: &str,
    month: Option<Month>,
    search: Option<&str>,
    edit: Option<DatabaseId>,
) -> String {
    let params: Vec<(&str, String)> = [
        month.map(|month| ("month", month.to_string())),
        search.map(|search| ("search", search.to_owned())),
        edit.map(|id| ("edit", id.to_string())),
    ]
    .into_iter()
    .flatten()
    .collect();

    if params.is_empty() {
        return endpoint.to_owned();
    }

    match serde_urlencoded::to_string(&params) {
        Ok(query) => format!("{endpoint}?{query}"),
        Err(error) => {
            tracing::warn!("could not encode query string for {endpoint}: {error}");
            endpoint.to_owned()
        }
    }
}

/// Format a month for a page heading, e.g. "May 2024".
pub fn format_month_title(month: Month) -> String {
    month
        .first_day()
        .format(MONTH_TITLE_FORMAT)
        .unwrap_or_else(|_| month.to_string())
}

/// Links to the previous and next month around the name of `month`.
pub fn month_navigation(endpoint: &str, month: Month, search: Option<&str>) -> Markup {
    html!(
        nav class="flex items-center justify-between gap-4 w-full" aria-label="Month"
        {
            a
                href=(month_url(endpoint, month.previous(), search))
                class=(LINK_STYLE)
                rel="prev"
            {
                "Previous month"
            }

            h2 class="text-lg font-semibold" data-month=(month.to_string())
            {
                (format_month_title(month))
            }

            a
                href=(month_url(endpoint, month.next(), search))
                class=(LINK_STYLE)
                rel="next"
            {
                "Next month"
            }
        }
    )
}

/// A GET form for narrowing a list by month (if `month` is given) and search term.
pub fn filter_form(endpoint: &str, month: Option<Month>, search: Option<&str>) -> Markup {
    html!(
        form
            method="get"
            action=(endpoint)
            role="search"
            class="flex flex-wrap items-end gap-4 w-full"
        {
            @if let Some(month) = month {
                div
                {
                    label for="month" class=(FORM_LABEL_STYLE) { "Month" }
                    input
                        type="month"
                        name="month"
                        id="month"
                        class=(FORM_TEXT_INPUT_STYLE)
                        value=(month.to_string());
                }
            }

            div class="grow"
            {
                label for="search" class=(FORM_LABEL_STYLE) { "Search" }
                input
                    type="search"
                    name="search"
                    id="search"
                    placeholder="Search..."
                    class=(FORM_TEXT_INPUT_STYLE)
                    value=(search.unwrap_or_default());
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Filter" }
        }
    )
}

/// A card in a summary panel showing one aggregate.
pub fn summary_card(label: &str, value: &str, caption: Option<&str>) -> Markup {
    html!(
        div
            class="rounded border border-gray-200 bg-white px-4 py-3 shadow-sm dark:border-gray-700 dark:bg-gray-800"
            data-summary=(label)
        {
            h3 class="text-sm text-gray-500 dark:text-gray-400" { (label) }
            p class="text-xl font-semibold tabular-nums" { (value) }

            @if let Some(caption) = caption {
                p class="text-xs text-gray-500 dark:text-gray-400" { (caption) }
            }
        }
    )
}

/// The row shown in place of data when a table is empty.
pub fn empty_table_row(column_count: usize, message: &str) -> Markup {
    html!(
        tr
        {
            td
                colspan=(column_count)
                class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
            {
                (message)
            }
        }
    )
}

/// Format `amount` in Kenyan shillings with two decimal places, e.g. "KES 1,234.50".
///
/// NaN and infinite amounts are shown as zero.
pub fn format_currency(amount: f64) -> String {
    static WHOLE_SHILLINGS_FMT: OnceLock<Option<Formatter>> = OnceLock::new();

    let whole_shillings_fmt = WHOLE_SHILLINGS_FMT.get_or_init(|| {
        Formatter::currency("KES ")
            .inspect_err(|error| tracing::error!("could not create currency formatter: {error:?}"))
            .ok()
            .map(|formatter| formatter.precision(Precision::Decimals(0)))
    });

    let total_cents = (finite_or_zero(amount).abs() * 100.0).round();
    let shillings = (total_cents / 100.0).trunc();
    let cents = (total_cents - shillings * 100.0) as u8;
    let sign = if amount < 0.0 && total_cents > 0.0 {
        "-"
    } else {
        ""
    };

    let shillings = match whole_shillings_fmt {
        // Zero is formatted as "0" without the prefix.
        Some(formatter) if shillings > 0.0 => formatter.fmt_string(shillings),
        _ => format!("KES {shillings:.0}"),
    };

    format!("{sign}{shillings}.{cents:02}")
}


#[cfg(test)]
mod month_link_tests {
    use crate::dates::Month;

    use super::{format_month_title, month_url, page_url};

    #[test]
    fn month_url_keeps_search() {
        let month = Month::parse("2024-05").unwrap();

        assert_eq!(month_url("/income", month, None), "/income?month=2024-05");
        assert_eq!(
            month_url("/income", month, Some("side hustle")),
            "/income?month=2024-05&search=side+hustle"
        );
    }

    #[test]
    fn page_url_skips_missing_parameters() {
        let month = Month::parse("2024-05").unwrap();

        assert_eq!(page_url("/family-members", None, None, None), "/family-members");
        assert_eq!(
            page_url("/family-members", None, None, Some(4)),
            "/family-members?edit=4"
        );
        assert_eq!(
            page_url("/expenses", Some(month), Some("rent"), Some(2)),
            "/expenses?month=2024-05&search=rent&edit=2"
        );
    }

    #[test]
    fn month_title() {
        let month = Month::parse("2024-05").unwrap();

        assert_eq!(format_month_title(month), "May 2024");
    }
}
