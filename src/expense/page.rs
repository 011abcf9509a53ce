//! Displays a month's expenses and how much has been spent.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use time::format_description::well_known::Rfc3339;
use time_tz::Tz;

use crate::{
    Error,
    app_state::local_timezone,
    category::{Category, CategoryKind, list_categories},
    dates::{Month, format_date},
    db::lock_connection,
    endpoints::{self, format_endpoint},
    expense::{
        api::ExpenseState,
        core::Expense,
        db::{get_expense, list_expenses},
    },
    forms::{ApiForm, FormMode, delete_url, form_script, row_actions},
    html::{
        BADGE_STYLE, HtmlQuery, PAGE_CONTAINER_STYLE, PageQuery, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, empty_table_row, filter_form, format_currency,
        month_navigation, month_url, page_url, summary_card,
    },
    navigation::NavBar,
    search::filter_by_search,
    summary::ExpenseSummary,
    timezone::to_local,
};

/// Renders the expenses recorded in the month given by the `month` query
/// parameter, or the current month if there is none.
///
/// The `edit` query parameter fills the expense form with that expense.
pub async fn get_expenses_page(
    State(state): State<ExpenseState>,
    HtmlQuery(query): HtmlQuery<PageQuery>,
) -> Response {
    match load_expenses(&state, &query) {
        Ok(page) => expenses_view(&page, query.search()).into_response(),
        Err(error) => {
            tracing::error!("could not load expenses page: {error}");
            error.into_page_response()
        }
    }
}

struct ExpensesPage {
    month: Month,
    timezone: &'static Tz,
    expenses: Vec<Expense>,
    categories: Vec<Category>,
    editing: Option<Expense>,
}

fn load_expenses(state: &ExpenseState, query: &PageQuery) -> Result<ExpensesPage, Error> {
    let timezone = local_timezone(&state.local_timezone)?;
    let month = Month::parse_optional(query.month.as_deref())?
        .unwrap_or_else(|| Month::current(timezone));
    let editing = query.edit()?;
    let connection = lock_connection(&state.db_connection)?;

    Ok(ExpensesPage {
        month,
        timezone,
        expenses: list_expenses(Some(month), timezone, &connection)?,
        categories: list_categories(CategoryKind::Expense, &connection)?,
        editing: editing
            .map(|id| get_expense(id, &connection))
            .transpose()?,
    })
}

fn expense_form(page: &ExpensesPage, return_url: &str) -> Markup {
    let editing = page.editing.as_ref();
    let form = ApiForm {
        id: "expense-form",
        record_name: "Expense",
        api_url: endpoints::EXPENSES_API,
        return_url,
        mode: FormMode::new(editing.map(|expense| expense.id)),
    };
    let category_options: Vec<_> = page
        .categories
        .iter()
        .map(|category| (category.id.to_string(), category.name.clone()))
        .collect();
    let selected_category = editing.map(|expense| expense.category_id.to_string());
    // Editing keeps the completion time, the checkbox in the table changes it.
    let completed_at = editing
        .and_then(|expense| expense.completed_at)
        .and_then(|completed_at| completed_at.format(&Rfc3339).ok());

    form.view(html!(
        (form.select("category_id", "Category", &category_options, selected_category.as_deref()))
        (form.input("text", "name", "Name", editing.map(|expense| expense.name.as_str()), true))
        (form.amount_input(
            "estimated_amount",
            "Estimated Amount",
            editing.map(|expense| expense.estimated_amount),
            true,
        ))
        (form.amount_input(
            "actual_amount",
            "Actual Amount",
            editing.and_then(|expense| expense.actual_amount),
            false,
        ))

        @if let Some(completed_at) = completed_at {
            input type="hidden" name="completed_at" value=(completed_at);
        }
    ))
}

fn category_form(return_url: &str) -> Markup {
    let form = ApiForm {
        id: "expense-category-form",
        record_name: "Category",
        api_url: endpoints::EXPENSE_CATEGORIES_API,
        return_url,
        mode: FormMode::Create,
    };

    form.view(form.input("text", "name", "Category Name", None, true))
}

fn completion_toggle(expense: &Expense, status: &str) -> Markup {
    let toggle_url = format_endpoint(endpoints::TOGGLE_EXPENSE_COMPLETION, expense.id);
    let can_complete = expense.actual_amount.is_some();

    html!(
        label class="inline-flex items-center gap-2"
        {
            input
                type="checkbox"
                data-toggle-url=(toggle_url)
                checked[expense.is_completed()]
                disabled[!can_complete && !expense.is_completed()]
                title=[(!can_complete).then_some("Record the actual amount first")];
            (status)
        }
    )
}

fn expenses_view(page: &ExpensesPage, search: Option<&str>) -> Markup {
    let month = page.month;
    let nav_bar = NavBar::new(endpoints::EXPENSES_VIEW).into_html();
    let summary = ExpenseSummary::new(&page.expenses);
    let shown = filter_by_search(&page.expenses, search);
    let return_url = month_url(endpoints::EXPENSES_VIEW, month, search);

    let table_row = |expense: &Expense| {
        let status = match expense.completed_at {
            Some(completed_at) => format!(
                "Paid {}",
                format_date(to_local(completed_at, page.timezone).date())
            ),
            None => "Pending".to_owned(),
        };
        let edit_url = page_url(endpoints::EXPENSES_VIEW, Some(month), search, Some(expense.id));

        html!(
            tr class=(TABLE_ROW_STYLE) data-id=(expense.id)
            {
                th
                    scope="row"
                    class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
                {
                    (expense.name)
                }
                td class=(TABLE_CELL_STYLE)
                {
                    span class=(BADGE_STYLE) { (expense.category_name) }
                }
                td class="px-6 py-4 text-right" { (format_currency(expense.estimated_amount)) }
                td class="px-6 py-4 text-right"
                {
                    @match expense.actual_amount {
                        Some(amount) => (format_currency(amount)),
                        None => "-",
                    }
                }
                td class=(TABLE_CELL_STYLE) data-completed=(expense.is_completed())
                {
                    (completion_toggle(expense, &status))
                }
                td class=(TABLE_CELL_STYLE)
                {
                    (format_date(to_local(expense.created_at, page.timezone).date()))
                }
                td class=(TABLE_CELL_STYLE)
                {
                    (row_actions(
                        &edit_url,
                        &delete_url(endpoints::EXPENSES_API, expense.id),
                        &return_url,
                        &expense.name,
                    ))
                }
            }
        )
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl"
            {
                h1 class="text-xl font-bold" { "Expenses" }

                (month_navigation(endpoints::EXPENSES_VIEW, month, search))

                div class="grid grid-cols-1 md:grid-cols-3 gap-4"
                {
                    (summary_card("Total Estimated", &format_currency(summary.total_estimated), None))
                    (summary_card("Total Actual", &format_currency(summary.total_actual), None))
                    (summary_card(
                        "Completed",
                        &format!("{} / {}", summary.completed_count, summary.count),
                        Some(&format!("{:.0}% complete", summary.completion_ratio * 100.0)),
                    ))
                }

                (expense_form(page, &return_url))

                @if page.editing.is_none() {
                    (category_form(&return_url))
                }

                (filter_form(endpoints::EXPENSES_VIEW, Some(month), search))

                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                            th scope="col" class="px-6 py-3 text-right" { "Estimated" }
                            th scope="col" class="px-6 py-3 text-right" { "Actual" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Status" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Recorded" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                        }
                    }

                    tbody
                    {
                        @for expense in &shown {
                            (table_row(expense))
                        }

                        @if shown.is_empty() {
                            (empty_table_row(7, "No expenses found for this month."))
                        }
                    }
                }
            }
        }
    );

    base("Expenses", &[form_script()], &content)
}

#[cfg(test)]
mod view_tests {
    use scraper::{Html, Selector};
    use time::macros::datetime;

    use crate::{
        category::Category,
        dates::Month,
        expense::core::Expense,
        test_utils::{
            assert_api_form, assert_form_input_with_value, assert_selected_option,
            assert_valid_html, must_get_form,
        },
        timezone::get_timezone,
    };

    use super::{ExpensesPage, expenses_view};

    fn expense(id: i64, name: &str, category_name: &str, actual_amount: Option<f64>) -> Expense {
        Expense {
            id,
            category_id: 1,
            category_name: category_name.to_owned(),
            name: name.to_owned(),
            estimated_amount: 1000.0,
            actual_amount,
            completed_at: actual_amount.map(|_| datetime!(2024-05-20 10:00 UTC)),
            created_at: datetime!(2024-05-02 09:00 UTC),
        }
    }

    fn page(expenses: Vec<Expense>, editing: Option<Expense>) -> ExpensesPage {
        ExpensesPage {
            month: Month::parse("2024-05").unwrap(),
            timezone: get_timezone("Etc/UTC").unwrap(),
            expenses,
            categories: vec![
                Category {
                    id: 1,
                    name: "Utilities".to_owned(),
                },
                Category {
                    id: 2,
                    name: "Housing".to_owned(),
                },
            ],
            editing,
        }
    }

    fn render_page(page: &ExpensesPage, search: Option<&str>) -> Html {
        let html = Html::parse_document(&expenses_view(page, search).into_string());
        assert_valid_html(&html);
        html
    }

    fn render(expenses: &[Expense], search: Option<&str>) -> Html {
        render_page(&page(expenses.to_vec(), None), search)
    }

    fn row_names(html: &Html) -> Vec<String> {
        let selector = Selector::parse("tbody tr th").unwrap();
        html.select(&selector)
            .map(|cell| cell.text().collect::<String>().trim().to_owned())
            .collect()
    }

    fn summary_value(html: &Html, label: &str) -> String {
        let selector = Selector::parse(&format!("[data-summary='{label}'] p")).unwrap();
        html.select(&selector)
            .next()
            .unwrap_or_else(|| panic!("Could not find summary card {label}"))
            .text()
            .collect::<String>()
            .trim()
            .to_owned()
    }

    #[test]
    fn shows_summary_of_whole_month() {
        let expenses = [
            expense(1, "Electricity", "Utilities", Some(900.0)),
            expense(2, "Rent", "Housing", None),
        ];

        let html = render(&expenses, Some("rent"));

        assert_eq!(row_names(&html), vec!["Rent"]);
        assert_eq!(summary_value(&html, "Total Estimated"), "KES 2,000.00");
        assert_eq!(summary_value(&html, "Total Actual"), "KES 900.00");
        assert_eq!(summary_value(&html, "Completed"), "1 / 2");
    }

    #[test]
    fn search_matches_category_name() {
        let expenses = [
            expense(1, "Electricity", "Utilities", None),
            expense(2, "Rent", "Housing", None),
        ];

        let html = render(&expenses, Some("UTIL"));

        assert_eq!(row_names(&html), vec!["Electricity"]);
    }

    #[test]
    fn month_navigation_links_neighbouring_months() {
        let html = render(&[], None);

        let previous = html
            .select(&Selector::parse("a[rel='prev']").unwrap())
            .next()
            .expect("Could not find previous month link");
        let next = html
            .select(&Selector::parse("a[rel='next']").unwrap())
            .next()
            .expect("Could not find next month link");

        assert_eq!(previous.value().attr("href"), Some("/expenses?month=2024-04"));
        assert_eq!(next.value().attr("href"), Some("/expenses?month=2024-06"));
    }

    #[test]
    fn create_form_posts_to_api() {
        let html = render(&[], None);

        let form = must_get_form(&html, "expense-form");
        assert_api_form(&form, "POST", "/api/expenses");
        assert_selected_option(&form, "category_id", "");
        let category_form = must_get_form(&html, "expense-category-form");
        assert_api_form(&category_form, "POST", "/api/expense-categories");
    }

    #[test]
    fn edit_form_is_filled_with_the_expense() {
        let water = Expense {
            category_id: 2,
            ..expense(4, "Water", "Housing", Some(850.0))
        };

        let html = render_page(&page(vec![water.clone()], Some(water)), None);

        let form = must_get_form(&html, "expense-form");
        assert_api_form(&form, "PUT", "/api/expenses");
        assert_form_input_with_value(&form, "id", "hidden", "4");
        assert_form_input_with_value(&form, "name", "text", "Water");
        assert_form_input_with_value(&form, "estimated_amount", "number", "1000");
        assert_form_input_with_value(&form, "actual_amount", "number", "850");
        assert_form_input_with_value(&form, "completed_at", "hidden", "2024-05-20T10:00:00Z");
        assert_selected_option(&form, "category_id", "2");
    }

    #[test]
    fn rows_link_to_edit_and_completion() {
        let html = render(
            &[
                expense(1, "Electricity", "Utilities", Some(900.0)),
                expense(2, "Rent", "Housing", None),
            ],
            None,
        );

        let edit_links: Vec<_> = html
            .select(&Selector::parse("tbody a").unwrap())
            .filter_map(|link| link.value().attr("href"))
            .collect();
        assert_eq!(
            edit_links,
            vec!["/expenses?month=2024-05&edit=1", "/expenses?month=2024-05&edit=2"]
        );

        let toggles: Vec<_> = html
            .select(&Selector::parse("input[data-toggle-url]").unwrap())
            .map(|toggle| {
                (
                    toggle.value().attr("data-toggle-url").unwrap_or_default(),
                    toggle.value().attr("checked").is_some(),
                    toggle.value().attr("disabled").is_some(),
                )
            })
            .collect();
        assert_eq!(
            toggles,
            vec![
                ("/api/expenses/1/toggle-completion", true, false),
                ("/api/expenses/2/toggle-completion", false, true),
            ]
        );
    }

    #[test]
    fn dates_are_shown_in_the_local_timezone() {
        let late_night = Expense {
            created_at: datetime!(2024-05-02 22:30 UTC),
            ..expense(1, "Takeaway", "Food", None)
        };
        let page = ExpensesPage {
            timezone: get_timezone("Africa/Nairobi").unwrap(),
            ..page(vec![late_night], None)
        };

        let html = render_page(&page, None);

        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("2024-05-03"), "want the Nairobi date in {text}");
    }
}

#[cfg(test)]
mod endpoint_tests {
    use axum::http::StatusCode;
    use scraper::{Html, Selector};
    use serde_json::json;

    use crate::{
        endpoints,
        expense::Expense,
        test_utils::{
            assert_api_form, assert_form_input_with_value, assert_valid_html, get_test_server,
            get_test_state, must_get_form,
        },
    };

    #[tokio::test]
    async fn renders_page() {
        let server = get_test_server(get_test_state());

        let response = server.get(endpoints::EXPENSES_VIEW).await;

        response.assert_status_ok();
        assert_valid_html(&Html::parse_document(&response.text()));
    }

    #[tokio::test]
    async fn invalid_month_is_bad_request() {
        let server = get_test_server(get_test_state());

        server
            .get(endpoints::EXPENSES_VIEW)
            .add_query_param("month", "not-a-month")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_query_shows_error_page() {
        let server = get_test_server(get_test_state());

        let response = server
            .get(endpoints::EXPENSES_VIEW)
            .add_raw_query_param("month=2024-05&month=2024-06")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.header("content-type"),
            "text/html; charset=utf-8"
        );
        let html = Html::parse_document(&response.text());
        assert_valid_html(&html);
        let header = html
            .select(&Selector::parse("h1").unwrap())
            .next()
            .expect("Could not find header");
        assert_eq!(header.text().collect::<String>().trim(), "400");
    }

    #[tokio::test]
    async fn editing_an_unknown_expense_is_not_found() {
        let server = get_test_server(get_test_state());

        server
            .get(endpoints::EXPENSES_VIEW)
            .add_query_param("edit", 404)
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn edit_form_is_filled_from_the_database() {
        let server = get_test_server(get_test_state());
        let category_id = server
            .post(endpoints::EXPENSE_CATEGORIES_API)
            .json(&json!({"name": "Utilities"}))
            .await
            .json::<serde_json::Value>()["id"]
            .clone();
        let expense = server
            .post(endpoints::EXPENSES_API)
            .json(&json!({"category_id": category_id, "name": "Water", "estimated_amount": 900}))
            .await
            .json::<Expense>();

        let response = server
            .get(endpoints::EXPENSES_VIEW)
            .add_query_param("edit", expense.id)
            .await;

        response.assert_status_ok();
        let html = Html::parse_document(&response.text());
        let form = must_get_form(&html, "expense-form");
        assert_api_form(&form, "PUT", endpoints::EXPENSES_API);
        assert_form_input_with_value(&form, "name", "text", "Water");
    }
}
