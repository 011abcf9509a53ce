//! Dashboard HTTP handlers and view rendering.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Serialize;

use crate::{
    AppState, Error,
    api::{ApiQuery, MonthQuery},
    app_state::local_timezone,
    dashboard::{
        aggregation::totals_by_category,
        charts::{
            DashboardChart, ECHARTS_SCRIPT_URL, category_expenses_chart, charts_script,
            charts_view,
        },
        tables::{amount_color_class, category_breakdown_table},
    },
    dates::Month,
    db::lock_connection,
    endpoints,
    expense::{Expense, list_expenses},
    html::{
        HeadElement, HtmlQuery, LINK_STYLE, PAGE_CONTAINER_STYLE, PageQuery, base,
        format_currency, month_navigation,
    },
    income::{Income, list_income},
    navigation::NavBar,
    summary::{ExpenseSummary, MonthlyBalance},
};

/// The state needed for the dashboard page and API.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading income and expenses.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Africa/Nairobi".
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

/// The JSON body of the dashboard API.
#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    /// The month summarised, as `YYYY-MM`.
    pub month: String,
    #[serde(flatten)]
    pub balance: MonthlyBalance,
}

/// A month's income and expenses.
struct MonthData {
    month: Month,
    income: Vec<Income>,
    expenses: Vec<Expense>,
}

/// Fetch the income and expenses for `month`, or the current month if `None`.
fn load_month(state: &DashboardState, month: Option<Month>) -> Result<MonthData, Error> {
    let timezone = local_timezone(&state.local_timezone)?;
    let month = month.unwrap_or_else(|| Month::current(timezone));
    let connection = lock_connection(&state.db_connection)?;

    Ok(MonthData {
        month,
        income: list_income(Some(month), &connection)?,
        expenses: list_expenses(Some(month), timezone, &connection)?,
    })
}

/// A route handler that responds with the total income, total expenses and
/// net balance for the month given by the `month` query parameter, or the
/// current month if there is none.
pub async fn get_dashboard_endpoint(
    State(state): State<DashboardState>,
    ApiQuery(query): ApiQuery<MonthQuery>,
) -> Result<Json<DashboardSummary>, Error> {
    let data = load_month(&state, query.month()?)?;

    Ok(Json(DashboardSummary {
        month: data.month.to_string(),
        balance: MonthlyBalance::new(&data.income, &data.expenses),
    }))
}

/// Display a page with an overview of a month's finances.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    HtmlQuery(query): HtmlQuery<PageQuery>,
) -> Response {
    let data = Month::parse_optional(query.month.as_deref())
        .and_then(|month| load_month(&state, month));

    match data {
        Ok(data) => dashboard_view(&data).into_response(),
        Err(error) => {
            tracing::error!("could not load dashboard: {error}");
            error.into_page_response()
        }
    }
}

fn balance_card(label: &str, amount: f64, amount_style: &str) -> Markup {
    html! {
        div
            class="bg-white dark:bg-gray-800 border border-gray-200
                   dark:border-gray-700 rounded-lg p-4 shadow-md
                   flex flex-col items-center"
            data-summary=(label)
        {
            h3 class="text-lg font-semibold text-gray-700 dark:text-gray-300" { (label) }
            p class={"text-2xl font-bold mt-2 tabular-nums " (amount_style)}
            {
                (format_currency(amount))
            }
        }
    }
}

fn dashboard_view(data: &MonthData) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();
    let balance = MonthlyBalance::new(&data.income, &data.expenses);
    let expense_summary = ExpenseSummary::new(&data.expenses);
    let category_totals = totals_by_category(&data.expenses);
    let charts = if category_totals.is_empty() {
        Vec::new()
    } else {
        vec![DashboardChart {
            id: "category-expenses-chart",
            options: category_expenses_chart(&category_totals).to_string(),
        }]
    };

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-6 w-full lg:max-w-5xl"
            {
                h1 class="text-xl font-bold" { "Dashboard" }

                (month_navigation(endpoints::DASHBOARD_VIEW, data.month, None))

                div class="grid grid-cols-1 md:grid-cols-3 gap-4"
                {
                    (balance_card("Total Income", balance.total_income, "text-teal-600 dark:text-teal-400"))
                    (balance_card("Total Expenses", balance.total_expenses, "text-yellow-600 dark:text-yellow-400"))
                    (balance_card("Net Balance", balance.net_balance, amount_color_class(balance.net_balance)))
                }

                p class="text-sm text-gray-600 dark:text-gray-400"
                {
                    (expense_summary.completed_count) " of " (expense_summary.count)
                    " expenses paid this month, "
                    (format_currency(expense_summary.total_estimated)) " planned in total. "
                    a href=(endpoints::EXPENSES_VIEW) class=(LINK_STYLE) { "View expenses" }
                }

                (charts_view(&charts))

                (category_breakdown_table(&category_totals))
            }
        }
    };

    let head_elements = if charts.is_empty() {
        Vec::new()
    } else {
        vec![
            HeadElement::ScriptLink(ECHARTS_SCRIPT_URL.to_owned()),
            charts_script(&charts),
        ]
    };

    base("Dashboard", &head_elements, &content)
}
