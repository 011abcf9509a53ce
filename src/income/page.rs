//! Displays a month's income.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    Error,
    app_state::local_timezone,
    dates::Month,
    db::lock_connection,
    endpoints,
    family_member::{FamilyMember, family_member_options, list_family_members},
    forms::{ApiForm, FormMode, delete_url, form_script, row_actions},
    html::{
        BADGE_STYLE, HtmlQuery, PAGE_CONTAINER_STYLE, PageQuery, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, empty_table_row, filter_form, format_currency,
        format_month_title, month_navigation, month_url, page_url, summary_card,
    },
    income::{
        api::IncomeState,
        core::Income,
        db::{get_income, list_income},
    },
    navigation::NavBar,
    search::filter_by_search,
    summary::IncomeSummary,
};

/// Renders the income for the month given by the `month` query parameter,
/// or the current month if there is none.
///
/// The `edit` query parameter fills the income form with that entry.
pub async fn get_income_page(
    State(state): State<IncomeState>,
    HtmlQuery(query): HtmlQuery<PageQuery>,
) -> Response {
    match load_income(&state, &query) {
        Ok(page) => income_view(&page, query.search()).into_response(),
        Err(error) => {
            tracing::error!("could not load income page: {error}");
            error.into_page_response()
        }
    }
}

struct IncomePage {
    month: Month,
    income: Vec<Income>,
    family_members: Vec<FamilyMember>,
    editing: Option<Income>,
}

fn load_income(state: &IncomeState, query: &PageQuery) -> Result<IncomePage, Error> {
    let month = match Month::parse_optional(query.month.as_deref())? {
        Some(month) => month,
        None => Month::current(local_timezone(&state.local_timezone)?),
    };
    let editing = query.edit()?;
    let connection = lock_connection(&state.db_connection)?;

    Ok(IncomePage {
        month,
        income: list_income(Some(month), &connection)?,
        family_members: list_family_members(&connection)?,
        editing: editing.map(|id| get_income(id, &connection)).transpose()?,
    })
}

fn income_form(page: &IncomePage, return_url: &str) -> Markup {
    let editing = page.editing.as_ref();
    let form = ApiForm {
        id: "income-form",
        record_name: "Income",
        api_url: endpoints::INCOME_API,
        return_url,
        mode: FormMode::new(editing.map(|entry| entry.id)),
    };
    let selected_member = editing.map(|entry| entry.family_member_id.to_string());
    // New income defaults to the month being viewed.
    let month = editing
        .map(|entry| Month::containing(entry.month))
        .unwrap_or(page.month)
        .to_string();

    form.view(html!(
        (form.select(
            "family_member_id",
            "Family Member",
            &family_member_options(&page.family_members),
            selected_member.as_deref(),
        ))
        (form.input("text", "source", "Source", editing.map(|entry| entry.source.as_str()), true))
        (form.amount_input("amount", "Amount", editing.map(|entry| entry.amount), true))
        (form.input("month", "month", "Month", Some(&month), true))
    ))
}

fn income_view(page: &IncomePage, search: Option<&str>) -> Markup {
    let month = page.month;
    let nav_bar = NavBar::new(endpoints::INCOME_VIEW).into_html();
    let summary = IncomeSummary::new(&page.income);
    let shown = filter_by_search(&page.income, search);
    let return_url = month_url(endpoints::INCOME_VIEW, month, search);

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl"
            {
                h1 class="text-xl font-bold" { "Income" }

                (month_navigation(endpoints::INCOME_VIEW, month, search))

                div class="grid grid-cols-1 md:grid-cols-3 gap-4"
                {
                    (summary_card("Total Income", &format_currency(summary.total), None))
                    (summary_card("Entries", &summary.count.to_string(), None))
                    (summary_card("Average", &format_currency(summary.average), Some("per entry")))
                }

                (income_form(page, &return_url))

                (filter_form(endpoints::INCOME_VIEW, Some(month), search))

                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Source" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Family Member" }
                            th scope="col" class="px-6 py-3 text-right" { "Amount" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Month" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                        }
                    }

                    tbody
                    {
                        @for entry in &shown {
                            tr class=(TABLE_ROW_STYLE) data-id=(entry.id)
                            {
                                th
                                    scope="row"
                                    class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
                                {
                                    (entry.source)
                                }
                                td class=(TABLE_CELL_STYLE)
                                {
                                    (entry.family_member_name) " "
                                    span class=(BADGE_STYLE) { (entry.family_member_designation.as_str()) }
                                }
                                td class="px-6 py-4 text-right" { (format_currency(entry.amount)) }
                                td class=(TABLE_CELL_STYLE)
                                {
                                    (format_month_title(Month::containing(entry.month)))
                                }
                                td class=(TABLE_CELL_STYLE)
                                {
                                    (row_actions(
                                        &page_url(endpoints::INCOME_VIEW, Some(month), search, Some(entry.id)),
                                        &delete_url(endpoints::INCOME_API, entry.id),
                                        &return_url,
                                        &entry.source,
                                    ))
                                }
                            }
                        }

                        @if shown.is_empty() {
                            (empty_table_row(5, "No income recorded for this month."))
                        }
                    }
                }
            }
        }
    );

    base("Income", &[form_script()], &content)
}

#[cfg(test)]
mod view_tests {
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::{
        dates::Month,
        family_member::{Designation, FamilyMember},
        income::core::Income,
        test_utils::{
            assert_api_form, assert_form_input_with_value, assert_selected_option,
            assert_valid_html, must_get_form,
        },
    };

    use super::{IncomePage, income_view};

    fn income(id: i64, member: &str, source: &str, amount: f64) -> Income {
        Income {
            id,
            family_member_id: id,
            family_member_name: member.to_owned(),
            family_member_designation: Designation::Mom,
            source: source.to_owned(),
            amount,
            month: date!(2024 - 05 - 01),
        }
    }

    fn page(income: Vec<Income>, editing: Option<Income>) -> IncomePage {
        IncomePage {
            month: Month::parse("2024-05").unwrap(),
            income,
            family_members: vec![
                FamilyMember {
                    id: 1,
                    name: "Achieng".to_owned(),
                    designation: Designation::Mom,
                },
                FamilyMember {
                    id: 2,
                    name: "Otieno".to_owned(),
                    designation: Designation::Dad,
                },
            ],
            editing,
        }
    }

    fn render(page: &IncomePage, search: Option<&str>) -> Html {
        let html = Html::parse_document(&income_view(page, search).into_string());
        assert_valid_html(&html);
        html
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
    fn summary_totals_every_entry() {
        let entries = vec![
            income(1, "Achieng", "Salary", 50_000.0),
            income(2, "Otieno", "Consulting", 25_000.0),
        ];

        let html = render(&page(entries, None), Some("otieno"));

        let rows: Vec<_> = html
            .select(&Selector::parse("tbody tr th").unwrap())
            .map(|cell| cell.text().collect::<String>().trim().to_owned())
            .collect();
        assert_eq!(rows, vec!["Consulting"]);
        assert_eq!(summary_value(&html, "Total Income"), "KES 75,000.00");
        assert_eq!(summary_value(&html, "Entries"), "2");
        assert_eq!(summary_value(&html, "Average"), "KES 37,500.00");
    }

    #[test]
    fn empty_month() {
        let html = render(&page(Vec::new(), None), None);

        assert_eq!(summary_value(&html, "Total Income"), "KES 0.00");
        assert_eq!(summary_value(&html, "Average"), "KES 0.00");
        let heading = html
            .select(&Selector::parse("h2[data-month]").unwrap())
            .next()
            .expect("Could not find month heading");
        assert_eq!(heading.text().collect::<String>().trim(), "May 2024");
    }

    #[test]
    fn create_form_defaults_to_the_viewed_month() {
        let html = render(&page(Vec::new(), None), None);

        let form = must_get_form(&html, "income-form");
        assert_api_form(&form, "POST", "/api/income");
        assert_form_input_with_value(&form, "month", "month", "2024-05");
        assert_selected_option(&form, "family_member_id", "");
    }

    #[test]
    fn edit_form_is_filled_with_the_entry() {
        let salary = Income {
            family_member_id: 2,
            month: date!(2024 - 04 - 01),
            ..income(3, "Otieno", "Salary", 60_000.0)
        };

        let html = render(&page(Vec::new(), Some(salary)), None);

        let form = must_get_form(&html, "income-form");
        assert_api_form(&form, "PUT", "/api/income");
        assert_form_input_with_value(&form, "id", "hidden", "3");
        assert_form_input_with_value(&form, "source", "text", "Salary");
        assert_form_input_with_value(&form, "amount", "number", "60000");
        assert_form_input_with_value(&form, "month", "month", "2024-04");
        assert_selected_option(&form, "family_member_id", "2");
    }
}
