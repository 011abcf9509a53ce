//! Displays the saving goals.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    Error,
    dates::format_date,
    db::lock_connection,
    endpoints,
    family_member::{FamilyMember, family_member_options, list_family_members},
    forms::{ApiForm, FormMode, delete_url, form_script, row_actions},
    html::{
        BADGE_STYLE, HtmlQuery, PAGE_CONTAINER_STYLE, PageQuery, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, empty_table_row, filter_form, format_currency,
        page_url, summary_card,
    },
    navigation::NavBar,
    saving_goal::{
        api::SavingGoalState,
        core::{GoalStatus, GoalType, SavingGoal},
        db::{get_saving_goal, list_saving_goals},
    },
    search::filter_by_search,
    summary::SavingGoalSummary,
};

/// Renders the page listing every saving goal.
///
/// The `edit` query parameter fills the saving goal form with that goal.
pub async fn get_savings_goals_page(
    State(state): State<SavingGoalState>,
    HtmlQuery(query): HtmlQuery<PageQuery>,
) -> Response {
    match load_saving_goals(&state, &query) {
        Ok(page) => savings_goals_view(&page, query.search()).into_response(),
        Err(error) => {
            tracing::error!("could not load saving goals page: {error}");
            error.into_page_response()
        }
    }
}

struct SavingGoalsPage {
    goals: Vec<SavingGoal>,
    family_members: Vec<FamilyMember>,
    editing: Option<SavingGoal>,
}

fn load_saving_goals(state: &SavingGoalState, query: &PageQuery) -> Result<SavingGoalsPage, Error> {
    let editing = query.edit()?;
    let connection = lock_connection(&state.db_connection)?;

    Ok(SavingGoalsPage {
        goals: list_saving_goals(&connection)?,
        family_members: list_family_members(&connection)?,
        editing: editing
            .map(|id| get_saving_goal(id, &connection))
            .transpose()?,
    })
}

fn saving_goal_form(page: &SavingGoalsPage, return_url: &str) -> Markup {
    let editing = page.editing.as_ref();
    let form = ApiForm {
        id: "saving-goal-form",
        record_name: "Savings Goal",
        api_url: endpoints::SAVING_GOALS_API,
        return_url,
        mode: FormMode::new(editing.map(|goal| goal.id)),
    };
    let selected_member = editing.map(|goal| goal.family_member_id.to_string());
    let start_date = editing.map(|goal| format_date(goal.start_date));
    let end_date = editing
        .and_then(|goal| goal.end_date)
        .map(format_date);
    let goal_types: Vec<_> = GoalType::ALL
        .iter()
        .map(|goal_type| (goal_type.as_str().to_owned(), goal_type.label().to_owned()))
        .collect();
    let statuses: Vec<_> = GoalStatus::ALL
        .iter()
        .map(|status| (status.as_str().to_owned(), status.as_str().to_owned()))
        .collect();
    let status = editing.map_or(GoalStatus::Active, |goal| goal.status);

    form.view(html!(
        (form.select(
            "family_member_id",
            "Family Member",
            &family_member_options(&page.family_members),
            selected_member.as_deref(),
        ))
        (form.input("text", "name", "Name", editing.map(|goal| goal.name.as_str()), true))
        (form.input(
            "text",
            "description",
            "Description",
            editing.and_then(|goal| goal.description.as_deref()),
            false,
        ))
        (form.amount_input(
            "target_amount",
            "Target Amount",
            editing.map(|goal| goal.target_amount),
            true,
        ))
        (form.input("date", "start_date", "Start Date", start_date.as_deref(), true))
        (form.input("date", "end_date", "End Date", end_date.as_deref(), false))
        (form.select(
            "goal_type",
            "Type",
            &goal_types,
            editing.map(|goal| goal.goal_type.as_str()),
        ))
        (form.select("status", "Status", &statuses, Some(status.as_str())))
    ))
}

fn savings_goals_view(page: &SavingGoalsPage, search: Option<&str>) -> Markup {
    let nav_bar = NavBar::new(endpoints::SAVINGS_GOALS_VIEW).into_html();
    let summary = SavingGoalSummary::new(&page.goals);
    let shown = filter_by_search(&page.goals, search);
    let return_url = page_url(endpoints::SAVINGS_GOALS_VIEW, None, search, None);

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl"
            {
                h1 class="text-xl font-bold" { "Savings Goals" }

                div class="grid grid-cols-2 md:grid-cols-4 gap-4"
                {
                    (summary_card("Total Target", &format_currency(summary.total_target), None))
                    (summary_card("Active", &summary.active_count.to_string(), None))
                    (summary_card("Completed", &summary.completed_count.to_string(), None))
                    (summary_card("Goals", &summary.count.to_string(), None))
                }

                (saving_goal_form(page, &return_url))

                (filter_form(endpoints::SAVINGS_GOALS_VIEW, None, search))

                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Goal" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Family Member" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                            th scope="col" class="px-6 py-3 text-right" { "Target" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Dates" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Status" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                        }
                    }

                    tbody
                    {
                        @for goal in &shown {
                            tr class=(TABLE_ROW_STYLE) data-id=(goal.id)
                            {
                                th
                                    scope="row"
                                    class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
                                {
                                    (goal.name)

                                    @if let Some(description) = &goal.description {
                                        p class="text-xs font-normal text-gray-500 dark:text-gray-400"
                                        {
                                            (description)
                                        }
                                    }
                                }
                                td class=(TABLE_CELL_STYLE) { (goal.family_member_name) }
                                td class=(TABLE_CELL_STYLE) { (goal.goal_type.label()) }
                                td class="px-6 py-4 text-right" { (format_currency(goal.target_amount)) }
                                td class=(TABLE_CELL_STYLE)
                                {
                                    (format_date(goal.start_date))
                                    @if let Some(end_date) = goal.end_date {
                                        " to " (format_date(end_date))
                                    }
                                }
                                td class=(TABLE_CELL_STYLE)
                                {
                                    span class=(BADGE_STYLE) data-status=(goal.status.as_str())
                                    {
                                        (goal.status.as_str())
                                    }
                                }
                                td class=(TABLE_CELL_STYLE)
                                {
                                    (row_actions(
                                        &page_url(endpoints::SAVINGS_GOALS_VIEW, None, search, Some(goal.id)),
                                        &delete_url(endpoints::SAVING_GOALS_API, goal.id),
                                        &return_url,
                                        &goal.name,
                                    ))
                                }
                            }
                        }

                        @if shown.is_empty() {
                            (empty_table_row(7, "No savings goals found."))
                        }
                    }
                }
            }
        }
    );

    base("Savings Goals", &[form_script()], &content)
}


#[cfg(test)]
mod endpoint_tests {
    use axum::http::StatusCode;
    use scraper::Html;

    use crate::{
        endpoints,
        test_utils::{assert_valid_html, get_test_server, get_test_state},
    };

    #[tokio::test]
    async fn renders_page() {
        let server = get_test_server(get_test_state());

        let response = server.get(endpoints::SAVINGS_GOALS_VIEW).await;

        response.assert_status_ok();
        assert_valid_html(&Html::parse_document(&response.text()));
    }

    #[tokio::test]
    async fn editing_an_unknown_goal_is_not_found() {
        let server = get_test_server(get_test_state());

        server
            .get(endpoints::SAVINGS_GOALS_VIEW)
            .add_query_param("edit", 404)
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
