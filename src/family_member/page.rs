//! Displays the family members.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    Error,
    db::lock_connection,
    endpoints,
    family_member::{
        api::FamilyMemberState,
        core::{Designation, FamilyMember},
        db::{get_family_member, list_family_members},
    },
    forms::{ApiForm, FormMode, delete_url, form_script, row_actions},
    html::{
        BADGE_STYLE, HtmlQuery, PAGE_CONTAINER_STYLE, PageQuery, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, empty_table_row, filter_form, page_url,
        summary_card,
    },
    navigation::NavBar,
    search::filter_by_search,
};

/// Renders the page listing the family members.
///
/// The `edit` query parameter fills the family member form with that member.
pub async fn get_family_members_page(
    State(state): State<FamilyMemberState>,
    HtmlQuery(query): HtmlQuery<PageQuery>,
) -> Response {
    match load_family_members(&state, &query) {
        Ok((members, editing)) => {
            family_members_view(&members, editing.as_ref(), query.search()).into_response()
        }
        Err(error) => {
            tracing::error!("could not load family members page: {error}");
            error.into_page_response()
        }
    }
}

fn load_family_members(
    state: &FamilyMemberState,
    query: &PageQuery,
) -> Result<(Vec<FamilyMember>, Option<FamilyMember>), Error> {
    let editing = query.edit()?;
    let connection = lock_connection(&state.db_connection)?;

    Ok((
        list_family_members(&connection)?,
        editing
            .map(|id| get_family_member(id, &connection))
            .transpose()?,
    ))
}

/// The `(value, label)` options for choosing a family member in a form.
pub(crate) fn family_member_options(members: &[FamilyMember]) -> Vec<(String, String)> {
    members
        .iter()
        .map(|member| {
            (
                member.id.to_string(),
                format!("{} ({})", member.name, member.designation),
            )
        })
        .collect()
}

fn family_member_form(editing: Option<&FamilyMember>, return_url: &str) -> Markup {
    let form = ApiForm {
        id: "family-member-form",
        record_name: "Family Member",
        api_url: endpoints::FAMILY_MEMBERS_API,
        return_url,
        mode: FormMode::new(editing.map(|member| member.id)),
    };
    let designations: Vec<_> = Designation::ALL
        .iter()
        .map(|designation| (designation.as_str().to_owned(), designation.as_str().to_owned()))
        .collect();

    form.view(html!(
        (form.input("text", "name", "Name", editing.map(|member| member.name.as_str()), true))
        (form.select(
            "designation",
            "Designation",
            &designations,
            editing.map(|member| member.designation.as_str()),
        ))
    ))
}

fn family_members_view(
    members: &[FamilyMember],
    editing: Option<&FamilyMember>,
    search: Option<&str>,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::FAMILY_MEMBERS_VIEW).into_html();
    let shown = filter_by_search(members, search);
    let return_url = page_url(endpoints::FAMILY_MEMBERS_VIEW, None, search, None);

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl"
            {
                h1 class="text-xl font-bold" { "Family Members" }

                div class="grid grid-cols-1 gap-4"
                {
                    (summary_card("Members", &members.len().to_string(), None))
                }

                (family_member_form(editing, &return_url))

                (filter_form(endpoints::FAMILY_MEMBERS_VIEW, None, search))

                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Designation" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                        }
                    }

                    tbody
                    {
                        @for member in &shown {
                            tr class=(TABLE_ROW_STYLE) data-id=(member.id)
                            {
                                th
                                    scope="row"
                                    class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
                                {
                                    (member.name)
                                }
                                td class=(TABLE_CELL_STYLE)
                                {
                                    span class=(BADGE_STYLE) { (member.designation.as_str()) }
                                }
                                td class=(TABLE_CELL_STYLE)
                                {
                                    (row_actions(
                                        &page_url(endpoints::FAMILY_MEMBERS_VIEW, None, search, Some(member.id)),
                                        &delete_url(endpoints::FAMILY_MEMBERS_API, member.id),
                                        &return_url,
                                        &member.name,
                                    ))
                                }
                            }
                        }

                        @if shown.is_empty() {
                            (empty_table_row(3, "No family members found."))
                        }
                    }
                }
            }
        }
    );

    base("Family Members", &[form_script()], &content)
}
