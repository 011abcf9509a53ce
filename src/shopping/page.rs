//! Displays the shopping list.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    Error,
    app_state::local_timezone,
    category::{Category, CategoryKind, list_categories},
    dates::Month,
    db::lock_connection,
    endpoints,
    forms::{ApiForm, FormMode, delete_url, form_script, row_actions},
    html::{
        BADGE_STYLE, HtmlQuery, PAGE_CONTAINER_STYLE, PageQuery, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, empty_table_row, filter_form, format_currency,
        format_month_title, month_navigation, page_url, summary_card,
    },
    navigation::NavBar,
    search::filter_by_search,
    shopping::{
        api::ShoppingState,
        core::ShoppingItem,
        db::{get_shopping_item, list_shopping_items},
    },
    summary::ShoppingSummary,
};

/// Renders the shopping list for every month, or only the month given by the
/// `month` query parameter.
///
/// The `edit` query parameter fills the item form with that item.
pub async fn get_shopping_list_page(
    State(state): State<ShoppingState>,
    HtmlQuery(query): HtmlQuery<PageQuery>,
) -> Response {
    match load_items(&state, &query) {
        Ok(page) => shopping_list_view(&page, query.search()).into_response(),
        Err(error) => {
            tracing::error!("could not load shopping list page: {error}");
            error.into_page_response()
        }
    }
}

struct ShoppingListPage {
    /// The month being shown, or `None` for every month.
    month: Option<Month>,
    /// The month new items are added to.
    current_month: Month,
    items: Vec<ShoppingItem>,
    categories: Vec<Category>,
    editing: Option<ShoppingItem>,
}

fn load_items(state: &ShoppingState, query: &PageQuery) -> Result<ShoppingListPage, Error> {
    let month = Month::parse_optional(query.month.as_deref())?;
    let current_month = Month::current(local_timezone(&state.local_timezone)?);
    let editing = query.edit()?;
    let connection = lock_connection(&state.db_connection)?;

    Ok(ShoppingListPage {
        month,
        current_month,
        items: list_shopping_items(month, &connection)?,
        categories: list_categories(CategoryKind::Shopping, &connection)?,
        editing: editing
            .map(|id| get_shopping_item(id, &connection))
            .transpose()?,
    })
}

fn item_form(page: &ShoppingListPage, return_url: &str) -> Markup {
    let editing = page.editing.as_ref();
    let form = ApiForm {
        id: "shopping-item-form",
        record_name: "Item",
        api_url: endpoints::SHOPPING_ITEMS_API,
        return_url,
        mode: FormMode::new(editing.map(|item| item.id)),
    };
    let category_options: Vec<_> = page
        .categories
        .iter()
        .map(|category| (category.id.to_string(), category.name.clone()))
        .collect();
    let selected_category = editing.map(|item| item.category_id.to_string());
    let quantity = editing.map_or_else(|| "1".to_owned(), |item| item.quantity.to_string());
    let month = match editing {
        Some(item) => Month::containing(item.month),
        None => page.month.unwrap_or(page.current_month),
    }
    .to_string();

    form.view(html!(
        (form.select("category_id", "Category", &category_options, selected_category.as_deref()))
        (form.input("text", "name", "Name", editing.map(|item| item.name.as_str()), true))
        (form.input("number", "quantity", "Quantity", Some(&quantity), true))
        (form.amount_input(
            "estimated_price",
            "Estimated Price",
            editing.map(|item| item.estimated_price),
            true,
        ))
        (form.input("text", "notes", "Notes", editing.and_then(|item| item.notes.as_deref()), false))
        (form.input("month", "month", "Month", Some(&month), true))
    ))
}

fn category_form(return_url: &str) -> Markup {
    let form = ApiForm {
        id: "shopping-category-form",
        record_name: "Category",
        api_url: endpoints::SHOPPING_CATEGORIES_API,
        return_url,
        mode: FormMode::Create,
    };

    form.view(form.input("text", "name", "Category Name", None, true))
}

fn shopping_list_view(page: &ShoppingListPage, search: Option<&str>) -> Markup {
    let month = page.month;
    let nav_bar = NavBar::new(endpoints::SHOPPING_LIST_VIEW).into_html();
    let summary = ShoppingSummary::new(&page.items);
    let shown = filter_by_search(&page.items, search);
    let return_url = page_url(endpoints::SHOPPING_LIST_VIEW, month, search, None);

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl"
            {
                h1 class="text-xl font-bold" { "Shopping List" }

                @if let Some(month) = month {
                    (month_navigation(endpoints::SHOPPING_LIST_VIEW, month, search))
                }

                div class="grid grid-cols-2 md:grid-cols-4 gap-4"
                {
                    (summary_card("Estimated Total", &format_currency(summary.total_estimated_price), None))
                    (summary_card("Items", &summary.count.to_string(), None))
                    (summary_card("Total Quantity", &summary.total_quantity.to_string(), None))
                    (summary_card("Average Price", &format_currency(summary.average_price), Some("per item")))
                }

                (item_form(page, &return_url))

                @if page.editing.is_none() {
                    (category_form(&return_url))
                }

                (filter_form(endpoints::SHOPPING_LIST_VIEW, month, search))

                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Item" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                            th scope="col" class="px-6 py-3 text-right" { "Quantity" }
                            th scope="col" class="px-6 py-3 text-right" { "Estimated Price" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Notes" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Month" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                        }
                    }

                    tbody
                    {
                        @for item in &shown {
                            tr class=(TABLE_ROW_STYLE) data-id=(item.id)
                            {
                                th
                                    scope="row"
                                    class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
                                {
                                    (item.name)
                                }
                                td class=(TABLE_CELL_STYLE)
                                {
                                    span class=(BADGE_STYLE) { (item.category_name) }
                                }
                                td class="px-6 py-4 text-right" { (item.quantity) }
                                td class="px-6 py-4 text-right" { (format_currency(item.estimated_price)) }
                                td class=(TABLE_CELL_STYLE) { (item.notes.as_deref().unwrap_or_default()) }
                                td class=(TABLE_CELL_STYLE)
                                {
                                    (format_month_title(Month::containing(item.month)))
                                }
                                td class=(TABLE_CELL_STYLE)
                                {
                                    (row_actions(
                                        &page_url(endpoints::SHOPPING_LIST_VIEW, month, search, Some(item.id)),
                                        &delete_url(endpoints::SHOPPING_ITEMS_API, item.id),
                                        &return_url,
                                        &item.name,
                                    ))
                                }
                            }
                        }

                        @if shown.is_empty() {
                            (empty_table_row(7, "The shopping list is empty."))
                        }
                    }
                }
            }
        }
    );

    base("Shopping List", &[form_script()], &content)
}

#[cfg(test)]
mod view_tests {
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::{
        category::Category,
        dates::Month,
        shopping::core::ShoppingItem,
        test_utils::{
            assert_api_form, assert_form_input_with_value, assert_selected_option,
            assert_valid_html, must_get_form,
        },
    };

    use super::{ShoppingListPage, shopping_list_view};

    fn item(id: i64, name: &str, quantity: i64, estimated_price: f64) -> ShoppingItem {
        ShoppingItem {
            id,
            name: name.to_owned(),
            quantity,
            estimated_price,
            notes: None,
            category_id: 1,
            category_name: "Groceries".to_owned(),
            month: date!(2024 - 05 - 01),
        }
    }

    fn page(month: Option<Month>, items: Vec<ShoppingItem>) -> ShoppingListPage {
        ShoppingListPage {
            month,
            current_month: Month::parse("2024-06").unwrap(),
            items,
            categories: vec![
                Category {
                    id: 1,
                    name: "Groceries".to_owned(),
                },
                Category {
                    id: 2,
                    name: "Cleaning".to_owned(),
                },
            ],
            editing: None,
        }
    }

    fn render(page: &ShoppingListPage) -> Html {
        let html = Html::parse_document(&shopping_list_view(page, None).into_string());
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
    fn summarises_every_item() {
        let items = vec![item(1, "Sugar", 2, 360.0), item(2, "Flour", 1, 240.0)];

        let html = render(&page(None, items));

        assert_eq!(summary_value(&html, "Estimated Total"), "KES 600.00");
        assert_eq!(summary_value(&html, "Items"), "2");
        assert_eq!(summary_value(&html, "Total Quantity"), "3");
        assert_eq!(summary_value(&html, "Average Price"), "KES 300.00");
    }

    #[test]
    fn huge_quantities_do_not_overflow() {
        let items = vec![item(1, "Rice", i64::MAX, 1.0), item(2, "Beans", i64::MAX, 1.0)];

        let html = render(&page(None, items));

        assert_eq!(summary_value(&html, "Total Quantity"), i64::MAX.to_string());
    }

    #[test]
    fn month_navigation_only_shown_for_a_month() {
        let selector = Selector::parse("nav[aria-label='Month']").unwrap();

        let all_months = render(&page(None, Vec::new()));
        let one_month = render(&page(Some(Month::parse("2024-05").unwrap()), Vec::new()));

        assert!(all_months.select(&selector).next().is_none());
        assert!(one_month.select(&selector).next().is_some());
    }

    #[test]
    fn create_form_defaults_to_the_viewed_month() {
        let all_months = render(&page(None, Vec::new()));
        let one_month = render(&page(Some(Month::parse("2024-05").unwrap()), Vec::new()));

        let form = must_get_form(&all_months, "shopping-item-form");
        assert_api_form(&form, "POST", "/api/shopping-items");
        assert_form_input_with_value(&form, "month", "month", "2024-06");
        assert_form_input_with_value(&form, "quantity", "number", "1");
        let form = must_get_form(&one_month, "shopping-item-form");
        assert_form_input_with_value(&form, "month", "month", "2024-05");
        let category_form = must_get_form(&one_month, "shopping-category-form");
        assert_api_form(&category_form, "POST", "/api/shopping-categories");
    }

    #[test]
    fn edit_form_is_filled_with_the_item() {
        let soap = ShoppingItem {
            category_id: 2,
            category_name: "Cleaning".to_owned(),
            notes: Some("Bar soap".to_owned()),
            ..item(5, "Soap", 3, 120.0)
        };
        let page = ShoppingListPage {
            editing: Some(soap.clone()),
            ..page(None, vec![soap])
        };

        let html = render(&page);

        let form = must_get_form(&html, "shopping-item-form");
        assert_api_form(&form, "PUT", "/api/shopping-items");
        assert_form_input_with_value(&form, "id", "hidden", "5");
        assert_form_input_with_value(&form, "name", "text", "Soap");
        assert_form_input_with_value(&form, "quantity", "number", "3");
        assert_form_input_with_value(&form, "estimated_price", "number", "120");
        assert_form_input_with_value(&form, "notes", "text", "Bar soap");
        assert_form_input_with_value(&form, "month", "month", "2024-05");
        assert_selected_option(&form, "category_id", "2");
        assert!(
            html.select(&Selector::parse("#shopping-category-form").unwrap())
                .next()
                .is_none()
        );
    }

    #[test]
    fn rows_link_to_edit_and_delete() {
        let html = render(&page(
            Some(Month::parse("2024-05").unwrap()),
            vec![item(1, "Sugar", 2, 360.0)],
        ));

        let edit = html
            .select(&Selector::parse("tbody a").unwrap())
            .next()
            .expect("Could not find edit link");
        let delete = html
            .select(&Selector::parse("tbody button[data-delete-url]").unwrap())
            .next()
            .expect("Could not find delete button");
        assert_eq!(edit.value().attr("href"), Some("/shopping-list?month=2024-05&edit=1"));
        assert_eq!(
            delete.value().attr("data-delete-url"),
            Some("/api/shopping-items?id=1")
        );
        assert_eq!(
            delete.value().attr("data-return-url"),
            Some("/shopping-list?month=2024-05")
        );
    }
}

#[cfg(test)]
mod endpoint_tests {
    use axum::http::StatusCode;
    use scraper::{Html, Selector};
    use serde_json::json;

    use crate::{
        endpoints,
        test_utils::{assert_valid_html, get_test_server, get_test_state},
    };

    #[tokio::test]
    async fn renders_page() {
        let server = get_test_server(get_test_state());

        let response = server.get(endpoints::SHOPPING_LIST_VIEW).await;

        response.assert_status_ok();
        assert_valid_html(&Html::parse_document(&response.text()));
    }

    #[tokio::test]
    async fn renders_items_with_huge_quantities() {
        let server = get_test_server(get_test_state());
        let category_id = server
            .post(endpoints::SHOPPING_CATEGORIES_API)
            .json(&json!({"name": "Groceries"}))
            .await
            .json::<serde_json::Value>()["id"]
            .clone();
        for name in ["Rice", "Beans"] {
            server
                .post(endpoints::SHOPPING_ITEMS_API)
                .json(&json!({
                    "name": name,
                    "quantity": i64::MAX,
                    "estimated_price": 1,
                    "category_id": category_id,
                    "month": "2024-05"
                }))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let response = server.get(endpoints::SHOPPING_LIST_VIEW).await;

        response.assert_status_ok();
        let html = Html::parse_document(&response.text());
        let total_quantity = html
            .select(&Selector::parse("[data-summary='Total Quantity'] p").unwrap())
            .next()
            .expect("Could not find total quantity");
        assert_eq!(
            total_quantity.text().collect::<String>().trim(),
            i64::MAX.to_string()
        );
    }

    #[tokio::test]
    async fn malformed_query_shows_error_page() {
        let server = get_test_server(get_test_state());

        let response = server
            .get(endpoints::SHOPPING_LIST_VIEW)
            .add_raw_query_param("search=a&search=b")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_valid_html(&Html::parse_document(&response.text()));
    }
}
