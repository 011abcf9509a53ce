//! Application router configuration for the JSON API and the HTML pages.

use axum::{
    Router,
    http::Uri,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};

use crate::{
    AppState, Error,
    category::{
        create_expense_category_endpoint, create_shopping_category_endpoint,
        delete_expense_category_endpoint, delete_shopping_category_endpoint,
        list_expense_categories_endpoint, list_shopping_categories_endpoint,
        update_expense_category_endpoint, update_shopping_category_endpoint,
    },
    dashboard::{get_dashboard_endpoint, get_dashboard_page},
    endpoints,
    error_pages::{ErrorPage, get_internal_server_error_page},
    expense::{
        create_expense_endpoint, delete_expense_endpoint, get_expenses_page,
        list_expenses_endpoint, toggle_expense_completion_endpoint, update_expense_endpoint,
    },
    family_member::{
        create_family_member_endpoint, delete_family_member_endpoint, get_family_members_page,
        list_family_members_endpoint, update_family_member_endpoint,
    },
    income::{
        create_income_endpoint, delete_income_endpoint, get_income_page, list_income_endpoint,
        update_income_endpoint,
    },
    saving_goal::{
        create_saving_goal_endpoint, delete_saving_goal_endpoint, get_savings_goals_page,
        list_saving_goals_endpoint, update_saving_goal_endpoint,
    },
    shopping::{
        create_shopping_item_endpoint, delete_shopping_item_endpoint, get_shopping_list_page,
        list_shopping_items_endpoint, update_shopping_item_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let page_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::FAMILY_MEMBERS_VIEW, get(get_family_members_page))
        .route(endpoints::EXPENSES_VIEW, get(get_expenses_page))
        .route(endpoints::INCOME_VIEW, get(get_income_page))
        .route(endpoints::SHOPPING_LIST_VIEW, get(get_shopping_list_page))
        .route(endpoints::SAVINGS_GOALS_VIEW, get(get_savings_goals_page))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let api_routes = Router::new()
        .route(
            endpoints::FAMILY_MEMBERS_API,
            get(list_family_members_endpoint)
                .post(create_family_member_endpoint)
                .put(update_family_member_endpoint)
                .delete(delete_family_member_endpoint),
        )
        .route(
            endpoints::EXPENSE_CATEGORIES_API,
            get(list_expense_categories_endpoint)
                .post(create_expense_category_endpoint)
                .put(update_expense_category_endpoint)
                .delete(delete_expense_category_endpoint),
        )
        .route(
            endpoints::EXPENSES_API,
            get(list_expenses_endpoint)
                .post(create_expense_endpoint)
                .put(update_expense_endpoint)
                .delete(delete_expense_endpoint),
        )
        .route(
            endpoints::TOGGLE_EXPENSE_COMPLETION,
            post(toggle_expense_completion_endpoint),
        )
        .route(
            endpoints::INCOME_API,
            get(list_income_endpoint)
                .post(create_income_endpoint)
                .put(update_income_endpoint)
                .delete(delete_income_endpoint),
        )
        .route(
            endpoints::SHOPPING_CATEGORIES_API,
            get(list_shopping_categories_endpoint)
                .post(create_shopping_category_endpoint)
                .put(update_shopping_category_endpoint)
                .delete(delete_shopping_category_endpoint),
        )
        .route(
            endpoints::SHOPPING_ITEMS_API,
            get(list_shopping_items_endpoint)
                .post(create_shopping_item_endpoint)
                .put(update_shopping_item_endpoint)
                .delete(delete_shopping_item_endpoint),
        )
        .route(
            endpoints::SAVING_GOALS_API,
            get(list_saving_goals_endpoint)
                .post(create_saving_goal_endpoint)
                .put(update_saving_goal_endpoint)
                .delete(delete_saving_goal_endpoint),
        )
        .route(endpoints::DASHBOARD_API, get(get_dashboard_endpoint));

    page_routes
        .merge(api_routes)
        .fallback(get_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}

/// API clients get the JSON error body, everyone else gets the 404 page.
async fn get_not_found(uri: Uri) -> Response {
    let path = uri.path();

    if path == endpoints::API_PREFIX || path.starts_with(&format!("{}/", endpoints::API_PREFIX)) {
        Error::NotFound.into_response()
    } else {
        ErrorPage::not_found().into_response()
    }
}

#[cfg(test)]
mod root_route_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::{endpoints, routing::get_index_page};

    #[tokio::test]
    async fn root_redirects_to_dashboard() {
        let response = get_index_page().await.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let location = response.headers().get("location").unwrap();
        assert_eq!(location, endpoints::DASHBOARD_VIEW);
    }
}
