//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/expenses/{expense_id}/toggle-completion',
//! use [format_endpoint].

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The page with the current month's income, expenses and balance.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page listing the family members.
pub const FAMILY_MEMBERS_VIEW: &str = "/family-members";
/// The page listing a month's expenses.
pub const EXPENSES_VIEW: &str = "/expenses";
/// The page listing a month's income.
pub const INCOME_VIEW: &str = "/income";
/// The page listing the shopping list.
pub const SHOPPING_LIST_VIEW: &str = "/shopping-list";
/// The page listing the savings goals.
pub const SAVINGS_GOALS_VIEW: &str = "/savings-goals";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";

/// The prefix shared by every JSON API route.
pub const API_PREFIX: &str = "/api";
/// The route to access family members.
pub const FAMILY_MEMBERS_API: &str = "/api/family-members";
/// The route to access expense categories.
pub const EXPENSE_CATEGORIES_API: &str = "/api/expense-categories";
/// The route to access expenses.
pub const EXPENSES_API: &str = "/api/expenses";
/// The route to mark an expense as completed or not completed.
pub const TOGGLE_EXPENSE_COMPLETION: &str = "/api/expenses/{expense_id}/toggle-completion";
/// The route to access income.
pub const INCOME_API: &str = "/api/income";
/// The route to access shopping categories.
pub const SHOPPING_CATEGORIES_API: &str = "/api/shopping-categories";
/// The route to access shopping items.
pub const SHOPPING_ITEMS_API: &str = "/api/shopping-items";
/// The route to access saving goals.
pub const SAVING_GOALS_API: &str = "/api/saving-goals";
/// The route for a month's income and expense totals.
pub const DASHBOARD_API: &str = "/api/dashboard";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/expenses/{expense_id}', '{expense_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
