//! The navigation bar shown at the top of every page.

use maud::{Markup, html};

use crate::endpoints;

/// The pages linked from the navigation bar, in display order.
const PAGES: [(&str, &str); 6] = [
    (endpoints::DASHBOARD_VIEW, "Dashboard"),
    (endpoints::FAMILY_MEMBERS_VIEW, "Family"),
    (endpoints::EXPENSES_VIEW, "Expenses"),
    (endpoints::INCOME_VIEW, "Income"),
    (endpoints::SHOPPING_LIST_VIEW, "Shopping List"),
    (endpoints::SAVINGS_GOALS_VIEW, "Savings Goals"),
];

const CURRENT_LINK_STYLE: &str = "block rounded px-3 py-2 font-semibold text-white \
    bg-blue-700 dark:bg-blue-600";

const LINK_STYLE: &str = "block rounded px-3 py-2 text-gray-900 hover:bg-gray-100 \
    hover:text-blue-700 dark:text-white dark:hover:bg-gray-700";

struct NavLink {
    url: &'static str,
    title: &'static str,
    is_current: bool,
}

impl NavLink {
    fn view(&self) -> Markup {
        let style = if self.is_current {
            CURRENT_LINK_STYLE
        } else {
            LINK_STYLE
        };

        html!(
            a
                href=(self.url)
                class=(style)
                aria-current=[self.is_current.then_some("page")]
            {
                (self.title)
            }
        )
    }
}

/// The site navigation with the link for the page being viewed highlighted.
pub struct NavBar {
    links: Vec<NavLink>,
}

impl NavBar {
    /// Create a navigation bar where the link to `current_page` is highlighted.
    ///
    /// No link is highlighted if `current_page` is not one of the linked pages.
    pub fn new(current_page: &str) -> NavBar {
        let links = PAGES
            .into_iter()
            .map(|(url, title)| NavLink {
                url,
                title,
                is_current: url == current_page,
            })
            .collect();

        NavBar { links }
    }

    pub fn into_html(self) -> Markup {
        html!(
            nav class="bg-white border-b border-gray-200 dark:bg-gray-900 dark:border-gray-700"
            {
                div
                    class="max-w-screen-xl flex flex-wrap items-center justify-between gap-4 mx-auto p-4"
                {
                    a
                        href=(endpoints::ROOT)
                        class="text-2xl font-semibold whitespace-nowrap dark:text-white"
                    {
                        "Household Ledger"
                    }

                    ul class="flex flex-wrap gap-2 text-sm font-medium" aria-label="Primary"
                    {
                        @for link in &self.links {
                            li { (link.view()) }
                        }
                    }
                }
            }
        )
    }
}
