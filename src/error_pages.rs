//! The HTML pages shown when a page request fails.

use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::{Error, html::error_view};

/// An error page with a short description of what went wrong and how to fix it.
pub(crate) struct ErrorPage {
    status: StatusCode,
    title: &'static str,
    description: String,
    fix: String,
}

impl ErrorPage {
    pub(crate) fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            title: "Not Found",
            description: "Something's missing.".to_owned(),
            fix: "We could not find that page. Head back to the dashboard to find your records."
                .to_owned(),
        }
    }

    pub(crate) fn invalid_month(month: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            title: "Bad Request",
            description: format!("\"{month}\" is not a valid month."),
            fix: "Pick a month in the format YYYY-MM and try again.".to_owned(),
        }
    }

    pub(crate) fn bad_request(reason: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            title: "Bad Request",
            description: "We could not understand that request.".to_owned(),
            fix: format!("{reason}. Check the link or form and try again."),
        }
    }

    pub(crate) fn invalid_timezone(timezone: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            title: "Internal Server Error",
            description: "Invalid Timezone Settings".to_owned(),
            fix: format!(
                "Could not get local timezone \"{timezone}\". Check your server settings and \
                ensure the timezone has been set to valid, canonical timezone string"
            ),
        }
    }

    pub(crate) fn internal_error() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            title: "Internal Server Error",
            description: "Sorry, something went wrong.".to_owned(),
            fix: "Try again later or check the server logs.".to_owned(),
        }
    }
}

impl IntoResponse for ErrorPage {
    fn into_response(self) -> Response {
        let header = self.status.as_u16().to_string();
        let page = error_view(self.title, &header, &self.description, &self.fix);

        (self.status, Html(page.into_string())).into_response()
    }
}

/// The rejection for page extractors, rendered as an HTML error page.
pub(crate) struct PageRejection(Error);

impl From<QueryRejection> for PageRejection {
    fn from(rejection: QueryRejection) -> Self {
        Self(Error::from(rejection))
    }
}

impl IntoResponse for PageRejection {
    fn into_response(self) -> Response {
        tracing::debug!("rejected page request: {}", self.0);
        self.0.into_page_response()
    }
}

/// The route handler for the page shown after an unexpected failure.
pub(crate) async fn get_internal_server_error_page() -> Response {
    ErrorPage::internal_error().into_response()
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use scraper::{Html, Selector};

    use crate::test_utils::assert_valid_html;

    use super::ErrorPage;

    async fn render(page: ErrorPage) -> (StatusCode, Html) {
        let response = page.into_response();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("could not read response body");

        (
            status,
            Html::parse_document(&String::from_utf8_lossy(&body)),
        )
    }

    #[tokio::test]
    async fn header_shows_status_code() {
        let (status, html) = render(ErrorPage::not_found()).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_valid_html(&html);
        let header = html
            .select(&Selector::parse("h1").unwrap())
            .next()
            .expect("Could not find header");
        assert_eq!(header.text().collect::<String>().trim(), "404");
    }

    #[tokio::test]
    async fn invalid_month_names_the_month() {
        let (status, html) = render(ErrorPage::invalid_month("2024-13")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("\"2024-13\" is not a valid month."));
    }

    #[tokio::test]
    async fn bad_request_gives_the_reason() {
        let (status, html) =
            render(ErrorPage::bad_request("invalid edit: \"x\" is not a valid ID")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("invalid edit: \"x\" is not a valid ID."));
    }
}
