#![allow(missing_docs)]

use axum_test::TestServer;
use rusqlite::Connection;
use scraper::{ElementRef, Html, Selector};

use crate::{AppState, build_router};

/// An app state backed by a fresh in-memory database, using UTC as the local timezone.
pub(crate) fn get_test_state() -> AppState {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");

    AppState::new(connection, "Etc/UTC").expect("Could not create app state")
}

pub(crate) fn get_test_server(state: AppState) -> TestServer {
    TestServer::try_new(build_router(state)).expect("Could not create test server.")
}

#[track_caller]
pub(crate) fn assert_valid_html(html: &Html) {
    assert!(
        html.errors.is_empty(),
        "Got HTML parsing errors: {:?}",
        html.errors
    );
}

#[track_caller]
pub(crate) fn must_get_form<'a>(html: &'a Html, form_id: &str) -> ElementRef<'a> {
    html.select(&Selector::parse(&format!("form#{form_id}")).unwrap())
        .next()
        .unwrap_or_else(|| panic!("No form found with ID \"{form_id}\""))
}

#[track_caller]
pub(crate) fn assert_api_form(form: &ElementRef, method: &str, endpoint: &str) {
    let got_endpoint = form
        .value()
        .attr("data-api-url")
        .expect("data-api-url attribute missing");
    let got_method = form
        .value()
        .attr("data-api-method")
        .expect("data-api-method attribute missing");

    assert_eq!(
        got_endpoint, endpoint,
        "want form with attribute data-api-url=\"{endpoint}\", got {got_endpoint:?}"
    );
    assert_eq!(
        got_method, method,
        "want form with attribute data-api-method=\"{method}\", got {got_method:?}"
    );
}

#[track_caller]
pub(crate) fn assert_form_input_with_value(
    form: &ElementRef,
    name: &str,
    type_: &str,
    value: &str,
) {
    for input in form.select(&Selector::parse("input").unwrap()) {
        if input.value().attr("name") != Some(name) {
            continue;
        }

        let input_type = input.value().attr("type").unwrap_or_default();
        let input_value = input.value().attr("value").unwrap_or_default();

        assert_eq!(
            input_type, type_,
            "want input {name} with type \"{type_}\", got {input_type:?}"
        );
        assert_eq!(
            input_value, value,
            "want input {name} with value \"{value}\", got {input_value:?}"
        );

        return;
    }

    panic!("No input found with name \"{name}\" and type \"{type_}\"");
}

#[track_caller]
pub(crate) fn assert_selected_option(form: &ElementRef, name: &str, value: &str) {
    let selector = Selector::parse(&format!("select[name='{name}'] option[selected]")).unwrap();
    let selected: Vec<_> = form
        .select(&selector)
        .map(|option| option.value().attr("value").unwrap_or_default())
        .collect();

    assert_eq!(
        selected,
        vec![value],
        "want \"{value}\" selected in {name}, got {selected:?}"
    );
}
