//! Create and edit forms for the list pages.
//!
//! A form sends its fields to a JSON API route as an object of strings, which
//! the API payloads accept as they are. The script from [form_script] does the
//! sending and opens the form's return URL once the API accepts the change.

use maud::{Markup, PreEscaped, html};

use crate::{
    database_id::DatabaseId,
    html::{BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, HeadElement, LINK_STYLE},
};

const FORM_STYLE: &str = "w-full space-y-4 rounded border border-gray-200 bg-white p-4 \
    shadow-sm dark:border-gray-700 dark:bg-gray-800";

const DELETE_BUTTON_STYLE: &str = "text-red-600 hover:underline dark:text-red-500";

const FORM_SCRIPT: &str = r#"
async function sendJson(url, method, body) {
    const response = await fetch(url, {
        method: method,
        headers: { "Content-Type": "application/json" },
        body: body === undefined ? undefined : JSON.stringify(body),
    });

    if (response.ok) {
        return null;
    }

    const problem = await response.json().catch(() => ({}));
    return problem.message || "Something went wrong, please try again.";
}

document.addEventListener("submit", async (event) => {
    const form = event.target.closest("form[data-api-url]");
    if (!form) return;
    event.preventDefault();

    const body = Object.fromEntries(new FormData(form));
    const error = await sendJson(form.dataset.apiUrl, form.dataset.apiMethod, body);

    if (error === null) {
        window.location.assign(form.dataset.returnUrl);
    } else {
        form.querySelector("[role=alert]").textContent = error;
    }
});

document.addEventListener("change", async (event) => {
    const toggle = event.target.closest("input[data-toggle-url]");
    if (!toggle) return;

    const error = await sendJson(toggle.dataset.toggleUrl, "POST", { completed: toggle.checked });

    if (error === null) {
        window.location.reload();
    } else {
        toggle.checked = !toggle.checked;
        window.alert(error);
    }
});

document.addEventListener("click", async (event) => {
    const button = event.target.closest("button[data-delete-url]");
    if (!button || !window.confirm(button.dataset.confirm)) return;

    const error = await sendJson(button.dataset.deleteUrl, "DELETE");

    if (error === null) {
        window.location.assign(button.dataset.returnUrl);
    } else {
        window.alert(error);
    }
});
"#;

/// The script that submits the API forms and handles the actions in table rows.
pub(crate) fn form_script() -> HeadElement {
    HeadElement::ScriptSource(PreEscaped(FORM_SCRIPT.to_owned()))
}

/// Whether a form adds a new record or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FormMode {
    Create,
    Edit(DatabaseId),
}

impl FormMode {
    pub(crate) fn new(editing: Option<DatabaseId>) -> Self {
        editing.map_or(FormMode::Create, FormMode::Edit)
    }

    fn method(self) -> &'static str {
        match self {
            FormMode::Create => "POST",
            FormMode::Edit(_) => "PUT",
        }
    }
}

/// A form for one kind of record that is sent to `api_url`.
pub(crate) struct ApiForm<'a> {
    /// The HTML ID of the form, also used to prefix the IDs of its inputs.
    pub id: &'a str,
    /// What the record is called in headings and buttons, e.g. "Expense".
    pub record_name: &'a str,
    pub api_url: &'a str,
    /// Where to go once the record has been saved.
    pub return_url: &'a str,
    pub mode: FormMode,
}

impl ApiForm<'_> {
    /// The form with `fields` laid out in a grid.
    ///
    /// In edit mode the ID of the record is sent as a hidden `id` field and a
    /// link back to `return_url` cancels the edit.
    pub(crate) fn view(&self, fields: Markup) -> Markup {
        let (title, submit_label) = match self.mode {
            FormMode::Create => (
                format!("Add {}", self.record_name),
                format!("Add {}", self.record_name),
            ),
            FormMode::Edit(_) => (format!("Edit {}", self.record_name), "Save Changes".to_owned()),
        };

        html!(
            form
                id=(self.id)
                class=(FORM_STYLE)
                data-api-url=(self.api_url)
                data-api-method=(self.mode.method())
                data-return-url=(self.return_url)
            {
                h2 class="text-lg font-semibold" { (title) }

                @if let FormMode::Edit(id) = self.mode {
                    input type="hidden" name="id" value=(id);
                }

                div class="grid grid-cols-1 md:grid-cols-2 gap-4" { (fields) }

                p role="alert" class="text-sm text-red-600 dark:text-red-400" {}

                div class="flex items-center gap-4"
                {
                    button type="submit" class=(BUTTON_PRIMARY_STYLE) { (submit_label) }

                    @if let FormMode::Edit(_) = self.mode {
                        a href=(self.return_url) class=(LINK_STYLE) { "Cancel" }
                    }
                }
            }
        )
    }

    fn field_id(&self, name: &str) -> String {
        format!("{}-{name}", self.id)
    }

    /// An `<input>` of `input_type`, e.g. "text" or "date".
    pub(crate) fn input(
        &self,
        input_type: &str,
        name: &str,
        label: &str,
        value: Option<&str>,
        required: bool,
    ) -> Markup {
        let id = self.field_id(name);

        html!(
            div
            {
                label for=(id) class=(FORM_LABEL_STYLE) { (label) }
                input
                    id=(id)
                    type=(input_type)
                    name=(name)
                    value=[value]
                    required[required]
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        )
    }

    /// A number input for amounts of money, which may not be negative.
    pub(crate) fn amount_input(
        &self,
        name: &str,
        label: &str,
        value: Option<f64>,
        required: bool,
    ) -> Markup {
        let id = self.field_id(name);

        html!(
            div
            {
                label for=(id) class=(FORM_LABEL_STYLE) { (label) }
                input
                    id=(id)
                    type="number"
                    name=(name)
                    min="0"
                    step="0.01"
                    value=[value]
                    required[required]
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        )
    }

    /// A drop-down of `(value, label)` options with `selected` chosen.
    ///
    /// Until something is chosen the drop-down shows an empty placeholder option.
    pub(crate) fn select(
        &self,
        name: &str,
        label: &str,
        options: &[(String, String)],
        selected: Option<&str>,
    ) -> Markup {
        let id = self.field_id(name);

        html!(
            div
            {
                label for=(id) class=(FORM_LABEL_STYLE) { (label) }
                select id=(id) name=(name) required class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" selected[selected.is_none()] { "Choose..." }

                    @for (value, option_label) in options {
                        option value=(value) selected[selected == Some(value.as_str())]
                        {
                            (option_label)
                        }
                    }
                }
            }
        )
    }
}

/// The edit link and delete button for a row in a table of records.
///
/// `delete_url` is the API route that deletes the record, after which the
/// browser opens `return_url`.
pub(crate) fn row_actions(
    edit_url: &str,
    delete_url: &str,
    return_url: &str,
    record_label: &str,
) -> Markup {
    html!(
        div class="flex gap-3"
        {
            a href=(edit_url) class=(LINK_STYLE) { "Edit" }
            button
                type="button"
                class=(DELETE_BUTTON_STYLE)
                data-delete-url=(delete_url)
                data-return-url=(return_url)
                data-confirm=(format!("Delete {record_label}?"))
            {
                "Delete"
            }
        }
    )
}

/// The URL that deletes the record with `id` through the API at `api_url`.
pub(crate) fn delete_url(api_url: &str, id: DatabaseId) -> String {
    format!("{api_url}?id={id}")
}
