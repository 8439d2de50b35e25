use maud::{DOCTYPE, Markup, PreEscaped, html};

// Link styles
pub const LINK_STYLE: &str = "text-blue-600 hover:text-blue-500 \
    dark:text-blue-500 dark:hover:text-blue-400 underline";

// Button styles
pub const BUTTON_PRIMARY_STYLE: &str = "w-full px-4 py-2 bg-blue-500
    dark:bg-blue-600 disabled:bg-blue-700 hover:enabled:bg-blue-600 \
    hover:enabled:dark:bg-blue-700 text-white rounded";

pub const BUTTON_SECONDARY_STYLE: &str = "w-full py-2.5 px-5 mb-2 \
    text-sm font-medium text-gray-900 bg-white rounded border border-gray-200 \
    hover:bg-gray-100 hover:text-blue-700 focus:z-10 dark:bg-gray-800 \
    dark:text-gray-400 dark:border-gray-600 dark:hover:text-white \
    dark:hover:bg-gray-700";

pub const BUTTON_DELETE_STYLE: &str = "text-red-600 hover:text-red-500 \
    dark:text-red-500 dark:hover:text-red-400 underline bg-transparent \
    border-none cursor-pointer";

// Form styles
pub const FORM_CONTAINER_STYLE: &str = "flex flex-col items-center px-6 py-8 \
    mx-auto lg:py-0 max-w-md text-gray-900 dark:text-white";
pub const FORM_LABEL_STYLE: &str = "block mb-2 text-sm font-medium text-gray-900 dark:text-white";
pub const FORM_TEXT_INPUT_STYLE: &str = "block w-full p-2.5 rounded text-sm \
    text-gray-900 dark:text-white disabled:text-gray-500 bg-gray-50 \
    dark:bg-gray-700 border border-gray-300 dark:border-gray-600 \
    dark:placeholder-gray-400 focus:ring-blue-600 focus:border-blue-600 \
    focus:dark:border-blue-500 focus:dark:ring-blue-500";
pub const FORM_ERROR_STYLE: &str = "text-red-500 text-base empty:hidden";

// Table styles
pub const TABLE_HEADER_STYLE: &str = "text-xs text-gray-700 uppercase \
    bg-gray-50 dark:bg-gray-700 dark:text-gray-400";

pub const TABLE_ROW_STYLE: &str = "bg-white border-b dark:bg-gray-800 dark:border-gray-700";

pub const TABLE_CELL_STYLE: &str = "px-6 py-4";

// Page container
pub const PAGE_CONTAINER_STYLE: &str =
    "flex flex-col items-center px-6 py-8 mx-auto lg:py-5 text-gray-900 dark:text-white";

/// Shows the message of a failed API request in the form that sent it.
///
/// Forms marked with `data-api-form` get the message written into their
/// `[data-form-error]` element, other elements show it in an alert.
const API_ERROR_SCRIPT: &str = r#"
document.addEventListener("htmx:afterRequest", (event) => {
    const element = event.detail.elt;
    const output = element.closest("[data-api-form]")?.querySelector("[data-form-error]");

    if (event.detail.successful) {
        if (output) output.textContent = "";
        return;
    }

    let message = "Something went wrong, please try again later.";
    try {
        message = JSON.parse(event.detail.xhr.responseText).error.message;
    } catch (_) {}

    if (output) {
        output.textContent = message;
    } else {
        window.alert(message);
    }
});
"#;

pub fn base(title: &str, content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Finance Tracker" }

                script src="https://cdn.tailwindcss.com" {}
                script src="https://unpkg.com/htmx.org@2.0.4" {}
                script src="https://unpkg.com/htmx-ext-json-enc@2.0.1/json-enc.js" {}
                script { (PreEscaped(API_ERROR_SCRIPT)) }
            }

            body class="container max-w-full min-h-screen bg-gray-50 dark:bg-gray-900"
            {
                (content)
            }
        }
    }
}

pub fn error_view(title: &str, header: &str, description: &str, fix: &str) -> Markup {
    // Template adapted from https://flowbite.com/blocks/marketing/404/
    let content = html!(
        section class="bg-white dark:bg-gray-900"
        {
            div class="py-8 px-4 mx-auto max-w-screen-xl lg:py-16 lg:px-6"
            {
                div class="mx-auto max-w-screen-sm text-center"
                {
                    h1
                        class="mb-4 text-7xl tracking-tight font-extrabold
                            lg:text-9xl text-blue-600 dark:text-blue-500"
                    {
                        (header)
                    }

                    p
                        class="mb-4 text-3xl md:text-4xl tracking-tight
                            font-bold text-gray-900 dark:text-white"
                    {
                        (description)
                    }

                    p
                        class="mb-4 text-1xl md:text-2xl tracking-tight
                            text-gray-900 dark:text-white"
                    {
                        (fix)
                    }

                    a
                        href="/"
                        class="inline-flex text-white bg-blue-600
                            hover:bg-blue-800 focus:ring-4 focus:outline-hidden
                            focus:ring-blue-300 font-medium rounded text-sm px-5
                            py-2.5 text-center dark:focus:ring-blue-900 my-4"
                    {
                        "Back to Homepage"
                    }
                }
            }
        }
    );

    base(title, &content)
}

/// The edit link and delete button shown next to a record in a table.
///
/// The delete button sends a DELETE request to the JSON API after the user
/// confirms with `confirm_message`.
pub fn edit_delete_action_links(edit_url: &str, delete_url: &str, confirm_message: &str) -> Markup {
    html!(
        a href=(edit_url) class=(LINK_STYLE) { "Edit" }

        button
            type="button"
            hx-delete=(delete_url)
            hx-confirm=(confirm_message)
            hx-swap="none"
            class=(BUTTON_DELETE_STYLE)
        {
            "Delete"
        }
    )
}

/// A dialog with a form that submits its fields as JSON to the API.
///
/// Errors returned by the API are shown above the submit button.
pub fn api_form(
    method: ApiFormMethod,
    endpoint: &str,
    fields: &Markup,
    submit_text: &str,
    cancel_url: &str,
) -> Markup {
    let (hx_post, hx_put) = match method {
        ApiFormMethod::Post => (Some(endpoint), None),
        ApiFormMethod::Put => (None, Some(endpoint)),
    };

    html! {
        form
            hx-post=[hx_post]
            hx-put=[hx_put]
            hx-ext="json-enc"
            hx-swap="none"
            data-api-form
            class="w-full space-y-4 md:space-y-6"
        {
            (fields)

            p data-form-error class=(FORM_ERROR_STYLE) {}

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { (submit_text) }

            a href=(cancel_url) class=(BUTTON_SECONDARY_STYLE) { "Cancel" }
        }
    }
}

/// The HTTP method an [api_form] submits with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiFormMethod {
    /// Create a record.
    Post,
    /// Replace a record.
    Put,
}

/// A dialog page: the nav bar and a card holding `form` under the heading `title`.
pub fn dialog_view(title: &str, nav_bar: Markup, form: &Markup) -> Markup {
    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            div class="w-full bg-white rounded-lg shadow dark:border md:mt-0 sm:max-w-md xl:p-0 dark:bg-gray-800 dark:border-gray-700"
            {
                div class="p-6 space-y-4 md:space-y-6 sm:p-8"
                {
                    h1 class="text-xl font-bold leading-tight tracking-tight text-gray-900 md:text-2xl dark:text-white"
                    {
                        (title)
                    }

                    (form)
                }
            }
        }
    };

    base(title, &content)
}
