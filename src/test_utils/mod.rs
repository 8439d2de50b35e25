#![allow(missing_docs)]

pub(crate) mod form;
pub(crate) mod html;
pub(crate) mod http;

pub(crate) use form::{
    assert_form_input, assert_form_input_with_value, assert_form_submit_button_with_text,
    assert_hx_endpoint, must_get_form, must_get_selected_option,
};
pub(crate) use html::{assert_valid_html, parse_html_document, select_texts};
pub(crate) use http::{
    assert_content_type, must_create_test_connection, must_create_test_server,
    must_create_test_state,
};
