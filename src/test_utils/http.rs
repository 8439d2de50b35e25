use axum::{body::Body, response::Response};
use axum_test::TestServer;
use rusqlite::Connection;

use crate::{AppState, build_router, db::initialize};

#[track_caller]
pub(crate) fn must_create_test_connection() -> Connection {
    let connection =
        Connection::open_in_memory().expect("could not create in-memory SQLite database");
    initialize(&connection).expect("could not initialize test DB");

    connection
}

#[track_caller]
pub(crate) fn must_create_test_state() -> AppState {
    let connection =
        Connection::open_in_memory().expect("could not create in-memory SQLite database");

    AppState::new(connection).expect("could not create test app state")
}

#[track_caller]
pub(crate) fn must_create_test_server(state: AppState) -> TestServer {
    TestServer::try_new(build_router(state)).expect("Could not create test server.")
}

#[track_caller]
pub(crate) fn assert_content_type(response: &Response<Body>, content_type: &str) {
    let content_type_header = response
        .headers()
        .get("content-type")
        .expect("content-type header missing");
    assert_eq!(content_type_header, content_type);
}
