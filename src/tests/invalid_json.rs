use axum::body::Body;
use axum::http::Method;
use axum::http::Request;
use axum::http::StatusCode;
use axum::http::header::AUTHORIZATION;
use axum::http::header::CONTENT_TYPE;

use crate::tests::helper;

async fn create_budget_with_raw_body(
    app: &mut axum::Router,
    access_token: &str,
    body: &'static str,
    with_content_type: bool,
) -> (StatusCode, helper::Error) {
    let mut request = Request::builder()
        .method(Method::POST)
        .uri("/api/budgets")
        .header(AUTHORIZATION, access_token);

    if with_content_type {
        request = request.header(CONTENT_TYPE, mime::APPLICATION_JSON.as_ref());
    }

    let (status_code, body) =
        helper::send_request(app, request.body(Body::from(body)).unwrap()).await;

    (status_code, helper::get_error(&body))
}

#[sqlx::test]
async fn test_invalid_json(pool: sqlx::PgPool) {
    let mut app = helper::setup_test_app(pool).await;

    let alice = helper::register(&mut app, "alice").await;
    let access_token = alice.access_token.as_str();

    // wrong type of data
    let (status_code, error) =
        create_budget_with_raw_body(&mut app, access_token, r#"{"name":42}"#, true).await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!("Data error", error.error);
    assert!(error.description.is_some());

    // syntax error
    let (status_code, error) =
        create_budget_with_raw_body(&mut app, access_token, r#"{"}"#, true).await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!("JSON syntax error", error.error);
    assert_eq!(
        Some("EOF while parsing a string at line 1 column 3".to_string()),
        error.description
    );

    // missing content type
    let (status_code, error) =
        create_budget_with_raw_body(&mut app, access_token, r"{}", false).await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!("Missing `application/json` content type", error.error);
}
