use axum::http::Method;
use axum::http::StatusCode;

use crate::tests::helper;

#[sqlx::test]
async fn test_place_search_validation(pool: sqlx::PgPool) {
    let mut app = helper::setup_test_app(pool).await;

    // keywords are required
    let (status_code, body) =
        helper::send(&mut app, Method::GET, "/api/amap/place/text", None, None).await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!("Keywords are required", helper::get_error_message(&body));

    // no API key configured
    let (status_code, body) = helper::send(
        &mut app,
        Method::GET,
        "/api/amap/place/text?keywords=museum&city=Tokyo",
        None,
        None,
    )
    .await;
    assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, status_code);
    assert_eq!(
        "Place search API key not configured",
        helper::get_error_message(&body)
    );
}

#[sqlx::test]
async fn test_place_search_unreachable(pool: sqlx::PgPool) {
    let mut config = helper::test_config();
    config.place_search.api_key = Some("secret".to_string());

    let mut app = helper::setup_test_app_with_config(pool, config).await;

    // nothing listens on the discard port
    let (status_code, body) = helper::send(
        &mut app,
        Method::GET,
        "/api/amap/place/text?keywords=museum",
        None,
        None,
    )
    .await;
    assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, status_code);
    assert_eq!(
        "Failed to fetch from place search provider",
        helper::get_error_message(&body)
    );
}
