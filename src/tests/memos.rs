use axum::http::StatusCode;
use serde_json::json;

use crate::tests::helper;

#[sqlx::test]
async fn test_memos(pool: sqlx::PgPool) {
    let mut app = helper::setup_test_app(pool).await;

    let alice = helper::register(&mut app, "alice").await;
    let access_token = alice.access_token.as_str();

    // verify empty memo list
    let (status_code, memos) = helper::get(&mut app, "/api/memos", access_token).await;
    assert_eq!(StatusCode::OK, status_code);
    assert_eq!(json!([]), memos);

    // create memo without anything
    let (status_code, empty) = helper::post(&mut app, "/api/memos", access_token, json!({})).await;
    assert_eq!(StatusCode::CREATED, status_code);
    assert_eq!("new memo", empty["title"]);
    assert_eq!("", empty["content"]);
    let empty_id = empty["id"].as_str().unwrap().to_string();

    // create memo with content
    let (status_code, packing) = helper::post(
        &mut app,
        "/api/memos",
        access_token,
        json!({ "id": "packing", "title": "Packing", "content": "Passport" }),
    )
    .await;
    assert_eq!(StatusCode::CREATED, status_code);
    assert_eq!("packing", packing["id"]);
    assert_eq!("Packing", packing["title"]);

    // last changed first
    let (_, memos) = helper::get(&mut app, "/api/memos", access_token).await;
    assert_eq!(
        vec!["packing".to_string(), empty_id.clone()],
        helper::get_ids(&memos)
    );

    // update content only
    let uri = format!("/api/memos/{empty_id}");
    let (status_code, memo) = helper::put(
        &mut app,
        &uri,
        access_token,
        json!({ "content": "Buy a rail pass" }),
    )
    .await;
    assert_eq!(StatusCode::OK, status_code);
    assert_eq!("new memo", memo["title"]);
    assert_eq!("Buy a rail pass", memo["content"]);

    // the updated memo moves to the top
    let (_, memos) = helper::get(&mut app, "/api/memos", access_token).await;
    assert_eq!(
        vec![empty_id.clone(), "packing".to_string()],
        helper::get_ids(&memos)
    );

    // update unknown memo
    let (status_code, _) = helper::put(
        &mut app,
        "/api/memos/unknown",
        access_token,
        json!({ "title": "Nothing" }),
    )
    .await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);

    // delete memo
    let (status_code, body) = helper::delete(&mut app, &uri, access_token).await;
    assert_eq!(StatusCode::OK, status_code);
    assert_eq!("Memo deleted", body["message"]);

    let (status_code, _) = helper::delete(&mut app, &uri, access_token).await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);

    let (_, memos) = helper::get(&mut app, "/api/memos", access_token).await;
    assert_eq!(vec!["packing".to_string()], helper::get_ids(&memos));
}
