use axum::http::StatusCode;
use serde_json::json;

use crate::tests::helper;

#[sqlx::test]
async fn test_budgets(pool: sqlx::PgPool) {
    let mut app = helper::setup_test_app(pool).await;

    let alice = helper::register(&mut app, "alice").await;
    let access_token = alice.access_token.as_str();

    // create budget, defaults are applied
    let (status_code, budget) = helper::post(
        &mut app,
        "/api/budgets",
        access_token,
        json!({ "name": "Flights", "amount": 500 }),
    )
    .await;
    assert_eq!(StatusCode::CREATED, status_code);
    assert_eq!("Flights", budget["name"]);
    assert_eq!(Some(500.0), budget["amount"].as_f64());
    assert_eq!(Some(0.0), budget["actualAmount"].as_f64());
    assert_eq!("custom", budget["category"]);
    let budget_id = budget["id"].as_str().unwrap().to_string();

    // only the actual amount changes
    let uri = format!("/api/budgets/{budget_id}");
    let (status_code, budget) =
        helper::put(&mut app, &uri, access_token, json!({ "actualAmount": 120 })).await;
    assert_eq!(StatusCode::OK, status_code);
    assert_eq!(Some(120.0), budget["actualAmount"].as_f64());
    assert_eq!(Some(500.0), budget["amount"].as_f64());
    assert_eq!("Flights", budget["name"]);
    assert_eq!("custom", budget["category"]);

    // amounts as strings, or not numeric at all
    let (status_code, budget) = helper::post(
        &mut app,
        "/api/budgets",
        access_token,
        json!({
            "id": "hotel",
            "name": "Hotel",
            "amount": "350.50",
            "actualAmount": "unknown",
            "category": "accommodation",
        }),
    )
    .await;
    assert_eq!(StatusCode::CREATED, status_code);
    assert_eq!("hotel", budget["id"]);
    assert_eq!(Some(350.5), budget["amount"].as_f64());
    assert_eq!(Some(0.0), budget["actualAmount"].as_f64());
    assert_eq!("accommodation", budget["category"]);

    // same ID again
    let (status_code, _) = helper::post(
        &mut app,
        "/api/budgets",
        access_token,
        json!({ "id": "hotel", "name": "Hostel" }),
    )
    .await;
    assert_eq!(StatusCode::CONFLICT, status_code);

    // name is required
    let (status_code, _) =
        helper::post(&mut app, "/api/budgets", access_token, json!({ "amount": 10 })).await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);

    // newest first
    let (status_code, budgets) = helper::get(&mut app, "/api/budgets", access_token).await;
    assert_eq!(StatusCode::OK, status_code);
    assert_eq!(
        vec!["hotel".to_string(), budget_id.clone()],
        helper::get_ids(&budgets)
    );

    // update unknown budget
    let (status_code, _) = helper::put(
        &mut app,
        "/api/budgets/unknown",
        access_token,
        json!({ "amount": 1 }),
    )
    .await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);

    // delete budget
    let (status_code, body) = helper::delete(&mut app, &uri, access_token).await;
    assert_eq!(StatusCode::OK, status_code);
    assert_eq!("Budget deleted", body["message"]);

    let (status_code, _) = helper::delete(&mut app, &uri, access_token).await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);

    let (_, budgets) = helper::get(&mut app, "/api/budgets", access_token).await;
    assert_eq!(vec!["hotel".to_string()], helper::get_ids(&budgets));
}
