use axum::http::StatusCode;
use serde_json::json;

use crate::tests::helper;

#[sqlx::test]
async fn test_resources_of_others(pool: sqlx::PgPool) {
    let mut app = helper::setup_test_app(pool).await;

    let alice = helper::register(&mut app, "alice").await;
    let bob = helper::register(&mut app, "bob").await;

    let (status_code, _) = helper::post(
        &mut app,
        "/api/pois",
        &alice.access_token,
        json!({ "id": "tower", "name": "Tower" }),
    )
    .await;
    assert_eq!(StatusCode::CREATED, status_code);

    let (status_code, _) = helper::post(
        &mut app,
        "/api/itineraries",
        &alice.access_token,
        json!({ "id": "tokyo", "name": "Tokyo" }),
    )
    .await;
    assert_eq!(StatusCode::CREATED, status_code);

    let (status_code, _) = helper::post(
        &mut app,
        "/api/budgets",
        &alice.access_token,
        json!({ "id": "flights", "name": "Flights", "amount": 500 }),
    )
    .await;
    assert_eq!(StatusCode::CREATED, status_code);

    let (status_code, _) = helper::post(
        &mut app,
        "/api/memos",
        &alice.access_token,
        json!({ "id": "packing", "title": "Packing" }),
    )
    .await;
    assert_eq!(StatusCode::CREATED, status_code);

    // bob sees nothing
    for uri in ["/api/pois", "/api/itineraries", "/api/budgets", "/api/memos"] {
        let (status_code, items) = helper::get(&mut app, uri, &bob.access_token).await;
        assert_eq!(StatusCode::OK, status_code);
        assert_eq!(json!([]), items, "{uri}");
    }

    // bob can not change or delete anything, it looks like it does not exist
    let resources = [
        ("/api/pois/tower", json!({ "name": "Mine" })),
        ("/api/itineraries/tokyo", json!({ "name": "Mine", "pois": [] })),
        ("/api/budgets/flights", json!({ "amount": 1 })),
        ("/api/memos/packing", json!({ "title": "Mine" })),
    ];

    for (uri, payload) in resources {
        let (status_code, _) = helper::put(&mut app, uri, &bob.access_token, payload).await;
        assert_eq!(StatusCode::NOT_FOUND, status_code, "{uri}");

        let (status_code, _) = helper::delete(&mut app, uri, &bob.access_token).await;
        assert_eq!(StatusCode::NOT_FOUND, status_code, "{uri}");
    }

    // bob can not take over the POI of alice through an itinerary
    let (status_code, body) = helper::post(
        &mut app,
        "/api/itineraries",
        &bob.access_token,
        json!({ "name": "Mine", "pois": [{ "id": "tower", "name": "Mine" }] }),
    )
    .await;
    assert_eq!(StatusCode::CONFLICT, status_code);
    assert_eq!("POI belongs to another user", helper::get_error_message(&body));

    let (_, itineraries) = helper::get(&mut app, "/api/itineraries", &bob.access_token).await;
    assert_eq!(json!([]), itineraries);

    // everything of alice is untouched
    let (_, pois) = helper::get(&mut app, "/api/pois", &alice.access_token).await;
    assert_eq!("Tower", pois[0]["name"]);

    let (_, budgets) = helper::get(&mut app, "/api/budgets", &alice.access_token).await;
    assert_eq!(Some(500.0), budgets[0]["amount"].as_f64());

    let (_, memos) = helper::get(&mut app, "/api/memos", &alice.access_token).await;
    assert_eq!("Packing", memos[0]["title"]);

    let (_, itineraries) = helper::get(&mut app, "/api/itineraries", &alice.access_token).await;
    assert_eq!("Tokyo", itineraries[0]["name"]);
}
